//! Ingestion configuration

use serde::{Deserialize, Serialize};

use crate::gff3::DEFAULT_MAX_LINE_LENGTH;
use crate::organism::DEFAULT_FEATURE_TYPES;

/// Settings for one genome ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Longest GFF3 line accepted, in bytes
    pub max_line_length: usize,
    /// Feature types extracted into their own store fields
    pub feature_types: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            feature_types: DEFAULT_FEATURE_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl IngestConfig {
    /// Load configuration from environment and defaults
    ///
    /// - `INGEST_MAX_LINE_LENGTH`: line limit in bytes (default 65536)
    /// - `INGEST_FEATURE_TYPES`: comma-separated feature types
    ///   (default `chromosome,gene,pseudogene`)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(raw) = std::env::var("INGEST_MAX_LINE_LENGTH") {
            config.max_line_length = raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("INGEST_MAX_LINE_LENGTH is not a number: {}", raw))?;
        }

        if let Ok(raw) = std::env::var("INGEST_FEATURE_TYPES") {
            config.feature_types = parse_feature_types(&raw);
        }

        config.validate()?;
        Ok(config)
    }

    /// Replace the feature types, e.g. from a command line flag
    pub fn with_feature_types<I, S>(mut self, feature_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_types = feature_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_line_length == 0 {
            anyhow::bail!("max_line_length must be greater than 0");
        }

        if self.feature_types.is_empty() {
            anyhow::bail!("At least one feature type must be configured");
        }

        if let Some(bad) = self
            .feature_types
            .iter()
            .find(|t| t.is_empty() || t.contains(char::is_whitespace))
        {
            anyhow::bail!("Invalid feature type: {:?}", bad);
        }

        Ok(())
    }
}

/// Split a comma-separated list, dropping blanks
pub fn parse_feature_types(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
