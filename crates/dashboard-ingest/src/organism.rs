//! Organism-level ingestion
//!
//! A genome upload stores the extracted feature envelopes and the organism's
//! metadata side by side under one key, `dashboard-<taxon id>`.

use dashboard_common::store::Store;
pub use dashboard_common::store::{record_key, KEY_PREFIX};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::io::AsyncRead;
use tracing::{info, instrument};

use crate::config::IngestConfig;
use crate::gff3::{Gff3Pipeline, IngestError};

/// Field holding the organism metadata
pub const ORGANISM_FIELD: &str = "organism";

/// Feature types extracted when none are configured
pub const DEFAULT_FEATURE_TYPES: [&str; 3] = ["chromosome", "gene", "pseudogene"];

/// Descriptive metadata uploaded with a genome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganismMetadata {
    pub taxon_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    /// Bucket the GFF3 file was fetched from, when it came from object storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    pub file: String,
}

impl OrganismMetadata {
    pub fn new(taxon_id: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            taxon_id: taxon_id.into(),
            scientific_name: None,
            common_name: None,
            rank: None,
            bucket: None,
            file: file.into(),
        }
    }

    pub fn key(&self) -> String {
        record_key(&self.taxon_id)
    }
}

/// Ingest a genome: feature envelopes first, then the organism metadata.
///
/// The metadata is only written once every feature type was stored, so its
/// presence marks a completed upload.
#[instrument(skip(reader, store, config), fields(taxon_id = %metadata.taxon_id))]
pub async fn ingest_genome<R>(
    reader: R,
    store: Arc<dyn Store>,
    metadata: &OrganismMetadata,
    config: &IngestConfig,
) -> Result<(), IngestError>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let key = metadata.key();
    info!(key = %key, file = %metadata.file, "Storing information of gff3 file");

    Gff3Pipeline::new(Arc::clone(&store))
        .with_max_line_length(config.max_line_length)
        .run(reader, &key, &config.feature_types)
        .await?;

    let payload = serde_json::to_string(metadata).map_err(|source| IngestError::Serialize {
        field: ORGANISM_FIELD.to_string(),
        source,
    })?;
    store
        .set(&key, ORGANISM_FIELD, &payload)
        .await
        .map_err(|source| IngestError::Store {
            key: key.clone(),
            field: ORGANISM_FIELD.to_string(),
            source,
        })?;

    info!(key = %key, "Stored organism metadata");
    Ok(())
}
