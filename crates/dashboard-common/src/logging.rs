//! Logging configuration and initialization
//!
//! Every dashboard binary routes its diagnostics through `tracing`. This module
//! owns the one place where the global subscriber is installed, so the ingest
//! CLI and the read API emit the same shape of output:
//!
//! - console, daily-rotated file, or both
//! - human-readable text or JSON lines
//! - an `EnvFilter` built from the configured level plus extra directives
//!
//! Use structured fields rather than interpolated strings:
//!
//! ```rust,ignore
//! use tracing::{info, warn};
//!
//! info!(key = %key, feature_type = %feature_type, records = count, "stored envelope");
//! warn!(error = %err, "replica lookup failed");
//! ```
//!
//! # Example
//!
//! ```no_run
//! use dashboard_common::logging::{init_logging, LogConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = LogConfig::for_binary("dashboard-ingest").merge_env()?;
//! let _guard = init_logging(&config)?;
//! tracing::info!("dashboard started");
//! # Ok(())
//! # }
//! ```

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Directory used for log files when `LOG_DIR` is unset
pub const DEFAULT_LOG_DIR: &str = "./logs";

/// Daily-rotated log files, named `<prefix>.<date>` inside `dir`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSink {
    pub dir: PathBuf,
    pub prefix: String,
}

/// Logging configuration of one binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Most verbose level let through by default
    pub level: Level,
    pub console: bool,
    pub file: Option<FileSink>,
    /// JSON lines instead of human-readable text
    pub json: bool,
    /// Extra `EnvFilter` directives such as `redis=warn`
    pub directives: Vec<String>,
    pub include_targets: bool,
    binary: String,
}

impl LogConfig {
    /// Console text logging at `info`, with log files named after `binary`
    /// should file output be switched on
    pub fn for_binary(binary: impl Into<String>) -> Self {
        Self {
            level: Level::INFO,
            console: true,
            file: None,
            json: false,
            directives: Vec::new(),
            include_targets: true,
            binary: binary.into(),
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.level = Level::DEBUG;
        }
        self
    }

    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Overlay environment variables, which take precedence over code defaults.
    ///
    /// - `LOG_LEVEL`: trace, debug, info, warn, error
    /// - `LOG_OUTPUT`: console, file, both
    /// - `LOG_FORMAT`: text, json
    /// - `LOG_DIR`: directory for log files (default `./logs`)
    /// - `LOG_FILE_PREFIX`: file name prefix (default: the binary name)
    /// - `LOG_FILTER`: comma-separated filter directives, appended
    pub fn merge_env(mut self) -> Result<Self> {
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.level = level
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid LOG_LEVEL: {}", level))?;
        }

        if let Ok(output) = std::env::var("LOG_OUTPUT") {
            let (console, file) = match output.trim().to_lowercase().as_str() {
                "console" | "stdout" => (true, false),
                "file" => (false, true),
                "both" => (true, true),
                _ => bail!("Invalid LOG_OUTPUT: {}", output),
            };
            self.console = console;
            self.file = file.then(|| self.default_file_sink());
        }

        if let Ok(format) = std::env::var("LOG_FORMAT") {
            self.json = match format.trim().to_lowercase().as_str() {
                "text" => false,
                "json" => true,
                _ => bail!("Invalid LOG_FORMAT: {}", format),
            };
        }

        if let Some(sink) = self.file.as_mut() {
            if let Ok(dir) = std::env::var("LOG_DIR") {
                sink.dir = PathBuf::from(dir);
            }
            if let Ok(prefix) = std::env::var("LOG_FILE_PREFIX") {
                sink.prefix = prefix;
            }
        }

        if let Ok(filter) = std::env::var("LOG_FILTER") {
            self.directives.extend(split_directives(&filter));
        }

        Ok(self)
    }

    fn default_file_sink(&self) -> FileSink {
        FileSink {
            dir: PathBuf::from(DEFAULT_LOG_DIR),
            prefix: self.binary.clone(),
        }
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        let mut filter = EnvFilter::from_default_env().add_directive(self.level.into());
        for directive in &self.directives {
            let parsed = directive
                .parse()
                .with_context(|| format!("Invalid filter directive {:?}", directive))?;
            filter = filter.add_directive(parsed);
        }
        Ok(filter)
    }

    fn fmt_layer<W>(&self, writer: W, ansi: bool) -> Result<BoxedLayer>
    where
        W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
    {
        let layer = fmt::layer()
            .with_writer(writer)
            .with_target(self.include_targets)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(ansi);
        Ok(if self.json {
            layer.json().with_filter(self.env_filter()?).boxed()
        } else {
            layer.with_filter(self.env_filter()?).boxed()
        })
    }
}

fn split_directives(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

/// Install the global tracing subscriber.
///
/// Must be called once at startup. When file output is enabled the returned
/// guard flushes the background writer on drop, so keep it alive in `main`.
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if config.console {
        layers.push(config.fmt_layer(std::io::stdout, true)?);
    }

    if let Some(sink) = &config.file {
        std::fs::create_dir_all(&sink.dir)
            .with_context(|| format!("Failed to create log directory {}", sink.dir.display()))?;
        let (writer, file_guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::daily(&sink.dir, &sink.prefix));
        guard = Some(file_guard);
        layers.push(config.fmt_layer(writer, false)?);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
