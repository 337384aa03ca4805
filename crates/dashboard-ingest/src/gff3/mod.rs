//! GFF3 ingestion pipeline
//!
//! Parses a GFF3 stream once and stores one JSON envelope per requested
//! feature type:
//!
//! ```text
//!  reader ──▶ LineProducer ──▶ Broadcaster ──┬──▶ FeatureConsumer(chromosome) ──▶ store
//!                                            ├──▶ FeatureConsumer(gene)       ──▶ store
//!                                            └──▶ FeatureConsumer(pseudogene) ──▶ store
//! ```
//!
//! Every stage runs in its own task and hands lines over through bounded
//! channels of capacity one, which is the only backpressure in the system.
//! Each stage also returns an [`ErrorSignal`]; the pipeline join reports the
//! first error from any of them.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use dashboard_common::store::MemoryStore;
//! use dashboard_ingest::gff3::store_gff3;
//!
//! # async fn demo() -> Result<(), dashboard_ingest::gff3::IngestError> {
//! let gff3: &[u8] = b"##gff-version 3\nc1\t.\tchromosome\t1\t90\t.\t+\t.\tID=c1;Name=1\n";
//! store_gff3(gff3, Arc::new(MemoryStore::new()), "dashboard-44689", &["chromosome", "gene"]).await?;
//! # Ok(())
//! # }
//! ```

use dashboard_common::store::Store;
use std::sync::Arc;
use tokio::io::AsyncRead;
use tracing::{debug, info, instrument};

mod broadcast;
mod consumer;
mod error;
pub mod models;
pub mod parser;
mod pipeline;
mod producer;

pub use broadcast::Broadcaster;
pub use consumer::FeatureConsumer;
pub use error::{IngestError, ParseError};
pub use models::{field_name, Envelope, Feature, FeatureKind, Region, Resource};
pub use pipeline::{merge_errors, wait_for_pipeline, ErrorSignal};
pub use producer::LineProducer;

/// One newline-terminated input line, shared between lanes without copying
pub type Line = Arc<str>;

/// Longest accepted line in bytes, matching the classic 64 KiB scanner token
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// Capacity of every line channel; tokio's smallest bound
pub(crate) const LINE_CHANNEL_CAPACITY: usize = 1;

/// Configured GFF3 pipeline bound to a store
#[derive(Clone)]
pub struct Gff3Pipeline {
    store: Arc<dyn Store>,
    max_line_length: usize,
}

impl Gff3Pipeline {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }

    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Parse `reader` and store one envelope per feature type under `key`.
    ///
    /// Returns the first error reported by any stage. Stages that are still
    /// running when an error is returned finish in the background, so writes
    /// for other feature types may still land afterwards; nothing is rolled
    /// back.
    #[instrument(skip(self, reader, feature_types), fields(key = %key))]
    pub async fn run<R, T>(&self, reader: R, key: &str, feature_types: &[T]) -> Result<(), IngestError>
    where
        R: AsyncRead + Unpin + Send + 'static,
        T: AsRef<str>,
    {
        let feature_types = distinct(feature_types);
        info!(feature_types = ?feature_types, "Starting gff3 ingestion");

        let mut signals = Vec::with_capacity(feature_types.len() + 2);

        let (lines, signal) = LineProducer::new(reader)
            .with_max_line_length(self.max_line_length)
            .spawn();
        signals.push(signal);

        let (lanes, signal) = Broadcaster::new(feature_types.len()).spawn(lines);
        signals.push(signal);

        for (feature_type, lane) in feature_types.into_iter().zip(lanes) {
            let consumer = FeatureConsumer::new(Arc::clone(&self.store), key, feature_type);
            signals.push(consumer.spawn(lane));
        }

        wait_for_pipeline(signals).await?;
        info!("Finished gff3 ingestion");
        Ok(())
    }
}

/// Run a [`Gff3Pipeline`] with default settings.
pub async fn store_gff3<R, T>(
    reader: R,
    store: Arc<dyn Store>,
    key: &str,
    feature_types: &[T],
) -> Result<(), IngestError>
where
    R: AsyncRead + Unpin + Send + 'static,
    T: AsRef<str>,
{
    Gff3Pipeline::new(store).run(reader, key, feature_types).await
}

/// Requested types in order, without repeats, so each store field has one writer
fn distinct<T: AsRef<str>>(feature_types: &[T]) -> Vec<String> {
    let mut seen = Vec::with_capacity(feature_types.len());
    for feature_type in feature_types {
        let feature_type = feature_type.as_ref();
        if seen.iter().any(|s: &String| s == feature_type) {
            debug!(feature_type, "Ignoring repeated feature type");
            continue;
        }
        seen.push(feature_type.to_string());
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_keeps_first_occurrence_order() {
        assert_eq!(
            distinct(&["gene", "chromosome", "gene", "pseudogene", "chromosome"]),
            vec!["gene", "chromosome", "pseudogene"]
        );
    }

    #[test]
    fn test_distinct_of_nothing() {
        let none: [&str; 0] = [];
        assert!(distinct(&none).is_empty());
    }
}
