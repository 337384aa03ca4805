//! Per-feature-type extraction and persistence

use dashboard_common::store::Store;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, info_span, warn, Instrument};

use super::error::{IngestError, ParseError};
use super::models::{field_name, Envelope, FeatureKind, Resource};
use super::parser::{parse_feature, parse_region, AnnotationScanner, Columns};
use super::pipeline::{spawn_stage, ErrorSignal};
use super::Line;

/// Third pipeline stage: one instance per requested feature type.
///
/// Reads its whole lane, keeps the lines of its feature type, and writes one
/// envelope to `(key, "<type>s")` when the lane closes.
pub struct FeatureConsumer {
    store: Arc<dyn Store>,
    key: String,
    feature_type: String,
    kind: FeatureKind,
}

impl FeatureConsumer {
    pub fn new(store: Arc<dyn Store>, key: impl Into<String>, feature_type: impl Into<String>) -> Self {
        let feature_type = feature_type.into();
        Self {
            store,
            key: key.into(),
            kind: FeatureKind::for_type(&feature_type),
            feature_type,
        }
    }

    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    /// Start consuming `lane` in a background task.
    ///
    /// The returned signal carries this consumer's error, if any, and closes
    /// exactly once when the task ends.
    pub fn spawn(self, lane: mpsc::Receiver<Line>) -> ErrorSignal {
        let span = info_span!("feature_consumer", feature_type = %self.feature_type);

        spawn_stage(
            "consumer",
            async move {
                let outcome = self.run(lane).await;
                if let Err(e) = &outcome {
                    warn!(error = %e, "Feature consumer failed");
                }
                outcome
            }
            .instrument(span),
        )
    }

    async fn run(&self, lane: mpsc::Receiver<Line>) -> Result<(), IngestError> {
        let (payload, records) = match self.kind {
            FeatureKind::Region => self.extract(lane, parse_region).await?,
            FeatureKind::Generic => self.extract(lane, parse_feature).await?,
        };

        let field = field_name(&self.feature_type);
        self.store
            .set(&self.key, &field, &payload)
            .await
            .map_err(|source| IngestError::Store {
                key: self.key.clone(),
                field: field.clone(),
                source,
            })?;

        info!(key = %self.key, field = %field, records, "Stored feature envelope");
        Ok(())
    }

    /// Drain the lane, returning the serialized envelope and its record count.
    ///
    /// After a parse failure no more records are built, but the lane is still
    /// read to the end so the broadcaster is never left waiting on it.
    async fn extract<A, F>(
        &self,
        mut lane: mpsc::Receiver<Line>,
        parse: F,
    ) -> Result<(String, usize), IngestError>
    where
        A: Serialize,
        F: Fn(&Columns<'_>) -> Result<(String, A), ParseError>,
    {
        let kind = field_name(&self.feature_type);
        let mut scanner = AnnotationScanner::new();
        let mut envelope = Envelope::default();
        let mut failure = None;

        while let Some(line) = lane.recv().await {
            let Some(columns) = scanner.select(&line, &self.feature_type) else {
                continue;
            };
            if failure.is_some() {
                continue;
            }
            match parse(&columns) {
                Ok((id, attributes)) => envelope.data.push(Resource {
                    kind: kind.clone(),
                    id,
                    attributes,
                }),
                Err(source) => {
                    failure = Some(IngestError::Parse {
                        feature_type: self.feature_type.clone(),
                        line: scanner.line_number(),
                        source,
                    });
                },
            }
        }

        debug!(
            lines = scanner.line_number(),
            annotations_ended = scanner.annotations_ended(),
            "Lane drained"
        );

        if let Some(err) = failure {
            return Err(err);
        }

        let records = envelope.data.len();
        let payload = serde_json::to_string(&envelope)
            .map_err(|source| IngestError::Serialize { field: kind, source })?;
        Ok((payload, records))
    }
}
