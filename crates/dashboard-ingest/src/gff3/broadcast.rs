//! Fans every line out to each feature consumer

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info_span, trace, Instrument};

use super::error::IngestError;
use super::pipeline::{spawn_stage, ErrorSignal};
use super::{Line, LINE_CHANNEL_CAPACITY};

/// Second pipeline stage: replays the whole line stream into `lanes` lanes.
///
/// A line is delivered to every lane before the next one is pulled from the
/// source, so the slowest lane sets the pace for the whole pipeline.
pub struct Broadcaster {
    lanes: usize,
}

impl Broadcaster {
    pub fn new(lanes: usize) -> Self {
        Self { lanes }
    }

    /// Start broadcasting in a background task.
    ///
    /// All lanes are closed once the source is exhausted. The broadcaster has
    /// no failure of its own; its signal closes after the lanes do.
    pub fn spawn(self, mut source: mpsc::Receiver<Line>) -> (Vec<mpsc::Receiver<Line>>, ErrorSignal) {
        let (senders, receivers): (Vec<_>, Vec<_>) = (0..self.lanes)
            .map(|_| mpsc::channel::<Line>(LINE_CHANNEL_CAPACITY))
            .unzip();

        let task = async move {
            let mut count = 0usize;
            while let Some(line) = source.recv().await {
                count += 1;
                for (lane, sender) in senders.iter().enumerate() {
                    // A lane whose consumer is gone is skipped; the rest keep flowing.
                    if sender.send(Arc::clone(&line)).await.is_err() {
                        trace!(lane, "Lane closed, dropping line");
                    }
                }
            }
            drop(senders);
            debug!(lines = count, lanes = self.lanes, "Broadcast complete");
            Ok::<_, IngestError>(())
        };

        let signal = spawn_stage("broadcaster", task.instrument(info_span!("gff3_broadcaster")));
        (receivers, signal)
    }
}
