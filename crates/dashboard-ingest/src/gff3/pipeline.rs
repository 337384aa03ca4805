//! Completion signals and the pipeline join
//!
//! Every stage hands back an [`ErrorSignal`]: a channel that carries at most
//! one terminal error and closes when the stage's task ends, whether it
//! succeeded or not. [`wait_for_pipeline`] merges all of them and returns the
//! first error seen.

use std::future::Future;
use tokio::sync::mpsc;
use tracing::error;

use super::error::IngestError;

/// Receiving half of a stage's completion signal
pub type ErrorSignal = mpsc::Receiver<IngestError>;

/// Create a completion signal. Dropping the sender closes it.
pub(crate) fn error_signal() -> (mpsc::Sender<IngestError>, ErrorSignal) {
    mpsc::channel(1)
}

/// Run a stage body in its own task and report how it ended.
///
/// The body's error, or a panic or cancellation of its task, is sent on the
/// returned signal. The signal closes only after the task has ended, so a
/// crashed stage can never be mistaken for a successful one.
pub(crate) fn spawn_stage<F>(stage: &'static str, body: F) -> ErrorSignal
where
    F: Future<Output = Result<(), IngestError>> + Send + 'static,
{
    let (errc, signal) = error_signal();
    let task = tokio::spawn(body);

    tokio::spawn(async move {
        let err = match task.await {
            Ok(Ok(())) => return,
            Ok(Err(err)) => err,
            Err(join) if join.is_panic() => {
                error!(stage, "Pipeline stage panicked");
                IngestError::StagePanicked { stage }
            },
            Err(_) => IngestError::StageCancelled { stage },
        };
        let _ = errc.send(err).await;
    });

    signal
}

/// Merge many completion signals into one.
///
/// One relay task per signal forwards its error into a shared sink sized to
/// the number of signals, so relays never block even when nobody reads the
/// merged signal anymore. The merged signal closes once every relay has
/// finished, which happens once every source signal has closed.
pub fn merge_errors(signals: Vec<ErrorSignal>) -> ErrorSignal {
    let (sink, merged) = mpsc::channel(signals.len().max(1));

    for mut signal in signals {
        let sink = sink.clone();
        tokio::spawn(async move {
            while let Some(err) = signal.recv().await {
                let _ = sink.send(err).await;
            }
        });
    }

    merged
}

/// Wait for all stages, returning early with the first error.
///
/// Returning early does not stop the remaining stages; they keep running to
/// completion in the background.
pub async fn wait_for_pipeline(signals: Vec<ErrorSignal>) -> Result<(), IngestError> {
    match merge_errors(signals).recv().await {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
