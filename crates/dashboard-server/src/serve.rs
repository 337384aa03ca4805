//! Serving with a bounded graceful shutdown

use axum::Router;
use std::{
    future::{Future, IntoFuture},
    sync::Arc,
    time::Duration,
};
use tokio::{net::TcpListener, sync::Notify};
use tracing::{info, warn};

/// Serve `app` until `shutdown` resolves.
///
/// The listener stops accepting as soon as `shutdown` fires. Requests already
/// in flight get `grace` to finish; whatever is still running after that is
/// abandoned and this returns.
pub async fn serve<S>(
    listener: TcpListener,
    app: Router,
    shutdown: S,
    grace: Duration,
) -> anyhow::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let draining = Arc::new(Notify::new());
    let started = draining.clone();

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("Waiting up to {:?} for connections to close", grace);
            started.notify_one();
        })
        .into_future();

    let deadline = async {
        draining.notified().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => result?,
        _ = deadline => {
            warn!(grace_secs = grace.as_secs(), "Connections still open after grace period, closing");
        },
    }

    Ok(())
}
