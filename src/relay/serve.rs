use std::time::Duration;

use axum::Router;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinSet;

/// Pause after a failed accept (e.g. out of file descriptors) before retrying.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Accept loop for one relay listener.
///
/// Every connection task lives in a `JoinSet` owned by this future, so nothing
/// outlives it: on shutdown the listener is closed, open connections get `grace`
/// to finish their current request, and whatever remains is aborted before return.
/// Dropping the future aborts all connections as well.
pub(crate) async fn serve(
    listener: TcpListener,
    app: Router,
    mut shutdown_rx: oneshot::Receiver<()>,
    grace: Duration,
) {
    let (drain_tx, drain_rx) = watch::channel(false);
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    tracing::trace!("Relay accepted connection from {}", peer);
                    let service = TowerToHyperService::new(app.clone());
                    let mut drain_rx = drain_rx.clone();
                    connections.spawn(async move {
                        let conn = http1::Builder::new()
                            .serve_connection(TokioIo::new(stream), service);
                        tokio::pin!(conn);
                        let result = tokio::select! {
                            result = conn.as_mut() => result,
                            _ = drain_rx.changed() => {
                                conn.as_mut().graceful_shutdown();
                                conn.await
                            }
                        };
                        if let Err(e) = result {
                            tracing::debug!("Relay connection from {} ended: {}", peer, e);
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!("Relay accept failed: {}", e);
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
        }
    }

    drop(listener);
    let _ = drain_tx.send(true);

    let drained = tokio::time::timeout(grace, async {
        while connections.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        tracing::warn!(
            "Relay connections did not drain within {:?}; aborting {}",
            grace,
            connections.len()
        );
    }
    connections.shutdown().await;
}
