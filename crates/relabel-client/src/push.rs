//! WebSocket push listener.
//!
//! The server's `/ws` endpoint delivers arrival-only "something changed"
//! signals; the payload is never parsed. Every arrival forwards one trigger
//! to the refresh scheduler. A failed or dropped connection surfaces once
//! as a warning notice and the viewer degrades to poll-only; polling
//! covers the same invalidation.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use url::Url;

use relabel_core::Notice;

use crate::viewer::ViewerState;

/// Listen for push signals until the connection ends or shutdown fires.
pub(crate) async fn run(
    ws_url: Url,
    state: Arc<ViewerState>,
    trigger: mpsc::Sender<()>,
    mut shutdown: watch::Receiver<bool>,
) {
    let connected = tokio::select! {
        _ = shutdown.changed() => return,
        connected = connect_async(ws_url.as_str()) => connected,
    };

    let (mut stream, _response) = match connected {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!("Push channel unavailable ({e}); continuing with polling only");
            state.push_notice(Notice::warning("Live updates unavailable; polling continues"));
            return;
        }
    };
    tracing::debug!("Push channel connected to {ws_url}");

    loop {
        tokio::select! {
            _ = shutdown.changed() => return,
            message = stream.next() => match message {
                Some(Ok(message)) if message.is_close() => {
                    tracing::debug!("Push channel closed by server");
                    break;
                }
                Some(Ok(_)) => {
                    // Arrival is the signal; content is ignored.
                    let _ = trigger.send(()).await;
                }
                Some(Err(e)) => {
                    tracing::warn!("Push channel error ({e}); continuing with polling only");
                    break;
                }
                None => break,
            },
        }
    }
    state.push_notice(Notice::warning("Live updates lost; polling continues"));
}
