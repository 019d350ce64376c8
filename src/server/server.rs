//! WebSocket server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::protocol::{ClientMessage, ServerMessage};

use super::state::TaskStore;

/// Shared task store wrapped in Arc<Mutex> for async access.
type SharedStore = Arc<Mutex<TaskStore>>;

/// Load the task file and serve it on `port` until the process ends.
pub async fn run(
    port: u16,
    tasks_path: PathBuf,
    token: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = TaskStore::open(tasks_path.clone(), token)?;
    info!(count = store.len(), path = %tasks_path.display(), "loaded tasks");

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "task service listening");

    serve(listener, store).await;
    Ok(())
}

/// Accept connections on `listener` forever.
pub async fn serve(listener: TcpListener, store: TaskStore) {
    let store = Arc::new(Mutex::new(store));

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let store = Arc::clone(&store);
                tokio::spawn(handle_connection(stream, addr, store));
            }
            Err(e) => {
                warn!(error = %e, "failed to accept connection");
            }
        }
    }
}

/// Answer requests on one WebSocket connection until it closes.
async fn handle_connection(stream: TcpStream, addr: SocketAddr, store: SharedStore) {
    let mut ws = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!(%addr, error = %e, "WebSocket handshake failed");
            return;
        }
    };
    debug!(%addr, "connection opened");

    while let Some(msg) = ws.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Err(e) => {
                debug!(%addr, error = %e, "connection error");
                break;
            }
            _ => continue,
        };

        let reply = match serde_json::from_str::<ClientMessage>(text.as_str()) {
            Ok(request) => store.lock().await.handle(request).await,
            Err(e) => ServerMessage::Rejected {
                reason: format!("malformed request: {}", e),
            },
        };

        let json = match serde_json::to_string(&reply) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to encode reply");
                break;
            }
        };
        if ws.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }

    debug!(%addr, "connection closed");
}
