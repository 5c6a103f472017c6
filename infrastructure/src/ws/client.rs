//! WebSocket session client implementing the streaming port over
//! `tokio-tungstenite`.
//!
//! One connection per session. On open the initial payload is sent as a
//! single text frame (the only client-to-server message of the whole
//! session); a spawned reader task then owns the socket, decoding inbound
//! frames into stream events until a terminal frame, a transport failure,
//! a close, or caller cancellation, and releases the connection on every
//! one of those exit paths.

use async_trait::async_trait;
use council_application::ports::streaming::{
    OpenRequest, SessionConnector, SessionSubscription, StreamError,
};
use council_domain::{Phase, StreamEvent};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::protocol;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Buffered events between the reader task and the subscriber.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Opens streaming sessions against the board service.
pub struct WsSessionConnector {
    ws_base: String,
}

impl WsSessionConnector {
    /// `base_url` is the service's HTTP base (e.g. `http://localhost:8000`);
    /// the WebSocket scheme is derived from it.
    pub fn new(base_url: &str) -> Self {
        Self {
            ws_base: ws_base_from(base_url),
        }
    }

    fn endpoint(&self, phase: Phase) -> String {
        match phase {
            Phase::Deliberation => format!("{}/ws/board", self.ws_base),
            Phase::Execution => format!("{}/ws/execution", self.ws_base),
        }
    }
}

fn ws_base_from(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if let Some(rest) = trimmed.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = trimmed.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl SessionConnector for WsSessionConnector {
    async fn open(&self, request: OpenRequest) -> Result<SessionSubscription, StreamError> {
        let endpoint = self.endpoint(request.phase());
        debug!("Connecting to {endpoint}");

        let (mut socket, _) =
            connect_async(&endpoint)
                .await
                .map_err(|e| StreamError::Connect {
                    endpoint: endpoint.clone(),
                    message: e.to_string(),
                })?;

        let payload = serde_json::to_string(&request)
            .map_err(|e| StreamError::Handshake(e.to_string()))?;
        socket
            .send(Message::Text(payload.into()))
            .await
            .map_err(|e| StreamError::Handshake(e.to_string()))?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        tokio::spawn(read_loop(socket, tx, cancel.clone()));

        Ok(SessionSubscription::new(rx, cancel))
    }
}

/// Pump inbound frames to the subscriber until the session ends, then
/// release the socket.
async fn read_loop(
    mut socket: WsStream,
    tx: mpsc::Sender<StreamEvent>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Session closed by caller");
                break;
            }
            frame = socket.next() => match frame {
                Some(Ok(Message::Text(raw))) => match protocol::parse_frame(raw.as_str()) {
                    Ok(server_frame) => {
                        let event = server_frame.into_event();
                        let terminal = event.is_terminal();
                        if tx.send(event).await.is_err() {
                            // Subscriber discarded the session.
                            break;
                        }
                        if terminal {
                            // No further events follow a terminal frame.
                            break;
                        }
                    }
                    Err(e) => warn!("Dropping malformed frame: {e}"),
                },
                Some(Ok(Message::Close(_))) => {
                    // Clean close with no terminal frame: end the event
                    // stream without a terminal event and let the phase
                    // decide what that means.
                    debug!("Server closed the stream");
                    break;
                }
                Some(Ok(_)) => {} // ping/pong/binary: nothing to decode
                Some(Err(e)) => {
                    let _ = tx
                        .send(StreamEvent::Error(format!("connection error: {e}")))
                        .await;
                    break;
                }
                None => {
                    // Dropped without a close handshake.
                    let _ = tx
                        .send(StreamEvent::Error(
                            "connection dropped before completion".to_string(),
                        ))
                        .await;
                    break;
                }
            }
        }
    }

    // Exactly-once release: the reader task owns the socket, and every
    // branch above falls through to here.
    if let Err(e) = socket.close(None).await {
        debug!("Socket close: {e}");
    }
}
