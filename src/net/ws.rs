//! WebSocket transport over tokio-tungstenite.
//!
//! DESIGN
//! ======
//! Thin adapter: one JSON text frame per event, both directions. The
//! handshake carries the auth token as an escaped `token` query
//! parameter, so opaque tokens with reserved characters survive the
//! dial. Malformed inbound frames are logged and skipped; `recv`
//! returns `None` only once the socket is gone. There is no reconnect
//! here, hosts build a fresh transport and hand it to the connection.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};
use url::Url;

use super::event::{ClientEvent, ServerEvent};
use super::transport::{Transport, TransportError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct WsTransport {
    stream: WsStream,
}

impl WsTransport {
    /// Open a socket to `url` (ws:// or wss://), authenticating with
    /// `token`.
    pub async fn connect(url: &str, token: &str) -> Result<Self, TransportError> {
        let url = handshake_url(url, token)?;
        let (stream, _) = connect_async(url.as_str())
            .await
            .map_err(|error| TransportError::Connect(error.to_string()))?;
        debug!("websocket open");
        Ok(Self { stream })
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&mut self, event: ClientEvent) -> Result<(), TransportError> {
        self.stream
            .send(Message::Text(event.encode().into()))
            .await
            .map_err(|error| TransportError::Send(error.to_string()))
    }

    async fn recv(&mut self) -> Option<ServerEvent> {
        loop {
            let message = self.stream.next().await?;
            match message {
                Ok(Message::Text(text)) => match ServerEvent::decode(&text) {
                    Ok(event) => return Some(event),
                    Err(error) => warn!(%error, "skipping malformed frame"),
                },
                Ok(Message::Close(_)) => return None,
                Ok(_) => {}
                Err(error) => {
                    warn!(%error, "websocket receive failed");
                    return None;
                }
            }
        }
    }
}

/// Attach the token as an escaped query parameter. Rejects URLs that do
/// not parse.
fn handshake_url(url: &str, token: &str) -> Result<Url, TransportError> {
    let mut url = Url::parse(url).map_err(|error| TransportError::Connect(error.to_string()))?;
    url.query_pairs_mut().append_pair("token", token);
    Ok(url)
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
