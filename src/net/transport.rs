//! Transport seams the sync engine talks through.
//!
//! DESIGN
//! ======
//! Two traits with distinct jobs. [`Transport`] is the bidirectional event
//! pipe (joined-room traffic, presence, conversation updates). The
//! production impl is [`super::ws::WsTransport`]; tests substitute
//! channel-backed fakes. [`MessageSender`] is the request/response path a
//! message send rides: it returns the server's confirmed copy of the
//! message, or fails. Keeping it separate from [`Transport`] lets hosts
//! back it with a plain HTTP call while events ride the socket.

use async_trait::async_trait;
use thiserror::Error;

use super::event::{ClientEvent, CodecError, ServerEvent};
use crate::model::Message;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("send failed: {0}")]
    Send(String),
    #[error("connection closed")]
    Closed,
    #[error(transparent)]
    Codec(#[from] CodecError),
}

// ============================================================================
// TRAITS
// ============================================================================

/// Bidirectional event pipe to the chat server.
#[async_trait]
pub trait Transport: Send {
    /// Push one event to the server.
    async fn send(&mut self, event: ClientEvent) -> Result<(), TransportError>;

    /// Wait for the next inbound event. `None` means the peer closed the
    /// socket; malformed frames are skipped, not surfaced here.
    async fn recv(&mut self) -> Option<ServerEvent>;
}

/// Request/response seam a message send rides.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Deliver `content` to `chat_id`, returning the server's confirmed
    /// copy (authoritative id and timestamp).
    async fn send(&self, chat_id: &str, content: &str) -> Result<Message, TransportError>;
}

// ============================================================================
// TEST HELPERS
// ============================================================================

#[cfg(test)]
pub mod test_helpers {
    //! Channel-backed transport fake shared by connection, room and
    //! session tests.

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use super::{Transport, TransportError};
    use crate::net::event::{ClientEvent, ServerEvent};

    pub struct FakeTransport {
        outbound: mpsc::UnboundedSender<ClientEvent>,
        inbound: mpsc::UnboundedReceiver<ServerEvent>,
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn send(&mut self, event: ClientEvent) -> Result<(), TransportError> {
            self.outbound.send(event).map_err(|_| TransportError::Closed)
        }

        async fn recv(&mut self) -> Option<ServerEvent> {
            self.inbound.recv().await
        }
    }

    /// The server side of a [`FakeTransport`]: observe what the client
    /// sent, inject events for it to receive.
    pub struct FakeRemote {
        pub from_client: mpsc::UnboundedReceiver<ClientEvent>,
        pub to_client: mpsc::UnboundedSender<ServerEvent>,
    }

    #[must_use]
    pub fn fake_transport() -> (FakeTransport, FakeRemote) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let transport = FakeTransport { outbound: out_tx, inbound: in_rx };
        let remote = FakeRemote { from_client: out_rx, to_client: in_tx };
        (transport, remote)
    }
}
