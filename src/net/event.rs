//! Wire events exchanged with the chat server.
//!
//! DESIGN
//! ======
//! Every payload on the socket is a JSON object of the shape
//! `{"event": "...", "data": {...}}`. Inbound (server to client) and
//! outbound (client to server) vocabularies are separate enums so the
//! compiler rejects sending a server-only event and vice versa.
//!
//! Decoding is strict: an unknown event name or a malformed payload is
//! a [`CodecError`], and the transport drops the frame after logging it.
//! Unknown trailing fields inside `data` are tolerated so the server
//! can grow its payloads without breaking older clients.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Conversation, Message};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed event payload: {0}")]
    Decode(#[from] serde_json::Error),
}

// ============================================================================
// SERVER -> CLIENT
// ============================================================================

/// Events pushed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A message arrived in a chat this client has joined.
    NewMessage { message: Message },
    /// Conversation metadata changed (new latest message, unread count).
    ChatUpdated { chat: Conversation },
    /// A user's presence flipped. `last_seen` accompanies offline flips.
    #[serde(rename_all = "camelCase")]
    UserStatusChanged {
        user_id: String,
        is_online: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        last_seen: Option<i64>,
    },
    /// Server-side failure report. Informational only.
    Error { message: String },
}

impl ServerEvent {
    /// Decode one inbound text frame.
    pub fn decode(text: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode for the wire. Used by loopback test servers.
    #[must_use]
    pub fn encode(&self) -> String {
        // Derived Serialize on these types cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Subscription category this event dispatches under.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::NewMessage { .. } => EventKind::NewMessage,
            Self::ChatUpdated { .. } => EventKind::ChatUpdated,
            Self::UserStatusChanged { .. } => EventKind::UserStatusChanged,
            Self::Error { .. } => EventKind::Error,
        }
    }
}

/// Dispatch category for [`ServerEvent`] subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    NewMessage,
    ChatUpdated,
    UserStatusChanged,
    Error,
}

// ============================================================================
// CLIENT -> SERVER
// ============================================================================

/// Events this client sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Start receiving `new_message` events for a chat.
    #[serde(rename_all = "camelCase")]
    JoinChat { chat_id: String },
    /// Stop receiving `new_message` events for a chat.
    #[serde(rename_all = "camelCase")]
    LeaveChat { chat_id: String },
    /// Announce this client's own presence.
    #[serde(rename_all = "camelCase")]
    UpdateStatus { is_online: bool },
}

impl ClientEvent {
    /// Encode for the wire.
    #[must_use]
    pub fn encode(&self) -> String {
        // Derived Serialize on these types cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode one outbound text frame. Used by loopback test servers.
    pub fn decode(text: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;
