//! Chat data model shared by the net layer and the state stores.
//!
//! DESIGN
//! ======
//! Timestamps are milliseconds since the Unix epoch throughout. Wire field
//! names are camelCase to match the chat backend's JSON. Local-only
//! delivery state rides on [`Message`] as a [`Delivery`] value defaulting
//! to `Confirmed`, so server payloads (which never carry it) deserialize
//! as already-confirmed messages.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// =============================================================================
// DELIVERY STATE
// =============================================================================

/// Per-message delivery lifecycle.
///
/// Every locally sent message starts `Pending` and settles to `Confirmed`
/// (acknowledged by the server, directly or via its broadcast) or `Failed`.
/// Both settled states are terminal; a failed message is resent as a brand
/// new pending entry under a fresh temporary id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
    /// Optimistic entry awaiting server acknowledgment.
    Pending,
    /// Acknowledged by the server under its authoritative id.
    #[default]
    Confirmed,
    /// The send was rejected or timed out; kept visible for retry.
    Failed,
}

// =============================================================================
// MESSAGE
// =============================================================================

/// A single chat message.
///
/// `id` is either the server's stable id or a process-unique `temp-` id for
/// an entry that has not been acknowledged yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender_id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub delivery: Delivery,
}

impl Message {
    /// Create a pending optimistic entry for a local send attempt.
    ///
    /// Own messages are born read; unread derivation only ever counts other
    /// senders.
    #[must_use]
    pub fn optimistic(
        id: impl Into<String>,
        sender_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            sender_id: sender_id.into(),
            timestamp: now_ms(),
            is_read: true,
            delivery: Delivery::Pending,
        }
    }

    /// Awaiting server acknowledgment.
    #[must_use]
    pub fn is_optimistic(&self) -> bool {
        self.delivery == Delivery::Pending
    }

    /// The send round-trip for this entry has not settled yet.
    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.delivery == Delivery::Pending
    }

    /// The send settled in error; the entry stays visible for retry.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.delivery == Delivery::Failed
    }
}

// =============================================================================
// CONVERSATION
// =============================================================================

/// The other party in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Presence snapshot from the server. The live source of truth is the
    /// presence tracker; this field is whatever the last payload carried.
    #[serde(default)]
    pub is_online: bool,
}

/// A listing the conversation is about, when it started from one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// One conversation as the list store tracks it.
///
/// `unread_count` is the server's explicit count when present; `None` means
/// "derive from the message sequence".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub participant: Participant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertyRef>,
    /// Messages in arrival order. Never re-sorted by timestamp.
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unread_count: Option<u32>,
}

// =============================================================================
// PRESENCE
// =============================================================================

/// Online/offline status plus last-seen for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRecord {
    pub is_online: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<i64>,
}

// =============================================================================
// HELPERS
// =============================================================================

/// Current time as milliseconds since the Unix epoch.
#[must_use]
pub(crate) fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;

    /// A confirmed message as the server would deliver it.
    #[must_use]
    pub fn incoming(id: &str, sender_id: &str, content: &str, timestamp: i64) -> Message {
        Message {
            id: id.into(),
            content: content.into(),
            sender_id: sender_id.into(),
            timestamp,
            is_read: false,
            delivery: Delivery::Confirmed,
        }
    }

    /// A participant with just an id and a display name.
    #[must_use]
    pub fn participant(id: &str, name: &str) -> Participant {
        Participant { id: id.into(), name: name.into(), photo: None, is_online: false }
    }

    /// A conversation with the given participant name and messages.
    #[must_use]
    pub fn conversation(id: &str, participant_name: &str, messages: Vec<Message>) -> Conversation {
        Conversation {
            id: id.into(),
            participant: participant(&format!("user-{id}"), participant_name),
            property: None,
            latest_message: messages.last().cloned(),
            messages,
            updated_at: None,
            unread_count: None,
        }
    }
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
