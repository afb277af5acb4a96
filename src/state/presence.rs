//! Presence bookkeeping for chat participants.
//!
//! DESIGN
//! ======
//! Last write wins: the newest status event wholly replaces a user's
//! record, no clock comparison. The tracker is the live source of
//! presence; the `is_online` flag embedded in conversation payloads is
//! a snapshot from fetch time and goes stale.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::model::PresenceRecord;
use crate::net::connection::Connection;
use crate::net::event::{ClientEvent, ServerEvent};

#[derive(Debug, Default)]
pub struct PresenceTracker {
    records: HashMap<String, PresenceRecord>,
}

impl PresenceTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a status flip. Events without a user id are dropped.
    pub fn apply(&mut self, user_id: &str, is_online: bool, last_seen: Option<i64>) {
        if user_id.is_empty() {
            warn!("presence event without a user id, dropping");
            return;
        }
        debug!(user_id, is_online, "presence updated");
        self.records
            .insert(user_id.to_owned(), PresenceRecord { is_online, last_seen });
    }

    /// Feed one inbound event. Non-presence events are ignored.
    pub fn observe(&mut self, event: &ServerEvent) {
        if let ServerEvent::UserStatusChanged { user_id, is_online, last_seen } = event {
            self.apply(user_id, *is_online, *last_seen);
        }
    }

    #[must_use]
    pub fn get(&self, user_id: &str) -> Option<&PresenceRecord> {
        self.records.get(user_id)
    }

    /// Unknown users read as offline.
    #[must_use]
    pub fn is_online(&self, user_id: &str) -> bool {
        self.records.get(user_id).is_some_and(|record| record.is_online)
    }

    #[must_use]
    pub fn last_seen(&self, user_id: &str) -> Option<i64> {
        self.records.get(user_id).and_then(|record| record.last_seen)
    }
}

/// Announce this client's own presence. No-op while disconnected.
pub async fn announce(conn: &mut Connection, is_online: bool) {
    conn.emit(ClientEvent::UpdateStatus { is_online }).await;
}

#[cfg(test)]
#[path = "presence_test.rs"]
mod tests;
