//! Message timeline for the open chat.
//!
//! DESIGN
//! ======
//! One store per open chat. Sends are optimistic: the message appears
//! immediately as pending, then settles to confirmed or failed when the
//! server answers. Sends are serialized per chat, at most one in flight.
//!
//! Inbound copies go through `add_message`, which applies three rules in
//! order so a message can arrive as the local ack, the room echo, or
//! both, in either order, and land in the timeline exactly once:
//!   1. an id already present drops;
//!   2. same content and sender within the dedup window drops;
//!   3. same content and sender matching a pending entry replaces it in
//!      place, window ignored.
//! Anything else appends. Arrival order is trusted, nothing re-sorts.
//!
//! Matching runs on two indexes kept beside the vec, id to position and
//! (sender, content) to positions. Entries are only ever appended or
//! replaced in place, so positions stay stable and the indexes only
//! change where the timeline does.
//!
//! The store is a cheap-clone handle over shared inner state so the
//! dispatch task and the sending task see the same timeline. The inner
//! lock is never held across an await. The change listener runs with
//! only the listener slot locked and must not call back into the store;
//! a nested store call would re-enter that lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::SyncConfig;
use crate::model::{Delivery, Message};
use crate::net::transport::{MessageSender, TransportError};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum SendError {
    #[error("message content is empty")]
    EmptyContent,
    #[error("a send is already in flight for this chat")]
    InFlight,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

// ============================================================================
// CHANGE NOTIFICATIONS
// ============================================================================

/// What just changed, pushed to the registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    /// A message was appended to the end of the timeline.
    Appended,
    /// An existing message changed in place (settled, failed, marked read).
    Updated,
    /// The whole timeline was replaced.
    Reset,
}

type ChangeListener = Box<dyn FnMut(StoreChange) + Send>;

// ============================================================================
// STORE
// ============================================================================

/// Dedup identity of a message apart from its id.
type Fingerprint = (String, String);

struct Inner {
    chat_id: String,
    current_user_id: String,
    dedup_window_ms: i64,
    messages: Vec<Message>,
    by_id: HashMap<String, usize>,
    by_fingerprint: HashMap<Fingerprint, Vec<usize>>,
    sending: bool,
}

#[derive(Clone)]
pub struct MessageStore {
    inner: Arc<Mutex<Inner>>,
    listener: Arc<Mutex<Option<ChangeListener>>>,
    sender: Arc<dyn MessageSender>,
}

impl MessageStore {
    #[must_use]
    pub fn new(
        chat_id: &str,
        current_user_id: &str,
        sender: Arc<dyn MessageSender>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                chat_id: chat_id.to_owned(),
                current_user_id: current_user_id.to_owned(),
                dedup_window_ms: config.dedup_window_ms,
                messages: Vec::new(),
                by_id: HashMap::new(),
                by_fingerprint: HashMap::new(),
                sending: false,
            })),
            listener: Arc::new(Mutex::new(None)),
            sender,
        }
    }

    #[must_use]
    pub fn chat_id(&self) -> String {
        self.lock_inner().chat_id.clone()
    }

    /// Snapshot of the timeline in display order.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.lock_inner().messages.clone()
    }

    /// True while a send is in flight for this chat.
    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.lock_inner().sending
    }

    // ========================================================================
    // SENDING
    // ========================================================================

    /// Send `content`, inserting a pending entry before the network round
    /// trip and settling it from the response. Rejects empty content and
    /// overlapping sends before touching the timeline; transport failures
    /// leave the entry visible as failed and propagate to the caller.
    pub async fn send_message(&self, content: &str) -> Result<(), SendError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(SendError::EmptyContent);
        }

        let temp_id = format!("temp-{}", Uuid::new_v4());
        let chat_id = {
            let mut inner = self.lock_inner();
            if inner.sending {
                return Err(SendError::InFlight);
            }
            inner.sending = true;
            let optimistic = Message::optimistic(&temp_id, &inner.current_user_id, content);
            inner.append(optimistic);
            inner.chat_id.clone()
        };
        self.notify(StoreChange::Appended);

        let result = self.sender.send(&chat_id, content).await;

        let change = {
            let mut inner = self.lock_inner();
            inner.sending = false;
            match &result {
                Ok(confirmed) => inner.settle(&temp_id, confirmed.clone()),
                Err(error) => {
                    warn!(chat_id = %inner.chat_id, %error, "message send failed");
                    inner.fail(&temp_id)
                }
            }
        };
        if let Some(change) = change {
            self.notify(change);
        }

        result.map(|_| ()).map_err(SendError::from)
    }

    // ========================================================================
    // INBOUND
    // ========================================================================

    /// Insert an inbound copy, reconciling against what is already here.
    pub fn add_message(&self, incoming: Message) {
        let change = {
            let mut inner = self.lock_inner();
            inner.reconcile(incoming)
        };
        if let Some(change) = change {
            self.notify(change);
        }
    }

    /// Replace the timeline with fetched history.
    pub fn hydrate(&self, messages: Vec<Message>) {
        {
            let mut inner = self.lock_inner();
            inner.messages = messages;
            inner.rebuild_indexes();
        }
        self.notify(StoreChange::Reset);
    }

    /// Flip `is_read` on every message not authored by the current user.
    pub fn mark_all_read(&self) {
        let changed = {
            let mut guard = self.lock_inner();
            let inner = &mut *guard;
            let mut changed = false;
            for message in &mut inner.messages {
                if message.sender_id != inner.current_user_id && !message.is_read {
                    message.is_read = true;
                    changed = true;
                }
            }
            changed
        };
        if changed {
            self.notify(StoreChange::Updated);
        }
    }

    // ========================================================================
    // LISTENER
    // ========================================================================

    /// Register the single change listener, replacing any previous one.
    /// The callback runs under the listener lock, so it must not call
    /// back into the store.
    pub fn set_change_listener<F>(&self, listener: F)
    where
        F: FnMut(StoreChange) + Send + 'static,
    {
        *self.lock_listener() = Some(Box::new(listener));
    }

    pub fn clear_change_listener(&self) {
        *self.lock_listener() = None;
    }

    fn notify(&self, change: StoreChange) {
        if let Some(listener) = self.lock_listener().as_mut() {
            listener(change);
        }
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listener(&self) -> MutexGuard<'_, Option<ChangeListener>> {
        self.listener.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inner {
    fn reconcile(&mut self, incoming: Message) -> Option<StoreChange> {
        let window = self.dedup_window_ms;

        if self.by_id.contains_key(&incoming.id) {
            debug!(id = %incoming.id, "duplicate id, dropping");
            return None;
        }

        let peers: Vec<usize> =
            self.by_fingerprint.get(&fingerprint(&incoming)).cloned().unwrap_or_default();

        if peers
            .iter()
            .any(|&i| (incoming.timestamp - self.messages[i].timestamp).abs() <= window)
        {
            debug!(id = %incoming.id, "near-duplicate within window, dropping");
            return None;
        }

        if let Some(index) = peers.iter().copied().find(|&i| self.messages[i].is_optimistic()) {
            debug!(id = %incoming.id, "replacing pending entry with confirmed copy");
            self.replace(index, incoming);
            return Some(StoreChange::Updated);
        }

        self.append(incoming);
        Some(StoreChange::Appended)
    }

    fn settle(&mut self, temp_id: &str, confirmed: Message) -> Option<StoreChange> {
        let Some(&index) = self.by_id.get(temp_id) else {
            // The room echo landed first and already took this entry's place.
            debug!(temp_id, "pending entry already settled");
            return None;
        };
        self.replace(index, confirmed);
        Some(StoreChange::Updated)
    }

    fn fail(&mut self, temp_id: &str) -> Option<StoreChange> {
        let index = *self.by_id.get(temp_id)?;
        self.messages[index].delivery = Delivery::Failed;
        Some(StoreChange::Updated)
    }

    fn append(&mut self, message: Message) {
        let index = self.messages.len();
        self.by_id.insert(message.id.clone(), index);
        self.by_fingerprint.entry(fingerprint(&message)).or_default().push(index);
        self.messages.push(message);
    }

    fn replace(&mut self, index: usize, incoming: Message) {
        let old_id = self.messages[index].id.clone();
        let old_key = fingerprint(&self.messages[index]);
        let new_key = fingerprint(&incoming);
        self.by_id.remove(&old_id);
        self.by_id.insert(incoming.id.clone(), index);
        if old_key != new_key {
            if let Some(positions) = self.by_fingerprint.get_mut(&old_key) {
                positions.retain(|&i| i != index);
                if positions.is_empty() {
                    self.by_fingerprint.remove(&old_key);
                }
            }
            self.by_fingerprint.entry(new_key).or_default().push(index);
        }
        self.messages[index] = incoming;
    }

    fn rebuild_indexes(&mut self) {
        self.by_id.clear();
        self.by_fingerprint.clear();
        for (index, message) in self.messages.iter().enumerate() {
            self.by_id.insert(message.id.clone(), index);
            self.by_fingerprint.entry(fingerprint(message)).or_default().push(index);
        }
    }
}

fn fingerprint(message: &Message) -> Fingerprint {
    (message.sender_id.clone(), message.content.clone())
}

#[cfg(test)]
#[path = "messages_test.rs"]
mod tests;
