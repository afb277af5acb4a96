//! Session facade wiring the connection to the state stores.
//!
//! DESIGN
//! ======
//! One [`ChatSession`] per signed-in user. It owns the connection, keeps
//! the conversation list and presence tracker fed for the whole session,
//! and manages the single open chat: opening one closes the previous
//! (unsubscribe and room leave first, then subscribe and join), so
//! handlers never stack across view changes.
//!
//! `new_message` traffic is scoped server-side by room membership; the
//! session keeps exactly one room joined, so the open chat's store is
//! the only consumer. Room membership dies with the socket, so every
//! adopted transport starts with no open chat and freshly wired
//! handlers; callers reopen the chat they want on the new connection.
//!
//! The session itself is single-owner. The stores it hands out are
//! shared handles, safe to read from other tasks while
//! [`ChatSession::pump`] runs.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::SyncConfig;
use crate::net::connection::{Connection, SubscriptionId};
use crate::net::event::{EventKind, ServerEvent};
use crate::net::rooms;
use crate::net::transport::{MessageSender, Transport};
use crate::state::conversations::ConversationList;
use crate::state::messages::MessageStore;
use crate::state::presence::{self, PresenceTracker};

struct ActiveChat {
    chat_id: String,
    store: MessageStore,
    new_message_sub: Option<SubscriptionId>,
}

pub struct ChatSession {
    config: SyncConfig,
    current_user_id: String,
    conn: Connection,
    sender: Arc<dyn MessageSender>,
    conversations: Arc<Mutex<ConversationList>>,
    presence: Arc<Mutex<PresenceTracker>>,
    active: Option<ActiveChat>,
    session_subs: Vec<(EventKind, SubscriptionId)>,
}

impl ChatSession {
    #[must_use]
    pub fn new(current_user_id: &str, sender: Arc<dyn MessageSender>, config: SyncConfig) -> Self {
        Self {
            config,
            current_user_id: current_user_id.to_owned(),
            conn: Connection::new(),
            sender,
            conversations: Arc::new(Mutex::new(ConversationList::new(current_user_id))),
            presence: Arc::new(Mutex::new(PresenceTracker::new())),
            active: None,
            session_subs: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.conn.is_connected()
    }

    /// Shared handle to the conversation list.
    #[must_use]
    pub fn conversations(&self) -> Arc<Mutex<ConversationList>> {
        Arc::clone(&self.conversations)
    }

    /// Shared handle to the presence tracker.
    #[must_use]
    pub fn presence(&self) -> Arc<Mutex<PresenceTracker>> {
        Arc::clone(&self.presence)
    }

    #[must_use]
    pub fn active_chat_id(&self) -> Option<String> {
        self.active.as_ref().map(|active| active.chat_id.clone())
    }

    /// Store handle for the currently open chat, if any.
    #[must_use]
    pub fn active_store(&self) -> Option<MessageStore> {
        self.active.as_ref().map(|active| active.store.clone())
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Adopt a transport for `token` and wire the session-wide handlers
    /// (conversation updates, presence). Reconnecting with the same token
    /// over a live connection is a no-op. Every adopted transport starts
    /// clean: subscriptions this session registered earlier are removed,
    /// handlers are wired exactly once, and any open chat is dropped for
    /// the caller to reopen.
    pub fn connect(&mut self, transport: Box<dyn Transport>, token: &str) {
        if !self.conn.connect(transport, token) {
            return;
        }
        // Connection-layer handlers survive a peer close; remove every
        // subscription this session holds before wiring fresh ones.
        for (kind, id) in self.session_subs.drain(..) {
            self.conn.unsubscribe(kind, id);
        }
        if let Some(active) = self.active.take() {
            if let Some(sub) = active.new_message_sub {
                self.conn.unsubscribe(EventKind::NewMessage, sub);
            }
        }
        self.wire_session_handlers();
    }

    /// Close the open chat and drop the connection. List and presence
    /// data stay in memory for the next connect.
    pub async fn disconnect(&mut self) {
        self.close_chat().await;
        self.conn.disconnect();
        self.session_subs.clear();
    }

    /// Receive and dispatch one inbound event. See
    /// [`Connection::pump_one`].
    pub async fn pump_one(&mut self) -> bool {
        self.conn.pump_one().await
    }

    /// Dispatch inbound events until the peer closes the socket.
    pub async fn pump(&mut self) {
        self.conn.pump().await;
    }

    /// Announce this client's own presence.
    pub async fn announce_presence(&mut self, is_online: bool) {
        presence::announce(&mut self.conn, is_online).await;
    }

    // ========================================================================
    // OPEN CHAT
    // ========================================================================

    /// Open `chat_id`: close the previous chat, subscribe its message
    /// feed, join its room, and return the store to drive the view with.
    /// While disconnected the store still works locally and nothing is
    /// emitted.
    pub async fn open_chat(&mut self, chat_id: &str) -> MessageStore {
        self.close_chat().await;

        let store = MessageStore::new(
            chat_id,
            &self.current_user_id,
            Arc::clone(&self.sender),
            &self.config,
        );
        let feed = store.clone();
        let new_message_sub = self.conn.subscribe(EventKind::NewMessage, move |event| {
            if let ServerEvent::NewMessage { message } = event {
                feed.add_message(message.clone());
            }
        });
        rooms::join(&mut self.conn, chat_id).await;

        self.active = Some(ActiveChat {
            chat_id: chat_id.to_owned(),
            store: store.clone(),
            new_message_sub,
        });
        store
    }

    /// Tear down the open chat: unsubscribe its feed, leave its room.
    pub async fn close_chat(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        if let Some(sub) = active.new_message_sub {
            self.conn.unsubscribe(EventKind::NewMessage, sub);
        }
        rooms::leave(&mut self.conn, &active.chat_id).await;
    }

    // ========================================================================
    // WIRING
    // ========================================================================

    fn wire_session_handlers(&mut self) {
        let conversations = Arc::clone(&self.conversations);
        if let Some(id) = self.conn.subscribe(EventKind::ChatUpdated, move |event| {
            if let ServerEvent::ChatUpdated { chat } = event {
                lock(&conversations).upsert(chat.clone());
            }
        }) {
            self.session_subs.push((EventKind::ChatUpdated, id));
        }

        let presence = Arc::clone(&self.presence);
        if let Some(id) = self.conn.subscribe(EventKind::UserStatusChanged, move |event| {
            lock(&presence).observe(event);
        }) {
            self.session_subs.push((EventKind::UserStatusChanged, id));
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
