//! Single shared connection to the chat server.
//!
//! DESIGN
//! ======
//! One [`Connection`] per signed-in user. It owns the transport, hands out
//! subscription ids for typed event callbacks, and pushes outbound events
//! best-effort. Every operation is a silent no-op while disconnected so
//! callers never branch on connectivity.
//!
//! There is no reconnect policy. When the peer closes the socket the
//! connection stays down until `connect` is called again; registered
//! handlers survive a peer close but not an explicit `disconnect`.
//!
//! Callbacks run on whatever task drives [`Connection::pump_one`], in
//! registration order, and must not call back into the connection.

use std::collections::HashMap;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::event::{ClientEvent, EventKind, ServerEvent};
use super::transport::Transport;

/// Handle returned by [`Connection::subscribe`]. Callers keep it and pair
/// every subscribe with an unsubscribe for the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

type Callback = Box<dyn FnMut(&ServerEvent) + Send>;

struct Handler {
    id: SubscriptionId,
    callback: Callback,
}

#[derive(Default)]
pub struct Connection {
    transport: Option<Box<dyn Transport>>,
    token: Option<String>,
    handlers: HashMap<EventKind, Vec<Handler>>,
}

impl Connection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Adopt `transport` for `token`, returning whether it was adopted.
    /// Connecting again with the same token is a no-op (the provided
    /// transport is dropped); a different token tears the old connection
    /// down first, handlers included.
    pub fn connect(&mut self, transport: Box<dyn Transport>, token: &str) -> bool {
        if self.transport.is_some() {
            if self.token.as_deref() == Some(token) {
                debug!("connect ignored: already connected with this token");
                return false;
            }
            info!("token changed, replacing connection");
            self.disconnect();
        }
        self.transport = Some(transport);
        self.token = Some(token.to_owned());
        info!("connected");
        true
    }

    /// Drop the transport and every registered handler.
    pub fn disconnect(&mut self) {
        if self.transport.take().is_some() {
            info!("disconnected");
        }
        self.token = None;
        self.handlers.clear();
    }

    // ========================================================================
    // SUBSCRIPTIONS
    // ========================================================================

    /// Register `callback` for events of `kind`. Returns `None` while
    /// disconnected.
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> Option<SubscriptionId>
    where
        F: FnMut(&ServerEvent) + Send + 'static,
    {
        if self.transport.is_none() {
            debug!(?kind, "subscribe ignored: not connected");
            return None;
        }
        let id = SubscriptionId(Uuid::new_v4());
        self.handlers
            .entry(kind)
            .or_default()
            .push(Handler { id, callback: Box::new(callback) });
        Some(id)
    }

    /// Remove one handler. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, kind: EventKind, id: SubscriptionId) {
        if let Some(handlers) = self.handlers.get_mut(&kind) {
            handlers.retain(|handler| handler.id != id);
            if handlers.is_empty() {
                self.handlers.remove(&kind);
            }
        }
    }

    // ========================================================================
    // TRAFFIC
    // ========================================================================

    /// Push one event to the server, best-effort. Failures are logged, not
    /// surfaced; disconnected is a silent no-op.
    pub async fn emit(&mut self, event: ClientEvent) {
        let Some(transport) = self.transport.as_mut() else {
            debug!(?event, "emit ignored: not connected");
            return;
        };
        if let Err(error) = transport.send(event).await {
            warn!(%error, "failed to push event");
        }
    }

    /// Receive and dispatch one inbound event. Returns `false` once the
    /// peer has closed the socket (the transport is dropped) or while
    /// disconnected.
    pub async fn pump_one(&mut self) -> bool {
        let Some(transport) = self.transport.as_mut() else {
            return false;
        };
        let Some(event) = transport.recv().await else {
            info!("server closed the connection");
            self.transport = None;
            return false;
        };
        self.dispatch(&event);
        true
    }

    /// Dispatch inbound events until the peer closes the socket.
    pub async fn pump(&mut self) {
        while self.pump_one().await {}
    }

    fn dispatch(&mut self, event: &ServerEvent) {
        if let ServerEvent::Error { message } = event {
            warn!(%message, "server reported an error");
        }
        if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
            for handler in &mut *handlers {
                (handler.callback)(event);
            }
        }
    }
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
