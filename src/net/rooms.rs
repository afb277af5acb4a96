//! Chat room membership signaling.
//!
//! DESIGN
//! ======
//! Joining a room tells the server to start streaming `new_message`
//! events for that chat; leaving stops the stream. Both are
//! fire-and-forget and silently no-op while disconnected, like the rest
//! of the event surface. Pairing join with leave is the caller's job;
//! [`crate::session::ChatSession`] does it when switching chats.

use tracing::debug;

use super::connection::Connection;
use super::event::ClientEvent;

/// Ask the server to stream messages for `chat_id`.
pub async fn join(conn: &mut Connection, chat_id: &str) {
    debug!(chat_id, "joining chat room");
    conn.emit(ClientEvent::JoinChat { chat_id: chat_id.to_owned() }).await;
}

/// Stop the message stream for `chat_id`.
pub async fn leave(conn: &mut Connection, chat_id: &str) {
    debug!(chat_id, "leaving chat room");
    conn.emit(ClientEvent::LeaveChat { chat_id: chat_id.to_owned() }).await;
}

#[cfg(test)]
#[path = "rooms_test.rs"]
mod tests;
