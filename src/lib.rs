//! # chatsync
//!
//! Client-side synchronization engine for a real-time chat: optimistic
//! message sends with order-independent reconciliation, a merged
//! conversation list with unread tracking, live presence, and a
//! pinned-to-bottom scroll policy. UI-framework agnostic; hosts drive
//! the stores and render their snapshots.
//!
//! The [`net`] layer owns the wire: typed events, the shared per-session
//! connection with subscribe/unsubscribe dispatch, room membership
//! signaling, and a WebSocket transport. The [`state`] layer holds what
//! the UI shows: the open chat's message timeline, the conversation
//! list, presence records, and scroll geometry. [`session::ChatSession`]
//! wires the two together for the common single-open-chat flow.

pub mod config;
pub mod model;
pub mod net;
pub mod session;
pub mod state;
