//! Transport-facing layer: wire events, the session connection, room
//! signaling, and the bundled WebSocket adapter.

pub mod connection;
pub mod event;
pub mod rooms;
pub mod transport;
pub mod ws;
