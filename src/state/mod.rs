//! Client-side state stores fed by the connection: the open chat's
//! message timeline, the conversation list, presence, and the scroll
//! pin policy.

pub mod conversations;
pub mod messages;
pub mod presence;
pub mod scroll;
