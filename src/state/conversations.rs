//! Conversation list: ordering, merge, unread and preview derivation.
//!
//! DESIGN
//! ======
//! The list store owns conversation metadata and is the only writer of
//! unread counts; each open chat's message timeline is owned by its
//! [`crate::state::messages::MessageStore`]. Incoming chat payloads are
//! merged field-shallow: present fields win, absent optional fields keep
//! what the list already had. `upsert` concatenates message sequences and
//! prepends unknown chats; `update` only ever touches an existing entry.
//!
//! Derivations (`unread_count`, `last_message_preview`,
//! `format_message_date`) are read-only and safe for any chat value, not
//! just list members.

use time::OffsetDateTime;
use time::macros::format_description;
use tracing::debug;

use crate::model::{Conversation, Message, now_ms};

/// Preview text is clipped to this many characters before the ellipsis.
const PREVIEW_MAX_CHARS: usize = 30;

#[derive(Debug, Default)]
pub struct ConversationList {
    current_user_id: String,
    chats: Vec<Conversation>,
    query: String,
}

impl ConversationList {
    #[must_use]
    pub fn new(current_user_id: &str) -> Self {
        Self {
            current_user_id: current_user_id.to_owned(),
            chats: Vec::new(),
            query: String::new(),
        }
    }

    /// Replace the list with fetched conversations, in server order.
    pub fn hydrate(&mut self, chats: Vec<Conversation>) {
        self.chats = chats;
    }

    #[must_use]
    pub fn chats(&self) -> &[Conversation] {
        &self.chats
    }

    // ========================================================================
    // FILTERING
    // ========================================================================

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Chats matching the current query, in list order. An empty query is
    /// the identity transform. Matching is a case-insensitive substring
    /// check against the participant name, the property name, and the
    /// latest message's content.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Conversation> {
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return self.chats.iter().collect();
        }
        self.chats
            .iter()
            .filter(|chat| Self::matches(chat, &query))
            .collect()
    }

    fn matches(chat: &Conversation, query: &str) -> bool {
        if chat.participant.name.to_lowercase().contains(query) {
            return true;
        }
        if chat
            .property
            .as_ref()
            .is_some_and(|property| property.name.to_lowercase().contains(query))
        {
            return true;
        }
        latest_of(chat).is_some_and(|message| message.content.to_lowercase().contains(query))
    }

    // ========================================================================
    // MERGING
    // ========================================================================

    /// Merge `incoming` into the existing entry with the same id,
    /// concatenating message sequences (existing first); unknown chats are
    /// prepended as the newest conversation.
    pub fn upsert(&mut self, incoming: Conversation) {
        match self.chats.iter_mut().find(|chat| chat.id == incoming.id) {
            Some(existing) => {
                debug!(chat_id = %existing.id, "merging chat into list");
                let incoming_messages = merge_fields(existing, incoming);
                existing.messages.extend(incoming_messages);
            }
            None => {
                debug!(chat_id = %incoming.id, "prepending new chat");
                self.chats.insert(0, incoming);
            }
        }
    }

    /// Merge `incoming` into the matching entry only; a non-empty incoming
    /// message sequence replaces the existing one. Unknown ids are ignored.
    pub fn update(&mut self, incoming: Conversation) {
        let Some(existing) = self.chats.iter_mut().find(|chat| chat.id == incoming.id) else {
            debug!(chat_id = %incoming.id, "update for unknown chat, ignoring");
            return;
        };
        let incoming_messages = merge_fields(existing, incoming);
        if !incoming_messages.is_empty() {
            existing.messages = incoming_messages;
        }
    }

    // ========================================================================
    // READ STATE
    // ========================================================================

    /// Zero the explicit unread count and flip `is_read` on every message
    /// not authored by the current user, in that conversation only.
    pub fn mark_as_read(&mut self, chat_id: &str) {
        let Some(chat) = self.chats.iter_mut().find(|chat| chat.id == chat_id) else {
            debug!(chat_id, "mark_as_read for unknown chat, ignoring");
            return;
        };
        chat.unread_count = Some(0);
        for message in &mut chat.messages {
            if message.sender_id != self.current_user_id {
                message.is_read = true;
            }
        }
    }

    /// The server's explicit count when present, otherwise the number of
    /// unread messages from other senders.
    #[must_use]
    pub fn unread_count(&self, chat: &Conversation) -> u32 {
        if let Some(explicit) = chat.unread_count {
            return explicit;
        }
        let derived = chat
            .messages
            .iter()
            .filter(|message| message.sender_id != self.current_user_id && !message.is_read)
            .count();
        u32::try_from(derived).unwrap_or(u32::MAX)
    }

    // ========================================================================
    // DISPLAY DERIVATIONS
    // ========================================================================

    /// One-line preview of the newest message: clipped content, prefixed
    /// with "You: " for own messages, empty when there are none.
    #[must_use]
    pub fn last_message_preview(&self, chat: &Conversation) -> String {
        let Some(source) = latest_of(chat) else {
            return String::new();
        };
        let preview = clip_preview(&source.content);
        if source.sender_id == self.current_user_id {
            format!("You: {preview}")
        } else {
            preview
        }
    }
}

/// The message a list row represents: the cached latest message when the
/// server provided one, else the tail of the sequence.
fn latest_of(chat: &Conversation) -> Option<&Message> {
    chat.latest_message.as_ref().or_else(|| chat.messages.last())
}

/// Move every present field of `incoming` onto `existing` and hand the
/// incoming messages back for the caller to place.
fn merge_fields(existing: &mut Conversation, incoming: Conversation) -> Vec<Message> {
    let Conversation {
        participant,
        property,
        messages,
        latest_message,
        updated_at,
        unread_count,
        ..
    } = incoming;
    existing.participant = participant;
    if let Some(property) = property {
        existing.property = Some(property);
    }
    if let Some(latest) = latest_message {
        existing.latest_message = Some(latest);
    }
    if let Some(updated_at) = updated_at {
        existing.updated_at = Some(updated_at);
    }
    if let Some(unread) = unread_count {
        existing.unread_count = Some(unread);
    }
    messages
}

fn clip_preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_MAX_CHARS {
        return content.to_owned();
    }
    let head: String = content.chars().take(PREVIEW_MAX_CHARS).collect();
    format!("{head}...")
}

/// Render a timestamp for a list row: clock time today, month and day
/// within the current year, numeric date otherwise. All in UTC.
#[must_use]
pub fn format_message_date(timestamp: i64) -> String {
    format_message_date_at(timestamp, now_ms())
}

fn format_message_date_at(timestamp: i64, now: i64) -> String {
    let Ok(moment) = OffsetDateTime::from_unix_timestamp_nanos(i128::from(timestamp) * 1_000_000)
    else {
        return String::new();
    };
    let Ok(today) = OffsetDateTime::from_unix_timestamp_nanos(i128::from(now) * 1_000_000) else {
        return String::new();
    };

    let format = if moment.date() == today.date() {
        format_description!("[hour]:[minute]")
    } else if moment.year() == today.year() {
        format_description!("[month repr:short] [day padding:none]")
    } else {
        format_description!("[month padding:none]/[day padding:none]/[year repr:last_two]")
    };
    // These descriptions cannot fail for a valid timestamp.
    moment.format(format).unwrap_or_default()
}

#[cfg(test)]
#[path = "conversations_test.rs"]
mod tests;
