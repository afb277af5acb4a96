use serde_json::{Value, json};

use super::{ClientEvent, EventKind, ServerEvent};
use crate::model::Delivery;

// ============================================================================
// SERVER EVENT DECODING
// ============================================================================

#[test]
fn decodes_new_message() {
    let text = json!({
        "event": "new_message",
        "data": {
            "message": {
                "id": "m1",
                "content": "hello",
                "senderId": "user-2",
                "timestamp": 1_700_000_000_000_i64,
            }
        }
    })
    .to_string();

    let event = ServerEvent::decode(&text).unwrap();
    let ServerEvent::NewMessage { message } = event else {
        panic!("expected NewMessage, got {event:?}");
    };
    assert_eq!(message.id, "m1");
    assert_eq!(message.sender_id, "user-2");
    assert_eq!(message.delivery, Delivery::Confirmed);
}

#[test]
fn decodes_chat_updated() {
    let text = json!({
        "event": "chat_updated",
        "data": {
            "chat": {
                "id": "5",
                "participant": {
                    "id": "user-9",
                    "name": "Dana",
                    "isOnline": true,
                },
            }
        }
    })
    .to_string();

    let event = ServerEvent::decode(&text).unwrap();
    let ServerEvent::ChatUpdated { chat } = event else {
        panic!("expected ChatUpdated, got {event:?}");
    };
    assert_eq!(chat.id, "5");
    assert_eq!(chat.participant.name, "Dana");
    assert!(chat.messages.is_empty());
}

#[test]
fn decodes_user_status_changed_with_last_seen() {
    let text = json!({
        "event": "user_status_changed",
        "data": {
            "userId": "user-3",
            "isOnline": false,
            "lastSeen": 1_700_000_000_000_i64,
        }
    })
    .to_string();

    let event = ServerEvent::decode(&text).unwrap();
    assert_eq!(
        event,
        ServerEvent::UserStatusChanged {
            user_id: "user-3".into(),
            is_online: false,
            last_seen: Some(1_700_000_000_000),
        }
    );
}

#[test]
fn decodes_user_status_changed_without_last_seen() {
    let text = json!({
        "event": "user_status_changed",
        "data": { "userId": "user-3", "isOnline": true }
    })
    .to_string();

    let event = ServerEvent::decode(&text).unwrap();
    assert_eq!(
        event,
        ServerEvent::UserStatusChanged {
            user_id: "user-3".into(),
            is_online: true,
            last_seen: None,
        }
    );
}

#[test]
fn decodes_server_error() {
    let text = json!({
        "event": "error",
        "data": { "message": "chat not found" }
    })
    .to_string();

    let event = ServerEvent::decode(&text).unwrap();
    assert_eq!(event, ServerEvent::Error { message: "chat not found".into() });
}

#[test]
fn tolerates_unknown_payload_fields() {
    let text = json!({
        "event": "error",
        "data": { "message": "boom", "code": 42, "traceId": "abc" }
    })
    .to_string();

    assert!(ServerEvent::decode(&text).is_ok());
}

#[test]
fn rejects_unknown_event_name() {
    let text = json!({ "event": "reticulate", "data": {} }).to_string();
    assert!(ServerEvent::decode(&text).is_err());
}

#[test]
fn rejects_malformed_payload() {
    let text = json!({
        "event": "user_status_changed",
        "data": { "userId": "user-3" }
    })
    .to_string();

    assert!(ServerEvent::decode(&text).is_err());
    assert!(ServerEvent::decode("not json at all").is_err());
}

// ============================================================================
// CLIENT EVENT ENCODING
// ============================================================================

#[test]
fn encodes_join_and_leave() {
    let join: Value =
        serde_json::from_str(&ClientEvent::JoinChat { chat_id: "7".into() }.encode()).unwrap();
    assert_eq!(join, json!({ "event": "join_chat", "data": { "chatId": "7" } }));

    let leave: Value =
        serde_json::from_str(&ClientEvent::LeaveChat { chat_id: "7".into() }.encode()).unwrap();
    assert_eq!(leave, json!({ "event": "leave_chat", "data": { "chatId": "7" } }));
}

#[test]
fn encodes_update_status() {
    let wire: Value =
        serde_json::from_str(&ClientEvent::UpdateStatus { is_online: true }.encode()).unwrap();
    assert_eq!(wire, json!({ "event": "update_status", "data": { "isOnline": true } }));
}

#[test]
fn client_events_round_trip() {
    let event = ClientEvent::UpdateStatus { is_online: false };
    assert_eq!(ClientEvent::decode(&event.encode()).unwrap(), event);
}

// ============================================================================
// KIND MAPPING
// ============================================================================

#[test]
fn kind_matches_variant() {
    let message = crate::model::test_helpers::incoming("m1", "user-2", "hi", 1);
    assert_eq!(ServerEvent::NewMessage { message }.kind(), EventKind::NewMessage);
    assert_eq!(
        ServerEvent::Error { message: "x".into() }.kind(),
        EventKind::Error
    );
    assert_eq!(
        ServerEvent::UserStatusChanged {
            user_id: "u".into(),
            is_online: true,
            last_seen: None
        }
        .kind(),
        EventKind::UserStatusChanged
    );
}
