use super::*;

// =============================================================
// Delivery
// =============================================================

#[test]
fn delivery_default_is_confirmed() {
    assert_eq!(Delivery::default(), Delivery::Confirmed);
}

#[test]
fn optimistic_message_is_pending_and_read() {
    let msg = Message::optimistic("temp-1", "user-1", "hello");
    assert!(msg.is_optimistic());
    assert!(msg.is_sending());
    assert!(!msg.is_failed());
    assert!(msg.is_read);
    assert!(msg.timestamp > 0);
}

#[test]
fn failed_message_is_not_optimistic() {
    let mut msg = Message::optimistic("temp-1", "user-1", "hello");
    msg.delivery = Delivery::Failed;
    assert!(!msg.is_optimistic());
    assert!(!msg.is_sending());
    assert!(msg.is_failed());
}

// =============================================================
// Wire shape
// =============================================================

#[test]
fn message_uses_camel_case_keys() {
    let msg = test_helpers::incoming("m1", "user-1", "hi", 1000);
    let json = serde_json::to_value(&msg).expect("serialize");
    assert_eq!(json.get("senderId").and_then(|v| v.as_str()), Some("user-1"));
    assert_eq!(json.get("isRead").and_then(serde_json::Value::as_bool), Some(false));
    assert!(json.get("sender_id").is_none());
}

#[test]
fn server_message_without_delivery_deserializes_confirmed() {
    let json = r#"{"id":"m1","content":"hi","senderId":"user-1","timestamp":1000,"isRead":true}"#;
    let msg: Message = serde_json::from_str(json).expect("deserialize");
    assert_eq!(msg.delivery, Delivery::Confirmed);
    assert!(msg.is_read);
}

#[test]
fn conversation_round_trip() {
    let chat = Conversation {
        id: "5".into(),
        participant: Participant {
            id: "user-2".into(),
            name: "Dana".into(),
            photo: Some("https://example.test/dana.png".into()),
            is_online: true,
        },
        property: Some(PropertyRef { id: "p1".into(), name: "Seaside flat".into(), photo: None }),
        messages: vec![test_helpers::incoming("m1", "user-2", "is it available?", 1000)],
        latest_message: None,
        updated_at: Some(2000),
        unread_count: Some(3),
    };

    let json = serde_json::to_string(&chat).expect("serialize");
    let restored: Conversation = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, chat);
}

#[test]
fn conversation_with_minimal_payload_deserializes() {
    let json = r#"{"id":"5","participant":{"id":"user-2","name":"Dana"}}"#;
    let chat: Conversation = serde_json::from_str(json).expect("deserialize");
    assert!(chat.messages.is_empty());
    assert!(chat.property.is_none());
    assert!(chat.latest_message.is_none());
    assert!(chat.unread_count.is_none());
    assert!(!chat.participant.is_online);
}

#[test]
fn presence_record_round_trip() {
    let record = PresenceRecord { is_online: true, last_seen: Some(1234) };
    let json = serde_json::to_value(record).expect("serialize");
    assert_eq!(json.get("isOnline").and_then(serde_json::Value::as_bool), Some(true));
    assert_eq!(json.get("lastSeen").and_then(serde_json::Value::as_i64), Some(1234));
}
