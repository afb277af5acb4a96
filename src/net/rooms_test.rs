use super::{join, leave};
use crate::net::connection::Connection;
use crate::net::event::ClientEvent;
use crate::net::transport::test_helpers::fake_transport;

#[tokio::test]
async fn join_emits_join_chat() {
    let (transport, mut remote) = fake_transport();
    let mut conn = Connection::new();
    conn.connect(Box::new(transport), "token-a");

    join(&mut conn, "chat-7").await;

    assert_eq!(
        remote.from_client.try_recv().ok(),
        Some(ClientEvent::JoinChat { chat_id: "chat-7".into() })
    );
}

#[tokio::test]
async fn leave_emits_leave_chat() {
    let (transport, mut remote) = fake_transport();
    let mut conn = Connection::new();
    conn.connect(Box::new(transport), "token-a");

    leave(&mut conn, "chat-7").await;

    assert_eq!(
        remote.from_client.try_recv().ok(),
        Some(ClientEvent::LeaveChat { chat_id: "chat-7".into() })
    );
}

#[tokio::test]
async fn join_and_leave_are_noops_while_disconnected() {
    let mut conn = Connection::new();
    join(&mut conn, "chat-7").await;
    leave(&mut conn, "chat-7").await;
    assert!(!conn.is_connected());
}
