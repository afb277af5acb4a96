use super::{PresenceTracker, announce};
use crate::model::PresenceRecord;
use crate::net::connection::Connection;
use crate::net::event::{ClientEvent, ServerEvent};
use crate::net::transport::test_helpers::fake_transport;

// ============================================================================
// TRACKER
// ============================================================================

#[test]
fn unknown_users_read_as_offline() {
    let tracker = PresenceTracker::new();
    assert!(!tracker.is_online("user-1"));
    assert!(tracker.last_seen("user-1").is_none());
    assert!(tracker.get("user-1").is_none());
}

#[test]
fn newest_event_wins() {
    let mut tracker = PresenceTracker::new();
    tracker.apply("user-1", true, None);
    tracker.apply("user-1", false, Some(1_700_000_000_000));

    assert!(!tracker.is_online("user-1"));
    assert_eq!(tracker.last_seen("user-1"), Some(1_700_000_000_000));
}

#[test]
fn records_are_replaced_wholesale() {
    let mut tracker = PresenceTracker::new();
    tracker.apply("user-1", false, Some(1_700_000_000_000));
    tracker.apply("user-1", true, None);

    // The online flip carried no last_seen, so none is kept.
    assert_eq!(
        tracker.get("user-1"),
        Some(&PresenceRecord { is_online: true, last_seen: None })
    );
}

#[test]
fn drops_events_without_a_user_id() {
    let mut tracker = PresenceTracker::new();
    tracker.apply("", true, None);
    assert!(tracker.get("").is_none());
}

#[test]
fn observe_handles_status_events_and_ignores_the_rest() {
    let mut tracker = PresenceTracker::new();
    tracker.observe(&ServerEvent::UserStatusChanged {
        user_id: "user-2".into(),
        is_online: true,
        last_seen: None,
    });
    tracker.observe(&ServerEvent::Error { message: "boom".into() });

    assert!(tracker.is_online("user-2"));
}

#[test]
fn tracks_users_independently() {
    let mut tracker = PresenceTracker::new();
    tracker.apply("user-1", true, None);
    tracker.apply("user-2", false, Some(5));

    assert!(tracker.is_online("user-1"));
    assert!(!tracker.is_online("user-2"));
    assert_eq!(tracker.last_seen("user-2"), Some(5));
}

// ============================================================================
// ANNOUNCE
// ============================================================================

#[tokio::test]
async fn announce_emits_update_status() {
    let (transport, mut remote) = fake_transport();
    let mut conn = Connection::new();
    conn.connect(Box::new(transport), "token-a");

    announce(&mut conn, true).await;

    assert_eq!(
        remote.from_client.try_recv().ok(),
        Some(ClientEvent::UpdateStatus { is_online: true })
    );
}

#[tokio::test]
async fn announce_is_a_noop_while_disconnected() {
    let mut conn = Connection::new();
    announce(&mut conn, false).await;
}
