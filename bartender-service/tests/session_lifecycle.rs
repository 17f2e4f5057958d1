//! Session manager behavior against the in-memory store.

use bartender_service::config::DEFAULT_SESSION_TTL_SECONDS;
use bartender_service::services::{MockStore, SessionManager};
use std::sync::Arc;
use std::time::Duration;

fn manager() -> (SessionManager, Arc<MockStore>) {
    let store = Arc::new(MockStore::new());
    let manager = SessionManager::new(store.clone(), DEFAULT_SESSION_TTL_SECONDS);
    (manager, store)
}

#[tokio::test]
async fn create_then_verify_succeeds() {
    let (manager, _store) = manager();

    let session_id = manager
        .create_session(1, Some("test-agent".to_string()), Some("127.0.0.1".to_string()))
        .await
        .expect("create failed");

    assert!(manager.verify_session(1, &session_id).await.expect("verify failed"));
}

#[tokio::test]
async fn unknown_session_verifies_false_and_has_no_data() {
    let (manager, _store) = manager();

    assert!(!manager
        .verify_session(99, "no-such-session")
        .await
        .expect("verify failed"));
    assert!(manager
        .get_session_data(99, "no-such-session")
        .await
        .expect("get failed")
        .is_none());
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (manager, _store) = manager();

    let session_id = manager.create_session(7, None, None).await.expect("create failed");

    manager.delete_session(7, &session_id).await.expect("delete failed");
    assert!(!manager.verify_session(7, &session_id).await.expect("verify failed"));

    // Second delete of a gone session still succeeds
    manager.delete_session(7, &session_id).await.expect("second delete failed");
}

#[tokio::test]
async fn verify_refreshes_last_activity_and_ttl() {
    let (manager, store) = manager();

    let session_id = manager.create_session(5, None, None).await.expect("create failed");
    let key = SessionManager::session_key(5, &session_id);
    assert_eq!(store.ttl_of(&key), Some(DEFAULT_SESSION_TTL_SECONDS));

    let before = manager
        .get_session_data(5, &session_id)
        .await
        .expect("get failed")
        .expect("missing data");

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(manager.verify_session(5, &session_id).await.expect("verify failed"));

    let after = manager
        .get_session_data(5, &session_id)
        .await
        .expect("get failed")
        .expect("missing data");

    assert!(after.last_activity > before.last_activity);
    assert_eq!(after.created_at, before.created_at);
    // TTL reset to the full window by the verification write
    assert_eq!(store.ttl_of(&key), Some(DEFAULT_SESSION_TTL_SECONDS));
}

#[tokio::test]
async fn repeated_verifications_never_move_last_activity_backwards() {
    let (manager, _store) = manager();

    let session_id = manager.create_session(5, None, None).await.expect("create failed");

    let mut previous = manager
        .get_session_data(5, &session_id)
        .await
        .expect("get failed")
        .expect("missing data")
        .last_activity;

    for _ in 0..3 {
        assert!(manager.verify_session(5, &session_id).await.expect("verify failed"));
        let current = manager
            .get_session_data(5, &session_id)
            .await
            .expect("get failed")
            .expect("missing data")
            .last_activity;
        assert!(current >= previous);
        previous = current;
    }
}

#[tokio::test]
async fn get_session_data_does_not_refresh_activity() {
    let (manager, _store) = manager();

    let session_id = manager.create_session(3, None, None).await.expect("create failed");
    let first = manager
        .get_session_data(3, &session_id)
        .await
        .expect("get failed")
        .expect("missing data");

    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = manager
        .get_session_data(3, &session_id)
        .await
        .expect("get failed")
        .expect("missing data");

    assert_eq!(first.last_activity, second.last_activity);
}

#[tokio::test]
async fn lifecycle_scenario_for_user_42() {
    let (manager, _store) = manager();

    let session_a = manager.create_session(42, None, None).await.expect("create failed");

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(manager.verify_session(42, &session_a).await.expect("verify failed"));

    manager.delete_session(42, &session_a).await.expect("delete failed");
    assert!(!manager.verify_session(42, &session_a).await.expect("verify failed"));
}

#[tokio::test]
async fn revoke_user_sessions_keeps_excluded_session() {
    let (manager, _store) = manager();

    let first = manager.create_session(9, None, None).await.expect("create failed");
    let second = manager.create_session(9, None, None).await.expect("create failed");
    let third = manager.create_session(9, None, None).await.expect("create failed");
    let other_user = manager.create_session(10, None, None).await.expect("create failed");

    let revoked = manager
        .revoke_user_sessions(9, Some(&second))
        .await
        .expect("revoke failed");
    assert_eq!(revoked, 2);

    assert!(!manager.verify_session(9, &first).await.expect("verify failed"));
    assert!(manager.verify_session(9, &second).await.expect("verify failed"));
    assert!(!manager.verify_session(9, &third).await.expect("verify failed"));

    // Another user's sessions are untouched
    assert!(manager.verify_session(10, &other_user).await.expect("verify failed"));
}

#[tokio::test]
async fn session_records_capture_creation_metadata() {
    let (manager, _store) = manager();

    let session_id = manager
        .create_session(11, Some("iPhone".to_string()), Some("10.0.0.1".to_string()))
        .await
        .expect("create failed");

    let data = manager
        .get_session_data(11, &session_id)
        .await
        .expect("get failed")
        .expect("missing data");

    assert_eq!(data.user_id, 11);
    assert_eq!(data.device_info.as_deref(), Some("iPhone"));
    assert_eq!(data.ip_address.as_deref(), Some("10.0.0.1"));
    assert_eq!(data.created_at, data.last_activity);
}
