//! Integration tests for token verification and coalesced session refresh.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use maluum_core::error::{ErrorKind, StatusClass};

use helpers::{PortalState, SESSION_TOKEN, TestPortal};

#[tokio::test]
async fn test_immediate_verify_refreshes_once() {
    let portal = TestPortal::start().await;
    let gateway = portal.gateway();

    let issued = gateway.login("alice", "secret", Some("mlm_key1")).await.unwrap();
    assert_eq!(portal.login_attempts(), 1);

    let payload = gateway
        .verify_and_refresh(&issued.token, Some("mlm_key1"))
        .await
        .unwrap();

    assert_eq!(portal.login_attempts(), 2);
    assert_eq!(payload.username, "alice");
    assert_eq!(payload.password, "secret");
    assert_eq!(payload.session_token, SESSION_TOKEN);

    gateway.shutdown().await;
    assert_eq!(gateway.usage().failure_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_verifications_share_one_login() {
    let portal = TestPortal::start_with(PortalState {
        login_delay: Duration::from_millis(300),
        ..PortalState::default()
    })
    .await;
    let gateway = Arc::new(portal.gateway());
    let issued = gateway.login("alice", "secret", None).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let gateway = Arc::clone(&gateway);
        let token = issued.token.clone();
        handles.push(tokio::spawn(async move {
            gateway.verify_and_refresh(&token, None).await
        }));
    }
    for handle in handles {
        let payload = handle.await.unwrap().unwrap();
        assert_eq!(payload.session_token, SESSION_TOKEN);
    }

    assert_eq!(portal.login_attempts(), 2);
}

#[tokio::test]
async fn test_session_ttl_reuses_cached_session() {
    let portal = TestPortal::start().await;
    let mut config = portal.config();
    config.cache.session_ttl_seconds = 300;
    let gateway = portal.gateway_with(config);

    let issued = gateway.login("alice", "secret", None).await.unwrap();
    gateway.verify_and_refresh(&issued.token, None).await.unwrap();
    gateway.verify_and_refresh(&issued.token, None).await.unwrap();

    assert_eq!(portal.login_attempts(), 2);
}

#[tokio::test]
async fn test_changed_password_fails_refresh_as_unauthorized() {
    let portal = TestPortal::start().await;
    let gateway = portal.gateway();
    let issued = gateway.login("alice", "secret", None).await.unwrap();

    let other = TestPortal::start_with(PortalState {
        password: "rotated".to_string(),
        ..PortalState::default()
    })
    .await;
    let stale_gateway = other.gateway();

    let err = stale_gateway
        .verify_and_refresh(&issued.token, None)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::RefreshFailed);
    assert_eq!(err.root_kind(), ErrorKind::LoginFailed);
    assert_eq!(err.status_class(), StatusClass::Unauthorized);
}

#[tokio::test]
async fn test_wrong_caller_key_is_distinguishable() {
    let portal = TestPortal::start().await;
    let gateway = portal.gateway();
    let issued = gateway.login("alice", "secret", Some("mlm_key1")).await.unwrap();

    let err = gateway
        .verify_and_refresh(&issued.token, Some("mlm_key2"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DecryptionFailed);

    let mut tampered = issued.token.clone();
    tampered.push('A');
    let err = gateway.verify_and_refresh(&tampered, Some("mlm_key1")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);

    assert_eq!(portal.login_attempts(), 1);
}

#[tokio::test]
async fn test_reissued_token_verifies() {
    let portal = TestPortal::start().await;
    let gateway = portal.gateway();
    let issued = gateway.login("alice", "secret", None).await.unwrap();
    let payload = gateway.verify_and_refresh(&issued.token, None).await.unwrap();

    let reissued = gateway.reissue(&payload, None).unwrap();
    let again = gateway.verify_and_refresh(&reissued.token, None).await.unwrap();

    assert_eq!(again.username, "alice");
    assert_eq!(again.session_token, SESSION_TOKEN);
}
