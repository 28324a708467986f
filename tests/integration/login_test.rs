//! Integration tests for the portal login flow.

mod helpers;

use std::time::Duration;

use maluum_core::error::{ErrorKind, StatusClass};

use helpers::{PortalState, SESSION_TOKEN, TestPortal};

#[tokio::test]
async fn test_login_issues_token_for_portal_session() {
    let portal = TestPortal::start().await;
    let gateway = portal.gateway();

    let issued = gateway.login("alice", "secret", Some("mlm_key1")).await.unwrap();

    assert_eq!(issued.session_token, SESSION_TOKEN);
    assert_eq!(issued.token.split('.').count(), 3);
    assert_eq!(portal.login_attempts(), 1);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let portal = TestPortal::start().await;
    let gateway = portal.gateway();

    let err = gateway.login("alice", "wrong", None).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::LoginFailed);
    assert_eq!(err.status_class(), StatusClass::Unauthorized);
    assert_eq!(portal.login_attempts(), 1);
}

#[tokio::test]
async fn test_invalid_caller_key_never_reaches_portal() {
    let portal = TestPortal::start().await;
    let gateway = portal.gateway();

    let err = gateway.login("alice", "secret", Some("key1")).await.unwrap_err();

    assert_eq!(err.status_class(), StatusClass::BadRequest);
    assert_eq!(portal.login_attempts(), 0);
}

#[tokio::test]
async fn test_unreachable_portal_is_service_unavailable() {
    let portal = TestPortal::start().await;
    let mut config = portal.config();
    config.portal.sso_entry_url = "http://127.0.0.1:9/cas/login".to_string();
    let gateway = portal.gateway_with(config);

    let err = gateway.login("alice", "secret", None).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::AcquisitionFailed);
    assert_eq!(err.status_class(), StatusClass::ServiceUnavailable);
}

#[tokio::test]
async fn test_slow_portal_times_out_as_unavailable() {
    let portal = TestPortal::start_with(PortalState {
        login_delay: Duration::from_secs(2),
        ..PortalState::default()
    })
    .await;
    let mut config = portal.config();
    config.portal.request_timeout_seconds = 1;
    let gateway = portal.gateway_with(config);

    let err = gateway.login("alice", "secret", None).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::AcquisitionFailed);
    assert_eq!(err.status_class(), StatusClass::ServiceUnavailable);
    assert!(err.message.contains("timed out"), "{}", err.message);
}

#[tokio::test]
async fn test_logout_reaches_portal() {
    let portal = TestPortal::start().await;
    let gateway = portal.gateway();

    let issued = gateway.login("alice", "secret", None).await.unwrap();
    let payload = gateway
        .verify_and_refresh(&issued.token, None)
        .await
        .unwrap();
    gateway.logout(&payload).await.unwrap();

    assert_eq!(
        portal.state.logouts.load(std::sync::atomic::Ordering::SeqCst),
        1
    );
    assert!(gateway.cache().peek("alice").await.is_none());
}
