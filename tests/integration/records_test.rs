//! Integration tests for records retrieval through the fetch pool.

mod helpers;

use maluum_core::error::{ErrorKind, StatusClass};
use maluum_core::types::{DocumentKind, FetchJob};

use helpers::{PortalState, SESSION_TOKEN, TestPortal};

#[tokio::test]
async fn test_schedules_skip_placeholders_and_sort() {
    let portal = TestPortal::start().await;
    let gateway = portal.gateway();

    let documents = gateway.schedules(SESSION_TOKEN).await.unwrap();

    let names: Vec<_> = documents.iter().map(|d| d.session_name.as_str()).collect();
    assert_eq!(
        names,
        ["Sem 1, 2022/2023", "Sem 1, 2023/2024", "Sem 2, 2023/2024"]
    );
    assert_eq!(documents[0].session_query, "?ses=2022/2023&sem=1");
    assert_eq!(
        documents[0].body["page"],
        "schedule for ?ses=2022/2023&sem=1"
    );
    assert!(documents.iter().all(|d| d.kind == DocumentKind::Schedule));
}

#[tokio::test]
async fn test_results_with_only_placeholders_are_not_found() {
    let portal = TestPortal::start().await;
    let gateway = portal.gateway();

    let err = gateway.results(SESSION_TOKEN).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.status_class(), StatusClass::NotFound);
}

#[tokio::test]
async fn test_one_failing_session_fails_the_batch() {
    let portal = TestPortal::start_with(PortalState {
        failing_query: Some("?ses=2023/2024&sem=1".to_string()),
        ..PortalState::default()
    })
    .await;
    let gateway = portal.gateway();

    let err = gateway.schedules(SESSION_TOKEN).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::FetchFailed);
    assert!(err.message.contains("?ses=2023/2024&sem=1"));
}

#[tokio::test]
async fn test_stale_session_is_rejected() {
    let portal = TestPortal::start().await;
    let gateway = portal.gateway();

    let err = gateway.schedules("expired").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::FetchFailed);
}

#[tokio::test]
async fn test_fetch_many_reports_every_outcome() {
    let portal = TestPortal::start_with(PortalState {
        failing_query: Some("?ses=2021/2022&sem=2".to_string()),
        ..PortalState::default()
    })
    .await;
    let gateway = portal.gateway();

    let jobs: Vec<FetchJob> = (1..=7)
        .map(|i| {
            let sem = if i == 3 { 2 } else { 1 };
            FetchJob::new(
                "",
                DocumentKind::Result,
                format!("?ses=20{:02}/20{:02}&sem={sem}", 18 + i, 19 + i),
                format!("Sem {sem}, 20{:02}/20{:02}", 18 + i, 19 + i),
            )
        })
        .collect();

    let outcomes = gateway.fetch_many(SESSION_TOKEN, jobs).await.unwrap();

    assert_eq!(outcomes.len(), 7);
    let failed: Vec<_> = outcomes
        .iter()
        .filter(|o| !o.is_success())
        .map(|o| o.display_name.as_str())
        .collect();
    assert_eq!(failed, ["Sem 2, 2021/2022"]);
}
