//! Shared test helpers for integration tests.
//!
//! Runs a stand-in for the upstream portal on a random local port:
//! `GET /cas/login` seeds a bootstrap cookie, `POST /cas/login` checks the
//! credential form and redirects through `/cas/ticket`, which sets the
//! session cookie. Records pages list sessions one per line as
//! `name|query`, which [`LineExtractor`] understands.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::{Form, RawQuery, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use serde_json::json;

use maluum_core::config::{AppConfig, PortalConfig};
use maluum_core::error::AppError;
use maluum_core::result::AppResult;
use maluum_core::traits::DocumentExtractor;
use maluum_core::types::{AcademicSession, DocumentKind, FetchJob, StructuredDocument};
use maluum_service::{Gateway, TracingUsageRecorder};

/// Session cookie value the portal hands out.
pub const SESSION_TOKEN: &str = "xyz";

/// Mutable knobs and counters of the stand-in portal.
#[derive(Debug)]
pub struct PortalState {
    /// Accepted password for every username.
    pub password: String,
    /// Credential submissions received.
    pub login_attempts: AtomicUsize,
    /// Logout requests received.
    pub logouts: AtomicUsize,
    /// Delay applied to credential submissions.
    pub login_delay: Duration,
    /// Session query whose page answers 500.
    pub failing_query: Option<String>,
}

impl Default for PortalState {
    fn default() -> Self {
        Self {
            password: "secret".to_string(),
            login_attempts: AtomicUsize::new(0),
            logouts: AtomicUsize::new(0),
            login_delay: Duration::ZERO,
            failing_query: None,
        }
    }
}

/// A running stand-in portal.
pub struct TestPortal {
    /// `http://127.0.0.1:<port>`
    pub origin: String,
    /// Shared state and counters.
    pub state: Arc<PortalState>,
}

impl TestPortal {
    /// Start a portal with default state.
    pub async fn start() -> Self {
        Self::start_with(PortalState::default()).await
    }

    /// Start a portal with the given state.
    pub async fn start_with(state: PortalState) -> Self {
        let state = Arc::new(state);
        let app = Router::new()
            .route("/cas/login", get(bootstrap).post(submit_credentials))
            .route("/cas/ticket", get(validate_ticket))
            .route("/home", get(|| async { "home" }))
            .route("/logout", get(logout))
            .route("/MyAcademic/schedule", get(schedule_page))
            .route("/MyAcademic/result", get(result_page))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test portal");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test portal crashed");
        });

        Self {
            origin: format!("http://{addr}"),
            state,
        }
    }

    /// Credential submissions so far.
    pub fn login_attempts(&self) -> usize {
        self.state.login_attempts.load(Ordering::SeqCst)
    }

    /// Gateway configuration pointing at this portal.
    pub fn config(&self) -> AppConfig {
        let fixtures = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");
        let mut config = AppConfig::default();
        config.portal = PortalConfig::with_origin(&self.origin);
        config.portal.request_timeout_seconds = 5;
        config.auth.private_key_path = Some(format!("{fixtures}/ed25519_private.pem"));
        config.auth.public_key_path = Some(format!("{fixtures}/ed25519_public.pem"));
        config
    }

    /// Gateway wired to this portal with [`LineExtractor`].
    pub fn gateway(&self) -> Gateway {
        self.gateway_with(self.config())
    }

    /// Gateway wired to this portal with an adjusted configuration.
    pub fn gateway_with(&self, config: AppConfig) -> Gateway {
        Gateway::from_config(
            &config,
            Arc::new(LineExtractor),
            Arc::new(TracingUsageRecorder),
        )
        .expect("Failed to build gateway")
    }
}

async fn bootstrap() -> Response {
    ([(SET_COOKIE, "JSESSIONID=bootstrap; Path=/")], "CAS login").into_response()
}

async fn submit_credentials(
    State(state): State<Arc<PortalState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.login_attempts.fetch_add(1, Ordering::SeqCst);
    if !state.login_delay.is_zero() {
        tokio::time::sleep(state.login_delay).await;
    }

    let field = |name: &str| form.get(name).map(String::as_str);
    let bootstrapped = cookie_header(&headers).contains("JSESSIONID=bootstrap");
    let accepted = bootstrapped
        && field("username").is_some_and(|u| !u.is_empty())
        && field("password") == Some(state.password.as_str())
        && field("execution") == Some("e1s1")
        && field("_eventId") == Some("submit")
        && field("geolocation") == Some("");

    if accepted {
        Redirect::to("/cas/ticket?ticket=ST-1").into_response()
    } else {
        "Invalid credentials".into_response()
    }
}

async fn validate_ticket() -> Response {
    (
        [(SET_COOKIE, format!("MOD_AUTH_CAS={SESSION_TOKEN}; Path=/"))],
        Redirect::to("/home"),
    )
        .into_response()
}

async fn logout(State(state): State<Arc<PortalState>>) -> &'static str {
    state.logouts.fetch_add(1, Ordering::SeqCst);
    "bye"
}

async fn schedule_page(
    State(state): State<Arc<PortalState>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let index = [
        "Sem 2, 2023/2024|?ses=2023/2024&sem=2",
        "Sem 1, 2023/2024|?ses=2023/2024&sem=1",
        "Placeholder|?ses=1111/1111&sem=1",
        "Sem 1, 2022/2023|?ses=2022/2023&sem=1",
        "Empty|?ses=0000/0000&sem=0",
    ];
    records_page(&state, &headers, query, "schedule", &index)
}

async fn result_page(
    State(state): State<Arc<PortalState>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let index = ["Placeholder|?ses=1111/1111&sem=1", "Empty|?ses=0000/0000&sem=0"];
    records_page(&state, &headers, query, "result", &index)
}

fn records_page(
    state: &PortalState,
    headers: &HeaderMap,
    query: Option<String>,
    kind: &str,
    index: &[&str],
) -> Response {
    if cookie_header(headers) != format!("MOD_AUTH_CAS={SESSION_TOKEN}") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match query {
        None => index.join("\n").into_response(),
        Some(query) => {
            let query = format!("?{query}");
            if state.failing_query.as_deref() == Some(query.as_str()) {
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
            format!("{kind} for {query}").into_response()
        }
    }
}

fn cookie_header(headers: &HeaderMap) -> String {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Reads the `name|query` session listing served by the test portal.
#[derive(Debug)]
pub struct LineExtractor;

impl DocumentExtractor for LineExtractor {
    fn extract(&self, html: &str, job: &FetchJob) -> AppResult<StructuredDocument> {
        Ok(StructuredDocument {
            kind: job.kind,
            session_name: job.display_name.clone(),
            session_query: job.query.clone(),
            body: json!({ "page": html }),
        })
    }

    fn extract_sessions(&self, html: &str, _kind: DocumentKind) -> AppResult<Vec<AcademicSession>> {
        html.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let (name, query) = line
                    .split_once('|')
                    .ok_or_else(|| AppError::fetch_failed(format!("Bad session line: {line}")))?;
                Ok(AcademicSession {
                    name: name.to_string(),
                    query: query.to_string(),
                })
            })
            .collect()
    }
}
