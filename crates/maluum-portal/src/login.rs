//! Three-step SSO login against the portal.
//!
//! 1. GET the SSO entry page to seed the cookie jar.
//! 2. POST the credential form; redirects are followed inside the same jar.
//! 3. Read the session cookie back from the jar for the portal URL.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header;
use tracing::{debug, info, warn};
use url::Url;
use url::form_urlencoded;

use maluum_core::config::PortalConfig;
use maluum_core::error::{AppError, ErrorKind};
use maluum_core::result::AppResult;
use maluum_core::traits::SessionAuthenticator;
use maluum_core::types::{AuthenticatedSession, Credentials};

use crate::client;

/// Logs users in to the portal. Holds no state between calls.
#[derive(Debug, Clone)]
pub struct PortalAuthenticator {
    config: PortalConfig,
    /// Portal root, parsed once.
    portal_url: Url,
}

impl PortalAuthenticator {
    /// Create an authenticator for the configured portal.
    pub fn new(config: PortalConfig) -> AppResult<Self> {
        let portal_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::configuration(format!("Invalid portal URL '{}': {e}", config.base_url))
        })?;
        Ok(Self { config, portal_url })
    }

    fn login_form(&self, credentials: &Credentials) -> String {
        let form = &self.config.form;
        form_urlencoded::Serializer::new(String::new())
            .append_pair(&form.username_field, &credentials.username)
            .append_pair(&form.password_field, &credentials.password)
            .append_pair(&form.execution_field, &form.execution_value)
            .append_pair(&form.event_field, &form.event_value)
            .append_pair(&form.geolocation_field, "")
            .finish()
    }

    fn session_from_jar(&self, jar: &Jar) -> Option<String> {
        let cookies = jar.cookies(&self.portal_url)?;
        let cookies = cookies.to_str().ok()?;
        client::find_cookie(cookies, &self.config.session_cookie_name).map(str::to_string)
    }
}

#[async_trait]
impl SessionAuthenticator for PortalAuthenticator {
    async fn login(&self, credentials: &Credentials) -> AppResult<AuthenticatedSession> {
        let jar = Arc::new(Jar::default());
        let client = client::build_client(&self.config, Some(Arc::clone(&jar)))?;

        client
            .get(&self.config.sso_entry_url)
            .send()
            .await
            .map_err(|e| transport_error("SSO bootstrap", e))?;

        client
            .post(&self.config.login_url)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(self.login_form(credentials))
            .send()
            .await
            .map_err(|e| transport_error("credential submission", e))?;

        match self.session_from_jar(&jar) {
            Some(session_token) => {
                info!(username = %credentials.username, "Portal login succeeded");
                Ok(AuthenticatedSession {
                    session_token,
                    credentials: credentials.clone(),
                })
            }
            None => {
                warn!(username = %credentials.username, "Portal rejected credentials");
                Err(AppError::login_failed("Username or password is incorrect"))
            }
        }
    }

    async fn logout(&self, session_token: &str) -> AppResult<()> {
        let client = client::build_client(&self.config, None)?;
        let cookie = client::session_cookie(&self.config.session_cookie_name, session_token)?;

        let response = client
            .get(&self.config.logout_url)
            .header(header::COOKIE, cookie)
            .send()
            .await
            .map_err(|e| transport_error("logout", e))?;

        debug!(status = %response.status(), "Portal logout completed");
        Ok(())
    }
}

fn transport_error(step: &str, err: reqwest::Error) -> AppError {
    let message = if err.is_timeout() {
        format!("Portal {step} timed out")
    } else {
        format!("Portal {step} failed: {err}")
    };
    AppError::with_source(ErrorKind::AcquisitionFailed, message, err)
}
