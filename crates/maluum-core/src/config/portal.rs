//! Upstream portal endpoints and login form configuration.

use serde::{Deserialize, Serialize};

/// Endpoints, cookie names, and request settings for the upstream portal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Portal root; cookies are read back from the jar for this URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// SSO entry page fetched to bootstrap the cookie jar.
    #[serde(default = "default_sso_entry_url")]
    pub sso_entry_url: String,
    /// Endpoint receiving the credential form POST.
    #[serde(default = "default_login_url")]
    pub login_url: String,
    /// Portal logout endpoint.
    #[serde(default = "default_logout_url")]
    pub logout_url: String,
    /// Schedule records page (session query is appended).
    #[serde(default = "default_schedule_url")]
    pub schedule_url: String,
    /// Result records page (session query is appended).
    #[serde(default = "default_result_url")]
    pub result_url: String,
    /// Name of the cookie that carries the authenticated session.
    #[serde(default = "default_session_cookie")]
    pub session_cookie_name: String,
    /// Browser user agent presented during login.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// `Accept-Language` header presented during login.
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Login form field names and constants.
    #[serde(default)]
    pub form: LoginFormConfig,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            sso_entry_url: default_sso_entry_url(),
            login_url: default_login_url(),
            logout_url: default_logout_url(),
            schedule_url: default_schedule_url(),
            result_url: default_result_url(),
            session_cookie_name: default_session_cookie(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            request_timeout_seconds: default_request_timeout(),
            form: LoginFormConfig::default(),
        }
    }
}

impl PortalConfig {
    /// Build a config whose every endpoint lives under `origin`.
    ///
    /// Paths mirror the production portal layout; used against local
    /// stand-ins of the portal.
    pub fn with_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            base_url: format!("{origin}/"),
            sso_entry_url: format!("{origin}/cas/login"),
            login_url: format!("{origin}/cas/login"),
            logout_url: format!("{origin}/logout"),
            schedule_url: format!("{origin}/MyAcademic/schedule"),
            result_url: format!("{origin}/MyAcademic/result"),
            ..Self::default()
        }
    }
}

/// Field names and constant values of the credential form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginFormConfig {
    /// Username field name.
    #[serde(default = "default_username_field")]
    pub username_field: String,
    /// Password field name.
    #[serde(default = "default_password_field")]
    pub password_field: String,
    /// Execution flow field name.
    #[serde(default = "default_execution_field")]
    pub execution_field: String,
    /// Constant execution flow token.
    #[serde(default = "default_execution_value")]
    pub execution_value: String,
    /// Event field name.
    #[serde(default = "default_event_field")]
    pub event_field: String,
    /// Constant event value.
    #[serde(default = "default_event_value")]
    pub event_value: String,
    /// Geolocation field name (always sent empty).
    #[serde(default = "default_geolocation_field")]
    pub geolocation_field: String,
}

impl Default for LoginFormConfig {
    fn default() -> Self {
        Self {
            username_field: default_username_field(),
            password_field: default_password_field(),
            execution_field: default_execution_field(),
            execution_value: default_execution_value(),
            event_field: default_event_field(),
            event_value: default_event_value(),
            geolocation_field: default_geolocation_field(),
        }
    }
}

fn default_base_url() -> String {
    "https://imaluum.iium.edu.my/".to_string()
}

fn default_sso_entry_url() -> String {
    "https://cas.iium.edu.my:8448/cas/login?service=https%3a%2f%2fimaluum.iium.edu.my%2fhome"
        .to_string()
}

fn default_login_url() -> String {
    "https://cas.iium.edu.my:8448/cas/login?service=https%3a%2f%2fimaluum.iium.edu.my%2fhome?service=https%3a%2f%2fimaluum.iium.edu.my%2fhome".to_string()
}

fn default_logout_url() -> String {
    "https://imaluum.iium.edu.my/logout".to_string()
}

fn default_schedule_url() -> String {
    "https://imaluum.iium.edu.my/MyAcademic/schedule".to_string()
}

fn default_result_url() -> String {
    "https://imaluum.iium.edu.my/MyAcademic/result".to_string()
}

fn default_session_cookie() -> String {
    "MOD_AUTH_CAS".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/144.0.0.0 Safari/537.36".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_username_field() -> String {
    "username".to_string()
}

fn default_password_field() -> String {
    "password".to_string()
}

fn default_execution_field() -> String {
    "execution".to_string()
}

fn default_execution_value() -> String {
    "e1s1".to_string()
}

fn default_event_field() -> String {
    "_eventId".to_string()
}

fn default_event_value() -> String {
    "submit".to_string()
}

fn default_geolocation_field() -> String {
    "geolocation".to_string()
}
