//! HTTP client construction for portal requests.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::cookie::Jar;
use reqwest::header::{self, HeaderMap, HeaderValue};

use maluum_core::config::PortalConfig;
use maluum_core::error::AppError;
use maluum_core::result::AppResult;

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Headers a desktop browser would send to the portal.
pub fn browser_headers(config: &PortalConfig) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, header_value(&config.user_agent)?);
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header_value(&config.accept_language)?,
    );
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    Ok(headers)
}

/// Build a client for portal requests.
///
/// With a jar, response cookies (including those set on redirects) are
/// stored and replayed; without one the caller sets `Cookie` explicitly.
pub fn build_client(config: &PortalConfig, jar: Option<Arc<Jar>>) -> AppResult<Client> {
    let mut builder = Client::builder()
        .default_headers(browser_headers(config)?)
        .timeout(Duration::from_secs(config.request_timeout_seconds));

    if let Some(jar) = jar {
        builder = builder.cookie_provider(jar);
    }

    builder
        .build()
        .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))
}

/// `Cookie` header presenting a single session cookie.
pub fn session_cookie(name: &str, token: &str) -> AppResult<HeaderValue> {
    header_value(&format!("{name}={token}"))
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| AppError::validation(format!("Invalid header value: {value:?}")))
}

/// Find `name` in a `Cookie` header value such as `"a=1; b=2"`.
pub fn find_cookie<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_cookie() {
        let header = "JSESSIONID=abc; MOD_AUTH_CAS=xyz; theme=dark";
        assert_eq!(find_cookie(header, "MOD_AUTH_CAS"), Some("xyz"));
        assert_eq!(find_cookie(header, "JSESSIONID"), Some("abc"));
        assert_eq!(find_cookie(header, "MOD_AUTH"), None);
        assert_eq!(find_cookie("", "MOD_AUTH_CAS"), None);
    }

    #[test]
    fn test_browser_headers() {
        let headers = browser_headers(&PortalConfig::default()).unwrap();
        assert!(
            headers[header::USER_AGENT]
                .to_str()
                .unwrap()
                .starts_with("Mozilla/5.0")
        );
        assert_eq!(headers[header::CONNECTION], "keep-alive");
    }

    #[test]
    fn test_invalid_session_cookie_rejected() {
        assert!(session_cookie("MOD_AUTH_CAS", "bad\nvalue").is_err());
        assert_eq!(
            session_cookie("MOD_AUTH_CAS", "xyz").unwrap(),
            "MOD_AUTH_CAS=xyz"
        );
    }
}
