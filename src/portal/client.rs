//! Reqwest-backed portal client
//!
//! Authenticates by replaying stored session cookies (from the
//! `COOKIES_JSON` environment variable or the configured cookies file),
//! captures the CSRF `_token` from the received-SMS page, then talks to
//! the panel's AJAX endpoints. Auth-shaped responses flip the client back
//! to logged-out so the monitor loop re-authenticates.

use crate::config::with_config;
use crate::errors::{AuthError, FetchError, UpstreamError};
use crate::logger::{self, LogTag};
use crate::portal::parse;
use crate::portal::types::{ArrivalDetail, RangeSnapshot, SnapshotFetcher};
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::{Client, StatusCode, Url};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

const RECEIVED_PATH: &str = "/portal/sms/received";
const COUNTERS_PATH: &str = "/portal/sms/received/getsms";
const NUMBERS_PATH: &str = "/portal/sms/received/getsms/number";
const MESSAGE_PATH: &str = "/portal/sms/received/getsms/number/sms";

/// Session-cookie HTTP client for the SMS panel
pub struct PortalClient {
    http: Client,
    jar: Arc<Jar>,
    base_url: String,
    cookies_file: String,
    csrf_token: RwLock<Option<String>>,
    logged_in: AtomicBool,
}

impl PortalClient {
    /// Build a client from the global configuration
    pub fn from_config() -> Result<Self, String> {
        let (base_url, cookies_file, timeout_secs) = with_config(|c| {
            (
                c.portal.base_url.clone(),
                c.portal.cookies_file.clone(),
                c.portal.request_timeout_secs,
            )
        });

        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .cookie_provider(jar.clone())
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| format!("Failed to build portal HTTP client: {}", e))?;

        Ok(Self {
            http,
            jar,
            base_url,
            cookies_file,
            csrf_token: RwLock::new(None),
            logged_in: AtomicBool::new(false),
        })
    }

    /// Whether the last session check succeeded
    pub fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Raw cookie material: environment first, then the configured file
    fn load_cookie_material(&self) -> Option<String> {
        if let Ok(env_cookies) = std::env::var("COOKIES_JSON") {
            if !env_cookies.is_empty() {
                return Some(env_cookies);
            }
        }
        std::fs::read_to_string(&self.cookies_file).ok()
    }

    /// Parse cookie material into name/value pairs
    ///
    /// Accepts both exported browser form (list of objects with
    /// name/value fields) and a flat string map.
    fn parse_cookie_pairs(material: &str) -> Result<Vec<(String, String)>, AuthError> {
        let value: serde_json::Value = serde_json::from_str(material)
            .map_err(|e| AuthError::InvalidCookies(e.to_string()))?;

        let mut pairs = Vec::new();
        match value {
            serde_json::Value::Array(entries) => {
                for entry in entries {
                    let name = entry.get("name").and_then(|v| v.as_str());
                    let cookie_value = entry.get("value").and_then(|v| v.as_str());
                    if let (Some(name), Some(cookie_value)) = (name, cookie_value) {
                        pairs.push((name.to_string(), cookie_value.to_string()));
                    }
                }
            }
            serde_json::Value::Object(map) => {
                for (name, cookie_value) in map {
                    if let Some(cookie_value) = cookie_value.as_str() {
                        pairs.push((name, cookie_value.to_string()));
                    }
                }
            }
            _ => {
                return Err(AuthError::InvalidCookies(
                    "expected a JSON array or object".to_string(),
                ))
            }
        }

        if pairs.is_empty() {
            return Err(AuthError::InvalidCookies(
                "no usable cookie entries found".to_string(),
            ));
        }
        Ok(pairs)
    }

    /// Install cookie pairs into the client's jar
    fn install_cookies(&self, pairs: &[(String, String)]) -> Result<(), AuthError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| AuthError::Request(format!("invalid base url: {}", e)))?;
        let domain = url.host_str().unwrap_or_default().to_string();

        for (name, value) in pairs {
            let cookie = format!("{}={}; Domain={}; Path=/", name, value, domain);
            self.jar.add_cookie_str(&cookie, &url);
        }
        Ok(())
    }

    /// Whether a response status means the session is gone
    fn is_auth_failure(status: StatusCode) -> bool {
        matches!(status.as_u16(), 401 | 403 | 419)
    }

    /// Mark the session dead and produce the auth error
    fn session_rejected(&self, context: &str) -> AuthError {
        self.logged_in.store(false, Ordering::SeqCst);
        AuthError::SessionRejected(context.to_string())
    }

    /// Shared POST for the panel's AJAX endpoints
    async fn post_fragment(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<String, FetchError> {
        let endpoint = self.endpoint(path);
        let response = self
            .http
            .post(&endpoint)
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Origin", &self.base_url)
            .header("Referer", self.endpoint(RECEIVED_PATH))
            .form(form)
            .send()
            .await
            .map_err(|e| FetchError::Upstream(UpstreamError::from_reqwest(&endpoint, e)))?;

        let status = response.status();
        if Self::is_auth_failure(status) {
            return Err(FetchError::Auth(
                self.session_rejected(&format!("{} returned {}", path, status)),
            ));
        }
        if !status.is_success() {
            return Err(FetchError::Upstream(UpstreamError::Malformed {
                endpoint,
                message: format!("status {}", status),
            }));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Upstream(UpstreamError::from_reqwest(&endpoint, e)))
    }

    /// Current CSRF token, or an auth error when no session is held
    async fn current_csrf(&self) -> Result<String, FetchError> {
        match self.csrf_token.read().await.clone() {
            Some(token) => Ok(token),
            None => Err(FetchError::Auth(AuthError::SessionRejected(
                "not logged in".to_string(),
            ))),
        }
    }
}

#[async_trait]
impl SnapshotFetcher for PortalClient {
    async fn login(&self) -> Result<(), AuthError> {
        let material = self
            .load_cookie_material()
            .ok_or(AuthError::MissingCookies)?;
        let pairs = Self::parse_cookie_pairs(&material)?;
        self.install_cookies(&pairs)?;

        let endpoint = self.endpoint(RECEIVED_PATH);
        let response = self
            .http
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let status = response.status();
        let final_url = response.url().clone();
        if !status.is_success() || final_url.path().contains("login") {
            return Err(self.session_rejected(&format!(
                "received page responded {} at {}",
                status,
                final_url.path()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;
        let token = parse::csrf_token(&body).ok_or(AuthError::MissingCsrfToken)?;

        *self.csrf_token.write().await = Some(token);
        self.logged_in.store(true, Ordering::SeqCst);
        logger::info(LogTag::Portal, "Portal session established");
        Ok(())
    }

    async fn fetch_counters(&self, date: &str) -> Result<Vec<RangeSnapshot>, FetchError> {
        let token = self.current_csrf().await?;
        let form = [("from", date), ("to", ""), ("_token", token.as_str())];
        let body = self.post_fragment(COUNTERS_PATH, &form).await?;

        let snapshots = parse::range_counters(&body);
        logger::debug(
            LogTag::Portal,
            &format!("Fetched {} range counters for {}", snapshots.len(), date),
        );
        Ok(snapshots)
    }

    async fn fetch_top_arrival(
        &self,
        range: &str,
        date: &str,
    ) -> Result<Option<ArrivalDetail>, FetchError> {
        let token = self.current_csrf().await?;

        let numbers_form = [
            ("_token", token.as_str()),
            ("start", date),
            ("end", ""),
            ("range", range),
        ];
        let numbers_body = self.post_fragment(NUMBERS_PATH, &numbers_form).await?;
        let numbers = parse::phone_numbers(&numbers_body);

        let phone_number = match numbers.into_iter().next() {
            Some(number) => number,
            None => {
                logger::debug(
                    LogTag::Portal,
                    &format!("No retrievable numbers for range '{}'", range),
                );
                return Ok(None);
            }
        };

        let message_form = [
            ("_token", token.as_str()),
            ("start", date),
            ("end", ""),
            ("Number", phone_number.as_str()),
            ("Range", range),
        ];
        let message_body = self.post_fragment(MESSAGE_PATH, &message_form).await?;

        Ok(parse::message_body(&message_body).map(|message| ArrivalDetail {
            phone_number,
            message,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_pairs_from_list() {
        let material = r#"[{"name": "laravel_session", "value": "abc"},
                           {"name": "XSRF-TOKEN", "value": "xyz"}]"#;
        let pairs = PortalClient::parse_cookie_pairs(material).expect("list form parses");
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("laravel_session".to_string(), "abc".to_string()));
    }

    #[test]
    fn test_cookie_pairs_from_map() {
        let material = r#"{"laravel_session": "abc"}"#;
        let pairs = PortalClient::parse_cookie_pairs(material).expect("map form parses");
        assert_eq!(pairs, vec![("laravel_session".to_string(), "abc".to_string())]);
    }

    #[test]
    fn test_cookie_pairs_rejects_garbage() {
        assert!(PortalClient::parse_cookie_pairs("not json").is_err());
        assert!(PortalClient::parse_cookie_pairs("42").is_err());
        assert!(PortalClient::parse_cookie_pairs("[]").is_err());
    }

    #[test]
    fn test_auth_failure_statuses() {
        assert!(PortalClient::is_auth_failure(StatusCode::UNAUTHORIZED));
        assert!(PortalClient::is_auth_failure(StatusCode::FORBIDDEN));
        assert!(!PortalClient::is_auth_failure(StatusCode::OK));
        assert!(!PortalClient::is_auth_failure(StatusCode::BAD_GATEWAY));
    }
}
