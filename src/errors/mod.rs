//! Error taxonomy for smswatch
//!
//! Three recoverable error families, none fatal to the process:
//! - [`AuthError`]: portal session invalid or expired; the monitor loop
//!   re-authenticates indefinitely with a fixed delay.
//! - [`UpstreamError`]: transient portal failure; triggers per-call skip or
//!   tick-level backoff.
//! - [`DeliveryError`]: notification transport failure; logged and dropped,
//!   never blocks the loop or rolls back committed state.

use thiserror::Error;

/// Portal session errors requiring (re-)authentication
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("no cookie material available (set COOKIES_JSON or provide the cookies file)")]
    MissingCookies,

    #[error("cookie material is not valid JSON: {0}")]
    InvalidCookies(String),

    #[error("portal rejected the session: {0}")]
    SessionRejected(String),

    #[error("csrf token not found on portal page")]
    MissingCsrfToken,

    #[error("login request failed: {0}")]
    Request(String),
}

/// Transient upstream failures (network, timeout, unparseable markup)
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("unexpected response from {endpoint}: {message}")]
    Malformed { endpoint: String, message: String },
}

impl UpstreamError {
    /// Classify a reqwest error for an endpoint
    pub fn from_reqwest(endpoint: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else {
            UpstreamError::Request {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// Union error returned by the Snapshot Fetcher operations
///
/// Callers branch on the variant: `Auth` sends the monitor loop back to
/// authentication, `Upstream` is skipped or backed off.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Notification transport failures
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("telegram send failed: {0}")]
    Send(String),

    #[error("notification transport not configured")]
    NotConfigured,
}

impl From<teloxide::RequestError> for DeliveryError {
    fn from(err: teloxide::RequestError) -> Self {
        DeliveryError::Send(err.to_string())
    }
}
