//! Configuration schema with per-section defaults
//!
//! Every section and field is optional in the TOML file; missing values
//! fall back to the defaults below. Environment overrides (applied after
//! parsing): `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`, `PORT`. The portal
//! cookie material itself is read by the portal client (`COOKIES_JSON`
//! env, else the configured cookies file).

use serde::Deserialize;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub portal: PortalConfig,
    pub telegram: TelegramConfig,
    pub monitor: MonitorConfig,
    pub webserver: WebserverConfig,
}

/// Portal (upstream SMS panel) connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Base URL of the SMS panel
    pub base_url: String,
    /// Path to the cookie material file (JSON, list or map form)
    pub cookies_file: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.ivasms.com".to_string(),
            cookies_file: "cookies.json".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Telegram bot settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token from @BotFather
    pub bot_token: String,
    /// Chat ID that receives notifications and may issue commands
    pub chat_id: String,
    /// URL behind the first notification button
    pub panel_url: String,
    /// URL behind the support notification button
    pub support_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            panel_url: "https://t.me/".to_string(),
            support_url: "https://t.me/".to_string(),
        }
    }
}

/// Monitor loop timing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Sleep between ticks
    pub poll_interval_secs: u64,
    /// Sleep between failed authentication attempts
    pub auth_retry_secs: u64,
    /// Sleep after a failed counter fetch
    pub error_backoff_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 8,
            auth_retry_secs: 5,
            error_backoff_secs: 30,
        }
    }
}

/// Status API bind settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebserverConfig {
    pub host: String,
    pub port: u16,
}

impl Default for WebserverConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}
