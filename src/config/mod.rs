//! Configuration system for smswatch
//!
//! TOML-backed configuration loaded once at startup into a global,
//! thread-safe store. Secrets can be supplied via environment variables
//! instead of the file (see [`schemas`] for the override list).

pub mod schemas;
pub mod utils;

pub use schemas::{Config, MonitorConfig, PortalConfig, TelegramConfig, WebserverConfig};
pub use utils::{load_config, load_config_from_path, with_config, CONFIG_FILE_PATH};
