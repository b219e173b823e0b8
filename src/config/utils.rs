/// Configuration loading and access helpers
///
/// The global CONFIG is the single source of truth for configuration
/// values. It is initialized once at startup and read through
/// `with_config`, which holds the lock only for the closure's duration.
use super::schemas::Config;
use once_cell::sync::OnceCell;
use std::sync::RwLock;

/// Global configuration instance
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Default configuration file path
pub const CONFIG_FILE_PATH: &str = "data/config.toml";

/// Load configuration from disk and initialize the global CONFIG
///
/// If the config file doesn't exist, schema defaults are used. Environment
/// overrides are applied after parsing. Call once at startup.
pub fn load_config() -> Result<(), String> {
    let path = crate::arguments::config_path_override()
        .unwrap_or_else(|| CONFIG_FILE_PATH.to_string());
    load_config_from_path(&path)
}

/// Load configuration from a specific file path
pub fn load_config_from_path(path: &str) -> Result<(), String> {
    let mut config = if std::path::Path::new(path).exists() {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path, e))?;

        toml::from_str::<Config>(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path, e))?
    } else {
        eprintln!("⚠️  Config file '{}' not found, using default values", path);
        Config::default()
    };

    apply_env_overrides(&mut config);

    CONFIG
        .set(RwLock::new(config))
        .map_err(|_| "Config already initialized".to_string())?;

    Ok(())
}

/// Access the configuration through a closure
///
/// Panics if called before `load_config`; initialization order is a
/// startup invariant, not a runtime condition.
pub fn with_config<T>(f: impl FnOnce(&Config) -> T) -> T {
    let lock = CONFIG
        .get()
        .expect("config accessed before load_config()");
    let guard = lock.read().expect("config lock poisoned");
    f(&guard)
}

/// Environment variables win over file values for deploy-time secrets
fn apply_env_overrides(config: &mut Config) {
    if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
        if !token.is_empty() {
            config.telegram.bot_token = token;
        }
    }
    if let Ok(chat_id) = std::env::var("TELEGRAM_CHAT_ID") {
        if !chat_id.is_empty() {
            config.telegram.chat_id = chat_id;
        }
    }
    if let Ok(port) = std::env::var("PORT") {
        if let Ok(port) = port.parse::<u16>() {
            config.webserver.port = port;
        }
    }
}
