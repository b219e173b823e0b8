/// Logger configuration derived from command-line arguments
///
/// Flags recognized:
/// - `--debug-<module>`: enable Debug level for that tag
/// - `--verbose`: enable Verbose level globally
/// - `--verbose-<module>`: enable Verbose level for that tag
/// - `--quiet`: raise the threshold to Warning
use super::levels::LogLevel;
use crate::arguments::get_cmd_args;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

/// Runtime logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Minimum level shown on the console (errors always pass)
    pub min_level: LogLevel,
    /// Tags with Debug level enabled via --debug-<module>
    pub debug_tags: HashSet<String>,
    /// Tags with Verbose level enabled via --verbose-<module>
    pub verbose_tags: HashSet<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Parse command-line arguments into the global logger configuration
pub fn init_from_args() {
    set_logger_config(parse_args(&get_cmd_args()));
}

/// Build a logger configuration from an argument list
fn parse_args(args: &[String]) -> LoggerConfig {
    let mut config = LoggerConfig::default();

    for arg in args {
        if arg == "--verbose" {
            config.min_level = LogLevel::Verbose;
        } else if arg == "--quiet" {
            config.min_level = LogLevel::Warning;
        } else if let Some(tag) = arg.strip_prefix("--verbose-") {
            config.verbose_tags.insert(tag.to_string());
        } else if let Some(tag) = arg.strip_prefix("--debug-") {
            config.debug_tags.insert(tag.to_string());
        }
    }

    config
}

/// Get a copy of the current logger configuration
pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG
        .read()
        .map(|c| c.clone())
        .unwrap_or_default()
}

/// Replace the global logger configuration
pub fn set_logger_config(config: LoggerConfig) {
    if let Ok(mut guard) = LOGGER_CONFIG.write() {
        *guard = config;
    }
}
