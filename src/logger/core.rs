/// Core logging implementation with automatic filtering
///
/// Filtering rules:
/// 1. Errors are always shown
/// 2. Check against the minimum log level threshold
/// 3. Debug level requires --debug-<module> for that tag
/// 4. Verbose level requires --verbose OR --verbose-<module> for that tag
use super::config::get_logger_config;
use super::levels::LogLevel;
use super::tags::LogTag;

/// Check if a log message should be displayed under the active config
pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    should_log_with(&get_logger_config(), tag, level)
}

fn should_log_with(config: &super::config::LoggerConfig, tag: &LogTag, level: LogLevel) -> bool {
    if level == LogLevel::Error {
        return true;
    }

    if level == LogLevel::Debug {
        return config.min_level >= LogLevel::Debug || config.debug_tags.contains(&tag.to_debug_key());
    }

    if level == LogLevel::Verbose {
        return config.min_level == LogLevel::Verbose
            || config.verbose_tags.contains(&tag.to_debug_key());
    }

    level <= config.min_level
}

/// Internal logging entry point used by the public level functions
pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }

    super::format::format_and_log(tag, level, message);
}
