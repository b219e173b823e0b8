/// Centralized argument handling for smswatch
///
/// Consolidates command-line argument parsing and debug flag checking.
/// Debug flags follow the `--debug-<module>` convention and are consumed
/// by the logger's filtering rules.
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
/// Used by tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Gets the value of a command-line argument that follows a flag
/// Returns None if the flag is not found or has no value
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    for (i, arg) in args.iter().enumerate() {
        if arg == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

/// Check if help output was requested
pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

/// Override path for the config file (`--config <path>`)
pub fn config_path_override() -> Option<String> {
    get_arg_value("--config")
}

/// Webserver debug mode
pub fn is_debug_webserver_enabled() -> bool {
    has_arg("--debug-webserver")
}

/// Print usage information
pub fn print_help() {
    println!("smswatch - SMS/OTP portal monitor with Telegram notifications");
    println!();
    println!("USAGE:");
    println!("    smswatch [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --config <path>       Config file path (default: data/config.toml)");
    println!("    --debug-<module>      Enable debug logs for a module");
    println!("                          (monitor, portal, telegram, webserver, resolver)");
    println!("    --verbose             Enable verbose logs for all modules");
    println!("    --quiet               Suppress info-level logs");
    println!("    -h, --help            Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    TELEGRAM_BOT_TOKEN    Overrides [telegram].bot_token");
    println!("    TELEGRAM_CHAT_ID      Overrides [telegram].chat_id");
    println!("    COOKIES_JSON          Portal cookie material (overrides cookies file)");
    println!("    PORT                  Overrides [webserver].port");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_arg_value() {
        set_cmd_args(vec![
            "smswatch".to_string(),
            "--config".to_string(),
            "custom.toml".to_string(),
        ]);
        assert_eq!(get_arg_value("--config"), Some("custom.toml".to_string()));
        assert_eq!(get_arg_value("--missing"), None);
        set_cmd_args(vec!["smswatch".to_string()]);
    }
}
