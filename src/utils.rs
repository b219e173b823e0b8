//! Shared helpers used across the monitor, telegram and webserver tasks.

use std::time::Duration;
use tokio::sync::Notify;

/// Waits for either shutdown signal or delay. Returns true if shutdown was triggered.
pub async fn check_shutdown_or_delay(shutdown: &Notify, duration: Duration) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => false,
        _ = shutdown.notified() => true,
    }
}

/// Current date in the portal's DD/MM/YYYY query format
pub fn portal_date_today() -> String {
    chrono::Local::now().format("%d/%m/%Y").to_string()
}

/// Format seconds into a human-readable duration
pub fn format_duration(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Escape text for Telegram HTML parse mode
///
/// Portal-sourced text (phone numbers, message bodies) goes inside
/// `<code>` spans; unescaped angle brackets would break the parse.
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
