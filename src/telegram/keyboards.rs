//! Inline keyboard builders

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Create a callback button
fn btn(text: &str, callback_data: &str) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text.to_string(), callback_data.to_string())
}

/// Create a URL button (falls back to a callback button if the URL is invalid)
fn url_btn(text: &str, url: &str) -> InlineKeyboardButton {
    match url.parse() {
        Ok(parsed_url) => InlineKeyboardButton::url(text.to_string(), parsed_url),
        Err(_) => InlineKeyboardButton::callback(text.to_string(), "error:invalid_url".to_string()),
    }
}

/// Button row attached to every arrival notification
pub fn notification_buttons(panel_url: &str, support_url: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        url_btn("‼️ Bot Panel", panel_url),
        url_btn("♻️ All Support", support_url),
    ]])
}

/// Refresh row under the stats message
pub fn stats_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![btn("🔄 Refresh", "stats:refresh")]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_buttons_single_row() {
        let keyboard = notification_buttons("https://t.me/panel", "https://t.me/support");
        assert_eq!(keyboard.inline_keyboard.len(), 1);
        assert_eq!(keyboard.inline_keyboard[0].len(), 2);
    }

    #[test]
    fn test_invalid_url_degrades_to_callback() {
        let keyboard = notification_buttons("not a url", "https://t.me/support");
        // Still renders two buttons instead of panicking
        assert_eq!(keyboard.inline_keyboard[0].len(), 2);
    }

    #[test]
    fn test_callback_data_length() {
        // Telegram limits callback data to 64 bytes
        let keyboard = stats_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), 1);
        assert!("stats:refresh".len() <= 64);
    }
}
