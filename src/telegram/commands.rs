//! Command handlers and stats rendering
//!
//! Handlers are stateless: they read the published range overview and
//! reply. The overview is None until the first tick commits, in which
//! case the user sees a collecting-data placeholder.

use crate::logger::{self, LogTag};
use crate::monitor::snapshot;
use crate::resolver;
use crate::telegram::keyboards;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, ParseMode};

/// Ranges shown in the stats message
const STATS_TOP_N: usize = 25;

/// Render the live country statistics text
pub fn render_stats() -> String {
    render_overview(snapshot::current().as_deref())
}

/// Render a specific overview (separated from the global read for tests)
fn render_overview(overview: Option<&snapshot::RangeOverview>) -> String {
    let overview = match overview {
        Some(overview) => overview,
        None => return "⏳ Collecting data...".to_string(),
    };

    let mut entries = overview.entries.clone();
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    let mut text = String::from("📊 <b>Live Country Statistics</b>\n\n");
    for entry in entries.iter().take(STATS_TOP_N) {
        let country = resolver::resolve_country(&entry.range);
        text.push_str(&format!(
            "{} <b>{}</b> : <code>{}</code> SMS",
            country.flag, country.display_name, entry.count
        ));
        if let Some(service) = &entry.last_service {
            text.push_str(&format!(" · {}", service));
        }
        text.push('\n');
    }
    text
}

/// Handle a single incoming command
pub async fn handle_command(bot: &Bot, chat_id: ChatId, text: &str) -> Result<(), String> {
    let text = text.trim();
    if !text.starts_with('/') {
        return Ok(());
    }

    let command = text.split_whitespace().next().unwrap_or("");
    match command {
        "/start" | "/stats" => {
            bot.send_message(chat_id, render_stats())
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboards::stats_keyboard())
                .await
                .map_err(|e| format!("Failed to send stats: {}", e))?;
        }
        "/help" => {
            bot.send_message(chat_id, help_text())
                .parse_mode(ParseMode::Html)
                .await
                .map_err(|e| format!("Failed to send help: {}", e))?;
        }
        _ => {
            bot.send_message(
                chat_id,
                format!(
                    "❓ Unknown command: {}\n\nUse /help to see available commands.",
                    command
                ),
            )
            .await
            .map_err(|e| format!("Failed to send response: {}", e))?;
        }
    }

    logger::info(
        LogTag::Telegram,
        &format!("Handled Telegram command: {}", command),
    );
    Ok(())
}

/// Re-render the stats message in place (refresh button)
pub async fn handle_refresh(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
) -> Result<(), String> {
    bot.edit_message_text(chat_id, message_id, render_stats())
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboards::stats_keyboard())
        .await
        .map_err(|e| format!("Failed to refresh stats: {}", e))?;
    Ok(())
}

fn help_text() -> String {
    "🤖 <b>smswatch Commands</b>\n\n\
     /stats - Live per-country arrival statistics\n\
     /start - Same as /stats\n\
     /help - Show this help message\n\n\
     <i>Note: Commands only work from the configured chat ID.</i>"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::snapshot::{RangeOverview, RangeOverviewEntry};

    #[test]
    fn test_placeholder_before_first_tick() {
        assert_eq!(render_overview(None), "⏳ Collecting data...");
    }

    #[test]
    fn test_stats_renders_sorted_with_flags() {
        let overview = RangeOverview {
            entries: vec![
                RangeOverviewEntry {
                    range: "Indonesia (+62)".to_string(),
                    count: 3,
                    last_service: None,
                },
                RangeOverviewEntry {
                    range: "Russian (+7)".to_string(),
                    count: 9,
                    last_service: Some("WhatsApp".to_string()),
                },
            ],
            updated_at: chrono::Utc::now(),
        };

        let text = render_overview(Some(&overview));
        assert!(text.contains("Live Country Statistics"));
        let ru = text.find("🇷🇺").expect("russian flag");
        let id = text.find("🇮🇩").expect("indonesian flag");
        // Higher count sorts first
        assert!(ru < id);
        assert!(text.contains("<code>9</code> SMS · WhatsApp"));
    }
}
