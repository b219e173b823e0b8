//! Manual getUpdates polling loop
//!
//! Listens for incoming commands and callback queries, gated to the
//! configured chat. Runs as a background task until shutdown. Offsets
//! are tracked so processed updates are acknowledged and not redelivered.

use crate::config::with_config;
use crate::logger::{self, LogTag};
use crate::telegram::commands;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::{ChatId, UpdateKind};
use tokio::sync::Notify;

/// Start the Telegram command handler task
///
/// Returns the join handle; the task stops when `shutdown` fires.
pub fn start_polling(shutdown: Arc<Notify>) -> Result<tokio::task::JoinHandle<()>, String> {
    let config = with_config(|c| c.telegram.clone());
    if config.bot_token.is_empty() {
        return Err("Bot token is empty".to_string());
    }

    let chat_id_parsed: i64 = config
        .chat_id
        .parse()
        .map_err(|e| format!("Invalid chat ID '{}': {}", config.chat_id, e))?;

    let bot = Bot::new(config.bot_token);
    let allowed_chat_id = ChatId(chat_id_parsed);

    let handle = tokio::spawn(async move {
        logger::info(LogTag::Telegram, "Telegram command handler started");
        let mut offset: Option<i32> = None;

        loop {
            tokio::select! {
                _ = shutdown.notified() => {
                    logger::info(LogTag::Telegram, "Telegram command handler shutting down");
                    break;
                }
                _ = poll_once(&bot, allowed_chat_id, &mut offset) => {
                    // Continue polling
                }
            }
        }
    });

    Ok(handle)
}

/// Fetch and route one batch of updates
async fn poll_once(bot: &Bot, allowed_chat_id: ChatId, offset: &mut Option<i32>) {
    let mut request = bot.get_updates().timeout(10);
    if let Some(current) = offset {
        request = request.offset(*current);
    }

    let updates = match request.await {
        Ok(updates) => updates,
        Err(e) => {
            // Connection hiccups are routine; don't spam the log
            logger::debug(
                LogTag::Telegram,
                &format!("Error fetching Telegram updates: {}", e),
            );
            tokio::time::sleep(Duration::from_secs(2)).await;
            return;
        }
    };

    for update in updates {
        *offset = Some(update.id.0 as i32 + 1);

        match update.kind {
            UpdateKind::Message(message) => {
                // Only respond to messages from the configured chat
                if message.chat.id != allowed_chat_id {
                    logger::warning(
                        LogTag::Telegram,
                        &format!("Ignoring message from unauthorized chat: {}", message.chat.id),
                    );
                    continue;
                }

                if let Some(text) = message.text() {
                    if let Err(e) = commands::handle_command(bot, allowed_chat_id, text).await {
                        logger::error(
                            LogTag::Telegram,
                            &format!("Error handling command '{}': {}", text, e),
                        );
                    }
                }
            }

            UpdateKind::CallbackQuery(query) => {
                // Stop the client-side loading spinner regardless of outcome
                if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
                    logger::debug(
                        LogTag::Telegram,
                        &format!("Failed to answer callback query: {}", e),
                    );
                }

                let target = match &query.message {
                    Some(message) if message.chat().id == allowed_chat_id => {
                        (message.chat().id, message.id())
                    }
                    _ => continue,
                };

                if query.data.as_deref() == Some("stats:refresh") {
                    if let Err(e) = commands::handle_refresh(bot, target.0, target.1).await {
                        logger::error(
                            LogTag::Telegram,
                            &format!("Error refreshing stats: {}", e),
                        );
                    }
                }
            }

            _ => {}
        }
    }
}
