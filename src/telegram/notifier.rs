//! Telegram notifier for sending messages and notifications

use crate::config::with_config;
use crate::errors::DeliveryError;
use crate::logger::{self, LogTag};
use crate::notifications::NotificationSink;
use crate::telegram::keyboards;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardMarkup, ParseMode};

/// Telegram notifier for sending messages
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
    panel_url: String,
    support_url: String,
}

impl TelegramNotifier {
    /// Create a new Telegram notifier
    pub fn new(
        bot_token: &str,
        chat_id: &str,
        panel_url: &str,
        support_url: &str,
    ) -> Result<Self, String> {
        if bot_token.is_empty() {
            return Err("Bot token is empty".to_string());
        }

        if chat_id.is_empty() {
            return Err("Chat ID is empty".to_string());
        }

        let chat_id_parsed: i64 = chat_id
            .parse()
            .map_err(|e| format!("Invalid chat ID '{}': {}", chat_id, e))?;

        Ok(Self {
            bot: Bot::new(bot_token),
            chat_id: ChatId(chat_id_parsed),
            panel_url: panel_url.to_string(),
            support_url: support_url.to_string(),
        })
    }

    /// Create a notifier from config
    pub fn from_config() -> Result<Self, String> {
        let config = with_config(|c| c.telegram.clone());
        Self::new(
            &config.bot_token,
            &config.chat_id,
            &config.panel_url,
            &config.support_url,
        )
    }

    /// Send a plain text message
    pub async fn send_message(&self, message: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_message(self.chat_id, message)
            .parse_mode(ParseMode::Html)
            .await?;

        logger::debug(
            LogTag::Telegram,
            &format!("Sent Telegram message (length={})", message.len()),
        );
        Ok(())
    }

    /// Send a message with an inline keyboard
    pub async fn send_with_keyboard(
        &self,
        message: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), DeliveryError> {
        self.bot
            .send_message(self.chat_id, message)
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        self.send_with_keyboard(
            text,
            keyboards::notification_buttons(&self.panel_url, &self.support_url),
        )
        .await
    }
}
