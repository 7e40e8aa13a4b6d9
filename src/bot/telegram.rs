//! Telegram transport: turns teloxide updates into bot events and bot
//! replies into Bot API requests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{
    BotCommand, CallbackQueryId, FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile,
    ParseMode,
};

use super::command_registry::CommandRegistry;
use super::events::{AckHandle, BotEvent, ButtonPress, IncomingMessage};
use super::message_handler::{handle_event, BotContext};
use super::transport::Transport;
use super::ui_builder::Keyboard;
use crate::localization::t_lang;

/// Convert a keyboard layout into Telegram inline markup
pub fn inline_markup(keyboard: Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.into_iter().map(|row| {
        row.into_iter()
            .map(|button| InlineKeyboardButton::callback(button.label, button.data.data()))
            .collect::<Vec<_>>()
    }))
}

/// Bot API backed transport
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(&self, chat_id: i64, text: &str, keyboard: Option<Keyboard>) -> Result<()> {
        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(inline_markup(keyboard));
        }
        request.await.context("Failed to send message")?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        image_id: &str,
        caption: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<()> {
        let mut request = self
            .bot
            .send_photo(ChatId(chat_id), InputFile::file_id(FileId(image_id.to_string())))
            .caption(caption)
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(inline_markup(keyboard));
        }
        request.await.context("Failed to send photo")?;
        Ok(())
    }

    async fn answer_callback(&self, ack: &AckHandle, text: Option<&str>) -> Result<()> {
        let mut request = self.bot.answer_callback_query(CallbackQueryId(ack.0.clone()));
        if let Some(text) = text {
            request = request.text(text);
        }
        request.await.context("Failed to answer callback query")?;
        Ok(())
    }
}

/// Decode a Telegram message
pub fn event_from_message(msg: &Message) -> BotEvent {
    let from = msg.from.as_ref();

    IncomingMessage {
        chat_id: msg.chat.id.0,
        sender_id: from.map(|user| user.id.0),
        text: msg.text().map(str::to_owned),
        photos: msg
            .photo()
            .map(|photos| photos.iter().map(|p| p.file.id.0.clone()).collect())
            .unwrap_or_default(),
        username: from.and_then(|user| user.username.clone()),
        first_name: from.map(|user| user.first_name.clone()),
        language_code: from.and_then(|user| user.language_code.clone()),
    }
    .into_event()
}

/// Decode a Telegram callback query
pub fn event_from_callback(q: &CallbackQuery) -> BotEvent {
    // Without the originating message, fall back to the private chat with the user
    let chat_id = q
        .message
        .as_ref()
        .map(|msg| msg.chat().id.0)
        .unwrap_or(q.from.id.0 as i64);

    let press = ButtonPress::new(
        chat_id,
        q.data.clone().unwrap_or_default(),
        AckHandle(q.id.0.clone()),
    )
    .with_language(q.from.language_code.clone());

    BotEvent::Button(press)
}

/// Command menu entries for `set_my_commands`
pub fn bot_commands(registry: &CommandRegistry, language_code: Option<&str>) -> Vec<BotCommand> {
    registry
        .commands()
        .map(|command| BotCommand::new(command.name(), t_lang(command.description_key(), language_code)))
        .collect()
}

/// Update handler tree
pub fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback_query))
}

async fn on_message(msg: Message, ctx: Arc<BotContext>) -> Result<()> {
    handle_event(&ctx, event_from_message(&msg)).await;
    Ok(())
}

async fn on_callback_query(q: CallbackQuery, ctx: Arc<BotContext>) -> Result<()> {
    handle_event(&ctx, event_from_callback(&q)).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::callback_data::CallbackData;
    use crate::bot::ui_builder::{InlineKeyboards, KeyboardProvider};
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn test_inline_markup_keeps_layout_and_data() {
        let markup = inline_markup(InlineKeyboards.product_type_menu(Some("en")));

        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0].len(), 2);
        assert_eq!(markup.inline_keyboard[0][0].text, "Female");
        assert_eq!(
            markup.inline_keyboard[1][0].kind,
            InlineKeyboardButtonKind::CallbackData(
                CallbackData::ProductType(crate::catalog_model::ProductType::Unisex).data()
            )
        );
    }

    #[test]
    fn test_bot_commands_from_registry() {
        let commands = bot_commands(&CommandRegistry::new(), Some("en"));
        let names: Vec<_> = commands.iter().map(|c| c.command.as_str()).collect();
        assert_eq!(names, vec!["new", "start"]);
        assert!(commands.iter().all(|c| !c.description.is_empty()));
    }
}
