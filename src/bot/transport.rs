//! Outbound side of the chat transport

use anyhow::Result;
use async_trait::async_trait;

use super::events::AckHandle;
use super::ui_builder::Keyboard;

/// Everything the bot core needs to reply to a chat
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a plain text message
    async fn send_text(&self, chat_id: i64, text: &str, keyboard: Option<Keyboard>) -> Result<()>;

    /// Send a photo by file id with an HTML caption
    async fn send_photo(
        &self,
        chat_id: i64,
        image_id: &str,
        caption: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<()>;

    /// Dismiss the loading indicator of a button press, optionally showing a toast
    async fn answer_callback(&self, ack: &AckHandle, text: Option<&str>) -> Result<()>;
}
