//! Transport-neutral inbound events

use super::callback_data::CallbackData;
use crate::catalog_model::NewShopUser;
use crate::errors::CallbackDataError;

/// A text or photo message from a chat
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomingMessage {
    pub chat_id: i64,
    /// Telegram user id of the author, absent for channel posts
    pub sender_id: Option<u64>,
    /// Message text. Photo captions are not read, so photos carry no text
    pub text: Option<String>,
    /// File ids of the attached photo, lowest resolution first
    pub photos: Vec<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub language_code: Option<String>,
}

impl IncomingMessage {
    /// Classify as a command or a plain message
    pub fn into_event(self) -> BotEvent {
        match self.text.as_deref().and_then(parse_command) {
            Some(name) => BotEvent::Command { name, message: self },
            None => BotEvent::Message(self),
        }
    }

    pub fn language(&self) -> Option<&str> {
        self.language_code.as_deref()
    }

    /// Profile data for the user directory
    pub fn profile(&self) -> NewShopUser {
        NewShopUser {
            chat_id: self.chat_id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            language_code: self.language_code.clone(),
        }
    }
}

/// Opaque handle used to answer a button press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckHandle(pub String);

/// An inline keyboard button press
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonPress {
    pub chat_id: i64,
    /// Decoded callback data, or why it could not be decoded
    pub data: Result<CallbackData, CallbackDataError>,
    /// Callback data exactly as received
    pub raw_data: String,
    pub ack: AckHandle,
    pub language_code: Option<String>,
}

impl ButtonPress {
    pub fn new(chat_id: i64, raw_data: impl Into<String>, ack: AckHandle) -> Self {
        let raw_data = raw_data.into();
        Self {
            chat_id,
            data: raw_data.parse(),
            raw_data,
            ack,
            language_code: None,
        }
    }

    pub fn with_language(mut self, language_code: Option<String>) -> Self {
        self.language_code = language_code;
        self
    }

    pub fn language(&self) -> Option<&str> {
        self.language_code.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BotEvent {
    /// A message whose text starts with `/name`
    Command { name: String, message: IncomingMessage },
    Message(IncomingMessage),
    Button(ButtonPress),
}

impl BotEvent {
    pub fn chat_id(&self) -> i64 {
        match self {
            BotEvent::Command { message, .. } | BotEvent::Message(message) => message.chat_id,
            BotEvent::Button(press) => press.chat_id,
        }
    }

    /// Text recorded in the activity log
    pub fn activity_text(&self) -> &str {
        match self {
            BotEvent::Command { message, .. } | BotEvent::Message(message) => {
                message.text.as_deref().unwrap_or("")
            }
            BotEvent::Button(press) => &press.raw_data,
        }
    }
}

/// Extract the command name from `/name@bot args`. Names are case-sensitive.
pub fn parse_command(text: &str) -> Option<String> {
    let first = text.split_whitespace().next()?;
    let name = first.strip_prefix('/')?;
    let name = name.split('@').next().unwrap_or(name);

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
