//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `events`: transport-neutral inbound events
//! - `message_handler`: the shared context and per-event dispatch
//! - `command_registry`: slash commands and their handlers
//! - `callback_handler`: inline keyboard button presses
//! - `dialogue_manager`: the add-product conversation
//! - `ui_builder`: keyboards and message formatting
//! - `telegram`: the teloxide adapter

pub mod callback_data;
pub mod callback_handler;
pub mod command_registry;
pub mod dialogue_manager;
pub mod events;
pub mod message_handler;
pub mod telegram;
pub mod transport;
pub mod ui_builder;

// Re-export main handler entry points for use in main.rs
pub use message_handler::{handle_event, BotContext};
pub use telegram::{bot_commands, schema, TelegramTransport};
pub use transport::Transport;
pub use ui_builder::{InlineKeyboards, Keyboard, KeyboardProvider};
