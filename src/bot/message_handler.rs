//! Message Handler module: the shared bot context and the per-event dispatch

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

use super::callback_handler::callback_handler;
use super::command_registry::{handle_unknown, run_command, CommandRegistry};
use super::dialogue_manager::handle_dialogue_message;
use super::events::{BotEvent, IncomingMessage};
use super::transport::Transport;
use super::ui_builder::KeyboardProvider;
use crate::activity::{ActivityLogger, ActivityRecord};
use crate::db::{ProductRepository, UserRepository};
use crate::dialogue::ConversationStore;

/// Everything the handlers depend on, wired once at startup
pub struct BotContext {
    pub transport: Arc<dyn Transport>,
    pub products: Arc<dyn ProductRepository>,
    pub users: Arc<dyn UserRepository>,
    pub keyboards: Arc<dyn KeyboardProvider>,
    pub activity: Arc<dyn ActivityLogger>,
    pub conversations: ConversationStore,
    pub commands: CommandRegistry,
    /// Telegram user id allowed to add products
    pub admin_id: u64,
}

impl BotContext {
    pub fn new(
        transport: Arc<dyn Transport>,
        products: Arc<dyn ProductRepository>,
        users: Arc<dyn UserRepository>,
        keyboards: Arc<dyn KeyboardProvider>,
        activity: Arc<dyn ActivityLogger>,
        admin_id: u64,
    ) -> Self {
        Self {
            transport,
            products,
            users,
            keyboards,
            activity,
            conversations: ConversationStore::new(),
            commands: CommandRegistry::new(),
            admin_id,
        }
    }
}

/// Handle one inbound event and record it in the activity log.
///
/// Handler errors are logged here; they never propagate to the caller.
pub async fn handle_event(ctx: &BotContext, event: BotEvent) {
    let started = Instant::now();
    let chat_id = event.chat_id();

    let result = match &event {
        BotEvent::Button(press) => callback_handler(ctx, press).await,
        BotEvent::Command { name, message } => message_handler(ctx, message, Some(name.as_str())).await,
        BotEvent::Message(message) => message_handler(ctx, message, None).await,
    };

    if let Err(e) = result {
        error!(user_id = chat_id, error = ?e, "Failed to handle update");
    }

    ctx.activity.log_activity(ActivityRecord::new(
        chat_id,
        event.activity_text(),
        started.elapsed(),
    ));
}

/// A dialogue in progress takes every message, commands included;
/// otherwise commands go to the registry and anything else is unknown.
pub async fn message_handler(
    ctx: &BotContext,
    msg: &IncomingMessage,
    command: Option<&str>,
) -> Result<()> {
    let current = ctx
        .conversations
        .get(msg.chat_id)
        .await
        .context("Failed to load dialogue")?;
    if !current.is_idle() {
        debug!(user_id = msg.chat_id, state = ?current.state(), "Continuing dialogue");
        return handle_dialogue_message(ctx, msg, current).await;
    }

    match command.and_then(|name| ctx.commands.lookup(name)) {
        Some(command) => run_command(ctx, command, msg).await,
        None => handle_unknown(ctx, msg).await,
    }
}
