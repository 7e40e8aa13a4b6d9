//! Slash command registry and the stateless command handlers

use anyhow::Result;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::dialogue_manager::begin_new_product;
use super::events::IncomingMessage;
use super::message_handler::BotContext;
use crate::localization::t_lang;

/// Commands the bot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Welcome message with the main menu, open to everyone
    Start,
    /// Start the add-product dialogue, administrator only
    NewProduct,
}

impl Command {
    /// Name without the leading slash
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::NewProduct => "new",
        }
    }

    /// Localization key of the command menu description
    pub fn description_key(&self) -> &'static str {
        match self {
            Command::Start => "command-start",
            Command::NewProduct => "command-new",
        }
    }
}

/// Maps command names (case-sensitive, no slash) to commands
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Command>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let mut registry = Self {
            commands: BTreeMap::new(),
        };
        registry.register(Command::Start);
        registry.register(Command::NewProduct);
        registry
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) {
        self.commands.insert(command.name(), command);
    }

    pub fn lookup(&self, name: &str) -> Option<Command> {
        self.commands.get(name).copied()
    }

    /// Registered commands, ordered by name
    pub fn commands(&self) -> impl Iterator<Item = Command> + '_ {
        self.commands.values().copied()
    }
}

/// Run a registered command
pub async fn run_command(ctx: &BotContext, command: Command, msg: &IncomingMessage) -> Result<()> {
    debug!(user_id = msg.chat_id, command = command.name(), "Running command");
    match command {
        Command::Start => handle_start(ctx, msg).await,
        Command::NewProduct => begin_new_product(ctx, msg).await,
    }
}

/// Welcome text with the main menu; also registers the customer
async fn handle_start(ctx: &BotContext, msg: &IncomingMessage) -> Result<()> {
    if let Err(e) = ctx.users.get_or_create_user(&msg.profile()).await {
        warn!(user_id = msg.chat_id, error = %e, "Failed to register user");
    }

    let keyboard = ctx.keyboards.main_menu(msg.language());
    ctx.transport
        .send_text(msg.chat_id, &t_lang("welcome", msg.language()), Some(keyboard))
        .await
}

/// Reply for unregistered commands and plain text outside a dialogue
pub async fn handle_unknown(ctx: &BotContext, msg: &IncomingMessage) -> Result<()> {
    ctx.transport
        .send_text(msg.chat_id, &t_lang("unknown-command", msg.language()), None)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_commands() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.lookup("start"), Some(Command::Start));
        assert_eq!(registry.lookup("new"), Some(Command::NewProduct));
        assert_eq!(registry.lookup("help"), None);
        // Case-sensitive, no slash
        assert_eq!(registry.lookup("Start"), None);
        assert_eq!(registry.lookup("/start"), None);
    }

    #[test]
    fn test_commands_listing() {
        let names: Vec<_> = CommandRegistry::new().commands().map(|c| c.name()).collect();
        assert_eq!(names, vec!["new", "start"]);
    }
}
