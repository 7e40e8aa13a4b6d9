use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use perfume_shop::activity::FileActivityLogger;
use perfume_shop::bot::{bot_commands, schema, BotContext, InlineKeyboards, TelegramTransport};
use perfume_shop::config::{Config, LogFormat};
use perfume_shop::db::SqliteRepository;
use perfume_shop::localization::DEFAULT_LANGUAGE;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    info!(config = ?config, "Starting perfume shop bot");

    let repository = Arc::new(
        SqliteRepository::connect(&config.database_url)
            .await
            .with_context(|| format!("Failed to open database {}", config.database_url))?,
    );

    let (activity, activity_task) = FileActivityLogger::spawn(&config.activity_log_path).await?;

    let bot = Bot::new(&config.telegram_token);

    let ctx = Arc::new(BotContext::new(
        Arc::new(TelegramTransport::new(bot.clone())),
        repository.clone(),
        repository,
        Arc::new(InlineKeyboards),
        Arc::new(activity),
        config.admin_id,
    ));

    if let Err(e) = bot
        .set_my_commands(bot_commands(&ctx.commands, Some(DEFAULT_LANGUAGE)))
        .await
    {
        warn!(error = %e, "Failed to register bot commands");
    }

    info!("Bot initialized, starting dispatcher");

    // A single worker keeps updates strictly ordered
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![ctx.clone()])
        .distribution_function(|_| Some(()))
        .default_handler(|upd| async move {
            warn!(update = ?upd.kind, "Unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped, flushing activity log");

    // The writer task ends once the last logger handle is gone
    drop(ctx);
    if let Err(e) = activity_task.await {
        warn!(error = %e, "Activity log writer ended abnormally");
    }

    Ok(())
}
