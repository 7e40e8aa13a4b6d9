//! Callback Handler module for processing inline keyboard button presses

use anyhow::Result;
use tracing::{debug, error};

use super::callback_data::CallbackData;
use super::dialogue_manager::handle_product_type_input;
use super::events::ButtonPress;
use super::message_handler::BotContext;
use super::ui_builder::format_product_caption;
use crate::errors::CallbackDataError;
use crate::localization::{t_args_lang, t_lang};

/// Route a button press. The press is always answered, whichever branch ran.
pub async fn callback_handler(ctx: &BotContext, press: &ButtonPress) -> Result<()> {
    debug!(user_id = press.chat_id, data = %press.raw_data, "Received callback query");

    let result = route_callback(ctx, press).await;

    // Answer the callback query to remove the loading state
    if let Err(e) = ctx.transport.answer_callback(&press.ack, None).await {
        error!(user_id = press.chat_id, error = %e, "Failed to answer callback query");
    }

    result
}

async fn route_callback(ctx: &BotContext, press: &ButtonPress) -> Result<()> {
    let language_code = press.language();

    let data = match &press.data {
        Ok(data) => *data,
        Err(CallbackDataError::InvalidProductId(raw_id)) => {
            // Still a buy button; echo whatever id it carried
            return send_buy_stub(ctx, press.chat_id, raw_id, language_code).await;
        }
        Err(e) => {
            // Stale or foreign button, nothing to do
            debug!(user_id = press.chat_id, error = %e, "Ignoring undecodable callback data");
            return Ok(());
        }
    };

    match data {
        CallbackData::Catalog => send_catalog(ctx, press.chat_id, language_code).await,
        CallbackData::About => {
            ctx.transport
                .send_text(press.chat_id, &t_lang("about", language_code), None)
                .await
        }
        CallbackData::Help => {
            ctx.transport
                .send_text(press.chat_id, &t_lang("help-text", language_code), None)
                .await
        }
        CallbackData::Buy { product_id } => {
            send_buy_stub(ctx, press.chat_id, &product_id.to_string(), language_code).await
        }
        CallbackData::ProductType(product_type) => {
            handle_product_type_input(ctx, press.chat_id, product_type, language_code).await
        }
    }
}

/// Checkout is not implemented yet
async fn send_buy_stub(
    ctx: &BotContext,
    chat_id: i64,
    product_id: &str,
    language_code: Option<&str>,
) -> Result<()> {
    ctx.transport
        .send_text(
            chat_id,
            &t_args_lang("buy-stub", &[("product_id", product_id)], language_code),
            None,
        )
        .await
}

/// Send every product as a photo with caption and a buy button
pub async fn send_catalog(ctx: &BotContext, chat_id: i64, language_code: Option<&str>) -> Result<()> {
    let products = match ctx.products.list_products().await {
        Ok(products) => products,
        Err(e) => {
            error!(user_id = chat_id, error = %e, "Failed to load catalog");
            return ctx
                .transport
                .send_text(chat_id, &t_lang("catalog-failed", language_code), None)
                .await;
        }
    };

    if products.is_empty() {
        return ctx
            .transport
            .send_text(chat_id, &t_lang("catalog-empty", language_code), None)
            .await;
    }

    for product in &products {
        let caption = format_product_caption(product, language_code);
        let keyboard = ctx.keyboards.buy_button(product.id, language_code);

        // One broken entry (e.g. an expired file id) must not hide the rest
        if let Err(e) = ctx
            .transport
            .send_photo(chat_id, &product.image_id, &caption, Some(keyboard))
            .await
        {
            error!(user_id = chat_id, product_id = product.id, error = %e, "Failed to send catalog entry");
        }
    }

    Ok(())
}
