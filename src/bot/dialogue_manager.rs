//! Dialogue Manager module for the add-product flow.
//!
//! Each function reacts to exactly one event and stores the conversation's
//! next state; waiting for the next step is stored state, never a suspended
//! call.

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use super::events::IncomingMessage;
use super::message_handler::BotContext;
use crate::catalog_model::ProductType;
use crate::dialogue::{
    parse_price, validate_text_field, ConversationState, InputError, ProductDialogueState,
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN,
};
use crate::localization::{t_args_lang, t_lang};

/// Entry point of the flow (`/new`). Only the administrator may start it.
pub async fn begin_new_product(ctx: &BotContext, msg: &IncomingMessage) -> Result<()> {
    let language_code = msg.language();

    if msg.sender_id != Some(ctx.admin_id) {
        warn!(user_id = msg.chat_id, sender_id = ?msg.sender_id, "Rejected add-product attempt");
        return ctx
            .transport
            .send_text(msg.chat_id, &t_lang("permission-denied", language_code), None)
            .await;
    }

    ctx.conversations
        .begin(msg.chat_id)
        .await
        .context("Failed to start dialogue")?;
    info!(user_id = msg.chat_id, "Add-product dialogue started");

    ctx.transport
        .send_text(
            msg.chat_id,
            &t_lang("choose-product-type", language_code),
            Some(ctx.keyboards.product_type_menu(language_code)),
        )
        .await
}

/// Product type button. Valid only while the chat is choosing a type; any
/// other state means the dialogue was lost (typically a restart).
pub async fn handle_product_type_input(
    ctx: &BotContext,
    chat_id: i64,
    product_type: ProductType,
    language_code: Option<&str>,
) -> Result<()> {
    let current = ctx
        .conversations
        .get(chat_id)
        .await
        .context("Failed to load dialogue")?;
    let state = current.state();

    let Some(next) = current.with_product_type(product_type) else {
        warn!(user_id = chat_id, state = ?state, "Product type chosen outside of the dialogue");
        return send_context_lost(ctx, chat_id, language_code).await;
    };

    ctx.conversations
        .advance(chat_id, next)
        .await
        .context("Failed to update dialogue")?;
    debug!(user_id = chat_id, product_type = %product_type, "Product type selected");

    ctx.transport
        .send_text(chat_id, &t_lang("send-photo", language_code), None)
        .await
}

/// Message received while a dialogue is in progress
pub async fn handle_dialogue_message(
    ctx: &BotContext,
    msg: &IncomingMessage,
    current: ProductDialogueState,
) -> Result<()> {
    match current.state() {
        ConversationState::Idle => {
            debug!(user_id = msg.chat_id, "No dialogue in progress, ignoring message");
            Ok(())
        }
        ConversationState::AwaitingType => {
            // The type is chosen with a button; show the buttons again
            ctx.transport
                .send_text(
                    msg.chat_id,
                    &t_lang("choose-product-type", msg.language()),
                    Some(ctx.keyboards.product_type_menu(msg.language())),
                )
                .await
        }
        ConversationState::AwaitingPhoto => handle_photo_input(ctx, msg, current).await,
        ConversationState::AwaitingName => {
            handle_text_input(ctx, msg, current, MAX_NAME_LEN, ProductDialogueState::with_name)
                .await
        }
        ConversationState::AwaitingDescription => {
            handle_text_input(
                ctx,
                msg,
                current,
                MAX_DESCRIPTION_LEN,
                ProductDialogueState::with_description,
            )
            .await
        }
        ConversationState::AwaitingPrice => handle_price_input(ctx, msg, current).await,
    }
}

async fn send_context_lost(ctx: &BotContext, chat_id: i64, language_code: Option<&str>) -> Result<()> {
    ctx.transport
        .send_text(chat_id, &t_lang("context-lost", language_code), None)
        .await
}

async fn handle_photo_input(
    ctx: &BotContext,
    msg: &IncomingMessage,
    current: ProductDialogueState,
) -> Result<()> {
    let language_code = msg.language();

    // Variants come smallest first; keep the best quality one
    let Some(largest_photo) = msg.photos.last() else {
        return ctx
            .transport
            .send_text(msg.chat_id, &t_lang("photo-required", language_code), None)
            .await;
    };

    let Some(next) = current.with_image(largest_photo.clone()) else {
        return send_context_lost(ctx, msg.chat_id, language_code).await;
    };
    ctx.conversations
        .advance(msg.chat_id, next)
        .await
        .context("Failed to update dialogue")?;

    ctx.transport
        .send_text(msg.chat_id, &t_lang("enter-name", language_code), None)
        .await
}

/// Name and description steps: validate, store, move on
async fn handle_text_input(
    ctx: &BotContext,
    msg: &IncomingMessage,
    current: ProductDialogueState,
    max_len: usize,
    step: fn(ProductDialogueState, String) -> Option<ProductDialogueState>,
) -> Result<()> {
    let language_code = msg.language();

    match validate_text_field(msg.text.as_deref().unwrap_or(""), max_len) {
        Ok(value) => {
            let Some(next) = step(current, value) else {
                return send_context_lost(ctx, msg.chat_id, language_code).await;
            };
            let prompt = match next.state() {
                ConversationState::AwaitingDescription => "enter-description",
                _ => "enter-price",
            };
            ctx.conversations
                .advance(msg.chat_id, next)
                .await
                .context("Failed to update dialogue")?;

            ctx.transport
                .send_text(msg.chat_id, &t_lang(prompt, language_code), None)
                .await
        }
        Err(InputError::TooLong) => {
            let max = max_len.to_string();
            ctx.transport
                .send_text(
                    msg.chat_id,
                    &t_args_lang("text-too-long", &[("max", max.as_str())], language_code),
                    None,
                )
                .await
        }
        Err(_) => {
            ctx.transport
                .send_text(msg.chat_id, &t_lang("text-required", language_code), None)
                .await
        }
    }
}

/// Final step: parse the price and commit the product.
///
/// The dialogue ends whether or not the product could be saved.
async fn handle_price_input(
    ctx: &BotContext,
    msg: &IncomingMessage,
    current: ProductDialogueState,
) -> Result<()> {
    let language_code = msg.language();

    let price = match parse_price(msg.text.as_deref().unwrap_or("")) {
        Ok(price) => price,
        Err(_) => {
            return ctx
                .transport
                .send_text(msg.chat_id, &t_lang("invalid-price", language_code), None)
                .await;
        }
    };

    ctx.conversations
        .complete(msg.chat_id)
        .await
        .context("Failed to end dialogue")?;

    let Some(product) = current.into_new_product(price) else {
        return send_context_lost(ctx, msg.chat_id, language_code).await;
    };

    let reply = match ctx.products.create_product(&product).await {
        Ok(product_id) => {
            info!(user_id = msg.chat_id, product_id, "Product added to catalog");
            "product-saved"
        }
        Err(e) => {
            error!(user_id = msg.chat_id, error = %e, "Failed to create product");
            "product-save-failed"
        }
    };

    ctx.transport
        .send_text(msg.chat_id, &t_lang(reply, language_code), None)
        .await
}
