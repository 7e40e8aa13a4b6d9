//! UI Builder module for creating keyboards and formatting messages

use teloxide::utils::html;

use super::callback_data::CallbackData;
use crate::catalog_model::{Product, ProductType};
use crate::localization::{t_args_lang, t_lang};

/// A single inline button
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardButton {
    pub label: String,
    pub data: CallbackData,
}

impl KeyboardButton {
    pub fn new(label: impl Into<String>, data: CallbackData) -> Self {
        Self {
            label: label.into(),
            data,
        }
    }
}

/// Inline keyboard layout, row by row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Keyboard {
    pub rows: Vec<Vec<KeyboardButton>>,
}

impl Keyboard {
    pub fn new(rows: Vec<Vec<KeyboardButton>>) -> Self {
        Self { rows }
    }

    /// All buttons in reading order
    pub fn buttons(&self) -> impl Iterator<Item = &KeyboardButton> {
        self.rows.iter().flatten()
    }
}

/// Provides the keyboards shown by the bot
pub trait KeyboardProvider: Send + Sync {
    /// Catalog / About / Help menu shown on `/start`
    fn main_menu(&self, language_code: Option<&str>) -> Keyboard;

    /// Perfume category chooser used when adding a product
    fn product_type_menu(&self, language_code: Option<&str>) -> Keyboard;

    /// Single "Buy" button attached to a catalog entry
    fn buy_button(&self, product_id: i64, language_code: Option<&str>) -> Keyboard;
}

/// Default localized keyboard layouts
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineKeyboards;

fn product_type_label(kind: ProductType, language_code: Option<&str>) -> String {
    let key = match kind {
        ProductType::Female => "button-female",
        ProductType::Male => "button-male",
        ProductType::Unisex => "button-unisex",
    };
    t_lang(key, language_code)
}

impl KeyboardProvider for InlineKeyboards {
    fn main_menu(&self, language_code: Option<&str>) -> Keyboard {
        Keyboard::new(vec![
            vec![
                KeyboardButton::new(t_lang("button-catalog", language_code), CallbackData::Catalog),
                KeyboardButton::new(t_lang("button-about", language_code), CallbackData::About),
            ],
            vec![KeyboardButton::new(t_lang("button-help", language_code), CallbackData::Help)],
        ])
    }

    fn product_type_menu(&self, language_code: Option<&str>) -> Keyboard {
        let button = |kind| {
            KeyboardButton::new(product_type_label(kind, language_code), CallbackData::ProductType(kind))
        };

        Keyboard::new(vec![
            vec![button(ProductType::Female), button(ProductType::Male)],
            vec![button(ProductType::Unisex)],
        ])
    }

    fn buy_button(&self, product_id: i64, language_code: Option<&str>) -> Keyboard {
        Keyboard::new(vec![vec![KeyboardButton::new(
            t_lang("button-buy", language_code),
            CallbackData::Buy { product_id },
        )]])
    }
}

/// Price with two decimals
pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

/// HTML caption for a catalog entry
pub fn format_product_caption(product: &Product, language_code: Option<&str>) -> String {
    let price = format_price(product.price);
    format!(
        "<b>{}</b>\n\n{}\n\n{}",
        html::escape(&product.name),
        html::escape(&product.description),
        t_args_lang("catalog-price", &[("price", price.as_str())], language_code)
    )
}
