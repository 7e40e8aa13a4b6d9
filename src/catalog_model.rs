//! # Catalog Data Model
//!
//! Domain types for the perfume catalog. These know nothing about Telegram
//! or SQL; the database layer maps them to rows and the bot layer renders them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::StoreError;

/// Perfume category chosen by the administrator when adding a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Female,
    Male,
    Unisex,
}

impl ProductType {
    /// All categories, in keyboard order
    pub const ALL: [ProductType; 3] = [ProductType::Female, ProductType::Male, ProductType::Unisex];

    /// Stable lowercase name used in the database and in callback data
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Female => "female",
            ProductType::Male => "male",
            ProductType::Unisex => "unisex",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "female" => Ok(ProductType::Female),
            "male" => Ok(ProductType::Male),
            "unisex" => Ok(ProductType::Unisex),
            other => Err(StoreError::InvalidProductType(other.to_string())),
        }
    }
}

/// A persisted catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Identifier assigned by the store
    pub id: i64,
    pub product_type: ProductType,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Telegram file id of the product photo (the image itself is not stored)
    pub image_id: String,
}

/// A product that has not been stored yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub product_type: ProductType,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_id: String,
}

/// Telegram profile data used to register a customer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewShopUser {
    pub chat_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub language_code: Option<String>,
}

/// A customer known to the shop, registered on their first `/start`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopUser {
    pub id: i64,
    pub chat_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub language_code: Option<String>,
    pub created_at: NaiveDateTime,
}
