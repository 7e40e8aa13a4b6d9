//! Product entry dialogue: the per-chat dialogue state (which carries the
//! fields collected so far), the store that keeps it, and step input
//! validation.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage, InMemStorageError};
use teloxide::types::ChatId;

use crate::catalog_model::{NewProduct, ProductType};

/// Maximum accepted length of a product name, in characters
pub const MAX_NAME_LEN: usize = 255;
/// Maximum accepted length of a product description, in characters.
/// Keeps the rendered catalog caption below Telegram's 1024 character limit.
pub const MAX_DESCRIPTION_LEN: usize = 800;

/// Where a chat currently is in the add-product flow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingType,
    AwaitingPhoto,
    AwaitingName,
    AwaitingDescription,
    AwaitingPrice,
}

impl ConversationState {
    pub fn is_idle(self) -> bool {
        self == ConversationState::Idle
    }
}

/// Stored dialogue state. Each step carries every field collected before it,
/// so a chat has product data exactly while it is not `Idle`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ProductDialogueState {
    #[default]
    Idle,
    AwaitingType,
    AwaitingPhoto {
        product_type: ProductType,
    },
    AwaitingName {
        product_type: ProductType,
        image_id: String,
    },
    AwaitingDescription {
        product_type: ProductType,
        image_id: String,
        name: String,
    },
    AwaitingPrice {
        product_type: ProductType,
        image_id: String,
        name: String,
        description: String,
    },
}

/// Type alias for the add-product dialogue of one chat
pub type ProductDialogue = Dialogue<ProductDialogueState, InMemStorage<ProductDialogueState>>;

impl ProductDialogueState {
    pub fn state(&self) -> ConversationState {
        match self {
            ProductDialogueState::Idle => ConversationState::Idle,
            ProductDialogueState::AwaitingType => ConversationState::AwaitingType,
            ProductDialogueState::AwaitingPhoto { .. } => ConversationState::AwaitingPhoto,
            ProductDialogueState::AwaitingName { .. } => ConversationState::AwaitingName,
            ProductDialogueState::AwaitingDescription { .. } => {
                ConversationState::AwaitingDescription
            }
            ProductDialogueState::AwaitingPrice { .. } => ConversationState::AwaitingPrice,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state().is_idle()
    }

    /// Snapshot of the collected fields; `None` when idle
    pub fn draft(&self) -> Option<Draft> {
        let draft = match self.clone() {
            ProductDialogueState::Idle => return None,
            ProductDialogueState::AwaitingType => Draft::default(),
            ProductDialogueState::AwaitingPhoto { product_type } => Draft {
                product_type: Some(product_type),
                ..Default::default()
            },
            ProductDialogueState::AwaitingName {
                product_type,
                image_id,
            } => Draft {
                product_type: Some(product_type),
                image_id: Some(image_id),
                ..Default::default()
            },
            ProductDialogueState::AwaitingDescription {
                product_type,
                image_id,
                name,
            } => Draft {
                product_type: Some(product_type),
                image_id: Some(image_id),
                name: Some(name),
                description: None,
            },
            ProductDialogueState::AwaitingPrice {
                product_type,
                image_id,
                name,
                description,
            } => Draft {
                product_type: Some(product_type),
                image_id: Some(image_id),
                name: Some(name),
                description: Some(description),
            },
        };
        Some(draft)
    }

    /// `AwaitingType` → `AwaitingPhoto`
    pub fn with_product_type(self, product_type: ProductType) -> Option<Self> {
        match self {
            ProductDialogueState::AwaitingType => {
                Some(ProductDialogueState::AwaitingPhoto { product_type })
            }
            _ => None,
        }
    }

    /// `AwaitingPhoto` → `AwaitingName`
    pub fn with_image(self, image_id: String) -> Option<Self> {
        match self {
            ProductDialogueState::AwaitingPhoto { product_type } => {
                Some(ProductDialogueState::AwaitingName {
                    product_type,
                    image_id,
                })
            }
            _ => None,
        }
    }

    /// `AwaitingName` → `AwaitingDescription`
    pub fn with_name(self, name: String) -> Option<Self> {
        match self {
            ProductDialogueState::AwaitingName {
                product_type,
                image_id,
            } => Some(ProductDialogueState::AwaitingDescription {
                product_type,
                image_id,
                name,
            }),
            _ => None,
        }
    }

    /// `AwaitingDescription` → `AwaitingPrice`
    pub fn with_description(self, description: String) -> Option<Self> {
        match self {
            ProductDialogueState::AwaitingDescription {
                product_type,
                image_id,
                name,
            } => Some(ProductDialogueState::AwaitingPrice {
                product_type,
                image_id,
                name,
                description,
            }),
            _ => None,
        }
    }

    /// Final step: the finished product, only from `AwaitingPrice`
    pub fn into_new_product(self, price: f64) -> Option<NewProduct> {
        match self {
            ProductDialogueState::AwaitingPrice {
                product_type,
                image_id,
                name,
                description,
            } => Some(NewProduct {
                product_type,
                name,
                description,
                price,
                image_id,
            }),
            _ => None,
        }
    }
}

/// Product data collected so far, filled strictly in step order.
/// The price is not part of it: entering a valid price ends the dialogue.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Draft {
    pub product_type: Option<ProductType>,
    pub image_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Conversation state of every chat, kept in teloxide's in-memory dialogue
/// storage. Absent chats are `Idle`; nothing survives a process restart.
#[derive(Clone)]
pub struct ConversationStore {
    storage: Arc<InMemStorage<ProductDialogueState>>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self {
            storage: InMemStorage::new(),
        }
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dialogue handle for one chat
    pub fn dialogue(&self, chat_id: i64) -> ProductDialogue {
        Dialogue::new(Arc::clone(&self.storage), ChatId(chat_id))
    }

    /// Current dialogue state with its collected fields; `Idle` if absent
    pub async fn get(&self, chat_id: i64) -> Result<ProductDialogueState, InMemStorageError> {
        self.dialogue(chat_id).get_or_default().await
    }

    pub async fn state(&self, chat_id: i64) -> Result<ConversationState, InMemStorageError> {
        Ok(self.get(chat_id).await?.state())
    }

    /// Start a new flow, discarding any flow in progress
    pub async fn begin(&self, chat_id: i64) -> Result<(), InMemStorageError> {
        self.dialogue(chat_id)
            .update(ProductDialogueState::AwaitingType)
            .await
    }

    /// Store the next step. Moving to `Idle` ends the flow.
    pub async fn advance(
        &self,
        chat_id: i64,
        next: ProductDialogueState,
    ) -> Result<(), InMemStorageError> {
        if next.is_idle() {
            return self.complete(chat_id).await;
        }
        self.dialogue(chat_id).update(next).await
    }

    /// Leave the flow, dropping everything collected. No-op when idle.
    pub async fn complete(&self, chat_id: i64) -> Result<(), InMemStorageError> {
        let dialogue = self.dialogue(chat_id);
        if dialogue.get().await?.is_some() {
            dialogue.exit().await?;
        }
        Ok(())
    }
}

/// Why a step's input was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    Empty,
    TooLong,
    InvalidNumber,
}

/// Validates a free-text step input (name, description)
pub fn validate_text_field(input: &str, max_len: usize) -> Result<String, InputError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }

    if trimmed.chars().count() > max_len {
        return Err(InputError::TooLong);
    }

    Ok(trimmed.to_string())
}

/// Parses a price. Accepts `,` as decimal separator; rejects negative and non-finite values.
pub fn parse_price(input: &str) -> Result<f64, InputError> {
    let normalized = input.trim().replace(',', ".");

    match normalized.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(InputError::InvalidNumber),
    }
}
