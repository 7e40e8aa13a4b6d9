//! Inline keyboard callback data.
//!
//! Buttons carry a short string; it is decoded into [`CallbackData`] once,
//! at the transport boundary, so the router matches on variants instead of
//! inspecting prefixes.

use std::fmt;
use std::str::FromStr;

use crate::catalog_model::ProductType;
use crate::errors::CallbackDataError;

const CATALOG: &str = "catalog";
const ABOUT: &str = "about";
const HELP: &str = "help";
const BUY_PREFIX: &str = "buy_";
const TYPE_PREFIX: &str = "type_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackData {
    Catalog,
    About,
    Help,
    Buy { product_id: i64 },
    ProductType(ProductType),
}

impl CallbackData {
    /// String sent to Telegram as the button's callback data
    pub fn data(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CallbackData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackData::Catalog => f.write_str(CATALOG),
            CallbackData::About => f.write_str(ABOUT),
            CallbackData::Help => f.write_str(HELP),
            CallbackData::Buy { product_id } => write!(f, "{BUY_PREFIX}{product_id}"),
            CallbackData::ProductType(kind) => write!(f, "{TYPE_PREFIX}{kind}"),
        }
    }
}

impl FromStr for CallbackData {
    type Err = CallbackDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CATALOG => return Ok(CallbackData::Catalog),
            ABOUT => return Ok(CallbackData::About),
            HELP => return Ok(CallbackData::Help),
            _ => {}
        }

        if let Some(id) = s.strip_prefix(BUY_PREFIX) {
            let product_id = id
                .parse()
                .map_err(|_| CallbackDataError::InvalidProductId(id.to_string()))?;
            return Ok(CallbackData::Buy { product_id });
        }

        if let Some(kind) = s.strip_prefix(TYPE_PREFIX) {
            let kind = kind
                .parse()
                .map_err(|_| CallbackDataError::InvalidProductType(s.to_string()))?;
            return Ok(CallbackData::ProductType(kind));
        }

        Err(CallbackDataError::Unknown(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_matches_sent_buttons() {
        assert_eq!(CallbackData::Catalog.data(), "catalog");
        assert_eq!(CallbackData::Buy { product_id: 17 }.data(), "buy_17");
        assert_eq!(CallbackData::ProductType(ProductType::Female).data(), "type_female");
    }

    #[test]
    fn test_decoding() {
        assert_eq!("about".parse(), Ok(CallbackData::About));
        assert_eq!("help".parse(), Ok(CallbackData::Help));
        assert_eq!("buy_123".parse(), Ok(CallbackData::Buy { product_id: 123 }));
        assert_eq!(
            "type_unisex".parse(),
            Ok(CallbackData::ProductType(ProductType::Unisex))
        );
    }

    #[test]
    fn test_decoding_errors() {
        assert_eq!(
            "buy_abc".parse::<CallbackData>(),
            Err(CallbackDataError::InvalidProductId("abc".into()))
        );
        assert_eq!(
            "type_kids".parse::<CallbackData>(),
            Err(CallbackDataError::InvalidProductType("type_kids".into()))
        );
        assert_eq!(
            "catalogue".parse::<CallbackData>(),
            Err(CallbackDataError::Unknown("catalogue".into()))
        );
        // Exact tokens do not match as prefixes
        assert!("catalog_1".parse::<CallbackData>().is_err());
    }
}
