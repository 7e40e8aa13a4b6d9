//! # Localization Tests
//!
//! Message lookup, fallback and argument formatting across the bundled languages.

use perfume_shop::localization::{t_args_lang, t_lang, LocalizationManager, DEFAULT_LANGUAGE};
use std::collections::HashMap;

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_localization() -> LocalizationManager {
        LocalizationManager::new().expect("Failed to create localization manager")
    }

    #[test]
    fn test_get_message_existing_key() {
        let manager = setup_localization();

        let message = manager.get_message_in_language("help-text", "en", None);
        assert!(message.contains("/start"));
        assert!(message.contains("/new"));
    }

    #[test]
    fn test_get_message_nonexistent_key() {
        let manager = setup_localization();

        let message = manager.get_message_in_language("nonexistent-key", "en", None);
        assert_eq!(message, "Missing translation: nonexistent-key");
    }

    #[test]
    fn test_get_message_unsupported_language() {
        let manager = setup_localization();

        let fallback = manager.get_message_in_language("welcome", "unsupported", None);
        let english = manager.get_message_in_language("welcome", "en", None);
        assert_eq!(fallback, english);
    }

    #[test]
    fn test_supported_languages() {
        let manager = setup_localization();

        assert!(manager.is_language_supported("en"));
        assert!(manager.is_language_supported("ru"));
        assert!(!manager.is_language_supported("de"));
    }

    #[test]
    fn test_resolve_language() {
        let manager = setup_localization();

        assert_eq!(manager.resolve_language(Some("ru")), "ru");
        assert_eq!(manager.resolve_language(Some("ru-RU")), "ru");
        assert_eq!(manager.resolve_language(Some("fr")), DEFAULT_LANGUAGE);
        assert_eq!(manager.resolve_language(None), DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_get_message_with_args() {
        let manager = setup_localization();
        let mut args = HashMap::new();
        args.insert("price", "19.99");

        let en = manager.get_message_in_language("catalog-price", "en", Some(&args));
        let ru = manager.get_message_in_language("catalog-price", "ru", Some(&args));

        assert_eq!(en, "Price: 19.99 rub.");
        assert_eq!(ru, "Цена: 19.99 руб.");
    }

    #[test]
    fn test_every_english_key_is_translated() {
        let manager = setup_localization();
        let keys = [
            "command-start",
            "command-new",
            "welcome",
            "about",
            "help-text",
            "unknown-command",
            "permission-denied",
            "button-catalog",
            "button-about",
            "button-help",
            "button-female",
            "button-male",
            "button-unisex",
            "button-buy",
            "choose-product-type",
            "send-photo",
            "photo-required",
            "enter-name",
            "enter-description",
            "enter-price",
            "text-required",
            "invalid-price",
            "product-saved",
            "product-save-failed",
            "context-lost",
            "catalog-empty",
            "catalog-failed",
        ];

        for key in keys {
            for language in ["en", "ru"] {
                let message = manager.get_message_in_language(key, language, None);
                assert!(
                    !message.starts_with("Missing translation"),
                    "{key} missing in {language}"
                );
            }
        }
    }

    #[test]
    fn test_global_helpers() {
        assert_eq!(t_lang("button-female", Some("ru")), "Женские");
        assert_eq!(t_lang("button-female", Some("es")), "Female");

        let stub = t_args_lang("buy-stub", &[("product_id", "42")], None);
        assert!(stub.contains("42"));
    }
}
