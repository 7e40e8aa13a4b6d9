use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{error, warn};
use unic_langid::LanguageIdentifier;

/// Language used when the user's language is unknown or unsupported
pub const DEFAULT_LANGUAGE: &str = "en";

/// Fluent resources compiled into the binary
const RESOURCES: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en/main.ftl")),
    ("ru", include_str!("../locales/ru/main.ftl")),
];

/// Localization manager for the shop bot
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a new localization manager with every bundled language
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for (code, source) in RESOURCES {
            let locale: LanguageIdentifier = code.parse()?;
            let mut bundle = FluentBundle::new_concurrent(vec![locale]);
            // Plain text output, no Unicode isolation marks around arguments
            bundle.set_use_isolating(false);

            let resource = FluentResource::try_new(source.to_string())
                .map_err(|(_, errors)| anyhow!("Failed to parse '{code}' messages: {errors:?}"))?;
            bundle
                .add_resource(resource)
                .map_err(|errors| anyhow!("Failed to load '{code}' messages: {errors:?}"))?;

            bundles.insert(code.to_string(), bundle);
        }

        Ok(Self { bundles })
    }

    fn empty() -> Self {
        Self {
            bundles: HashMap::new(),
        }
    }

    /// Check whether a language has its own bundle
    pub fn is_language_supported(&self, language_code: &str) -> bool {
        self.bundles.contains_key(language_code)
    }

    /// Map a Telegram language code (`ru`, `ru-RU`, `pt-br`) to a bundled language
    pub fn resolve_language<'a>(&self, language_code: Option<&'a str>) -> &'a str {
        let primary = language_code
            .and_then(|code| code.split(['-', '_']).next())
            .filter(|primary| self.bundles.contains_key(*primary));

        primary.unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Get a localized message in a specific language
    pub fn get_message_in_language(
        &self,
        key: &str,
        language_code: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self
            .bundles
            .get(language_code)
            .or_else(|| self.bundles.get(DEFAULT_LANGUAGE))
        {
            Some(bundle) => bundle,
            None => return format!("Missing translation: {key}"),
        };

        let pattern = match bundle.get_message(key).and_then(|msg| msg.value()) {
            Some(pattern) => pattern,
            None => return format!("Missing translation: {key}"),
        };

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                fluent_args.set(*name, FluentValue::from(*value));
            }
            fluent_args
        });

        let mut errors = Vec::new();
        let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            warn!(key, language = language_code, errors = ?errors, "Errors while formatting message");
        }

        value.into_owned()
    }
}

static LOCALIZATION_MANAGER: LazyLock<LocalizationManager> =
    LazyLock::new(|| match LocalizationManager::new() {
        Ok(manager) => manager,
        Err(e) => {
            error!(error = %e, "Failed to initialize localization, messages will be unavailable");
            LocalizationManager::empty()
        }
    });

/// Get the global localization manager
pub fn get_localization_manager() -> &'static LocalizationManager {
    &LOCALIZATION_MANAGER
}

/// Get a localized message in the user's language
pub fn t_lang(key: &str, language_code: Option<&str>) -> String {
    let manager = get_localization_manager();
    let language = manager.resolve_language(language_code);
    manager.get_message_in_language(key, language, None)
}

/// Get a localized message with arguments in the user's language
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language_code: Option<&str>) -> String {
    let manager = get_localization_manager();
    let language = manager.resolve_language(language_code);
    let args: HashMap<&str, &str> = args.iter().copied().collect();
    manager.get_message_in_language(key, language, Some(&args))
}
