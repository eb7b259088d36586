//! Localizable user-facing messages.
//!
//! Slices never format user-facing error text inline; they ask an injected [`Messages`]
//! implementation for a keyed template and its positional arguments (`{0}`, `{1}`, ...).

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static TEMPLATE_ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\d+)\}").expect("template argument pattern is valid"));

/// Message identifiers known to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MessageKey {
    /// A domain with the same identifier already exists.
    PublishSchemaExists,
    /// Importing a metadata domain failed. Args: domain id, cause.
    ImportingMetadata,
    /// Importing a locale bundle failed. Args: path, domain id, locale, cause.
    ImportingLocaleFile,
    /// A required bundle property is missing. Args: property name.
    MissingBundleProperty,
}

impl MessageKey {
    /// Stable catalog key.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::PublishSchemaExists => "PlatformImporter.ERROR_0007_PUBLISH_SCHEMA_EXISTS_ERROR",
            Self::ImportingMetadata => "MetadataImportHandler.ERROR_0001_IMPORTING_METADATA",
            Self::ImportingLocaleFile => "MetadataImportHandler.ERROR_0002_IMPORTING_LOCALE_FILE",
            Self::MissingBundleProperty => "MetadataImportHandler.ERROR_0003_MISSING_PROPERTY",
        }
    }

    const fn default_template(self) -> &'static str {
        match self {
            Self::PublishSchemaExists => {
                "A metadata domain with this name already exists. Enable overwrite to replace it."
            },
            Self::ImportingMetadata => "Error importing metadata for domain [{0}]: {1}",
            Self::ImportingLocaleFile => {
                "Error importing locale file [{0}] for domain [{1}] and locale [{2}]: {3}"
            },
            Self::MissingBundleProperty => "Bundle missing required {0} property",
        }
    }
}

/// Formats keyed messages.
pub trait Messages: Send + Sync {
    /// Returns the raw template for `key`.
    fn template(&self, key: MessageKey) -> &str;

    /// Returns the formatted message.
    fn message(&self, key: MessageKey, args: &[&str]) -> String {
        format_template(self.template(key), args)
    }

    /// Error flavour of [`Messages::message`]: prefixes the short error code.
    fn error(&self, key: MessageKey, args: &[&str]) -> String {
        let code = key.code().rsplit_once('.').map_or(key.code(), |(_, code)| code);
        let code = code.splitn(3, '_').take(2).collect::<Vec<_>>().join("_");
        format!("{code} - {}", self.message(key, args))
    }
}

/// Built-in English catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

impl Messages for DefaultMessages {
    fn template(&self, key: MessageKey) -> &str {
        key.default_template()
    }
}

/// A catalog backed by `code -> template` entries, falling back to English.
#[derive(Debug, Clone, Default)]
pub struct CatalogMessages {
    entries: BTreeMap<String, String>,
}

impl CatalogMessages {
    /// Parses `key=value` lines; blank lines and `#` comments are skipped.
    #[must_use]
    pub fn from_properties(text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(k, v)| (k.trim().to_owned(), v.trim().to_owned()))
            .collect();
        Self { entries }
    }
}

impl Messages for CatalogMessages {
    fn template(&self, key: MessageKey) -> &str {
        self.entries.get(key.code()).map_or_else(|| key.default_template(), String::as_str)
    }
}

/// Replaces `{n}` with the n-th argument in a single pass, so argument text is never
/// expanded again. Missing arguments leave the marker in place.
#[must_use]
pub fn format_template(template: &str, args: &[&str]) -> String {
    TEMPLATE_ARG
        .replace_all(template, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| args.get(i))
                .map_or_else(|| caps[0].to_owned(), |arg| (*arg).to_owned())
        })
        .into_owned()
}
