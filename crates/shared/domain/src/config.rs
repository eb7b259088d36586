use crate::connection::DatabaseType;
use crate::constants::MIME_XMI;
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level platform configuration shared across slices.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlatformConfigInner {
    pub logging: LoggingConfig,
    pub encryption: EncryptionConfig,
    pub import: ImportConfig,
    pub connections: ConnectionsConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    #[serde(flatten, default)]
    inner: Arc<PlatformConfigInner>,
}

impl Deref for PlatformConfig {
    type Target = PlatformConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for PlatformConfig {
    fn deref_mut(&mut self) -> &mut PlatformConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Log file rotation period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

/// Tracing subscriber settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Identifier used as the log file prefix.
    pub name: String,
    pub console: bool,
    /// Default level directive (`trace`, `debug`, `info`, `warn`, `error`, `off`).
    pub level: String,
    /// Directory for rolling log files; no file output when absent.
    pub directory: Option<PathBuf>,
    pub rotation: LogRotation,
    pub max_files: usize,
    pub json: bool,
    /// Extra filter directives, e.g. `bihub_metadata=debug`.
    pub filter: Option<String>,
}

/// Cipher used by the credentials vault.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherKind {
    #[default]
    Aes,
    ChaCha,
}

/// Secret used when no `encryption.secret` is configured. Only fit for development.
pub const DEFAULT_SECRET: &str = "dev-only-change-me";

/// Key material for password encryption.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncryptionConfig {
    pub secret: String,
    pub salt: String,
    /// Label bound into key derivation; vaults with different scopes cannot read each other.
    pub scope: String,
    pub cipher: CipherKind,
}

impl EncryptionConfig {
    /// Whether the built-in development secret is in effect.
    #[must_use]
    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

/// Metadata import handler settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// MIME types served by the metadata import handler.
    pub mime_types: Vec<String>,
    /// Merge locale bundles into existing ones instead of replacing them.
    pub merge_locales: bool,
}

/// Connection mapping settings.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectionsConfig {
    /// Dialects registered in addition to the built-in set.
    pub dialects: Vec<DatabaseType>,
}

// --- Default ---

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            name: "bihub".to_owned(),
            console: true,
            level: "info".to_owned(),
            directory: None,
            rotation: LogRotation::Daily,
            max_files: 10,
            json: false,
            filter: None,
        }
    }
}

impl Default for EncryptionConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_owned(),
            salt: "bihub".to_owned(),
            scope: "credentials".to_owned(),
            cipher: CipherKind::Aes,
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { mime_types: vec![MIME_XMI.to_owned()], merge_locales: true }
    }
}
