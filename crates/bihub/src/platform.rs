use crate::error::{PlatformError, PlatformErrorExt};
use bihub_connections::{ConnectionMapper, DialectRegistry, PasswordCodec, VaultPasswordCodec};
use bihub_domain::config::{CipherKind, EncryptionConfig, PlatformConfig};
use bihub_kernel::config::load_config;
use bihub_kernel::messages::{DefaultMessages, Messages};
use bihub_logger::Logger;
use bihub_metadata::MetadataImportHandlerBuilder;
use bihub_vault::{Aes, ChaCha, Vault, VaultCipher};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Assembled platform services.
///
/// Built once at startup from a [`PlatformConfig`]; cloning is cheap.
#[derive(Clone)]
pub struct Platform {
    config: PlatformConfig,
    connections: ConnectionMapper,
    messages: Arc<dyn Messages>,
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("cipher", &self.config.encryption.cipher)
            .field("dialects", &self.connections.registry().len())
            .finish_non_exhaustive()
    }
}

impl Platform {
    /// Loads configuration from `path` (plus `BIHUB__*` overrides) and bootstraps.
    ///
    /// # Errors
    /// See [`load_config`] and [`Platform::bootstrap`].
    pub fn load(path: Option<impl AsRef<Path>>) -> Result<Self, PlatformError> {
        let config: PlatformConfig = load_config(path).context("Platform configuration")?;
        Self::bootstrap(config)
    }

    /// Builds the credentials vault, the dialect registry and the connection mapper.
    /// Warns when the built-in development secret is in effect.
    ///
    /// # Errors
    /// Returns [`PlatformError::Vault`] if the encryption settings cannot produce a key.
    pub fn bootstrap(config: PlatformConfig) -> Result<Self, PlatformError> {
        if config.encryption.uses_default_secret() {
            warn!("encryption.secret is not configured; stored passwords use the built-in development secret");
        }

        let codec = password_codec(&config.encryption)?;
        let registry = Arc::new(DialectRegistry::from_config(&config.connections));

        info!(
            cipher = ?config.encryption.cipher,
            dialects = registry.len(),
            "Platform services assembled"
        );

        Ok(Self {
            connections: ConnectionMapper::new(registry, codec),
            messages: Arc::new(DefaultMessages),
            config,
        })
    }

    /// Replaces the message catalog used by handlers created afterwards.
    #[must_use]
    pub fn with_messages(mut self, messages: Arc<dyn Messages>) -> Self {
        self.messages = messages;
        self
    }

    /// Installs the global tracing subscriber described by the `logging` section.
    ///
    /// Keep the returned [`Logger`] alive for as long as file output is needed.
    ///
    /// # Errors
    /// Returns [`PlatformError::Logger`] if the subscriber cannot be installed.
    pub fn init_logging(&self) -> Result<Logger, PlatformError> {
        Logger::from_config(&self.config.logging).context("Logging")
    }

    #[must_use]
    pub const fn config(&self) -> &PlatformConfig {
        &self.config
    }

    #[must_use]
    pub const fn connections(&self) -> &ConnectionMapper {
        &self.connections
    }

    /// A metadata import handler builder seeded with the `import` section and the platform
    /// message catalog. Callers still choose the repository importer.
    #[must_use]
    pub fn metadata_handler(&self) -> MetadataImportHandlerBuilder {
        bihub_metadata::MetadataImportHandler::builder()
            .config(&self.config.import)
            .messages(self.messages.clone())
    }
}

fn password_codec(config: &EncryptionConfig) -> Result<Arc<dyn PasswordCodec>, PlatformError> {
    let codec: Arc<dyn PasswordCodec> = match config.cipher {
        CipherKind::Aes => Arc::new(VaultPasswordCodec::new(vault::<Aes>(config)?)),
        CipherKind::ChaCha => Arc::new(VaultPasswordCodec::new(vault::<ChaCha>(config)?)),
    };
    Ok(codec)
}

fn vault<C: VaultCipher>(config: &EncryptionConfig) -> Result<Vault<C>, PlatformError> {
    let vault = Vault::<C>::builder()
        .derived_key(&config.secret, &config.salt, &config.scope)
        .context("encryption.secret")?
        .build()?;
    Ok(vault)
}
