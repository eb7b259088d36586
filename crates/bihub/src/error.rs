use bihub_kernel::config::ConfigError;
use bihub_logger::LoggerError;
use bihub_vault::VaultError;
use std::borrow::Cow;

/// Errors raised while assembling the platform.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Configuration error{}: {source}", format_context(.context))]
    Config { source: ConfigError, context: Option<Cow<'static, str>> },

    #[error("Vault error{}: {source}", format_context(.context))]
    Vault { source: VaultError, context: Option<Cow<'static, str>> },

    #[error("Logger error{}: {source}", format_context(.context))]
    Logger { source: LoggerError, context: Option<Cow<'static, str>> },
}

pub trait PlatformErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, PlatformError>;
}

impl<T> PlatformErrorExt<T> for Result<T, ConfigError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, PlatformError> {
        self.map_err(|source| PlatformError::Config { source, context: Some(context.into()) })
    }
}

impl<T> PlatformErrorExt<T> for Result<T, VaultError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, PlatformError> {
        self.map_err(|source| PlatformError::Vault { source, context: Some(context.into()) })
    }
}

impl<T> PlatformErrorExt<T> for Result<T, LoggerError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, PlatformError> {
        self.map_err(|source| PlatformError::Logger { source, context: Some(context.into()) })
    }
}

impl From<ConfigError> for PlatformError {
    fn from(source: ConfigError) -> Self {
        Self::Config { source, context: None }
    }
}

impl From<VaultError> for PlatformError {
    fn from(source: VaultError) -> Self {
        Self::Vault { source, context: None }
    }
}

impl From<LoggerError> for PlatformError {
    fn from(source: LoggerError) -> Self {
        Self::Logger { source, context: None }
    }
}

#[allow(clippy::ref_option)]
fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
