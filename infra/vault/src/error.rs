//! # Vault Errors
//!
//! This module defines the [`VaultError`] enum used throughout the vault crate for
//! reporting cryptographic, encoding, and configuration failures.

use std::borrow::Cow;

/// A specialized [`VaultError`] enum for vault-related failures.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Failure during the encryption process.
    #[error("Encryption error{}: {message}", format_context(.context))]
    Encryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure during the decryption process.
    ///
    /// This usually indicates an incorrect key, a mismatched cryptographic
    /// context (AAD), or tampered data.
    #[error("Decryption error{}: {message}", format_context(.context))]
    Decryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure when the sealed text is not valid Base64.
    #[error("Encoding error{}: {source}", format_context(.context))]
    Encoding { source: base64::DecodeError, context: Option<Cow<'static, str>> },

    /// Failure when the decrypted bytes are not UTF-8 text.
    #[error("Text decoding error{}: {source}", format_context(.context))]
    Utf8 { source: std::string::FromUtf8Error, context: Option<Cow<'static, str>> },

    /// Failure when the vault or builder is incorrectly configured.
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure when the provided payload is malformed or too short.
    #[error("Invalid payload{}: {message}", format_context(.context))]
    InvalidPayload { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Adds `.context(...)` to vault results and to results of the wrapped upstream errors.
pub trait VaultErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, VaultError>;
}

impl<T> VaultErrorExt<T> for Result<T, VaultError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                VaultError::Encryption { context: c, .. }
                | VaultError::Decryption { context: c, .. }
                | VaultError::Encoding { context: c, .. }
                | VaultError::Utf8 { context: c, .. }
                | VaultError::InvalidConfiguration { context: c, .. }
                | VaultError::InvalidPayload { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> VaultErrorExt<T> for Result<T, base64::DecodeError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, VaultError> {
        self.map_err(|source| VaultError::Encoding { source, context: Some(context.into()) })
    }
}

impl<T> VaultErrorExt<T> for Result<T, std::string::FromUtf8Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, VaultError> {
        self.map_err(|source| VaultError::Utf8 { source, context: Some(context.into()) })
    }
}

#[allow(clippy::ref_option)]
fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
