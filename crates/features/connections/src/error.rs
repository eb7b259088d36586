use bihub_vault::VaultError;
use std::borrow::Cow;
use std::num::ParseIntError;

/// Error types specific to connection mapping.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The connection port is present but not a number.
    #[error("Invalid port{}: {source}", format_context(.context))]
    InvalidPort { source: ParseIntError, context: Option<Cow<'static, str>> },

    /// The password could not be sealed or unsealed.
    #[error("Password codec error{}: {source}", format_context(.context))]
    Password { source: VaultError, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal connection error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

pub trait ConnectionErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ConnectionError>;
}

impl<T> ConnectionErrorExt<T> for Result<T, ConnectionError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                ConnectionError::InvalidPort { context: c, .. }
                | ConnectionError::Password { context: c, .. }
                | ConnectionError::Internal { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> ConnectionErrorExt<T> for Result<T, ParseIntError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ConnectionError> {
        self.map_err(|source| ConnectionError::InvalidPort { source, context: Some(context.into()) })
    }
}

impl<T> ConnectionErrorExt<T> for Result<T, VaultError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ConnectionError> {
        self.map_err(|source| ConnectionError::Password { source, context: Some(context.into()) })
    }
}

impl From<VaultError> for ConnectionError {
    fn from(source: VaultError) -> Self {
        Self::Password { source, context: None }
    }
}

#[allow(clippy::ref_option)]
fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
