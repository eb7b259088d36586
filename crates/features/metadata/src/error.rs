//! # Import Errors
//!
//! [`ImportError`] is what callers of the handler see. Each variant maps to an
//! [`ImportErrorCode`] the upload surface reports back to the client.

use std::borrow::Cow;

/// Coarse outcome codes reported to uploaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportErrorCode {
    Unspecified,
    PublishToServerFailed,
    PublishSchemaExists,
}

impl ImportErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "UNSPECIFIED",
            Self::PublishToServerFailed => "PUBLISH_TO_SERVER_FAILED",
            Self::PublishSchemaExists => "PUBLISH_SCHEMA_EXISTS_ERROR",
        }
    }
}

/// The payload could not be read as XMI.
#[derive(Debug, thiserror::Error)]
pub enum XmiError {
    #[error("Malformed XML{}: {source}", format_context(.context))]
    Parse { source: roxmltree::Error, context: Option<Cow<'static, str>> },

    #[error("Payload is not UTF-8{}: {source}", format_context(.context))]
    Encoding { source: std::str::Utf8Error, context: Option<Cow<'static, str>> },
}

/// Errors surfaced by the metadata import handler.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// A required bundle property is absent.
    #[error("{message}{}", format_context(.context))]
    MissingProperty { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The payload is not valid XMI.
    #[error("Publish failed{}: {source}", format_context(.context))]
    InvalidXmi { source: XmiError, context: Option<Cow<'static, str>> },

    /// The repository rejected the domain.
    #[error("Publish failed{}: {message}", format_context(.context))]
    PublishFailed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A domain with the same id exists and overwrite was not requested.
    #[error("{message}{}", format_context(.context))]
    SchemaExists { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Any other failure, already logged with its cause.
    #[error("{message}{}", format_context(.context))]
    Failed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The handler was assembled incorrectly.
    #[error("Invalid handler configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ImportError {
    #[must_use]
    pub const fn code(&self) -> ImportErrorCode {
        match self {
            Self::InvalidXmi { .. } | Self::PublishFailed { .. } => {
                ImportErrorCode::PublishToServerFailed
            },
            Self::SchemaExists { .. } => ImportErrorCode::PublishSchemaExists,
            Self::MissingProperty { .. } | Self::Failed { .. } | Self::InvalidConfiguration { .. } => {
                ImportErrorCode::Unspecified
            },
        }
    }
}

pub trait ImportErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ImportError>;
}

impl<T> ImportErrorExt<T> for Result<T, ImportError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                ImportError::MissingProperty { context: c, .. }
                | ImportError::InvalidXmi { context: c, .. }
                | ImportError::PublishFailed { context: c, .. }
                | ImportError::SchemaExists { context: c, .. }
                | ImportError::Failed { context: c, .. }
                | ImportError::InvalidConfiguration { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> ImportErrorExt<T> for Result<T, XmiError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ImportError> {
        self.map_err(|source| ImportError::InvalidXmi { source, context: Some(context.into()) })
    }
}

impl From<XmiError> for ImportError {
    fn from(source: XmiError) -> Self {
        Self::InvalidXmi { source, context: None }
    }
}

impl From<roxmltree::Error> for XmiError {
    fn from(source: roxmltree::Error) -> Self {
        Self::Parse { source, context: None }
    }
}

impl From<std::str::Utf8Error> for XmiError {
    fn from(source: std::str::Utf8Error) -> Self {
        Self::Encoding { source, context: None }
    }
}

#[allow(clippy::ref_option)]
fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
