//! Storage capabilities a metadata repository can offer to the import handler.
//!
//! Every repository implements [`DomainImporter`]. Repositories that enforce access control
//! also implement [`AclAwareDomainImporter`]; repositories that keep model annotations
//! implement [`AnnotationsAwareDomainImporter`]. The handler is told which capabilities to
//! use when it is built.

use bihub_domain::acl::RepositoryFileAcl;
use std::borrow::Cow;

/// Failures reported by a repository importer.
#[derive(Debug, thiserror::Error)]
pub enum DomainStorageError {
    /// The domain id was blank.
    #[error("Domain id is null{}: {message}", format_context(.context))]
    DomainIdNull { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The underlying store failed.
    #[error("Domain storage error{}: {message}", format_context(.context))]
    Storage { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A domain with this id exists and overwrite was not requested.
    #[error("Domain already exists{}: {message}", format_context(.context))]
    AlreadyExists { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Anything else.
    #[error("Internal repository error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

pub trait DomainStorageErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, DomainStorageError>;
}

impl<T> DomainStorageErrorExt<T> for Result<T, DomainStorageError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                DomainStorageError::DomainIdNull { context: c, .. }
                | DomainStorageError::Storage { context: c, .. }
                | DomainStorageError::AlreadyExists { context: c, .. }
                | DomainStorageError::Internal { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

#[allow(clippy::ref_option)]
fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}

/// Baseline repository capability.
pub trait DomainImporter: Send + Sync {
    /// Stores (or replaces, when `overwrite` is set) the XMI of a domain.
    ///
    /// # Errors
    /// See [`DomainStorageError`].
    fn store_domain(
        &self,
        xmi: &[u8],
        domain_id: &str,
        overwrite: bool,
    ) -> Result<(), DomainStorageError>;

    /// Adds a `.properties` locale bundle to a domain, merging with an existing bundle for
    /// the same locale when `merge` is set.
    ///
    /// # Errors
    /// See [`DomainStorageError`].
    fn add_localization_file(
        &self,
        domain_id: &str,
        locale: &str,
        properties: &[u8],
        merge: bool,
    ) -> Result<(), DomainStorageError>;
}

/// Repositories that store an access-control list with the domain.
pub trait AclAwareDomainImporter: DomainImporter {
    /// Like [`DomainImporter::store_domain`], applying `acl` when given.
    ///
    /// # Errors
    /// See [`DomainStorageError`].
    fn store_domain_with_acl(
        &self,
        xmi: &[u8],
        domain_id: &str,
        overwrite: bool,
        acl: Option<&RepositoryFileAcl>,
    ) -> Result<(), DomainStorageError>;
}

/// Repositories that keep model annotations next to the domain.
pub trait AnnotationsAwareDomainImporter: Send + Sync {
    /// # Errors
    /// See [`DomainStorageError`].
    fn store_annotations_xml(&self, domain_id: &str, xml: &str) -> Result<(), DomainStorageError>;
}
