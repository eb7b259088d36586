//! # Metadata Import Handler
//!
//! Accepts an uploaded metadata bundle, removes wizard-generated schema artifacts unless
//! asked to keep them, stores the domain through the configured importer and then imports
//! any attached locale bundles.

use crate::error::{ImportError, ImportErrorExt};
use crate::file_info::MetadataFileInfo;
use crate::importer::{
    AclAwareDomainImporter, AnnotationsAwareDomainImporter, DomainImporter, DomainStorageError,
};
use crate::xmi::XmiDocument;
use bihub_domain::acl::RepositoryFileAcl;
use bihub_domain::bundle::ImportBundle;
use bihub_domain::config::ImportConfig;
use bihub_domain::constants::{DOMAIN_ID, MIME_PROPERTIES, MIME_XMI};
use bihub_kernel::messages::{DefaultMessages, MessageKey, Messages};
use std::fmt;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Clone)]
enum Storage {
    Plain(Arc<dyn DomainImporter>),
    AclAware(Arc<dyn AclAwareDomainImporter>),
}

impl Storage {
    fn store_domain(
        &self,
        xmi: &[u8],
        domain_id: &str,
        overwrite: bool,
        acl: Option<&RepositoryFileAcl>,
    ) -> Result<(), DomainStorageError> {
        match self {
            Self::Plain(importer) => importer.store_domain(xmi, domain_id, overwrite),
            Self::AclAware(importer) => {
                importer.store_domain_with_acl(xmi, domain_id, overwrite, acl)
            },
        }
    }

    fn add_localization_file(
        &self,
        domain_id: &str,
        locale: &str,
        properties: &[u8],
        merge: bool,
    ) -> Result<(), DomainStorageError> {
        match self {
            Self::Plain(importer) => {
                importer.add_localization_file(domain_id, locale, properties, merge)
            },
            Self::AclAware(importer) => {
                importer.add_localization_file(domain_id, locale, properties, merge)
            },
        }
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::Plain(_) => "plain",
            Self::AclAware(_) => "acl-aware",
        }
    }
}

/// Builder for [`MetadataImportHandler`].
///
/// Exactly one storage importer must be set, either [`importer`](Self::importer) or
/// [`acl_aware_importer`](Self::acl_aware_importer). Annotation storage is optional.
pub struct MetadataImportHandlerBuilder {
    storage: Option<Storage>,
    annotations: Option<Arc<dyn AnnotationsAwareDomainImporter>>,
    mime_types: Vec<String>,
    merge_locales: bool,
    messages: Arc<dyn Messages>,
}

impl Default for MetadataImportHandlerBuilder {
    fn default() -> Self {
        Self {
            storage: None,
            annotations: None,
            mime_types: vec![MIME_XMI.to_owned()],
            merge_locales: true,
            messages: Arc::new(DefaultMessages),
        }
    }
}

impl MetadataImportHandlerBuilder {
    /// Uses an importer without access-control support.
    #[must_use]
    pub fn importer(mut self, importer: Arc<dyn DomainImporter>) -> Self {
        self.storage = Some(Storage::Plain(importer));
        self
    }

    /// Uses an importer that stores the bundle ACL with the domain.
    #[must_use]
    pub fn acl_aware_importer(mut self, importer: Arc<dyn AclAwareDomainImporter>) -> Self {
        self.storage = Some(Storage::AclAware(importer));
        self
    }

    /// Stores the bundle's `annotations` property next to the domain.
    #[must_use]
    pub fn annotations_importer(mut self, importer: Arc<dyn AnnotationsAwareDomainImporter>) -> Self {
        self.annotations = Some(importer);
        self
    }

    /// Replaces the served MIME types.
    #[must_use]
    pub fn mime_types<I, S>(mut self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mime_types = mime_types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn merge_locales(mut self, merge: bool) -> Self {
        self.merge_locales = merge;
        self
    }

    #[must_use]
    pub fn messages(mut self, messages: Arc<dyn Messages>) -> Self {
        self.messages = messages;
        self
    }

    /// Applies the `import` configuration section.
    #[must_use]
    pub fn config(self, config: &ImportConfig) -> Self {
        self.mime_types(config.mime_types.iter().cloned()).merge_locales(config.merge_locales)
    }

    /// # Errors
    /// Returns [`ImportError::InvalidConfiguration`] if no importer was set or no MIME type
    /// is served.
    pub fn build(self) -> Result<MetadataImportHandler, ImportError> {
        let Some(storage) = self.storage else {
            return Err(ImportError::InvalidConfiguration {
                message: "A metadata importer is required".into(),
                context: None,
            });
        };
        if self.mime_types.is_empty() {
            return Err(ImportError::InvalidConfiguration {
                message: "At least one MIME type must be served".into(),
                context: None,
            });
        }

        Ok(MetadataImportHandler {
            storage,
            annotations: self.annotations,
            mime_types: self.mime_types,
            merge_locales: self.merge_locales,
            messages: self.messages,
        })
    }
}

impl fmt::Debug for MetadataImportHandlerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataImportHandlerBuilder")
            .field("storage", &self.storage.as_ref().map(Storage::kind))
            .field("annotations", &self.annotations.is_some())
            .field("mime_types", &self.mime_types)
            .field("merge_locales", &self.merge_locales)
            .finish_non_exhaustive()
    }
}

/// Imports metadata bundles into a domain repository.
///
/// The handler keeps no per-import state and can be shared between threads.
#[derive(Clone)]
pub struct MetadataImportHandler {
    storage: Storage,
    annotations: Option<Arc<dyn AnnotationsAwareDomainImporter>>,
    mime_types: Vec<String>,
    merge_locales: bool,
    messages: Arc<dyn Messages>,
}

impl fmt::Debug for MetadataImportHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataImportHandler")
            .field("storage", &self.storage.kind())
            .field("annotations", &self.annotations.is_some())
            .field("mime_types", &self.mime_types)
            .field("merge_locales", &self.merge_locales)
            .finish_non_exhaustive()
    }
}

impl MetadataImportHandler {
    #[must_use]
    pub fn builder() -> MetadataImportHandlerBuilder {
        MetadataImportHandlerBuilder::default()
    }

    /// MIME types this handler is registered for.
    #[must_use]
    pub fn mime_types(&self) -> &[String] {
        &self.mime_types
    }

    /// Imports a metadata bundle and its locale children.
    ///
    /// # Errors
    /// * [`ImportError::MissingProperty`] if no domain id resolves, before anything is stored.
    /// * [`ImportError::InvalidXmi`] / [`ImportError::PublishFailed`] if the payload or the
    ///   repository rejects the domain.
    /// * [`ImportError::SchemaExists`] if the domain exists and overwrite is off.
    /// * [`ImportError::Failed`] for anything else, including locale bundle failures.
    pub fn import_file(&self, mut bundle: ImportBundle) -> Result<(), ImportError> {
        let domain_id = self.process_metadata_file(&mut bundle)?;

        for child in std::mem::take(&mut bundle.children) {
            self.process_locale_file(child, Some(&domain_id))?;
        }
        Ok(())
    }

    /// Imports a single locale bundle for the domain named by its own `domain-id`.
    ///
    /// # Errors
    /// * [`ImportError::MissingProperty`] if the bundle names no domain.
    /// * [`ImportError::Failed`] if the bundle is typed as anything but Java properties, or
    ///   the locale cannot be resolved or stored.
    pub fn import_locale_file(&self, bundle: ImportBundle) -> Result<(), ImportError> {
        self.process_locale_file(bundle, None)
    }

    fn process_metadata_file(&self, bundle: &mut ImportBundle) -> Result<String, ImportError> {
        let domain_id = bundle.domain_id().map(str::to_owned).ok_or_else(|| self.missing_domain_id())?;
        debug!(domain_id, preserve_dsw = bundle.preserve_dsw, "Importing as metadata");

        let xmi = if bundle.preserve_dsw {
            read_payload(bundle).map_err(|e| self.failed(&domain_id, &e))?
        } else {
            self.strip_dsw(bundle, &domain_id)?
        };

        self.storage
            .store_domain(&xmi, &domain_id, bundle.overwrite, bundle.effective_acl())
            .map_err(|e| self.translate(&domain_id, e))?;

        if let Some(annotations) = &self.annotations
            && let Some(xml) = bundle.annotations().filter(|xml| !xml.trim().is_empty())
        {
            annotations
                .store_annotations_xml(&domain_id, xml)
                .map_err(|e| self.translate(&domain_id, e))?;
            debug!(domain_id, "Annotations stored");
        }

        Ok(domain_id)
    }

    fn strip_dsw(&self, bundle: &mut ImportBundle, domain_id: &str) -> Result<Vec<u8>, ImportError> {
        let bytes = read_payload(bundle).map_err(|e| self.failed(domain_id, &e))?;
        let mut doc = XmiDocument::parse(bytes).context(domain_id.to_owned())?;

        if doc.strip_generated_schema().context(domain_id.to_owned())? {
            debug!(domain_id, models = doc.logical_models().len(), "Generated schema removed");
        }
        Ok(doc.to_bytes())
    }

    fn process_locale_file(&self, mut bundle: ImportBundle, parent: Option<&str>) -> Result<(), ImportError> {
        let info = MetadataFileInfo::new(&bundle.name);
        let domain_id = parent
            .map(str::to_owned)
            .or_else(|| bundle.domain_id().map(str::to_owned))
            .ok_or_else(|| self.missing_domain_id())?;
        let locale = info.locale().unwrap_or_default();

        debug!(path = info.path(), domain_id, locale, "Importing as properties");

        let outcome = if let Some(mime) = bundle.mime_type.as_deref().filter(|m| *m != MIME_PROPERTIES) {
            Err(format!("Unsupported MIME type {mime}"))
        } else if locale.is_empty() {
            Err("Locale cannot be resolved from the file name".to_owned())
        } else {
            read_payload(&mut bundle).map_err(|e| e.to_string()).and_then(|bytes| {
                self.storage
                    .add_localization_file(&domain_id, locale, &bytes, self.merge_locales)
                    .map_err(|e| e.to_string())
            })
        };

        outcome.map_err(|cause| {
            let message = self
                .messages
                .error(MessageKey::ImportingLocaleFile, &[info.path(), &domain_id, locale, &cause]);
            error!(%message, "Locale import failed");
            ImportError::Failed { message: message.into(), context: None }
        })
    }

    fn translate(&self, domain_id: &str, err: DomainStorageError) -> ImportError {
        match err {
            DomainStorageError::DomainIdNull { .. } | DomainStorageError::Storage { .. } => {
                ImportError::PublishFailed { message: err.to_string().into(), context: None }
            },
            DomainStorageError::AlreadyExists { .. } => ImportError::SchemaExists {
                message: self.messages.message(MessageKey::PublishSchemaExists, &[]).into(),
                context: Some(domain_id.to_owned().into()),
            },
            DomainStorageError::Internal { .. } => self.failed(domain_id, &err),
        }
    }

    fn failed(&self, domain_id: &str, cause: &dyn std::error::Error) -> ImportError {
        let message =
            self.messages.error(MessageKey::ImportingMetadata, &[domain_id, &cause.to_string()]);
        error!(%message, "Metadata import failed");
        ImportError::Failed { message: message.into(), context: None }
    }

    fn missing_domain_id(&self) -> ImportError {
        ImportError::MissingProperty {
            message: self.messages.message(MessageKey::MissingBundleProperty, &[DOMAIN_ID]).into(),
            context: None,
        }
    }
}

fn read_payload(bundle: &mut ImportBundle) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    bundle.take_input().read_to_end(&mut buf)?;
    Ok(buf)
}
