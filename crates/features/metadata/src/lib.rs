//! # Metadata Import
//!
//! Publishes uploaded metadata domains (CWM XMI) and their locale bundles into a domain
//! repository.
//!
//! * [`handler::MetadataImportHandler`] drives a single upload.
//! * [`xmi::XmiDocument`] indexes logical models and strips wizard-generated schema content.
//! * [`importer`] declares the storage capabilities a repository can offer.
//! * [`repository::InMemoryDomainRepository`] implements all of them in memory.

mod error;
pub mod file_info;
pub mod handler;
pub mod importer;
pub mod repository;
pub mod xmi;

pub use crate::error::{ImportError, ImportErrorCode, ImportErrorExt, XmiError};
pub use crate::file_info::{MetadataFileInfo, MetadataFileType};
pub use crate::handler::{MetadataImportHandler, MetadataImportHandlerBuilder};
pub use crate::importer::{
    AclAwareDomainImporter, AnnotationsAwareDomainImporter, DomainImporter, DomainStorageError,
    DomainStorageErrorExt,
};
pub use crate::repository::InMemoryDomainRepository;
pub use crate::xmi::{LogicalModel, ModelProperty, XmiDocument};
