//! Facade crate for `BiHub` features and shared modules.
//! Re-exports domain/kernel primitives and assembles the platform services.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! ```rust,ignore
//! use bihub::Platform;
//! use bihub::metadata::InMemoryDomainRepository;
//! use std::sync::Arc;
//!
//! let platform = Platform::load(Some("bihub.toml"))?;
//! let _log = platform.init_logging()?;
//!
//! let handler = platform.metadata_handler().importer(Arc::new(InMemoryDomainRepository::new())).build()?;
//! ```

mod error;
mod platform;

pub use bihub_domain as domain;
pub use bihub_kernel as kernel;

pub use crate::error::{PlatformError, PlatformErrorExt};
pub use crate::platform::Platform;

/// Feature slices.
pub mod features {
    pub use bihub_connections as connections;
    pub use bihub_metadata as metadata;
}

pub use features::{connections, metadata};
