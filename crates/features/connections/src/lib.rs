//! # Connection Mapping
//!
//! Converts database connection descriptors to and from the generic node tree the
//! repository persists, and imports connections described by older data-integration
//! tooling.
//!
//! * [`helper::ConnectionMapper`] performs the conversions.
//! * [`dialect::DialectRegistry`] resolves dialect short names.
//! * [`password::PasswordCodec`] seals passwords before they reach storage.

pub mod dialect;
mod error;
pub mod helper;
pub mod password;

pub use crate::dialect::DialectRegistry;
pub use crate::error::{ConnectionError, ConnectionErrorExt};
pub use crate::helper::ConnectionMapper;
pub use crate::password::{PasswordCodec, PlainPasswordCodec, VaultPasswordCodec};
