//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it re-exports ergonomic helpers for config loading,
//! variable substitution and localized messages.
//!
//! ## Variable substitution
//! ```rust
//! use bihub_kernel::env::{VariableSpace, Variables};
//!
//! let vars = Variables::default().set("DB_HOST", "warehouse.local");
//! assert_eq!(vars.environment_substitute("jdbc://${DB_HOST}/sales"), "jdbc://warehouse.local/sales");
//! ```
//!
//! ## Config loading
//! ```rust,ignore
//! use bihub_kernel::config::load_config;
//! let cfg: bihub_kernel::domain::config::PlatformConfig = load_config(Some("bihub.toml")).unwrap();
//! ```
pub mod config;
pub mod env;
pub mod messages;

pub use bihub_domain as domain;
