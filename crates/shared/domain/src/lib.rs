//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`, `bitflags`,
//! `typed-builder`). Keep it lean: plain data and simple helpers, no I/O.

pub mod acl;
pub mod bundle;
pub mod config;
pub mod connection;
pub mod constants;
pub mod legacy;
pub mod node;
