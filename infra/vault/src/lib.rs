//! A thread-safe cryptographic vault for secrets stored at rest.
//!
//! Database passwords and other credentials are sealed with an AEAD cipher before they are
//! persisted, and unsealed again when a connection is materialized.
//!
//! ## Payload Format & Versioning
//!
//! Encrypted payloads are stored as a versioned binary blob:
//!
//! ```text
//! [V(1)][NONCE(12)][CIPHERTEXT(N)][TAG(16)]
//! ```
//!
//! The text helpers wrap the same blob in standard Base64.
//!
//! ## Nonce Policy
//!
//! Every encryption uses a fresh **random 96-bit nonce**. This is the standard approach for
//! `AES-GCM` and `ChaCha20Poly1305`; it is probabilistic, so rotate the secret if a single key
//! ever seals very large volumes.
//!
//! ## Example
//! ```rust
//! use bihub_vault::prelude::*;
//!
//! # fn main() -> Result<(), VaultError> {
//! let vault = Vault::<ChaCha>::builder()
//!     .derived_key("master-secret", "salt", "credentials")?
//!     .build()?;
//!
//! let sealed = vault.seal(b"token", b"api")?;
//! assert_eq!(vault.unseal(&sealed, b"api")?, b"token");
//! # Ok(())
//! # }
//! ```

mod builder;
mod engine;
mod error;
mod types;

pub use builder::VaultBuilder;
pub use engine::Vault;
pub use error::{VaultError, VaultErrorExt};
pub use types::{Aes, ChaCha, VaultCipher};

pub mod prelude {
    pub use crate::engine::Vault;
    pub use crate::error::{VaultError, VaultErrorExt};
    pub use crate::types::{Aes, ChaCha};
}
