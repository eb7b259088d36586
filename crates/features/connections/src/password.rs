//! Password encoding for persisted connections.
//!
//! Stored passwords carry an `Encrypted ` prefix followed by the sealed value. Passwords
//! that reference variables (`${DB_PASSWORD}`, `%%DB_PASSWORD%%`) are stored as typed so
//! they can be resolved later, and values without the prefix decode to themselves.

use crate::error::{ConnectionError, ConnectionErrorExt};
use bihub_kernel::env::contains_variables;
use bihub_vault::{Aes, Vault, VaultCipher};
use std::fmt;

/// Marker in front of every sealed password.
pub const ENCRYPTED_PREFIX: &str = "Encrypted ";

const PASSWORD_CONTEXT: &[u8] = b"bihub.connection.password";

/// Encodes passwords for storage.
pub trait PasswordCodec: Send + Sync {
    /// Encodes a password for persistence. Absent passwords encode as `""`.
    ///
    /// # Errors
    /// Returns [`ConnectionError::Password`] if sealing fails.
    fn encrypt(&self, password: Option<&str>) -> Result<String, ConnectionError>;

    /// Decodes a persisted password. `None` stays `None`.
    ///
    /// # Errors
    /// Returns [`ConnectionError::Password`] if a prefixed value cannot be unsealed.
    fn decrypt(&self, stored: Option<&str>) -> Result<Option<String>, ConnectionError>;
}

/// Seals passwords with the platform [`Vault`].
pub struct VaultPasswordCodec<C: VaultCipher = Aes> {
    vault: Vault<C>,
}

impl<C: VaultCipher> Clone for VaultPasswordCodec<C> {
    fn clone(&self) -> Self {
        Self { vault: self.vault.clone() }
    }
}

impl<C: VaultCipher> fmt::Debug for VaultPasswordCodec<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultPasswordCodec").field("vault", &self.vault).finish()
    }
}

impl<C: VaultCipher> VaultPasswordCodec<C> {
    #[must_use]
    pub const fn new(vault: Vault<C>) -> Self {
        Self { vault }
    }
}

impl<C: VaultCipher> PasswordCodec for VaultPasswordCodec<C> {
    fn encrypt(&self, password: Option<&str>) -> Result<String, ConnectionError> {
        match password {
            None | Some("") => Ok(String::new()),
            Some(p) if contains_variables(p) => Ok(p.to_owned()),
            Some(p) => {
                let sealed =
                    self.vault.seal_text(p, PASSWORD_CONTEXT).context("Sealing password")?;
                Ok(format!("{ENCRYPTED_PREFIX}{sealed}"))
            },
        }
    }

    fn decrypt(&self, stored: Option<&str>) -> Result<Option<String>, ConnectionError> {
        let Some(stored) = stored else {
            return Ok(None);
        };

        match stored.strip_prefix(ENCRYPTED_PREFIX) {
            Some(sealed) => self
                .vault
                .unseal_text(sealed, PASSWORD_CONTEXT)
                .context("Unsealing password")
                .map(Some),
            None => Ok(Some(stored.to_owned())),
        }
    }
}

/// Stores passwords as typed. Meant for tests and throwaway setups.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPasswordCodec;

impl PasswordCodec for PlainPasswordCodec {
    fn encrypt(&self, password: Option<&str>) -> Result<String, ConnectionError> {
        Ok(password.unwrap_or_default().to_owned())
    }

    fn decrypt(&self, stored: Option<&str>) -> Result<Option<String>, ConnectionError> {
        Ok(stored.map(str::to_owned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bihub_vault::ChaCha;

    fn codec() -> VaultPasswordCodec<ChaCha> {
        let vault = Vault::<ChaCha>::builder().raw_key([3u8; 32]).build().unwrap();
        VaultPasswordCodec::new(vault)
    }

    #[test]
    fn test_encrypt_adds_prefix_and_round_trips() {
        let codec = codec();
        let stored = codec.encrypt(Some("s3cr3t")).unwrap();

        assert!(stored.starts_with(ENCRYPTED_PREFIX), "{stored}");
        assert!(!stored.contains("s3cr3t"));
        assert_eq!(codec.decrypt(Some(&stored)).unwrap().as_deref(), Some("s3cr3t"));
    }

    #[test]
    fn test_variables_are_stored_as_typed() {
        let codec = codec();

        assert_eq!(codec.encrypt(Some("${DB_PASSWORD}")).unwrap(), "${DB_PASSWORD}");
        assert_eq!(codec.encrypt(Some("%%DB_PASSWORD%%")).unwrap(), "%%DB_PASSWORD%%");
    }

    #[test]
    fn test_unprefixed_values_pass_through() {
        let codec = codec();

        assert_eq!(codec.decrypt(Some("legacy-plain")).unwrap().as_deref(), Some("legacy-plain"));
        assert_eq!(codec.decrypt(None).unwrap(), None);
        assert_eq!(codec.encrypt(None).unwrap(), "");
    }

    #[test]
    fn test_corrupt_ciphertext_is_an_error() {
        let err = codec().decrypt(Some("Encrypted AAAA")).unwrap_err();
        assert!(matches!(err, ConnectionError::Password { .. }), "{err}");
    }
}
