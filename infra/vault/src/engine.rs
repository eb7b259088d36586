use aead::Nonce;
use aead::inout::InOutBuf;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use getrandom::fill;
use std::fmt;
use std::sync::Arc;

use crate::builder::VaultBuilder;
use crate::error::{VaultError, VaultErrorExt};
use crate::types::{Aes, HEADER_LEN, NONCE_LEN, PAYLOAD_VERSION_V1, TAG_LEN, VaultCipher};

/// A thread-safe container for sealing secrets at rest.
///
/// `Vault` wraps its cipher in an [`Arc`], making it cheap to clone and safe to share
/// across threads. Every sealed payload is bound to a caller-supplied context (AAD), so a
/// value sealed for one purpose cannot be unsealed for another.
///
/// ### Generic Parameters
/// * `C`: The cipher implementation. Defaults to [`Aes`] (AES-256-GCM).
///
/// ### Example
/// ```rust
/// use bihub_vault::prelude::*;
///
/// # fn main() -> Result<(), VaultError> {
/// let vault = Vault::<Aes>::builder().derived_key("secret", "salt", "credentials")?.build()?;
///
/// let sealed = vault.seal_text("p@ssw0rd", b"database.password")?;
/// assert_eq!(vault.unseal_text(&sealed, b"database.password")?, "p@ssw0rd");
/// # Ok(())
/// # }
/// ```
pub struct Vault<C = Aes>
where
    C: VaultCipher,
{
    pub(crate) cipher: Arc<C>,
}

impl<C: VaultCipher> Clone for Vault<C> {
    fn clone(&self) -> Self {
        Self { cipher: Arc::clone(&self.cipher) }
    }
}

impl<C: VaultCipher> fmt::Debug for Vault<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vault").finish_non_exhaustive()
    }
}

impl<C> Vault<C>
where
    C: VaultCipher,
{
    /// Returns a new [`VaultBuilder`] to configure the vault.
    #[must_use]
    pub fn builder() -> VaultBuilder<C> {
        VaultBuilder::<C>::new()
    }

    #[inline]
    fn next_nonce() -> Nonce<C> {
        let mut nonce = Nonce::<C>::default();
        fill(&mut nonce).expect("System RNG unavailable for nonce generation");
        nonce
    }

    /// Encrypts raw bytes bound to `context`.
    ///
    /// # Errors
    /// * [`VaultError::Encryption`] If the AEAD encryption fails.
    pub fn seal(&self, data: impl AsRef<[u8]>, context: &[u8]) -> Result<Vec<u8>, VaultError> {
        Self::encrypt_internal(&self.cipher, data.as_ref(), context)
    }

    /// Decrypts a payload produced by [`Vault::seal`].
    ///
    /// # Errors
    /// * [`VaultError::InvalidPayload`] If the payload is malformed.
    /// * [`VaultError::Decryption`] If the context, key, or data is invalid.
    pub fn unseal(&self, payload: impl AsRef<[u8]>, context: &[u8]) -> Result<Vec<u8>, VaultError> {
        Self::decrypt_internal(&self.cipher, payload.as_ref(), context)
    }

    /// Seals text and returns the payload as standard Base64.
    ///
    /// # Errors
    /// * [`VaultError::Encryption`] If the AEAD encryption fails.
    pub fn seal_text(&self, text: &str, context: &[u8]) -> Result<String, VaultError> {
        let sealed = self.seal(text.as_bytes(), context)?;
        Ok(STANDARD.encode(sealed))
    }

    /// Reverses [`Vault::seal_text`].
    ///
    /// # Errors
    /// * [`VaultError::Encoding`] If the text is not Base64.
    /// * [`VaultError::InvalidPayload`] If the payload is malformed.
    /// * [`VaultError::Decryption`] If the context, key, or data is invalid.
    /// * [`VaultError::Utf8`] If the plaintext is not UTF-8.
    pub fn unseal_text(&self, encoded: &str, context: &[u8]) -> Result<String, VaultError> {
        let payload = STANDARD.decode(encoded.trim()).context("Sealed text is not Base64")?;
        let plain = self.unseal(payload, context)?;
        String::from_utf8(plain).context("Sealed text is not UTF-8")
    }

    fn encrypt_internal(cipher: &C, data: &[u8], aad: &[u8]) -> Result<Vec<u8>, VaultError> {
        let nonce = Self::next_nonce();

        let mut buf = Vec::with_capacity(HEADER_LEN + NONCE_LEN + data.len() + TAG_LEN);
        buf.push(PAYLOAD_VERSION_V1);
        buf.extend_from_slice(&nonce);
        buf.extend_from_slice(data);

        let (_hdr, rest) = buf.split_at_mut(HEADER_LEN);
        let (_nonce_part, data_part) = rest.split_at_mut(nonce.len());
        let in_out = InOutBuf::from(data_part);

        let tag = cipher.encrypt_inout_detached(&nonce, aad, in_out).map_err(|_| {
            VaultError::Encryption {
                message: "Encryption failed".into(),
                context: Some("AEAD encryption failed".into()),
            }
        })?;

        buf.extend_from_slice(tag.as_slice());
        Ok(buf)
    }

    fn decrypt_internal(cipher: &C, blob: &[u8], aad: &[u8]) -> Result<Vec<u8>, VaultError> {
        if blob.len() < (HEADER_LEN + NONCE_LEN + TAG_LEN) {
            return Err(VaultError::InvalidPayload {
                message: format!(
                    "Payload too short ({} bytes). Expected at least {} bytes",
                    blob.len(),
                    HEADER_LEN + NONCE_LEN + TAG_LEN
                )
                .into(),
                context: None,
            });
        }

        let version = blob[0];
        if version != PAYLOAD_VERSION_V1 {
            return Err(VaultError::InvalidPayload {
                message: "Unsupported payload version".into(),
                context: Some(format!("version={version}").into()),
            });
        }

        let rest = &blob[HEADER_LEN..];
        let (nonce_slice, rest) = rest.split_at(NONCE_LEN);
        let (ciphertext, tag_slice) = rest.split_at(rest.len() - TAG_LEN);

        let nonce = nonce_slice.try_into().map_err(|_| VaultError::Decryption {
            message: "Invalid nonce length".into(),
            context: None,
        })?;

        let tag = tag_slice.try_into().map_err(|_| VaultError::Decryption {
            message: "Invalid tag length".into(),
            context: None,
        })?;

        let mut buf = ciphertext.to_vec();
        let in_out = InOutBuf::from(&mut buf[..]);

        cipher.decrypt_inout_detached(&nonce, aad, in_out, &tag).map_err(|_| {
            VaultError::Decryption {
                message: "Decryption failed".into(),
                context: Some("AEAD authentication failed".into()),
            }
        })?;

        Ok(buf)
    }
}
