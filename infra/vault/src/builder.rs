use crate::engine::Vault;
use crate::error::VaultError;
use crate::types::{Aes, KEY_INFO_PREFIX, VaultCipher};
use aead::Key;
use hkdf::Hkdf;
use private::Sealed;
use sha2::Sha256;
use std::marker::PhantomData;
use std::sync::Arc;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Debug, Default, ZeroizeOnDrop)]
pub struct NoKey;
#[derive(Debug, Zeroize, ZeroizeOnDrop)]
pub struct WithKey {
    key: [u8; 32],
}

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoKey {}
impl Sealed for WithKey {}

/// A builder for secure initialization of the [`Vault`].
///
/// Implements `ZeroizeOnDrop` so raw key material is cleared as soon as the builder goes away.
#[allow(private_bounds)]
#[derive(Debug, Zeroize, ZeroizeOnDrop)]
pub struct VaultBuilder<C: VaultCipher = Aes, K: Sealed + ZeroizeOnDrop = NoKey> {
    #[zeroize(skip)]
    _cipher: PhantomData<C>,
    key: K,
}

impl<C: VaultCipher> Default for VaultBuilder<C> {
    fn default() -> Self {
        Self { _cipher: PhantomData, key: NoKey }
    }
}

impl<C: VaultCipher> VaultBuilder<C> {
    /// Creates a new empty builder.
    #[must_use = "Builder must be configured with a key before use"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the vault key using HKDF-SHA256.
    ///
    /// # Arguments
    /// * `ikm`: Input Keying Material (the platform secret).
    /// * `salt`: Uniquifies keys across different installations.
    /// * `scope`: Label bound into the key, e.g. `credentials`.
    ///
    /// # Errors
    /// Returns [`VaultError::InvalidConfiguration`] if key derivation fails.
    pub fn derived_key(
        self,
        ikm: impl AsRef<[u8]>,
        salt: impl AsRef<[u8]>,
        scope: impl AsRef<[u8]>,
    ) -> Result<VaultBuilder<C, WithKey>, VaultError> {
        if ikm.as_ref().is_empty() {
            return Err(VaultError::InvalidConfiguration {
                message: "Secret must not be empty".into(),
                context: None,
            });
        }

        let (_, hk) = Hkdf::<Sha256>::extract(Some(salt.as_ref()), ikm.as_ref());
        let mut key = [0u8; 32];

        let mut info = Vec::from(KEY_INFO_PREFIX);
        info.extend_from_slice(scope.as_ref());

        hk.expand(&info, &mut key).map_err(|_| VaultError::InvalidConfiguration {
            message: "HKDF expansion failed".into(),
            context: Some("derived_key".into()),
        })?;

        info.zeroize();

        Ok(VaultBuilder { _cipher: PhantomData, key: WithKey { key } })
    }

    /// Uses a raw 256-bit key as is.
    #[must_use]
    pub fn raw_key(self, key: [u8; 32]) -> VaultBuilder<C, WithKey> {
        VaultBuilder { _cipher: PhantomData, key: WithKey { key } }
    }
}

impl<C: VaultCipher> VaultBuilder<C, WithKey> {
    /// Finalizes vault construction and `zeroes` the builder.
    ///
    /// # Errors
    /// Returns [`VaultError::InvalidConfiguration`] if the key cannot initialize the cipher.
    pub fn build(mut self) -> Result<Vault<C>, VaultError> {
        let key = Key::<C>::try_from(&self.key.key[..]).map_err(|_| {
            VaultError::InvalidConfiguration {
                message: format!("Invalid key length {}, must be 32 bytes", self.key.key.len())
                    .into(),
                context: Some("build".into()),
            }
        })?;
        let cipher = C::new(&key);

        self.zeroize();

        Ok(Vault { cipher: Arc::new(cipher) })
    }
}
