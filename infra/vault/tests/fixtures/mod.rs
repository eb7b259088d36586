use bihub_vault::prelude::*;

pub const SECRET: &str = "master-secret-123";
pub const SALT: &str = "unique-salt";
pub const SCOPE: &str = "credentials";

/// Initializes a Vault instance with predefined key material for testing.
/// # Panics
/// * If Vault setup fails, the function will panic.
#[must_use]
pub fn setup_vault() -> Vault {
    Vault::builder().derived_key(SECRET, SALT, SCOPE).unwrap().build().expect("Vault setup failed")
}
