use bihub_connections::{PasswordCodec, VaultPasswordCodec};
use bihub_vault::prelude::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn any_password_round_trips(password in "[^$%]{1,64}") {
        let vault = Vault::<ChaCha>::builder().raw_key([9u8; 32]).build().unwrap();
        let codec = VaultPasswordCodec::new(vault);

        let stored = codec.encrypt(Some(&password)).unwrap();
        prop_assert_ne!(&stored, &password);
        prop_assert_eq!(codec.decrypt(Some(&stored)).unwrap(), Some(password));
    }
}
