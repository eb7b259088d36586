use bihub_vault::prelude::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn roundtrip_arbitrary_bytes(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let vault = Vault::<ChaCha>::builder()
            .derived_key("ikm", "salt", "credentials")
            .unwrap()
            .build()
            .unwrap();

        let sealed = vault.seal(&data, b"ctx").unwrap();
        let unsealed = vault.unseal(&sealed, b"ctx").unwrap();
        prop_assert_eq!(data, unsealed);
    }

    #[test]
    fn roundtrip_arbitrary_text(text in ".{0,256}") {
        let vault = Vault::<Aes>::builder().raw_key([7u8; 32]).build().unwrap();

        let sealed = vault.seal_text(&text, b"password").unwrap();
        prop_assert_eq!(vault.unseal_text(&sealed, b"password").unwrap(), text);
    }
}
