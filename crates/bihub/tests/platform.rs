mod fixtures;

use bihub::connections::password::ENCRYPTED_PREFIX;
use bihub::domain::bundle::ImportBundle;
use bihub::domain::config::{CipherKind, PlatformConfig};
use bihub::domain::connection::{DatabaseAccessType, DatabaseConnection};
use bihub::domain::constants::DOMAIN_ID;
use bihub::metadata::InMemoryDomainRepository;
use bihub::{Platform, PlatformError};
use fixtures::{XMI, config};
use std::io::{Cursor, Write};
use std::sync::Arc;

fn connection(platform: &Platform) -> DatabaseConnection {
    DatabaseConnection {
        name: Some("warehouse".to_owned()),
        database_type: platform.connections().registry().by_short_name("MYSQL").cloned(),
        access_type: Some(DatabaseAccessType::Native),
        hostname: Some("localhost".to_owned()),
        database_port: Some("3306".to_owned()),
        password: Some("secret".to_owned()),
        ..DatabaseConnection::default()
    }
}

#[test]
fn bootstrap_wires_an_encrypting_mapper_for_each_cipher() {
    for cipher in [CipherKind::Aes, CipherKind::ChaCha] {
        let platform = Platform::bootstrap(config(cipher)).unwrap();
        let conn = connection(&platform);

        let node = platform.connections().connection_to_node(&conn).unwrap();
        let stored = node.property("PASSWORD").unwrap().string();
        assert!(stored.starts_with(ENCRYPTED_PREFIX), "{stored}");

        let restored = platform.connections().node_to_connection(None, "warehouse", &node).unwrap();
        assert_eq!(restored.password.as_deref(), Some("secret"));
    }
}

#[test]
fn platforms_sharing_a_secret_read_each_others_passwords() {
    let writer = Platform::bootstrap(config(CipherKind::Aes)).unwrap();
    let reader = Platform::bootstrap(config(CipherKind::Aes)).unwrap();

    let node = writer.connections().connection_to_node(&connection(&writer)).unwrap();
    let restored = reader.connections().node_to_connection(None, "warehouse", &node).unwrap();

    assert_eq!(restored.password.as_deref(), Some("secret"));
}

#[test]
fn empty_secret_is_rejected() {
    let mut cfg = config(CipherKind::Aes);
    cfg.encryption.secret = String::new();

    let err = Platform::bootstrap(cfg).unwrap_err();

    assert!(matches!(err, PlatformError::Vault { .. }));
    assert!(err.to_string().contains("encryption.secret"), "{err}");
}

#[test]
fn metadata_handler_follows_import_config() {
    let mut cfg = config(CipherKind::Aes);
    cfg.import.mime_types = vec!["text/xmi+xml".to_owned(), "application/xmi".to_owned()];
    let platform = Platform::bootstrap(cfg).unwrap();
    let repo = Arc::new(InMemoryDomainRepository::new());

    let handler = platform.metadata_handler().importer(repo.clone()).build().unwrap();
    assert_eq!(handler.mime_types().len(), 2);

    let bundle = ImportBundle::builder()
        .name("orders.xmi")
        .input(Box::new(Cursor::new(XMI.as_bytes().to_vec())))
        .property(DOMAIN_ID, "orders.xmi")
        .build();
    handler.import_file(bundle).unwrap();

    let stored = String::from_utf8(repo.domain("orders.xmi").unwrap()).unwrap();
    assert!(!stored.contains("AGILE_BI_GENERATED_SCHEMA"));
    assert!(stored.contains(r#"name="description""#));
}

#[test]
fn load_reads_file_configuration() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[encryption]
secret = "from-file"
cipher = "chacha"

[import]
merge_locales = false

[[connections.dialects]]
name = "Warehouse"
short_name = "WAREHOUSE"
default_port = 7000
access_types = ["Native"]
"#
    )
    .unwrap();

    let platform = Platform::load(Some(file.path())).unwrap();

    assert_eq!(platform.config().encryption.cipher, CipherKind::ChaCha);
    assert!(!platform.config().import.merge_locales);
    assert!(platform.connections().registry().by_short_name("WAREHOUSE").is_some());
}

#[test]
fn missing_config_file_is_a_config_error() {
    let err = Platform::load(Some("does/not/exist.toml")).unwrap_err();
    assert!(matches!(err, PlatformError::Config { .. }));
}

#[test]
fn default_config_bootstraps() {
    let platform = Platform::bootstrap(PlatformConfig::default()).unwrap();
    assert!(platform.connections().registry().by_short_name("POSTGRESQL").is_some());
    assert!(platform.config().encryption.uses_default_secret());

    let configured = Platform::bootstrap(config(CipherKind::Aes)).unwrap();
    assert!(!configured.config().encryption.uses_default_secret());
}
