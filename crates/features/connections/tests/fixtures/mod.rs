use bihub_connections::{ConnectionMapper, DialectRegistry, PasswordCodec, VaultPasswordCodec};
use bihub_domain::connection::{DatabaseAccessType, DatabaseConnection};
use bihub_vault::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Mapper backed by a real vault codec and the built-in dialects.
/// # Panics
/// * If the vault cannot be built.
#[must_use]
pub fn vault_mapper() -> ConnectionMapper {
    let vault = Vault::<Aes>::builder().derived_key("test-secret", "test-salt", "credentials").unwrap().build().unwrap();
    let codec: Arc<dyn PasswordCodec> = Arc::new(VaultPasswordCodec::new(vault));
    ConnectionMapper::new(Arc::new(DialectRegistry::with_builtins()), codec)
}

fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

/// A connection with every field populated.
/// # Panics
/// * If the built-in registry lacks PostgreSQL.
#[must_use]
pub fn full_connection() -> DatabaseConnection {
    let registry = DialectRegistry::with_builtins();
    DatabaseConnection {
        id: Some("conn-1".to_owned()),
        name: Some("SampleData".to_owned()),
        database_type: registry.by_short_name("POSTGRESQL").cloned(),
        access_type: Some(DatabaseAccessType::Native),
        hostname: Some("db.internal".to_owned()),
        database_name: Some("sampledata".to_owned()),
        database_port: Some("5432".to_owned()),
        username: Some("pentaho_user".to_owned()),
        password: Some("p@ssw0rd".to_owned()),
        informix_servername: Some("ifx".to_owned()),
        data_tablespace: Some("DATA_TS".to_owned()),
        index_tablespace: Some("INDEX_TS".to_owned()),
        connect_sql: Some("SET search_path TO sales".to_owned()),
        initial_pool_size: 5,
        maximum_pool_size: 20,
        using_connection_pool: true,
        forcing_identifiers_to_lower_case: true,
        forcing_identifiers_to_upper_case: false,
        quote_all_fields: true,
        using_double_decimal_as_schema_table_separator: true,
        attributes: map(&[("SUPPORTS_BOOLEAN_DATA_TYPE", "Y"), ("PORT_NUMBER", "5432")]),
        connection_pooling_properties: map(&[("validationQuery", "SELECT 1")]),
        extra_options: map(&[("POSTGRESQL.ssl", "true")]),
        extra_options_order: map(&[("POSTGRESQL.ssl", "0")]),
    }
}
