//! Legacy connection descriptions produced by older data-integration tooling.
//!
//! Values may contain unresolved variable placeholders (`${NAME}`, `%%NAME%%`), the
//! access type is free text, and the property maps are flat `key=value` lists.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyDatabaseMeta {
    pub name: Option<String>,
    pub object_id: Option<String>,
    /// Dialect short name, e.g. `POSTGRESQL`.
    pub database_type_desc: Option<String>,
    /// Access type text, e.g. `Native (JDBC)`.
    pub access_type_desc: Option<String>,
    pub hostname: Option<String>,
    pub database_name: Option<String>,
    pub port: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub servername: Option<String>,
    pub data_tablespace: Option<String>,
    pub index_tablespace: Option<String>,
    pub connect_sql: Option<String>,
    pub initial_pool_size: i32,
    pub maximum_pool_size: i32,
    pub using_connection_pool: bool,
    pub forcing_identifiers_to_lower_case: bool,
    pub forcing_identifiers_to_upper_case: bool,
    pub quote_all_fields: bool,
    pub using_double_decimal_as_schema_table_separator: bool,
    pub attributes: Vec<(String, String)>,
    pub connection_pooling_properties: Vec<(String, String)>,
    pub extra_options: Vec<(String, String)>,
}
