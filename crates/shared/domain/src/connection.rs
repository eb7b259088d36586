//! Database connection descriptors as the platform stores and exchanges them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The way a client reaches the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatabaseAccessType {
    Native,
    Odbc,
    Oci,
    Plugin,
    Jndi,
    Custom,
}

impl DatabaseAccessType {
    pub const ALL: [Self; 6] =
        [Self::Native, Self::Odbc, Self::Oci, Self::Plugin, Self::Jndi, Self::Custom];

    /// Display name used in persisted connections.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Native => "Native",
            Self::Odbc => "ODBC",
            Self::Oci => "OCI",
            Self::Plugin => "Plugin",
            Self::Jndi => "JNDI",
            Self::Custom => "Custom",
        }
    }

    /// Looks up an access type by its exact display name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for DatabaseAccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A database dialect known to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatabaseType {
    pub name: String,
    pub short_name: String,
    pub default_port: u16,
    pub access_types: Vec<DatabaseAccessType>,
}

impl DatabaseType {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        short_name: impl Into<String>,
        default_port: u16,
        access_types: &[DatabaseAccessType],
    ) -> Self {
        Self {
            name: name.into(),
            short_name: short_name.into(),
            default_port,
            access_types: access_types.to_vec(),
        }
    }
}

/// A structured database connection description.
///
/// Optional string fields model values that may be absent in persisted data.
/// The key-value maps are always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConnection {
    pub id: Option<String>,
    pub name: Option<String>,
    pub database_type: Option<DatabaseType>,
    pub access_type: Option<DatabaseAccessType>,
    pub hostname: Option<String>,
    pub database_name: Option<String>,
    pub database_port: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub informix_servername: Option<String>,
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
    pub attributes: BTreeMap<String, String>,
    pub connection_pooling_properties: BTreeMap<String, String>,
    pub extra_options: BTreeMap<String, String>,
    pub extra_options_order: BTreeMap<String, String>,
}

impl DatabaseConnection {
    /// The port as a number. Blank ports read as `0`.
    ///
    /// # Errors
    /// Returns the parse error when the port is present but not numeric.
    pub fn port_number(&self) -> Result<i64, std::num::ParseIntError> {
        match self.database_port.as_deref().map(str::trim) {
            None | Some("") => Ok(0),
            Some(port) => port.parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_type_lookup_is_exact() {
        assert_eq!(DatabaseAccessType::by_name("JNDI"), Some(DatabaseAccessType::Jndi));
        assert_eq!(DatabaseAccessType::by_name("Native"), Some(DatabaseAccessType::Native));
        assert_eq!(DatabaseAccessType::by_name("native"), None);
        assert_eq!(DatabaseAccessType::by_name(""), None);
    }

    #[test]
    fn test_blank_port_reads_as_zero() {
        let mut conn = DatabaseConnection::default();
        assert_eq!(conn.port_number(), Ok(0));

        conn.database_port = Some("  ".to_owned());
        assert_eq!(conn.port_number(), Ok(0));

        conn.database_port = Some("5432".to_owned());
        assert_eq!(conn.port_number(), Ok(5432));

        conn.database_port = Some("pg".to_owned());
        assert!(conn.port_number().is_err());
    }
}
