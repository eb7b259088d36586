//! Conversions between [`DatabaseConnection`], its persisted [`DataNode`] form and
//! [`LegacyDatabaseMeta`].

use crate::dialect::DialectRegistry;
use crate::error::{ConnectionError, ConnectionErrorExt};
use crate::password::PasswordCodec;
use bihub_domain::connection::{DatabaseAccessType, DatabaseConnection};
use bihub_domain::legacy::LegacyDatabaseMeta;
use bihub_domain::node::DataNode;
use bihub_kernel::env::VariableSpace;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub const NODE_ROOT: &str = "databaseMeta";
pub const NODE_ATTRIBUTES: &str = "attributes";
pub const NODE_POOLING_PROPS: &str = "poolProps";
pub const NODE_EXTRA_OPTIONS: &str = "extraOptions";
pub const NODE_EXTRA_OPTIONS_ORDER: &str = "extraOptionsOrder";

pub const PROP_TYPE: &str = "TYPE";
pub const PROP_CONTYPE: &str = "CONTYPE";
pub const PROP_HOST_NAME: &str = "HOST_NAME";
pub const PROP_DATABASE_NAME: &str = "DATABASE_NAME";
pub const PROP_PORT: &str = "PORT";
pub const PROP_USERNAME: &str = "USERNAME";
pub const PROP_PASSWORD: &str = "PASSWORD";
pub const PROP_SERVERNAME: &str = "SERVERNAME";
pub const PROP_DATA_TBS: &str = "DATA_TBS";
pub const PROP_INDEX_TBS: &str = "INDEX_TBS";
pub const PROP_CONNECT_SQL: &str = "connectionSQL";
pub const PROP_INITIAL_POOL_SIZE: &str = "initialPoolSize";
pub const PROP_MAX_POOL_SIZE: &str = "maxPoolSize";
pub const PROP_IS_POOLING: &str = "isPooling";
pub const PROP_IS_FORCING_TO_LOWER: &str = "isForcingLower";
pub const PROP_IS_FORCING_TO_UPPER: &str = "isForcingUpper";
pub const PROP_IS_QUOTE_FIELDS: &str = "isQuoteFields";
pub const PROP_IS_DECIMAL_SEPARATOR: &str = "isUsingDecimalSeperator";

/// Attribute mirroring the port; an explicitly set value wins.
pub const ATTRIBUTE_PORT_NUMBER: &str = "PORT_NUMBER";

/// Maps database connections to and from their persisted forms.
///
/// The mapper holds no mutable state; one instance can serve all callers.
#[derive(Clone)]
pub struct ConnectionMapper {
    registry: Arc<DialectRegistry>,
    codec: Arc<dyn PasswordCodec>,
}

impl fmt::Debug for ConnectionMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionMapper").field("dialects", &self.registry.len()).finish_non_exhaustive()
    }
}

impl ConnectionMapper {
    #[must_use]
    pub fn new(registry: Arc<DialectRegistry>, codec: Arc<dyn PasswordCodec>) -> Self {
        Self { registry, codec }
    }

    #[must_use]
    pub fn registry(&self) -> &DialectRegistry {
        &self.registry
    }

    /// Builds the `databaseMeta` node for a connection.
    ///
    /// # Errors
    /// * [`ConnectionError::InvalidPort`] if the port is set but not numeric.
    /// * [`ConnectionError::Password`] if the password cannot be encrypted.
    pub fn connection_to_node(&self, conn: &DatabaseConnection) -> Result<DataNode, ConnectionError> {
        let port = conn.port_number().context(PROP_PORT)?;
        let mut root = DataNode::new(NODE_ROOT);

        if let Some(ty) = &conn.database_type {
            root.set_property(PROP_TYPE, ty.short_name.as_str());
        }
        root.set_property(PROP_CONTYPE, conn.access_type.map_or("", DatabaseAccessType::name));
        root.set_property(PROP_HOST_NAME, or_empty(conn.hostname.as_deref()));
        root.set_property(PROP_DATABASE_NAME, or_empty(conn.database_name.as_deref()));
        root.set_property(PROP_PORT, port);
        root.set_property(PROP_USERNAME, or_empty(conn.username.as_deref()));
        root.set_property(PROP_PASSWORD, self.codec.encrypt(conn.password.as_deref())?);
        root.set_property(PROP_SERVERNAME, or_empty(conn.informix_servername.as_deref()));
        root.set_property(PROP_DATA_TBS, or_empty(conn.data_tablespace.as_deref()));
        root.set_property(PROP_INDEX_TBS, or_empty(conn.index_tablespace.as_deref()));
        root.set_property(PROP_CONNECT_SQL, or_empty(conn.connect_sql.as_deref()));
        root.set_property(PROP_INITIAL_POOL_SIZE, conn.initial_pool_size);
        root.set_property(PROP_MAX_POOL_SIZE, conn.maximum_pool_size);
        root.set_property(PROP_IS_POOLING, conn.using_connection_pool);
        root.set_property(PROP_IS_FORCING_TO_LOWER, conn.forcing_identifiers_to_lower_case);
        root.set_property(PROP_IS_FORCING_TO_UPPER, conn.forcing_identifiers_to_upper_case);
        root.set_property(PROP_IS_QUOTE_FIELDS, conn.quote_all_fields);
        root.set_property(
            PROP_IS_DECIMAL_SEPARATOR,
            conn.using_double_decimal_as_schema_table_separator,
        );

        let attributes = write_map(&mut root, NODE_ATTRIBUTES, &conn.attributes);
        if !conn.attributes.contains_key(ATTRIBUTE_PORT_NUMBER) {
            attributes.set_property(ATTRIBUTE_PORT_NUMBER, port);
        }
        write_map(&mut root, NODE_POOLING_PROPS, &conn.connection_pooling_properties);
        write_map(&mut root, NODE_EXTRA_OPTIONS, &conn.extra_options);
        write_map(&mut root, NODE_EXTRA_OPTIONS_ORDER, &conn.extra_options_order);

        debug!(name = ?conn.name, "Connection mapped to node");
        Ok(root)
    }

    /// Reads a connection back from its `databaseMeta` node.
    ///
    /// Missing strings stay `None`, missing numbers read as `0` and missing flags as `false`.
    ///
    /// # Errors
    /// Returns [`ConnectionError::Password`] if the stored password cannot be decrypted.
    pub fn node_to_connection(
        &self,
        id: Option<&str>,
        name: &str,
        node: &DataNode,
    ) -> Result<DatabaseConnection, ConnectionError> {
        let password = string(node, PROP_PASSWORD);

        let conn = DatabaseConnection {
            id: id.map(str::to_owned),
            name: Some(name.to_owned()),
            database_type: string(node, PROP_TYPE)
                .and_then(|short| self.registry.by_short_name(&short).cloned()),
            access_type: string(node, PROP_CONTYPE).as_deref().and_then(access_type),
            hostname: string(node, PROP_HOST_NAME),
            database_name: string(node, PROP_DATABASE_NAME),
            database_port: string(node, PROP_PORT),
            username: string(node, PROP_USERNAME),
            password: self.codec.decrypt(password.as_deref())?,
            informix_servername: string(node, PROP_SERVERNAME),
            data_tablespace: string(node, PROP_DATA_TBS),
            index_tablespace: string(node, PROP_INDEX_TBS),
            connect_sql: string(node, PROP_CONNECT_SQL),
            initial_pool_size: int(node, PROP_INITIAL_POOL_SIZE),
            maximum_pool_size: int(node, PROP_MAX_POOL_SIZE),
            using_connection_pool: boolean(node, PROP_IS_POOLING),
            forcing_identifiers_to_lower_case: boolean(node, PROP_IS_FORCING_TO_LOWER),
            forcing_identifiers_to_upper_case: boolean(node, PROP_IS_FORCING_TO_UPPER),
            quote_all_fields: boolean(node, PROP_IS_QUOTE_FIELDS),
            using_double_decimal_as_schema_table_separator: boolean(
                node,
                PROP_IS_DECIMAL_SEPARATOR,
            ),
            attributes: read_map(node, NODE_ATTRIBUTES),
            connection_pooling_properties: read_map(node, NODE_POOLING_PROPS),
            extra_options: read_map(node, NODE_EXTRA_OPTIONS),
            extra_options_order: read_map(node, NODE_EXTRA_OPTIONS_ORDER),
        };

        debug!(name, "Node mapped to connection");
        Ok(conn)
    }

    /// Converts a legacy connection description, resolving variables through `vars`.
    ///
    /// Attribute and pooling values that are blank are skipped. There is no reverse mapping.
    ///
    /// # Errors
    /// Returns [`ConnectionError::Password`] if the resolved password cannot be decrypted.
    pub fn legacy_to_connection(
        &self,
        meta: &LegacyDatabaseMeta,
        vars: &dyn VariableSpace,
    ) -> Result<DatabaseConnection, ConnectionError> {
        let sub = |value: &Option<String>| vars.substitute_opt(value.as_deref());
        let password = sub(&meta.password);

        let conn = DatabaseConnection {
            id: meta.object_id.clone(),
            name: sub(&meta.name),
            database_type: meta
                .database_type_desc
                .as_deref()
                .and_then(|short| self.registry.by_short_name(short).cloned()),
            access_type: meta.access_type_desc.as_deref().and_then(access_type),
            hostname: sub(&meta.hostname),
            database_name: sub(&meta.database_name),
            database_port: sub(&meta.port),
            username: sub(&meta.username),
            password: self.codec.decrypt(password.as_deref())?,
            informix_servername: sub(&meta.servername),
            data_tablespace: sub(&meta.data_tablespace),
            index_tablespace: sub(&meta.index_tablespace),
            connect_sql: sub(&meta.connect_sql),
            initial_pool_size: meta.initial_pool_size,
            maximum_pool_size: meta.maximum_pool_size,
            using_connection_pool: meta.using_connection_pool,
            forcing_identifiers_to_lower_case: meta.forcing_identifiers_to_lower_case,
            forcing_identifiers_to_upper_case: meta.forcing_identifiers_to_upper_case,
            quote_all_fields: meta.quote_all_fields,
            using_double_decimal_as_schema_table_separator: meta
                .using_double_decimal_as_schema_table_separator,
            attributes: properties(&meta.attributes, vars),
            connection_pooling_properties: properties(&meta.connection_pooling_properties, vars),
            extra_options: meta
                .extra_options
                .iter()
                .map(|(k, v)| (k.clone(), vars.environment_substitute(v)))
                .collect(),
            extra_options_order: BTreeMap::new(),
        };

        debug!(name = ?conn.name, "Legacy metadata mapped to connection");
        Ok(conn)
    }
}

/// Normalizes free-text access types: anything mentioning `Native` is native, a bare
/// `", "` is JNDI, everything else must match a display name exactly.
fn access_type(text: &str) -> Option<DatabaseAccessType> {
    if text.contains("Native") {
        Some(DatabaseAccessType::Native)
    } else if text == ", " {
        Some(DatabaseAccessType::Jndi)
    } else {
        DatabaseAccessType::by_name(text)
    }
}

fn or_empty(value: Option<&str>) -> &str {
    value.unwrap_or_default()
}

fn string(node: &DataNode, name: &str) -> Option<String> {
    node.property(name).map(|v| v.string())
}

#[allow(clippy::cast_possible_truncation)]
fn int(node: &DataNode, name: &str) -> i32 {
    node.property(name).map_or(0, |v| v.long() as i32)
}

fn boolean(node: &DataNode, name: &str) -> bool {
    node.property(name).is_some_and(|v| v.boolean())
}

fn write_map<'a>(
    root: &'a mut DataNode,
    name: &str,
    map: &BTreeMap<String, String>,
) -> &'a mut DataNode {
    let node = root.add_node(name);
    for (key, value) in map {
        node.set_property(key.as_str(), value.as_str());
    }
    node
}

fn read_map(root: &DataNode, name: &str) -> BTreeMap<String, String> {
    root.node(name)
        .map(|node| node.properties().iter().map(|p| (p.name.clone(), p.value.string())).collect())
        .unwrap_or_default()
}

fn properties(entries: &[(String, String)], vars: &dyn VariableSpace) -> BTreeMap<String, String> {
    entries
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(key, value)| (key.clone(), vars.environment_substitute(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_type_normalization() {
        assert_eq!(access_type("Native (JDBC)"), Some(DatabaseAccessType::Native));
        assert_eq!(access_type("via Native driver"), Some(DatabaseAccessType::Native));
        assert_eq!(access_type(", "), Some(DatabaseAccessType::Jndi));
        assert_eq!(access_type(","), None);
        assert_eq!(access_type("ODBC"), Some(DatabaseAccessType::Odbc));
        assert_eq!(access_type("odbc"), None);
    }

    #[test]
    fn test_blank_property_values_are_skipped() {
        let vars = bihub_kernel::env::Variables::default().set("SSL", "true");
        let entries = vec![
            ("ssl".to_owned(), "${SSL}".to_owned()),
            ("empty".to_owned(), String::new()),
            ("spaces".to_owned(), "  ".to_owned()),
        ];

        let map = properties(&entries, &vars);
        assert_eq!(map.len(), 1);
        assert_eq!(map["ssl"], "true");
    }
}
