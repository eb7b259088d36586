//! Database dialects known to the platform, looked up by short name.

use bihub_domain::config::ConnectionsConfig;
use bihub_domain::connection::DatabaseType;
use fxhash::FxHashMap;
use tracing::debug;

use bihub_domain::connection::DatabaseAccessType::{Jndi, Native, Oci, Odbc, Plugin};

/// Registry of [`DatabaseType`]s.
///
/// Registration order is preserved; registering a short name twice replaces the earlier entry.
#[derive(Debug, Clone, Default)]
pub struct DialectRegistry {
    types: Vec<DatabaseType>,
    by_short_name: FxHashMap<String, usize>,
}

impl DialectRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in dialect set.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for ty in [
            DatabaseType::new("Hypersonic", "HYPERSONIC", 9001, &[Native, Odbc, Jndi]),
            DatabaseType::new("H2", "H2", 9092, &[Native, Odbc, Jndi]),
            DatabaseType::new("MySQL", "MYSQL", 3306, &[Native, Odbc, Jndi]),
            DatabaseType::new("MariaDB", "MARIADB", 3306, &[Native, Odbc, Jndi]),
            DatabaseType::new("PostgreSQL", "POSTGRESQL", 5432, &[Native, Odbc, Jndi]),
            DatabaseType::new("Oracle", "ORACLE", 1521, &[Native, Odbc, Oci, Jndi]),
            DatabaseType::new("MS SQL Server", "MSSQL", 1433, &[Native, Odbc, Jndi]),
            DatabaseType::new("MS SQL Server (Native)", "MSSQLNATIVE", 1433, &[Native, Odbc, Jndi]),
            DatabaseType::new("IBM DB2", "DB2", 50000, &[Native, Odbc, Jndi]),
            DatabaseType::new("Generic database", "GENERIC", 0, &[Native, Odbc, Jndi]),
            DatabaseType::new("Plugin database", "PLUGIN", 0, &[Plugin]),
        ] {
            registry.register(ty);
        }
        registry
    }

    /// Built-ins extended (or overridden) by the configured dialects.
    #[must_use]
    pub fn from_config(config: &ConnectionsConfig) -> Self {
        let mut registry = Self::with_builtins();
        for ty in &config.dialects {
            debug!(short_name = %ty.short_name, "Registering configured dialect");
            registry.register(ty.clone());
        }
        registry
    }

    /// Adds or replaces a dialect.
    pub fn register(&mut self, ty: DatabaseType) {
        if let Some(&index) = self.by_short_name.get(&ty.short_name) {
            self.types[index] = ty;
        } else {
            self.by_short_name.insert(ty.short_name.clone(), self.types.len());
            self.types.push(ty);
        }
    }

    /// Looks up a dialect by its exact short name. Unknown names yield `None`.
    #[must_use]
    pub fn by_short_name(&self, short_name: &str) -> Option<&DatabaseType> {
        self.by_short_name.get(short_name).map(|&index| &self.types[index])
    }

    #[must_use]
    pub fn types(&self) -> &[DatabaseType] {
        &self.types
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
