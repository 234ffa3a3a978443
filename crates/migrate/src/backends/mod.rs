//! Engine adapters
//!
//! One `SchemaAdapter` implementation per engine family, composed from the
//! shared SQL assembly in `sql` rather than inheriting from each other.

pub mod core;
pub mod mysql;
pub mod postgres;
pub mod sql;

pub use self::core::{
    parse_connection_url, AdapterConfig, ColumnLookup, ConnectionConfig, DatabaseOptions,
    IndexLookup, SchemaAdapter,
};
pub use self::mysql::MySqlAdapter;
pub use self::postgres::PostgresAdapter;
pub use self::sql::SqlDialect;

/// Engine family identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterType {
    Postgres,
    MySql,
}

impl std::fmt::Display for AdapterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdapterType::Postgres => write!(f, "postgres"),
            AdapterType::MySql => write!(f, "mysql"),
        }
    }
}

impl std::str::FromStr for AdapterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(AdapterType::Postgres),
            "mysql" => Ok(AdapterType::MySql),
            _ => Err(format!("Unsupported adapter type: {}", s)),
        }
    }
}
