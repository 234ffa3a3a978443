//! Error types for the migration adapter layer
//!
//! Every engine error is wrapped with enough context (operation, identifiers,
//! statement text) for the runner to report a precise failure. Nothing is
//! swallowed: precondition violations and engine diagnostics always surface.

use thiserror::Error;

/// Result type for all adapter and runner operations
pub type MigrateResult<T> = Result<T, AdapterError>;

/// Errors raised by adapters and the migration runner
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Connecting to or disconnecting from the database failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// A statement failed on the engine; carries the offending SQL
    #[error("Statement failed: {message} (statement: {statement})")]
    Statement { statement: String, message: String },

    /// A schema object that must not exist already does
    #[error("Schema conflict on {kind} '{name}': {message}")]
    SchemaConflict {
        kind: &'static str,
        name: String,
        message: String,
    },

    /// A schema object that must exist was not found
    #[error("{kind} '{name}' not found")]
    SchemaNotFound { kind: &'static str, name: String },

    /// A logical column type has no native mapping on this engine
    #[error("Type '{type_name}' is not supported by the {adapter} adapter")]
    UnsupportedType {
        type_name: String,
        adapter: &'static str,
    },

    /// Commit or rollback without a matching begin, or a nested begin
    #[error("Transaction state error: {0}")]
    TransactionState(String),

    /// The version store table is unavailable and could not be created
    #[error("Version store error: {0}")]
    Persistence(String),

    /// Descriptor validation failed before reaching the engine
    #[error("Invalid schema descriptor: {0}")]
    InvalidDescriptor(String),

    /// A migration failed on an engine without transactional DDL and left
    /// the schema partially mutated
    #[error("Migration {version} partially applied: {source}")]
    PartiallyApplied {
        version: i64,
        #[source]
        source: Box<AdapterError>,
    },
}

impl AdapterError {
    /// Build a statement error from an engine diagnostic
    pub fn statement(sql: impl Into<String>, err: impl std::fmt::Display) -> Self {
        AdapterError::Statement {
            statement: sql.into(),
            message: err.to_string(),
        }
    }

    pub fn table_not_found(name: impl Into<String>) -> Self {
        AdapterError::SchemaNotFound {
            kind: "table",
            name: name.into(),
        }
    }

    pub fn column_not_found(table: &str, column: &str) -> Self {
        AdapterError::SchemaNotFound {
            kind: "column",
            name: format!("{}.{}", table, column),
        }
    }

    pub fn table_conflict(name: impl Into<String>, message: impl Into<String>) -> Self {
        AdapterError::SchemaConflict {
            kind: "table",
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn column_conflict(table: &str, column: &str, message: impl Into<String>) -> Self {
        AdapterError::SchemaConflict {
            kind: "column",
            name: format!("{}.{}", table, column),
            message: message.into(),
        }
    }
}
