//! Logical column types
//!
//! The fixed engine-independent type set. Every adapter maps each member to
//! exactly one native SQL type; strings outside this set are rejected with
//! `UnsupportedType`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Engine-independent column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Bounded character string (VARCHAR)
    String,
    /// Unbounded character string
    Text,
    Integer,
    BigInteger,
    Float,
    Decimal,
    DateTime,
    Timestamp,
    Time,
    Date,
    Binary,
    Boolean,
    Uuid,
    Json,
}

impl ColumnType {
    /// All logical types, in a stable order
    pub const ALL: [ColumnType; 14] = [
        ColumnType::String,
        ColumnType::Text,
        ColumnType::Integer,
        ColumnType::BigInteger,
        ColumnType::Float,
        ColumnType::Decimal,
        ColumnType::DateTime,
        ColumnType::Timestamp,
        ColumnType::Time,
        ColumnType::Date,
        ColumnType::Binary,
        ColumnType::Boolean,
        ColumnType::Uuid,
        ColumnType::Json,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::BigInteger => "biginteger",
            ColumnType::Float => "float",
            ColumnType::Decimal => "decimal",
            ColumnType::DateTime => "datetime",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Time => "time",
            ColumnType::Date => "date",
            ColumnType::Binary => "binary",
            ColumnType::Boolean => "boolean",
            ColumnType::Uuid => "uuid",
            ColumnType::Json => "json",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" | "varchar" => Ok(ColumnType::String),
            "text" => Ok(ColumnType::Text),
            "integer" | "int" => Ok(ColumnType::Integer),
            "biginteger" | "bigint" => Ok(ColumnType::BigInteger),
            "float" | "double" => Ok(ColumnType::Float),
            "decimal" | "numeric" => Ok(ColumnType::Decimal),
            "datetime" => Ok(ColumnType::DateTime),
            "timestamp" => Ok(ColumnType::Timestamp),
            "time" => Ok(ColumnType::Time),
            "date" => Ok(ColumnType::Date),
            "binary" | "blob" => Ok(ColumnType::Binary),
            "boolean" | "bool" => Ok(ColumnType::Boolean),
            "uuid" => Ok(ColumnType::Uuid),
            "json" | "jsonb" => Ok(ColumnType::Json),
            _ => Err(format!("Unknown column type: {}", s)),
        }
    }
}

/// Referential action for foreign key ON DELETE / ON UPDATE clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    /// Parse an engine-reported rule (`information_schema` spelling);
    /// unknown rules fall back to `NoAction`
    pub fn from_sql(rule: &str) -> Self {
        match rule.to_uppercase().as_str() {
            "RESTRICT" => ReferentialAction::Restrict,
            "CASCADE" => ReferentialAction::Cascade,
            "SET NULL" => ReferentialAction::SetNull,
            "SET DEFAULT" => ReferentialAction::SetDefault,
            _ => ReferentialAction::NoAction,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }
}

impl Default for ReferentialAction {
    fn default() -> Self {
        ReferentialAction::NoAction
    }
}
