//! Table descriptors

use serde::{Deserialize, Serialize};

use super::column::Column;
use super::foreign_key::ForeignKey;
use super::index::Index;

/// Primary key strategy for a new table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryKey {
    /// Surrogate auto-increment key; the named column is added by the
    /// adapter when the table is created
    AutoIncrement(String),
    /// Explicit (possibly composite) key over existing columns
    Columns(Vec<String>),
    /// No primary key
    None,
}

impl Default for PrimaryKey {
    fn default() -> Self {
        PrimaryKey::AutoIncrement("id".to_string())
    }
}

/// Engine-tunable table options with documented defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Defaults to an auto-increment `id` column
    pub primary_key: PrimaryKey,
    /// Engine comment on the table, where supported
    pub comment: Option<String>,
}

/// Describes one table: ordered columns, indexes and foreign keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKey>,
    pub options: TableOptions,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
            options: TableOptions::default(),
        }
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn with_foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    pub fn with_primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.primary_key =
            PrimaryKey::Columns(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn without_primary_key(mut self) -> Self {
        self.options.primary_key = PrimaryKey::None;
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}
