//! Index descriptors

use serde::{Deserialize, Serialize};

use crate::error::{AdapterError, MigrateResult};

/// Describes one index over an ordered list of columns
///
/// Column order is significant: two indexes over the same columns in a
/// different order are distinct, and `has_index` matches the exact order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub columns: Vec<String>,
    pub unique: bool,
    pub name: Option<String>,
}

impl Index {
    /// Create an index over the given columns; the list must be non-empty
    pub fn on<I, S>(columns: I) -> MigrateResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(AdapterError::InvalidDescriptor(
                "index requires at least one column".to_string(),
            ));
        }
        Ok(Self {
            columns,
            unique: false,
            name: None,
        })
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
