//! Foreign key descriptors

use serde::{Deserialize, Serialize};

use super::types::ReferentialAction;
use crate::error::{AdapterError, MigrateResult};

/// Describes one foreign key constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Local columns, in constraint order
    pub columns: Vec<String>,
    pub referenced_table: String,
    /// Referenced columns; count must match `columns`
    pub referenced_columns: Vec<String>,
    pub name: Option<String>,
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
}

impl ForeignKey {
    pub fn new<I, J, S, T>(
        columns: I,
        referenced_table: impl Into<String>,
        referenced_columns: J,
    ) -> MigrateResult<Self>
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let referenced_columns: Vec<String> =
            referenced_columns.into_iter().map(Into::into).collect();

        if columns.is_empty() {
            return Err(AdapterError::InvalidDescriptor(
                "foreign key requires at least one column".to_string(),
            ));
        }
        if columns.len() != referenced_columns.len() {
            return Err(AdapterError::InvalidDescriptor(format!(
                "foreign key column count mismatch: {} local vs {} referenced",
                columns.len(),
                referenced_columns.len()
            )));
        }

        Ok(Self {
            columns,
            referenced_table: referenced_table.into(),
            referenced_columns,
            name: None,
            on_delete: ReferentialAction::default(),
            on_update: ReferentialAction::default(),
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = action;
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = action;
        self
    }
}
