//! Column descriptors

use serde::{Deserialize, Serialize};

use super::types::ColumnType;
use crate::value::SqlValue;

/// Describes one column of a table
///
/// Columns are passive value descriptors: migrations construct them, pass
/// them into adapter calls, and the adapter does not retain them afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    /// Columns are nullable unless `not_null` is called
    pub nullable: bool,
    #[serde(skip)]
    pub default: Option<SqlValue>,
    /// Character length for `String`, byte length hint for `Binary`
    pub length: Option<u32>,
    /// Total digits for `Decimal`
    pub precision: Option<u32>,
    /// Fractional digits for `Decimal`
    pub scale: Option<u32>,
    /// Auto-increment / identity column
    pub identity: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            default: None,
            length: None,
            precision: None,
            scale: None,
            identity: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_default(mut self, default: impl Into<SqlValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self.nullable = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_flags_compose() {
        let col = Column::new("price", ColumnType::Decimal)
            .not_null()
            .with_precision(10, 2)
            .with_default(SqlValue::Int32(0));
        assert!(!col.nullable);
        assert_eq!(col.precision, Some(10));
        assert_eq!(col.scale, Some(2));
        assert!(col.default.is_some());
    }

    #[test]
    fn identity_implies_not_null() {
        let col = Column::new("id", ColumnType::BigInteger).identity();
        assert!(col.identity);
        assert!(!col.nullable);
    }
}
