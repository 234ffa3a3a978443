//! Version store SQL assembly
//!
//! Statement builders for the reserved table tracking applied migrations.
//! The adapter trait's version-store methods assemble statements here and run
//! them through `execute`/`query`, so every engine shares one protocol: the
//! version column is unique, sortable, and the single source of truth.

use chrono::{DateTime, Utc};

use crate::backends::sql::{quote_string_literal, SqlDialect};

/// Timestamp literal format accepted by both shipped engines
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Statement assembly for one version store table
#[derive(Debug, Clone)]
pub struct VersionStoreSql {
    dialect: SqlDialect,
    table: String,
}

impl VersionStoreSql {
    pub fn new(dialect: SqlDialect, table: impl Into<String>) -> Self {
        Self {
            dialect,
            table: table.into(),
        }
    }

    fn quoted_table(&self) -> String {
        self.dialect.quote_table(&self.table)
    }

    /// Idempotent creation of the version store table
    pub fn create_table(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    \
                version BIGINT NOT NULL,\n    \
                name VARCHAR(100) NOT NULL DEFAULT '',\n    \
                started_at TIMESTAMP NULL,\n    \
                finished_at TIMESTAMP NULL,\n    \
                breakpoint BOOLEAN NOT NULL DEFAULT FALSE,\n    \
                PRIMARY KEY (version)\n\
            )",
            self.quoted_table()
        )
    }

    /// Applied versions, ascending
    pub fn select_versions(&self) -> String {
        format!(
            "SELECT version FROM {} ORDER BY version ASC",
            self.quoted_table()
        )
    }

    /// Full migration records, ascending by version
    pub fn select_records(&self) -> String {
        format!(
            "SELECT version, name, started_at, finished_at, breakpoint FROM {} ORDER BY version ASC",
            self.quoted_table()
        )
    }

    /// Record one applied migration
    pub fn insert_version(
        &self,
        version: i64,
        name: &str,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> String {
        format!(
            "INSERT INTO {} (version, name, started_at, finished_at, breakpoint) VALUES ({}, {}, {}, {}, FALSE)",
            self.quoted_table(),
            version,
            quote_string_literal(name),
            quote_string_literal(&started_at.format(TIMESTAMP_FORMAT).to_string()),
            quote_string_literal(&finished_at.format(TIMESTAMP_FORMAT).to_string()),
        )
    }

    /// Remove one version entry; deleting an absent version affects zero
    /// rows, which keeps repeated down-runs idempotent
    pub fn delete_version(&self, version: i64) -> String {
        format!(
            "DELETE FROM {} WHERE version = {}",
            self.quoted_table(),
            version
        )
    }
}
