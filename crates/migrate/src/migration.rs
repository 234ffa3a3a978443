//! Migration definitions
//!
//! A migration is a versioned unit of schema change with an up and a down
//! direction, expressed as code against the adapter contract. Discovery and
//! loading of migration sources is the caller's concern; this layer only
//! defines the unit the runner executes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backends::SchemaAdapter;
use crate::error::MigrateResult;

/// Direction a migration is executed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationDirection {
    /// Apply the migration
    Up,
    /// Revert the migration
    Down,
}

impl std::fmt::Display for MigrationDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationDirection::Up => write!(f, "up"),
            MigrationDirection::Down => write!(f, "down"),
        }
    }
}

/// One versioned unit of schema change
///
/// Versions are monotonic integers, typically timestamp-derived
/// (e.g. `20240101120000`), and must sort as integers.
#[async_trait]
pub trait Migration: Send + Sync {
    /// Unique, sortable version identifier
    fn version(&self) -> i64;

    /// Human-readable migration name
    fn name(&self) -> &str;

    /// Apply the schema change
    async fn up(&self, adapter: &mut dyn SchemaAdapter) -> MigrateResult<()>;

    /// Revert the schema change
    async fn down(&self, adapter: &mut dyn SchemaAdapter) -> MigrateResult<()>;
}

/// One row of the version store: a completed migration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Marks a known-good point for targeted rollback tooling
    pub breakpoint: bool,
}

/// Result of applying pending migrations
#[derive(Debug)]
pub struct ApplyReport {
    pub applied_count: usize,
    pub applied_versions: Vec<i64>,
    /// Migrations skipped because their version was already recorded
    pub skipped_count: usize,
    pub execution_time_ms: u128,
}

/// Result of reverting migrations
#[derive(Debug)]
pub struct RevertReport {
    pub reverted_count: usize,
    pub reverted_versions: Vec<i64>,
    pub execution_time_ms: u128,
}

/// Status of one known migration against the version store
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationStatus {
    pub version: i64,
    pub name: String,
    pub applied: bool,
}
