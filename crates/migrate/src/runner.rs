//! Migration runner
//!
//! Drives migration objects through an adapter: checks the version store,
//! wraps each migration in a transaction when the engine supports
//! transactional DDL, records the version, and commits. On failure the
//! migration is rolled back, or — on engines without transactional DDL —
//! the partial state is surfaced as `PartiallyApplied`, never swallowed.
//!
//! Adapters are passed in explicitly; the runner holds no connection state
//! of its own.

use chrono::Utc;
use tracing::{error, info};

use crate::backends::SchemaAdapter;
use crate::error::{AdapterError, MigrateResult};
use crate::migration::{
    ApplyReport, Migration, MigrationDirection, MigrationStatus, RevertReport,
};

/// Executes migrations against any adapter
#[derive(Debug, Default)]
pub struct MigrationRunner;

impl MigrationRunner {
    pub fn new() -> Self {
        Self
    }

    /// Apply one migration; returns false when its version is already
    /// recorded
    pub async fn apply(
        &self,
        adapter: &mut dyn SchemaAdapter,
        migration: &dyn Migration,
    ) -> MigrateResult<bool> {
        adapter.connect().await?;

        let version = migration.version();
        if adapter.versions().await?.contains(&version) {
            return Ok(false);
        }

        info!(version, name = migration.name(), "applying migration");
        let started_at = Utc::now();
        let transactional = adapter.supports_transactions();
        if transactional {
            adapter.begin_transaction().await?;
        }

        let outcome = match migration.up(adapter).await {
            Ok(()) => {
                adapter
                    .record_migration(
                        version,
                        migration.name(),
                        MigrationDirection::Up,
                        started_at,
                        Utc::now(),
                    )
                    .await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                if transactional {
                    adapter.commit_transaction().await?;
                }
                info!(version, "migration applied");
                Ok(true)
            }
            Err(e) => self.fail(adapter, version, transactional, e).await,
        }
    }

    /// Revert one migration; returns false when its version is not
    /// recorded (repeated reverts are no-ops)
    pub async fn revert(
        &self,
        adapter: &mut dyn SchemaAdapter,
        migration: &dyn Migration,
    ) -> MigrateResult<bool> {
        adapter.connect().await?;

        let version = migration.version();
        if !adapter.versions().await?.contains(&version) {
            return Ok(false);
        }

        info!(version, name = migration.name(), "reverting migration");
        let started_at = Utc::now();
        let transactional = adapter.supports_transactions();
        if transactional {
            adapter.begin_transaction().await?;
        }

        let outcome = match migration.down(adapter).await {
            Ok(()) => {
                adapter
                    .record_migration(
                        version,
                        migration.name(),
                        MigrationDirection::Down,
                        started_at,
                        Utc::now(),
                    )
                    .await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                if transactional {
                    adapter.commit_transaction().await?;
                }
                info!(version, "migration reverted");
                Ok(true)
            }
            Err(e) => self.fail(adapter, version, transactional, e).await,
        }
    }

    /// Apply all pending migrations in ascending version order
    pub async fn apply_all(
        &self,
        adapter: &mut dyn SchemaAdapter,
        migrations: &[Box<dyn Migration>],
    ) -> MigrateResult<ApplyReport> {
        let start = std::time::Instant::now();

        let mut ordered: Vec<&dyn Migration> = migrations.iter().map(AsRef::as_ref).collect();
        ordered.sort_by_key(|m| m.version());

        let mut applied_versions = Vec::new();
        let mut skipped_count = 0;
        for migration in ordered {
            if self.apply(adapter, migration).await? {
                applied_versions.push(migration.version());
            } else {
                skipped_count += 1;
            }
        }

        Ok(ApplyReport {
            applied_count: applied_versions.len(),
            applied_versions,
            skipped_count,
            execution_time_ms: start.elapsed().as_millis(),
        })
    }

    /// Revert the most recently applied migration, when one is known
    pub async fn revert_last(
        &self,
        adapter: &mut dyn SchemaAdapter,
        migrations: &[Box<dyn Migration>],
    ) -> MigrateResult<RevertReport> {
        let start = std::time::Instant::now();
        adapter.connect().await?;

        let mut reverted_versions = Vec::new();
        if let Some(version) = adapter.versions().await?.last().copied() {
            let migration = migrations
                .iter()
                .find(|m| m.version() == version)
                .ok_or_else(|| AdapterError::SchemaNotFound {
                    kind: "migration",
                    name: version.to_string(),
                })?;
            if self.revert(adapter, migration.as_ref()).await? {
                reverted_versions.push(version);
            }
        }

        Ok(RevertReport {
            reverted_count: reverted_versions.len(),
            reverted_versions,
            execution_time_ms: start.elapsed().as_millis(),
        })
    }

    /// Revert every applied migration, newest first
    pub async fn revert_all(
        &self,
        adapter: &mut dyn SchemaAdapter,
        migrations: &[Box<dyn Migration>],
    ) -> MigrateResult<RevertReport> {
        let start = std::time::Instant::now();
        adapter.connect().await?;

        let mut reverted_versions = Vec::new();
        for version in adapter.versions().await?.into_iter().rev() {
            let migration = migrations
                .iter()
                .find(|m| m.version() == version)
                .ok_or_else(|| AdapterError::SchemaNotFound {
                    kind: "migration",
                    name: version.to_string(),
                })?;
            if self.revert(adapter, migration.as_ref()).await? {
                reverted_versions.push(version);
            }
        }

        Ok(RevertReport {
            reverted_count: reverted_versions.len(),
            reverted_versions,
            execution_time_ms: start.elapsed().as_millis(),
        })
    }

    /// Status of every known migration against the version store
    pub async fn status(
        &self,
        adapter: &mut dyn SchemaAdapter,
        migrations: &[Box<dyn Migration>],
    ) -> MigrateResult<Vec<MigrationStatus>> {
        adapter.connect().await?;
        let applied = adapter.versions().await?;

        let mut statuses: Vec<MigrationStatus> = migrations
            .iter()
            .map(|m| MigrationStatus {
                version: m.version(),
                name: m.name().to_string(),
                applied: applied.contains(&m.version()),
            })
            .collect();
        statuses.sort_by_key(|s| s.version);
        Ok(statuses)
    }

    /// Failure path: roll back when possible, otherwise surface the
    /// partial state
    async fn fail(
        &self,
        adapter: &mut dyn SchemaAdapter,
        version: i64,
        transactional: bool,
        cause: AdapterError,
    ) -> MigrateResult<bool> {
        if transactional {
            if let Err(rollback_err) = adapter.rollback_transaction().await {
                error!(version, %rollback_err, "rollback failed after migration error");
            } else {
                error!(version, %cause, "migration failed, rolled back");
            }
            Err(cause)
        } else {
            error!(version, %cause, "migration failed without transaction support");
            Err(AdapterError::PartiallyApplied {
                version,
                source: Box::new(cause),
            })
        }
    }
}
