//! In-memory adapter used to exercise runner and version-store semantics
//! without a live database.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use strata_migrate::{
    AdapterError, AdapterType, Column, ColumnType, DatabaseOptions, ForeignKey, Index,
    IndexLookup, MigrateResult, MigrationDirection, MigrationRecord, PrimaryKey, Row,
    SchemaAdapter, SqlDialect, Table,
};

/// Committed plus in-flight state, snapshotted on begin for rollback
#[derive(Clone, Default)]
struct State {
    tables: HashMap<String, Table>,
    records: Vec<MigrationRecord>,
    schema_table_created: bool,
}

/// Test double: a fully in-memory engine with configurable transaction
/// support
pub struct MemoryAdapter {
    connected: bool,
    transactional: bool,
    in_transaction: bool,
    state: State,
    snapshot: Option<State>,
    databases: HashSet<String>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::with_transactions(true)
    }

    /// `false` simulates an engine that commits DDL implicitly
    pub fn with_transactions(transactional: bool) -> Self {
        Self {
            connected: false,
            transactional,
            in_transaction: false,
            state: State::default(),
            snapshot: None,
            databases: HashSet::new(),
        }
    }

    fn table_mut(&mut self, name: &str) -> MigrateResult<&mut Table> {
        self.state
            .tables
            .get_mut(name)
            .ok_or_else(|| AdapterError::table_not_found(name))
    }
}

#[async_trait]
impl SchemaAdapter for MemoryAdapter {
    fn adapter_type(&self) -> AdapterType {
        AdapterType::Postgres
    }

    fn dialect(&self) -> SqlDialect {
        SqlDialect::Postgres
    }

    fn schema_table_name(&self) -> &str {
        "schema_versions"
    }

    async fn connect(&mut self) -> MigrateResult<()> {
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> MigrateResult<()> {
        self.connected = false;
        self.in_transaction = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn supports_transactions(&self) -> bool {
        self.transactional
    }

    async fn begin_transaction(&mut self) -> MigrateResult<()> {
        if self.in_transaction {
            return Err(AdapterError::TransactionState(
                "transaction already open".to_string(),
            ));
        }
        self.snapshot = Some(self.state.clone());
        self.in_transaction = true;
        Ok(())
    }

    async fn commit_transaction(&mut self) -> MigrateResult<()> {
        if !self.in_transaction {
            return Err(AdapterError::TransactionState(
                "commit without an open transaction".to_string(),
            ));
        }
        self.snapshot = None;
        self.in_transaction = false;
        Ok(())
    }

    async fn rollback_transaction(&mut self) -> MigrateResult<()> {
        if !self.in_transaction {
            return Err(AdapterError::TransactionState(
                "rollback without an open transaction".to_string(),
            ));
        }
        self.state = self.snapshot.take().expect("snapshot taken on begin");
        self.in_transaction = false;
        Ok(())
    }

    async fn execute(&mut self, _sql: &str) -> MigrateResult<u64> {
        Ok(0)
    }

    async fn query(&mut self, _sql: &str) -> MigrateResult<Vec<Row>> {
        Ok(Vec::new())
    }

    async fn has_table(&mut self, table: &str) -> MigrateResult<bool> {
        Ok(self.state.tables.contains_key(table))
    }

    async fn create_table(&mut self, table: &Table) -> MigrateResult<()> {
        if self.state.tables.contains_key(&table.name) {
            return Err(AdapterError::table_conflict(
                &table.name,
                "table already exists",
            ));
        }
        let mut stored = table.clone();
        if let PrimaryKey::AutoIncrement(pk) = &stored.options.primary_key {
            let pk_column = Column::new(pk.clone(), ColumnType::BigInteger).identity();
            stored.columns.insert(0, pk_column);
        }
        self.state.tables.insert(stored.name.clone(), stored);
        Ok(())
    }

    async fn rename_table(&mut self, table: &str, new_name: &str) -> MigrateResult<()> {
        if self.state.tables.contains_key(new_name) {
            return Err(AdapterError::table_conflict(new_name, "target exists"));
        }
        let mut stored = self
            .state
            .tables
            .remove(table)
            .ok_or_else(|| AdapterError::table_not_found(table))?;
        stored.name = new_name.to_string();
        self.state.tables.insert(new_name.to_string(), stored);
        Ok(())
    }

    async fn drop_table(&mut self, table: &str) -> MigrateResult<()> {
        self.state
            .tables
            .remove(table)
            .map(|_| ())
            .ok_or_else(|| AdapterError::table_not_found(table))
    }

    async fn truncate_table(&mut self, table: &str) -> MigrateResult<()> {
        self.table_mut(table).map(|_| ())
    }

    async fn get_columns(&mut self, table: &str) -> MigrateResult<Vec<Column>> {
        self.state
            .tables
            .get(table)
            .map(|t| t.columns.clone())
            .ok_or_else(|| AdapterError::table_not_found(table))
    }

    async fn add_column(&mut self, table: &str, column: &Column) -> MigrateResult<()> {
        let stored = self.table_mut(table)?;
        if stored.has_column(&column.name) {
            return Err(AdapterError::column_conflict(
                table,
                &column.name,
                "column already exists",
            ));
        }
        stored.columns.push(column.clone());
        Ok(())
    }

    async fn rename_column(
        &mut self,
        table: &str,
        column: &str,
        new_name: &str,
    ) -> MigrateResult<()> {
        let table_name = table.to_string();
        let stored = self.table_mut(table)?;
        if stored.has_column(new_name) {
            return Err(AdapterError::column_conflict(
                &table_name,
                new_name,
                "target exists",
            ));
        }
        let target = stored
            .columns
            .iter_mut()
            .find(|c| c.name == column)
            .ok_or_else(|| AdapterError::column_not_found(&table_name, column))?;
        target.name = new_name.to_string();
        Ok(())
    }

    async fn change_column(
        &mut self,
        table: &str,
        column: &str,
        into: &Column,
    ) -> MigrateResult<Table> {
        let table_name = table.to_string();
        let stored = self.table_mut(table)?;
        let target = stored
            .columns
            .iter_mut()
            .find(|c| c.name == column)
            .ok_or_else(|| AdapterError::column_not_found(&table_name, column))?;
        *target = into.clone();
        Ok(stored.clone())
    }

    async fn drop_column(&mut self, table: &str, column: &str) -> MigrateResult<()> {
        let table_name = table.to_string();
        let stored = self.table_mut(table)?;
        let before = stored.columns.len();
        stored.columns.retain(|c| c.name != column);
        if stored.columns.len() == before {
            return Err(AdapterError::column_not_found(&table_name, column));
        }
        Ok(())
    }

    async fn get_indexes(&mut self, table: &str) -> MigrateResult<Vec<Index>> {
        self.state
            .tables
            .get(table)
            .map(|t| t.indexes.clone())
            .ok_or_else(|| AdapterError::table_not_found(table))
    }

    async fn add_index(&mut self, table: &str, index: &Index) -> MigrateResult<()> {
        let stored = self.table_mut(table)?;
        if stored.indexes.iter().any(|i| i.columns == index.columns) {
            return Err(AdapterError::SchemaConflict {
                kind: "index",
                name: index.columns.join(", "),
                message: "index over these columns already exists".to_string(),
            });
        }
        stored.indexes.push(index.clone());
        Ok(())
    }

    async fn drop_index(
        &mut self,
        table: &str,
        columns: &[&str],
        lookup: &IndexLookup,
    ) -> MigrateResult<()> {
        let stored = self.table_mut(table)?;
        let before = stored.indexes.len();
        stored.indexes.retain(|idx| match &lookup.name {
            Some(name) => idx.name.as_deref() != Some(name.as_str()),
            None => idx.columns != columns,
        });
        if stored.indexes.len() == before {
            return Err(AdapterError::SchemaNotFound {
                kind: "index",
                name: columns.join(", "),
            });
        }
        Ok(())
    }

    async fn get_foreign_keys(&mut self, table: &str) -> MigrateResult<Vec<ForeignKey>> {
        self.state
            .tables
            .get(table)
            .map(|t| t.foreign_keys.clone())
            .ok_or_else(|| AdapterError::table_not_found(table))
    }

    async fn add_foreign_key(
        &mut self,
        table: &str,
        foreign_key: &ForeignKey,
    ) -> MigrateResult<()> {
        if !self.state.tables.contains_key(&foreign_key.referenced_table) {
            return Err(AdapterError::table_not_found(&foreign_key.referenced_table));
        }
        let stored = self.table_mut(table)?;
        stored.foreign_keys.push(foreign_key.clone());
        Ok(())
    }

    async fn drop_foreign_key(
        &mut self,
        table: &str,
        columns: &[&str],
        name: Option<&str>,
    ) -> MigrateResult<()> {
        let stored = self.table_mut(table)?;
        let before = stored.foreign_keys.len();
        stored.foreign_keys.retain(|fk| {
            !(fk.columns == columns && name.map_or(true, |n| fk.name.as_deref() == Some(n)))
        });
        if stored.foreign_keys.len() == before {
            return Err(AdapterError::SchemaNotFound {
                kind: "foreign key",
                name: columns.join(", "),
            });
        }
        Ok(())
    }

    fn sql_type(&self, column: &Column) -> MigrateResult<String> {
        Ok(column.column_type.to_string().to_uppercase())
    }

    async fn create_database(
        &mut self,
        name: &str,
        _options: &DatabaseOptions,
    ) -> MigrateResult<()> {
        self.databases.insert(name.to_string());
        Ok(())
    }

    async fn has_database(&mut self, name: &str) -> MigrateResult<bool> {
        Ok(self.databases.contains(name))
    }

    async fn drop_database(&mut self, name: &str) -> MigrateResult<()> {
        self.databases.remove(name);
        Ok(())
    }

    // Version store overrides: same protocol, no SQL underneath.

    async fn has_schema_table(&mut self) -> MigrateResult<bool> {
        Ok(self.state.schema_table_created)
    }

    async fn create_schema_table(&mut self) -> MigrateResult<()> {
        self.state.schema_table_created = true;
        Ok(())
    }

    async fn versions(&mut self) -> MigrateResult<Vec<i64>> {
        self.create_schema_table().await?;
        let mut versions: Vec<i64> = self.state.records.iter().map(|r| r.version).collect();
        versions.sort_unstable();
        Ok(versions)
    }

    async fn migration_records(&mut self) -> MigrateResult<Vec<MigrationRecord>> {
        self.create_schema_table().await?;
        let mut records = self.state.records.clone();
        records.sort_by_key(|r| r.version);
        Ok(records)
    }

    async fn record_migration(
        &mut self,
        version: i64,
        name: &str,
        direction: MigrationDirection,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> MigrateResult<()> {
        self.create_schema_table().await?;
        match direction {
            MigrationDirection::Up => {
                if self.state.records.iter().any(|r| r.version == version) {
                    return Err(AdapterError::statement(
                        format!("INSERT INTO schema_versions ({})", version),
                        "duplicate version",
                    ));
                }
                self.state.records.push(MigrationRecord {
                    version,
                    name: name.to_string(),
                    started_at,
                    finished_at,
                    breakpoint: false,
                });
            }
            MigrationDirection::Down => {
                self.state.records.retain(|r| r.version != version);
            }
        }
        Ok(())
    }
}

/// Simple migration creating and dropping one table
pub struct CreateTableMigration {
    pub version: i64,
    pub table: String,
}

#[async_trait]
impl strata_migrate::Migration for CreateTableMigration {
    fn version(&self) -> i64 {
        self.version
    }

    fn name(&self) -> &str {
        "create table"
    }

    async fn up(&self, adapter: &mut dyn SchemaAdapter) -> MigrateResult<()> {
        let table = Table::new(&self.table)
            .with_column(Column::new("name", ColumnType::String).with_length(255).not_null());
        adapter.create_table(&table).await
    }

    async fn down(&self, adapter: &mut dyn SchemaAdapter) -> MigrateResult<()> {
        adapter.drop_table(&self.table).await
    }
}

/// Migration that mutates schema and then fails partway through
pub struct FailingMigration {
    pub version: i64,
}

#[async_trait]
impl strata_migrate::Migration for FailingMigration {
    fn version(&self) -> i64 {
        self.version
    }

    fn name(&self) -> &str {
        "failing migration"
    }

    async fn up(&self, adapter: &mut dyn SchemaAdapter) -> MigrateResult<()> {
        let table = Table::new("half_done");
        adapter.create_table(&table).await?;
        adapter.drop_table("does_not_exist").await
    }

    async fn down(&self, _adapter: &mut dyn SchemaAdapter) -> MigrateResult<()> {
        Ok(())
    }
}

// Not every test binary uses every helper.
#[allow(dead_code)]
pub fn widget_table() -> Table {
    Table::new("widgets")
        .with_column(Column::new("sku", ColumnType::String).with_length(64).not_null())
        .with_column(Column::new("price", ColumnType::Decimal).with_precision(10, 2))
}
