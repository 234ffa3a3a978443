//! PostgreSQL adapter
//!
//! Reference engine: full transactional DDL over a single sqlx connection.
//! Introspection goes through information_schema and pg_catalog; identifier
//! quoting and DDL assembly come from the shared `sql` module.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgConnection;
use sqlx::{Column as _, Connection, Row as _, TypeInfo as _};
use tracing::{debug, warn};

use super::core::{
    AdapterConfig, ColumnLookup, DatabaseOptions, IndexLookup, SchemaAdapter,
};
use super::sql::{self, SqlDialect};
use super::AdapterType;
use crate::error::{AdapterError, MigrateResult};
use crate::schema::{
    Column, ColumnType, ForeignKey, Index, PrimaryKey, ReferentialAction, Table, TableOptions,
};
use crate::value::{Row, SqlValue};

/// Schema-migration adapter for PostgreSQL
pub struct PostgresAdapter {
    config: AdapterConfig,
    conn: Option<PgConnection>,
    in_transaction: bool,
}

impl PostgresAdapter {
    /// Validate the configuration without connecting
    pub fn new(config: AdapterConfig) -> MigrateResult<Self> {
        if !config.database_url.starts_with("postgres://")
            && !config.database_url.starts_with("postgresql://")
        {
            return Err(AdapterError::Connection(
                "Invalid PostgreSQL URL scheme".to_string(),
            ));
        }
        super::core::parse_connection_url(&config.database_url, 5432)?;
        Ok(Self {
            config,
            conn: None,
            in_transaction: false,
        })
    }

    fn conn(&mut self) -> MigrateResult<&mut PgConnection> {
        self.conn.as_mut().ok_or_else(|| {
            AdapterError::Connection("adapter is not connected; call connect() first".to_string())
        })
    }

    async fn ensure_table_exists(&mut self, table: &str) -> MigrateResult<()> {
        if !self.has_table(table).await? {
            return Err(AdapterError::table_not_found(table));
        }
        Ok(())
    }

    async fn ensure_column_exists(&mut self, table: &str, column: &str) -> MigrateResult<()> {
        if !self
            .has_column(table, column, &ColumnLookup::default())
            .await?
        {
            return Err(AdapterError::column_not_found(table, column));
        }
        Ok(())
    }
}

/// Split a possibly schema-qualified table name
fn split_qualified(table: &str) -> (Option<&str>, &str) {
    match table.split_once('.') {
        Some((schema, name)) => (Some(schema), name),
        None => (None, table),
    }
}

/// Map an information_schema data_type to the logical type set
fn logical_type(data_type: &str) -> ColumnType {
    match data_type {
        "character varying" | "character" => ColumnType::String,
        "text" => ColumnType::Text,
        "smallint" | "integer" => ColumnType::Integer,
        "bigint" => ColumnType::BigInteger,
        "real" | "double precision" => ColumnType::Float,
        "numeric" => ColumnType::Decimal,
        "timestamp without time zone" | "timestamp with time zone" => ColumnType::Timestamp,
        "time without time zone" | "time with time zone" => ColumnType::Time,
        "date" => ColumnType::Date,
        "bytea" => ColumnType::Binary,
        "boolean" => ColumnType::Boolean,
        "uuid" => ColumnType::Uuid,
        "json" | "jsonb" => ColumnType::Json,
        other => {
            debug!(data_type = other, "unmapped native type, reporting as text");
            ColumnType::Text
        }
    }
}

/// Convert one sqlx row into the adapter's engine-independent `Row`
fn convert_row(row: &sqlx::postgres::PgRow) -> MigrateResult<Row> {
    let mut out = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        let name = column.name();
        let type_name = column.type_info().name();
        let value = match type_name {
            "BOOL" => row
                .try_get::<Option<bool>, _>(index)
                .map(|v| v.map(SqlValue::Bool)),
            "INT2" => row
                .try_get::<Option<i16>, _>(index)
                .map(|v| v.map(|i| SqlValue::Int32(i as i32))),
            "INT4" => row
                .try_get::<Option<i32>, _>(index)
                .map(|v| v.map(SqlValue::Int32)),
            "INT8" => row
                .try_get::<Option<i64>, _>(index)
                .map(|v| v.map(SqlValue::Int64)),
            "FLOAT4" => row
                .try_get::<Option<f32>, _>(index)
                .map(|v| v.map(SqlValue::Float32)),
            "FLOAT8" => row
                .try_get::<Option<f64>, _>(index)
                .map(|v| v.map(SqlValue::Float64)),
            "BYTEA" => row
                .try_get::<Option<Vec<u8>>, _>(index)
                .map(|v| v.map(SqlValue::Bytes)),
            "UUID" => row
                .try_get::<Option<uuid::Uuid>, _>(index)
                .map(|v| v.map(SqlValue::Uuid)),
            "TIMESTAMPTZ" => row
                .try_get::<Option<DateTime<Utc>>, _>(index)
                .map(|v| v.map(SqlValue::DateTime)),
            "TIMESTAMP" => row
                .try_get::<Option<chrono::NaiveDateTime>, _>(index)
                .map(|v| {
                    v.map(|naive| SqlValue::DateTime(DateTime::from_naive_utc_and_offset(naive, Utc)))
                }),
            "DATE" => row
                .try_get::<Option<chrono::NaiveDate>, _>(index)
                .map(|v| v.map(SqlValue::Date)),
            "TIME" => row
                .try_get::<Option<chrono::NaiveTime>, _>(index)
                .map(|v| v.map(SqlValue::Time)),
            "JSON" | "JSONB" => row
                .try_get::<Option<serde_json::Value>, _>(index)
                .map(|v| v.map(SqlValue::Json)),
            _ => row
                .try_get::<Option<String>, _>(index)
                .map(|v| v.map(SqlValue::String)),
        }
        .map_err(|e| {
            AdapterError::statement(
                format!("decode column '{}'", name),
                format!("{} (native type {})", e, type_name),
            )
        })?;

        out.push(name, value.unwrap_or(SqlValue::Null));
    }
    Ok(out)
}

#[async_trait]
impl SchemaAdapter for PostgresAdapter {
    fn adapter_type(&self) -> AdapterType {
        AdapterType::Postgres
    }

    fn dialect(&self) -> SqlDialect {
        SqlDialect::Postgres
    }

    fn schema_table_name(&self) -> &str {
        &self.config.schema_table
    }

    async fn connect(&mut self) -> MigrateResult<()> {
        if self.conn.is_some() {
            return Ok(());
        }
        let conn = PgConnection::connect(&self.config.database_url)
            .await
            .map_err(|e| AdapterError::Connection(format!("Failed to connect: {}", e)))?;
        self.conn = Some(conn);
        debug!("connected to PostgreSQL");
        Ok(())
    }

    async fn disconnect(&mut self) -> MigrateResult<()> {
        if let Some(conn) = self.conn.take() {
            self.in_transaction = false;
            conn.close()
                .await
                .map_err(|e| AdapterError::Connection(format!("Failed to disconnect: {}", e)))?;
            debug!("disconnected from PostgreSQL");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn supports_transactions(&self) -> bool {
        true
    }

    async fn begin_transaction(&mut self) -> MigrateResult<()> {
        if self.in_transaction {
            return Err(AdapterError::TransactionState(
                "transaction already open; nested transactions are not supported".to_string(),
            ));
        }
        self.execute("BEGIN").await?;
        self.in_transaction = true;
        Ok(())
    }

    async fn commit_transaction(&mut self) -> MigrateResult<()> {
        if !self.in_transaction {
            return Err(AdapterError::TransactionState(
                "commit without an open transaction".to_string(),
            ));
        }
        self.execute("COMMIT").await?;
        self.in_transaction = false;
        Ok(())
    }

    async fn rollback_transaction(&mut self) -> MigrateResult<()> {
        if !self.in_transaction {
            return Err(AdapterError::TransactionState(
                "rollback without an open transaction".to_string(),
            ));
        }
        self.execute("ROLLBACK").await?;
        self.in_transaction = false;
        Ok(())
    }

    async fn execute(&mut self, statement: &str) -> MigrateResult<u64> {
        debug!(statement, "executing");
        let conn = self.conn()?;
        let result = sqlx::query(statement)
            .execute(&mut *conn)
            .await
            .map_err(|e| AdapterError::statement(statement, e))?;
        Ok(result.rows_affected())
    }

    async fn query(&mut self, statement: &str) -> MigrateResult<Vec<Row>> {
        debug!(statement, "querying");
        let conn = self.conn()?;
        let rows = sqlx::query(statement)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AdapterError::statement(statement, e))?;
        rows.iter().map(convert_row).collect()
    }

    async fn has_table(&mut self, table: &str) -> MigrateResult<bool> {
        let (schema, name) = split_qualified(table);
        let conn = self.conn()?;
        let row = sqlx::query(
            "SELECT 1 FROM information_schema.tables \
             WHERE table_name = $1 AND table_schema = COALESCE($2, current_schema())",
        )
        .bind(name)
        .bind(schema)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AdapterError::statement("has_table", e))?;
        Ok(row.is_some())
    }

    async fn create_table(&mut self, table: &Table) -> MigrateResult<()> {
        if self.has_table(&table.name).await? {
            return Err(AdapterError::table_conflict(
                &table.name,
                "table already exists",
            ));
        }

        let mut clauses = Vec::new();
        if let PrimaryKey::AutoIncrement(pk) = &table.options.primary_key {
            clauses.push(format!(
                "{} BIGSERIAL PRIMARY KEY",
                self.quote_column_name(pk)
            ));
        }
        for column in &table.columns {
            let native = self.sql_type(column)?;
            clauses.push(sql::column_clause(SqlDialect::Postgres, column, &native));
        }

        let stmt = sql::create_table_stmt(SqlDialect::Postgres, table, clauses);
        self.execute(&stmt).await?;

        for index in &table.indexes {
            let stmt = sql::create_index_stmt(SqlDialect::Postgres, &table.name, index);
            self.execute(&stmt).await?;
        }
        Ok(())
    }

    async fn rename_table(&mut self, table: &str, new_name: &str) -> MigrateResult<()> {
        self.ensure_table_exists(table).await?;
        if self.has_table(new_name).await? {
            return Err(AdapterError::table_conflict(
                new_name,
                "rename target already exists",
            ));
        }
        let stmt = format!(
            "ALTER TABLE {} RENAME TO {}",
            self.quote_table_name(table),
            self.quote_column_name(new_name)
        );
        self.execute(&stmt).await?;
        Ok(())
    }

    async fn drop_table(&mut self, table: &str) -> MigrateResult<()> {
        self.ensure_table_exists(table).await?;
        let stmt = format!("DROP TABLE {}", self.quote_table_name(table));
        self.execute(&stmt).await?;
        Ok(())
    }

    async fn truncate_table(&mut self, table: &str) -> MigrateResult<()> {
        self.ensure_table_exists(table).await?;
        let stmt = format!("TRUNCATE TABLE {}", self.quote_table_name(table));
        self.execute(&stmt).await?;
        Ok(())
    }

    async fn get_columns(&mut self, table: &str) -> MigrateResult<Vec<Column>> {
        self.ensure_table_exists(table).await?;
        let (schema, name) = split_qualified(table);
        let conn = self.conn()?;
        let rows = sqlx::query(
            "SELECT column_name, data_type, is_nullable, column_default, \
                    character_maximum_length, numeric_precision, numeric_scale, is_identity \
             FROM information_schema.columns \
             WHERE table_name = $1 AND table_schema = COALESCE($2, current_schema()) \
             ORDER BY ordinal_position",
        )
        .bind(name)
        .bind(schema)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AdapterError::statement("get_columns", e))?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row
                .try_get("column_name")
                .map_err(|e| AdapterError::statement("get_columns", e))?;
            let data_type: String = row
                .try_get("data_type")
                .map_err(|e| AdapterError::statement("get_columns", e))?;
            let is_nullable: String = row
                .try_get("is_nullable")
                .map_err(|e| AdapterError::statement("get_columns", e))?;
            let default: Option<String> = row
                .try_get("column_default")
                .map_err(|e| AdapterError::statement("get_columns", e))?;
            let length: Option<i32> = row.try_get("character_maximum_length").unwrap_or(None);
            let precision: Option<i32> = row.try_get("numeric_precision").unwrap_or(None);
            let scale: Option<i32> = row.try_get("numeric_scale").unwrap_or(None);
            let is_identity: String = row.try_get("is_identity").unwrap_or_default();

            let identity = is_identity == "YES"
                || default
                    .as_deref()
                    .map_or(false, |d| d.starts_with("nextval("));

            let mut column = Column::new(name, logical_type(&data_type));
            column.nullable = is_nullable == "YES";
            column.length = length.map(|l| l as u32);
            column.precision = precision.map(|p| p as u32);
            column.scale = scale.map(|s| s as u32);
            column.identity = identity;
            if !identity {
                column.default = default.map(SqlValue::Expression);
            }
            columns.push(column);
        }
        Ok(columns)
    }

    async fn add_column(&mut self, table: &str, column: &Column) -> MigrateResult<()> {
        self.ensure_table_exists(table).await?;
        if self
            .has_column(table, &column.name, &ColumnLookup::default())
            .await?
        {
            return Err(AdapterError::column_conflict(
                table,
                &column.name,
                "column already exists",
            ));
        }
        let native = self.sql_type(column)?;
        let stmt = format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.quote_table_name(table),
            sql::column_clause(SqlDialect::Postgres, column, &native)
        );
        self.execute(&stmt).await?;
        Ok(())
    }

    async fn rename_column(
        &mut self,
        table: &str,
        column: &str,
        new_name: &str,
    ) -> MigrateResult<()> {
        self.ensure_column_exists(table, column).await?;
        if self
            .has_column(table, new_name, &ColumnLookup::default())
            .await?
        {
            return Err(AdapterError::column_conflict(
                table,
                new_name,
                "rename target already exists",
            ));
        }
        let stmt = format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {}",
            self.quote_table_name(table),
            self.quote_column_name(column),
            self.quote_column_name(new_name)
        );
        self.execute(&stmt).await?;
        Ok(())
    }

    async fn change_column(
        &mut self,
        table: &str,
        column: &str,
        into: &Column,
    ) -> MigrateResult<Table> {
        self.ensure_column_exists(table, column).await?;

        let existing = self
            .get_columns(table)
            .await?
            .into_iter()
            .find(|c| c.name == column)
            .ok_or_else(|| AdapterError::column_not_found(table, column))?;

        let narrowing = existing.column_type != into.column_type
            || matches!(
                (existing.length, into.length),
                (Some(old), Some(new)) if new < old
            );
        if narrowing {
            warn!(
                table,
                column,
                from = %existing.column_type,
                to = %into.column_type,
                "column change may narrow existing data; engine behavior applies"
            );
        }

        let quoted_table = self.quote_table_name(table);
        let quoted_column = self.quote_column_name(column);
        let native = self.sql_type(into)?;

        let stmt = format!(
            "ALTER TABLE {} ALTER COLUMN {} TYPE {}",
            quoted_table, quoted_column, native
        );
        self.execute(&stmt).await?;

        let null_clause = if into.nullable {
            "DROP NOT NULL"
        } else {
            "SET NOT NULL"
        };
        let stmt = format!(
            "ALTER TABLE {} ALTER COLUMN {} {}",
            quoted_table, quoted_column, null_clause
        );
        self.execute(&stmt).await?;

        match &into.default {
            Some(default) => {
                let stmt = format!(
                    "ALTER TABLE {} ALTER COLUMN {} SET DEFAULT {}",
                    quoted_table,
                    quoted_column,
                    sql::render_literal(SqlDialect::Postgres, default)
                );
                self.execute(&stmt).await?;
            }
            None => {
                let stmt = format!(
                    "ALTER TABLE {} ALTER COLUMN {} DROP DEFAULT",
                    quoted_table, quoted_column
                );
                self.execute(&stmt).await?;
            }
        }

        if into.name != column {
            self.rename_column(table, column, &into.name).await?;
        }

        Ok(Table {
            name: table.to_string(),
            columns: self.get_columns(table).await?,
            indexes: self.get_indexes(table).await?,
            foreign_keys: self.get_foreign_keys(table).await?,
            options: TableOptions::default(),
        })
    }

    async fn drop_column(&mut self, table: &str, column: &str) -> MigrateResult<()> {
        self.ensure_column_exists(table, column).await?;
        let stmt = format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.quote_table_name(table),
            self.quote_column_name(column)
        );
        self.execute(&stmt).await?;
        Ok(())
    }

    async fn get_indexes(&mut self, table: &str) -> MigrateResult<Vec<Index>> {
        self.ensure_table_exists(table).await?;
        let (schema, name) = split_qualified(table);
        let conn = self.conn()?;
        let rows = sqlx::query(
            "SELECT i.relname AS index_name, ix.indisunique AS is_unique, a.attname AS column_name \
             FROM pg_class t \
             JOIN pg_namespace n ON n.oid = t.relnamespace \
             JOIN pg_index ix ON ix.indrelid = t.oid \
             JOIN pg_class i ON i.oid = ix.indexrelid \
             JOIN LATERAL unnest(ix.indkey) WITH ORDINALITY AS k(attnum, ord) ON TRUE \
             JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = k.attnum \
             WHERE t.relname = $1 AND n.nspname = COALESCE($2, current_schema()) \
             ORDER BY i.relname, k.ord",
        )
        .bind(name)
        .bind(schema)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AdapterError::statement("get_indexes", e))?;

        let mut indexes: Vec<Index> = Vec::new();
        for row in rows {
            let index_name: String = row
                .try_get("index_name")
                .map_err(|e| AdapterError::statement("get_indexes", e))?;
            let is_unique: bool = row
                .try_get("is_unique")
                .map_err(|e| AdapterError::statement("get_indexes", e))?;
            let column_name: String = row
                .try_get("column_name")
                .map_err(|e| AdapterError::statement("get_indexes", e))?;

            match indexes
                .iter_mut()
                .find(|idx| idx.name.as_deref() == Some(index_name.as_str()))
            {
                Some(index) => index.columns.push(column_name),
                None => indexes.push(Index {
                    columns: vec![column_name],
                    unique: is_unique,
                    name: Some(index_name),
                }),
            }
        }
        Ok(indexes)
    }

    async fn add_index(&mut self, table: &str, index: &Index) -> MigrateResult<()> {
        self.ensure_table_exists(table).await?;
        let columns: Vec<&str> = index.columns.iter().map(String::as_str).collect();
        if self.has_index(table, &columns).await? {
            return Err(AdapterError::SchemaConflict {
                kind: "index",
                name: format!("{}({})", table, index.columns.join(", ")),
                message: "index over these columns already exists".to_string(),
            });
        }
        let stmt = sql::create_index_stmt(SqlDialect::Postgres, table, index);
        self.execute(&stmt).await?;
        Ok(())
    }

    async fn drop_index(
        &mut self,
        table: &str,
        columns: &[&str],
        lookup: &IndexLookup,
    ) -> MigrateResult<()> {
        let indexes = self.get_indexes(table).await?;
        let target = indexes.iter().find(|idx| match &lookup.name {
            Some(name) => idx.name.as_deref() == Some(name.as_str()),
            None => idx.columns == columns,
        });
        let Some(target) = target else {
            return Err(AdapterError::SchemaNotFound {
                kind: "index",
                name: lookup
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("{}({})", table, columns.join(", "))),
            });
        };
        let index_name = target.name.clone().unwrap_or_default();
        let (schema, _) = split_qualified(table);
        let quoted = match schema {
            Some(schema) => format!(
                "{}.{}",
                self.quote_column_name(schema),
                self.quote_column_name(&index_name)
            ),
            None => self.quote_column_name(&index_name),
        };
        let stmt = format!("DROP INDEX {}", quoted);
        self.execute(&stmt).await?;
        Ok(())
    }

    async fn get_foreign_keys(&mut self, table: &str) -> MigrateResult<Vec<ForeignKey>> {
        self.ensure_table_exists(table).await?;
        let (schema, name) = split_qualified(table);
        let conn = self.conn()?;
        let rows = sqlx::query(
            "SELECT tc.constraint_name, kcu.column_name, ccu.table_name AS referenced_table, \
                    ccu.column_name AS referenced_column, rc.delete_rule, rc.update_rule \
             FROM information_schema.table_constraints tc \
             JOIN information_schema.key_column_usage kcu \
               ON kcu.constraint_name = tc.constraint_name AND kcu.table_schema = tc.table_schema \
             JOIN information_schema.constraint_column_usage ccu \
               ON ccu.constraint_name = tc.constraint_name AND ccu.table_schema = tc.table_schema \
             JOIN information_schema.referential_constraints rc \
               ON rc.constraint_name = tc.constraint_name AND rc.constraint_schema = tc.table_schema \
             WHERE tc.constraint_type = 'FOREIGN KEY' AND tc.table_name = $1 \
               AND tc.table_schema = COALESCE($2, current_schema()) \
             ORDER BY tc.constraint_name, kcu.ordinal_position",
        )
        .bind(name)
        .bind(schema)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AdapterError::statement("get_foreign_keys", e))?;

        let mut foreign_keys: Vec<ForeignKey> = Vec::new();
        for row in rows {
            let constraint_name: String = row
                .try_get("constraint_name")
                .map_err(|e| AdapterError::statement("get_foreign_keys", e))?;
            let column_name: String = row
                .try_get("column_name")
                .map_err(|e| AdapterError::statement("get_foreign_keys", e))?;
            let referenced_table: String = row
                .try_get("referenced_table")
                .map_err(|e| AdapterError::statement("get_foreign_keys", e))?;
            let referenced_column: String = row
                .try_get("referenced_column")
                .map_err(|e| AdapterError::statement("get_foreign_keys", e))?;
            let delete_rule: String = row.try_get("delete_rule").unwrap_or_default();
            let update_rule: String = row.try_get("update_rule").unwrap_or_default();

            match foreign_keys
                .iter_mut()
                .find(|fk| fk.name.as_deref() == Some(constraint_name.as_str()))
            {
                Some(fk) => {
                    fk.columns.push(column_name);
                    fk.referenced_columns.push(referenced_column);
                }
                None => foreign_keys.push(ForeignKey {
                    columns: vec![column_name],
                    referenced_table,
                    referenced_columns: vec![referenced_column],
                    name: Some(constraint_name),
                    on_delete: ReferentialAction::from_sql(&delete_rule),
                    on_update: ReferentialAction::from_sql(&update_rule),
                }),
            }
        }
        Ok(foreign_keys)
    }

    async fn add_foreign_key(
        &mut self,
        table: &str,
        foreign_key: &ForeignKey,
    ) -> MigrateResult<()> {
        self.ensure_table_exists(table).await?;
        self.ensure_table_exists(&foreign_key.referenced_table)
            .await?;
        let stmt = format!(
            "ALTER TABLE {} ADD {}",
            self.quote_table_name(table),
            sql::foreign_key_clause(SqlDialect::Postgres, table, foreign_key)
        );
        self.execute(&stmt).await?;
        Ok(())
    }

    async fn drop_foreign_key(
        &mut self,
        table: &str,
        columns: &[&str],
        name: Option<&str>,
    ) -> MigrateResult<()> {
        let foreign_keys = self.get_foreign_keys(table).await?;
        let target = foreign_keys.iter().find(|fk| {
            fk.columns == columns && name.map_or(true, |n| fk.name.as_deref() == Some(n))
        });
        let Some(target) = target else {
            return Err(AdapterError::SchemaNotFound {
                kind: "foreign key",
                name: format!("{}({})", table, columns.join(", ")),
            });
        };
        let constraint = target.name.clone().unwrap_or_default();
        let stmt = format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            self.quote_table_name(table),
            self.quote_column_name(&constraint)
        );
        self.execute(&stmt).await?;
        Ok(())
    }

    fn sql_type(&self, column: &Column) -> MigrateResult<String> {
        let native = match column.column_type {
            ColumnType::String => format!("VARCHAR({})", column.length.unwrap_or(255)),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::BigInteger => "BIGINT".to_string(),
            ColumnType::Float => "DOUBLE PRECISION".to_string(),
            ColumnType::Decimal => match (column.precision, column.scale) {
                (Some(precision), Some(scale)) => format!("NUMERIC({}, {})", precision, scale),
                (Some(precision), None) => format!("NUMERIC({})", precision),
                _ => "NUMERIC".to_string(),
            },
            ColumnType::DateTime | ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Time => "TIME".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Binary => "BYTEA".to_string(),
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Uuid => "UUID".to_string(),
            ColumnType::Json => "JSONB".to_string(),
        };
        Ok(native)
    }

    async fn create_database(
        &mut self,
        name: &str,
        options: &DatabaseOptions,
    ) -> MigrateResult<()> {
        let mut stmt = format!("CREATE DATABASE {}", self.quote_column_name(name));
        if let Some(charset) = &options.charset {
            stmt.push_str(&format!(" ENCODING {}", sql::quote_string_literal(charset)));
        }
        if let Some(collation) = &options.collation {
            stmt.push_str(&format!(
                " LC_COLLATE {}",
                sql::quote_string_literal(collation)
            ));
        }
        self.execute(&stmt).await?;
        Ok(())
    }

    async fn has_database(&mut self, name: &str) -> MigrateResult<bool> {
        let conn = self.conn()?;
        let row = sqlx::query("SELECT 1 FROM pg_database WHERE datname = $1")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AdapterError::statement("has_database", e))?;
        Ok(row.is_some())
    }

    async fn drop_database(&mut self, name: &str) -> MigrateResult<()> {
        let stmt = format!("DROP DATABASE {}", self.quote_column_name(name));
        self.execute(&stmt).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> PostgresAdapter {
        PostgresAdapter::new(AdapterConfig::new("postgres://user@localhost/app")).unwrap()
    }

    #[test]
    fn rejects_foreign_url_schemes() {
        let result = PostgresAdapter::new(AdapterConfig::new("mysql://localhost/app"));
        assert!(matches!(result, Err(AdapterError::Connection(_))));
    }

    #[test]
    fn every_logical_type_has_a_native_mapping() {
        let adapter = adapter();
        for ty in adapter.column_types() {
            let column = Column::new("c", *ty);
            assert!(adapter.sql_type(&column).is_ok(), "no mapping for {}", ty);
        }
    }

    #[test]
    fn string_and_decimal_modifiers_are_applied() {
        let adapter = adapter();
        let sku = Column::new("sku", ColumnType::String).with_length(64);
        assert_eq!(adapter.sql_type(&sku).unwrap(), "VARCHAR(64)");

        let price = Column::new("price", ColumnType::Decimal).with_precision(10, 2);
        assert_eq!(adapter.sql_type(&price).unwrap(), "NUMERIC(10, 2)");

        let unsized_string = Column::new("note", ColumnType::String);
        assert_eq!(adapter.sql_type(&unsized_string).unwrap(), "VARCHAR(255)");
    }

    #[test]
    fn quotes_identifiers_with_double_quotes() {
        let adapter = adapter();
        assert_eq!(adapter.quote_table_name("widgets"), "\"widgets\"");
        assert_eq!(
            adapter.quote_table_name("audit.events"),
            "\"audit\".\"events\""
        );
        assert_eq!(adapter.quote_column_name("or\"der"), "\"or\"\"der\"");
    }

    #[test]
    fn native_types_map_back_to_logical_types() {
        assert_eq!(logical_type("character varying"), ColumnType::String);
        assert_eq!(logical_type("numeric"), ColumnType::Decimal);
        assert_eq!(logical_type("timestamp without time zone"), ColumnType::Timestamp);
        assert_eq!(logical_type("jsonb"), ColumnType::Json);
    }

    #[tokio::test]
    async fn statements_require_a_connection() {
        let mut adapter = adapter();
        let result = adapter.execute("SELECT 1").await;
        assert!(matches!(result, Err(AdapterError::Connection(_))));
    }

    #[tokio::test]
    async fn rollback_without_begin_is_a_state_error() {
        let mut adapter = adapter();
        let result = adapter.rollback_transaction().await;
        assert!(matches!(result, Err(AdapterError::TransactionState(_))));
    }
}
