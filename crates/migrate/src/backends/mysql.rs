//! MySQL adapter
//!
//! Second engine of the contract. MySQL commits DDL implicitly, so this
//! adapter reports `supports_transactions()` as false and the runner applies
//! migrations without a transactional safety net; partial failures surface
//! as `PartiallyApplied`. BEGIN/COMMIT/ROLLBACK still work for plain DML.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlConnection;
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

/// Schema-migration adapter for MySQL
pub struct MySqlAdapter {
    config: AdapterConfig,
    conn: Option<MySqlConnection>,
    in_transaction: bool,
}

impl MySqlAdapter {
    /// Validate the configuration without connecting
    pub fn new(config: AdapterConfig) -> MigrateResult<Self> {
        if !config.database_url.starts_with("mysql://") {
            return Err(AdapterError::Connection(
                "Invalid MySQL URL scheme".to_string(),
            ));
        }
        super::core::parse_connection_url(&config.database_url, 3306)?;
        Ok(Self {
            config,
            conn: None,
            in_transaction: false,
        })
    }

    fn conn(&mut self) -> MigrateResult<&mut MySqlConnection> {
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

    /// Full column clause used by ADD/MODIFY/CHANGE COLUMN
    fn render_column(&self, column: &Column) -> MigrateResult<String> {
        let native = self.sql_type(column)?;
        Ok(sql::column_clause(SqlDialect::MySql, column, &native))
    }
}

/// Split a possibly schema-qualified table name
fn split_qualified(table: &str) -> (Option<&str>, &str) {
    match table.split_once('.') {
        Some((schema, name)) => (Some(schema), name),
        None => (None, table),
    }
}

/// Map information_schema data_type/column_type to the logical set
fn logical_type(data_type: &str, column_type: &str) -> ColumnType {
    match data_type {
        "varchar" | "char" => ColumnType::String,
        "text" | "tinytext" | "mediumtext" | "longtext" => ColumnType::Text,
        "tinyint" => {
            if column_type == "tinyint(1)" {
                ColumnType::Boolean
            } else {
                ColumnType::Integer
            }
        }
        "smallint" | "mediumint" | "int" => ColumnType::Integer,
        "bigint" => ColumnType::BigInteger,
        "float" | "double" => ColumnType::Float,
        "decimal" => ColumnType::Decimal,
        "datetime" => ColumnType::DateTime,
        "timestamp" => ColumnType::Timestamp,
        "time" => ColumnType::Time,
        "date" => ColumnType::Date,
        "blob" | "tinyblob" | "mediumblob" | "longblob" | "binary" | "varbinary" => {
            ColumnType::Binary
        }
        "json" => ColumnType::Json,
        other => {
            debug!(data_type = other, "unmapped native type, reporting as text");
            ColumnType::Text
        }
    }
}

/// Convert one sqlx row into the adapter's engine-independent `Row`
fn convert_row(row: &sqlx::mysql::MySqlRow) -> MigrateResult<Row> {
    let mut out = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        let name = column.name();
        let type_name = column.type_info().name();
        let value = match type_name {
            "BOOLEAN" => row
                .try_get::<Option<bool>, _>(index)
                .map(|v| v.map(SqlValue::Bool)),
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" => row
                .try_get::<Option<i32>, _>(index)
                .map(|v| v.map(SqlValue::Int32)),
            "BIGINT" => row
                .try_get::<Option<i64>, _>(index)
                .map(|v| v.map(SqlValue::Int64)),
            "FLOAT" => row
                .try_get::<Option<f32>, _>(index)
                .map(|v| v.map(SqlValue::Float32)),
            "DOUBLE" => row
                .try_get::<Option<f64>, _>(index)
                .map(|v| v.map(SqlValue::Float64)),
            "BLOB" | "BINARY" | "VARBINARY" => row
                .try_get::<Option<Vec<u8>>, _>(index)
                .map(|v| v.map(SqlValue::Bytes)),
            "TIMESTAMP" => row
                .try_get::<Option<DateTime<Utc>>, _>(index)
                .map(|v| v.map(SqlValue::DateTime)),
            "DATETIME" => row
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
            "JSON" => row
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
impl SchemaAdapter for MySqlAdapter {
    fn adapter_type(&self) -> AdapterType {
        AdapterType::MySql
    }

    fn dialect(&self) -> SqlDialect {
        SqlDialect::MySql
    }

    fn schema_table_name(&self) -> &str {
        &self.config.schema_table
    }

    async fn connect(&mut self) -> MigrateResult<()> {
        if self.conn.is_some() {
            return Ok(());
        }
        let conn = MySqlConnection::connect(&self.config.database_url)
            .await
            .map_err(|e| AdapterError::Connection(format!("Failed to connect: {}", e)))?;
        self.conn = Some(conn);
        debug!("connected to MySQL");
        Ok(())
    }

    async fn disconnect(&mut self) -> MigrateResult<()> {
        if let Some(conn) = self.conn.take() {
            self.in_transaction = false;
            conn.close()
                .await
                .map_err(|e| AdapterError::Connection(format!("Failed to disconnect: {}", e)))?;
            debug!("disconnected from MySQL");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// MySQL commits DDL implicitly: schema changes cannot be rolled back
    fn supports_transactions(&self) -> bool {
        false
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
             WHERE table_name = ? AND table_schema = COALESCE(?, DATABASE())",
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
                "{} BIGINT AUTO_INCREMENT PRIMARY KEY",
                self.quote_column_name(pk)
            ));
        }
        for column in &table.columns {
            clauses.push(self.render_column(column)?);
        }

        let stmt = sql::create_table_stmt(SqlDialect::MySql, table, clauses);
        self.execute(&stmt).await?;

        for index in &table.indexes {
            let stmt = sql::create_index_stmt(SqlDialect::MySql, &table.name, index);
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
            "RENAME TABLE {} TO {}",
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
            "SELECT column_name, data_type, column_type, is_nullable, column_default, \
                    character_maximum_length, numeric_precision, numeric_scale, extra \
             FROM information_schema.columns \
             WHERE table_name = ? AND table_schema = COALESCE(?, DATABASE()) \
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
            let column_type: String = row.try_get("column_type").unwrap_or_default();
            let is_nullable: String = row
                .try_get("is_nullable")
                .map_err(|e| AdapterError::statement("get_columns", e))?;
            let default: Option<String> = row.try_get("column_default").unwrap_or(None);
            let length: Option<i64> = row.try_get("character_maximum_length").unwrap_or(None);
            let precision: Option<i64> = row.try_get("numeric_precision").unwrap_or(None);
            let scale: Option<i64> = row.try_get("numeric_scale").unwrap_or(None);
            let extra: String = row.try_get("extra").unwrap_or_default();

            let identity = extra.contains("auto_increment");

            let mut column = Column::new(name, logical_type(&data_type, &column_type));
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
        let stmt = format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.quote_table_name(table),
            self.render_column(column)?
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

        // CHANGE renames and redefines in one statement; MODIFY keeps the name
        let stmt = if into.name != column {
            format!(
                "ALTER TABLE {} CHANGE COLUMN {} {}",
                self.quote_table_name(table),
                self.quote_column_name(column),
                self.render_column(into)?
            )
        } else {
            format!(
                "ALTER TABLE {} MODIFY COLUMN {}",
                self.quote_table_name(table),
                self.render_column(into)?
            )
        };
        self.execute(&stmt).await?;

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
            "SELECT index_name, non_unique, column_name \
             FROM information_schema.statistics \
             WHERE table_name = ? AND table_schema = COALESCE(?, DATABASE()) \
             ORDER BY index_name, seq_in_index",
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
            let non_unique: i32 = row.try_get("non_unique").unwrap_or(1);
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
                    unique: non_unique == 0,
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
        let stmt = sql::create_index_stmt(SqlDialect::MySql, table, index);
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
        let stmt = format!(
            "DROP INDEX {} ON {}",
            self.quote_column_name(&index_name),
            self.quote_table_name(table)
        );
        self.execute(&stmt).await?;
        Ok(())
    }

    async fn get_foreign_keys(&mut self, table: &str) -> MigrateResult<Vec<ForeignKey>> {
        self.ensure_table_exists(table).await?;
        let (schema, name) = split_qualified(table);
        let conn = self.conn()?;
        let rows = sqlx::query(
            "SELECT kcu.constraint_name, kcu.column_name, kcu.referenced_table_name, \
                    kcu.referenced_column_name, rc.delete_rule, rc.update_rule \
             FROM information_schema.key_column_usage kcu \
             JOIN information_schema.referential_constraints rc \
               ON rc.constraint_name = kcu.constraint_name \
              AND rc.constraint_schema = kcu.table_schema \
             WHERE kcu.table_name = ? AND kcu.table_schema = COALESCE(?, DATABASE()) \
               AND kcu.referenced_table_name IS NOT NULL \
             ORDER BY kcu.constraint_name, kcu.ordinal_position",
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
                .try_get("referenced_table_name")
                .map_err(|e| AdapterError::statement("get_foreign_keys", e))?;
            let referenced_column: String = row
                .try_get("referenced_column_name")
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
            sql::foreign_key_clause(SqlDialect::MySql, table, foreign_key)
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
            "ALTER TABLE {} DROP FOREIGN KEY {}",
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
            ColumnType::Integer => "INT".to_string(),
            ColumnType::BigInteger => "BIGINT".to_string(),
            ColumnType::Float => "DOUBLE".to_string(),
            ColumnType::Decimal => match (column.precision, column.scale) {
                (Some(precision), Some(scale)) => format!("DECIMAL({}, {})", precision, scale),
                (Some(precision), None) => format!("DECIMAL({})", precision),
                _ => "DECIMAL(10, 0)".to_string(),
            },
            ColumnType::DateTime => "DATETIME".to_string(),
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Time => "TIME".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Binary => match column.length {
                Some(length) => format!("VARBINARY({})", length),
                None => "BLOB".to_string(),
            },
            ColumnType::Boolean => "TINYINT(1)".to_string(),
            ColumnType::Uuid => "CHAR(36)".to_string(),
            ColumnType::Json => "JSON".to_string(),
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
            stmt.push_str(&format!(" CHARACTER SET {}", charset));
        }
        if let Some(collation) = &options.collation {
            stmt.push_str(&format!(" COLLATE {}", collation));
        }
        self.execute(&stmt).await?;
        Ok(())
    }

    async fn has_database(&mut self, name: &str) -> MigrateResult<bool> {
        let conn = self.conn()?;
        let row =
            sqlx::query("SELECT 1 FROM information_schema.schemata WHERE schema_name = ?")
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
