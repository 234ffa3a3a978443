//! Shared SQL fragment assembly
//!
//! Pure helpers composed into each engine adapter: identifier quoting,
//! literal rendering, and DDL clause assembly. Engines stay flat — no
//! inheritance between adapters, each one composes these functions with its
//! own type map and introspection queries.

use crate::schema::{Column, ColumnType, ForeignKey, Index, PrimaryKey, Table};
use crate::value::SqlValue;

/// SQL dialect for identifier quoting and engine keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    Postgres,
    MySql,
}

impl SqlDialect {
    /// Quote character for identifiers in this dialect
    pub fn identifier_quote(&self) -> char {
        match self {
            SqlDialect::Postgres => '"',
            SqlDialect::MySql => '`',
        }
    }

    /// Quote one identifier, doubling any embedded quote character
    pub fn quote_identifier(&self, name: &str) -> String {
        let q = self.identifier_quote();
        let doubled: String = name
            .chars()
            .flat_map(|c| {
                if c == q {
                    vec![q, q]
                } else {
                    vec![c]
                }
            })
            .collect();
        format!("{q}{doubled}{q}")
    }

    /// Quote a possibly schema-qualified table name, quoting each part
    pub fn quote_table(&self, name: &str) -> String {
        name.split('.')
            .map(|part| self.quote_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn current_timestamp(&self) -> &'static str {
        match self {
            SqlDialect::Postgres => "CURRENT_TIMESTAMP",
            SqlDialect::MySql => "CURRENT_TIMESTAMP",
        }
    }
}

/// Quote a string literal, doubling embedded single quotes
pub fn quote_string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Render a value as an inline SQL literal (used for column defaults and
/// version store rows; identifiers never pass through here)
pub fn render_literal(dialect: SqlDialect, value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        SqlValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        SqlValue::Int32(i) => i.to_string(),
        SqlValue::Int64(i) => i.to_string(),
        SqlValue::Float32(f) => f.to_string(),
        SqlValue::Float64(f) => f.to_string(),
        SqlValue::String(s) => quote_string_literal(s),
        SqlValue::Bytes(b) => {
            let hex: String = b.iter().map(|x| format!("{x:02x}")).collect();
            match dialect {
                SqlDialect::Postgres => format!("'\\x{hex}'"),
                SqlDialect::MySql => format!("X'{hex}'"),
            }
        }
        SqlValue::Uuid(u) => quote_string_literal(&u.to_string()),
        SqlValue::DateTime(dt) => {
            quote_string_literal(&dt.format("%Y-%m-%d %H:%M:%S").to_string())
        }
        SqlValue::Date(d) => quote_string_literal(&d.to_string()),
        SqlValue::Time(t) => quote_string_literal(&t.to_string()),
        SqlValue::Json(j) => quote_string_literal(&j.to_string()),
        SqlValue::Expression(e) => e.clone(),
    }
}

/// Default index name: `idx_<table>_<col1>_<col2>`
pub fn default_index_name(table: &str, columns: &[String]) -> String {
    format!("idx_{}_{}", table.replace('.', "_"), columns.join("_"))
}

/// Default foreign key constraint name: `fk_<table>_<col1>_<col2>`
pub fn default_foreign_key_name(table: &str, columns: &[String]) -> String {
    format!("fk_{}_{}", table.replace('.', "_"), columns.join("_"))
}

/// Render one column clause for CREATE TABLE / ADD COLUMN.
///
/// `native_type` is the engine-mapped SQL type for the column; identity
/// handling differs per dialect (SERIAL family vs AUTO_INCREMENT).
pub fn column_clause(dialect: SqlDialect, column: &Column, native_type: &str) -> String {
    let mut parts = vec![dialect.quote_identifier(&column.name)];

    if column.identity {
        match dialect {
            SqlDialect::Postgres => {
                let serial = if column.column_type == ColumnType::BigInteger {
                    "BIGSERIAL"
                } else {
                    "SERIAL"
                };
                parts.push(serial.to_string());
            }
            SqlDialect::MySql => {
                parts.push(native_type.to_string());
                parts.push("AUTO_INCREMENT".to_string());
            }
        }
    } else {
        parts.push(native_type.to_string());
    }

    if !column.nullable {
        parts.push("NOT NULL".to_string());
    }
    if let Some(default) = &column.default {
        parts.push(format!("DEFAULT {}", render_literal(dialect, default)));
    }

    parts.join(" ")
}

/// PRIMARY KEY table constraint clause
pub fn primary_key_clause(dialect: SqlDialect, columns: &[String]) -> String {
    let quoted: Vec<String> = columns
        .iter()
        .map(|c| dialect.quote_identifier(c))
        .collect();
    format!("PRIMARY KEY ({})", quoted.join(", "))
}

/// FOREIGN KEY table constraint clause, including referential actions
pub fn foreign_key_clause(dialect: SqlDialect, table: &str, fk: &ForeignKey) -> String {
    let name = fk
        .name
        .clone()
        .unwrap_or_else(|| default_foreign_key_name(table, &fk.columns));
    let local: Vec<String> = fk
        .columns
        .iter()
        .map(|c| dialect.quote_identifier(c))
        .collect();
    let referenced: Vec<String> = fk
        .referenced_columns
        .iter()
        .map(|c| dialect.quote_identifier(c))
        .collect();
    format!(
        "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {} ON UPDATE {}",
        dialect.quote_identifier(&name),
        local.join(", "),
        dialect.quote_table(&fk.referenced_table),
        referenced.join(", "),
        fk.on_delete.as_sql(),
        fk.on_update.as_sql(),
    )
}

/// Assemble a CREATE TABLE statement from pre-rendered column clauses.
///
/// The surrogate auto-increment key (when the table's primary-key strategy
/// asks for one) must already be present in `column_clauses`; this helper
/// only appends explicit PRIMARY KEY and FOREIGN KEY constraints.
pub fn create_table_stmt(
    dialect: SqlDialect,
    table: &Table,
    column_clauses: Vec<String>,
) -> String {
    let mut parts = column_clauses;

    if let PrimaryKey::Columns(columns) = &table.options.primary_key {
        parts.push(primary_key_clause(dialect, columns));
    }
    for fk in &table.foreign_keys {
        parts.push(foreign_key_clause(dialect, &table.name, fk));
    }

    format!(
        "CREATE TABLE {} (\n    {}\n)",
        dialect.quote_table(&table.name),
        parts.join(",\n    ")
    )
}

/// Assemble a CREATE [UNIQUE] INDEX statement
pub fn create_index_stmt(dialect: SqlDialect, table: &str, index: &Index) -> String {
    let name = index
        .name
        .clone()
        .unwrap_or_else(|| default_index_name(table, &index.columns));
    let columns: Vec<String> = index
        .columns
        .iter()
        .map(|c| dialect.quote_identifier(c))
        .collect();
    format!(
        "CREATE {}INDEX {} ON {} ({})",
        if index.unique { "UNIQUE " } else { "" },
        dialect.quote_identifier(&name),
        dialect.quote_table(table),
        columns.join(", ")
    )
}
