use crate::{GraphError, NodeId, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Primitive column types understood by the designer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Varchar,
    Int,
    Bigint,
    Boolean,
    Timestamp,
    Date,
    Decimal,
    Text,
    Json,
}

impl ColumnType {
    pub const ALL: [ColumnType; 9] = [
        ColumnType::Varchar,
        ColumnType::Int,
        ColumnType::Bigint,
        ColumnType::Boolean,
        ColumnType::Timestamp,
        ColumnType::Date,
        ColumnType::Decimal,
        ColumnType::Text,
        ColumnType::Json,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Varchar => "varchar",
            ColumnType::Int => "int",
            ColumnType::Bigint => "bigint",
            ColumnType::Boolean => "boolean",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Date => "date",
            ColumnType::Decimal => "decimal",
            ColumnType::Text => "text",
            ColumnType::Json => "json",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        ColumnType::ALL
            .into_iter()
            .find(|t| t.as_str() == lowered)
            .ok_or_else(|| format!("Unknown column type: {}", s))
    }
}

/// One column of a table node and its key role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,

    #[serde(rename = "type")]
    pub column_type: ColumnType,

    #[serde(default)]
    pub is_primary_key: bool,

    #[serde(default)]
    pub is_foreign_key: bool,

    /// `"table.column"` this column points at; set iff `is_foreign_key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
}

impl Column {
    /// Create a plain (non-key) column
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            is_primary_key: false,
            is_foreign_key: false,
            references: None,
        }
    }

    /// Create a primary key column
    pub fn primary_key(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            is_primary_key: true,
            ..Self::new(name, column_type)
        }
    }

    /// Create a foreign key column referencing `"table.column"`
    pub fn foreign_key(
        name: impl Into<String>,
        column_type: ColumnType,
        references: impl Into<String>,
    ) -> Self {
        let mut column = Self::new(name, column_type);
        column.mark_foreign_key(references);
        column
    }

    /// Flag this column as a foreign key pointing at `references`
    pub fn mark_foreign_key(&mut self, references: impl Into<String>) {
        self.is_foreign_key = true;
        self.references = Some(references.into());
    }

    /// Split `references` into its table and column parts.
    /// Table labels may be schema-qualified (`public.customers`), column names are not.
    pub fn reference_target(&self) -> Option<(&str, &str)> {
        self.references.as_deref()?.rsplit_once('.')
    }
}

/// Enforce the per-table column invariants: non-empty unique names, at most one
/// primary key, and `references` only on foreign-key columns
pub(crate) fn check_columns(table: &NodeId, columns: &[Column]) -> Result<()> {
    let mut seen = HashSet::new();
    let mut primary_keys = 0;

    for column in columns {
        if column.name.trim().is_empty() {
            return Err(GraphError::EmptyColumnName);
        }
        if !seen.insert(column.name.as_str()) {
            return Err(GraphError::DuplicateColumn {
                table: table.clone(),
                column: column.name.clone(),
            });
        }
        if column.references.is_some() && !column.is_foreign_key {
            return Err(GraphError::ReferenceWithoutForeignKey {
                table: table.clone(),
                column: column.name.clone(),
            });
        }
        if column.is_primary_key {
            primary_keys += 1;
        }
    }

    if primary_keys > 1 {
        return Err(GraphError::MultiplePrimaryKeys {
            table: table.clone(),
        });
    }

    Ok(())
}
