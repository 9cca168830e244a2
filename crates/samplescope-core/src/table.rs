use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{ColumnSchema, TableSchema};
use crate::types::{ColumnData, ColumnKind};
use crate::validation::validate_columns;

/// A named column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn categorical<S: Into<String>>(name: impl Into<String>, values: Vec<S>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values.into_iter().map(Into::into).collect()),
        }
    }

    /// Build a column from raw text values, inferring its kind.
    pub fn infer(name: impl Into<String>, raw: Vec<String>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::infer(raw),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }
}

/// Immutable, validated table of typed columns.
///
/// Both the population handed in by callers and every sample drawn from it
/// use this type. Samples are produced with [`Table::take`] and always share
/// the population schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    schema: TableSchema,
    rows: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        validate_columns(&columns)?;

        let rows = columns.first().map(|column| column.data.len()).unwrap_or(0);
        let schema = TableSchema {
            columns: columns
                .iter()
                .map(|column| ColumnSchema {
                    name: column.name.clone(),
                    kind: column.kind(),
                })
                .collect(),
        };

        Ok(Self {
            columns,
            schema,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Column data by name.
    pub fn data(&self, name: &str) -> Result<&ColumnData> {
        self.column(name)
            .map(|column| &column.data)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }

    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        let data = self.data(name)?;
        data.as_numeric().ok_or_else(|| Error::KindMismatch {
            column: name.to_string(),
            expected: ColumnKind::Numeric,
            found: data.kind(),
        })
    }

    pub fn categorical(&self, name: &str) -> Result<&[String]> {
        let data = self.data(name)?;
        data.as_categorical().ok_or_else(|| Error::KindMismatch {
            column: name.to_string(),
            expected: ColumnKind::Categorical,
            found: data.kind(),
        })
    }

    /// Build a row subset in the order of `indices`, keeping the schema.
    pub fn take(&self, indices: &[usize]) -> Result<Table> {
        if let Some(row) = indices.iter().copied().find(|row| *row >= self.rows) {
            return Err(Error::RowOutOfBounds {
                row,
                rows: self.rows,
            });
        }

        let columns = self
            .columns
            .iter()
            .map(|column| Column {
                name: column.name.clone(),
                data: column.data.gather(indices),
            })
            .collect();

        Ok(Table {
            columns,
            schema: self.schema.clone(),
            rows: indices.len(),
        })
    }
}
