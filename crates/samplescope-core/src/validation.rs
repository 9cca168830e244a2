use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::table::Column;
use crate::types::ColumnData;

/// Validate the structural invariants of a set of table columns.
///
/// This checks:
/// - at least one column, each with a non-blank unique name
/// - every column has the same number of rows
/// - numeric values are finite
pub fn validate_columns(columns: &[Column]) -> Result<()> {
    let first = columns
        .first()
        .ok_or_else(|| Error::InvalidTable("table has no columns".to_string()))?;
    let rows = first.data.len();

    let mut names = BTreeSet::new();
    for column in columns {
        if column.name.trim().is_empty() {
            return Err(Error::InvalidTable("blank column name".to_string()));
        }
        if !names.insert(column.name.as_str()) {
            return Err(Error::InvalidTable(format!(
                "duplicate column name: {}",
                column.name
            )));
        }
        if column.data.len() != rows {
            return Err(Error::InvalidTable(format!(
                "column '{}' has {} row(s), expected {}",
                column.name,
                column.data.len(),
                rows
            )));
        }
        if let ColumnData::Numeric(values) = &column.data {
            if let Some(row) = values.iter().position(|value| !value.is_finite()) {
                return Err(Error::InvalidTable(format!(
                    "non-finite value in column '{}' at row {}",
                    column.name, row
                )));
            }
        }
    }

    Ok(())
}
