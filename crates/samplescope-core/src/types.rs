use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Semantic kind of a column. Decides which metric compares it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column values, stored contiguously by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl ColumnData {
    /// Build column data from raw text, inferring the kind.
    ///
    /// The column is numeric when every value parses as a finite `f64`;
    /// otherwise every value is kept as a category label. An empty input is
    /// treated as categorical.
    pub fn infer(raw: Vec<String>) -> Self {
        if raw.is_empty() {
            return ColumnData::Categorical(raw);
        }

        let parsed = raw
            .iter()
            .map(|value| value.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect::<Option<Vec<_>>>();

        match parsed {
            Some(values) => ColumnData::Numeric(values),
            None => ColumnData::Categorical(raw),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            ColumnData::Numeric(values) => Some(values),
            ColumnData::Categorical(_) => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&[String]> {
        match self {
            ColumnData::Categorical(values) => Some(values),
            ColumnData::Numeric(_) => None,
        }
    }

    /// Textual key of a single cell, used to group rows.
    ///
    /// `-0.0` and `0.0` share the key `"0"`.
    pub fn key_at(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Numeric(values) => values
                .get(row)
                .map(|value| (if *value == 0.0 { 0.0 } else { *value }).to_string()),
            ColumnData::Categorical(values) => values.get(row).cloned(),
        }
    }

    /// Gather rows by index. Callers check bounds first.
    pub(crate) fn gather(&self, indices: &[usize]) -> ColumnData {
        match self {
            ColumnData::Numeric(values) => {
                ColumnData::Numeric(indices.iter().map(|idx| values[*idx]).collect())
            }
            ColumnData::Categorical(values) => {
                ColumnData::Categorical(indices.iter().map(|idx| values[*idx].clone()).collect())
            }
        }
    }
}
