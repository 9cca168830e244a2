//! Core contracts for samplescope.
//!
//! This crate defines the population table model, its explicit column schema,
//! and the validation helpers shared by the sampling and evaluation crates.

pub mod error;
pub mod identity;
pub mod schema;
pub mod table;
pub mod types;
pub mod validation;

pub use error::{Error, Result};
pub use identity::strategy_identity;
pub use schema::{ColumnSchema, TableSchema};
pub use table::{Column, Table};
pub use types::{ColumnData, ColumnKind};
pub use validation::validate_columns;
