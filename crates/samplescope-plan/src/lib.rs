//! Sweep plan contracts, loading and validation.
//!
//! A plan declares which sampling strategies to compare, the sample size
//! stride and seed, and the evaluation flags. Plans are validated against the
//! schema of the population before a sweep is built from them.

pub mod errors;
pub mod load;
pub mod model;
pub mod schema;
pub mod validate;

pub use errors::{IssueSeverity, PlanError, Result, ValidationIssue, ValidationReport};
pub use load::{load_plan, parse_plan_json, parse_plan_toml};
pub use model::{
    ClusterSpec, DEFAULT_STEP, EvaluationSpec, PLAN_VERSION, StratifiedSpec, StrategySpec,
    SweepPlan, UniformSpec,
};
pub use schema::plan_json_schema;
pub use validate::{ValidatedPlan, validate_plan, validate_plan_against_schema};
