use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::model::SweepPlan;

/// JSON Schema describing the sweep plan format.
pub fn plan_json_schema() -> RootSchema {
    schema_for!(SweepPlan)
}
