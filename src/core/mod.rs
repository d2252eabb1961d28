mod engine;
mod solver;
mod types;

pub use engine::{project_inflation, run_plan};
pub use types::{
    MonthlyProjectionRow, PlanError, PlanInputs, PlanResult, ScenarioSet, YearlyContribution,
};
