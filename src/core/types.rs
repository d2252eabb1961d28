use serde::Serialize;
use thiserror::Error;

/// Parameters of one retirement plan. Rates are percentages as plain numbers
/// (`7` means 7%), ages and durations are whole years.
#[derive(Debug, Clone)]
pub struct PlanInputs {
    pub current_age: u32,
    pub retirement_age: u32,
    pub retirement_duration_years: u32,
    /// Desired monthly income during retirement, in today's money.
    pub monthly_retirement_income: f64,
    pub initial_amount: f64,
    pub nominal_annual_interest_rate_pct: f64,
    pub annual_inflation_rate_pct: f64,
    /// Added to the nominal rate for the pessimistic scenario; typically
    /// negative, but the sign is not enforced.
    pub rate_variance_low_pct: f64,
    /// Added to the nominal rate for the optimistic scenario.
    pub rate_variance_high_pct: f64,
}

impl PlanInputs {
    pub fn accumulation_years(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age)
    }

    pub fn accumulation_months(&self) -> u32 {
        self.accumulation_years() * 12
    }
}

/// Nominal amount to pay in during one year of the accumulation phase.
/// `year_index` is 1-based; entries are chronological.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyContribution {
    pub year_index: u32,
    pub contribution_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProjectionRow {
    /// 1..=12 within the calendar year of the plan.
    pub month_in_year: u32,
    /// Age of the saver, in years, at the end of this month.
    pub absolute_year: u32,
    pub contribution: f64,
    pub cumulative_contributed: f64,
    pub interest_earned_this_month: f64,
    pub cumulative_interest: f64,
    pub total_balance: f64,
}

/// The projection for a single scenario rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub yearly_contributions: Vec<YearlyContribution>,
    pub target_corpus: f64,
    pub total_contributed: f64,
    pub total_interest: f64,
    pub table: Vec<MonthlyProjectionRow>,
}

/// Three parallel projections differing only in the assumed nominal rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSet {
    pub expected: PlanResult,
    pub pessimistic: PlanResult,
    pub optimistic: PlanResult,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("missing required parameter: {field}")]
    MissingParameter { field: &'static str },

    #[error("invalid plan: {reason}")]
    InvalidPlan { reason: String },

    #[error(
        "degenerate rate: nominal rate {nominal_rate_pct}% equals inflation rate {inflation_rate_pct}%"
    )]
    DegenerateRate {
        nominal_rate_pct: f64,
        inflation_rate_pct: f64,
    },
}

impl PlanError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        PlanError::InvalidPlan {
            reason: reason.into(),
        }
    }
}
