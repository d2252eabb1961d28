use super::solver::{build_yearly_contributions, real_monthly_rate, solve_monthly_contribution};
use super::types::{
    MonthlyProjectionRow, PlanError, PlanInputs, PlanResult, ScenarioSet, YearlyContribution,
};

/// Nominal/inflation gaps below this make the annuity denominators
/// numerically meaningless.
const RATE_EPSILON: f64 = 1e-9;

const MAX_RETIREMENT_AGE: u32 = 150;
const MAX_DRAWDOWN_YEARS: u32 = 100;

/// Compounds `amount` forward by `annual_rate_pct` percent per year.
pub fn project_inflation(amount: f64, annual_rate_pct: f64, years: u32) -> f64 {
    amount * (1.0 + annual_rate_pct / 100.0).powi(years as i32)
}

/// Inflation-adjusted annual payout needed in each drawdown year, starting
/// `years_until_retirement` years out. One element per drawdown year.
fn estimate_future_payouts(
    monthly_income_today: f64,
    inflation_rate_pct: f64,
    years_until_retirement: u32,
    drawdown_years: u32,
) -> Vec<f64> {
    (0..drawdown_years)
        .map(|year| {
            project_inflation(
                monthly_income_today,
                inflation_rate_pct,
                years_until_retirement + year,
            ) * 12.0
        })
        .collect()
}

// The corpus is the plain sum of nominal future payouts, not their present
// value at the retirement date. Downstream consumers depend on this figure.
fn required_corpus(future_payouts: &[f64]) -> f64 {
    future_payouts.iter().sum()
}

fn simulate_accumulation(
    accumulation_months: u32,
    initial_amount: f64,
    real_monthly_rate: f64,
    flat_monthly_contribution: f64,
    yearly_contributions: &[YearlyContribution],
    current_age: u32,
) -> Vec<MonthlyProjectionRow> {
    let mut balance = initial_amount;
    let mut cumulative_contributed = 0.0;
    let mut cumulative_interest = 0.0;
    let mut table = Vec::with_capacity(accumulation_months as usize);

    for month in 1..=accumulation_months {
        let interest_earned = balance * real_monthly_rate;
        let year_slot = ((month - 1) / 12) as usize;
        let reported_contribution = yearly_contributions[year_slot].contribution_amount / 12.0;

        // The balance compounds with the flat solved payment; the
        // year-weighted slice is what the saver is told to pay in.
        balance += flat_monthly_contribution + interest_earned;
        cumulative_contributed += reported_contribution;
        cumulative_interest += interest_earned;

        table.push(MonthlyProjectionRow {
            month_in_year: (month - 1) % 12 + 1,
            absolute_year: (current_age * 12 + month) / 12,
            contribution: reported_contribution,
            cumulative_contributed,
            interest_earned_this_month: interest_earned,
            cumulative_interest,
            total_balance: balance,
        });
    }

    table
}

fn run_scenario(inputs: &PlanInputs, nominal_rate_pct: f64) -> PlanResult {
    let accumulation_years = inputs.accumulation_years();
    let accumulation_months = inputs.accumulation_months();

    let future_payouts = estimate_future_payouts(
        inputs.monthly_retirement_income,
        inputs.annual_inflation_rate_pct,
        accumulation_years,
        inputs.retirement_duration_years,
    );
    let target_corpus = required_corpus(&future_payouts);

    let monthly_rate = real_monthly_rate(nominal_rate_pct, inputs.annual_inflation_rate_pct);
    let flat_contribution = solve_monthly_contribution(
        target_corpus,
        inputs.initial_amount,
        monthly_rate,
        accumulation_months,
    );

    let yearly_contributions = build_yearly_contributions(
        accumulation_years,
        target_corpus,
        nominal_rate_pct,
        inputs.annual_inflation_rate_pct,
    );

    let table = simulate_accumulation(
        accumulation_months,
        inputs.initial_amount,
        monthly_rate,
        flat_contribution,
        &yearly_contributions,
        inputs.current_age,
    );

    let (total_contributed, total_interest) = table
        .last()
        .map(|row| (row.cumulative_contributed, row.cumulative_interest))
        .unwrap_or((0.0, 0.0));

    PlanResult {
        yearly_contributions,
        target_corpus,
        total_contributed,
        total_interest,
        table,
    }
}

fn scenario_rates(inputs: &PlanInputs) -> [f64; 3] {
    let nominal = inputs.nominal_annual_interest_rate_pct;
    [
        nominal,
        nominal + inputs.rate_variance_low_pct,
        nominal + inputs.rate_variance_high_pct,
    ]
}

fn validate(inputs: &PlanInputs) -> Result<(), PlanError> {
    if inputs.current_age >= inputs.retirement_age {
        return Err(PlanError::invalid(format!(
            "current age {} must be below retirement age {}",
            inputs.current_age, inputs.retirement_age
        )));
    }

    if inputs.retirement_age > MAX_RETIREMENT_AGE {
        return Err(PlanError::invalid(format!(
            "retirement age must be {MAX_RETIREMENT_AGE} or less"
        )));
    }

    if inputs.retirement_duration_years == 0 {
        return Err(PlanError::invalid(
            "retirement duration must be at least one year",
        ));
    }

    if inputs.retirement_duration_years > MAX_DRAWDOWN_YEARS {
        return Err(PlanError::invalid(format!(
            "retirement duration must be {MAX_DRAWDOWN_YEARS} years or less"
        )));
    }

    for (name, value) in [
        ("monthly retirement income", inputs.monthly_retirement_income),
        ("initial amount", inputs.initial_amount),
        (
            "nominal interest rate",
            inputs.nominal_annual_interest_rate_pct,
        ),
        ("inflation rate", inputs.annual_inflation_rate_pct),
        ("low rate variance", inputs.rate_variance_low_pct),
        ("high rate variance", inputs.rate_variance_high_pct),
    ] {
        if !value.is_finite() {
            return Err(PlanError::invalid(format!(
                "{name} must be a finite number"
            )));
        }
    }

    if inputs.monthly_retirement_income <= 0.0 {
        return Err(PlanError::invalid("monthly retirement income must be > 0"));
    }

    if inputs.initial_amount < 0.0 {
        return Err(PlanError::invalid("initial amount must be >= 0"));
    }

    if inputs.annual_inflation_rate_pct <= -100.0 {
        return Err(PlanError::invalid("inflation rate must be > -100"));
    }

    for nominal in scenario_rates(inputs) {
        if nominal <= -100.0 {
            return Err(PlanError::invalid(
                "nominal interest rate must stay above -100 in every scenario",
            ));
        }
        if (nominal - inputs.annual_inflation_rate_pct).abs() <= RATE_EPSILON {
            return Err(PlanError::DegenerateRate {
                nominal_rate_pct: nominal,
                inflation_rate_pct: inputs.annual_inflation_rate_pct,
            });
        }
    }

    Ok(())
}

/// Runs the full projection pipeline once per scenario rate and returns all
/// three results, or an error before any scenario is computed.
pub fn run_plan(inputs: &PlanInputs) -> Result<ScenarioSet, PlanError> {
    validate(inputs)?;

    let [expected_rate, pessimistic_rate, optimistic_rate] = scenario_rates(inputs);
    Ok(ScenarioSet {
        expected: run_scenario(inputs, expected_rate),
        pessimistic: run_scenario(inputs, pessimistic_rate),
        optimistic: run_scenario(inputs, optimistic_rate),
    })
}
