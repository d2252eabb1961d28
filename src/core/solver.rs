use super::types::YearlyContribution;

/// Annual growth left after stripping inflation out of the nominal rate.
pub(crate) fn real_annual_rate(nominal_rate_pct: f64, inflation_rate_pct: f64) -> f64 {
    (1.0 + nominal_rate_pct / 100.0) / (1.0 + inflation_rate_pct / 100.0) - 1.0
}

pub(crate) fn real_monthly_rate(nominal_rate_pct: f64, inflation_rate_pct: f64) -> f64 {
    (1.0 + real_annual_rate(nominal_rate_pct, inflation_rate_pct)).powf(1.0 / 12.0) - 1.0
}

/// Level monthly payment that closes the gap between `initial_amount` and
/// `target_corpus` over `accumulation_months`, with interest credited at
/// `real_monthly_rate` on the running balance (ordinary annuity).
///
/// The zero-rate case makes the denominator vanish; `run_plan` rejects it as
/// `DegenerateRate` before this is ever reached.
pub(crate) fn solve_monthly_contribution(
    target_corpus: f64,
    initial_amount: f64,
    real_monthly_rate: f64,
    accumulation_months: u32,
) -> f64 {
    (target_corpus - initial_amount) * real_monthly_rate
        / ((1.0 + real_monthly_rate).powi(accumulation_months as i32) - 1.0)
}

/// Per-year contribution schedule whose nominal amounts rise with inflation
/// while their inflation-adjusted value stays level. One entry per year
/// `1..=accumulation_years`.
pub(crate) fn build_yearly_contributions(
    accumulation_years: u32,
    target_corpus: f64,
    nominal_rate_pct: f64,
    inflation_rate_pct: f64,
) -> Vec<YearlyContribution> {
    let nominal_factor = 1.0 + nominal_rate_pct / 100.0;
    let inflation_factor = 1.0 + inflation_rate_pct / 100.0;
    let rate_gap = (nominal_rate_pct - inflation_rate_pct) / 100.0;
    let n = accumulation_years;

    (1..=n)
        .map(|year| {
            let numerator = inflation_factor.powi(year as i32 - 1) * target_corpus * rate_gap;
            let denominator =
                nominal_factor.powi(n as i32) - inflation_factor.powi((n - year) as i32);
            YearlyContribution {
                year_index: year,
                contribution_amount: numerator / denominator,
            }
        })
        .collect()
}
