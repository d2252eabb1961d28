use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{PlanError, PlanInputs, ScenarioSet, run_plan};

/// Wire form of the plan parameters. Every field is required; `None` after
/// deserialization means the caller left it out.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlanPayload {
    #[serde(alias = "current_age")]
    current_age: Option<u32>,
    #[serde(alias = "retirement_age")]
    retirement_age: Option<u32>,
    #[serde(alias = "retirement_duration")]
    retirement_duration: Option<u32>,
    #[serde(alias = "monthly_income")]
    monthly_income: Option<f64>,
    #[serde(alias = "initial_amount")]
    initial_amount: Option<f64>,
    #[serde(alias = "interest_rate")]
    interest_rate: Option<f64>,
    #[serde(alias = "inflation_rate")]
    inflation_rate: Option<f64>,
    #[serde(alias = "rate_variance_low")]
    rate_variance_low: Option<f64>,
    #[serde(alias = "rate_variance_high")]
    rate_variance_high: Option<f64>,
}

fn plan_inputs_from_payload(payload: PlanPayload) -> Result<PlanInputs, PlanError> {
    fn require<T>(value: Option<T>, field: &'static str) -> Result<T, PlanError> {
        value.ok_or(PlanError::MissingParameter { field })
    }

    Ok(PlanInputs {
        current_age: require(payload.current_age, "currentAge")?,
        retirement_age: require(payload.retirement_age, "retirementAge")?,
        retirement_duration_years: require(payload.retirement_duration, "retirementDuration")?,
        monthly_retirement_income: require(payload.monthly_income, "monthlyIncome")?,
        initial_amount: require(payload.initial_amount, "initialAmount")?,
        nominal_annual_interest_rate_pct: require(payload.interest_rate, "interestRate")?,
        annual_inflation_rate_pct: require(payload.inflation_rate, "inflationRate")?,
        rate_variance_low_pct: require(payload.rate_variance_low, "rateVarianceLow")?,
        rate_variance_high_pct: require(payload.rate_variance_high, "rateVarianceHigh")?,
    })
}

fn scenario_set_for_payload(payload: PlanPayload) -> Result<ScenarioSet, PlanError> {
    let inputs = plan_inputs_from_payload(payload)?;
    run_plan(&inputs)
}

fn status_for(err: &PlanError) -> StatusCode {
    match err {
        PlanError::MissingParameter { .. } => StatusCode::BAD_REQUEST,
        PlanError::InvalidPlan { .. } | PlanError::DegenerateRate { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("retirement plan API listening on http://{addr}");
    tracing::info!("local access: http://127.0.0.1:{port}/api/plan");

    axum::serve(listener, app).await
}

fn router() -> Router {
    Router::new()
        .route("/api/plan", get(plan_get_handler).post(plan_post_handler))
        .fallback(not_found_handler)
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn plan_get_handler(Query(payload): Query<PlanPayload>) -> Response {
    plan_handler_impl(payload).await
}

async fn plan_post_handler(Json(payload): Json<PlanPayload>) -> Response {
    plan_handler_impl(payload).await
}

async fn plan_handler_impl(payload: PlanPayload) -> Response {
    match scenario_set_for_payload(payload) {
        Ok(scenarios) => json_response(StatusCode::OK, scenarios),
        Err(err) => {
            tracing::warn!("plan request rejected: {err}");
            error_response(status_for(&err), &err.to_string())
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[derive(Parser, Debug)]
#[command(
    name = "nestegg",
    about = "Retirement plan projection (expected / pessimistic / optimistic scenarios)"
)]
pub struct PlanCli {
    #[arg(long)]
    current_age: u32,
    #[arg(long)]
    retirement_age: u32,
    #[arg(long, help = "Years the drawdown phase must last")]
    retirement_duration: u32,
    #[arg(long, help = "Desired monthly retirement income in today's money")]
    monthly_income: f64,
    #[arg(long)]
    initial_amount: f64,
    #[arg(long, allow_negative_numbers = true, help = "Nominal annual rate, percent")]
    interest_rate: f64,
    #[arg(long, allow_negative_numbers = true, help = "Annual inflation rate, percent")]
    inflation_rate: f64,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Added to the nominal rate for the pessimistic scenario"
    )]
    rate_variance_low: f64,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Added to the nominal rate for the optimistic scenario"
    )]
    rate_variance_high: f64,
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

pub fn execute_plan_command(cli: PlanCli) -> Result<String, PlanError> {
    let inputs = PlanInputs {
        current_age: cli.current_age,
        retirement_age: cli.retirement_age,
        retirement_duration_years: cli.retirement_duration,
        monthly_retirement_income: cli.monthly_income,
        initial_amount: cli.initial_amount,
        nominal_annual_interest_rate_pct: cli.interest_rate,
        annual_inflation_rate_pct: cli.inflation_rate,
        rate_variance_low_pct: cli.rate_variance_low,
        rate_variance_high_pct: cli.rate_variance_high,
    };

    let scenarios = run_plan(&inputs)?;
    let json = if cli.pretty {
        serde_json::to_string_pretty(&scenarios).expect("scenario set serializes")
    } else {
        serde_json::to_string(&scenarios).expect("scenario set serializes")
    };
    Ok(json)
}
