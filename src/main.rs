use std::env;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nestegg=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let raw_args: Vec<String> = env::args().collect();
    match raw_args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            let port = raw_args
                .get(2)
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(8080);
            if let Err(e) = nestegg::api::run_http_server(port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Some("plan") => {
            let cli = nestegg::api::PlanCli::parse_from(
                raw_args
                    .iter()
                    .take(1)
                    .chain(raw_args.iter().skip(2))
                    .cloned(),
            );
            match nestegg::api::execute_plan_command(cli) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    tracing::error!("plan rejected: {e}");
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
        _ => {
            eprintln!("Usage: cargo run -- serve [port]");
            eprintln!("       cargo run -- plan --current-age 30 --retirement-age 65 ...");
            std::process::exit(1);
        }
    }
}
