use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::process::ExitCode;
use tracing::{debug, info};

mod calc;
mod config;
mod dashboard;
mod report;

use calc::ValidationError;
use config::{Command, Config};
use dashboard::AppState;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    config.validate()?;

    let outcome = match config.command {
        Command::Kelly {
            probability,
            odds,
            multiplier,
            bankroll,
        } => report::kelly_report(&probability, &odds, &multiplier, bankroll.as_deref()),
        Command::Wager {
            bankroll,
            percentage,
        } => report::wager_report(&bankroll, &percentage),
        Command::Implied { odds } => report::implied_report(&odds),
        Command::Serve {
            addr,
            default_multiplier,
        } => {
            serve(&addr, default_multiplier).await?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    Ok(print_outcome(outcome))
}

fn print_outcome(outcome: Result<String, ValidationError>) -> ExitCode {
    match outcome {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(error = ?e, "Input rejected");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(addr: &str, default_multiplier: f64) -> Result<()> {
    let app = dashboard::router(AppState { default_multiplier });
    let addr: SocketAddr = addr.parse()?;
    info!("Calculator listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server (blocks until shutdown)
    axum::serve(listener, app).await?;

    Ok(())
}
