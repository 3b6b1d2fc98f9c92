//! Simulation Engine Binary
//!
//! Runs one Monte Carlo simulation and prints the result.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin simulation-engine
//! ```
//!
//! # Environment Variables
//!
//! - `SIMULATION_CONFIG`: Path to the YAML config (default: simulation.yaml;
//!   built-in defaults are used when the file does not exist)
//! - `SIMULATION_OUTPUT`: text | json (default: text)
//! - `RUST_LOG`: Log filter (overrides `observability.logging.level`)
//!
//! Ctrl+C or SIGTERM cancels a running simulation.

use anyhow::Context;
use simulation_engine::config::{Config, DEFAULT_CONFIG_PATH, load_config_or_default};
use simulation_engine::observability::init_logging;
use simulation_engine::report::render_report;
use simulation_engine::{Recommendation, RiskLevel, SimulationEngine, SimulationOutcome};
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Output format for the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn from_env() -> Self {
        match std::env::var("SIMULATION_OUTPUT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config_path =
        std::env::var("SIMULATION_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config_or_default(&config_path)
        .with_context(|| format!("loading configuration from {config_path}"))?;

    init_logging(&config.observability.logging).context("initializing logging")?;

    tracing::info!(config_path = %config_path, "Starting simulation engine");
    log_config(&config);

    let engine = SimulationEngine::new(config.engine.clone());
    let token = engine.cancellation_token();

    let run = engine.run_async(config.simulation.clone());
    tokio::pin!(run);

    let finished = tokio::select! {
        result = &mut run => Some(result),
        () = shutdown_signal(token) => None,
    };
    // After a signal the run observes the cancelled token and returns promptly.
    let outcome = match finished {
        Some(result) => result,
        None => run.await,
    }?;

    print_outcome(&config, &outcome, OutputFormat::from_env())?;

    tracing::info!("Simulation engine finished");
    Ok(())
}

/// Log the parsed configuration.
fn log_config(config: &Config) {
    tracing::info!(
        initial_investment = config.simulation.initial_investment,
        horizon_days = config.simulation.horizon_days,
        trial_count = config.simulation.trial_count,
        mean_daily_return = config.simulation.mean_daily_return,
        daily_volatility = config.simulation.daily_volatility,
        current_price = config.simulation.current_price,
        seed = ?config.engine.seed,
        max_threads = config.engine.max_threads,
        "Configuration loaded"
    );
}

/// Print the result to stdout.
fn print_outcome(
    config: &Config,
    outcome: &SimulationOutcome,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "summary": outcome.summary,
                "risk_level": RiskLevel::from_summary(&outcome.summary),
                "recommendation": Recommendation::from_summary(&outcome.summary),
                "seed": outcome.seed,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            println!("{}", render_report(&config.simulation, &outcome.summary));
        }
    }
    Ok(())
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for Ctrl+C or SIGTERM, then cancel the running simulation.
///
/// If a signal handler cannot be installed, that branch never resolves and
/// the run continues to completion.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, cancelling simulation");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, cancelling simulation");
        }
    }

    token.cancel();
}
