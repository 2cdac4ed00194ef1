mod agents_cmd;
mod api;
mod config;
mod debts_cmd;
mod input;
mod terminal_output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use collectiq_agents::AgentRegistry;
use collectiq_config::{config_dir, config_file_path, load_and_prepare};
use collectiq_core::{Clock, SystemClock};
use collectiq_infra::UiStateStore;
use collectiq_logging::init_logger;
use collectiq_predict::PredictionEngine;

use agents_cmd::AgentCommands;
use api::AppState;
use config::Settings;
use debts_cmd::PredictArgs;

#[derive(Parser)]
#[command(name = "collectiq")]
#[command(about = "CollectIQ: debt prioritization, predictions and agent routing")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.collectiq/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the priority score of every debt
    Score {
        #[arg(long)]
        debts: PathBuf,
    },
    /// Group debts into priority tiers
    Categorize {
        #[arg(long)]
        debts: PathBuf,
    },
    /// Run a prediction for one debt
    Predict(PredictArgs),
    /// Show the best weekday/hour slots to call
    ContactWindows,
    /// Derive portfolio insights
    Insights {
        #[arg(long)]
        debts: PathBuf,
        #[arg(long)]
        calls: Option<PathBuf>,
    },
    /// Inspect agents and assign tasks
    Agents {
        #[command(subcommand)]
        command: AgentCommands,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        terminal_output::note_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let config = load_and_prepare(&config_path)
        .await
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let settings = Settings::from_config(&config);

    init_logger(
        &settings.log_level,
        settings.log_dir.as_deref(),
        settings.json_logs,
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let registry = match settings.agents_seed {
        Some(seed) => AgentRegistry::seeded(seed, clock.clone()),
        None => AgentRegistry::with_rng(&mut rand::thread_rng(), clock.clone()),
    };
    let engine = match settings.predictions_seed {
        Some(seed) => PredictionEngine::seeded(seed, clock),
        None => PredictionEngine::from_entropy(),
    };

    match cli.command {
        Commands::Serve { port } => {
            let settings = Settings {
                port: port.unwrap_or(settings.port),
                ..settings
            };
            run_server(settings, registry, engine).await?;
        }
        Commands::Score { debts } => debts_cmd::score(debts).await?,
        Commands::Categorize { debts } => debts_cmd::categorize(debts).await?,
        Commands::Predict(args) => debts_cmd::predict(args, &engine).await?,
        Commands::ContactWindows => debts_cmd::contact_windows(&engine),
        Commands::Insights { debts, calls } => debts_cmd::insights(debts, calls, &engine).await?,
        Commands::Agents { command } => agents_cmd::run(command, &registry).await?,
    }

    Ok(())
}

async fn run_server(
    settings: Settings,
    registry: AgentRegistry,
    engine: PredictionEngine,
) -> Result<()> {
    info!(
        addr = %settings.addr(),
        state_dir = %settings.state_dir.display(),
        "Starting CollectIQ API"
    );

    let app_state = Arc::new(AppState {
        registry,
        engine,
        ui_state: UiStateStore::new(&settings.state_dir),
    });

    let app = api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = settings.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %addr, "HTTP API listening");

    axum::serve(listener, app).await?;

    Ok(())
}
