mod input;
mod render;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use services::{DeepLink, EngineError, SimulationEngine, TracingAnalytics};
use sim_core::model::{EngineSettings, SettingsError};
use storage::Storage;

use crate::input::Command;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SettingsError> for AppError {
    fn from(e: SettingsError) -> Self {
        Self::Engine(EngineError::from(e))
    }
}

#[derive(Parser, Debug)]
#[command(name = "sim")]
#[command(about = "Play a scenario-based training simulation in the terminal")]
struct Cli {
    /// Path to the simulation catalog (JSON)
    #[arg(long, env = "SIM_CATALOG", default_value = "catalog.json")]
    catalog: PathBuf,

    /// Open this simulation directly (0-based)
    #[arg(long, env = "SIM_INDEX")]
    sim_index: Option<usize>,

    /// With --sim-index, jump straight to this step (0-based)
    #[arg(long, env = "SIM_STEP_INDEX", requires = "sim_index")]
    step_index: Option<usize>,

    /// Seed for option shuffling and percentiles
    #[arg(long, env = "SIM_SEED")]
    seed: Option<u64>,

    /// Stay on each step after answering until `c` is entered
    #[arg(long)]
    review_mode: bool,

    /// Seconds of inactivity before the timer pauses
    #[arg(long, default_value_t = EngineSettings::DEFAULT_IDLE_PAUSE_SECS)]
    idle_pause_secs: u32,
}

impl Cli {
    fn settings(&self) -> Result<EngineSettings, SettingsError> {
        EngineSettings::new(!self.review_mode, self.idle_pause_secs, self.seed)
    }

    fn deep_link(&self) -> Option<DeepLink> {
        self.sim_index.map(|sim_index| DeepLink {
            sim_index,
            step_index: self.step_index,
        })
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,services=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let settings = cli.settings()?;
    info!(catalog = %cli.catalog.display(), "loading catalog");

    // Keep file access in the binary glue so core/services stay pure.
    let storage = Storage::json_file(&cli.catalog);
    let mut engine = SimulationEngine::load(storage.catalog.as_ref(), settings)
        .await?
        .with_analytics(Arc::new(TracingAnalytics))
        .with_deep_link(cli.deep_link());
    engine.open();
    println!("{}", render::snapshot(&engine.snapshot()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = ticker.tick() => engine.tick(),
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("input closed");
                    break;
                };
                engine.record_activity();
                let snapshot = engine.snapshot();
                match input::parse(&line, snapshot.screen, snapshot.step.as_ref()) {
                    Command::Quit => break,
                    Command::Help => println!("{HELP}"),
                    Command::Invalid(reason) => println!("{reason}"),
                    Command::Dispatch(event) => {
                        if let Some(feedback) = engine.dispatch(event) {
                            println!("{}", render::feedback(&feedback));
                        }
                        let snapshot = engine.snapshot();
                        println!("{}", render::snapshot(&snapshot));
                        if snapshot.screen.is_terminal() {
                            break;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

const HELP: &str = "\
Enter an option number to answer, several numbers (`1,3`) for multi-select,
`done` or Enter to finish a completion step, `c` to continue, `q` to quit.";
