//! Schelling Voices - Entry Point
//!
//! Builds the grid from configuration, then either opens the interactive
//! terminal view, answers a single `--inspect` query, or prints the grid.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use schelling_voices::command::Inspector;
use schelling_voices::core::config::SimulationConfig;
use schelling_voices::core::error::Result;
use schelling_voices::core::types::CellPos;
use schelling_voices::llm::LlmClient;
use schelling_voices::simulation::world::SchellingGrid;
use schelling_voices::ui::terminal::{self, TerminalApp};

const DEFAULT_LOG_FILTER: &str = "schelling_voices=info";

/// Schelling segregation model - click an agent to hear its side of the story
#[derive(Parser, Debug)]
#[command(name = "schelling-voices", version)]
#[command(about = "Schelling segregation model with LLM-generated agent perspectives")]
struct Args {
    /// TOML configuration file; missing keys use built-in defaults
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Grid width and height
    #[arg(long)]
    size: Option<usize>,

    /// Fraction of empty cells, in [0, 1]
    #[arg(long)]
    empty_ratio: Option<f64>,

    /// Global tolerance threshold, in [0, 1]
    #[arg(long)]
    threshold: Option<f64>,

    /// Use the global threshold for every agent instead of personality thresholds
    #[arg(long)]
    static_thresholds: bool,

    /// Model identifier for the text-generation service
    #[arg(long)]
    model: Option<String>,

    /// Random seed for deterministic grids
    #[arg(long)]
    seed: Option<u64>,

    /// Print the perspective of the agent at ROW,COL and exit
    #[arg(long, value_name = "ROW,COL")]
    inspect: Option<CellPos>,

    /// Print the grid and satisfaction summary and exit
    #[arg(long)]
    print: bool,

    /// Log file for the interactive view (logs would corrupt the screen)
    #[arg(long, default_value = "schelling-voices.log")]
    log_file: PathBuf,
}

impl Args {
    fn interactive(&self) -> bool {
        self.inspect.is_none() && !self.print
    }

    /// Configuration file overlaid with command-line overrides
    fn resolve_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)?,
            None => SimulationConfig::default(),
        };

        if let Some(size) = self.size {
            config.grid_size = size;
        }
        if let Some(ratio) = self.empty_ratio {
            config.empty_ratio = ratio;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if self.static_thresholds {
            config.dynamic_thresholds = false;
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = init_tracing(&args) {
        eprintln!("Warning: could not open log file {}: {}", args.log_file.display(), e);
    }

    run(args).map_err(|e| {
        tracing::error!(error = %e, "Exiting");
        e
    })
}

fn init_tracing(args: &Args) -> std::io::Result<()> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    if args.interactive() {
        let file = open_log_file(&args.log_file)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    File::options().create(true).append(true).open(path)
}

fn run(args: Args) -> Result<()> {
    let config = args.resolve_config()?;

    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    tracing::info!(seed, "Schelling Voices starting");

    let grid = SchellingGrid::generate(&config, &mut rng)?;

    if args.print {
        print_grid(&grid, seed);
        return Ok(());
    }

    let inspector = Inspector::new(LlmClient::from_config(&config.llm), config.llm.model.clone());

    if let Some(pos) = args.inspect {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let perspective = runtime.block_on(inspector.inspect(&grid, pos));
        println!("{}", perspective.text());
        return Ok(());
    }

    let mut app = TerminalApp::new(grid, inspector, seed)?;
    terminal::run(&mut app)
}

fn print_grid(grid: &SchellingGrid, seed: u64) {
    let census = grid.census();
    let summary = grid.satisfaction_summary();

    print!("{}", grid.to_ascii());
    println!();
    println!(
        "seed {} | {}x{} | Red {} | Blue {} | Empty {}",
        seed,
        grid.size(),
        grid.size(),
        census.red,
        census.blue,
        census.empty
    );
    println!(
        "Satisfied {}/{} ({:.0}%) | Red unhappy {} | Blue unhappy {}",
        summary.satisfied(),
        summary.agents(),
        summary.satisfied_ratio() * 100.0,
        summary.red_unsatisfied,
        summary.blue_unsatisfied
    );
}
