use std::path::PathBuf;

use clap::Parser;
use game_core::Config;
use records::{FileStatStore, StatKey};
use runner::{Driver, RunOptions, RunnerError};

#[derive(Parser, Clone)]
#[command(name = "duality")]
#[command(about = "Run a headless wave/particle endless-runner session")]
struct Args {
    /// Random seed for reproducible runs
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Simulated seconds before the run is stopped
    #[arg(long, default_value = "120.0")]
    seconds: f32,

    /// TOML file overriding the default tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where end-of-run statistics are stored
    #[arg(long, default_value = "duality_stats.bin")]
    stats: PathBuf,

    /// Chance (0.0-1.0) that the autopilot ignores an obstacle
    #[arg(long, default_value = "0.1")]
    mistake_rate: f32,

    /// Print the stored statistics and exit
    #[arg(long)]
    show_stats: bool,

    /// Debug logging
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(err) = run(args) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), RunnerError> {
    let store = FileStatStore::new(&args.stats);

    if args.show_stats {
        let table = store.load()?;
        println!("Stored statistics ({}):", store.path().display());
        for key in StatKey::ALL {
            match table.get(key) {
                Some(value) => println!("  {key:?}: {value}"),
                None => println!("  {key:?}: -"),
            }
        }
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            Config::load(path)?
        }
        None => Config::new(),
    };

    let options = RunOptions {
        seed: args.seed,
        seconds: args.seconds,
        mistake_rate: args.mistake_rate,
    };
    log::info!(
        "starting run: seed {}, {:.0}s budget, mistake rate {:.2}",
        options.seed,
        options.seconds,
        options.mistake_rate
    );

    let report = Driver::new(config, options, Box::new(store)).run();
    println!("{report}");
    Ok(())
}
