use clap::Parser;
use env_logger::Env;
use flipcheck::{CheckConfig, Checker, Strategy};
use log::error;
use std::path::PathBuf;
use std::process;

/// Checks the Flip operator against its reference on randomized cases.
#[derive(Parser)]
#[command(name = "flipcheck", version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// JSON case table; the built-in 19x19 table is used when omitted
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the generator seed
    #[arg(long)]
    seed: Option<u64>,

    /// Draw this many sampled cases
    #[arg(long, conflicts_with = "exhaustive")]
    max_examples: Option<usize>,

    /// Run every combination of the case table once
    #[arg(long)]
    exhaustive: bool,

    /// Skip the flip-twice check
    #[arg(long)]
    no_involution: bool,

    /// Log every case, not only failures
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> Result<CheckConfig, flipcheck::CheckError> {
    let mut config = match cli.config {
        Some(ref path) => CheckConfig::load(path)?,
        None => CheckConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(max_examples) = cli.max_examples {
        config.strategy = Strategy::Sampled { max_examples };
    }
    if cli.exhaustive {
        config.strategy = Strategy::Exhaustive;
    }
    if cli.no_involution {
        config.check_involution = false;
    }
    Ok(config)
}

fn main() {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let checker = match load_config(&cli).and_then(Checker::new) {
        Ok(checker) => checker,
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        }
    };
    let report = checker.run();
    for failure in report.failures() {
        error!("{}: {}", failure.description, failure.outcome);
    }
    println!("{}", report);
    process::exit(report.exit_code());
}
