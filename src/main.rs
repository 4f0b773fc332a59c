use clap::Parser;
use dotenv::dotenv;
use env_logger::Env;
use log::{info, error};
use std::path::Path;
use std::process;

use bankist::cli::{self, App};
use bankist::clock::SystemClock;
use bankist::{config, seed};

/// Bankist - a demo banking ledger in your terminal
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Sets the configuration file
    #[clap(short, long, value_name = "FILE", default_value = "bankist.toml")]
    config: String,

    /// JSON seed file with the accounts to load (overrides the config)
    #[clap(short, long, value_name = "FILE")]
    seed: Option<String>,

    /// Turn debugging information on
    #[clap(short, long, action = clap::ArgAction::Count)]
    debug: u8,
}

fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();

    // Initialize logger, RUST_LOG still wins over the verbosity flag
    let default_level = match cli.debug {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Starting Bankist");

    let config = match config::load_config(&cli.config) {
        Ok(config) => {
            info!("Configuration loaded from {}", cli.config);
            config
        }
        Err(err) => {
            error!("Failed to load configuration: {:#}", err);
            process::exit(1);
        }
    };

    let seed_path = cli.seed.clone().or_else(|| config.ledger.seed_path.clone());
    let repo = match seed::load_repository(seed_path.as_deref().map(Path::new)) {
        Ok(repo) => {
            info!("Loaded {} accounts: {}", repo.len(), repo.usernames().join(", "));
            repo
        }
        Err(err) => {
            error!("Failed to load accounts: {:#}", err);
            process::exit(1);
        }
    };

    let mut app = App::new(repo, config, Box::new(SystemClock));
    println!("Type 'help' for a list of commands.");

    if let Err(err) = cli::run(&mut app) {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}
