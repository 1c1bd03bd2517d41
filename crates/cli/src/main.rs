mod commands;
mod config;
mod serve;
mod wiring;

use std::path::PathBuf;
use std::process;

use arena_storage::HistoryFilter;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::config::ArenaConfig;

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "arena=info,arena_duel=info,tower_http=info";

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Turn-based duel arena.
#[derive(Parser)]
#[command(name = "arena", version, about = "Turn-based duel arena")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the arena HTTP service
    Serve {
        /// Port to listen on [env: ARENA_PORT, default 8081]
        #[arg(long)]
        port: Option<u16>,
        #[command(flatten)]
        sources: SourceArgs,
    },

    /// Start a standalone fighter directory HTTP service
    Directory {
        /// Port to listen on [env: DUELIST_PORT, default 50051]
        #[arg(long)]
        port: Option<u16>,
        /// JSON file with an array of fighters to preload [env: ARENA_FIGHTERS_PATH]
        #[arg(long)]
        fighters: Option<PathBuf>,
    },

    /// Resolve one duel and print the outcome
    Duel {
        /// Id of the first fighter
        fighter_1: String,
        /// Id of the second fighter
        fighter_2: String,
        #[command(flatten)]
        sources: SourceArgs,
    },

    /// Print past battles, newest first
    History {
        /// JSON-lines history file [env: ARENA_HISTORY_PATH]
        #[arg(long)]
        history: Option<PathBuf>,
        /// Maximum number of battles (non-positive means the default of 50)
        #[arg(long, allow_hyphen_values = true)]
        limit: Option<i64>,
        /// Only battles this fighter took part in
        #[arg(long)]
        fighter: Option<String>,
    },
}

/// Where fighters come from and where battles go.
#[derive(clap::Args)]
struct SourceArgs {
    /// Base URL of a remote fighter directory [env: DUELIST_URL]
    #[arg(long)]
    duelist_url: Option<String>,
    /// JSON file with an array of fighters for the embedded directory [env: ARENA_FIGHTERS_PATH]
    #[arg(long)]
    fighters: Option<PathBuf>,
    /// JSON-lines history file; in memory when unset [env: ARENA_HISTORY_PATH]
    #[arg(long)]
    history: Option<PathBuf>,
    /// Seed for the duel random source [env: ARENA_SEED]
    #[arg(long)]
    seed: Option<u64>,
}

impl SourceArgs {
    /// Flags win over environment values.
    fn apply(self, config: &mut ArenaConfig) {
        if let Some(url) = self.duelist_url {
            config.duelist_url = Some(url);
        }
        if let Some(path) = self.fighters {
            config.fighters_path = Some(path);
        }
        if let Some(path) = self.history {
            config.history_path = Some(path);
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    // A missing .env file is normal.
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let mut config = match ArenaConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Serve { port, sources } => {
            if let Some(port) = port {
                config.port = port;
            }
            sources.apply(&mut config);
            rt.block_on(serve::start_server(config))
        }
        Commands::Directory { port, fighters } => {
            let port = port.unwrap_or(config.duelist_port);
            let fighters = fighters.or(config.fighters_path);
            rt.block_on(serve::start_directory_server(port, fighters))
        }
        Commands::Duel {
            fighter_1,
            fighter_2,
            sources,
        } => {
            sources.apply(&mut config);
            rt.block_on(commands::duel::cmd_duel(
                &config, &fighter_1, &fighter_2, cli.output,
            ))
        }
        Commands::History {
            history,
            limit,
            fighter,
        } => {
            if let Some(path) = history {
                config.history_path = Some(path);
            }
            let filter = HistoryFilter {
                limit,
                fighter_id: fighter,
            };
            rt.block_on(commands::history::cmd_history(&config, filter, cli.output))
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
