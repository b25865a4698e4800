//! Command-line interface for xo_game.

use clap::{Parser, Subcommand};

/// Two-player tic-tac-toe with a game history server
#[derive(Parser, Debug)]
#[command(name = "xo_game")]
#[command(about = "Tic-tac-toe with recorded games and statistics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the REST API server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Host to bind to (overrides config and environment)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Database file (overrides config and DATABASE_URL)
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Play a hot-seat game in the terminal
    Play {
        /// Game server URL. Finished games are posted there instead of the local database.
        #[arg(long)]
        server_url: Option<String>,

        /// Local database file used when no server URL is given
        #[arg(long, default_value = "xo_game.db")]
        db_path: String,
    },

    /// Print aggregate statistics
    Stats {
        /// Database file
        #[arg(long, default_value = "xo_game.db")]
        db_path: String,
    },

    /// Print the most recent games
    History {
        /// Database file
        #[arg(long, default_value = "xo_game.db")]
        db_path: String,

        /// Number of games to show
        #[arg(short, long, default_value = "10")]
        limit: i64,
    },
}
