//! # Dexle CLI Module
//!
//! This module implements the CLI interface for Dexle.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `status` - Show catalog and session status
//! - `import` - Import the candidate catalog from a JSON file
//! - `target` - Schedule or show a daily target
//! - `init` - Initialize a new database
//! - `new` - Create a game session
//! - `guess` - Submit a guess to a session
//! - `show` - Show a session's history and feedback

mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dexle_core::DexleError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Dexle - the daily Pokémon guessing game
///
/// One hidden Pokémon per day. Guess it from per-attribute feedback
/// before the budget runs out.
#[derive(Parser, Debug)]
#[command(name = "dexle")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the game database
    #[arg(short = 'D', long, global = true, default_value = "dexle.db")]
    pub database: PathBuf,

    /// Storage backend: "redb" (ACID database) or "memory" (volatile)
    #[arg(short = 'B', long, global = true, default_value = "redb")]
    pub backend: String,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Show catalog and session status
    Status,

    /// Import the candidate catalog from a JSON file
    Import {
        /// Path to the input file (JSON array of catalog entries)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Schedule or show a daily target
    Target {
        /// Name of the Pokémon to schedule; shows the date's schedule state
        /// when omitted
        #[arg(short, long)]
        name: Option<String>,

        /// Date to schedule (YYYY-MM-DD, default: today UTC)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Initialize a new empty database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },

    /// Create a game session
    New {
        /// Session identifier
        #[arg(short, long)]
        session: String,

        /// Puzzle date (YYYY-MM-DD, default: today UTC)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Guess budget
        #[arg(short, long, default_value_t = dexle_core::primitives::DEFAULT_MAX_GUESSES)]
        max_guesses: u32,
    },

    /// Submit a guess to a session
    Guess {
        /// Session identifier
        #[arg(short, long)]
        session: String,

        /// Candidate name (case-insensitive)
        #[arg(short, long)]
        name: String,
    },

    /// Show a session's history and feedback
    Show {
        /// Session identifier
        #[arg(short, long)]
        session: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), DexleError> {
    let backend = cli.backend.as_str();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            cmd_server(&cli.database, backend, &host, port).await
        }
        Some(Commands::Status) => cmd_status(&cli.database, backend, json_mode),
        Some(Commands::Import { file }) => cmd_import(&cli.database, backend, json_mode, &file),
        Some(Commands::Target { name, date }) => {
            cmd_target(&cli.database, backend, json_mode, name.as_deref(), date)
        }
        Some(Commands::Init { force }) => cmd_init(&cli.database, backend, force),
        Some(Commands::New {
            session,
            date,
            max_guesses,
        }) => cmd_new(&cli.database, backend, json_mode, &session, date, max_guesses),
        Some(Commands::Guess { session, name }) => {
            cmd_guess(&cli.database, backend, json_mode, &session, &name)
        }
        Some(Commands::Show { session }) => cmd_show(&cli.database, backend, json_mode, &session),
        None => {
            // No subcommand - show status by default
            cmd_status(&cli.database, backend, json_mode)
        }
    }
}
