//! # Dexle - Daily Pokémon Guessing Game
//!
//! The main binary for the Dexle game server.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for game operations
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │              apps/dexle (THE BINARY)          │
//! │                                               │
//! │  ┌─────────────┐        ┌─────────────┐      │
//! │  │   CLI       │        │   HTTP API  │      │
//! │  │  (clap)     │        │   (axum)    │      │
//! │  └──────┬──────┘        └──────┬──────┘      │
//! │         │                      │              │
//! │         └──────────┬───────────┘              │
//! │                    ▼                          │
//! │            ┌───────────────┐                  │
//! │            │  dexle-core   │                  │
//! │            │ (THE RULES)   │                  │
//! │            └───────────────┘                  │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! dexle server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! dexle import -f pokedex.json
//! dexle target -n pikachu -d 2026-08-23
//! dexle new -s alice
//! dexle guess -s alice -n charizard
//! ```

use clap::Parser;
use dexle::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing. DEXLE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("DEXLE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dexle=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Dexle startup banner.
fn print_banner() {
    println!(
        r#"
  ██████╗ ███████╗██╗  ██╗██╗     ███████╗
  ██╔══██╗██╔════╝╚██╗██╔╝██║     ██╔════╝
  ██║  ██║█████╗   ╚███╔╝ ██║     █████╗
  ██║  ██║██╔══╝   ██╔██╗ ██║     ██╔══╝
  ██████╔╝███████╗██╔╝ ██╗███████╗███████╗
  ╚═════╝ ╚══════╝╚═╝  ╚═╝╚══════╝╚══════╝

  Daily Pokémon Guessing Game v{}

  One puzzle a day. Six guesses. No hints wasted.
"#,
        env!("CARGO_PKG_VERSION")
    );
}
