//! # RocketShoes CLI Library
//!
//! Argument parsing, startup and output for the `rocketshoes` binary.
//!
//! ## Module Organization
//! ```text
//! rocketshoes_cli/
//! ├── lib.rs          ◄─── You are here (arguments, startup, printing)
//! ├── state.rs        ◄─── AppState: database + cart store handle
//! ├── notifier.rs     ◄─── Notices to stderr
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── cart.rs     ◄─── show / add / remove / update
//! │   └── config.rs   ◄─── config
//! └── error.rs        ◄─── CliError for command output
//! ```
//!
//! ## Streams
//! - stdout: one JSON document (cart or error), or TOML for `config`
//! - stderr: logs and notices

pub mod commands;
pub mod error;
pub mod notifier;
pub mod state;

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;
use rocketshoes_store::StoreConfig;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::cart::CartResponse;
use error::{CliError, CliResult};
use notifier::TerminalNotifier;
use state::AppState;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "rocketshoes", version, about = "RocketShoes shopping cart")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Print the cart
    Show,

    /// Add one unit of a product
    Add { product_id: ProductId },

    /// Remove a product
    Remove { product_id: ProductId },

    /// Set a product's amount
    Update {
        product_id: ProductId,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },

    /// Print the effective configuration
    Config {
        /// Write it to the config file as well
        #[arg(long)]
        save: bool,
    },
}

/// Parses arguments, runs one command and prints its result.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging                                                  │
/// │     • tracing-subscriber with env filter, to stderr                     │
/// │     • Default: info,rocketshoes=debug,sqlx=warn; RUST_LOG overrides     │
/// │                                                                         │
/// │  2. Load Configuration                                                  │
/// │     • defaults → config.toml → ROCKETSHOES_* env vars                   │
/// │                                                                         │
/// │  3. Open State (cart commands only)                                     │
/// │     • SQLite with migrations, HTTP catalogue, cart store task           │
/// │                                                                         │
/// │  4. Run Command, print, shut the store down                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_tracing();
    info!("Starting RocketShoes CLI");

    match execute(cli).await {
        Ok(output) => {
            println!("{}", output.text);
            Ok(if output.rejected {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Err(err) => {
            println!("{}", to_json(&err)?);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// What a command printed and whether the cart rejected it.
struct Output {
    text: String,
    rejected: bool,
}

async fn execute(cli: Cli) -> CliResult<Output> {
    let config = StoreConfig::load(cli.config.clone())?;

    if let Command::Config { save } = cli.command {
        let text = commands::config::show_config(&config)?;
        if save {
            let path = commands::config::save_config(&config, cli.config)?;
            info!(?path, "Config written");
        }
        return Ok(Output {
            text,
            rejected: false,
        });
    }

    let state = AppState::open(&config, Arc::new(TerminalNotifier)).await?;
    let result = run_cart_command(&state, cli.command).await;
    state.close().await;

    let response = result?;
    Ok(Output {
        text: to_json(&response).map_err(|e| CliError::internal(e.to_string()))?,
        rejected: response.is_rejected(),
    })
}

async fn run_cart_command(state: &AppState, command: Command) -> CliResult<CartResponse> {
    let cart = &state.cart;

    match command {
        Command::Show => Ok(commands::cart::show_cart(cart)),
        Command::Add { product_id } => commands::cart::add_product(cart, product_id).await,
        Command::Remove { product_id } => commands::cart::remove_product(cart, product_id).await,
        Command::Update { product_id, amount } => {
            commands::cart::update_product_amount(cart, product_id, amount).await
        }
        Command::Config { .. } => Err(CliError::internal("config is not a cart command")),
    }
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=rocketshoes_store=trace` - Trace the store only
/// - Default: `info,rocketshoes=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rocketshoes=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse(&["rocketshoes", "show"]), Command::Show);
        assert_eq!(
            parse(&["rocketshoes", "add", "3"]),
            Command::Add { product_id: 3 }
        );
        assert_eq!(
            parse(&["rocketshoes", "remove", "2"]),
            Command::Remove { product_id: 2 }
        );
        assert_eq!(
            parse(&["rocketshoes", "config", "--save"]),
            Command::Config { save: true }
        );
    }

    #[test]
    fn test_update_accepts_non_positive_amounts() {
        assert_eq!(
            parse(&["rocketshoes", "update", "1", "-2"]),
            Command::Update {
                product_id: 1,
                amount: -2
            }
        );
    }

    #[test]
    fn test_rejects_bad_product_id() {
        assert!(Cli::try_parse_from(["rocketshoes", "add", "abc"]).is_err());
        assert!(Cli::try_parse_from(["rocketshoes", "add", "-1"]).is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["rocketshoes", "show", "--config", "/tmp/c.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }
}
