//! Knuspr CLI - Grocery shopping on Knuspr.de from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Search the catalogue
//! knuspr search "Bio Milch" --limit 5
//!
//! # Manage the cart
//! knuspr cart
//! knuspr add 1234567 --quantity 2
//! knuspr remove <order-field-id>
//!
//! # Delivery and orders
//! knuspr slots
//! knuspr orders --limit 10
//! knuspr order 12345678
//!
//! # Any command as JSON
//! knuspr --json cart
//! ```
//!
//! # Environment Variables
//!
//! - `KNUSPR_USERNAME` - Account email
//! - `KNUSPR_PASSWORD` - Account password
//! - `KNUSPR_DEBUG` - Verbose logging, same as `--debug`
//! - `RUST_LOG` - Overrides the log filter entirely

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::{self, Write};

use clap::{Parser, Subcommand};
use knuspr_client::{DEFAULT_ADD_QUANTITY, KnusprClient, KnusprConfig, KnusprError};
use knuspr_core::ProductId;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{CommandError, OutputFormat};

#[derive(Parser)]
#[command(name = "knuspr")]
#[command(author, version, about = "Knuspr.de grocery ordering CLI")]
struct Cli {
    /// Verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Print records as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for products
    Search {
        query: String,

        /// Max results
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Show current cart contents
    Cart,
    /// Add a product to the cart
    Add {
        product_id: i64,

        /// Quantity to add
        #[arg(long, default_value_t = DEFAULT_ADD_QUANTITY)]
        quantity: u32,
    },
    /// Remove an item from the cart by its order field ID (see `knuspr cart`)
    Remove { order_field_id: String },
    /// Show available delivery time slots
    Slots,
    /// Show order history
    Orders {
        /// Number of orders to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Show orders that have not been delivered yet
    Upcoming,
    /// Show details for a specific order
    Order { order_id: String },
    /// Show account information
    Account,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = KnusprConfig::from_env();
    let debug = cli.debug || config.as_ref().is_ok_and(|config| config.debug);
    init_tracing(debug);

    let result = match config {
        Ok(config) => run(cli, config.with_debug(debug)).await,
        Err(e) => Err(KnusprError::from(e).into()),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        report(&e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays parseable with `--json`.
fn init_tracing(debug: bool) {
    let default_filter = if debug { "knuspr=debug" } else { "knuspr=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli, config: KnusprConfig) -> Result<(), CommandError> {
    let mut client = KnusprClient::new(config);
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mut out = io::stdout();

    match cli.command {
        Commands::Search { query, limit } => {
            commands::products::search(&mut client, query, limit, format, &mut out).await
        }
        Commands::Cart => commands::cart::show(&mut client, format, &mut out).await,
        Commands::Add {
            product_id,
            quantity,
        } => {
            commands::cart::add(
                &mut client,
                ProductId::new(product_id),
                quantity,
                format,
                &mut out,
            )
            .await
        }
        Commands::Remove { order_field_id } => {
            commands::cart::remove(&mut client, order_field_id, format, &mut out).await
        }
        Commands::Slots => commands::delivery::slots(&mut client, format, &mut out).await,
        Commands::Orders { limit } => {
            commands::orders::history(&mut client, limit, format, &mut out).await
        }
        Commands::Upcoming => commands::orders::upcoming(&mut client, format, &mut out).await,
        Commands::Order { order_id } => {
            commands::orders::detail(&mut client, order_id, format, &mut out).await
        }
        Commands::Account => commands::account::show(&mut client, format, &mut out).await,
    }
}

fn report(error: &CommandError) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "Error: {error}");
    if error.is_authentication() {
        let _ = writeln!(
            stderr,
            "Authentication failed. Check KNUSPR_USERNAME and KNUSPR_PASSWORD."
        );
    }
}
