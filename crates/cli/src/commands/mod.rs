//! Subcommand implementations.
//!
//! Every command fetches what it needs inside one scoped session, then
//! renders the records to the given writer as a text table or JSON.

use std::io::{self, Write};

use knuspr_client::KnusprError;
use serde::Serialize;
use thiserror::Error;

pub mod account;
pub mod cart;
pub mod delivery;
pub mod orders;
pub mod products;
mod table;

/// Errors a command can end with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Knuspr(#[from] KnusprError),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Knuspr(e) if e.is_authentication())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<(), CommandError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn format_price(value: f64) -> String {
    format!("{value:.2}")
}

fn price_or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), format_price)
}
