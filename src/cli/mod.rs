//! CLI interface for jepx-spot
//!
//! Provides subcommands for:
//! - `serve`: Run the price query API
//! - `ingest`: Ingest tomorrow's prices once (run by the scheduler)
//! - `config`: Show the effective configuration

mod ingest;
mod serve;

pub use ingest::IngestArgs;
pub use serve::ServeArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "jepx-spot")]
#[command(about = "Daily JEPX spot price ingestion job and query API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the price query API
    Serve(ServeArgs),
    /// Ingest tomorrow's spot prices
    Ingest(IngestArgs),
    /// Show the effective configuration
    Config,
}
