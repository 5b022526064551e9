use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "wireless-calc")]
#[command(about = "Wireless network calculators with AI-generated explanations", version)]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the Erlang-B table path from config
    #[arg(long)]
    pub table: Option<String>,

    /// Skip the AI explanation call
    #[arg(long)]
    pub no_explain: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run one calculation and print the response envelope
    Calculate {
        /// wireless | ofdm | linkbudget | cellular
        scenario: String,

        /// JSON request body (reads stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Pretty-print the response
        #[arg(long)]
        pretty: bool,
    },

    /// Look up the channels needed for a traffic load in the Erlang-B table
    Lookup {
        /// Grade of Service as a fraction, e.g. 0.02
        #[arg(long)]
        gos: f64,

        /// Offered traffic in Erlang
        #[arg(long)]
        traffic: f64,
    },

    /// Report service status and table dimensions
    Health,
}
