//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "pocket-watch")]
#[command(about = "A state-managed HTTP server for a persistent stopwatch counter")]
#[command(version = "1.2.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "9421")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Path of the JSON file the counter is persisted to
    #[arg(short, long, default_value = "counter-store.json")]
    pub store: PathBuf,

    /// Keep the counter in memory only, skipping the store file
    #[arg(long)]
    pub ephemeral: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
