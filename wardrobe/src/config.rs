//! Command-line and environment configuration.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};

/// Wardrobe management REST API
#[derive(Parser, Debug, Clone)]
#[command(name = "wardrobe", author, version, about, long_about = None)]
pub struct Cli {
    /// Database connection string
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite://wardrobe.db?mode=rwc",
        global = true
    )]
    pub database_url: String,

    /// Address the HTTP server listens on
    #[arg(long, env = "WARDROBE_BIND", default_value = "0.0.0.0:3000", global = true)]
    pub bind: SocketAddr,

    /// Allowed CORS origins, comma separated. Empty allows any origin.
    #[arg(
        long,
        env = "WARDROBE_CORS_ORIGINS",
        value_delimiter = ',',
        global = true
    )]
    pub cors_origins: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Apply migrations and start the HTTP server (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Apply migrations and load the demo wardrobe
    Seed,
}

impl Cli {
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }

    /// Configured origins with blanks removed
    #[must_use]
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}
