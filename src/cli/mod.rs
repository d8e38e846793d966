//! Command-line interface for anigate.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// anigate - anime catalog gateway
/// Normalizes Anilibria and Consumet behind one REST API
#[derive(Parser)]
#[command(name = "anigate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default search paths
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    #[command(alias = "s")]
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create default config file
    #[command(alias = "init")]
    InitConfig,

    /// Validate the effective configuration and exit
    CheckConfig,
}

impl Cli {
    #[must_use]
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::parse_from(["anigate"]);
        assert_eq!(cli.command(), Commands::Serve);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parses_subcommands() {
        let cli = Cli::parse_from(["anigate", "migrate"]);
        assert_eq!(cli.command(), Commands::Migrate);

        let cli = Cli::parse_from(["anigate", "--config", "/tmp/a.toml", "check-config"]);
        assert_eq!(cli.command(), Commands::CheckConfig);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/a.toml")));

        let cli = Cli::parse_from(["anigate", "init"]);
        assert_eq!(cli.command(), Commands::InitConfig);
    }
}
