use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tasklane_config::DEFAULT_CONFIG_PATH;

#[derive(Debug, Parser)]
#[command(name = "tasklane", version, about = "Todo CRUD service")]
pub struct Cli {
    /// Path to the JSON config file.
    #[arg(long, env = "CONFIG_DIR", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default).
    #[default]
    Serve,
    /// Apply the embedded database migrations and exit.
    Migrate,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["tasklane", "--config", "custom.json"]).unwrap();

        assert_eq!(cli.config, PathBuf::from("custom.json"));
        assert_eq!(cli.command(), Command::Serve);
    }

    #[test]
    fn test_parses_migrate_subcommand() {
        let cli = Cli::try_parse_from(["tasklane", "--config", "c.json", "migrate"]).unwrap();

        assert_eq!(cli.command(), Command::Migrate);
    }

    #[test]
    fn test_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["tasklane", "--config", "c.json", "seed"]).is_err());
    }
}
