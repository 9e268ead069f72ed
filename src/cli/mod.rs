//! Command-line interface for Storefront.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

/// Storefront - a small product catalogue with user accounts
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default locations
    #[arg(long, short, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the web server (default)
    Serve,

    /// Create a default config file
    #[command(alias = "--init")]
    Init,
}

impl Cli {
    #[must_use]
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }

    /// Resolve the configuration for this invocation.
    ///
    /// An explicit `--config` path must exist unless the command is `init`,
    /// which is about to create it.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) if path.exists() => Config::load_from_path(path),
            Some(_) if self.command() == Commands::Init => Ok(Config::default()),
            Some(path) => anyhow::bail!("Config file not found: {}", path.display()),
            None => Config::load(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_is_default() {
        let cli = Cli::parse_from(["storefront"]);
        assert_eq!(cli.command(), Commands::Serve);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_init_with_config_path() {
        let cli = Cli::parse_from(["storefront", "init", "--config", "/tmp/sf.toml"]);
        assert_eq!(cli.command(), Commands::Init);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/sf.toml")));
    }

    #[test]
    fn test_missing_config_file_only_allowed_for_init() {
        let missing = std::env::temp_dir()
            .join(format!("storefront-missing-{}.toml", uuid::Uuid::new_v4()))
            .display()
            .to_string();

        let serve = Cli::parse_from(["storefront", "serve", "--config", &missing]);
        assert!(serve.load_config().is_err());

        let implicit = Cli::parse_from(["storefront", "--config", &missing]);
        assert!(implicit.load_config().is_err());

        let init = Cli::parse_from(["storefront", "init", "--config", &missing]);
        assert_eq!(init.load_config().unwrap().server.port, 5001);
    }

    #[test]
    fn test_existing_config_file_is_read() {
        let path =
            std::env::temp_dir().join(format!("storefront-cli-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[server]\nport = 7000\n").unwrap();

        let cli = Cli::parse_from(["storefront", "--config", path.to_str().unwrap()]);
        assert_eq!(cli.load_config().unwrap().server.port, 7000);

        let _ = std::fs::remove_file(&path);
    }
}
