//! CLI command definitions for the `roster` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a
//! noun-verb pattern (e.g., `roster team create`, `roster pr merge`).

pub mod pull_request;
pub mod team;
pub mod user;

use clap::{Parser, Subcommand};

/// Assign pull request reviewers from team rosters.
#[derive(Parser)]
#[command(name = "roster", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to the configured port).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to the configured host).
        #[arg(long)]
        host: Option<String>,
    },

    /// Manage teams.
    Team {
        #[command(subcommand)]
        action: team::TeamCommand,
    },

    /// Manage users.
    User {
        #[command(subcommand)]
        action: user::UserCommand,
    },

    /// Manage pull requests.
    #[command(alias = "pull-request")]
    Pr {
        #[command(subcommand)]
        action: pull_request::PrCommand,
    },
}

impl Commands {
    pub fn is_serve(&self) -> bool {
        matches!(self, Commands::Serve { .. })
    }
}

/// Print a value as pretty JSON.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["roster", "pr", "merge", "pr-1", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.command.is_serve());
    }

    #[test]
    fn test_serve_defaults_to_config() {
        let cli = Cli::try_parse_from(["roster", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { port, host } => {
                assert!(port.is_none());
                assert!(host.is_none());
            }
            _ => panic!("expected serve"),
        }
    }
}
