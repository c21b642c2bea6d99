//! Command line interface.
//!
//! `estimate` prices one workflow and prints the result; `serve` exposes the
//! same pipeline over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;

/// Estimate what a finished CircleCI workflow cost.
#[derive(Debug, Parser)]
#[command(name = "workflow-cost-estimator", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Enable debug logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate the cost of one workflow.
    Estimate {
        /// Workflow ID (UUID from the CircleCI UI or API).
        workflow_id: String,

        /// Organization or user that owns the project.
        #[arg(long = "project-user")]
        project_user: String,

        /// Project (repository) name.
        #[arg(long = "project-name")]
        project_name: String,

        /// Version control system: github, gh, bitbucket or bb.
        #[arg(long = "project-vcs", default_value = "github")]
        project_vcs: String,

        /// API token. Defaults to CIRCLE_TOKEN or the config file.
        #[arg(long)]
        token: Option<String>,

        /// Provider host, for CircleCI server installs.
        #[arg(long = "circle-url")]
        circle_url: Option<String>,

        /// Print the JSON response body instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Serve estimates over HTTP at `GET /estimate`.
    Serve {
        /// Address to listen on.
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_estimate_subcommand() {
        let cli = Cli::parse_from([
            "workflow-cost-estimator",
            "estimate",
            "5034460f-c7c4-4c43-9457-de07e2029e7b",
            "--project-user",
            "acme",
            "--project-name",
            "widgets",
        ]);
        match cli.command {
            Command::Estimate {
                workflow_id,
                project_user,
                project_name,
                project_vcs,
                token,
                circle_url,
                json,
            } => {
                assert_eq!(workflow_id, "5034460f-c7c4-4c43-9457-de07e2029e7b");
                assert_eq!(project_user, "acme");
                assert_eq!(project_name, "widgets");
                assert_eq!(project_vcs, "github");
                assert!(token.is_none());
                assert!(circle_url.is_none());
                assert!(!json);
            }
            _ => panic!("expected Estimate command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "workflow-cost-estimator",
            "--config",
            "/etc/estimator.toml",
            "--verbose",
            "serve",
            "--addr",
            "0.0.0.0:8080",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("/etc/estimator.toml"));
        match cli.command {
            Command::Serve { addr } => assert_eq!(addr.port(), 8080),
            _ => panic!("expected Serve command"),
        }
    }

    #[test]
    fn config_defaults_to_estimator_toml() {
        let cli = Cli::parse_from(["workflow-cost-estimator", "serve"]);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(cli.config, PathBuf::from("estimator.toml"));
        assert!(!cli.verbose);
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
