//! CLI struct definitions for the Goca command-line interface.
//!
//! All clap-derived types live here. Dispatch logic lives in `lib.rs`.
//!
//! Every config-affecting flag is an `Option`: clap leaves it `None` when
//! the user did not pass it, which is what lets the configuration merge
//! stay sparse (a flag at its default never overrides `.goca.yaml`).
//! Boolean flags take an optional value, so `--validation` means
//! `--validation true` and `--validation false` stays expressible.

use crate::core::config::FlagOverrides;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(
    name = "goca",
    version = env!("CARGO_PKG_VERSION"),
    about = "Goca scaffolds Go backend projects with Clean Architecture layering: entities, use cases, repositories, transport handlers, and the wiring between them. 🦀",
    disable_version_flag = true
)]
pub(crate) struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Print the version
    Version,
    /// Scaffold a new Clean Architecture project
    Init(InitCli),
    /// Generate a complete feature across all layers and wire it up
    Feature(GenerateCli),
    /// Generate only the domain entity files for a feature
    Entity(GenerateCli),
    /// Generate only the DTOs and use-case service for a feature
    Usecase(GenerateCli),
    /// Generate only the repository contract and implementation
    Repository(GenerateCli),
    /// Generate only the transport handler files
    Handler(GenerateCli),
    /// Inspect or manage the project configuration
    Config(ConfigCli),
}

#[derive(clap::Args, Debug)]
pub(crate) struct InitCli {
    /// Project name; when given, the project is created in ./<name>
    pub name: Option<String>,
    /// Go module path (defaults to the project name)
    #[clap(long)]
    pub module: Option<String>,
    /// Target database dialect (postgres, mysql, mongodb, sqlite)
    #[clap(long)]
    pub database: Option<String>,
    /// Overwrite existing files without warnings
    #[clap(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug)]
pub(crate) struct GenerateCli {
    /// Feature name, e.g. User or OrderItem
    pub name: String,
    /// Comma-separated name:type field list, e.g. "name:string,price:float64"
    #[clap(long)]
    pub fields: String,
    /// Target database dialect (postgres, mysql, mongodb, sqlite)
    #[clap(long)]
    pub database: Option<String>,
    /// Transport handlers to emit (http, grpc, cli, worker, soap)
    #[clap(long, value_delimiter = ',')]
    pub handlers: Option<Vec<String>>,
    /// Emit validation tags and Validate methods
    #[clap(long, num_args = 0..=1, default_missing_value = "true")]
    pub validation: Option<bool>,
    /// Emit additional domain business-rule methods
    #[clap(long = "business-rules", num_args = 0..=1, default_missing_value = "true")]
    pub business_rules: Option<bool>,
    /// Include a deletion timestamp and soft-delete helpers
    #[clap(long = "soft-delete", num_args = 0..=1, default_missing_value = "true")]
    pub soft_delete: Option<bool>,
    /// Include created-at and updated-at fields
    #[clap(long, num_args = 0..=1, default_missing_value = "true")]
    pub timestamps: Option<bool>,
    /// Generate the entity unit-test file
    #[clap(long, num_args = 0..=1, default_missing_value = "true")]
    pub tests: Option<bool>,
    /// Go module path used to form local imports
    #[clap(long)]
    pub module: Option<String>,
    /// Overwrite existing files without warnings
    #[clap(long)]
    pub force: bool,
}

impl GenerateCli {
    /// Only flags the user actually passed make it into the overlay.
    pub fn overrides(&self) -> FlagOverrides {
        FlagOverrides {
            database: self.database.clone(),
            handlers: self.handlers.clone(),
            validation: self.validation,
            business_rules: self.business_rules,
            soft_delete: self.soft_delete,
            timestamps: self.timestamps,
            tests: self.tests,
            module: self.module.clone(),
        }
    }
}

#[derive(clap::Args, Debug)]
pub(crate) struct ConfigCli {
    #[clap(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ConfigCommand {
    /// Print the effective configuration (defaults merged with .goca.yaml)
    Show {
        /// Output format: 'yaml' or 'json'
        #[clap(long, default_value = "yaml")]
        format: String,
    },
    /// Write a .goca.yaml with the default configuration
    Init {
        /// Overwrite an existing .goca.yaml
        #[clap(long)]
        force: bool,
    },
    /// Validate the project's .goca.yaml and report every problem
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_unpassed_flags_stay_none() {
        let cli = Cli::parse_from(["goca", "feature", "User", "--fields", "name:string"]);
        let Command::Feature(args) = cli.command else {
            panic!("expected feature command");
        };
        let overrides = args.overrides();
        assert!(overrides.database.is_none());
        assert!(overrides.validation.is_none());
        assert!(overrides.changed().is_empty());
    }

    #[test]
    fn test_bare_boolean_flag_means_true() {
        let cli = Cli::parse_from([
            "goca",
            "feature",
            "User",
            "--fields",
            "name:string",
            "--soft-delete",
            "--validation",
            "false",
        ]);
        let Command::Feature(args) = cli.command else {
            panic!("expected feature command");
        };
        assert_eq!(args.soft_delete, Some(true));
        assert_eq!(args.validation, Some(false));
    }

    #[test]
    fn test_handlers_split_on_commas() {
        let cli = Cli::parse_from([
            "goca",
            "feature",
            "User",
            "--fields",
            "name:string",
            "--handlers",
            "http,grpc",
        ]);
        let Command::Feature(args) = cli.command else {
            panic!("expected feature command");
        };
        assert_eq!(
            args.handlers,
            Some(vec!["http".to_string(), "grpc".to_string()])
        );
    }
}
