//! Goca: Clean Architecture scaffolding for Go backends
//!
//! **Goca generates cross-layer features that compile together as a unit.**
//!
//! One `goca feature` invocation emits a domain entity, its error
//! declarations, DTOs, a use-case service, a repository contract plus one
//! dialect-specific implementation, and the requested transport handlers.
//! It then wires the feature into the existing dependency-injection
//! container and server entry point without disturbing user edits.
//!
//! # Architecture
//!
//! - `cli`: clap surface; flags are `Option`-shaped so the config merge
//!   can distinguish "not passed" from "passed with the default value"
//! - `core::config`: defaults → `.goca.yaml` → explicit CLI flags, then
//!   validation; downstream code only sees validated configurations
//! - `core::templates`: pure emitters, one per generated file kind
//! - `core::orchestrator`: ordered multi-file emission per feature
//! - `core::integrator`: idempotent source mutation of `container.go` and
//!   `cmd/server/main.go` (marker comments, comment-aware entity walk)
//!
//! Generation is synchronous and single-threaded; the file system is the
//! only shared resource, and concurrent invocations on one project are
//! not supported.

mod cli;
pub mod core;

use crate::cli::{Cli, Command, ConfigCli, ConfigCommand, GenerateCli, InitCli};
use crate::core::config::{Config, FlagOverrides, CONFIG_FILE};
use crate::core::error::GocaError;
use crate::core::fields;
use crate::core::orchestrator::{self, GeneratedArtifact, Scope};
use crate::core::tui;
use crate::core::writer::FileAction;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

fn print_artifacts(artifacts: &[GeneratedArtifact]) {
    tui::print_section("Generated files");
    for artifact in artifacts {
        let status = match artifact.action {
            FileAction::Created => tui::ItemStatus::Created,
            FileAction::Overwritten => tui::ItemStatus::Updated,
            FileAction::Unchanged => tui::ItemStatus::Unchanged,
            FileAction::Skipped => tui::ItemStatus::Skipped,
        };
        tui::print_status_line(&artifact.rel_path, status);
    }
}

fn run_init(current_dir: &Path, args: InitCli) -> Result<(), GocaError> {
    let target_dir: PathBuf = match &args.name {
        Some(name) => current_dir.join(name),
        None => current_dir.to_path_buf(),
    };
    fs::create_dir_all(&target_dir)?;

    let mut config = Config::load(&target_dir)?;
    if let Some(name) = &args.name {
        config.project.name = name.clone();
    } else if let Some(dir_name) = target_dir.file_name().and_then(|n| n.to_str()) {
        config.project.name = dir_name.to_string();
    }
    config.merge_flags(&FlagOverrides {
        database: args.database.clone(),
        module: args.module.clone(),
        ..FlagOverrides::default()
    });
    config.validate()?;

    let artifacts = orchestrator::init_project(&target_dir, &config, args.force)?;
    print_artifacts(&artifacts);
    tui::success(&format!(
        "project {} initialized ({} dialect)",
        config.project.name,
        config.database_dialect().as_str()
    ));
    Ok(())
}

fn run_generate(project_root: &Path, args: GenerateCli, scope: Scope) -> Result<(), GocaError> {
    let overrides = args.overrides();
    let config = Config::effective(project_root, &overrides)?;
    let field_list = fields::parse_fields(&args.fields)?;

    let artifacts = orchestrator::generate(
        project_root,
        &config,
        &args.name,
        &field_list,
        scope,
        args.force,
    )?;
    print_artifacts(&artifacts);
    tui::success(&format!("{} generated", args.name));
    Ok(())
}

fn run_config(project_root: &Path, args: ConfigCli) -> Result<(), GocaError> {
    match args.command {
        ConfigCommand::Show { format } => {
            let config = Config::effective(project_root, &FlagOverrides::default())?;
            match format.as_str() {
                "yaml" => print!("{}", config.to_yaml()?),
                "json" => {
                    let rendered = serde_json::to_string_pretty(&config).map_err(|e| {
                        GocaError::Internal(format!("config serialization failed: {}", e))
                    })?;
                    println!("{}", rendered);
                }
                other => {
                    return Err(GocaError::InvalidArgument(format!(
                        "unknown config format '{}' (known: yaml, json)",
                        other
                    )));
                }
            }
            Ok(())
        }
        ConfigCommand::Init { force } => {
            let path = project_root.join(CONFIG_FILE);
            if path.exists() && !force {
                tui::warn(&format!(
                    "{} already exists; rerun with --force to overwrite",
                    CONFIG_FILE
                ));
                return Ok(());
            }
            fs::write(&path, Config::default().to_yaml()?)?;
            tui::success(&format!("{} written", CONFIG_FILE));
            Ok(())
        }
        ConfigCommand::Validate => {
            let config = Config::load(project_root)?;
            config.validate()?;
            tui::success("configuration is valid");
            Ok(())
        }
    }
}

pub fn run() -> Result<(), GocaError> {
    let cli = Cli::parse();
    let current_dir = std::env::current_dir()?;

    match cli.command {
        Command::Version => {
            // Simple output for scripts/parsing.
            println!("v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Init(args) => run_init(&current_dir, args),
        Command::Feature(args) => run_generate(&current_dir, args, Scope::Feature),
        Command::Entity(args) => run_generate(&current_dir, args, Scope::Entity),
        Command::Usecase(args) => run_generate(&current_dir, args, Scope::Usecase),
        Command::Repository(args) => run_generate(&current_dir, args, Scope::Repository),
        Command::Handler(args) => run_generate(&current_dir, args, Scope::Handler),
        Command::Config(args) => run_config(&current_dir, args),
    }
}
