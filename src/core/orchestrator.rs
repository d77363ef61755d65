//! Feature orchestration: the pipeline that turns a feature name and field
//! list into a coherent cross-layer file set, then hands off to the
//! integrator.
//!
//! Files are emitted in a fixed order (domain → errors → seeds → tests →
//! DTO → service → repository interface → repository implementation →
//! handlers → container → entry file) because the integrator assumes the
//! earlier artifacts exist. The first write error aborts the pipeline; no
//! rollback is attempted, since the workspace is the user's source of truth.

use crate::core::config::{Config, HandlerKind};
use crate::core::error::GocaError;
use crate::core::fields::Field;
use crate::core::integrator::{self, IntegrationOutcome};
use crate::core::naming::{self, NamingConvention};
use crate::core::templates::{
    container, dto, entity, handler, repository, service, EmitContext, FeatureNames,
};
use crate::core::tui;
use crate::core::writer::{self, FileAction, WriteOptions};
use std::path::Path;

/// One produced file, reported back for display.
#[derive(Clone, Debug)]
pub struct GeneratedArtifact {
    pub rel_path: String,
    pub action: FileAction,
}

/// Which layers a command generates.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scope {
    /// All layers plus integration (the `feature` command).
    Feature,
    /// Domain layer only (the `entity` command).
    Entity,
    /// DTOs and service (the `usecase` command).
    Usecase,
    /// Repository contract and implementation (the `repository` command).
    Repository,
    /// Transport handlers only (the `handler` command).
    Handler,
}

fn compound(parts: &[&str], convention: NamingConvention) -> Result<String, GocaError> {
    naming::convert(&parts.join("_"), convention)
}

struct FilePlan {
    base: String,
    convention: NamingConvention,
}

impl FilePlan {
    fn new(names: &FeatureNames, convention: NamingConvention) -> Result<FilePlan, GocaError> {
        Ok(FilePlan {
            base: naming::convert(&names.raw, convention)?,
            convention,
        })
    }

    fn with_suffix(&self, names: &FeatureNames, suffix: &str) -> Result<String, GocaError> {
        compound(&[&names.snake, suffix], self.convention)
    }
}

fn record(
    opts: &WriteOptions,
    artifacts: &mut Vec<GeneratedArtifact>,
    rel_path: String,
    content: &str,
) -> Result<(), GocaError> {
    let action = writer::write_file(opts, &rel_path, content)?;
    if action == FileAction::Overwritten && !opts.force {
        tui::warn(&format!("overwriting existing file {}", rel_path));
    }
    artifacts.push(GeneratedArtifact { rel_path, action });
    Ok(())
}

fn integration_action(outcome: IntegrationOutcome) -> FileAction {
    match outcome {
        IntegrationOutcome::Created => FileAction::Created,
        IntegrationOutcome::Updated => FileAction::Overwritten,
        IntegrationOutcome::Unchanged => FileAction::Unchanged,
        IntegrationOutcome::Skipped => FileAction::Skipped,
    }
}

/// Generate the files for one feature at `scope`, returning the artifact
/// list in emission order.
pub fn generate(
    project_root: &Path,
    config: &Config,
    feature: &str,
    fields: &[Field],
    scope: Scope,
    force: bool,
) -> Result<Vec<GeneratedArtifact>, GocaError> {
    if fields.is_empty() {
        return Err(GocaError::InvalidArgument(
            "at least one field is required to generate a feature".to_string(),
        ));
    }
    let names = FeatureNames::new(feature)?;
    let ctx = EmitContext {
        config,
        names: &names,
        fields,
    };
    let convention = config.file_naming();
    let plan = FilePlan::new(&names, convention)?;
    let opts = WriteOptions {
        project_root: project_root.to_path_buf(),
        force,
        dry_run: false,
    };

    let domain_dir = config.domain_path();
    let usecase_dir = config.usecase_path();
    let repository_dir = config.repository_path();
    let handler_dir = config.handler_path();

    let mut artifacts = Vec::new();

    if matches!(scope, Scope::Feature | Scope::Entity) {
        record(
            &opts,
            &mut artifacts,
            format!("{}/{}.go", domain_dir, plan.base),
            &entity::render_entity(&ctx),
        )?;

        let errors_rel = format!("{}/errors.go", domain_dir);
        let outcome = integrator::ensure_block(
            &project_root.join(&errors_rel),
            &entity::errors_marker(&ctx),
            &entity::render_errors_header(),
            &entity::render_errors_block(&ctx),
        )?;
        artifacts.push(GeneratedArtifact {
            rel_path: errors_rel,
            action: integration_action(outcome),
        });

        record(
            &opts,
            &mut artifacts,
            format!("{}/{}.go", domain_dir, plan.with_suffix(&names, "seeds")?),
            &entity::render_seeds(&ctx),
        )?;

        if config.generation.tests.enabled {
            // Go only picks up files ending in `_test.go`, whatever the
            // configured file-name convention says.
            record(
                &opts,
                &mut artifacts,
                format!("{}/{}_test.go", domain_dir, plan.base),
                &entity::render_entity_test(&ctx),
            )?;
        }
    }

    if matches!(scope, Scope::Feature | Scope::Usecase) {
        record(
            &opts,
            &mut artifacts,
            format!("{}/dto/{}.go", usecase_dir, plan.with_suffix(&names, "dto")?),
            &dto::render_dto(&ctx),
        )?;
        record(
            &opts,
            &mut artifacts,
            format!("{}/{}.go", usecase_dir, plan.with_suffix(&names, "service")?),
            &service::render_service(&ctx),
        )?;
    }

    if matches!(scope, Scope::Feature | Scope::Repository) {
        let interfaces_rel = format!("{}/interfaces.go", repository_dir);
        let outcome = integrator::ensure_block(
            &project_root.join(&interfaces_rel),
            &repository::interface_marker(&ctx),
            &repository::render_interfaces_header(&ctx),
            &repository::render_interface_block(&ctx),
        )?;
        artifacts.push(GeneratedArtifact {
            rel_path: interfaces_rel,
            action: integration_action(outcome),
        });

        let dialect = config.database_dialect();
        let impl_base = compound(
            &[dialect.as_str(), &names.snake, "repository"],
            convention,
        )?;
        record(
            &opts,
            &mut artifacts,
            format!("{}/{}.go", repository_dir, impl_base),
            &repository::render_implementation(&ctx, dialect),
        )?;
    }

    if matches!(scope, Scope::Feature | Scope::Handler) {
        for kind in config.handler_kinds() {
            match kind {
                HandlerKind::Http => {
                    record(
                        &opts,
                        &mut artifacts,
                        format!(
                            "{}/http/{}.go",
                            handler_dir,
                            plan.with_suffix(&names, "handler")?
                        ),
                        &handler::render_http_handler(&ctx),
                    )?;
                    record(
                        &opts,
                        &mut artifacts,
                        format!(
                            "{}/http/{}.go",
                            handler_dir,
                            plan.with_suffix(&names, "routes")?
                        ),
                        &handler::render_http_routes(&ctx),
                    )?;
                }
                HandlerKind::Grpc => {
                    record(
                        &opts,
                        &mut artifacts,
                        format!("{}/grpc/{}.proto", handler_dir, plan.base),
                        &handler::render_proto(&ctx),
                    )?;
                    record(
                        &opts,
                        &mut artifacts,
                        format!(
                            "{}/grpc/{}.go",
                            handler_dir,
                            plan.with_suffix(&names, "server")?
                        ),
                        &handler::render_grpc_server(&ctx),
                    )?;
                }
                HandlerKind::Cli => {
                    record(
                        &opts,
                        &mut artifacts,
                        format!(
                            "{}/cli/{}.go",
                            handler_dir,
                            plan.with_suffix(&names, "cli")?
                        ),
                        &handler::render_cli_handler(&ctx),
                    )?;
                }
                HandlerKind::Worker => {
                    record(
                        &opts,
                        &mut artifacts,
                        format!(
                            "{}/worker/{}.go",
                            handler_dir,
                            plan.with_suffix(&names, "worker")?
                        ),
                        &handler::render_worker_handler(&ctx),
                    )?;
                }
                HandlerKind::Soap => {
                    record(
                        &opts,
                        &mut artifacts,
                        format!(
                            "{}/soap/{}.go",
                            handler_dir,
                            plan.with_suffix(&names, "soap")?
                        ),
                        &handler::render_soap_handler(&ctx),
                    )?;
                }
            }
        }
    }

    if scope == Scope::Feature {
        for (rel_path, outcome) in integrator::integrate_feature(project_root, &ctx)? {
            artifacts.push(GeneratedArtifact {
                rel_path,
                action: integration_action(outcome),
            });
        }
    }

    Ok(artifacts)
}

/// Scaffold a fresh project (`goca init`): go.mod, the server entry point,
/// the empty DI container, the layer directories, and `.goca.yaml`.
pub fn init_project(
    project_root: &Path,
    config: &Config,
    force: bool,
) -> Result<Vec<GeneratedArtifact>, GocaError> {
    use crate::core::templates::project;

    let opts = WriteOptions {
        project_root: project_root.to_path_buf(),
        force,
        dry_run: false,
    };
    let mut artifacts = Vec::new();

    record(&opts, &mut artifacts, "go.mod".to_string(), &project::render_go_mod(config))?;
    record(
        &opts,
        &mut artifacts,
        "cmd/server/main.go".to_string(),
        &project::render_main(config),
    )?;
    record(
        &opts,
        &mut artifacts,
        "internal/di/container.go".to_string(),
        &container::render_empty_container(config),
    )?;
    record(
        &opts,
        &mut artifacts,
        ".goca.yaml".to_string(),
        &config.to_yaml()?,
    )?;

    for dir in [
        config.domain_path(),
        format!("{}/dto", config.usecase_path()),
        config.repository_path(),
        format!("{}/http", config.handler_path()),
    ] {
        std::fs::create_dir_all(project_root.join(dir))?;
    }

    Ok(artifacts)
}
