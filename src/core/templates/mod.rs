//! Source-code emitters for generated Go files.
//!
//! Every emitter is a pure function of an [`EmitContext`]: same inputs,
//! same bytes. Emitters compute their own Go import lists through
//! [`GoImports`] so each produced file is self-contained.

pub mod container;
pub mod dto;
pub mod entity;
pub mod handler;
pub mod project;
pub mod repository;
pub mod service;

use crate::core::config::Config;
use crate::core::error::GocaError;
use crate::core::fields::Field;
use crate::core::naming;
use regex::Regex;
use std::collections::BTreeSet;

/// Every naming form of a feature, computed once per command.
#[derive(Clone, Debug)]
pub struct FeatureNames {
    /// The name as given on the command line (`OrderItem`).
    pub raw: String,
    /// Go type name (`OrderItem`).
    pub pascal: String,
    /// Go local-variable form (`orderItem`).
    pub camel: String,
    /// `order_item`
    pub snake: String,
    /// `order-item`
    pub kebab: String,
    /// `orderitem`
    pub flat: String,
    /// Human-readable form for messages (`order item`).
    pub human: String,
    /// Route segment and table name (`order_items`).
    pub plural_snake: String,
}

impl FeatureNames {
    pub fn new(feature: &str) -> Result<FeatureNames, GocaError> {
        let ident = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("static regex");
        if !ident.is_match(feature) {
            return Err(GocaError::InvalidArgument(format!(
                "feature name '{}' is not a valid identifier",
                feature
            )));
        }
        let snake = naming::to_snake(feature)?;
        Ok(FeatureNames {
            raw: feature.to_string(),
            pascal: naming::to_pascal(feature)?,
            camel: naming::to_camel(feature)?,
            kebab: naming::to_kebab(feature)?,
            flat: naming::to_lower(feature)?,
            human: snake.replace('_', " "),
            plural_snake: naming::pluralize(&snake),
            snake,
        })
    }

    /// Single-letter method receiver for the entity type.
    pub fn receiver(&self) -> String {
        self.flat.chars().take(1).collect()
    }

    /// Pluralized Go type stem (`OrderItems`), used in list DTO names.
    pub fn plural_pascal(&self) -> String {
        naming::to_pascal(&self.plural_snake).unwrap_or_else(|_| self.pascal.clone())
    }
}

/// Everything an emitter needs, passed explicitly.
pub struct EmitContext<'a> {
    pub config: &'a Config,
    pub names: &'a FeatureNames,
    pub fields: &'a [Field],
}

impl EmitContext<'_> {
    pub fn timestamps(&self) -> bool {
        self.config.database.features.timestamps
    }

    pub fn soft_delete(&self) -> bool {
        self.config.database.features.soft_delete
    }

    pub fn uuid_keys(&self) -> bool {
        self.config.database.features.uuid
    }

    pub fn validation(&self) -> bool {
        self.config.generation.validation.enabled
    }

    pub fn business_rules(&self) -> bool {
        self.config.generation.business_rules.enabled
    }

    pub fn module(&self) -> String {
        self.config.module_path()
    }

    /// Go spelling of the entity's primary-key type.
    pub fn id_type(&self) -> &'static str {
        if self.uuid_keys() { "string" } else { "uint" }
    }
}

/// Go import list, rendered grouped (standard / external / local-module)
/// and alphabetized within each group.
#[derive(Default)]
pub struct GoImports {
    module: String,
    std: BTreeSet<String>,
    external: BTreeSet<String>,
    local: BTreeSet<String>,
}

impl GoImports {
    pub fn new(module: &str) -> GoImports {
        GoImports {
            module: module.to_string(),
            ..GoImports::default()
        }
    }

    pub fn add(&mut self, path: &str) {
        let first = path.split('/').next().unwrap_or(path);
        if !self.module.is_empty() && path.starts_with(&self.module) {
            self.local.insert(path.to_string());
        } else if first.contains('.') {
            self.external.insert(path.to_string());
        } else {
            self.std.insert(path.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.std.is_empty() && self.external.is_empty() && self.local.is_empty()
    }

    /// Render the import declaration, or an empty string when no imports
    /// are needed (the declaration and its trailing blank line are both
    /// omitted so files like seed data stay import-free).
    pub fn render(&self) -> String {
        let total = self.std.len() + self.external.len() + self.local.len();
        if total == 0 {
            return String::new();
        }
        if total == 1 {
            let only = self
                .std
                .iter()
                .chain(self.external.iter())
                .chain(self.local.iter())
                .next()
                .expect("one import");
            return format!("import \"{}\"\n\n", only);
        }
        let mut groups = Vec::new();
        for set in [&self.std, &self.external, &self.local] {
            if set.is_empty() {
                continue;
            }
            let lines: Vec<String> = set.iter().map(|p| format!("\t\"{}\"", p)).collect();
            groups.push(lines.join("\n"));
        }
        format!("import (\n{}\n)\n\n", groups.join("\n\n"))
    }
}
