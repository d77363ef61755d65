//! Project configuration: defaults, `.goca.yaml`, and CLI flag overlay.
//!
//! The effective configuration is built from three ordered sources:
//! built-in defaults, the project's `.goca.yaml` (present keys only), and
//! CLI flags the user actually passed. The flag overlay is *sparse*: every
//! config-affecting flag is an `Option`, and only `Some` values are copied
//! onto the config. A flag left at its default never overwrites a YAML
//! setting; that distinction is load-bearing and must not be flattened
//! into a plain key-value map.

use crate::core::error::GocaError;
use crate::core::naming::NamingConvention;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration file name, resolved against the project root.
pub const CONFIG_FILE: &str = ".goca.yaml";

/// Database backend variant. Governs the repository implementation emitted
/// and the dialect prefix in repository file names.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DatabaseDialect {
    Postgres,
    Mysql,
    Mongodb,
    Sqlite,
}

impl DatabaseDialect {
    pub const KNOWN: &'static [&'static str] = &["postgres", "mysql", "mongodb", "sqlite"];

    pub fn parse(s: &str) -> Option<DatabaseDialect> {
        match s {
            "postgres" => Some(DatabaseDialect::Postgres),
            "mysql" => Some(DatabaseDialect::Mysql),
            "mongodb" => Some(DatabaseDialect::Mongodb),
            "sqlite" => Some(DatabaseDialect::Sqlite),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseDialect::Postgres => "postgres",
            DatabaseDialect::Mysql => "mysql",
            DatabaseDialect::Mongodb => "mongodb",
            DatabaseDialect::Sqlite => "sqlite",
        }
    }
}

/// Transport adapters that can be generated for a feature.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HandlerKind {
    Http,
    Grpc,
    Cli,
    Worker,
    Soap,
}

impl HandlerKind {
    pub const KNOWN: &'static [&'static str] = &["http", "grpc", "cli", "worker", "soap"];

    pub fn parse(s: &str) -> Option<HandlerKind> {
        match s {
            "http" => Some(HandlerKind::Http),
            "grpc" => Some(HandlerKind::Grpc),
            "cli" => Some(HandlerKind::Cli),
            "worker" => Some(HandlerKind::Worker),
            "soap" => Some(HandlerKind::Soap),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::Http => "http",
            HandlerKind::Grpc => "grpc",
            HandlerKind::Cli => "cli",
            HandlerKind::Worker => "worker",
            HandlerKind::Soap => "soap",
        }
    }
}

const TEST_FRAMEWORKS: &[&str] = &["testify", "ginkgo", "gotest"];
const AUTH_TYPES: &[&str] = &["jwt", "oauth", "session"];

fn default_true() -> bool {
    true
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    /// Go module path; used to construct local import paths.
    pub module: String,
    pub version: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            name: "myapp".to_string(),
            module: String::new(),
            version: "0.1.0".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseFeatures {
    pub timestamps: bool,
    pub soft_delete: bool,
    pub uuid: bool,
}

impl Default for DatabaseFeatures {
    fn default() -> Self {
        DatabaseFeatures {
            timestamps: true,
            soft_delete: false,
            uuid: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u32,
    pub max_open: u32,
    pub max_idle: u32,
    pub ssl_mode: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            host: "localhost".to_string(),
            port: 5432,
            max_open: 25,
            max_idle: 5,
            ssl_mode: "disable".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    #[serde(rename = "type")]
    pub kind: Dialect,
    pub features: DatabaseFeatures,
    pub connection: ConnectionConfig,
}

/// Dialect held as its YAML spelling so validation can aggregate errors
/// instead of failing at the first unknown value during deserialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dialect(pub String);

impl Default for Dialect {
    fn default() -> Self {
        Dialect("postgres".to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub enabled: bool,
    pub library: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig {
            enabled: true,
            library: "validator".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toggle {
    pub enabled: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentationConfig {
    pub swagger: Toggle,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestsConfig {
    pub enabled: bool,
    pub framework: String,
    pub coverage_threshold: u32,
}

impl Default for TestsConfig {
    fn default() -> Self {
        TestsConfig {
            enabled: true,
            framework: "testify".to_string(),
            coverage_threshold: 80,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub validation: ValidationConfig,
    pub business_rules: Toggle,
    pub documentation: DocumentationConfig,
    pub tests: TestsConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub path: String,
}

impl Default for LayerConfig {
    fn default() -> Self {
        LayerConfig {
            enabled: true,
            path: String::new(),
        }
    }
}

fn layer(path: &str) -> LayerConfig {
    LayerConfig {
        enabled: true,
        path: path.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayersConfig {
    pub domain: LayerConfig,
    pub usecase: LayerConfig,
    pub repository: LayerConfig,
    pub handler: LayerConfig,
}

impl Default for LayersConfig {
    fn default() -> Self {
        LayersConfig {
            domain: layer("internal/domain"),
            usecase: layer("internal/usecase"),
            repository: layer("internal/repository"),
            handler: layer("internal/handler"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiConfig {
    #[serde(rename = "type")]
    pub kind: String,
}

impl Default for DiConfig {
    fn default() -> Self {
        DiConfig {
            kind: "manual".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub files: String,
    pub entities: String,
    pub fields: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        NamingConfig {
            files: "snake_case".to_string(),
            entities: "PascalCase".to_string(),
            fields: "snake_case".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchitectureConfig {
    pub layers: LayersConfig,
    pub di: DiConfig,
    pub naming: NamingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            enabled: false,
            kind: "jwt".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    pub handlers: Vec<String>,
    pub auth: AuthConfig,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        FeaturesConfig {
            handlers: vec!["http".to_string()],
            auth: AuthConfig::default(),
        }
    }
}

/// The full `.goca.yaml` schema.
///
/// Unknown top-level keys are rejected; missing keys at any depth take
/// defaults, which is what gives YAML-over-defaults deep-merge semantics.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub project: ProjectConfig,
    pub database: DatabaseConfig,
    pub generation: GenerationConfig,
    pub architecture: ArchitectureConfig,
    pub features: FeaturesConfig,
}

/// CLI flags that may override configuration, captured sparsely.
///
/// `None` means the user did not pass the flag; only `Some` values are
/// merged. Never convert this into a plain map: "absent" and
/// "present-with-default-value" must stay distinguishable.
#[derive(Clone, Debug, Default)]
pub struct FlagOverrides {
    pub database: Option<String>,
    pub handlers: Option<Vec<String>>,
    pub validation: Option<bool>,
    pub business_rules: Option<bool>,
    pub soft_delete: Option<bool>,
    pub timestamps: Option<bool>,
    pub tests: Option<bool>,
    pub module: Option<String>,
}

impl FlagOverrides {
    /// Names of the flags that were explicitly set, for diagnostics.
    pub fn changed(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.database.is_some() {
            out.push("database");
        }
        if self.handlers.is_some() {
            out.push("handlers");
        }
        if self.validation.is_some() {
            out.push("validation");
        }
        if self.business_rules.is_some() {
            out.push("business-rules");
        }
        if self.soft_delete.is_some() {
            out.push("soft-delete");
        }
        if self.timestamps.is_some() {
            out.push("timestamps");
        }
        if self.tests.is_some() {
            out.push("tests");
        }
        if self.module.is_some() {
            out.push("module");
        }
        out
    }
}

impl Config {
    /// Load defaults merged with `.goca.yaml` when present.
    pub fn load(project_root: &Path) -> Result<Config, GocaError> {
        let path = project_root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }
        let raw = fs::read_to_string(&path)?;
        serde_yaml::from_str(&raw)
            .map_err(|e| GocaError::Configuration(vec![format!("{}: {}", CONFIG_FILE, e)]))
    }

    /// Sparse overlay of explicitly passed CLI flags.
    pub fn merge_flags(&mut self, flags: &FlagOverrides) {
        if let Some(database) = &flags.database {
            self.database.kind = Dialect(database.clone());
        }
        if let Some(handlers) = &flags.handlers {
            self.features.handlers = handlers.clone();
        }
        if let Some(validation) = flags.validation {
            self.generation.validation.enabled = validation;
        }
        if let Some(business_rules) = flags.business_rules {
            self.generation.business_rules.enabled = business_rules;
        }
        if let Some(soft_delete) = flags.soft_delete {
            self.database.features.soft_delete = soft_delete;
        }
        if let Some(timestamps) = flags.timestamps {
            self.database.features.timestamps = timestamps;
        }
        if let Some(tests) = flags.tests {
            self.generation.tests.enabled = tests;
        }
        if let Some(module) = &flags.module {
            self.project.module = module.clone();
        }
    }

    /// Validate the merged configuration, reporting every offending path.
    pub fn validate(&self) -> Result<(), GocaError> {
        let mut issues = Vec::new();

        if DatabaseDialect::parse(&self.database.kind.0).is_none() {
            issues.push(format!(
                "database.type: unknown dialect '{}' (known: {})",
                self.database.kind.0,
                DatabaseDialect::KNOWN.join(", ")
            ));
        }
        for handler in &self.features.handlers {
            if HandlerKind::parse(handler).is_none() {
                issues.push(format!(
                    "features.handlers: unknown handler kind '{}' (known: {})",
                    handler,
                    HandlerKind::KNOWN.join(", ")
                ));
            }
        }
        if NamingConvention::parse(&self.architecture.naming.files).is_none() {
            issues.push(format!(
                "architecture.naming.files: unknown naming convention '{}' (known: {})",
                self.architecture.naming.files,
                NamingConvention::KNOWN.join(", ")
            ));
        }
        if self.features.auth.enabled && !AUTH_TYPES.contains(&self.features.auth.kind.as_str()) {
            issues.push(format!(
                "features.auth.type: unknown auth type '{}' (known: {})",
                self.features.auth.kind,
                AUTH_TYPES.join(", ")
            ));
        }
        if self.database.connection.port == 0 || self.database.connection.port > 65535 {
            issues.push(format!(
                "database.connection.port: {} is outside 1-65535",
                self.database.connection.port
            ));
        }
        if self.generation.tests.coverage_threshold > 100 {
            issues.push(format!(
                "generation.tests.coverage_threshold: {} is outside 0-100",
                self.generation.tests.coverage_threshold
            ));
        }
        if !TEST_FRAMEWORKS.contains(&self.generation.tests.framework.as_str()) {
            issues.push(format!(
                "generation.tests.framework: unknown framework '{}' (known: {})",
                self.generation.tests.framework,
                TEST_FRAMEWORKS.join(", ")
            ));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(GocaError::Configuration(issues))
        }
    }

    /// The effective configuration: defaults → YAML → explicit flags →
    /// validation, in that order. Generation code only ever receives a
    /// `Config` produced here, so it can assume the enum accessors below
    /// are total.
    pub fn effective(project_root: &Path, flags: &FlagOverrides) -> Result<Config, GocaError> {
        let mut config = Config::load(project_root)?;
        config.merge_flags(flags);
        config.validate()?;
        Ok(config)
    }

    pub fn database_dialect(&self) -> DatabaseDialect {
        DatabaseDialect::parse(&self.database.kind.0).unwrap_or(DatabaseDialect::Postgres)
    }

    pub fn handler_kinds(&self) -> Vec<HandlerKind> {
        self.features
            .handlers
            .iter()
            .filter_map(|h| HandlerKind::parse(h))
            .collect()
    }

    pub fn file_naming(&self) -> NamingConvention {
        NamingConvention::parse(&self.architecture.naming.files)
            .unwrap_or(NamingConvention::Snake)
    }

    /// Go module path used for local imports. Falls back to the project
    /// name so generated imports are never empty.
    pub fn module_path(&self) -> String {
        if self.project.module.is_empty() {
            self.project.name.clone()
        } else {
            self.project.module.clone()
        }
    }

    pub fn domain_path(&self) -> String {
        non_empty_or(&self.architecture.layers.domain.path, "internal/domain")
    }

    pub fn usecase_path(&self) -> String {
        non_empty_or(&self.architecture.layers.usecase.path, "internal/usecase")
    }

    pub fn repository_path(&self) -> String {
        non_empty_or(&self.architecture.layers.repository.path, "internal/repository")
    }

    pub fn handler_path(&self) -> String {
        non_empty_or(&self.architecture.layers.handler.path, "internal/handler")
    }

    /// Dotted-path lookup over the boolean feature toggles.
    pub fn is_feature_enabled(&self, path: &str) -> bool {
        match path {
            "database.features.timestamps" => self.database.features.timestamps,
            "database.features.soft_delete" => self.database.features.soft_delete,
            "database.features.uuid" => self.database.features.uuid,
            "generation.validation" => self.generation.validation.enabled,
            "generation.business_rules" => self.generation.business_rules.enabled,
            "generation.documentation.swagger" => self.generation.documentation.swagger.enabled,
            "generation.tests" => self.generation.tests.enabled,
            "features.auth" => self.features.auth.enabled,
            _ => false,
        }
    }

    pub fn to_yaml(&self) -> Result<String, GocaError> {
        serde_yaml::to_string(self)
            .map_err(|e| GocaError::Internal(format!("config serialization failed: {}", e)))
    }
}
