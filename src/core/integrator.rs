//! Incremental integration of a generated feature into the files that
//! already exist: the DI container and the server entry point.
//!
//! Everything here is a read-modify-write over Go source. Detection never
//! relies on raw substring search alone: the entity walk strips comment
//! lines first (a commented `// Example: &domain.User{}` must not count as
//! registered), and route/wiring blocks are found through stable marker
//! comments inserted on first registration. Running the integrator twice
//! yields byte-identical files.

use crate::core::config::HandlerKind;
use crate::core::error::GocaError;
use crate::core::templates::{container, EmitContext};
use crate::core::tui;
use crate::core::writer;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::fs;
use std::path::Path;

/// Outcome of integrating one target file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IntegrationOutcome {
    Created,
    Updated,
    Unchanged,
    Skipped,
}

fn integration_error(path: &Path, reason: &str) -> GocaError {
    GocaError::Integration {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Strip a trailing line comment so brace counting ignores commented code.
fn code_part(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn leading_indent(line: &str) -> String {
    line.chars().take_while(|c| c.is_whitespace()).collect()
}

/// Classify and render an import set the way gofmt groups it: standard
/// library, external, then local module paths, alphabetical within each
/// group.
fn render_import_block(entries: &[(Option<String>, String)], module: &str) -> String {
    if entries.len() == 1 {
        let (alias, path) = &entries[0];
        return match alias {
            Some(a) => format!("import {} \"{}\"", a, path),
            None => format!("import \"{}\"", path),
        };
    }
    let mut std_group = Vec::new();
    let mut external = Vec::new();
    let mut local = Vec::new();
    for (alias, path) in entries {
        let rendered = match alias {
            Some(a) => format!("\t{} \"{}\"", a, path),
            None => format!("\t\"{}\"", path),
        };
        let first = path.split('/').next().unwrap_or(path);
        if !module.is_empty() && path.starts_with(module) {
            local.push(rendered);
        } else if first.contains('.') {
            external.push(rendered);
        } else {
            std_group.push(rendered);
        }
    }
    let mut groups = Vec::new();
    for mut g in [std_group, external, local] {
        if g.is_empty() {
            continue;
        }
        g.sort();
        groups.push(g.join("\n"));
    }
    format!("import (\n{}\n)", groups.join("\n\n"))
}

/// Ensure every path in `required` is imported, rewriting the import
/// region in deterministic grouped order. Content outside the region is
/// left untouched; a file without an import region gets one synthesized
/// after the package clause.
pub fn ensure_imports(
    path: &Path,
    source: &str,
    required: &[&str],
    module: &str,
) -> Result<String, GocaError> {
    let lines: Vec<&str> = source.lines().collect();
    let package_idx = lines
        .iter()
        .position(|l| l.trim_start().starts_with("package "))
        .ok_or_else(|| integration_error(path, "no package declaration"))?;

    let entry_re = Regex::new(r#"^\s*(?:([A-Za-z_][A-Za-z0-9_.]*)\s+)?"([^"]+)""#)
        .expect("static regex");

    // Locate the import region: a block or consecutive single-line imports.
    let mut region: Option<(usize, usize)> = None; // inclusive line range
    let mut entries: Vec<(Option<String>, String)> = Vec::new();
    for (idx, line) in lines.iter().enumerate().skip(package_idx + 1) {
        let trimmed = line.trim_start();
        if !trimmed.starts_with("import") {
            continue;
        }
        if trimmed.contains('(') {
            let close = lines[idx..]
                .iter()
                .position(|l| l.trim() == ")")
                .map(|off| idx + off)
                .ok_or_else(|| integration_error(path, "unterminated import block"))?;
            for entry_line in &lines[idx + 1..close] {
                if let Some(caps) = entry_re.captures(entry_line) {
                    entries.push((
                        caps.get(1).map(|m| m.as_str().to_string()),
                        caps[2].to_string(),
                    ));
                }
            }
            region = Some((idx, close));
        } else {
            // One or more single-line imports.
            let mut end = idx;
            for (offset, follow) in lines[idx..].iter().enumerate() {
                if follow.trim_start().starts_with("import") {
                    end = idx + offset;
                    if let Some(caps) = entry_re.captures(follow) {
                        entries.push((
                            caps.get(1).map(|m| m.as_str().to_string()),
                            caps[2].to_string(),
                        ));
                    }
                } else if !follow.trim().is_empty() {
                    break;
                }
            }
            region = Some((idx, end));
        }
        break;
    }

    let mut seen: FxHashSet<String> = entries.iter().map(|(_, p)| p.clone()).collect();
    let mut missing = false;
    for req in required {
        if seen.insert((*req).to_string()) {
            entries.push((None, (*req).to_string()));
            missing = true;
        }
    }
    if entries.is_empty() {
        // Nothing to import and nothing required; leave the file alone.
        return Ok(source.to_string());
    }

    let mut out: Vec<String> = Vec::with_capacity(lines.len() + 4);
    match region {
        Some((start, end)) => {
            if !missing {
                // Region already complete; keep the file byte-identical.
                return Ok(source.to_string());
            }
            out.extend(lines[..start].iter().map(|l| l.to_string()));
            out.push(render_import_block(&entries, module));
            out.extend(lines[end + 1..].iter().map(|l| l.to_string()));
        }
        None => {
            out.extend(lines[..=package_idx].iter().map(|l| l.to_string()));
            out.push(String::new());
            out.push(render_import_block(&entries, module));
            out.extend(lines[package_idx + 1..].iter().map(|l| l.to_string()));
        }
    }
    Ok(format!("{}\n", out.join("\n").trim_end_matches('\n')))
}

/// Ensure `&domain.<Entity>{}` appears in the auto-migration list.
///
/// Returns the (possibly rewritten) source and whether the list was found.
/// Commented-out entries do not count as registered.
pub fn ensure_entity(source: &str, entity: &str) -> (String, bool) {
    let lines: Vec<&str> = source.lines().collect();
    let anchor = lines
        .iter()
        .position(|l| code_part(l).contains("entities := []interface{}{"));
    let Some(anchor) = anchor else {
        return (source.to_string(), false);
    };

    // Walk to the closing brace of the list, counting braces in real code
    // only so commented examples cannot unbalance the scan.
    let mut depth: i32 = 0;
    let mut close = None;
    for (idx, line) in lines.iter().enumerate().skip(anchor) {
        let code = code_part(line);
        depth += code.matches('{').count() as i32;
        depth -= code.matches('}').count() as i32;
        if idx > anchor && depth <= 0 {
            close = Some(idx);
            break;
        }
        if idx == anchor && depth == 0 {
            // Single-line empty list: `entities := []interface{}{}`.
            close = Some(idx);
            break;
        }
    }
    let Some(close) = close else {
        return (source.to_string(), false);
    };

    let reference = format!("&domain.{}{{}}", entity);
    let registered = lines[anchor..=close].iter().any(|l| {
        let code = code_part(l);
        !l.trim_start().starts_with("//") && code.contains(reference.as_str())
    });
    if registered {
        return (source.to_string(), true);
    }

    let indent = format!("{}\t", leading_indent(lines[anchor]));
    let new_line = format!("{}{},", indent, reference);
    let mut out: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
    if anchor == close {
        // Expand the single-line empty list into a block.
        let line = out[anchor].clone();
        let prefix = line.trim_end().trim_end_matches("}");
        out[anchor] = prefix.to_string();
        out.insert(anchor + 1, new_line);
        out.insert(anchor + 2, format!("{}}}", leading_indent(&line)));
    } else {
        out.insert(close, new_line);
    }
    (format!("{}\n", out.join("\n").trim_end_matches('\n')), true)
}

/// Route-registration block for one feature, detected on re-runs by its
/// leading marker comment.
fn route_block(ctx: &EmitContext) -> String {
    let names = ctx.names;
    let handler = format!("{}Handler", names.camel);
    let plural = &names.plural_snake;
    format!(
        "\t// {pascal} routes\n\t{handler} := container.{pascal}Handler()\n\tapi.POST(\"/{plural}\", {handler}.Create)\n\tapi.GET(\"/{plural}/:id\", {handler}.GetByID)\n\tapi.PUT(\"/{plural}/:id\", {handler}.Update)\n\tapi.DELETE(\"/{plural}/:id\", {handler}.Delete)\n\tapi.GET(\"/{plural}\", {handler}.List)",
        pascal = names.pascal,
        handler = handler,
        plural = plural
    )
}

fn routes_marker(ctx: &EmitContext) -> String {
    format!("// {} routes", ctx.names.pascal)
}

/// Ensure the feature's CRUD routes are registered in the entry file.
pub fn ensure_routes(source: &str, ctx: &EmitContext) -> String {
    let marker = routes_marker(ctx);
    if source.lines().any(|l| l.trim() == marker) {
        return source.to_string();
    }

    let lines: Vec<&str> = source.lines().collect();
    let insert_at = lines
        .iter()
        .position(|l| code_part(l).contains(".Run("))
        .or_else(|| lines.iter().rposition(|l| l.trim() == "}"))
        .unwrap_or(lines.len());

    let mut out: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
    out.insert(insert_at, String::new());
    out.insert(insert_at, route_block(ctx));
    // Keep exactly one blank line between the previous statement and the
    // new block.
    if insert_at > 0 && !out[insert_at - 1].trim().is_empty() {
        out.insert(insert_at, String::new());
    }
    format!("{}\n", out.join("\n").trim_end_matches('\n'))
}

/// Register the feature in an existing `container.go`.
pub fn update_container(path: &Path, source: &str, ctx: &EmitContext) -> Result<String, GocaError> {
    let marker = container::wiring_marker(ctx);
    if source.lines().any(|l| l.trim() == marker.trim()) {
        return Ok(source.to_string());
    }

    let module = ctx.module();
    let mut required = vec![
        format!("{}/{}", module, ctx.config.repository_path()),
        format!("{}/{}", module, ctx.config.usecase_path()),
    ];
    if ctx.config.handler_kinds().contains(&HandlerKind::Http) {
        required.push(format!("{}/{}/http", module, ctx.config.handler_path()));
    }
    let required_refs: Vec<&str> = required.iter().map(String::as_str).collect();
    let source = ensure_imports(path, source, &required_refs, &module)?;

    let lines: Vec<&str> = source.lines().collect();

    // Struct fields go right before the closing brace of the Container
    // struct declaration.
    let struct_idx = lines
        .iter()
        .position(|l| code_part(l).contains("type Container struct {"))
        .ok_or_else(|| integration_error(path, "no Container struct"))?;
    let mut depth: i32 = 0;
    let mut struct_close = None;
    for (idx, line) in lines.iter().enumerate().skip(struct_idx) {
        let code = code_part(line);
        depth += code.matches('{').count() as i32;
        depth -= code.matches('}').count() as i32;
        if idx > struct_idx && depth <= 0 {
            struct_close = Some(idx);
            break;
        }
    }
    let struct_close =
        struct_close.ok_or_else(|| integration_error(path, "unterminated Container struct"))?;

    let setup_idx = lines
        .iter()
        .position(|l| code_part(l).contains("func NewContainer("))
        .ok_or_else(|| integration_error(path, "no NewContainer constructor"))?;
    let return_idx = lines[setup_idx..]
        .iter()
        .position(|l| l.trim() == "return c")
        .map(|off| setup_idx + off)
        .ok_or_else(|| integration_error(path, "no `return c` in NewContainer"))?;

    let mut out: Vec<String> = lines.iter().map(|l| l.to_string()).collect();

    // Append setup method and accessors at end of file.
    out.push(String::new());
    out.push(container::setup_method(ctx).trim_end().to_string());
    out.push(String::new());
    out.push(container::accessor_block(ctx).trim_end().to_string());

    // Later insertions first would shift indices; do the deeper ones in
    // reverse order instead.
    out.insert(return_idx, container::setup_call(ctx).trim_end_matches('\n').to_string());
    let mut field_lines: Vec<String> = container::field_block(ctx)
        .trim_end()
        .lines()
        .map(|l| l.to_string())
        .collect();
    if struct_close > struct_idx + 1 {
        field_lines.insert(0, String::new());
    }
    for (offset, line) in field_lines.into_iter().enumerate() {
        out.insert(struct_close + offset, line);
    }

    Ok(format!("{}\n", out.join("\n").trim_end_matches('\n')))
}

/// Register the feature in an existing `cmd/server/main.go`.
pub fn update_main(path: &Path, source: &str, ctx: &EmitContext) -> Result<String, GocaError> {
    let module = ctx.module();
    let entity_applies = source
        .lines()
        .any(|l| code_part(l).contains("entities := []interface{}{"));

    let mut updated = source.to_string();
    if entity_applies {
        let domain_import = format!("{}/{}", module, ctx.config.domain_path());
        updated = ensure_imports(path, &updated, &[domain_import.as_str()], &module)?;
        let (with_entity, found) = ensure_entity(&updated, &ctx.names.pascal);
        if found {
            updated = with_entity;
        }
    } else {
        // Validate the file is still recognizable Go before touching it.
        ensure_imports(path, &updated, &[], &module)?;
        tui::warn(&format!(
            "{}: no auto-migration list; entity registration skipped",
            path.display()
        ));
    }

    if ctx.config.handler_kinds().contains(&HandlerKind::Http) {
        updated = ensure_routes(&updated, ctx);
    }
    Ok(updated)
}

/// Integrate a generated feature into `container.go` and the entry file.
pub fn integrate_feature(
    project_root: &Path,
    ctx: &EmitContext,
) -> Result<Vec<(String, IntegrationOutcome)>, GocaError> {
    let mut outcomes = Vec::new();

    let container_rel = "internal/di/container.go";
    let container_path = project_root.join(container_rel);
    if container_path.exists() {
        let original = fs::read_to_string(&container_path)?;
        let updated = update_container(&container_path, &original, ctx)?;
        if updated == original {
            outcomes.push((container_rel.to_string(), IntegrationOutcome::Unchanged));
        } else {
            writer::write_atomic(&container_path, &updated)?;
            outcomes.push((container_rel.to_string(), IntegrationOutcome::Updated));
        }
    } else {
        writer::write_atomic(&container_path, &container::render_container(ctx))?;
        outcomes.push((container_rel.to_string(), IntegrationOutcome::Created));
    }

    let main_rel = "cmd/server/main.go";
    let main_path = project_root.join(main_rel);
    if !main_path.exists() {
        tui::warn(&format!(
            "{}: entry file not found; run `goca init` (or create it) and re-run to wire the feature",
            main_rel
        ));
        outcomes.push((main_rel.to_string(), IntegrationOutcome::Skipped));
        return Ok(outcomes);
    }
    let original = fs::read_to_string(&main_path)?;
    let updated = update_main(&main_path, &original, ctx)?;
    if updated == original {
        outcomes.push((main_rel.to_string(), IntegrationOutcome::Unchanged));
    } else {
        writer::write_atomic(&main_path, &updated)?;
        outcomes.push((main_rel.to_string(), IntegrationOutcome::Updated));
    }
    Ok(outcomes)
}

/// Create `path` with `header` + `block`, or append `block` when the file
/// exists without `marker`. Used for the shared domain errors and
/// repository interface files.
pub fn ensure_block(
    path: &Path,
    marker: &str,
    header: &str,
    block: &str,
) -> Result<IntegrationOutcome, GocaError> {
    if !path.exists() {
        writer::write_atomic(path, &format!("{}{}", header, block))?;
        return Ok(IntegrationOutcome::Created);
    }
    let existing = fs::read_to_string(path)?;
    if existing
        .lines()
        .any(|l| l.trim().starts_with(marker.trim()))
    {
        return Ok(IntegrationOutcome::Unchanged);
    }
    let mut updated = existing.trim_end_matches('\n').to_string();
    updated.push('\n');
    updated.push_str(block);
    writer::write_atomic(path, &updated)?;
    Ok(IntegrationOutcome::Updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::fields::parse_fields;
    use crate::core::templates::FeatureNames;
    use std::path::PathBuf;

    const MAIN_GO: &str = "package main\n\nimport (\n\t\"log\"\n\n\t\"github.com/gin-gonic/gin\"\n\n\t\"github.com/acme/shop/internal/di\"\n)\n\nfunc main() {\n\tdb := openDatabase()\n\n\tentities := []interface{}{\n\t\t// Example: &domain.User{}\n\t}\n\tif err := db.AutoMigrate(entities...); err != nil {\n\t\tlog.Fatalf(\"auto-migrate: %v\", err)\n\t}\n\n\tcontainer := di.NewContainer(db)\n\t_ = container\n\n\trouter := gin.Default()\n\tapi := router.Group(\"/api/v1\")\n\t_ = api\n\n\tif err := router.Run(\":8080\"); err != nil {\n\t\tlog.Fatalf(\"serve: %v\", err)\n\t}\n}\n";

    fn test_config() -> Config {
        let mut config = Config::default();
        config.project.module = "github.com/acme/shop".to_string();
        config
    }

    fn path() -> PathBuf {
        PathBuf::from("cmd/server/main.go")
    }

    #[test]
    fn test_ensure_imports_adds_missing_sorted() {
        let source = "package main\n\nimport (\n\t\"log\"\n)\n\nfunc main() {}\n";
        let updated = ensure_imports(
            &path(),
            source,
            &["github.com/acme/shop/internal/domain", "fmt"],
            "github.com/acme/shop",
        )
        .unwrap();
        let expected = "package main\n\nimport (\n\t\"fmt\"\n\t\"log\"\n\n\t\"github.com/acme/shop/internal/domain\"\n)\n\nfunc main() {}\n";
        assert_eq!(updated, expected);
    }

    #[test]
    fn test_ensure_imports_synthesizes_region() {
        let source = "package main\n\nfunc main() {}\n";
        let updated =
            ensure_imports(&path(), source, &["log"], "github.com/acme/shop").unwrap();
        assert_eq!(updated, "package main\n\nimport \"log\"\n\nfunc main() {}\n");
    }

    #[test]
    fn test_ensure_imports_noop_keeps_bytes() {
        let updated = ensure_imports(
            &path(),
            MAIN_GO,
            &["github.com/gin-gonic/gin"],
            "github.com/acme/shop",
        )
        .unwrap();
        assert_eq!(updated, MAIN_GO);
    }

    #[test]
    fn test_ensure_imports_preserves_aliases() {
        let source =
            "package main\n\nimport (\n\tpb \"github.com/acme/shop/internal/handler/grpc/userpb\"\n)\n\nfunc main() {}\n";
        let updated =
            ensure_imports(&path(), source, &["log"], "github.com/acme/shop").unwrap();
        assert!(updated.contains("pb \"github.com/acme/shop/internal/handler/grpc/userpb\""));
        assert!(updated.contains("\t\"log\""));
    }

    #[test]
    fn test_ensure_imports_requires_package_clause() {
        assert!(matches!(
            ensure_imports(&path(), "func main() {}\n", &["log"], "m"),
            Err(GocaError::Integration { .. })
        ));
    }

    #[test]
    fn test_commented_entity_does_not_count() {
        let (updated, found) = ensure_entity(MAIN_GO, "User");
        assert!(found);
        assert!(updated.contains("\t\t&domain.User{},"));
        // The commented example stays where it was.
        assert!(updated.contains("// Example: &domain.User{}"));
    }

    #[test]
    fn test_registered_entity_is_not_duplicated() {
        let (once, _) = ensure_entity(MAIN_GO, "User");
        let (twice, found) = ensure_entity(&once, "User");
        assert!(found);
        assert_eq!(once, twice);
        assert_eq!(twice.matches("\t\t&domain.User{},").count(), 1);
    }

    #[test]
    fn test_missing_entity_list_reports_not_found() {
        let source = "package main\n\nfunc main() {}\n";
        let (updated, found) = ensure_entity(source, "User");
        assert!(!found);
        assert_eq!(updated, source);
    }

    #[test]
    fn test_routes_inserted_before_run_and_idempotent() {
        let config = test_config();
        let names = FeatureNames::new("User").unwrap();
        let fields = parse_fields("name:string").unwrap();
        let ctx = EmitContext {
            config: &config,
            names: &names,
            fields: &fields,
        };
        let once = ensure_routes(MAIN_GO, &ctx);
        assert!(once.contains("// User routes"));
        assert!(once.contains("userHandler := container.UserHandler()"));
        assert!(once.contains("api.POST(\"/users\", userHandler.Create)"));
        let run_idx = once.find(".Run(").unwrap();
        assert!(once.find("// User routes").unwrap() < run_idx);

        let twice = ensure_routes(&once, &ctx);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_update_main_is_idempotent() {
        let config = test_config();
        let names = FeatureNames::new("User").unwrap();
        let fields = parse_fields("name:string").unwrap();
        let ctx = EmitContext {
            config: &config,
            names: &names,
            fields: &fields,
        };
        let once = update_main(&path(), MAIN_GO, &ctx).unwrap();
        let twice = update_main(&path(), &once, &ctx).unwrap();
        assert_eq!(once, twice);
        assert!(once.contains("\"github.com/acme/shop/internal/domain\""));
        assert_eq!(once.matches("&domain.User{},").count(), 1);
    }

    #[test]
    fn test_update_container_adds_wiring_once() {
        let config = test_config();
        let names = FeatureNames::new("User").unwrap();
        let fields = parse_fields("name:string").unwrap();
        let ctx = EmitContext {
            config: &config,
            names: &names,
            fields: &fields,
        };
        let empty = crate::core::templates::container::render_empty_container(&config);
        let container_path = PathBuf::from("internal/di/container.go");

        let once = update_container(&container_path, &empty, &ctx).unwrap();
        assert!(once.contains("// User wiring"));
        assert!(once.contains("c.setupUser()"));
        assert!(once.contains("func (c *Container) setupUser()"));
        assert!(once.contains("func (c *Container) UserHandler() *http.UserHandler"));
        assert!(once.contains("\"github.com/acme/shop/internal/repository\""));

        let twice = update_container(&container_path, &once, &ctx).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_two_features_coexist_in_container() {
        let config = test_config();
        let fields = parse_fields("name:string").unwrap();
        let empty = crate::core::templates::container::render_empty_container(&config);
        let container_path = PathBuf::from("internal/di/container.go");

        let user = FeatureNames::new("User").unwrap();
        let with_user = update_container(
            &container_path,
            &empty,
            &EmitContext {
                config: &config,
                names: &user,
                fields: &fields,
            },
        )
        .unwrap();

        let order = FeatureNames::new("Order").unwrap();
        let with_both = update_container(
            &container_path,
            &with_user,
            &EmitContext {
                config: &config,
                names: &order,
                fields: &fields,
            },
        )
        .unwrap();
        assert!(with_both.contains("c.setupUser()"));
        assert!(with_both.contains("c.setupOrder()"));
        assert!(with_both.contains("// User wiring"));
        assert!(with_both.contains("// Order wiring"));
    }
}
