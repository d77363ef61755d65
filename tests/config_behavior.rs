use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn run_goca(dir: &std::path::Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_goca"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("run goca")
}

#[test]
fn unchanged_flags_never_override_yaml_values() {
    let tmp = tempdir().expect("tempdir");
    fs::write(
        tmp.path().join(".goca.yaml"),
        "generation:\n  validation:\n    enabled: true\n",
    )
    .expect("write config");

    // --database is passed; --validation is not. The YAML value must win
    // for validation even though the flag was left at its default.
    let out = run_goca(
        tmp.path(),
        &[
            "feature",
            "Product",
            "--fields",
            "name:string",
            "--database",
            "postgres",
        ],
    );
    assert!(
        out.status.success(),
        "goca feature failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let entity = fs::read_to_string(tmp.path().join("internal/domain/product.go"))
        .expect("read product.go");
    assert!(entity.contains("validate:\"required\""));
    assert!(entity.contains("func (p *Product) Validate() error"));
}

#[test]
fn explicit_false_flag_overrides_yaml() {
    let tmp = tempdir().expect("tempdir");
    fs::write(
        tmp.path().join(".goca.yaml"),
        "generation:\n  validation:\n    enabled: true\n",
    )
    .expect("write config");

    let out = run_goca(
        tmp.path(),
        &[
            "feature",
            "Product",
            "--fields",
            "name:string",
            "--validation",
            "false",
        ],
    );
    assert!(out.status.success());

    let entity = fs::read_to_string(tmp.path().join("internal/domain/product.go"))
        .expect("read product.go");
    assert!(!entity.contains("validate:"));
}

#[test]
fn config_show_renders_effective_configuration_as_json() {
    let tmp = tempdir().expect("tempdir");
    fs::write(tmp.path().join(".goca.yaml"), "database:\n  type: sqlite\n")
        .expect("write config");

    let out = run_goca(tmp.path(), &["config", "show", "--format", "json"]);
    assert!(out.status.success());
    let rendered: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("parse config show output");
    assert_eq!(rendered["database"]["type"], "sqlite");
    // Untouched sections surface their defaults.
    assert_eq!(rendered["architecture"]["naming"]["files"], "snake_case");
    assert_eq!(rendered["database"]["connection"]["port"], 5432);
}

#[test]
fn config_validate_reports_every_offending_path_at_once() {
    let tmp = tempdir().expect("tempdir");
    fs::write(
        tmp.path().join(".goca.yaml"),
        "database:\n  type: oracle\n  connection:\n    port: 0\nfeatures:\n  handlers: [http, graphql]\n",
    )
    .expect("write config");

    let out = run_goca(tmp.path(), &["config", "validate"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("database.type"), "stderr: {}", stderr);
    assert!(stderr.contains("database.connection.port"), "stderr: {}", stderr);
    assert!(stderr.contains("features.handlers"), "stderr: {}", stderr);
}

#[test]
fn unknown_top_level_yaml_keys_are_rejected() {
    let tmp = tempdir().expect("tempdir");
    fs::write(tmp.path().join(".goca.yaml"), "databse:\n  type: postgres\n")
        .expect("write config");

    let out = run_goca(tmp.path(), &["config", "validate"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn config_init_writes_defaults_and_respects_existing_file() {
    let tmp = tempdir().expect("tempdir");
    let out = run_goca(tmp.path(), &["config", "init"]);
    assert!(out.status.success());
    let written =
        fs::read_to_string(tmp.path().join(".goca.yaml")).expect("read generated config");
    assert!(written.contains("type: postgres"));

    // A second run without --force leaves the file alone.
    fs::write(tmp.path().join(".goca.yaml"), "database:\n  type: sqlite\n")
        .expect("write config");
    let out = run_goca(tmp.path(), &["config", "init"]);
    assert!(out.status.success());
    let kept = fs::read_to_string(tmp.path().join(".goca.yaml")).expect("read config");
    assert!(kept.contains("sqlite"));

    let out = run_goca(tmp.path(), &["config", "init", "--force"]);
    assert!(out.status.success());
    let replaced = fs::read_to_string(tmp.path().join(".goca.yaml")).expect("read config");
    assert!(replaced.contains("type: postgres"));
}

#[test]
fn handlers_flag_selects_transport_files() {
    let tmp = tempdir().expect("tempdir");
    let out = run_goca(
        tmp.path(),
        &[
            "feature",
            "Order",
            "--fields",
            "total:float64",
            "--handlers",
            "http,grpc,worker",
        ],
    );
    assert!(
        out.status.success(),
        "goca feature failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(tmp.path().join("internal/handler/http/order_handler.go").exists());
    assert!(tmp.path().join("internal/handler/grpc/order.proto").exists());
    assert!(tmp.path().join("internal/handler/grpc/order_server.go").exists());
    assert!(tmp.path().join("internal/handler/worker/order_worker.go").exists());
    assert!(!tmp.path().join("internal/handler/cli").exists());
}

#[test]
fn version_prints_the_crate_version() {
    let tmp = tempdir().expect("tempdir");
    let out = run_goca(tmp.path(), &["version"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.trim(), format!("v{}", env!("CARGO_PKG_VERSION")));
}
