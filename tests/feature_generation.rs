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
fn feature_emits_every_layer_and_wires_the_container() {
    let tmp = tempdir().expect("tempdir");
    let out = run_goca(
        tmp.path(),
        &["init", "--module", "github.com/acme/shop", "--force"],
    );
    assert!(
        out.status.success(),
        "goca init failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let out = run_goca(
        tmp.path(),
        &["feature", "User", "--fields", "name:string,email:string"],
    );
    assert!(
        out.status.success(),
        "goca feature failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    for path in [
        "internal/domain/user.go",
        "internal/domain/errors.go",
        "internal/domain/user_seeds.go",
        "internal/domain/user_test.go",
        "internal/usecase/dto/user_dto.go",
        "internal/usecase/user_service.go",
        "internal/repository/interfaces.go",
        "internal/repository/postgres_user_repository.go",
        "internal/handler/http/user_handler.go",
        "internal/handler/http/user_routes.go",
        "internal/di/container.go",
    ] {
        assert!(tmp.path().join(path).exists(), "expected {} to exist", path);
    }

    let container =
        fs::read_to_string(tmp.path().join("internal/di/container.go")).expect("read container");
    assert!(container.contains("// User wiring"));
    assert!(container.contains("c.setupUser()"));
    assert!(container.contains("repository.NewPostgresUserRepository(c.db)"));

    let main_go =
        fs::read_to_string(tmp.path().join("cmd/server/main.go")).expect("read main.go");
    assert!(main_go.contains("&domain.User{},"));
    assert!(main_go.contains("// User routes"));
    assert!(main_go.contains("api.POST(\"/users\", userHandler.Create)"));
    assert!(main_go.contains("\"github.com/acme/shop/internal/domain\""));
}

#[test]
fn soft_delete_entity_carries_gorm_support_and_methods() {
    let tmp = tempdir().expect("tempdir");
    fs::write(
        tmp.path().join(".goca.yaml"),
        "project:\n  module: github.com/acme/shop\ndatabase:\n  features:\n    soft_delete: true\n",
    )
    .expect("write config");

    let out = run_goca(tmp.path(), &["feature", "Order", "--fields", "total:float64"]);
    assert!(
        out.status.success(),
        "goca feature failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let entity =
        fs::read_to_string(tmp.path().join("internal/domain/order.go")).expect("read order.go");
    assert!(entity.contains("\"time\""));
    assert!(entity.contains("\"gorm.io/gorm\""));
    assert!(entity.contains("CreatedAt time.Time"));
    assert!(entity.contains("UpdatedAt time.Time"));
    assert!(entity.contains("DeletedAt gorm.DeletedAt"));
    assert!(entity.contains("func (o *Order) MarkDeleted()"));
    assert!(entity.contains("func (o *Order) IsDeleted() bool"));
}

#[test]
fn kebab_case_naming_controls_emitted_file_names() {
    let tmp = tempdir().expect("tempdir");
    fs::write(
        tmp.path().join(".goca.yaml"),
        "architecture:\n  naming:\n    files: kebab-case\n",
    )
    .expect("write config");

    let out = run_goca(tmp.path(), &["entity", "OrderItem", "--fields", "qty:int"]);
    assert!(
        out.status.success(),
        "goca entity failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(tmp.path().join("internal/domain/order-item.go").exists());

    let out = run_goca(tmp.path(), &["handler", "OrderItem", "--fields", "qty:int"]);
    assert!(out.status.success());
    assert!(tmp
        .path()
        .join("internal/handler/http/order-item-handler.go")
        .exists());
}

#[test]
fn database_flag_overrides_yaml_dialect() {
    let tmp = tempdir().expect("tempdir");
    fs::write(tmp.path().join(".goca.yaml"), "database:\n  type: postgres\n")
        .expect("write config");

    let out = run_goca(
        tmp.path(),
        &[
            "feature",
            "User",
            "--fields",
            "name:string",
            "--database",
            "mysql",
        ],
    );
    assert!(
        out.status.success(),
        "goca feature failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(tmp
        .path()
        .join("internal/repository/mysql_user_repository.go")
        .exists());
    assert!(!tmp
        .path()
        .join("internal/repository/postgres_user_repository.go")
        .exists());

    let container =
        fs::read_to_string(tmp.path().join("internal/di/container.go")).expect("read container");
    assert!(container.contains("repository.NewMysqlUserRepository(c.db)"));
}

#[test]
fn seeds_file_has_no_imports() {
    let tmp = tempdir().expect("tempdir");
    let out = run_goca(
        tmp.path(),
        &["entity", "User", "--fields", "name:string,joined:time.Time"],
    );
    assert!(out.status.success());
    let seeds = fs::read_to_string(tmp.path().join("internal/domain/user_seeds.go"))
        .expect("read seeds");
    assert!(!seeds.contains("import"));
}

#[test]
fn malformed_fields_exit_with_argument_error() {
    let tmp = tempdir().expect("tempdir");
    let out = run_goca(tmp.path(), &["feature", "User", "--fields", "name:varchar"]);
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unknown type 'varchar'"), "stderr: {}", stderr);
    // Nothing was generated: input is rejected before side effects.
    assert!(!tmp.path().join("internal/domain/user.go").exists());
}

#[test]
fn invalid_feature_name_is_rejected() {
    let tmp = tempdir().expect("tempdir");
    let out = run_goca(tmp.path(), &["feature", "Order!", "--fields", "total:float64"]);
    assert_eq!(out.status.code(), Some(2));
}
