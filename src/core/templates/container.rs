//! DI container emitter and the wiring fragments the integrator splices
//! into an existing container.

use crate::core::config::DatabaseDialect;
use crate::core::templates::repository::constructor_name;
use crate::core::templates::{EmitContext, GoImports};

fn db_handle(dialect: DatabaseDialect) -> (&'static str, &'static str) {
    match dialect {
        DatabaseDialect::Mongodb => ("*mongo.Database", "go.mongodb.org/mongo-driver/mongo"),
        _ => ("*gorm.DB", "gorm.io/gorm"),
    }
}

/// Marker line identifying a feature's wiring inside `container.go`.
pub fn wiring_marker(ctx: &EmitContext) -> String {
    format!("// {} wiring", ctx.names.pascal)
}

fn wires_http(ctx: &EmitContext) -> bool {
    ctx.config
        .handler_kinds()
        .contains(&crate::core::config::HandlerKind::Http)
}

/// Struct fields declared for one feature.
pub fn field_block(ctx: &EmitContext) -> String {
    let names = ctx.names;
    let mut block = format!(
        "\t{}\n\t{}Repository repository.{}Repository\n\t{}Service usecase.{}Service\n",
        wiring_marker(ctx),
        names.camel,
        names.pascal,
        names.camel,
        names.pascal
    );
    if wires_http(ctx) {
        block.push_str(&format!(
            "\t{}Handler *http.{}Handler\n",
            names.camel, names.pascal
        ));
    }
    block
}

/// The `setup<Feature>()` constructor-chain method.
pub fn setup_method(ctx: &EmitContext) -> String {
    let names = ctx.names;
    let dialect = ctx.config.database_dialect();
    let mut method = format!(
        "func (c *Container) setup{}() {{\n\tc.{}Repository = repository.{}(c.db)\n\tc.{}Service = usecase.New{}Service(c.{}Repository)\n",
        names.pascal,
        names.camel,
        constructor_name(ctx, dialect),
        names.camel,
        names.pascal,
        names.camel
    );
    if wires_http(ctx) {
        method.push_str(&format!(
            "\tc.{}Handler = http.New{}Handler(c.{}Service)\n",
            names.camel, names.pascal, names.camel
        ));
    }
    method.push_str("}\n");
    method
}

/// Accessor methods exposed for one feature.
pub fn accessor_block(ctx: &EmitContext) -> String {
    let names = ctx.names;
    let mut block = format!(
        "// {}Service returns the {} use cases.\nfunc (c *Container) {}Service() usecase.{}Service {{\n\treturn c.{}Service\n}}\n",
        names.pascal, names.human, names.pascal, names.pascal, names.camel
    );
    if wires_http(ctx) {
        block.push_str(&format!(
            "\n// {}Handler returns the HTTP handler for {} records.\nfunc (c *Container) {}Handler() *http.{}Handler {{\n\treturn c.{}Handler\n}}\n",
            names.pascal, names.human, names.pascal, names.pascal, names.camel
        ));
    }
    block
}

/// The constructor call inserted into `NewContainer`.
pub fn setup_call(ctx: &EmitContext) -> String {
    format!("\tc.setup{}()\n", ctx.names.pascal)
}

/// Emit a fresh `internal/di/container.go` carrying one feature.
pub fn render_container(ctx: &EmitContext) -> String {
    let names = ctx.names;
    let module = ctx.module();
    let (handle, handle_import) = db_handle(ctx.config.database_dialect());

    let mut imports = GoImports::new(&module);
    imports.add(handle_import);
    imports.add(&format!("{}/{}", module, ctx.config.repository_path()));
    imports.add(&format!("{}/{}", module, ctx.config.usecase_path()));
    if wires_http(ctx) {
        imports.add(&format!("{}/{}/http", module, ctx.config.handler_path()));
    }

    format!(
        "package di\n\n{imports}// Container wires repositories, use cases, and handlers once at startup.\ntype Container struct {{\n\tdb {handle}\n\n{fields}}}\n\n// NewContainer builds the dependency graph over one database handle.\nfunc NewContainer(db {handle}) *Container {{\n\tc := &Container{{db: db}}\n{setup_call}\treturn c\n}}\n\n{setup}\n{accessors}",
        imports = imports.render(),
        handle = handle,
        fields = field_block(ctx),
        setup_call = setup_call(ctx),
        setup = setup_method(ctx),
        accessors = accessor_block(ctx),
    )
}

/// Emit the featureless container written by `goca init`.
pub fn render_empty_container(
    config: &crate::core::config::Config,
) -> String {
    let (handle, handle_import) = db_handle(config.database_dialect());
    format!(
        "package di\n\nimport \"{handle_import}\"\n\n// Container wires repositories, use cases, and handlers once at startup.\ntype Container struct {{\n\tdb {handle}\n}}\n\n// NewContainer builds the dependency graph over one database handle.\nfunc NewContainer(db {handle}) *Container {{\n\tc := &Container{{db: db}}\n\treturn c\n}}\n",
        handle_import = handle_import,
        handle = handle
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::fields::parse_fields;
    use crate::core::templates::FeatureNames;

    #[test]
    fn test_container_wires_repo_service_handler() {
        let mut config = Config::default();
        config.project.module = "github.com/acme/shop".to_string();
        let names = FeatureNames::new("Order").unwrap();
        let fields = parse_fields("total:float64").unwrap();
        let src = render_container(&EmitContext {
            config: &config,
            names: &names,
            fields: &fields,
        });
        assert!(src.contains("// Order wiring"));
        assert!(src.contains("orderRepository repository.OrderRepository"));
        assert!(src.contains("c.setupOrder()"));
        assert!(src.contains("repository.NewPostgresOrderRepository(c.db)"));
        assert!(src.contains("func (c *Container) OrderHandler() *http.OrderHandler"));
        assert!(src.contains("\"github.com/acme/shop/internal/handler/http\""));
    }

    #[test]
    fn test_mysql_container_imports_mysql_constructor() {
        let mut config = Config::default();
        config.database.kind = crate::core::config::Dialect("mysql".to_string());
        let names = FeatureNames::new("Order").unwrap();
        let fields = parse_fields("total:float64").unwrap();
        let src = render_container(&EmitContext {
            config: &config,
            names: &names,
            fields: &fields,
        });
        assert!(src.contains("repository.NewMysqlOrderRepository(c.db)"));
    }

    #[test]
    fn test_mongo_container_uses_mongo_handle() {
        let mut config = Config::default();
        config.database.kind = crate::core::config::Dialect("mongodb".to_string());
        let names = FeatureNames::new("Order").unwrap();
        let fields = parse_fields("total:float64").unwrap();
        let src = render_container(&EmitContext {
            config: &config,
            names: &names,
            fields: &fields,
        });
        assert!(src.contains("db *mongo.Database"));
        assert!(src.contains("go.mongodb.org/mongo-driver/mongo"));
    }

    #[test]
    fn test_empty_container_has_no_wiring() {
        let config = Config::default();
        let src = render_empty_container(&config);
        assert!(!src.contains("wiring"));
        assert!(src.contains("func NewContainer(db *gorm.DB) *Container"));
    }
}
