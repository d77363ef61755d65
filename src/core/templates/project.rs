//! Project skeleton emitters for `goca init`: go.mod and the server entry
//! point the integrator later patches.

use crate::core::config::{Config, DatabaseDialect, HandlerKind};
use crate::core::templates::GoImports;

/// Emit `go.mod` for a fresh project.
pub fn render_go_mod(config: &Config) -> String {
    let mut requires = vec!["\tgithub.com/gin-gonic/gin v1.10.0".to_string()];
    match config.database_dialect() {
        DatabaseDialect::Postgres => {
            requires.push("\tgorm.io/driver/postgres v1.5.9".to_string());
            requires.push("\tgorm.io/gorm v1.25.12".to_string());
        }
        DatabaseDialect::Mysql => {
            requires.push("\tgorm.io/driver/mysql v1.5.7".to_string());
            requires.push("\tgorm.io/gorm v1.25.12".to_string());
        }
        DatabaseDialect::Sqlite => {
            requires.push("\tgorm.io/driver/sqlite v1.5.6".to_string());
            requires.push("\tgorm.io/gorm v1.25.12".to_string());
        }
        DatabaseDialect::Mongodb => {
            requires.push("\tgo.mongodb.org/mongo-driver v1.16.1".to_string());
        }
    }
    if config.handler_kinds().contains(&HandlerKind::Cli) {
        requires.push("\tgithub.com/spf13/cobra v1.8.1".to_string());
    }
    if config.generation.tests.enabled && config.generation.tests.framework == "testify" {
        requires.push("\tgithub.com/stretchr/testify v1.9.0".to_string());
    }
    requires.sort();

    format!(
        "module {}\n\ngo 1.23\n\nrequire (\n{}\n)\n",
        config.module_path(),
        requires.join("\n")
    )
}

fn dsn_snippet(config: &Config) -> String {
    let conn = &config.database.connection;
    match config.database_dialect() {
        DatabaseDialect::Postgres => format!(
            "\tdsn := fmt.Sprintf(\"host=%s port=%d dbname=%s sslmode=%s\", \"{}\", {}, \"{}\", \"{}\")\n\tdb, err := gorm.Open(postgres.Open(dsn), &gorm.Config{{}})\n",
            conn.host, conn.port, config.project.name, conn.ssl_mode
        ),
        DatabaseDialect::Mysql => format!(
            "\tdsn := fmt.Sprintf(\"root@tcp(%s:%d)/%s?parseTime=true\", \"{}\", {}, \"{}\")\n\tdb, err := gorm.Open(mysql.Open(dsn), &gorm.Config{{}})\n",
            conn.host, conn.port, config.project.name
        ),
        DatabaseDialect::Sqlite => format!(
            "\tdb, err := gorm.Open(sqlite.Open(\"{}.db\"), &gorm.Config{{}})\n",
            config.project.name
        ),
        DatabaseDialect::Mongodb => String::new(),
    }
}

/// Emit `cmd/server/main.go`.
///
/// The entry point carries the regions the integrator patches later: the
/// import block, the auto-migration entity list, the DI container
/// construction, and the `/api/v1` route group.
pub fn render_main(config: &Config) -> String {
    let module = config.module_path();
    let dialect = config.database_dialect();

    let mut imports = GoImports::new(&module);
    imports.add("log");
    imports.add("github.com/gin-gonic/gin");
    imports.add(&format!("{}/internal/di", module));

    let open_db = match dialect {
        DatabaseDialect::Postgres => {
            imports.add("fmt");
            imports.add("gorm.io/driver/postgres");
            imports.add("gorm.io/gorm");
            dsn_snippet(config)
        }
        DatabaseDialect::Mysql => {
            imports.add("fmt");
            imports.add("gorm.io/driver/mysql");
            imports.add("gorm.io/gorm");
            dsn_snippet(config)
        }
        DatabaseDialect::Sqlite => {
            imports.add("gorm.io/driver/sqlite");
            imports.add("gorm.io/gorm");
            dsn_snippet(config)
        }
        DatabaseDialect::Mongodb => {
            imports.add("context");
            imports.add("go.mongodb.org/mongo-driver/mongo");
            imports.add("go.mongodb.org/mongo-driver/mongo/options");
            format!(
                "\tclient, err := mongo.Connect(context.Background(), options.Client().ApplyURI(\"mongodb://{}:{}\"))\n",
                config.database.connection.host, config.database.connection.port
            )
        }
    };

    let connect_and_migrate = if dialect == DatabaseDialect::Mongodb {
        format!(
            "{open_db}\tif err != nil {{\n\t\tlog.Fatalf(\"connect database: %v\", err)\n\t}}\n\tdb := client.Database(\"{}\")\n",
            config.project.name,
            open_db = open_db
        )
    } else {
        format!(
            "{open_db}\tif err != nil {{\n\t\tlog.Fatalf(\"connect database: %v\", err)\n\t}}\n\n\tentities := []interface{{}}{{\n\t\t// Example: &domain.User{{}}\n\t}}\n\tif err := db.AutoMigrate(entities...); err != nil {{\n\t\tlog.Fatalf(\"auto-migrate: %v\", err)\n\t}}\n",
            open_db = open_db
        )
    };

    format!(
        "package main\n\n{imports}func main() {{\n{connect_and_migrate}\n\tcontainer := di.NewContainer(db)\n\t_ = container\n\n\trouter := gin.Default()\n\tapi := router.Group(\"/api/v1\")\n\t_ = api\n\n\tif err := router.Run(\":8080\"); err != nil {{\n\t\tlog.Fatalf(\"serve: %v\", err)\n\t}}\n}}\n",
        imports = imports.render(),
        connect_and_migrate = connect_and_migrate
    )
}
