//! Repository emitters: the domain-facing contract plus one
//! implementation per database dialect. The GORM dialects (postgres,
//! mysql, sqlite) share a single API shape; mongodb uses collection
//! operations.

use crate::core::config::DatabaseDialect;
use crate::core::fields::{unique_field, Field};
use crate::core::templates::{EmitContext, GoImports};

/// Header for a fresh `internal/repository/interfaces.go`.
pub fn render_interfaces_header(ctx: &EmitContext) -> String {
    let module = ctx.module();
    format!(
        "package repository\n\nimport \"{}/{}\"\n",
        module,
        ctx.config.domain_path()
    )
}

/// Marker line identifying a feature's repository contract.
pub fn interface_marker(ctx: &EmitContext) -> String {
    format!("type {}Repository interface", ctx.names.pascal)
}

/// The repository contract for one feature, appended to `interfaces.go`.
pub fn render_interface_block(ctx: &EmitContext) -> String {
    let names = ctx.names;
    let id_type = ctx.id_type();
    let mut ops = vec![
        format!("\tSave({} *domain.{}) error", names.camel, names.pascal),
        format!("\tFindByID(id {}) (*domain.{}, error)", id_type, names.pascal),
    ];
    if let Some(u) = unique_field(ctx.fields) {
        ops.push(format!(
            "\tFindBy{}({} {}) (*domain.{}, error)",
            u.go_name(),
            u.name,
            u.ty.go_spelling(),
            names.pascal
        ));
    }
    ops.push(format!("\tUpdate({} *domain.{}) error", names.camel, names.pascal));
    ops.push(format!("\tDelete(id {}) error", id_type));
    ops.push(format!(
        "\tFindAll(limit, offset int) ([]domain.{}, int64, error)",
        names.pascal
    ));

    format!(
        "\n// {}Repository persists {} records.\n{} {{\n{}\n}}\n",
        names.pascal,
        names.human,
        interface_marker(ctx),
        ops.join("\n")
    )
}

/// Emit the dialect-specific implementation file.
pub fn render_implementation(ctx: &EmitContext, dialect: DatabaseDialect) -> String {
    match dialect {
        DatabaseDialect::Mongodb => render_mongo(ctx),
        _ => render_gorm(ctx, dialect),
    }
}

/// Exported constructor name for the dialect implementation
/// (`NewPostgresUserRepository`).
pub fn constructor_name(ctx: &EmitContext, dialect: DatabaseDialect) -> String {
    let dialect_pascal = match dialect {
        DatabaseDialect::Postgres => "Postgres",
        DatabaseDialect::Mysql => "Mysql",
        DatabaseDialect::Mongodb => "Mongo",
        DatabaseDialect::Sqlite => "Sqlite",
    };
    format!("New{}{}Repository", dialect_pascal, ctx.names.pascal)
}

fn render_gorm(ctx: &EmitContext, dialect: DatabaseDialect) -> String {
    let names = ctx.names;
    let module = ctx.module();
    let id_type = ctx.id_type();
    let constructor = constructor_name(ctx, dialect);
    let struct_name = format!(
        "{}{}Repository",
        dialect.as_str(),
        names.pascal
    );

    let mut imports = GoImports::new(&module);
    imports.add("errors");
    imports.add("gorm.io/gorm");
    imports.add(&format!("{}/{}", module, ctx.config.domain_path()));

    let unique = unique_field(ctx.fields);

    let mut body = String::new();
    body.push_str(&format!(
        "type {} struct {{\n\tdb *gorm.DB\n}}\n\n// {} builds the {} implementation of {}Repository.\nfunc {}(db *gorm.DB) {}Repository {{\n\treturn &{}{{db: db}}\n}}\n\n",
        struct_name,
        constructor,
        dialect.as_str(),
        names.pascal,
        constructor,
        names.pascal,
        struct_name
    ));

    body.push_str(&format!(
        "func (r *{}) Save({} *domain.{}) error {{\n\treturn r.db.Create({}).Error\n}}\n\n",
        struct_name, names.camel, names.pascal, names.camel
    ));

    body.push_str(&format!(
        "func (r *{}) FindByID(id {}) (*domain.{}, error) {{\n\tvar {} domain.{}\n\tif err := r.db.First(&{}, \"id = ?\", id).Error; err != nil {{\n\t\tif errors.Is(err, gorm.ErrRecordNotFound) {{\n\t\t\treturn nil, domain.Err{}NotFound\n\t\t}}\n\t\treturn nil, err\n\t}}\n\treturn &{}, nil\n}}\n\n",
        struct_name, id_type, names.pascal, names.camel, names.pascal, names.camel, names.pascal, names.camel
    ));

    if let Some(u) = unique {
        body.push_str(&format!(
            "func (r *{}) FindBy{}({} {}) (*domain.{}, error) {{\n\tvar {} domain.{}\n\tif err := r.db.First(&{}, \"{} = ?\", {}).Error; err != nil {{\n\t\tif errors.Is(err, gorm.ErrRecordNotFound) {{\n\t\t\treturn nil, domain.Err{}NotFound\n\t\t}}\n\t\treturn nil, err\n\t}}\n\treturn &{}, nil\n}}\n\n",
            struct_name,
            u.go_name(),
            u.name,
            u.ty.go_spelling(),
            names.pascal,
            names.camel,
            names.pascal,
            names.camel,
            u.name,
            u.name,
            names.pascal,
            names.camel
        ));
    }

    body.push_str(&format!(
        "func (r *{}) Update({} *domain.{}) error {{\n\treturn r.db.Save({}).Error\n}}\n\n",
        struct_name, names.camel, names.pascal, names.camel
    ));

    // gorm.DeletedAt turns Delete into an UPDATE and filters finds.
    body.push_str(&format!(
        "func (r *{}) Delete(id {}) error {{\n\treturn r.db.Delete(&domain.{}{{}}, \"id = ?\", id).Error\n}}\n\n",
        struct_name, id_type, names.pascal
    ));

    body.push_str(&format!(
        "func (r *{}) FindAll(limit, offset int) ([]domain.{}, int64, error) {{\n\tvar items []domain.{}\n\tvar total int64\n\tif err := r.db.Model(&domain.{}{{}}).Count(&total).Error; err != nil {{\n\t\treturn nil, 0, err\n\t}}\n\tif err := r.db.Limit(limit).Offset(offset).Find(&items).Error; err != nil {{\n\t\treturn nil, 0, err\n\t}}\n\treturn items, total, nil\n}}\n",
        struct_name, names.pascal, names.pascal, names.pascal
    ));

    format!("package repository\n\n{}{}", imports.render(), body)
}

fn mongo_not_deleted_filter(ctx: &EmitContext) -> &'static str {
    if ctx.soft_delete() {
        ", \"deleted_at\": nil"
    } else {
        ""
    }
}

fn render_mongo(ctx: &EmitContext) -> String {
    let names = ctx.names;
    let module = ctx.module();
    let id_type = ctx.id_type();
    let constructor = constructor_name(ctx, DatabaseDialect::Mongodb);
    let struct_name = format!("mongo{}Repository", names.pascal);
    let collection = &names.plural_snake;
    let alive = mongo_not_deleted_filter(ctx);

    let mut imports = GoImports::new(&module);
    imports.add("context");
    imports.add("time");
    imports.add("go.mongodb.org/mongo-driver/bson");
    imports.add("go.mongodb.org/mongo-driver/mongo");
    imports.add("go.mongodb.org/mongo-driver/mongo/options");
    imports.add(&format!("{}/{}", module, ctx.config.domain_path()));

    let mut body = String::new();
    body.push_str(&format!(
        "const {}Collection = \"{}\"\n\ntype {} struct {{\n\tdb *mongo.Database\n}}\n\n// {} builds the mongodb implementation of {}Repository.\nfunc {}(db *mongo.Database) {}Repository {{\n\treturn &{}{{db: db}}\n}}\n\nfunc (r *{}) ctx() (context.Context, context.CancelFunc) {{\n\treturn context.WithTimeout(context.Background(), 5*time.Second)\n}}\n\n",
        names.camel,
        collection,
        struct_name,
        constructor,
        names.pascal,
        constructor,
        names.pascal,
        struct_name,
        struct_name
    ));

    body.push_str(&format!(
        "func (r *{}) Save({} *domain.{}) error {{\n\tctx, cancel := r.ctx()\n\tdefer cancel()\n\t_, err := r.db.Collection({}Collection).InsertOne(ctx, {})\n\treturn err\n}}\n\n",
        struct_name, names.camel, names.pascal, names.camel, names.camel
    ));

    body.push_str(&format!(
        "func (r *{}) FindByID(id {}) (*domain.{}, error) {{\n\tctx, cancel := r.ctx()\n\tdefer cancel()\n\tvar {} domain.{}\n\terr := r.db.Collection({}Collection).FindOne(ctx, bson.M{{\"id\": id{}}}).Decode(&{})\n\tif err != nil {{\n\t\tif err == mongo.ErrNoDocuments {{\n\t\t\treturn nil, domain.Err{}NotFound\n\t\t}}\n\t\treturn nil, err\n\t}}\n\treturn &{}, nil\n}}\n\n",
        struct_name, id_type, names.pascal, names.camel, names.pascal, names.camel, alive, names.camel, names.pascal, names.camel
    ));

    if let Some(u) = unique_field(ctx.fields) {
        body.push_str(&format!(
            "func (r *{}) FindBy{}({} {}) (*domain.{}, error) {{\n\tctx, cancel := r.ctx()\n\tdefer cancel()\n\tvar {} domain.{}\n\terr := r.db.Collection({}Collection).FindOne(ctx, bson.M{{\"{}\": {}{}}}).Decode(&{})\n\tif err != nil {{\n\t\tif err == mongo.ErrNoDocuments {{\n\t\t\treturn nil, domain.Err{}NotFound\n\t\t}}\n\t\treturn nil, err\n\t}}\n\treturn &{}, nil\n}}\n\n",
            struct_name,
            u.go_name(),
            u.name,
            u.ty.go_spelling(),
            names.pascal,
            names.camel,
            names.pascal,
            names.camel,
            u.name,
            u.name,
            alive,
            names.camel,
            names.pascal,
            names.camel
        ));
    }

    body.push_str(&format!(
        "func (r *{}) Update({} *domain.{}) error {{\n\tctx, cancel := r.ctx()\n\tdefer cancel()\n\t_, err := r.db.Collection({}Collection).ReplaceOne(ctx, bson.M{{\"id\": {}.ID}}, {})\n\treturn err\n}}\n\n",
        struct_name, names.camel, names.pascal, names.camel, names.camel, names.camel
    ));

    if ctx.soft_delete() {
        body.push_str(&format!(
            "func (r *{}) Delete(id {}) error {{\n\tctx, cancel := r.ctx()\n\tdefer cancel()\n\t_, err := r.db.Collection({}Collection).UpdateOne(ctx, bson.M{{\"id\": id}}, bson.M{{\"$set\": bson.M{{\"deleted_at\": time.Now()}}}})\n\treturn err\n}}\n\n",
            struct_name, id_type, names.camel
        ));
    } else {
        body.push_str(&format!(
            "func (r *{}) Delete(id {}) error {{\n\tctx, cancel := r.ctx()\n\tdefer cancel()\n\t_, err := r.db.Collection({}Collection).DeleteOne(ctx, bson.M{{\"id\": id}})\n\treturn err\n}}\n\n",
            struct_name, id_type, names.camel
        ));
    }

    body.push_str(&format!(
        "func (r *{}) FindAll(limit, offset int) ([]domain.{}, int64, error) {{\n\tctx, cancel := r.ctx()\n\tdefer cancel()\n\tfilter := bson.M{{{}}}\n\ttotal, err := r.db.Collection({}Collection).CountDocuments(ctx, filter)\n\tif err != nil {{\n\t\treturn nil, 0, err\n\t}}\n\topts := options.Find().SetLimit(int64(limit)).SetSkip(int64(offset))\n\tcursor, err := r.db.Collection({}Collection).Find(ctx, filter, opts)\n\tif err != nil {{\n\t\treturn nil, 0, err\n\t}}\n\tdefer cursor.Close(ctx)\n\tvar items []domain.{}\n\tif err := cursor.All(ctx, &items); err != nil {{\n\t\treturn nil, 0, err\n\t}}\n\treturn items, total, nil\n}}\n",
        struct_name,
        names.pascal,
        alive.trim_start_matches(", "),
        names.camel,
        names.camel,
        names.pascal
    ));

    format!("package repository\n\n{}{}", imports.render(), body)
}
