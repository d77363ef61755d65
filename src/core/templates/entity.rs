//! Domain-layer emitters: entity struct, shared error declarations, seed
//! data, and entity unit tests.

use crate::core::fields::{Field, FieldType, GoType};
use crate::core::templates::{EmitContext, GoImports};

fn is_plain_scalar(field: &Field) -> bool {
    matches!(
        field.ty,
        FieldType::Base(
            GoType::String
                | GoType::Int
                | GoType::Int64
                | GoType::Uint
                | GoType::Uint64
                | GoType::Float32
                | GoType::Float64
                | GoType::Bool
        )
    )
}

/// Seed/fixture literal for record number `n` (1-based).
fn sample_value(field: &Field, n: usize) -> String {
    match field.ty.base() {
        GoType::String => {
            if field.name == "email" {
                format!("\"user{}@example.com\"", n)
            } else {
                format!("\"{} sample {}\"", field.name.replace('_', " "), n)
            }
        }
        GoType::Int | GoType::Int64 | GoType::Uint | GoType::Uint64 => n.to_string(),
        GoType::Float32 | GoType::Float64 => format!("{}.5", n),
        GoType::Bool => if n % 2 == 1 { "true" } else { "false" }.to_string(),
        GoType::Time | GoType::Bytes | GoType::Interface => "nil".to_string(),
    }
}

fn required(field: &Field) -> bool {
    field.validate_tag().split(',').any(|r| r == "required")
}

/// Lower bound declared via a `gte=N` rule; only plain numeric columns
/// can carry one (Go's `<` does not apply to anything else).
fn gte_bound(field: &Field) -> Option<String> {
    if !matches!(field.ty, FieldType::Base(t) if t.is_numeric()) {
        return None;
    }
    field
        .tags
        .iter()
        .find_map(|t| t.strip_prefix("gte=").map(str::to_string))
}

fn struct_field_line(ctx: &EmitContext, field: &Field) -> String {
    let mut tags = vec![format!("json:\"{}\"", field.json_tag())];
    if ctx.validation() {
        tags.push(format!("validate:\"{}\"", field.validate_tag()));
    }
    if field.tags.iter().any(|t| t == "unique") || field.name == "email" {
        tags.push("gorm:\"uniqueIndex\"".to_string());
    }
    format!(
        "\t{} {} `{}`\n",
        field.go_name(),
        field.ty.go_spelling(),
        tags.join(" ")
    )
}

/// Emit `internal/domain/<base>.go`.
pub fn render_entity(ctx: &EmitContext) -> String {
    let names = ctx.names;
    let recv = names.receiver();

    let mut imports = GoImports::new(&ctx.module());
    let has_time_field = ctx.fields.iter().any(|f| f.ty.needs_time_import());
    if ctx.timestamps() || ctx.soft_delete() || has_time_field {
        imports.add("time");
    }
    if ctx.soft_delete() {
        imports.add("gorm.io/gorm");
    }
    // `strings` only when an emitted method body actually calls into it.
    let validate_uses_strings = ctx.validation()
        && ctx
            .fields
            .iter()
            .any(|f| f.ty == FieldType::Base(GoType::String) && required(f));
    let normalize_uses_strings = ctx.business_rules()
        && ctx
            .fields
            .iter()
            .any(|f| f.ty == FieldType::Base(GoType::String));
    if validate_uses_strings || normalize_uses_strings {
        imports.add("strings");
    }

    let mut body = String::new();
    body.push_str(&format!(
        "// {} represents a single {} record.\ntype {} struct {{\n",
        names.pascal, names.human, names.pascal
    ));
    if ctx.uuid_keys() {
        body.push_str(
            "\tID string `json:\"id\" gorm:\"primaryKey;type:uuid;default:gen_random_uuid()\"`\n",
        );
    } else {
        body.push_str("\tID uint `json:\"id\" gorm:\"primaryKey\"`\n");
    }
    for field in ctx.fields {
        body.push_str(&struct_field_line(ctx, field));
    }
    if ctx.timestamps() {
        body.push_str("\tCreatedAt time.Time `json:\"created_at\"`\n");
        body.push_str("\tUpdatedAt time.Time `json:\"updated_at\"`\n");
    }
    if ctx.soft_delete() {
        body.push_str("\tDeletedAt gorm.DeletedAt `json:\"deleted_at,omitempty\" gorm:\"index\"`\n");
    }
    body.push_str("}\n\n");

    body.push_str(&format!(
        "// TableName maps the entity to its table.\nfunc ({}) TableName() string {{\n\treturn \"{}\"\n}}\n",
        names.pascal, names.plural_snake
    ));

    if ctx.validation() {
        body.push_str(&format!(
            "\n// Validate checks entity-level invariants before persistence.\nfunc ({} *{}) Validate() error {{\n",
            recv, names.pascal
        ));
        for field in ctx.fields {
            if field.ty == FieldType::Base(GoType::String) && required(field) {
                body.push_str(&format!(
                    "\tif strings.TrimSpace({}.{}) == \"\" {{\n\t\treturn ErrInvalid{}Data\n\t}}\n",
                    recv,
                    field.go_name(),
                    names.pascal
                ));
            }
            if let Some(bound) = gte_bound(field) {
                body.push_str(&format!(
                    "\tif {}.{} < {} {{\n\t\treturn ErrInvalid{}Data\n\t}}\n",
                    recv,
                    field.go_name(),
                    bound,
                    names.pascal
                ));
            }
        }
        body.push_str("\treturn nil\n}\n");
    }

    if ctx.soft_delete() {
        body.push_str(&format!(
            "\n// MarkDeleted flags the {} as soft-deleted.\nfunc ({} *{}) MarkDeleted() {{\n\t{}.DeletedAt = gorm.DeletedAt{{Time: time.Now(), Valid: true}}\n}}\n",
            names.human, recv, names.pascal, recv
        ));
        body.push_str(&format!(
            "\n// IsDeleted reports whether the {} is soft-deleted.\nfunc ({} *{}) IsDeleted() bool {{\n\treturn {}.DeletedAt.Valid\n}}\n",
            names.human, recv, names.pascal, recv
        ));
    }

    if ctx.business_rules() {
        let string_fields: Vec<&Field> = ctx
            .fields
            .iter()
            .filter(|f| f.ty == FieldType::Base(GoType::String))
            .collect();
        if !string_fields.is_empty() {
            body.push_str(&format!(
                "\n// Normalize trims free-text fields before persistence.\nfunc ({} *{}) Normalize() {{\n",
                recv, names.pascal
            ));
            for field in string_fields {
                body.push_str(&format!(
                    "\t{}.{} = strings.TrimSpace({}.{})\n",
                    recv,
                    field.go_name(),
                    recv,
                    field.go_name()
                ));
            }
            body.push_str("}\n");
        }
    }

    format!("package domain\n\n{}{}", imports.render(), body)
}

/// Header for a fresh `internal/domain/errors.go`.
pub fn render_errors_header() -> String {
    "package domain\n\nimport \"errors\"\n".to_string()
}

/// Marker line identifying a feature's error block.
pub fn errors_marker(ctx: &EmitContext) -> String {
    format!("// {} errors", ctx.names.pascal)
}

/// Error declarations for one feature, appended to `errors.go`.
pub fn render_errors_block(ctx: &EmitContext) -> String {
    let names = ctx.names;
    format!(
        "\n{}\nvar (\n\tErr{}NotFound = errors.New(\"{} not found\")\n\tErrInvalid{}Data = errors.New(\"invalid {} data\")\n\tErr{}AlreadyExists = errors.New(\"{} already exists\")\n)\n",
        errors_marker(ctx),
        names.pascal,
        names.human,
        names.pascal,
        names.human,
        names.pascal,
        names.human
    )
}

/// Emit `internal/domain/<base>_seeds.go`. Deliberately import-free: only
/// plain scalar fields receive sample values.
pub fn render_seeds(ctx: &EmitContext) -> String {
    let names = ctx.names;
    let mut records = String::new();
    for n in 1..=2 {
        records.push_str("\t\t{\n");
        for field in ctx.fields.iter().filter(|f| is_plain_scalar(f)) {
            records.push_str(&format!(
                "\t\t\t{}: {},\n",
                field.go_name(),
                sample_value(field, n)
            ));
        }
        records.push_str("\t\t},\n");
    }
    format!(
        "package domain\n\n// {}Seeds returns sample {} records for development databases.\nfunc {}Seeds() []{} {{\n\treturn []{}{{\n{}\t}}\n}}\n",
        names.pascal, names.human, names.pascal, names.pascal, names.pascal, records
    )
}

fn fixture_literal(ctx: &EmitContext) -> String {
    let mut fixture = String::new();
    for field in ctx.fields.iter().filter(|f| is_plain_scalar(f)) {
        fixture.push_str(&format!("{}: {}, ", field.go_name(), sample_value(field, 1)));
    }
    fixture.trim_end_matches(", ").to_string()
}

/// Emit `internal/domain/<base>_test.go` in the configured test framework.
pub fn render_entity_test(ctx: &EmitContext) -> String {
    let names = ctx.names;
    let testify = ctx.config.generation.tests.framework == "testify";

    let mut imports = GoImports::new(&ctx.module());
    imports.add("testing");
    if testify {
        imports.add("github.com/stretchr/testify/assert");
    }

    let mut body = String::new();

    body.push_str(&format!(
        "func Test{}TableName(t *testing.T) {{\n",
        names.pascal
    ));
    if testify {
        body.push_str(&format!(
            "\tassert.Equal(t, \"{}\", {}{{}}.TableName())\n",
            names.plural_snake, names.pascal
        ));
    } else {
        body.push_str(&format!(
            "\tif got := {}{{}}.TableName(); got != \"{}\" {{\n\t\tt.Fatalf(\"unexpected table name %q\", got)\n\t}}\n",
            names.pascal, names.plural_snake
        ));
    }
    body.push_str("}\n");

    if ctx.validation() {
        let fixture = fixture_literal(ctx);
        body.push_str(&format!(
            "\nfunc Test{}Validate(t *testing.T) {{\n\t{} := {}{{{}}}\n",
            names.pascal, names.camel, names.pascal, fixture
        ));
        if testify {
            body.push_str(&format!("\tassert.NoError(t, {}.Validate())\n", names.camel));
        } else {
            body.push_str(&format!(
                "\tif err := {}.Validate(); err != nil {{\n\t\tt.Fatalf(\"expected valid {}, got %v\", err)\n\t}}\n",
                names.camel, names.human
            ));
        }
        body.push_str("}\n");

        if let Some(first_required) = ctx
            .fields
            .iter()
            .find(|f| f.ty == FieldType::Base(GoType::String) && required(f))
        {
            body.push_str(&format!(
                "\nfunc Test{}ValidateRejectsEmpty{}(t *testing.T) {{\n\tvar {} {}\n",
                names.pascal,
                first_required.go_name(),
                names.camel,
                names.pascal
            ));
            if testify {
                body.push_str(&format!("\tassert.Error(t, {}.Validate())\n", names.camel));
            } else {
                body.push_str(&format!(
                    "\tif err := {}.Validate(); err == nil {{\n\t\tt.Fatal(\"expected validation error\")\n\t}}\n",
                    names.camel
                ));
            }
            body.push_str("}\n");
        }
    }

    if ctx.soft_delete() {
        body.push_str(&format!(
            "\nfunc Test{}SoftDelete(t *testing.T) {{\n\tvar {} {}\n",
            names.pascal, names.camel, names.pascal
        ));
        if testify {
            body.push_str(&format!(
                "\tassert.False(t, {}.IsDeleted())\n\t{}.MarkDeleted()\n\tassert.True(t, {}.IsDeleted())\n",
                names.camel, names.camel, names.camel
            ));
        } else {
            body.push_str(&format!(
                "\tif {}.IsDeleted() {{\n\t\tt.Fatal(\"fresh {} must not be deleted\")\n\t}}\n\t{}.MarkDeleted()\n\tif !{}.IsDeleted() {{\n\t\tt.Fatal(\"MarkDeleted must set the deletion flag\")\n\t}}\n",
                names.camel, names.human, names.camel, names.camel
            ));
        }
        body.push_str("}\n");
    }

    format!("package domain\n\n{}{}", imports.render(), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::fields::parse_fields;
    use crate::core::templates::FeatureNames;

    fn ctx_with<'a>(
        config: &'a Config,
        names: &'a FeatureNames,
        fields: &'a [Field],
    ) -> EmitContext<'a> {
        EmitContext {
            config,
            names,
            fields,
        }
    }

    #[test]
    fn test_soft_delete_entity_shape() {
        let mut config = Config::default();
        config.database.features.soft_delete = true;
        let names = FeatureNames::new("Order").unwrap();
        let fields = parse_fields("total:float64").unwrap();
        let src = render_entity(&ctx_with(&config, &names, &fields));

        assert!(src.contains("\"time\""));
        assert!(src.contains("\"gorm.io/gorm\""));
        assert!(src.contains("CreatedAt time.Time"));
        assert!(src.contains("UpdatedAt time.Time"));
        assert!(src.contains("DeletedAt gorm.DeletedAt"));
        assert!(src.contains("func (o *Order) MarkDeleted()"));
        assert!(src.contains("func (o *Order) IsDeleted() bool"));
    }

    #[test]
    fn test_entity_without_time_needs_no_time_import() {
        let mut config = Config::default();
        config.database.features.timestamps = false;
        let names = FeatureNames::new("Tag").unwrap();
        let fields = parse_fields("label:string").unwrap();
        let src = render_entity(&ctx_with(&config, &names, &fields));
        assert!(!src.contains("\"time\""));
        assert!(!src.contains("gorm.io/gorm"));
    }

    #[test]
    fn test_validation_tags_follow_config() {
        let names = FeatureNames::new("Product").unwrap();
        let fields = parse_fields("name:string,price:float64:required,gte=0").unwrap();

        let enabled = Config::default();
        let src = render_entity(&ctx_with(&enabled, &names, &fields));
        assert!(src.contains("validate:\"required\""));
        assert!(src.contains("validate:\"required,gte=0\""));
        assert!(src.contains("if p.Price < 0 {"));

        let mut disabled = Config::default();
        disabled.generation.validation.enabled = false;
        let src = render_entity(&ctx_with(&disabled, &names, &fields));
        assert!(!src.contains("validate:"));
        assert!(!src.contains("func (p *Product) Validate()"));
    }

    #[test]
    fn test_seeds_have_no_imports() {
        let config = Config::default();
        let names = FeatureNames::new("User").unwrap();
        let fields = parse_fields("name:string,email:string,age:int,joined:time.Time").unwrap();
        let src = render_seeds(&ctx_with(&config, &names, &fields));
        assert!(!src.contains("import"));
        assert!(src.contains("func UserSeeds() []User"));
        assert!(src.contains("user1@example.com"));
        // The time-typed field is omitted rather than dragging in an import.
        assert!(!src.contains("Joined"));
    }

    #[test]
    fn test_errors_block_is_marked() {
        let config = Config::default();
        let names = FeatureNames::new("Order").unwrap();
        let fields = parse_fields("total:float64").unwrap();
        let ctx = ctx_with(&config, &names, &fields);
        let block = render_errors_block(&ctx);
        assert!(block.contains("// Order errors"));
        assert!(block.contains("ErrOrderNotFound"));
        assert!(block.contains("ErrOrderAlreadyExists"));
    }

    #[test]
    fn test_entity_test_uses_configured_framework() {
        let config = Config::default();
        let names = FeatureNames::new("User").unwrap();
        let fields = parse_fields("name:string").unwrap();
        let src = render_entity_test(&ctx_with(&config, &names, &fields));
        assert!(src.contains("github.com/stretchr/testify/assert"));

        let mut plain = Config::default();
        plain.generation.tests.framework = "gotest".to_string();
        let src = render_entity_test(&ctx_with(&plain, &names, &fields));
        assert!(!src.contains("testify"));
        assert!(src.contains("t.Fatalf"));
    }
}
