//! Use-case DTO emitter: request/response records for create, read,
//! update, and list operations.

use crate::core::fields::{Field, FieldType, GoType};
use crate::core::templates::{EmitContext, GoImports};

fn required(field: &Field) -> bool {
    field.validate_tag().split(',').any(|r| r == "required")
}

// Only plain numeric columns can carry a lower bound; see the matching
// guard in the entity emitter.
fn gte_bound(field: &Field) -> Option<String> {
    if !matches!(field.ty, FieldType::Base(t) if t.is_numeric()) {
        return None;
    }
    field
        .tags
        .iter()
        .find_map(|t| t.strip_prefix("gte=").map(str::to_string))
}

/// Optional ("patch") spelling of a field type for the update request:
/// value types become pointers so "omitted" stays distinguishable from the
/// zero value; pointers and slices are already nilable.
fn patch_spelling(ty: FieldType) -> String {
    match ty {
        FieldType::Base(t) => format!("*{}", t.go_spelling()),
        FieldType::Pointer(t) => format!("*{}", t.go_spelling()),
        FieldType::Slice(t) => format!("[]{}", t.go_spelling()),
    }
}

/// Emit `internal/usecase/dto/<base>_dto.go`.
pub fn render_dto(ctx: &EmitContext) -> String {
    let names = ctx.names;

    let mut imports = GoImports::new(&ctx.module());
    imports.add("errors");
    if ctx.timestamps() || ctx.fields.iter().any(|f| f.ty.needs_time_import()) {
        imports.add("time");
    }
    let has_required_string = ctx.validation()
        && ctx
            .fields
            .iter()
            .any(|f| f.ty == FieldType::Base(GoType::String) && required(f));
    if has_required_string {
        imports.add("strings");
    }

    let mut body = String::new();

    body.push_str(&format!(
        "var (\n\tErrInvalidCreate{}Payload = errors.New(\"invalid create {} payload\")\n\tErrInvalidUpdate{}Payload = errors.New(\"invalid update {} payload\")\n)\n\n",
        names.pascal, names.human, names.pascal, names.human
    ));

    // Create request.
    body.push_str(&format!(
        "// Create{}Request carries the payload to create one {}.\ntype Create{}Request struct {{\n",
        names.pascal, names.human, names.pascal
    ));
    for field in ctx.fields {
        let mut tags = vec![format!("json:\"{}\"", field.json_tag())];
        if ctx.validation() {
            tags.push(format!("validate:\"{}\"", field.validate_tag()));
        }
        body.push_str(&format!(
            "\t{} {} `{}`\n",
            field.go_name(),
            field.ty.go_spelling(),
            tags.join(" ")
        ));
    }
    body.push_str("}\n\n");

    body.push_str(&format!(
        "// Validate checks the create payload before it reaches the domain.\nfunc (r *Create{}Request) Validate() error {{\n",
        names.pascal
    ));
    if ctx.validation() {
        for field in ctx.fields {
            if field.ty == FieldType::Base(GoType::String) && required(field) {
                body.push_str(&format!(
                    "\tif strings.TrimSpace(r.{}) == \"\" {{\n\t\treturn ErrInvalidCreate{}Payload\n\t}}\n",
                    field.go_name(),
                    names.pascal
                ));
            }
            if let Some(bound) = gte_bound(field) {
                body.push_str(&format!(
                    "\tif r.{} < {} {{\n\t\treturn ErrInvalidCreate{}Payload\n\t}}\n",
                    field.go_name(),
                    bound,
                    names.pascal
                ));
            }
        }
    }
    body.push_str("\treturn nil\n}\n\n");

    // Update request: every field optional.
    body.push_str(&format!(
        "// Update{}Request patches an existing {}; nil fields are left untouched.\ntype Update{}Request struct {{\n",
        names.pascal, names.human, names.pascal
    ));
    for field in ctx.fields {
        body.push_str(&format!(
            "\t{} {} `json:\"{},omitempty\"`\n",
            field.go_name(),
            patch_spelling(field.ty),
            field.json_tag()
        ));
    }
    body.push_str("}\n\n");

    body.push_str(&format!(
        "// Validate rejects an update that patches nothing.\nfunc (r *Update{}Request) Validate() error {{\n\tif ",
        names.pascal
    ));
    let empties: Vec<String> = ctx
        .fields
        .iter()
        .map(|f| format!("r.{} == nil", f.go_name()))
        .collect();
    body.push_str(&empties.join(" && "));
    body.push_str(&format!(
        " {{\n\t\treturn ErrInvalidUpdate{}Payload\n\t}}\n\treturn nil\n}}\n\n",
        names.pascal
    ));

    // Response.
    body.push_str(&format!(
        "// {}Response is the transport representation of a {}.\ntype {}Response struct {{\n",
        names.pascal, names.human, names.pascal
    ));
    body.push_str(&format!(
        "\tID {} `json:\"id\"`\n",
        ctx.id_type()
    ));
    for field in ctx.fields {
        body.push_str(&format!(
            "\t{} {} `json:\"{}\"`\n",
            field.go_name(),
            field.ty.go_spelling(),
            field.json_tag()
        ));
    }
    if ctx.timestamps() {
        body.push_str("\tCreatedAt time.Time `json:\"created_at\"`\n");
        body.push_str("\tUpdatedAt time.Time `json:\"updated_at\"`\n");
    }
    body.push_str("}\n\n");

    // List response with pagination metadata.
    body.push_str(&format!(
        "// List{}Response carries one page of {} records.\ntype List{}Response struct {{\n\tItems []{}Response `json:\"items\"`\n\tTotal int64 `json:\"total\"`\n\tPage int `json:\"page\"`\n\tPageSize int `json:\"page_size\"`\n\tTotalPages int `json:\"total_pages\"`\n\tHasNext bool `json:\"has_next\"`\n\tHasPrev bool `json:\"has_prev\"`\n}}\n",
        names.plural_pascal(),
        names.human,
        names.plural_pascal(),
        names.pascal
    ));

    format!("package dto\n\n{}{}", imports.render(), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::fields::parse_fields;
    use crate::core::templates::FeatureNames;

    #[test]
    fn test_update_request_uses_optional_fields() {
        let config = Config::default();
        let names = FeatureNames::new("Product").unwrap();
        let fields = parse_fields("name:string,price:float64,tags:[]string").unwrap();
        let src = render_dto(&EmitContext {
            config: &config,
            names: &names,
            fields: &fields,
        });
        assert!(src.contains("Name *string `json:\"name,omitempty\"`"));
        assert!(src.contains("Price *float64 `json:\"price,omitempty\"`"));
        assert!(src.contains("Tags []string `json:\"tags,omitempty\"`"));
    }

    #[test]
    fn test_list_response_carries_pagination() {
        let config = Config::default();
        let names = FeatureNames::new("Product").unwrap();
        let fields = parse_fields("name:string").unwrap();
        let src = render_dto(&EmitContext {
            config: &config,
            names: &names,
            fields: &fields,
        });
        for needle in [
            "Total int64",
            "Page int",
            "PageSize int",
            "TotalPages int",
            "HasNext bool",
            "HasPrev bool",
        ] {
            assert!(src.contains(needle), "missing {}", needle);
        }
    }

    #[test]
    fn test_create_request_tags_follow_validation_toggle() {
        let names = FeatureNames::new("Product").unwrap();
        let fields = parse_fields("name:string").unwrap();
        let mut config = Config::default();
        config.generation.validation.enabled = false;
        let src = render_dto(&EmitContext {
            config: &config,
            names: &names,
            fields: &fields,
        });
        assert!(!src.contains("validate:"));
        // Validate methods are still emitted; the update no-op check stays.
        assert!(src.contains("func (r *UpdateProductRequest) Validate() error"));
    }
}
