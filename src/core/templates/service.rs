//! Use-case emitter: the service interface and its implementation over the
//! repository contract.

use crate::core::fields::{unique_field, FieldType, GoType};
use crate::core::templates::{EmitContext, GoImports};

/// Emit `internal/usecase/<base>_service.go`.
pub fn render_service(ctx: &EmitContext) -> String {
    let names = ctx.names;
    let module = ctx.module();
    let id_type = ctx.id_type();

    // The entity only grows a Normalize method when business rules are on
    // and there is free text to trim; the call sites must match that.
    let normalizes = ctx.business_rules()
        && ctx
            .fields
            .iter()
            .any(|f| f.ty == FieldType::Base(GoType::String));

    let mut imports = GoImports::new(&module);
    imports.add(&format!("{}/{}", module, ctx.config.domain_path()));
    imports.add(&format!("{}/{}", module, ctx.config.repository_path()));
    imports.add(&format!("{}/{}/dto", module, ctx.config.usecase_path()));

    let unique = unique_field(ctx.fields);

    let mut body = String::new();

    body.push_str(&format!(
        "// {}Service defines the use cases available for {} records.\ntype {}Service interface {{\n\tCreate(req dto.Create{}Request) (*dto.{}Response, error)\n\tGetByID(id {}) (*dto.{}Response, error)\n\tUpdate(id {}, req dto.Update{}Request) (*dto.{}Response, error)\n\tDelete(id {}) error\n\tList(page, pageSize int) (*dto.List{}Response, error)\n}}\n\n",
        names.pascal,
        names.human,
        names.pascal,
        names.pascal,
        names.pascal,
        id_type,
        names.pascal,
        id_type,
        names.pascal,
        names.pascal,
        id_type,
        names.plural_pascal()
    ));

    body.push_str(&format!(
        "type {}Service struct {{\n\trepo repository.{}Repository\n}}\n\n// New{}Service wires the use case over its repository.\nfunc New{}Service(repo repository.{}Repository) {}Service {{\n\treturn &{}Service{{repo: repo}}\n}}\n\n",
        names.camel, names.pascal, names.pascal, names.pascal, names.pascal, names.pascal, names.camel
    ));

    // Create.
    body.push_str(&format!(
        "func (s *{}Service) Create(req dto.Create{}Request) (*dto.{}Response, error) {{\n",
        names.camel, names.pascal, names.pascal
    ));
    body.push_str("\tif err := req.Validate(); err != nil {\n\t\treturn nil, err\n\t}\n");
    if let Some(u) = unique {
        body.push_str(&format!(
            "\tif existing, _ := s.repo.FindBy{}(req.{}); existing != nil {{\n\t\treturn nil, domain.Err{}AlreadyExists\n\t}}\n",
            u.go_name(),
            u.go_name(),
            names.pascal
        ));
    }
    body.push_str(&format!("\t{} := domain.{}{{\n", names.camel, names.pascal));
    for field in ctx.fields {
        body.push_str(&format!(
            "\t\t{}: req.{},\n",
            field.go_name(),
            field.go_name()
        ));
    }
    body.push_str("\t}\n");
    if normalizes {
        body.push_str(&format!("\t{}.Normalize()\n", names.camel));
    }
    if ctx.validation() {
        body.push_str(&format!(
            "\tif err := {}.Validate(); err != nil {{\n\t\treturn nil, err\n\t}}\n",
            names.camel
        ));
    }
    body.push_str(&format!(
        "\tif err := s.repo.Save(&{}); err != nil {{\n\t\treturn nil, err\n\t}}\n\tresp := to{}Response(&{})\n\treturn &resp, nil\n}}\n\n",
        names.camel, names.pascal, names.camel
    ));

    // GetByID.
    body.push_str(&format!(
        "func (s *{}Service) GetByID(id {}) (*dto.{}Response, error) {{\n\t{}, err := s.repo.FindByID(id)\n\tif err != nil {{\n\t\treturn nil, domain.Err{}NotFound\n\t}}\n\tresp := to{}Response({})\n\treturn &resp, nil\n}}\n\n",
        names.camel, id_type, names.pascal, names.camel, names.pascal, names.pascal, names.camel
    ));

    // Update: patch only the fields present in the optional DTO.
    body.push_str(&format!(
        "func (s *{}Service) Update(id {}, req dto.Update{}Request) (*dto.{}Response, error) {{\n\tif err := req.Validate(); err != nil {{\n\t\treturn nil, err\n\t}}\n\t{}, err := s.repo.FindByID(id)\n\tif err != nil {{\n\t\treturn nil, domain.Err{}NotFound\n\t}}\n",
        names.camel, id_type, names.pascal, names.pascal, names.camel, names.pascal
    ));
    for field in ctx.fields {
        let assign = match field.ty {
            FieldType::Base(_) => format!(
                "\tif req.{} != nil {{\n\t\t{}.{} = *req.{}\n\t}}\n",
                field.go_name(),
                names.camel,
                field.go_name(),
                field.go_name()
            ),
            FieldType::Pointer(_) | FieldType::Slice(_) => format!(
                "\tif req.{} != nil {{\n\t\t{}.{} = req.{}\n\t}}\n",
                field.go_name(),
                names.camel,
                field.go_name(),
                field.go_name()
            ),
        };
        body.push_str(&assign);
    }
    if normalizes {
        body.push_str(&format!("\t{}.Normalize()\n", names.camel));
    }
    if ctx.validation() {
        body.push_str(&format!(
            "\tif err := {}.Validate(); err != nil {{\n\t\treturn nil, err\n\t}}\n",
            names.camel
        ));
    }
    body.push_str(&format!(
        "\tif err := s.repo.Update({}); err != nil {{\n\t\treturn nil, err\n\t}}\n\tresp := to{}Response({})\n\treturn &resp, nil\n}}\n\n",
        names.camel, names.pascal, names.camel
    ));

    // Delete.
    body.push_str(&format!(
        "func (s *{}Service) Delete(id {}) error {{\n\tif _, err := s.repo.FindByID(id); err != nil {{\n\t\treturn domain.Err{}NotFound\n\t}}\n\treturn s.repo.Delete(id)\n}}\n\n",
        names.camel, id_type, names.pascal
    ));

    // List with page clamping.
    body.push_str(&format!(
        "func (s *{}Service) List(page, pageSize int) (*dto.List{}Response, error) {{\n\tif page < 1 {{\n\t\tpage = 1\n\t}}\n\tif pageSize < 1 {{\n\t\tpageSize = 1\n\t}}\n\tif pageSize > 100 {{\n\t\tpageSize = 100\n\t}}\n\toffset := (page - 1) * pageSize\n\titems, total, err := s.repo.FindAll(pageSize, offset)\n\tif err != nil {{\n\t\treturn nil, err\n\t}}\n\tresponses := make([]dto.{}Response, 0, len(items))\n\tfor i := range items {{\n\t\tresponses = append(responses, to{}Response(&items[i]))\n\t}}\n\ttotalPages := int((total + int64(pageSize) - 1) / int64(pageSize))\n\treturn &dto.List{}Response{{\n\t\tItems: responses,\n\t\tTotal: total,\n\t\tPage: page,\n\t\tPageSize: pageSize,\n\t\tTotalPages: totalPages,\n\t\tHasNext: page < totalPages,\n\t\tHasPrev: page > 1,\n\t}}, nil\n}}\n\n",
        names.camel,
        names.plural_pascal(),
        names.pascal,
        names.pascal,
        names.plural_pascal()
    ));

    // Response mapper.
    body.push_str(&format!(
        "func to{}Response({} *domain.{}) dto.{}Response {{\n\treturn dto.{}Response{{\n\t\tID: {}.ID,\n",
        names.pascal, names.camel, names.pascal, names.pascal, names.pascal, names.camel
    ));
    for field in ctx.fields {
        body.push_str(&format!(
            "\t\t{}: {}.{},\n",
            field.go_name(),
            names.camel,
            field.go_name()
        ));
    }
    if ctx.timestamps() {
        body.push_str(&format!(
            "\t\tCreatedAt: {}.CreatedAt,\n\t\tUpdatedAt: {}.UpdatedAt,\n",
            names.camel, names.camel
        ));
    }
    body.push_str("\t}\n}\n");

    format!("package usecase\n\n{}{}", imports.render(), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::fields::parse_fields;
    use crate::core::templates::FeatureNames;

    #[test]
    fn test_list_clamps_page_and_page_size() {
        let config = Config::default();
        let names = FeatureNames::new("Product").unwrap();
        let fields = parse_fields("name:string").unwrap();
        let src = render_service(&EmitContext {
            config: &config,
            names: &names,
            fields: &fields,
        });
        assert!(src.contains("if page < 1 {"));
        assert!(src.contains("if pageSize > 100 {"));
        assert!(src.contains("offset := (page - 1) * pageSize"));
    }

    #[test]
    fn test_unique_lookup_only_when_unique_field_exists() {
        let config = Config::default();
        let names = FeatureNames::new("User").unwrap();

        let with = parse_fields("name:string,email:string").unwrap();
        let src = render_service(&EmitContext {
            config: &config,
            names: &names,
            fields: &with,
        });
        assert!(src.contains("s.repo.FindByEmail(req.Email)"));
        assert!(src.contains("domain.ErrUserAlreadyExists"));

        let without = parse_fields("name:string").unwrap();
        let src = render_service(&EmitContext {
            config: &config,
            names: &names,
            fields: &without,
        });
        assert!(!src.contains("FindByEmail"));
    }

    #[test]
    fn test_update_patches_only_present_fields() {
        let config = Config::default();
        let names = FeatureNames::new("Product").unwrap();
        let fields = parse_fields("name:string,tags:[]string").unwrap();
        let src = render_service(&EmitContext {
            config: &config,
            names: &names,
            fields: &fields,
        });
        assert!(src.contains("if req.Name != nil {\n\t\tproduct.Name = *req.Name\n\t}"));
        assert!(src.contains("if req.Tags != nil {\n\t\tproduct.Tags = req.Tags\n\t}"));
    }

    #[test]
    fn test_business_rules_wire_normalize_into_create_and_update() {
        let names = FeatureNames::new("Product").unwrap();
        let fields = parse_fields("name:string,price:float64").unwrap();

        let mut config = Config::default();
        config.generation.business_rules.enabled = true;
        let src = render_service(&EmitContext {
            config: &config,
            names: &names,
            fields: &fields,
        });
        assert_eq!(src.matches("product.Normalize()").count(), 2);
        // Normalization runs before entity-level validation.
        let create = &src[src.find(") Create(").unwrap()..];
        assert!(create.find("product.Normalize()").unwrap() < create.find("product.Validate()").unwrap());

        let plain = Config::default();
        let src = render_service(&EmitContext {
            config: &plain,
            names: &names,
            fields: &fields,
        });
        assert!(!src.contains("Normalize"));

        // No string fields means no Normalize method to call.
        let numeric_only = parse_fields("price:float64").unwrap();
        let src = render_service(&EmitContext {
            config: &config,
            names: &names,
            fields: &numeric_only,
        });
        assert!(!src.contains("Normalize"));
    }

    #[test]
    fn test_service_imports_are_local_module_paths() {
        let mut config = Config::default();
        config.project.module = "github.com/acme/shop".to_string();
        let names = FeatureNames::new("Product").unwrap();
        let fields = parse_fields("name:string").unwrap();
        let src = render_service(&EmitContext {
            config: &config,
            names: &names,
            fields: &fields,
        });
        assert!(src.contains("\"github.com/acme/shop/internal/domain\""));
        assert!(src.contains("\"github.com/acme/shop/internal/repository\""));
        assert!(src.contains("\"github.com/acme/shop/internal/usecase/dto\""));
    }
}
