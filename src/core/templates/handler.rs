//! Transport handler emitters, one per handler kind.
//!
//! Each handler adapts one transport to the feature's service: parse
//! input, call the use case, translate domain errors to transport status,
//! emit the response.

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

/// Emit `internal/handler/http/<base>_handler.go` (gin).
pub fn render_http_handler(ctx: &EmitContext) -> String {
    let names = ctx.names;
    let module = ctx.module();
    let uuid = ctx.uuid_keys();

    let mut imports = GoImports::new(&module);
    imports.add("errors");
    imports.add("net/http");
    // List pagination parses query integers regardless of key type.
    imports.add("strconv");
    imports.add("github.com/gin-gonic/gin");
    imports.add(&format!("{}/{}", module, ctx.config.domain_path()));
    imports.add(&format!("{}/{}", module, ctx.config.usecase_path()));
    imports.add(&format!("{}/{}/dto", module, ctx.config.usecase_path()));

    let id_parse = if uuid {
        "\tid := c.Param(\"id\")\n".to_string()
    } else {
        "\tid64, err := strconv.ParseUint(c.Param(\"id\"), 10, 64)\n\tif err != nil {\n\t\tc.JSON(http.StatusBadRequest, gin.H{\"error\": \"invalid id\"})\n\t\treturn\n\t}\n\tid := uint(id64)\n".to_string()
    };

    let swagger = ctx.config.generation.documentation.swagger.enabled;
    let swag = |lines: &[String]| -> String {
        if swagger {
            lines.join("\n") + "\n"
        } else {
            String::new()
        }
    };

    let mut body = String::new();
    body.push_str(&format!(
        "// {}Handler adapts HTTP transport to the {} use cases.\ntype {}Handler struct {{\n\tservice usecase.{}Service\n}}\n\nfunc New{}Handler(service usecase.{}Service) *{}Handler {{\n\treturn &{}Handler{{service: service}}\n}}\n\n",
        names.pascal, names.human, names.pascal, names.pascal, names.pascal, names.pascal, names.pascal, names.pascal
    ));

    body.push_str(&swag(&[
        format!("// @Summary Create one {}", names.human),
        format!("// @Tags {}", names.plural_snake),
        "// @Accept json".to_string(),
        "// @Produce json".to_string(),
        format!(
            "// @Param request body dto.Create{}Request true \"create payload\"",
            names.pascal
        ),
        format!("// @Success 201 {{object}} dto.{}Response", names.pascal),
        format!("// @Router /{} [post]", names.plural_snake),
    ]));
    body.push_str(&format!(
        "// Create handles POST /api/v1/{}.\nfunc (h *{}Handler) Create(c *gin.Context) {{\n\tvar req dto.Create{}Request\n\tif err := c.ShouldBindJSON(&req); err != nil {{\n\t\tc.JSON(http.StatusBadRequest, gin.H{{\"error\": err.Error()}})\n\t\treturn\n\t}}\n\tresp, err := h.service.Create(req)\n\tif err != nil {{\n\t\th.writeError(c, err)\n\t\treturn\n\t}}\n\tc.JSON(http.StatusCreated, resp)\n}}\n\n",
        names.plural_snake, names.pascal, names.pascal
    ));

    body.push_str(&swag(&[
        format!("// @Summary Fetch one {} by id", names.human),
        format!("// @Tags {}", names.plural_snake),
        "// @Produce json".to_string(),
        "// @Param id path string true \"record id\"".to_string(),
        format!("// @Success 200 {{object}} dto.{}Response", names.pascal),
        format!("// @Router /{}/{{id}} [get]", names.plural_snake),
    ]));
    body.push_str(&format!(
        "// GetByID handles GET /api/v1/{}/:id.\nfunc (h *{}Handler) GetByID(c *gin.Context) {{\n{}\tresp, err := h.service.GetByID(id)\n\tif err != nil {{\n\t\th.writeError(c, err)\n\t\treturn\n\t}}\n\tc.JSON(http.StatusOK, resp)\n}}\n\n",
        names.plural_snake, names.pascal, id_parse
    ));

    body.push_str(&swag(&[
        format!("// @Summary Update one {}", names.human),
        format!("// @Tags {}", names.plural_snake),
        "// @Accept json".to_string(),
        "// @Produce json".to_string(),
        "// @Param id path string true \"record id\"".to_string(),
        format!(
            "// @Param request body dto.Update{}Request true \"patch payload\"",
            names.pascal
        ),
        format!("// @Success 200 {{object}} dto.{}Response", names.pascal),
        format!("// @Router /{}/{{id}} [put]", names.plural_snake),
    ]));
    body.push_str(&format!(
        "// Update handles PUT /api/v1/{}/:id.\nfunc (h *{}Handler) Update(c *gin.Context) {{\n{}\tvar req dto.Update{}Request\n\tif err := c.ShouldBindJSON(&req); err != nil {{\n\t\tc.JSON(http.StatusBadRequest, gin.H{{\"error\": err.Error()}})\n\t\treturn\n\t}}\n\tresp, err := h.service.Update(id, req)\n\tif err != nil {{\n\t\th.writeError(c, err)\n\t\treturn\n\t}}\n\tc.JSON(http.StatusOK, resp)\n}}\n\n",
        names.plural_snake, names.pascal, id_parse, names.pascal
    ));

    body.push_str(&swag(&[
        format!("// @Summary Delete one {}", names.human),
        format!("// @Tags {}", names.plural_snake),
        "// @Param id path string true \"record id\"".to_string(),
        "// @Success 204".to_string(),
        format!("// @Router /{}/{{id}} [delete]", names.plural_snake),
    ]));
    body.push_str(&format!(
        "// Delete handles DELETE /api/v1/{}/:id.\nfunc (h *{}Handler) Delete(c *gin.Context) {{\n{}\tif err := h.service.Delete(id); err != nil {{\n\t\th.writeError(c, err)\n\t\treturn\n\t}}\n\tc.Status(http.StatusNoContent)\n}}\n\n",
        names.plural_snake, names.pascal, id_parse
    ));

    body.push_str(&swag(&[
        format!("// @Summary List {} records", names.human),
        format!("// @Tags {}", names.plural_snake),
        "// @Produce json".to_string(),
        "// @Param page query int false \"page number\"".to_string(),
        "// @Param page_size query int false \"records per page\"".to_string(),
        format!("// @Success 200 {{object}} dto.List{}Response", names.plural_pascal()),
        format!("// @Router /{} [get]", names.plural_snake),
    ]));
    body.push_str(&format!(
        "// List handles GET /api/v1/{}.\nfunc (h *{}Handler) List(c *gin.Context) {{\n\tpage, _ := strconv.Atoi(c.DefaultQuery(\"page\", \"1\"))\n\tpageSize, _ := strconv.Atoi(c.DefaultQuery(\"page_size\", \"10\"))\n\tresp, err := h.service.List(page, pageSize)\n\tif err != nil {{\n\t\th.writeError(c, err)\n\t\treturn\n\t}}\n\tc.JSON(http.StatusOK, resp)\n}}\n\n",
        names.plural_snake, names.pascal
    ));

    body.push_str(&format!(
        "func (h *{}Handler) writeError(c *gin.Context, err error) {{\n\tswitch {{\n\tcase errors.Is(err, domain.Err{}NotFound):\n\t\tc.JSON(http.StatusNotFound, gin.H{{\"error\": err.Error()}})\n\tcase errors.Is(err, domain.Err{}AlreadyExists):\n\t\tc.JSON(http.StatusConflict, gin.H{{\"error\": err.Error()}})\n\tcase errors.Is(err, domain.ErrInvalid{}Data),\n\t\terrors.Is(err, dto.ErrInvalidCreate{}Payload),\n\t\terrors.Is(err, dto.ErrInvalidUpdate{}Payload):\n\t\tc.JSON(http.StatusBadRequest, gin.H{{\"error\": err.Error()}})\n\tdefault:\n\t\tc.JSON(http.StatusInternalServerError, gin.H{{\"error\": \"internal server error\"}})\n\t}}\n}}\n",
        names.pascal, names.pascal, names.pascal, names.pascal, names.pascal, names.pascal
    ));

    format!("package http\n\n{}{}", imports.render(), body)
}

/// Emit `internal/handler/http/<base>_routes.go`.
pub fn render_http_routes(ctx: &EmitContext) -> String {
    let names = ctx.names;
    format!(
        "package http\n\nimport \"github.com/gin-gonic/gin\"\n\n// Register{}Routes mounts the {} CRUD endpoints.\nfunc Register{}Routes(api *gin.RouterGroup, handler *{}Handler) {{\n\tapi.POST(\"/{}\", handler.Create)\n\tapi.GET(\"/{}/:id\", handler.GetByID)\n\tapi.PUT(\"/{}/:id\", handler.Update)\n\tapi.DELETE(\"/{}/:id\", handler.Delete)\n\tapi.GET(\"/{}\", handler.List)\n}}\n",
        names.pascal,
        names.human,
        names.pascal,
        names.pascal,
        names.plural_snake,
        names.plural_snake,
        names.plural_snake,
        names.plural_snake,
        names.plural_snake
    )
}

fn proto_scalar(ty: GoType) -> &'static str {
    match ty {
        GoType::String => "string",
        GoType::Int | GoType::Int64 => "int64",
        GoType::Uint | GoType::Uint64 => "uint64",
        GoType::Float32 => "float",
        GoType::Float64 => "double",
        GoType::Bool => "bool",
        // Instants travel as RFC 3339 strings on the wire.
        GoType::Time => "string",
        GoType::Bytes | GoType::Interface => "bytes",
    }
}

/// Emit `internal/handler/grpc/<base>.proto`.
///
/// Only plain scalar fields cross the gRPC boundary; wrapper-typed fields
/// stay behind the HTTP/DTO surface.
pub fn render_proto(ctx: &EmitContext) -> String {
    let names = ctx.names;
    let module = ctx.module();

    let mut message_fields = String::new();
    let mut create_fields = String::new();
    let mut n = 1usize;
    message_fields.push_str(&format!("  {} id = 1;\n", if ctx.uuid_keys() { "string" } else { "uint64" }));
    for field in ctx.fields.iter().filter(|f| is_plain_scalar(f)) {
        n += 1;
        message_fields.push_str(&format!(
            "  {} {} = {};\n",
            proto_scalar(field.ty.base()),
            field.name,
            n
        ));
        create_fields.push_str(&format!(
            "  {} {} = {};\n",
            proto_scalar(field.ty.base()),
            field.name,
            n - 1
        ));
    }

    format!(
        "syntax = \"proto3\";\n\npackage {}.v1;\n\noption go_package = \"{}/{}/grpc/{}pb\";\n\nmessage {} {{\n{}}}\n\nmessage Create{}Request {{\n{}}}\n\nmessage Get{}Request {{\n  {} id = 1;\n}}\n\nmessage Delete{}Request {{\n  {} id = 1;\n}}\n\nmessage Delete{}Response {{\n}}\n\nmessage List{}Request {{\n  int32 page = 1;\n  int32 page_size = 2;\n}}\n\nmessage List{}Response {{\n  repeated {} items = 1;\n  int64 total = 2;\n}}\n\nservice {}Service {{\n  rpc Create(Create{}Request) returns ({});\n  rpc Get(Get{}Request) returns ({});\n  rpc Delete(Delete{}Request) returns (Delete{}Response);\n  rpc List(List{}Request) returns (List{}Response);\n}}\n",
        names.flat,
        module,
        ctx.config.handler_path(),
        names.flat,
        names.pascal,
        message_fields,
        names.pascal,
        create_fields,
        names.pascal,
        if ctx.uuid_keys() { "string" } else { "uint64" },
        names.pascal,
        if ctx.uuid_keys() { "string" } else { "uint64" },
        names.pascal,
        names.pascal,
        names.pascal,
        names.pascal,
        names.pascal,
        names.pascal,
        names.pascal,
        names.pascal,
        names.pascal,
        names.pascal,
        names.pascal,
        names.pascal,
        names.pascal
    )
}

/// Emit `internal/handler/grpc/<base>_server.go`.
pub fn render_grpc_server(ctx: &EmitContext) -> String {
    let names = ctx.names;
    let module = ctx.module();
    let pb = format!("{}pb", names.flat);

    let mut imports = GoImports::new(&module);
    imports.add("context");
    imports.add(&format!("{}/{}/grpc/{}", module, ctx.config.handler_path(), pb));
    imports.add(&format!("{}/{}", module, ctx.config.usecase_path()));
    imports.add(&format!("{}/{}/dto", module, ctx.config.usecase_path()));

    let id_cast = if ctx.uuid_keys() {
        "req.GetId()".to_string()
    } else {
        "uint(req.GetId())".to_string()
    };

    // dto -> pb field assignments for the response message.
    let mut to_pb = String::new();
    for field in ctx.fields.iter().filter(|f| is_plain_scalar(f)) {
        let value = match field.ty.base() {
            GoType::Int | GoType::Int64 => format!("int64(resp.{})", field.go_name()),
            GoType::Uint | GoType::Uint64 => format!("uint64(resp.{})", field.go_name()),
            GoType::Float32 => format!("float32(resp.{})", field.go_name()),
            GoType::Float64 => format!("float64(resp.{})", field.go_name()),
            _ => format!("resp.{}", field.go_name()),
        };
        to_pb.push_str(&format!("\t\t{}: {},\n", field.go_name(), value));
    }

    // pb -> dto assignments for the create request.
    let mut from_pb = String::new();
    for field in ctx.fields.iter().filter(|f| is_plain_scalar(f)) {
        let value = match field.ty.base() {
            GoType::Int => format!("int(req.Get{}())", field.go_name()),
            GoType::Int64 => format!("req.Get{}()", field.go_name()),
            GoType::Uint => format!("uint(req.Get{}())", field.go_name()),
            GoType::Uint64 => format!("req.Get{}()", field.go_name()),
            GoType::Float32 => format!("req.Get{}()", field.go_name()),
            GoType::Float64 => format!("req.Get{}()", field.go_name()),
            _ => format!("req.Get{}()", field.go_name()),
        };
        from_pb.push_str(&format!("\t\t{}: {},\n", field.go_name(), value));
    }

    let id_to_pb = if ctx.uuid_keys() {
        "resp.ID"
    } else {
        "uint64(resp.ID)"
    };

    let body = format!(
        "// {pascal}Server adapts gRPC transport to the {human} use cases.\ntype {pascal}Server struct {{\n\t{pb}.Unimplemented{pascal}ServiceServer\n\tservice usecase.{pascal}Service\n}}\n\nfunc New{pascal}Server(service usecase.{pascal}Service) *{pascal}Server {{\n\treturn &{pascal}Server{{service: service}}\n}}\n\nfunc (s *{pascal}Server) Create(ctx context.Context, req *{pb}.Create{pascal}Request) (*{pb}.{pascal}, error) {{\n\tresp, err := s.service.Create(dto.Create{pascal}Request{{\n{from_pb}\t}})\n\tif err != nil {{\n\t\treturn nil, err\n\t}}\n\treturn s.toProto(resp), nil\n}}\n\nfunc (s *{pascal}Server) Get(ctx context.Context, req *{pb}.Get{pascal}Request) (*{pb}.{pascal}, error) {{\n\tresp, err := s.service.GetByID({id_cast})\n\tif err != nil {{\n\t\treturn nil, err\n\t}}\n\treturn s.toProto(resp), nil\n}}\n\nfunc (s *{pascal}Server) Delete(ctx context.Context, req *{pb}.Delete{pascal}Request) (*{pb}.Delete{pascal}Response, error) {{\n\tif err := s.service.Delete({id_cast}); err != nil {{\n\t\treturn nil, err\n\t}}\n\treturn &{pb}.Delete{pascal}Response{{}}, nil\n}}\n\nfunc (s *{pascal}Server) List(ctx context.Context, req *{pb}.List{pascal}Request) (*{pb}.List{pascal}Response, error) {{\n\tresp, err := s.service.List(int(req.GetPage()), int(req.GetPageSize()))\n\tif err != nil {{\n\t\treturn nil, err\n\t}}\n\tout := &{pb}.List{pascal}Response{{Total: resp.Total}}\n\tfor i := range resp.Items {{\n\t\tout.Items = append(out.Items, s.toProto(&resp.Items[i]))\n\t}}\n\treturn out, nil\n}}\n\nfunc (s *{pascal}Server) toProto(resp *dto.{pascal}Response) *{pb}.{pascal} {{\n\treturn &{pb}.{pascal}{{\n\t\tId: {id_to_pb},\n{to_pb}\t}}\n}}\n",
        pascal = names.pascal,
        human = names.human,
        pb = pb,
        from_pb = from_pb,
        id_cast = id_cast,
        id_to_pb = id_to_pb,
        to_pb = to_pb
    );

    format!("package grpc\n\n{}{}", imports.render(), body)
}

/// Emit `internal/handler/cli/<base>_cli.go` (cobra).
pub fn render_cli_handler(ctx: &EmitContext) -> String {
    let names = ctx.names;
    let module = ctx.module();
    let uuid = ctx.uuid_keys();

    let mut imports = GoImports::new(&module);
    imports.add("encoding/json");
    imports.add("fmt");
    if !uuid {
        imports.add("strconv");
    }
    imports.add("github.com/spf13/cobra");
    imports.add(&format!("{}/{}", module, ctx.config.usecase_path()));
    imports.add(&format!("{}/{}/dto", module, ctx.config.usecase_path()));

    let id_parse = if uuid {
        "\t\t\tid := args[0]\n".to_string()
    } else {
        "\t\t\tid64, err := strconv.ParseUint(args[0], 10, 64)\n\t\t\tif err != nil {\n\t\t\t\treturn fmt.Errorf(\"invalid id %q\", args[0])\n\t\t\t}\n\t\t\tid := uint(id64)\n".to_string()
    };

    let body = format!
    (
        "// New{pascal}Command builds the `{kebab}` command tree.\nfunc New{pascal}Command(service usecase.{pascal}Service) *cobra.Command {{\n\tcmd := &cobra.Command{{\n\t\tUse:   \"{kebab}\",\n\t\tShort: \"Manage {human} records\",\n\t}}\n\tcmd.AddCommand(new{pascal}GetCommand(service))\n\tcmd.AddCommand(new{pascal}ListCommand(service))\n\tcmd.AddCommand(new{pascal}DeleteCommand(service))\n\tcmd.AddCommand(new{pascal}CreateCommand(service))\n\treturn cmd\n}}\n\nfunc new{pascal}GetCommand(service usecase.{pascal}Service) *cobra.Command {{\n\treturn &cobra.Command{{\n\t\tUse:   \"get <id>\",\n\t\tArgs:  cobra.ExactArgs(1),\n\t\tShort: \"Fetch one {human} by id\",\n\t\tRunE: func(cmd *cobra.Command, args []string) error {{\n{id_parse}\t\t\tresp, err := service.GetByID(id)\n\t\t\tif err != nil {{\n\t\t\t\treturn err\n\t\t\t}}\n\t\t\treturn print{pascal}JSON(cmd, resp)\n\t\t}},\n\t}}\n}}\n\nfunc new{pascal}ListCommand(service usecase.{pascal}Service) *cobra.Command {{\n\tvar page, pageSize int\n\tcmd := &cobra.Command{{\n\t\tUse:   \"list\",\n\t\tShort: \"List {human} records\",\n\t\tRunE: func(cmd *cobra.Command, args []string) error {{\n\t\t\tresp, err := service.List(page, pageSize)\n\t\t\tif err != nil {{\n\t\t\t\treturn err\n\t\t\t}}\n\t\t\treturn print{pascal}JSON(cmd, resp)\n\t\t}},\n\t}}\n\tcmd.Flags().IntVar(&page, \"page\", 1, \"page number\")\n\tcmd.Flags().IntVar(&pageSize, \"page-size\", 10, \"records per page\")\n\treturn cmd\n}}\n\nfunc new{pascal}DeleteCommand(service usecase.{pascal}Service) *cobra.Command {{\n\treturn &cobra.Command{{\n\t\tUse:   \"delete <id>\",\n\t\tArgs:  cobra.ExactArgs(1),\n\t\tShort: \"Delete one {human} by id\",\n\t\tRunE: func(cmd *cobra.Command, args []string) error {{\n{id_parse}\t\t\treturn service.Delete(id)\n\t\t}},\n\t}}\n}}\n\nfunc new{pascal}CreateCommand(service usecase.{pascal}Service) *cobra.Command {{\n\tvar payload string\n\tcmd := &cobra.Command{{\n\t\tUse:   \"create\",\n\t\tShort: \"Create one {human} from a JSON payload\",\n\t\tRunE: func(cmd *cobra.Command, args []string) error {{\n\t\t\tvar req dto.Create{pascal}Request\n\t\t\tif err := json.Unmarshal([]byte(payload), &req); err != nil {{\n\t\t\t\treturn fmt.Errorf(\"invalid payload: %w\", err)\n\t\t\t}}\n\t\t\tresp, err := service.Create(req)\n\t\t\tif err != nil {{\n\t\t\t\treturn err\n\t\t\t}}\n\t\t\treturn print{pascal}JSON(cmd, resp)\n\t\t}},\n\t}}\n\tcmd.Flags().StringVar(&payload, \"json\", \"{{}}\", \"JSON payload\")\n\treturn cmd\n}}\n\nfunc print{pascal}JSON(cmd *cobra.Command, v interface{{}}) error {{\n\tout, err := json.MarshalIndent(v, \"\", \"  \")\n\tif err != nil {{\n\t\treturn err\n\t}}\n\tcmd.Println(string(out))\n\treturn nil\n}}\n",
        pascal = names.pascal,
        kebab = names.kebab,
        human = names.human,
        id_parse = id_parse
    );

    format!("package cli\n\n{}{}", imports.render(), body)
}

/// Emit `internal/handler/worker/<base>_worker.go`.
pub fn render_worker_handler(ctx: &EmitContext) -> String {
    let names = ctx.names;
    let module = ctx.module();

    let mut imports = GoImports::new(&module);
    imports.add("context");
    imports.add("encoding/json");
    imports.add("log");
    imports.add(&format!("{}/{}", module, ctx.config.usecase_path()));
    imports.add(&format!("{}/{}/dto", module, ctx.config.usecase_path()));

    let body = format!(
        "// {pascal}Job is the queue message consumed by the worker.\ntype {pascal}Job struct {{\n\tAction  string          `json:\"action\"`\n\tID      {id} `json:\"id,omitempty\"`\n\tPayload json.RawMessage `json:\"payload,omitempty\"`\n}}\n\n// {pascal}Worker consumes {human} jobs from a queue.\ntype {pascal}Worker struct {{\n\tservice usecase.{pascal}Service\n}}\n\nfunc New{pascal}Worker(service usecase.{pascal}Service) *{pascal}Worker {{\n\treturn &{pascal}Worker{{service: service}}\n}}\n\n// Run drains jobs until the channel closes or the context is cancelled.\nfunc (w *{pascal}Worker) Run(ctx context.Context, jobs <-chan []byte) {{\n\tfor {{\n\t\tselect {{\n\t\tcase <-ctx.Done():\n\t\t\treturn\n\t\tcase raw, ok := <-jobs:\n\t\t\tif !ok {{\n\t\t\t\treturn\n\t\t\t}}\n\t\t\tif err := w.handle(raw); err != nil {{\n\t\t\t\tlog.Printf(\"{snake} worker: %v\", err)\n\t\t\t}}\n\t\t}}\n\t}}\n}}\n\nfunc (w *{pascal}Worker) handle(raw []byte) error {{\n\tvar job {pascal}Job\n\tif err := json.Unmarshal(raw, &job); err != nil {{\n\t\treturn err\n\t}}\n\tswitch job.Action {{\n\tcase \"create\":\n\t\tvar req dto.Create{pascal}Request\n\t\tif err := json.Unmarshal(job.Payload, &req); err != nil {{\n\t\t\treturn err\n\t\t}}\n\t\t_, err := w.service.Create(req)\n\t\treturn err\n\tcase \"update\":\n\t\tvar req dto.Update{pascal}Request\n\t\tif err := json.Unmarshal(job.Payload, &req); err != nil {{\n\t\t\treturn err\n\t\t}}\n\t\t_, err := w.service.Update(job.ID, req)\n\t\treturn err\n\tcase \"delete\":\n\t\treturn w.service.Delete(job.ID)\n\tdefault:\n\t\tlog.Printf(\"{snake} worker: unknown action %q\", job.Action)\n\t\treturn nil\n\t}}\n}}\n",
        pascal = names.pascal,
        human = names.human,
        snake = names.snake,
        id = ctx.id_type()
    );

    format!("package worker\n\n{}{}", imports.render(), body)
}

/// Emit `internal/handler/soap/<base>_soap.go`.
pub fn render_soap_handler(ctx: &EmitContext) -> String {
    let names = ctx.names;
    let module = ctx.module();
    let uuid = ctx.uuid_keys();

    let mut imports = GoImports::new(&module);
    imports.add("encoding/xml");
    imports.add("net/http");
    if !uuid {
        imports.add("strconv");
    }
    imports.add(&format!("{}/{}", module, ctx.config.usecase_path()));

    let id_decode = if uuid {
        "\tid := envelope.Body.Request.ID\n".to_string()
    } else {
        "\tid64, err := strconv.ParseUint(envelope.Body.Request.ID, 10, 64)\n\tif err != nil {\n\t\thttp.Error(w, \"invalid id\", http.StatusBadRequest)\n\t\treturn\n\t}\n\tid := uint(id64)\n".to_string()
    };

    let body = format!(
        "// Get{pascal}Envelope is the inbound SOAP message for {human} lookups.\ntype Get{pascal}Envelope struct {{\n\tXMLName xml.Name `xml:\"Envelope\"`\n\tBody    struct {{\n\t\tRequest struct {{\n\t\t\tID string `xml:\"id\"`\n\t\t}} `xml:\"Get{pascal}Request\"`\n\t}} `xml:\"Body\"`\n}}\n\n// {pascal}SOAPHandler serves a minimal SOAP endpoint over the {human} use cases.\ntype {pascal}SOAPHandler struct {{\n\tservice usecase.{pascal}Service\n}}\n\nfunc New{pascal}SOAPHandler(service usecase.{pascal}Service) *{pascal}SOAPHandler {{\n\treturn &{pascal}SOAPHandler{{service: service}}\n}}\n\nfunc (h *{pascal}SOAPHandler) ServeHTTP(w http.ResponseWriter, r *http.Request) {{\n\tvar envelope Get{pascal}Envelope\n\tif err := xml.NewDecoder(r.Body).Decode(&envelope); err != nil {{\n\t\thttp.Error(w, \"malformed envelope\", http.StatusBadRequest)\n\t\treturn\n\t}}\n{id_decode}\tresp, err := h.service.GetByID(id)\n\tif err != nil {{\n\t\thttp.Error(w, err.Error(), http.StatusNotFound)\n\t\treturn\n\t}}\n\tw.Header().Set(\"Content-Type\", \"text/xml; charset=utf-8\")\n\tif err := xml.NewEncoder(w).Encode(resp); err != nil {{\n\t\thttp.Error(w, err.Error(), http.StatusInternalServerError)\n\t}}\n}}\n",
        pascal = names.pascal,
        human = names.human,
        id_decode = id_decode
    );

    format!("package soap\n\n{}{}", imports.render(), body)
}
