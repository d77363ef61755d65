//! Field specification parsing.
//!
//! Features are described on the command line as a compact
//! `name:type,other:type` string, optionally carrying per-field validation
//! rules (`price:float64:required,gte=0`). This module turns that string
//! into a typed, ordered field list and rejects anything the generators
//! cannot express in Go.

use crate::core::error::GocaError;
use regex::Regex;

/// Base Go types the generator knows how to emit.
///
/// This is a closed set; anything else in a field specification is an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GoType {
    String,
    Int,
    Int64,
    Uint,
    Uint64,
    Float32,
    Float64,
    Bool,
    Time,
    Bytes,
    Interface,
}

impl GoType {
    fn parse(s: &str) -> Option<GoType> {
        match s {
            "string" => Some(GoType::String),
            "int" => Some(GoType::Int),
            "int64" => Some(GoType::Int64),
            "uint" => Some(GoType::Uint),
            "uint64" => Some(GoType::Uint64),
            "float32" => Some(GoType::Float32),
            "float64" => Some(GoType::Float64),
            "bool" => Some(GoType::Bool),
            "time.Time" => Some(GoType::Time),
            "[]byte" => Some(GoType::Bytes),
            "interface{}" => Some(GoType::Interface),
            _ => None,
        }
    }

    pub fn go_spelling(&self) -> &'static str {
        match self {
            GoType::String => "string",
            GoType::Int => "int",
            GoType::Int64 => "int64",
            GoType::Uint => "uint",
            GoType::Uint64 => "uint64",
            GoType::Float32 => "float32",
            GoType::Float64 => "float64",
            GoType::Bool => "bool",
            GoType::Time => "time.Time",
            GoType::Bytes => "[]byte",
            GoType::Interface => "interface{}",
        }
    }

    /// Whether Go's ordering operators apply to the type.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            GoType::Int
                | GoType::Int64
                | GoType::Uint
                | GoType::Uint64
                | GoType::Float32
                | GoType::Float64
        )
    }
}

/// A field type: a base type or a pointer/slice wrapper around one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldType {
    Base(GoType),
    Pointer(GoType),
    Slice(GoType),
}

impl FieldType {
    pub fn parse(s: &str) -> Option<FieldType> {
        if let Some(base) = GoType::parse(s) {
            return Some(FieldType::Base(base));
        }
        if let Some(inner) = s.strip_prefix('*') {
            return GoType::parse(inner).map(FieldType::Pointer);
        }
        if let Some(inner) = s.strip_prefix("[]") {
            return GoType::parse(inner).map(FieldType::Slice);
        }
        None
    }

    pub fn go_spelling(&self) -> String {
        match self {
            FieldType::Base(t) => t.go_spelling().to_string(),
            FieldType::Pointer(t) => format!("*{}", t.go_spelling()),
            FieldType::Slice(t) => format!("[]{}", t.go_spelling()),
        }
    }

    pub fn base(&self) -> GoType {
        match self {
            FieldType::Base(t) | FieldType::Pointer(t) | FieldType::Slice(t) => *t,
        }
    }

    /// Whether the type needs the `time` import in a file that declares it.
    pub fn needs_time_import(&self) -> bool {
        self.base() == GoType::Time
    }
}

/// One parsed field. Immutable after parse.
#[derive(Clone, Debug)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
    /// Validation rule strings (`required`, `gte=0`, `email`, ...).
    pub tags: Vec<String>,
}

impl Field {
    /// Exported Go struct-field name.
    pub fn go_name(&self) -> String {
        crate::core::naming::to_pascal(&self.name).unwrap_or_else(|_| self.name.clone())
    }

    /// JSON tag; field names are already lower snake by the name rule.
    pub fn json_tag(&self) -> &str {
        &self.name
    }

    /// Validation tag content; defaults to `required` when the user gave
    /// no explicit rules.
    pub fn validate_tag(&self) -> String {
        if self.tags.is_empty() {
            "required".to_string()
        } else {
            self.tags.join(",")
        }
    }
}

const MAX_FIELD_NAME_LEN: usize = 50;

/// Columns the entity emitter manages itself (primary key, timestamp and
/// soft-delete columns). Accepting them as user fields would produce a
/// duplicate struct field in the generated entity.
const RESERVED_FIELD_NAMES: &[&str] = &["id", "created_at", "updated_at", "deleted_at"];

/// Parse a `name:type[:rule[,rule]*]` list into an ordered field list.
///
/// Comma is both the field separator and the rule separator; a segment
/// without `:` continues the rule list of the preceding field, so
/// `price:float64:required,gte=0,name:string` parses as two fields.
pub fn parse_fields(spec: &str) -> Result<Vec<Field>, GocaError> {
    if spec.trim().is_empty() {
        return Err(GocaError::InvalidArgument(
            "fields: specification is empty; expected name:type[,name:type]".to_string(),
        ));
    }

    let name_re = Regex::new(r"^[a-z_][a-zA-Z0-9_]*$").expect("static regex");
    let mut fields: Vec<Field> = Vec::new();

    for segment in spec.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        if !segment.contains(':') {
            // Continuation of the previous field's validation rules.
            match fields.last_mut() {
                Some(last) => last.tags.push(segment.to_string()),
                None => {
                    return Err(GocaError::InvalidArgument(format!(
                        "fields: '{}' is not of the form name:type",
                        segment
                    )));
                }
            }
            continue;
        }

        let mut parts = segment.splitn(3, ':');
        let name = parts.next().unwrap_or_default().trim();
        let ty = parts.next().unwrap_or_default().trim();
        let first_rule = parts.next().map(str::trim);

        if !name_re.is_match(name) {
            return Err(GocaError::InvalidArgument(format!(
                "fields: '{}' is not a valid field name (want [a-z_][a-zA-Z0-9_]*)",
                name
            )));
        }
        if name.len() > MAX_FIELD_NAME_LEN {
            return Err(GocaError::InvalidArgument(format!(
                "fields: '{}' exceeds {} characters",
                name, MAX_FIELD_NAME_LEN
            )));
        }
        if RESERVED_FIELD_NAMES.contains(&name) {
            return Err(GocaError::InvalidArgument(format!(
                "fields: '{}' is a generator-managed column (reserved: {})",
                name,
                RESERVED_FIELD_NAMES.join(", ")
            )));
        }
        let ty = FieldType::parse(ty).ok_or_else(|| {
            GocaError::InvalidArgument(format!(
                "fields: unknown type '{}' for field '{}'",
                ty, name
            ))
        })?;
        if fields.iter().any(|f| f.name == name) {
            return Err(GocaError::InvalidArgument(format!(
                "fields: duplicate field '{}'",
                name
            )));
        }

        let mut tags = Vec::new();
        if let Some(rule) = first_rule {
            if !rule.is_empty() {
                tags.push(rule.to_string());
            }
        }
        fields.push(Field {
            name: name.to_string(),
            ty,
            tags,
        });
    }

    if fields.is_empty() {
        return Err(GocaError::InvalidArgument(
            "fields: specification is empty; expected name:type[,name:type]".to_string(),
        ));
    }

    // Ordering rules only make sense on plain numeric columns; anything
    // else would emit a comparison that Go rejects.
    for field in &fields {
        if field.tags.iter().any(|t| t.starts_with("gte="))
            && !matches!(field.ty, FieldType::Base(t) if t.is_numeric())
        {
            return Err(GocaError::InvalidArgument(format!(
                "fields: 'gte=' rule on '{}' requires a numeric type, got {}",
                field.name,
                field.ty.go_spelling()
            )));
        }
    }
    Ok(fields)
}

/// The column used for uniqueness lookups, when the feature has one:
/// the first field named `email` or tagged `unique`/`email`.
pub fn unique_field(fields: &[Field]) -> Option<&Field> {
    fields.iter().find(|f| {
        f.name == "email" || f.tags.iter().any(|t| t == "unique" || t == "email")
    })
}
