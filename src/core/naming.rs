//! Naming conventions for generated artifacts.
//!
//! Pure string transforms between the conventions a project can select for
//! file names, plus the pluralizer used for table names and route paths.
//! Conversions are lossy for acronyms (`HTTPServer` round-trips as
//! `HttpServer`); callers must not rely on round-tripping.

use crate::core::error::GocaError;
use convert_case::{Case, Casing};

/// File-name convention selected by `architecture.naming.files`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NamingConvention {
    Snake,
    Kebab,
    Pascal,
    Camel,
    Lower,
}

impl NamingConvention {
    /// All spellings accepted in `.goca.yaml` and on the command line.
    pub const KNOWN: &'static [&'static str] =
        &["snake_case", "kebab-case", "PascalCase", "camelCase", "lowercase"];

    pub fn parse(s: &str) -> Option<NamingConvention> {
        match s {
            "snake_case" => Some(NamingConvention::Snake),
            "kebab-case" => Some(NamingConvention::Kebab),
            "PascalCase" => Some(NamingConvention::Pascal),
            "camelCase" => Some(NamingConvention::Camel),
            "lowercase" => Some(NamingConvention::Lower),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NamingConvention::Snake => "snake_case",
            NamingConvention::Kebab => "kebab-case",
            NamingConvention::Pascal => "PascalCase",
            NamingConvention::Camel => "camelCase",
            NamingConvention::Lower => "lowercase",
        }
    }

}

fn non_empty(s: &str) -> Result<(), GocaError> {
    if s.is_empty() {
        return Err(GocaError::InvalidArgument(
            "naming: cannot convert an empty token".to_string(),
        ));
    }
    Ok(())
}

pub fn to_snake(s: &str) -> Result<String, GocaError> {
    non_empty(s)?;
    Ok(s.to_case(Case::Snake))
}

pub fn to_kebab(s: &str) -> Result<String, GocaError> {
    non_empty(s)?;
    Ok(s.to_case(Case::Kebab))
}

pub fn to_pascal(s: &str) -> Result<String, GocaError> {
    non_empty(s)?;
    Ok(s.to_case(Case::Pascal))
}

pub fn to_camel(s: &str) -> Result<String, GocaError> {
    non_empty(s)?;
    Ok(s.to_case(Case::Camel))
}

pub fn to_lower(s: &str) -> Result<String, GocaError> {
    non_empty(s)?;
    Ok(s.to_case(Case::Flat))
}

/// Convert `s` into the requested file-name convention.
pub fn convert(s: &str, convention: NamingConvention) -> Result<String, GocaError> {
    match convention {
        NamingConvention::Snake => to_snake(s),
        NamingConvention::Kebab => to_kebab(s),
        NamingConvention::Pascal => to_pascal(s),
        NamingConvention::Camel => to_camel(s),
        NamingConvention::Lower => to_lower(s),
    }
}

/// Naive English pluralizer used for table names and route segments.
///
/// Rules: consonant+`y` → `ies`; `s`/`x`/`z`/`ch`/`sh` → `+es`; else `+s`.
/// Irregular nouns are out of scope; projects that need them can post-edit
/// the generated sources.
pub fn pluralize(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    let lower = s.to_ascii_lowercase();
    if let Some(stem) = s.strip_suffix('y') {
        let before = stem.chars().last();
        let is_vowel = matches!(before, Some('a' | 'e' | 'i' | 'o' | 'u'));
        if before.is_some() && !is_vowel {
            return format!("{}ies", stem);
        }
    }
    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{}es", s);
    }
    format!("{}s", s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_conversions() {
        assert_eq!(to_snake("OrderItem").unwrap(), "order_item");
        assert_eq!(to_kebab("OrderItem").unwrap(), "order-item");
        assert_eq!(to_pascal("order_item").unwrap(), "OrderItem");
        assert_eq!(to_camel("order_item").unwrap(), "orderItem");
        assert_eq!(to_lower("OrderItem").unwrap(), "orderitem");
    }

    #[test]
    fn test_empty_token_is_invalid() {
        assert!(matches!(
            to_snake(""),
            Err(GocaError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_snake_pascal_snake_is_stable() {
        for s in ["order", "order_item", "customer_billing_address"] {
            let pascal = to_pascal(s).unwrap();
            assert_eq!(to_snake(&pascal).unwrap(), to_snake(s).unwrap());
        }
    }

    #[test]
    fn test_pluralize_rules() {
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("bus"), "buses");
        assert_eq!(pluralize("batch"), "batches");
        assert_eq!(pluralize("dish"), "dishes");
        assert_eq!(pluralize("order"), "orders");
    }

    #[test]
    fn test_convention_parse_round_trip() {
        for name in NamingConvention::KNOWN {
            let parsed = NamingConvention::parse(name).expect("known convention");
            assert_eq!(parsed.as_str(), *name);
        }
        assert!(NamingConvention::parse("SCREAMING_SNAKE").is_none());
    }
}
