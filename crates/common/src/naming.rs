//! Naming helpers shared by both conversion directions

use convert_case::{Case, Casing};
use regex::Regex;
use std::sync::LazyLock;

static BRACE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("Invalid brace path regex"));

static COLON_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(\w+)").expect("Invalid colon path regex"));

/// Type-name-safe PascalCase form of an arbitrary string
///
/// `listPetsRequestapplication/json` becomes `ListPetsRequestapplicationJson`.
pub fn to_pascal_case(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// UPPER_SNAKE_CASE form used for enum value prefixes
pub fn to_upper_snake_case(s: &str) -> String {
    s.to_case(Case::UpperSnake)
}

/// Make a string usable as a proto identifier
///
/// Characters outside `[A-Za-z0-9_]` become `_`, and a leading digit gets
/// a `_` prefix. Valid identifiers are returned unchanged.
pub fn to_proto_ident(s: &str) -> String {
    let mut ident: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Rewrite `{param}` path segments to `:param`
pub fn colon_path_params(path: &str) -> String {
    BRACE_PARAM.replace_all(path, ":$1").into_owned()
}

/// Rewrite `:param` path segments to `{param}`
pub fn brace_path_params(path: &str) -> String {
    COLON_PARAM.replace_all(path, "{$1}").into_owned()
}

/// Final segment of a `$ref` string
pub fn ref_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// Method name used when an operation has no `operationId`
///
/// `GET` becomes `GetMethod`.
pub fn default_method_name(http_method: &str) -> String {
    let lower = http_method.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => format!("{}{}Method", first.to_ascii_uppercase(), chars.as_str()),
        None => "Method".to_string(),
    }
}
