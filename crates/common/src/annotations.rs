//! Declaration annotations
//!
//! Thrift `(key = "value")` annotations and protobuf custom options are both
//! lowered into an [`Annotations`] map keyed by the namespaced annotation
//! name (`api.get`, `openapi.schema`, ...).

use crate::{ConvertError, Result};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const API_GET: &str = "api.get";
pub const API_POST: &str = "api.post";
pub const API_PUT: &str = "api.put";
pub const API_PATCH: &str = "api.patch";
pub const API_DELETE: &str = "api.delete";
pub const API_OPTIONS: &str = "api.options";
pub const API_HEAD: &str = "api.head";
pub const API_ANY: &str = "api.any";

pub const API_QUERY: &str = "api.query";
pub const API_PATH: &str = "api.path";
pub const API_HEADER: &str = "api.header";
pub const API_COOKIE: &str = "api.cookie";
pub const API_BODY: &str = "api.body";
pub const API_FORM: &str = "api.form";
pub const API_RAW_BODY: &str = "api.raw_body";

pub const API_BASE_DOMAIN: &str = "api.base_domain";
pub const API_BASE_URL: &str = "api.baseurl";

pub const OPENAPI_OPERATION: &str = "openapi.operation";
pub const OPENAPI_PROPERTY: &str = "openapi.property";
pub const OPENAPI_SCHEMA: &str = "openapi.schema";
pub const OPENAPI_PARAMETER: &str = "openapi.parameter";
pub const OPENAPI_DOCUMENT: &str = "openapi.document";

/// Route annotations in the order they are turned into operations
pub const HTTP_METHOD_ANNOTATIONS: [(&str, &str); 8] = [
    (API_GET, "get"),
    (API_POST, "post"),
    (API_PUT, "put"),
    (API_PATCH, "patch"),
    (API_DELETE, "delete"),
    (API_OPTIONS, "options"),
    (API_HEAD, "head"),
    (API_ANY, "any"),
];

/// Value attached to one annotation key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationValue {
    /// A single plain string
    Scalar(String),

    /// The key appeared more than once
    List(Vec<String>),

    /// A structured payload (JSON or YAML flow syntax)
    StructuredText(String),
}

impl AnnotationValue {
    /// First plain value, if any
    pub fn first(&self) -> Option<&str> {
        match self {
            AnnotationValue::Scalar(s) | AnnotationValue::StructuredText(s) => Some(s),
            AnnotationValue::List(values) => values.first().map(String::as_str),
        }
    }

    /// All values in declaration order
    pub fn values(&self) -> Vec<&str> {
        match self {
            AnnotationValue::Scalar(s) | AnnotationValue::StructuredText(s) => vec![s.as_str()],
            AnnotationValue::List(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Parse the payload into `T`
    ///
    /// A list parses its first entry.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        let text = self.first().unwrap_or_default();
        parse_payload(text)
    }
}

/// Parse a structured annotation payload
///
/// YAML is a superset of JSON, so both `{"title": "x"}` and `{title: x}` are
/// accepted.
pub fn parse_payload<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_yaml::from_str(text)
        .map_err(|e| ConvertError::Parse(format!("Invalid annotation payload '{}': {}", text, e)))
}

/// Ordered annotation map for one declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations(IndexMap<String, AnnotationValue>);

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain value; a repeated key turns into a list
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.0.entry(key.into()) {
            indexmap::map::Entry::Occupied(mut entry) => {
                let merged = match entry.get() {
                    AnnotationValue::Scalar(prev) | AnnotationValue::StructuredText(prev) => {
                        vec![prev.clone(), value]
                    },
                    AnnotationValue::List(prev) => {
                        let mut list = prev.clone();
                        list.push(value);
                        list
                    },
                };
                entry.insert(AnnotationValue::List(merged));
            },
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(AnnotationValue::Scalar(value));
            },
        }
    }

    /// Add a structured payload, replacing any previous value for the key
    pub fn insert_structured(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.0
            .insert(key.into(), AnnotationValue::StructuredText(text.into()));
    }

    pub fn get(&self, key: &str) -> Option<&AnnotationValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// First value for `key`
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(AnnotationValue::first)
    }

    /// First value for `key`, ignoring empty strings
    pub fn first_non_empty(&self, key: &str) -> Option<&str> {
        self.first(key).filter(|v| !v.is_empty())
    }

    /// Parse the payload stored under `key`, if present
    pub fn parse<T: DeserializeOwned>(&self, key: &str) -> Option<Result<T>> {
        self.0.get(key).map(AnnotationValue::parse)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnnotationValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Annotations {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut annotations = Annotations::new();
        for (k, v) in iter {
            annotations.insert(k, v);
        }
        annotations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Title {
        title: String,
        #[serde(default)]
        required: Vec<String>,
    }

    #[test]
    fn test_repeated_key_becomes_list() {
        let mut annotations = Annotations::new();
        annotations.insert(API_GET, "/a");
        annotations.insert(API_GET, "/b");
        annotations.insert(API_GET, "/c");

        assert_eq!(
            annotations.get(API_GET),
            Some(&AnnotationValue::List(vec![
                "/a".to_string(),
                "/b".to_string(),
                "/c".to_string()
            ]))
        );
        assert_eq!(annotations.first(API_GET), Some("/a"));
    }

    #[test]
    fn test_first_non_empty() {
        let annotations: Annotations = [(API_QUERY, "")].into_iter().collect();
        assert!(annotations.contains(API_QUERY));
        assert_eq!(annotations.first_non_empty(API_QUERY), None);
    }

    #[test]
    fn test_parse_json_and_yaml_payloads() {
        let mut annotations = Annotations::new();
        annotations.insert_structured(OPENAPI_SCHEMA, r#"{"title": "Pet", "required": ["id"]}"#);
        annotations.insert(OPENAPI_PROPERTY, "{title: name}");

        let schema: Title = annotations.parse(OPENAPI_SCHEMA).unwrap().unwrap();
        assert_eq!(schema.title, "Pet");
        assert_eq!(schema.required, vec!["id".to_string()]);

        let property: Title = annotations.parse(OPENAPI_PROPERTY).unwrap().unwrap();
        assert_eq!(property.title, "name");

        assert!(annotations.parse::<Title>(OPENAPI_DOCUMENT).is_none());
    }

    #[test]
    fn test_parse_invalid_payload() {
        let value = AnnotationValue::Scalar("{title: [unclosed".to_string());
        assert!(value.parse::<Title>().is_err());
    }
}
