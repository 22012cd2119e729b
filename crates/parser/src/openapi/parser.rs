//! OpenAPI spec file parser

use idlbridge_common::openapi::Document;
use idlbridge_common::{ConvertError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// OpenAPI specification parser
pub struct OpenApiParser {
    /// Loaded OpenAPI document
    document: Document,
}

impl OpenApiParser {
    /// Load an OpenAPI document from a JSON or YAML file
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = OpenApiParser::from_file("petstore.json")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ConvertError::Parse(format!(
                "Failed to read OpenAPI file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }

    /// Parse an OpenAPI document, detecting JSON or YAML from the content
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        if content.trim_start().starts_with('{') {
            Self::from_json(content)
        } else {
            Self::from_yaml(content)
        }
    }

    /// Parse an OpenAPI document from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(json)
            .map_err(|e| ConvertError::Parse(format!("Failed to parse OpenAPI JSON: {}", e)))?;
        Self::from_value(raw)
    }

    /// Parse an OpenAPI document from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let raw: Value = serde_yaml::from_str(yaml)
            .map_err(|e| ConvertError::Parse(format!("Failed to parse OpenAPI YAML: {}", e)))?;
        Self::from_value(raw)
    }

    fn from_value(raw: Value) -> Result<Self> {
        validate(&raw)?;
        let document: Document = serde_json::from_value(raw)
            .map_err(|e| ConvertError::Parse(format!("Invalid OpenAPI document: {}", e)))?;

        tracing::debug!(
            title = %document.info.title,
            paths = document.paths.len(),
            schemas = document.components.schemas.len(),
            "loaded OpenAPI document"
        );

        Ok(Self { document })
    }

    /// Return the loaded document
    pub fn parse(&self) -> Result<Document> {
        Ok(self.document.clone())
    }

    /// Consume the parser and return the loaded document
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Get reference to the underlying document
    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn validate(raw: &Value) -> Result<()> {
    let version = raw
        .get("openapi")
        .and_then(Value::as_str)
        .ok_or_else(|| ConvertError::Parse("Missing 'openapi' version field".to_string()))?;

    if !version.starts_with("3.") {
        return Err(ConvertError::Parse(format!(
            "Unsupported OpenAPI version '{}', expected 3.x",
            version
        )));
    }

    if !raw.get("info").is_some_and(Value::is_object) {
        return Err(ConvertError::Parse(
            "Missing 'info' object in OpenAPI document".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_openapi() {
        let openapi_json = r#"{
            "openapi": "3.0.0",
            "info": {
                "title": "Test API",
                "version": "1.0.0"
            },
            "paths": {}
        }"#;

        let parser = OpenApiParser::from_json(openapi_json);
        assert!(parser.is_ok());

        let parser = parser.unwrap();
        assert_eq!(parser.document.openapi, "3.0.0");
        assert_eq!(parser.document.info.title, "Test API");
    }

    #[test]
    fn test_parse_yaml_detected() {
        let yaml = "openapi: 3.0.3\ninfo:\n  title: Pets\n  version: '1'\npaths: {}\n";
        let parser = OpenApiParser::from_str(yaml).unwrap();
        assert_eq!(parser.document().info.title, "Pets");
    }

    #[test]
    fn test_reject_swagger_2() {
        let json = r#"{"swagger": "2.0", "info": {"title": "x", "version": "1"}}"#;
        assert!(OpenApiParser::from_json(json).is_err());

        let json = r#"{"openapi": "2.0", "info": {"title": "x", "version": "1"}}"#;
        let err = OpenApiParser::from_json(json).err().unwrap();
        assert!(err.to_string().contains("Unsupported OpenAPI version"));
    }

    #[test]
    fn test_reject_missing_info() {
        let json = r#"{"openapi": "3.0.0", "paths": {}}"#;
        assert!(OpenApiParser::from_json(json).is_err());
    }
}
