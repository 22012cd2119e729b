//! Common types and utilities for idlbridge
//!
//! This crate holds the three tree representations the converters walk
//! (the neutral IDL model, the Protobuf intermediate tree, and the OpenAPI
//! document model) together with annotations, merge helpers, naming
//! helpers, configuration, and the shared error type.

pub mod annotations;
pub mod config;
pub mod idl;
pub mod merge;
pub mod naming;
pub mod openapi;
pub mod proto;

pub use annotations::{AnnotationValue, Annotations};
pub use config::{BridgeConfig, EnumStyle, GenerationMode, NamingStyle, OpenApiConfig, ProtoConfig};
pub use idl::{
    EnumDef, EnumValueDef, FieldDef, IdlFile, IdlSyntax, MethodDef, ScalarKind, ServiceDef,
    StructDef, TypeRef,
};

use thiserror::Error;

/// Errors that can occur while loading or converting interface definitions
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Unresolved reference: {0}")]
    UnresolvedRef(String),

    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<ConvertError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConvertError {
    /// Wrap the error with the name of the enclosing schema, operation or method
    pub fn context(self, context: impl Into<String>) -> Self {
        ConvertError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Attach context to the error side of a `Result`
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_chain_display() {
        let err = ConvertError::Conversion("schema type is required".to_string())
            .context("schema Pet")
            .context("components");
        assert_eq!(
            err.to_string(),
            "components: schema Pet: Conversion error: schema type is required"
        );
    }

    #[test]
    fn test_with_context() {
        let res: Result<()> = Err(ConvertError::UnresolvedRef("#/components/schemas/X".into()));
        let err = res.with_context(|| "operation listPets").unwrap_err();
        assert!(err.to_string().starts_with("operation listPets: "));
    }
}
