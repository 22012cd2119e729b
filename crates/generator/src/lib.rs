//! Schema generation for idlbridge
//!
//! This crate turns parsed definitions into output documents:
//! - OpenAPI documents into proto3 source ([`ProtoGenerator`])
//! - IDL models into OpenAPI 3.0.3 YAML ([`OpenApiGenerator`])

pub mod openapi;
pub mod proto;
mod type_mapper;

pub use openapi::{OpenApiBuilder, YamlEncoder};
pub use proto::{ProtoConverter, ProtoEncoder};
pub use type_mapper::{ProtoScalar, TypeMapper};

use idlbridge_common::openapi::Document;
use idlbridge_common::proto::ProtoFile;
use idlbridge_common::{ConvertError, IdlFile, OpenApiConfig, ProtoConfig, Result};
use std::fs;
use std::path::Path;

/// proto3 generator
///
/// Converts an OpenAPI document into a [`ProtoFile`] up front; rendering
/// and writing never fail on the model itself.
///
/// # Example
/// ```rust,ignore
/// let document = OpenApiParser::from_file("petstore.yaml")?.parse()?;
/// let generator = ProtoGenerator::from_openapi(&document, ProtoConfig::default())?;
/// generator.generate_to_file(Path::new("out/petstore.proto"))?;
/// ```
pub struct ProtoGenerator {
    file: ProtoFile,
}

impl ProtoGenerator {
    /// Convert an OpenAPI document
    pub fn from_openapi(document: &Document, config: ProtoConfig) -> Result<Self> {
        let file = ProtoConverter::new(document, config).convert()?;
        Ok(Self { file })
    }

    /// Wrap an already built proto model
    pub fn new(file: ProtoFile) -> Self {
        Self { file }
    }

    pub fn proto_file(&self) -> &ProtoFile {
        &self.file
    }

    /// Render proto3 source
    pub fn render(&self) -> String {
        ProtoEncoder::encode(&self.file)
    }

    /// Render and write to `path`, creating parent directories
    pub fn generate_to_file(&self, path: &Path) -> Result<()> {
        let rendered = self.render();
        write_output(path, &rendered)
    }
}

/// OpenAPI generator
///
/// # Example
/// ```rust,ignore
/// let idl = ThriftParser::from_file("pet.thrift")?.parse()?;
/// let generator = OpenApiGenerator::from_idl(&idl, &OpenApiConfig::default())?;
/// generator.generate_to_file(Path::new("out/pet.yaml"))?;
/// ```
pub struct OpenApiGenerator {
    document: Document,
}

impl OpenApiGenerator {
    pub fn from_idl(idl: &IdlFile, config: &OpenApiConfig) -> Result<Self> {
        let document = OpenApiBuilder::new(idl, config).build()?;
        Ok(Self { document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Render YAML with the generated-file header
    pub fn render(&self) -> Result<String> {
        YamlEncoder::encode(&self.document)
    }

    /// Render and write to `path`, creating parent directories
    ///
    /// Nothing is written when rendering fails.
    pub fn generate_to_file(&self, path: &Path) -> Result<()> {
        let rendered = self.render()?;
        write_output(path, &rendered)
    }
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            ConvertError::Generation(format!(
                "Failed to create output directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    fs::write(path, content).map_err(|e| {
        ConvertError::Generation(format!("Failed to write {}: {}", path.display(), e))
    })?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_output_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/out.proto");
        write_output(&path, "syntax = \"proto3\";\n").unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "syntax = \"proto3\";\n"
        );
    }

    #[test]
    fn test_proto_generator_renders_model() {
        let generator = ProtoGenerator::new(ProtoFile::new("pets"));
        assert_eq!(generator.render(), "syntax = \"proto3\";\n\npackage pets;\n");
        assert_eq!(generator.proto_file().package, "pets");
    }
}
