//! Protobuf FileDescriptorSet parser

use idlbridge_common::{ConvertError, IdlFile, Result};
use prost_reflect::DescriptorPool;
use std::fs;
use std::path::Path;

/// Protobuf descriptor set parser
///
/// Parses a FileDescriptorSet (compiled .proto files) to extract
/// services, RPC methods, message types and their custom options.
pub struct ProtobufParser {
    /// Descriptor pool for reflection
    pool: DescriptorPool,
}

impl ProtobufParser {
    /// Load FileDescriptorSet from binary file
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = ProtobufParser::from_file("service.pb")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref()).map_err(|e| {
            ConvertError::Parse(format!(
                "Failed to read FileDescriptorSet file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_file_descriptor_set(&bytes)
    }

    /// Parse FileDescriptorSet from bytes
    ///
    /// The set is decoded straight into a descriptor pool seeded with the
    /// well-known types, which keeps the raw option bytes so that custom
    /// options can be read back as extensions.
    ///
    /// # Example
    /// ```rust,ignore
    /// let bytes = include_bytes!("service.pb");
    /// let parser = ProtobufParser::from_file_descriptor_set(bytes)?;
    /// ```
    pub fn from_file_descriptor_set(bytes: &[u8]) -> Result<Self> {
        let mut pool = DescriptorPool::global();
        pool.decode_file_descriptor_set(bytes).map_err(|e| {
            ConvertError::Parse(format!("Failed to decode FileDescriptorSet: {}", e))
        })?;

        tracing::debug!(
            files = pool.files().len(),
            services = pool.services().len(),
            "loaded descriptor pool"
        );

        Ok(Self { pool })
    }

    /// Convert the descriptor pool into the neutral IDL model
    pub fn parse(&self) -> Result<IdlFile> {
        super::converter::convert_protobuf_to_idl(&self.pool)
    }

    /// Get reference to the underlying descriptor pool
    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;
    use prost_types::FileDescriptorSet;

    #[test]
    fn test_parse_empty_descriptor_set() {
        let file_descriptor_set = FileDescriptorSet { file: vec![] };
        let bytes = file_descriptor_set.encode_to_vec();

        let parser = ProtobufParser::from_file_descriptor_set(&bytes).unwrap();
        let idl = parser.parse().unwrap();
        assert!(idl.services.is_empty());
        assert!(idl.structs.is_empty());
    }

    #[test]
    fn test_reject_garbage() {
        assert!(ProtobufParser::from_file_descriptor_set(&[0xff, 0xff, 0xff]).is_err());
    }
}
