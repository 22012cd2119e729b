//! YAML rendering for OpenAPI documents

use idlbridge_common::openapi::Document;
use idlbridge_common::Result;

/// First line of every generated document
pub const GENERATED_HEADER: &str = "# Generated with idlbridge";

/// Renders a [`Document`] as YAML
///
/// Key order follows the document model, so two encodes of the same
/// document produce byte-identical output.
pub struct YamlEncoder;

impl YamlEncoder {
    pub fn encode(document: &Document) -> Result<String> {
        let body = serde_yaml::to_string(document)?;
        Ok(format!("{}\n{}", GENERATED_HEADER, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlbridge_common::openapi::{Info, OPENAPI_VERSION};

    #[test]
    fn test_encode_header_and_fields() {
        let document = Document {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                title: "Pets API".into(),
                description: None,
                version: "0.0.1".into(),
            },
            ..Default::default()
        };

        let yaml = YamlEncoder::encode(&document).unwrap();
        assert!(yaml.starts_with("# Generated with idlbridge\nopenapi: 3.0.3\n"));
        assert!(yaml.contains("title: Pets API"));
        assert!(yaml.contains("paths: {}"));
        assert!(!yaml.contains("components"));

        let parsed: Document = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, document);
    }
}
