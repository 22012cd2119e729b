//! Conversion settings
//!
//! Loaded from a YAML file such as:
//!
//! ```yaml
//! openapi:
//!   title: Pet Store
//!   mode: http
//!   naming: json
//!   enum_style: string
//! proto:
//!   package: petstore
//!   openapi_options: true
//!   file_options:
//!     go_package: example.com/petstore
//! ```
//!
//! Every field has a default, so an empty file is a valid configuration.

use crate::{ConvertError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_INFO_VERSION: &str = "0.0.1";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_PACKAGE: &str = "openapi";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub openapi: OpenApiConfig,
    pub proto: ProtoConfig,
}

impl BridgeConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConvertError::Parse(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content)
            .map_err(|e| ConvertError::Parse(format!("Invalid config {:?}: {}", path, e)))
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

/// How operations are derived from IDL methods
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Routes come from `api.get`/`api.post`/... annotations
    #[default]
    Http,
    /// Every method becomes `POST /<Method>` with a JSON body
    Rpc,
}

/// Property naming for protobuf fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingStyle {
    /// lowerCamelCase JSON name
    #[default]
    Json,
    /// Field name as declared
    Proto,
}

/// Schema emitted for enum-typed fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumStyle {
    #[default]
    Integer,
    String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenApiConfig {
    /// `info.title`; derived from a single tag when unset
    pub title: Option<String>,
    pub description: Option<String>,
    pub version: String,
    pub mode: GenerationMode,
    /// Server used when no method or service declares one
    pub default_server: String,
    pub naming: NamingStyle,
    pub enum_style: EnumStyle,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            version: DEFAULT_INFO_VERSION.to_string(),
            mode: GenerationMode::default(),
            default_server: DEFAULT_SERVER_URL.to_string(),
            naming: NamingStyle::default(),
            enum_style: EnumStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtoConfig {
    pub package: String,
    /// Emit `api.<method>` route options and import `api.proto`
    pub api_options: bool,
    /// Emit `openapi.operation` options and import `openapi.proto`
    pub openapi_options: bool,
    /// File-level options, e.g. `go_package`
    pub file_options: IndexMap<String, String>,
}

impl Default for ProtoConfig {
    fn default() -> Self {
        Self {
            package: DEFAULT_PACKAGE.to_string(),
            api_options: true,
            openapi_options: false,
            file_options: IndexMap::new(),
        }
    }
}
