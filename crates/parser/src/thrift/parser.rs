//! Thrift file loader

use super::grammar::parse_document;
use super::converter::{convert_thrift_to_idl, Module};
use idlbridge_common::{ConvertError, IdlFile, Result};
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

/// Thrift IDL parser
///
/// Holds the main document and every document reachable through its
/// `include` directives.
pub struct ThriftParser {
    /// Name of the main file (file stem)
    name: String,

    /// Main module first, then includes in discovery order
    modules: Vec<Module>,
}

impl ThriftParser {
    /// Load a Thrift file and everything it includes
    ///
    /// Include paths are resolved relative to the including file.
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = ThriftParser::from_file("idl/pet.thrift")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = include_alias(path);
        let mut modules = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<(String, PathBuf)> = VecDeque::new();
        queue.push_back((String::new(), path.to_path_buf()));
        seen.insert(String::new());

        while let Some((alias, file)) = queue.pop_front() {
            let source = fs::read_to_string(&file).map_err(|e| {
                ConvertError::Parse(format!(
                    "Failed to read Thrift file {}: {}",
                    file.display(),
                    e
                ))
            })?;
            let document = parse_document(&source)
                .map_err(|e| e.context(format!("{}", file.display())))?;

            let base = file.parent().map(Path::to_path_buf).unwrap_or_default();
            for include in &document.includes {
                let include_path = base.join(include);
                let include_name = include_alias(&include_path);
                if seen.insert(include_name.clone()) {
                    tracing::debug!(include = %include_path.display(), "following include");
                    queue.push_back((include_name, include_path));
                }
            }

            modules.push(Module { alias, document });
        }

        Ok(Self { name, modules })
    }

    /// Parse Thrift source held in memory
    ///
    /// Includes are not followed; register them with [`Self::with_include`].
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = ThriftParser::from_str(include_str!("pet.thrift"))?;
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(source: &str) -> Result<Self> {
        let document = parse_document(source)?;
        Ok(Self {
            name: "main".to_string(),
            modules: vec![Module {
                alias: String::new(),
                document,
            }],
        })
    }

    /// Register an in-memory include under the alias `name`
    /// (`shared` for `include "shared.thrift"`)
    pub fn with_include(mut self, name: &str, source: &str) -> Result<Self> {
        let document = parse_document(source).map_err(|e| e.context(name.to_string()))?;
        self.modules.retain(|m| m.alias != name);
        self.modules.push(Module {
            alias: name.to_string(),
            document,
        });
        Ok(self)
    }

    /// Set the name reported on the resulting [`IdlFile`]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Resolve all types and produce the neutral IDL model
    pub fn parse(&self) -> Result<IdlFile> {
        if let Some(main) = self.modules.first() {
            for include in &main.document.includes {
                let alias = include_alias(Path::new(include));
                if !self.modules.iter().any(|m| m.alias == alias) {
                    tracing::warn!(include = %include, "include was not loaded, its types stay unresolved");
                }
            }
        }
        convert_thrift_to_idl(&self.name, &self.modules)
    }
}

/// Alias used to qualify types from an included file (`shared.thrift` -> `shared`)
fn include_alias(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_parses_main_module() {
        let parser = ThriftParser::from_str("struct Pet { 1: string name }").unwrap();
        let idl = parser.parse().unwrap();
        assert_eq!(idl.name, "main");
        assert_eq!(idl.structs.len(), 1);
    }

    #[test]
    fn test_with_include() {
        let idl = ThriftParser::from_str(
            "include \"common.thrift\"\nstruct Pet { 1: common.Tag tag }",
        )
        .unwrap()
        .with_include("common", "struct Tag { 1: string label }")
        .unwrap()
        .with_name("pet")
        .parse()
        .unwrap();

        assert_eq!(idl.name, "pet");
        assert!(idl.find_struct("common.Tag").is_some());
        assert_eq!(
            idl.find_struct("Pet").unwrap().fields[0].type_ref.struct_name(),
            Some("common.Tag")
        );
    }

    #[test]
    fn test_include_alias() {
        assert_eq!(include_alias(Path::new("../base/shared.thrift")), "shared");
    }

    #[test]
    fn test_missing_file() {
        let err = ThriftParser::from_file("/nonexistent/pet.thrift").err().unwrap();
        assert!(err.to_string().contains("Failed to read Thrift file"));
    }
}
