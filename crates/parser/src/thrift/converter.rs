//! Converts parsed Thrift documents to the neutral IDL model
//!
//! Types are resolved here: typedefs are expanded, named types are
//! classified as structs or enums, and types from included files are
//! qualified with the include alias (`shared.Item`).

use super::ast::{Document, Service, Struct, Type};
use crate::TypeMapper;
use idlbridge_common::annotations::{OPENAPI_DOCUMENT, OPENAPI_OPERATION, OPENAPI_PARAMETER};
use idlbridge_common::annotations::{OPENAPI_PROPERTY, OPENAPI_SCHEMA};
use idlbridge_common::{
    Annotations, ConvertError, EnumDef, EnumValueDef, FieldDef, IdlFile, IdlSyntax, MethodDef,
    Result, ScalarKind, ServiceDef, StructDef, TypeRef,
};
use std::collections::HashMap;

const MAX_TYPEDEF_DEPTH: usize = 32;

const STRUCTURED_KEYS: [&str; 5] = [
    OPENAPI_OPERATION,
    OPENAPI_PROPERTY,
    OPENAPI_SCHEMA,
    OPENAPI_PARAMETER,
    OPENAPI_DOCUMENT,
];

/// A parsed file and the alias other files use to refer to it
///
/// The main file has an empty alias.
#[derive(Debug, Clone)]
pub(crate) struct Module {
    pub alias: String,
    pub document: Document,
}

/// Convert the main module (first entry) and its includes to an [`IdlFile`]
pub(crate) fn convert_thrift_to_idl(name: &str, modules: &[Module]) -> Result<IdlFile> {
    let resolver = Resolver::new(modules);
    let mut idl = IdlFile::new(name, IdlSyntax::Thrift);

    for module in modules {
        for s in &module.document.structs {
            idl.structs.push(resolver.convert_struct(&module.alias, s)?);
        }
        for e in &module.document.enums {
            idl.enums.push(EnumDef {
                name: qualify(&module.alias, &e.name),
                comment: e.comment.clone(),
                values: e
                    .values
                    .iter()
                    .map(|(name, number)| EnumValueDef {
                        name: name.clone(),
                        number: *number,
                    })
                    .collect(),
            });
        }
    }

    if let Some(main) = modules.first() {
        for service in &main.document.services {
            idl.services.push(resolver.convert_service(&main.alias, service)?);
        }
    }

    tracing::debug!(
        file = name,
        services = idl.services.len(),
        structs = idl.structs.len(),
        enums = idl.enums.len(),
        "converted thrift document"
    );

    Ok(idl)
}

fn qualify(alias: &str, name: &str) -> String {
    if alias.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", alias, name)
    }
}

pub(crate) fn to_annotations(pairs: &[(String, String)]) -> Annotations {
    let mut annotations = Annotations::new();
    for (key, value) in pairs {
        if STRUCTURED_KEYS.contains(&key.as_str()) {
            annotations.insert_structured(key.clone(), value.clone());
        } else {
            annotations.insert(key.clone(), value.clone());
        }
    }
    annotations
}

struct Resolver<'a> {
    modules: HashMap<&'a str, &'a Document>,
}

impl<'a> Resolver<'a> {
    fn new(modules: &'a [Module]) -> Self {
        Self {
            modules: modules
                .iter()
                .map(|m| (m.alias.as_str(), &m.document))
                .collect(),
        }
    }

    /// Split `alias.Name` into the defining module and the local name
    fn locate<'n>(&self, scope: &'n str, name: &'n str) -> (&'n str, &'n str) {
        match name.rsplit_once('.') {
            Some((alias, local)) => (alias, local),
            None => (scope, name),
        }
    }

    fn resolve_type(&self, scope: &str, ty: &Type) -> Result<TypeRef> {
        self.resolve_type_at(scope, ty, 0)
    }

    fn resolve_type_at(&self, scope: &str, ty: &Type, depth: usize) -> Result<TypeRef> {
        if depth > MAX_TYPEDEF_DEPTH {
            return Err(ConvertError::Parse(format!(
                "Typedef chain too deep while resolving {:?}",
                ty
            )));
        }
        Ok(match ty {
            Type::Base(name) => TypeRef::Scalar(TypeMapper::map_thrift_type(name)),
            Type::List(element) => TypeRef::list(self.resolve_type_at(scope, element, depth)?),
            Type::Set(element) => {
                TypeRef::Set(Box::new(self.resolve_type_at(scope, element, depth)?))
            },
            Type::Map(key, value) => TypeRef::map(
                self.resolve_type_at(scope, key, depth)?,
                self.resolve_type_at(scope, value, depth)?,
            ),
            Type::Named(name) => {
                let (alias, local) = self.locate(scope, name);
                let Some(doc) = self.modules.get(alias) else {
                    tracing::warn!(type_name = %name, "type refers to an unknown include");
                    return Ok(TypeRef::Scalar(ScalarKind::Unknown(name.clone())));
                };

                if let Some(typedef) = doc.typedefs.iter().find(|t| t.name == local) {
                    return self.resolve_type_at(alias, &typedef.target, depth + 1);
                }
                if doc.enums.iter().any(|e| e.name == local) {
                    TypeRef::Enum(qualify(alias, local))
                } else if doc.structs.iter().any(|s| s.name == local) {
                    TypeRef::Struct(qualify(alias, local))
                } else {
                    tracing::warn!(type_name = %name, "unknown thrift type");
                    TypeRef::Scalar(ScalarKind::Unknown(name.clone()))
                }
            },
        })
    }

    fn convert_struct(&self, scope: &str, s: &Struct) -> Result<StructDef> {
        let fields = s
            .fields
            .iter()
            .map(|f| {
                Ok(FieldDef {
                    name: f.name.clone(),
                    json_name: None,
                    comment: f.comment.clone(),
                    annotations: to_annotations(&f.annotations),
                    type_ref: self.resolve_type(scope, &f.field_type)?,
                })
            })
            .collect::<Result<Vec<_>>>()
            .map_err(|e| e.context(format!("struct {}", s.name)))?;

        Ok(StructDef {
            name: qualify(scope, &s.name),
            comment: s.comment.clone(),
            annotations: to_annotations(&s.annotations),
            fields,
        })
    }

    fn convert_service(&self, scope: &str, service: &Service) -> Result<ServiceDef> {
        let mut methods = self.inherited_methods(scope, service, 0)?;
        for function in &service.functions {
            let method = self
                .convert_function(scope, function)
                .map_err(|e| e.context(format!("service {}", service.name)))?;
            match methods.iter_mut().find(|m| m.name == method.name) {
                Some(existing) => *existing = method,
                None => methods.push(method),
            }
        }

        Ok(ServiceDef {
            name: qualify(scope, &service.name),
            comment: service.comment.clone(),
            annotations: to_annotations(&service.annotations),
            methods,
        })
    }

    /// Methods of the `extends` chain, base service first
    fn inherited_methods(
        &self,
        scope: &str,
        service: &Service,
        depth: usize,
    ) -> Result<Vec<MethodDef>> {
        let Some(parent_name) = &service.extends else {
            return Ok(Vec::new());
        };
        if depth > MAX_TYPEDEF_DEPTH {
            return Err(ConvertError::Parse(format!(
                "Service inheritance too deep at {}",
                service.name
            )));
        }

        let (alias, local) = self.locate(scope, parent_name);
        let parent = self
            .modules
            .get(alias)
            .and_then(|doc| doc.services.iter().find(|s| s.name == local))
            .ok_or_else(|| {
                ConvertError::Parse(format!(
                    "Service {} extends unknown service {}",
                    service.name, parent_name
                ))
            })?;

        let mut methods = self.inherited_methods(alias, parent, depth + 1)?;
        for function in &parent.functions {
            let method = self.convert_function(alias, function)?;
            methods.retain(|m| m.name != method.name);
            methods.push(method);
        }
        Ok(methods)
    }

    fn convert_function(&self, scope: &str, function: &super::ast::Function) -> Result<MethodDef> {
        let arguments = function
            .arguments
            .iter()
            .map(|a| self.resolve_type(scope, &a.field_type))
            .collect::<Result<Vec<_>>>()?;
        let output = function
            .returns
            .as_ref()
            .map(|t| self.resolve_type(scope, t))
            .transpose()?;

        Ok(MethodDef {
            name: function.name.clone(),
            comment: function.comment.clone(),
            annotations: to_annotations(&function.annotations),
            arguments,
            output,
        })
    }
}
