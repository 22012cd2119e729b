//! Neutral IDL model
//!
//! Both the Thrift parser and the protobuf descriptor reflector produce an
//! [`IdlFile`]. Type references are already resolved: typedefs are expanded
//! and every named type is known to be a struct or an enum.

use crate::annotations::Annotations;
use serde::{Deserialize, Serialize};

/// Source syntax of an IDL file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdlSyntax {
    Thrift,
    Protobuf,
}

/// A parsed, type-resolved interface definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdlFile {
    /// File or package name
    pub name: String,
    pub syntax: IdlSyntax,
    pub services: Vec<ServiceDef>,
    /// Structs, unions and exceptions, including those pulled in from includes
    pub structs: Vec<StructDef>,
    pub enums: Vec<EnumDef>,
}

impl IdlFile {
    pub fn new(name: impl Into<String>, syntax: IdlSyntax) -> Self {
        Self {
            name: name.into(),
            syntax,
            services: Vec::new(),
            structs: Vec::new(),
            enums: Vec::new(),
        }
    }

    /// Look up a struct by name
    pub fn find_struct(&self, name: &str) -> Option<&StructDef> {
        self.structs.iter().find(|s| s.name == name)
    }

    /// Look up an enum by name
    pub fn find_enum(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDef {
    pub name: String,
    pub comment: String,
    pub annotations: Annotations,
    pub methods: Vec<MethodDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub comment: String,
    pub annotations: Annotations,
    /// Argument types in declaration order
    pub arguments: Vec<TypeRef>,
    /// `None` for `void` / `oneway` methods
    pub output: Option<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDef {
    pub name: String,
    pub comment: String,
    pub annotations: Annotations,
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    /// Protobuf JSON name (`lowerCamelCase` of the field name)
    pub json_name: Option<String>,
    pub comment: String,
    pub annotations: Annotations,
    pub type_ref: TypeRef,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            json_name: None,
            comment: String::new(),
            annotations: Annotations::new(),
            type_ref,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    pub comment: String,
    pub values: Vec<EnumValueDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueDef {
    pub name: String,
    pub number: i64,
}

/// Resolved field type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeRef {
    Scalar(ScalarKind),
    Struct(String),
    Enum(String),
    List(Box<TypeRef>),
    Set(Box<TypeRef>),
    Map(Box<TypeRef>, Box<TypeRef>),
}

impl TypeRef {
    pub fn list(element: TypeRef) -> Self {
        TypeRef::List(Box::new(element))
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Map(Box::new(key), Box::new(value))
    }

    /// Name of the struct this type refers to, if any
    pub fn struct_name(&self) -> Option<&str> {
        match self {
            TypeRef::Struct(name) => Some(name),
            _ => None,
        }
    }
}

/// Scalar kinds shared by Thrift and protobuf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarKind {
    String,
    Binary,
    Bool,
    Byte,
    Double,
    Float,
    I8,
    I16,
    I32,
    I64,
    U32,
    U64,
    Timestamp,
    /// A name the reflector could not classify
    Unknown(String),
}
