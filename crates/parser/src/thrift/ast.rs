//! Thrift syntax tree produced by the grammar

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Document {
    /// Include paths in declaration order
    pub includes: Vec<String>,
    pub namespaces: Vec<(String, String)>,
    pub typedefs: Vec<Typedef>,
    pub enums: Vec<Enum>,
    pub structs: Vec<Struct>,
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Type {
    /// Base type keyword (`string`, `i32`, ...)
    Base(String),
    /// Struct, enum or typedef name, possibly include-qualified
    Named(String),
    List(Box<Type>),
    Set(Box<Type>),
    Map(Box<Type>, Box<Type>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Typedef {
    pub name: String,
    pub target: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Enum {
    pub name: String,
    pub comment: String,
    pub values: Vec<(String, i64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StructKind {
    Struct,
    Union,
    Exception,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Struct {
    pub kind: StructKind,
    pub name: String,
    pub comment: String,
    pub annotations: Vec<(String, String)>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Requiredness {
    Default,
    Required,
    Optional,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Field {
    pub id: Option<i64>,
    pub requiredness: Requiredness,
    pub field_type: Type,
    pub name: String,
    pub comment: String,
    pub annotations: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Function {
    pub name: String,
    pub oneway: bool,
    /// `None` for `void`
    pub returns: Option<Type>,
    pub arguments: Vec<Field>,
    pub comment: String,
    pub annotations: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Service {
    pub name: String,
    pub extends: Option<String>,
    pub comment: String,
    pub annotations: Vec<(String, String)>,
    pub functions: Vec<Function>,
}
