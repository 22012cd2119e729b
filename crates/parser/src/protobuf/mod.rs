//! Protobuf descriptor reflector
//!
//! Reads a compiled `FileDescriptorSet` (as produced by
//! `protoc --include_imports --include_source_info -o set.pb`) and turns its
//! messages, enums and services into an [`IdlFile`](idlbridge_common::IdlFile).
//!
//! Custom options are decoded through the descriptor pool, so extensions
//! such as `(api.get) = "/pets/:id"` or `(openapi.schema) = {...}` show up as
//! annotations keyed by the extension's full name. The extension definitions
//! must be part of the descriptor set.
//!
//! ## Example
//! ```rust,ignore
//! use idlbridge_parser::ProtobufParser;
//!
//! let parser = ProtobufParser::from_file("pet.pb")?;
//! let idl = parser.parse()?;
//! ```

mod converter;
mod parser;

pub use parser::ProtobufParser;
