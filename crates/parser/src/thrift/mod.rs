//! Thrift IDL parser
//!
//! Parses Thrift IDL text, follows `include` directives and resolves every
//! type reference, producing an [`IdlFile`](idlbridge_common::IdlFile).
//!
//! Annotations written in parentheses after a declaration are kept:
//!
//! ```thrift
//! struct GetPetRequest {
//!     1: i64 id (api.path = "id")
//!     2: string trace (api.header = "X-Trace")
//! } (openapi.schema = '{"title": "Pet lookup"}')
//!
//! service PetService {
//!     Pet GetPet(1: GetPetRequest req) (api.get = "/pets/:id")
//! }
//! ```
//!
//! ## Example
//! ```rust,ignore
//! use idlbridge_parser::ThriftParser;
//!
//! let parser = ThriftParser::from_file("pet.thrift")?;
//! let idl = parser.parse()?;
//! ```

mod ast;
mod converter;
mod grammar;
mod parser;

pub use parser::ThriftParser;
