//! OpenAPI 3.x document loader
//!
//! Reads JSON or YAML and performs the light validation the converters rely
//! on: a `3.x` version string and an `info` object. Full OpenAPI validation
//! is out of scope.
//!
//! ## Example
//! ```rust,ignore
//! use idlbridge_parser::OpenApiParser;
//!
//! let parser = OpenApiParser::from_file("petstore.yaml")?;
//! let document = parser.parse()?;
//! ```

mod parser;

pub use parser::OpenApiParser;
