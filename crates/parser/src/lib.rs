//! Input loaders for idlbridge
//!
//! Each loader turns one input format into the model the generators walk:
//!
//! - [`OpenApiParser`]: OpenAPI 3.x JSON or YAML into an
//!   [`openapi::Document`](idlbridge_common::openapi::Document)
//! - [`ThriftParser`]: Thrift IDL text (with includes) into an
//!   [`IdlFile`](idlbridge_common::IdlFile)
//! - [`ProtobufParser`]: a compiled `FileDescriptorSet` into an
//!   [`IdlFile`](idlbridge_common::IdlFile), custom options included

pub mod openapi;
pub mod protobuf;
pub mod thrift;
mod type_mapper;

pub use openapi::OpenApiParser;
pub use protobuf::ProtobufParser;
pub use thrift::ThriftParser;
pub use type_mapper::TypeMapper;
