//! OpenAPI to proto3 generation
//!
//! [`ProtoConverter`] walks an OpenAPI document and builds a
//! [`ProtoFile`](idlbridge_common::proto::ProtoFile); [`ProtoEncoder`]
//! renders it as proto3 source.
//!
//! ## Mapping
//! - component schemas become top-level messages (merged by name)
//! - each operation becomes an `rpc` in the service named by its first tag
//! - parameters and body fields become the `<operationId>Request` message
//! - responses become `<operationId>Response_<code>` messages
//! - operations without input or output use `google.protobuf.Empty`

mod converter;
mod encoder;

pub use converter::{Converted, ProtoConverter, API_IMPORT, OPENAPI_IMPORT};
pub use encoder::ProtoEncoder;
