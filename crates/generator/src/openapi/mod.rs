//! IDL to OpenAPI 3.0.3 generation
//!
//! [`OpenApiBuilder`] walks the services of an [`IdlFile`](idlbridge_common::IdlFile)
//! in HTTP mode (routes from `api.*` annotations) or RPC mode (one `POST`
//! per method), then [`postprocess`] normalizes the document and
//! [`YamlEncoder`] renders it.

mod builder;
mod encoder;
mod postprocess;

pub use builder::OpenApiBuilder;
pub use encoder::{YamlEncoder, GENERATED_HEADER};
pub use postprocess::postprocess;
