//! Type mapping from source scalar types to the neutral IDL model
//!
//! Maps Thrift base type keywords and protobuf field kinds to [`ScalarKind`].

use idlbridge_common::ScalarKind;
use prost_reflect::Kind;

/// Maps source type names to ScalarKind
pub struct TypeMapper;

impl TypeMapper {
    /// Map a Thrift base type keyword to ScalarKind
    ///
    /// # Examples
    /// ```
    /// use idlbridge_parser::TypeMapper;
    /// use idlbridge_common::ScalarKind;
    ///
    /// assert_eq!(TypeMapper::map_thrift_type("string"), ScalarKind::String);
    /// assert_eq!(TypeMapper::map_thrift_type("i64"), ScalarKind::I64);
    /// assert_eq!(TypeMapper::map_thrift_type("bool"), ScalarKind::Bool);
    /// ```
    pub fn map_thrift_type(thrift_type: &str) -> ScalarKind {
        match thrift_type {
            "string" | "uuid" => ScalarKind::String,
            "binary" => ScalarKind::Binary,
            "bool" => ScalarKind::Bool,
            "byte" => ScalarKind::Byte,
            "double" => ScalarKind::Double,
            "i8" => ScalarKind::I8,
            "i16" => ScalarKind::I16,
            "i32" => ScalarKind::I32,
            "i64" => ScalarKind::I64,
            other => ScalarKind::Unknown(other.to_string()),
        }
    }

    /// Map a scalar protobuf field kind to ScalarKind
    ///
    /// Returns `None` for message and enum kinds, which the reflector
    /// resolves to named types.
    pub fn map_protobuf_kind(kind: &Kind) -> Option<ScalarKind> {
        let scalar = match kind {
            Kind::Double => ScalarKind::Double,
            Kind::Float => ScalarKind::Float,
            Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => ScalarKind::I32,
            Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => ScalarKind::I64,
            Kind::Uint32 | Kind::Fixed32 => ScalarKind::U32,
            Kind::Uint64 | Kind::Fixed64 => ScalarKind::U64,
            Kind::Bool => ScalarKind::Bool,
            Kind::String => ScalarKind::String,
            Kind::Bytes => ScalarKind::Binary,
            Kind::Message(_) | Kind::Enum(_) => return None,
        };
        Some(scalar)
    }

    /// Well-known protobuf messages that map to a scalar
    pub fn map_well_known_message(full_name: &str) -> Option<ScalarKind> {
        match full_name {
            "google.protobuf.Timestamp" => Some(ScalarKind::Timestamp),
            "google.protobuf.StringValue" => Some(ScalarKind::String),
            "google.protobuf.BoolValue" => Some(ScalarKind::Bool),
            "google.protobuf.Int32Value" => Some(ScalarKind::I32),
            "google.protobuf.Int64Value" => Some(ScalarKind::I64),
            "google.protobuf.UInt32Value" => Some(ScalarKind::U32),
            "google.protobuf.UInt64Value" => Some(ScalarKind::U64),
            "google.protobuf.FloatValue" => Some(ScalarKind::Float),
            "google.protobuf.DoubleValue" => Some(ScalarKind::Double),
            "google.protobuf.BytesValue" => Some(ScalarKind::Binary),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thrift_base_types() {
        assert_eq!(TypeMapper::map_thrift_type("binary"), ScalarKind::Binary);
        assert_eq!(TypeMapper::map_thrift_type("byte"), ScalarKind::Byte);
        assert_eq!(TypeMapper::map_thrift_type("i8"), ScalarKind::I8);
        assert_eq!(TypeMapper::map_thrift_type("double"), ScalarKind::Double);
        assert_eq!(
            TypeMapper::map_thrift_type("slist"),
            ScalarKind::Unknown("slist".to_string())
        );
    }

    #[test]
    fn test_protobuf_kinds() {
        assert_eq!(
            TypeMapper::map_protobuf_kind(&Kind::Sint64),
            Some(ScalarKind::I64)
        );
        assert_eq!(
            TypeMapper::map_protobuf_kind(&Kind::Fixed32),
            Some(ScalarKind::U32)
        );
        assert_eq!(
            TypeMapper::map_protobuf_kind(&Kind::Bytes),
            Some(ScalarKind::Binary)
        );
    }

    #[test]
    fn test_well_known_messages() {
        assert_eq!(
            TypeMapper::map_well_known_message("google.protobuf.Timestamp"),
            Some(ScalarKind::Timestamp)
        );
        assert_eq!(TypeMapper::map_well_known_message("pkg.User"), None);
    }
}
