//! Primitive type tables for both conversion directions

use idlbridge_common::openapi::Schema;
use idlbridge_common::proto::{TIMESTAMP_IMPORT, TIMESTAMP_TYPE};
use idlbridge_common::ScalarKind;

/// A proto scalar and the import it needs, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtoScalar {
    pub type_name: &'static str,
    pub import: Option<&'static str>,
}

impl ProtoScalar {
    const fn plain(type_name: &'static str) -> Self {
        Self {
            type_name,
            import: None,
        }
    }
}

/// Maps primitive types between OpenAPI and proto/IDL
pub struct TypeMapper;

impl TypeMapper {
    /// Map an OpenAPI scalar `type` / `format` pair to a proto scalar
    ///
    /// Returns `None` for `object`, `array` and unknown types.
    ///
    /// # Examples
    /// ```
    /// use idlbridge_generator::TypeMapper;
    ///
    /// assert_eq!(TypeMapper::openapi_to_proto("integer", Some("int32")).unwrap().type_name, "int32");
    /// assert_eq!(TypeMapper::openapi_to_proto("integer", None).unwrap().type_name, "int64");
    /// assert_eq!(TypeMapper::openapi_to_proto("number", Some("float")).unwrap().type_name, "float");
    /// assert!(TypeMapper::openapi_to_proto("object", None).is_none());
    /// ```
    pub fn openapi_to_proto(schema_type: &str, format: Option<&str>) -> Option<ProtoScalar> {
        let scalar = match (schema_type, format) {
            ("string", Some("date") | Some("date-time")) => ProtoScalar {
                type_name: TIMESTAMP_TYPE,
                import: Some(TIMESTAMP_IMPORT),
            },
            ("string", _) => ProtoScalar::plain("string"),
            ("integer", Some("int32")) => ProtoScalar::plain("int32"),
            ("integer", _) => ProtoScalar::plain("int64"),
            ("number", Some("float")) => ProtoScalar::plain("float"),
            ("number", _) => ProtoScalar::plain("double"),
            ("boolean", _) => ProtoScalar::plain("bool"),
            _ => return None,
        };
        Some(scalar)
    }

    /// Map an IDL scalar to an inline OpenAPI schema
    ///
    /// Unknown scalars yield an untyped schema.
    pub fn scalar_schema(kind: &ScalarKind) -> Schema {
        match kind {
            ScalarKind::String => Schema::typed("string", None),
            ScalarKind::Binary => Schema::typed("string", Some("binary")),
            ScalarKind::Bool => Schema::typed("boolean", None),
            ScalarKind::Byte => Schema::typed("string", Some("byte")),
            ScalarKind::Double => Schema::typed("number", Some("double")),
            ScalarKind::Float => Schema::typed("number", Some("float")),
            ScalarKind::I8 => Schema::typed("integer", Some("int8")),
            ScalarKind::I16 => Schema::typed("integer", Some("int16")),
            ScalarKind::I32 => Schema::typed("integer", Some("int32")),
            ScalarKind::I64 => Schema::typed("integer", Some("int64")),
            ScalarKind::U32 => Schema::typed("integer", Some("uint32")),
            ScalarKind::U64 => Schema::typed("integer", Some("uint64")),
            ScalarKind::Timestamp => Schema::typed("string", Some("date-time")),
            ScalarKind::Unknown(name) => {
                tracing::debug!(type_name = %name, "unknown scalar, emitting untyped schema");
                Schema::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_strings() {
        assert_eq!(
            TypeMapper::openapi_to_proto("string", Some("date-time")),
            Some(ProtoScalar {
                type_name: TIMESTAMP_TYPE,
                import: Some(TIMESTAMP_IMPORT),
            })
        );
        assert_eq!(
            TypeMapper::openapi_to_proto("string", Some("uuid")),
            Some(ProtoScalar::plain("string"))
        );
        assert_eq!(
            TypeMapper::openapi_to_proto("number", None).unwrap().type_name,
            "double"
        );
        assert_eq!(
            TypeMapper::openapi_to_proto("boolean", None).unwrap().type_name,
            "bool"
        );
    }

    #[test]
    fn test_scalar_schemas() {
        let schema = TypeMapper::scalar_schema(&ScalarKind::I16);
        assert_eq!(schema.schema_type.as_deref(), Some("integer"));
        assert_eq!(schema.format.as_deref(), Some("int16"));

        let schema = TypeMapper::scalar_schema(&ScalarKind::Binary);
        assert_eq!(schema.format.as_deref(), Some("binary"));
    }

    #[test]
    fn test_unknown_scalar_is_untyped() {
        let schema = TypeMapper::scalar_schema(&ScalarKind::Unknown("slist".into()));
        assert_eq!(schema, Schema::default());
    }
}
