//! Converts protobuf descriptors to the neutral IDL model

use crate::TypeMapper;
use idlbridge_common::annotations::{
    OPENAPI_DOCUMENT, OPENAPI_OPERATION, OPENAPI_PARAMETER, OPENAPI_PROPERTY, OPENAPI_SCHEMA,
};
use idlbridge_common::{
    Annotations, EnumDef, EnumValueDef, FieldDef, IdlFile, IdlSyntax, MethodDef, Result,
    ScalarKind, ServiceDef, StructDef, TypeRef,
};
use prost_reflect::{
    DescriptorPool, DynamicMessage, EnumDescriptor, FieldDescriptor, FileDescriptor, Kind,
    MessageDescriptor, Value,
};
use std::collections::{HashSet, VecDeque};

const WELL_KNOWN_PACKAGE: &str = "google.protobuf";

/// Convert protobuf DescriptorPool to an IdlFile
///
/// Messages and enums of the `google.protobuf` package are only included
/// when a field or method refers to them.
pub fn convert_protobuf_to_idl(pool: &DescriptorPool) -> Result<IdlFile> {
    let user_files: Vec<FileDescriptor> = pool
        .files()
        .filter(|f| !is_well_known(f.package_name()))
        .collect();

    let name = user_files
        .last()
        .map(|f| {
            if f.package_name().is_empty() {
                f.name().trim_end_matches(".proto").to_string()
            } else {
                f.package_name().to_string()
            }
        })
        .unwrap_or_default();

    let mut reflector = Reflector::default();
    let mut idl = IdlFile::new(name, IdlSyntax::Protobuf);

    for message in pool.all_messages() {
        if is_well_known(message.package_name()) || message.is_map_entry() {
            continue;
        }
        idl.structs.push(reflector.convert_message(&message));
    }
    for enum_desc in pool.all_enums() {
        if !is_well_known(enum_desc.package_name()) {
            idl.enums.push(convert_enum(&enum_desc));
        }
    }
    for service in pool.services() {
        if is_well_known(service.package_name()) {
            continue;
        }
        let methods = service
            .methods()
            .map(|method| MethodDef {
                name: method.name().to_string(),
                comment: comment_at(&method.parent_file(), method.path()),
                annotations: options_to_annotations(&method.options()),
                arguments: vec![reflector.message_type(&method.input())],
                output: Some(reflector.message_type(&method.output())),
            })
            .collect();

        idl.services.push(ServiceDef {
            name: service.name().to_string(),
            comment: comment_at(&service.parent_file(), service.path()),
            annotations: options_to_annotations(&service.options()),
            methods,
        });
    }

    // Pull in the well-known messages that user types refer to
    let mut added: HashSet<String> = HashSet::new();
    while let Some(message) = reflector.pending.pop_front() {
        if added.insert(message.full_name().to_string()) {
            idl.structs.push(reflector.convert_message(&message));
        }
    }
    for enum_desc in std::mem::take(&mut reflector.pending_enums) {
        if !idl.enums.iter().any(|e| e.name == enum_desc.full_name()) {
            idl.enums.push(convert_enum(&enum_desc));
        }
    }

    tracing::debug!(
        package = %idl.name,
        services = idl.services.len(),
        structs = idl.structs.len(),
        enums = idl.enums.len(),
        "converted descriptor pool"
    );

    Ok(idl)
}

fn is_well_known(package: &str) -> bool {
    package == WELL_KNOWN_PACKAGE || package.starts_with("google.protobuf.")
}

/// Name of a message or enum inside the IDL model
///
/// User types drop their package prefix (`pets.v1.Pet` -> `Pet`, nested
/// `pets.v1.Pet.Tag` -> `Pet.Tag`); well-known types keep the full name.
fn local_name(full_name: &str, package: &str) -> String {
    if package.is_empty() || is_well_known(package) {
        return full_name.to_string();
    }
    full_name
        .strip_prefix(package)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(full_name)
        .to_string()
}

#[derive(Default)]
struct Reflector {
    pending: VecDeque<MessageDescriptor>,
    queued: HashSet<String>,
    pending_enums: Vec<EnumDescriptor>,
}

impl Reflector {
    fn convert_message(&mut self, message: &MessageDescriptor) -> StructDef {
        let fields = message
            .fields()
            .map(|field| FieldDef {
                name: field.name().to_string(),
                json_name: Some(field.json_name().to_string()),
                comment: comment_at(&field.parent_file(), field.path()),
                annotations: options_to_annotations(&field.options()),
                type_ref: self.field_type(&field),
            })
            .collect();

        StructDef {
            name: local_name(message.full_name(), message.package_name()),
            comment: comment_at(&message.parent_file(), message.path()),
            annotations: options_to_annotations(&message.options()),
            fields,
        }
    }

    fn field_type(&mut self, field: &FieldDescriptor) -> TypeRef {
        if field.is_map() {
            if let Kind::Message(entry) = field.kind() {
                let key = self.kind_type(&entry.map_entry_key_field().kind());
                let value = self.kind_type(&entry.map_entry_value_field().kind());
                return TypeRef::map(key, value);
            }
        }

        let element = self.kind_type(&field.kind());
        if field.is_list() {
            TypeRef::list(element)
        } else {
            element
        }
    }

    fn kind_type(&mut self, kind: &Kind) -> TypeRef {
        match kind {
            Kind::Message(message) => self.message_type(message),
            Kind::Enum(enum_desc) => {
                if is_well_known(enum_desc.package_name()) {
                    self.pending_enums.push(enum_desc.clone());
                }
                TypeRef::Enum(local_name(enum_desc.full_name(), enum_desc.package_name()))
            },
            scalar => TypeRef::Scalar(
                TypeMapper::map_protobuf_kind(scalar)
                    .unwrap_or_else(|| ScalarKind::Unknown(format!("{:?}", scalar))),
            ),
        }
    }

    fn message_type(&mut self, message: &MessageDescriptor) -> TypeRef {
        if let Some(scalar) = TypeMapper::map_well_known_message(message.full_name()) {
            return TypeRef::Scalar(scalar);
        }
        if is_well_known(message.package_name())
            && self.queued.insert(message.full_name().to_string())
        {
            self.pending.push_back(message.clone());
        }
        TypeRef::Struct(local_name(message.full_name(), message.package_name()))
    }
}

fn convert_enum(enum_desc: &EnumDescriptor) -> EnumDef {
    EnumDef {
        name: local_name(enum_desc.full_name(), enum_desc.package_name()),
        comment: comment_at(&enum_desc.parent_file(), enum_desc.path()),
        values: enum_desc
            .values()
            .map(|v| EnumValueDef {
                name: v.name().to_string(),
                number: i64::from(v.number()),
            })
            .collect(),
    }
}

/// Leading comment recorded in the source info at `path`
fn comment_at(file: &FileDescriptor, path: &[i32]) -> String {
    file.file_descriptor_proto()
        .source_code_info
        .as_ref()
        .and_then(|info| info.location.iter().find(|loc| loc.path == path))
        .and_then(|loc| {
            loc.leading_comments
                .as_deref()
                .or(loc.trailing_comments.as_deref())
        })
        .map(|c| {
            c.lines()
                .map(str::trim)
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        })
        .unwrap_or_default()
}

/// Lower the custom options set on a declaration into annotations
pub(crate) fn options_to_annotations(options: &DynamicMessage) -> Annotations {
    let mut annotations = Annotations::new();
    for (extension, value) in options.extensions() {
        let key = extension.full_name().to_string();
        insert_option(&mut annotations, &key, value);
    }
    annotations
}

fn insert_option(annotations: &mut Annotations, key: &str, value: &Value) {
    let structured = [
        OPENAPI_OPERATION,
        OPENAPI_PROPERTY,
        OPENAPI_SCHEMA,
        OPENAPI_PARAMETER,
        OPENAPI_DOCUMENT,
    ]
    .contains(&key);

    match value {
        Value::String(s) if structured => annotations.insert_structured(key, s.clone()),
        Value::String(s) => annotations.insert(key, s.clone()),
        Value::List(values) => {
            for v in values {
                insert_option(annotations, key, v);
            }
        },
        Value::Message(message) => match serde_json::to_string(message) {
            Ok(json) => annotations.insert_structured(key, json),
            Err(e) => tracing::warn!(option = key, error = %e, "failed to serialize option"),
        },
        Value::Bool(b) => annotations.insert(key, b.to_string()),
        Value::I32(n) | Value::EnumNumber(n) => annotations.insert(key, n.to_string()),
        Value::I64(n) => annotations.insert(key, n.to_string()),
        Value::U32(n) => annotations.insert(key, n.to_string()),
        Value::U64(n) => annotations.insert(key, n.to_string()),
        Value::F32(n) => annotations.insert(key, n.to_string()),
        Value::F64(n) => annotations.insert(key, n.to_string()),
        Value::Bytes(b) => annotations.insert(key, String::from_utf8_lossy(b).into_owned()),
        Value::Map(_) => tracing::warn!(option = key, "map-valued options are not supported"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("pets.v1.Pet", "pets.v1"), "Pet");
        assert_eq!(local_name("pets.v1.Pet.Tag", "pets.v1"), "Pet.Tag");
        assert_eq!(local_name("Pet", ""), "Pet");
        assert_eq!(
            local_name("google.protobuf.Empty", "google.protobuf"),
            "google.protobuf.Empty"
        );
    }

    #[test]
    fn test_well_known_package() {
        assert!(is_well_known("google.protobuf"));
        assert!(!is_well_known("google.api"));
        assert!(!is_well_known("pets"));
    }
}
