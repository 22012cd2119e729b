//! Protobuf intermediate tree
//!
//! Built incrementally by the OpenAPI converter and rendered by the proto3
//! encoder. Message names are unique per file; see
//! [`ProtoFile::add_message`] for the merge rule.

use crate::merge::{merge_by_key, push_unique};
use serde::{Deserialize, Serialize};

/// Well-known type substituted for messages without fields
pub const EMPTY_TYPE: &str = "google.protobuf.Empty";
pub const EMPTY_IMPORT: &str = "google/protobuf/empty.proto";
pub const TIMESTAMP_TYPE: &str = "google.protobuf.Timestamp";
pub const TIMESTAMP_IMPORT: &str = "google/protobuf/timestamp.proto";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtoFile {
    pub package: String,
    pub imports: Vec<String>,
    /// File-level options such as `go_package`
    pub options: Vec<ProtoOption>,
    pub messages: Vec<ProtoMessage>,
    pub enums: Vec<ProtoEnum>,
    pub services: Vec<ProtoService>,
}

impl ProtoFile {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Default::default()
        }
    }

    /// Register an import once
    pub fn add_import(&mut self, import: impl Into<String>) {
        push_unique(&mut self.imports, import.into(), |i| i.clone());
    }

    /// Add a top-level message, unioning it into an existing one of the same name
    pub fn add_message(&mut self, message: ProtoMessage) {
        match self.messages.iter_mut().find(|m| m.name == message.name) {
            Some(existing) => existing.merge(message),
            None => self.messages.push(message),
        }
    }

    pub fn add_enum(&mut self, proto_enum: ProtoEnum) {
        push_unique(&mut self.enums, proto_enum, |e| e.name.clone());
    }

    pub fn find_message(&self, name: &str) -> Option<&ProtoMessage> {
        self.messages.iter().find(|m| m.name == name)
    }

    pub fn find_service(&self, name: &str) -> Option<&ProtoService> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Find a service by name or append an empty one
    pub fn service_mut(&mut self, name: &str) -> &mut ProtoService {
        let index = match self.services.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.services.push(ProtoService::new(name));
                self.services.len() - 1
            },
        };
        &mut self.services[index]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtoMessage {
    pub name: String,
    pub fields: Vec<ProtoField>,
    /// Nested messages
    pub messages: Vec<ProtoMessage>,
    pub enums: Vec<ProtoEnum>,
    pub oneofs: Vec<ProtoOneof>,
    pub options: Vec<ProtoOption>,
}

impl ProtoMessage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.messages.is_empty() && self.oneofs.is_empty()
    }

    pub fn add_field(&mut self, field: ProtoField) {
        push_unique(&mut self.fields, field, |f| f.name.clone());
    }

    pub fn add_nested(&mut self, message: ProtoMessage) {
        push_unique(&mut self.messages, message, |m| m.name.clone());
    }

    pub fn add_enum(&mut self, proto_enum: ProtoEnum) {
        push_unique(&mut self.enums, proto_enum, |e| e.name.clone());
    }

    /// Union `other` into `self`; entries already present win
    pub fn merge(&mut self, other: ProtoMessage) {
        merge_by_key(&mut self.fields, other.fields, |f| f.name.clone());
        merge_by_key(&mut self.messages, other.messages, |m| m.name.clone());
        merge_by_key(&mut self.enums, other.enums, |e| e.name.clone());
        merge_by_key(&mut self.oneofs, other.oneofs, |o| o.name.clone());
        merge_by_key(&mut self.options, other.options, |o| o.name.clone());
    }

    pub fn find_field(&self, name: &str) -> Option<&ProtoField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn find_nested(&self, name: &str) -> Option<&ProtoMessage> {
        self.messages.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtoField {
    pub name: String,
    /// Scalar keyword, message name, or `map<K, V>`
    pub field_type: String,
    pub repeated: bool,
    pub options: Vec<ProtoOption>,
}

impl ProtoField {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            repeated: false,
            options: Vec::new(),
        }
    }

    pub fn repeated(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            repeated: true,
            ..Self::new(name, field_type)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtoOneof {
    pub name: String,
    pub fields: Vec<ProtoField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtoEnum {
    pub name: String,
    pub values: Vec<ProtoEnumValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtoEnumValue {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtoService {
    pub name: String,
    pub methods: Vec<ProtoMethod>,
    pub options: Vec<ProtoOption>,
}

impl ProtoService {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a method unless one with the same name exists
    ///
    /// Returns `false` when the method was a duplicate.
    pub fn add_method(&mut self, method: ProtoMethod) -> bool {
        push_unique(&mut self.methods, method, |m| m.name.clone())
    }

    pub fn find_method(&self, name: &str) -> Option<&ProtoMethod> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtoMethod {
    pub name: String,
    pub input_type: String,
    pub output_type: String,
    pub options: Vec<ProtoOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtoOption {
    pub name: String,
    pub value: OptionValue,
}

impl ProtoOption {
    pub fn new(name: impl Into<String>, value: OptionValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Option value as it appears in proto text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Enum constant or other bare identifier
    Ident(String),
    List(Vec<OptionValue>),
    /// Message literal with ordered fields
    Message(Vec<(String, OptionValue)>),
}

impl OptionValue {
    /// Build an option value from arbitrary JSON
    ///
    /// Nulls are dropped from messages and lists; a top-level null becomes
    /// an empty message.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => OptionValue::Message(Vec::new()),
            Value::Bool(b) => OptionValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => OptionValue::Integer(i),
                None => OptionValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => OptionValue::String(s.clone()),
            Value::Array(items) => OptionValue::List(
                items
                    .iter()
                    .filter(|v| !v.is_null())
                    .map(OptionValue::from_json)
                    .collect(),
            ),
            Value::Object(map) => OptionValue::Message(
                map.iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(k, v)| (k.clone(), OptionValue::from_json(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_message_unions_fields() {
        let mut file = ProtoFile::new("petstore");

        let mut first = ProtoMessage::new("Pet");
        first.add_field(ProtoField::new("id", "int64"));
        first.add_field(ProtoField::new("name", "string"));
        file.add_message(first);

        let mut second = ProtoMessage::new("Pet");
        second.add_field(ProtoField::new("name", "bytes"));
        second.add_field(ProtoField::new("tag", "string"));
        file.add_message(second);

        assert_eq!(file.messages.len(), 1);
        let pet = file.find_message("Pet").unwrap();
        let names: Vec<_> = pet.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "tag"]);
        // first-seen field wins
        assert_eq!(pet.find_field("name").unwrap().field_type, "string");
    }

    #[test]
    fn test_add_import_once() {
        let mut file = ProtoFile::new("p");
        file.add_import(EMPTY_IMPORT);
        file.add_import(EMPTY_IMPORT);
        assert_eq!(file.imports, vec![EMPTY_IMPORT.to_string()]);
    }

    #[test]
    fn test_service_mut_and_duplicate_method() {
        let mut file = ProtoFile::new("p");
        let method = ProtoMethod {
            name: "ListPets".to_string(),
            input_type: EMPTY_TYPE.to_string(),
            output_type: "ListPetsResponse_200".to_string(),
            options: vec![],
        };
        assert!(file.service_mut("PetService").add_method(method.clone()));
        assert!(!file.service_mut("PetService").add_method(method));
        assert_eq!(file.services.len(), 1);
        assert_eq!(file.services[0].methods.len(), 1);
    }

    #[test]
    fn test_option_value_from_json() {
        let value = OptionValue::from_json(&json!({
            "summary": "List pets",
            "deprecated": false,
            "tags": ["pets", null],
            "limit": 10,
            "ratio": 0.5,
            "extra": null
        }));

        // serde_json objects iterate in key order
        assert_eq!(
            value,
            OptionValue::Message(vec![
                ("deprecated".to_string(), OptionValue::Bool(false)),
                ("limit".to_string(), OptionValue::Integer(10)),
                ("ratio".to_string(), OptionValue::Float(0.5)),
                ("summary".to_string(), OptionValue::String("List pets".to_string())),
                (
                    "tags".to_string(),
                    OptionValue::List(vec![OptionValue::String("pets".to_string())])
                ),
            ])
        );
    }
}
