//! OpenAPI document to proto tree conversion

use crate::TypeMapper;
use idlbridge_common::merge::push_unique;
use idlbridge_common::naming::{
    colon_path_params, default_method_name, ref_name, to_pascal_case, to_proto_ident,
    to_upper_snake_case,
};
use idlbridge_common::openapi::{
    AdditionalProperties, Document, Header, HeaderOrRef, Operation, Parameter, ParameterOrRef,
    PathItem, RequestBody, RequestBodyOrRef, Response, ResponseOrRef, Schema, SchemaOrRef,
    COMPONENT_SCHEMA_PREFIX, HTTP_METHODS,
};
use idlbridge_common::proto::{
    OptionValue, ProtoEnum, ProtoEnumValue, ProtoField, ProtoFile, ProtoMessage, ProtoMethod,
    ProtoOption, EMPTY_IMPORT, EMPTY_TYPE,
};
use idlbridge_common::{ConvertError, ProtoConfig, Result, ResultExt};

/// Import declaring the `api.*` route options
pub const API_IMPORT: &str = "api.proto";
/// Import declaring the `openapi.*` options
pub const OPENAPI_IMPORT: &str = "openapi.proto";

const DEFAULT_SERVICE: &str = "DefaultService";
const ROUTED_METHODS: [&str; 5] = ["get", "post", "put", "patch", "delete"];

/// Result of converting one schema
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    /// The schema is expressed by a field of the enclosing message
    Field(ProtoField),
    /// The schema needs a message of its own
    Message(ProtoMessage),
}

/// Converts an OpenAPI document to a [`ProtoFile`]
///
/// One converter owns the file being built for a single run.
///
/// # Example
/// ```rust,ignore
/// let document = OpenApiParser::from_file("petstore.yaml")?.into_document();
/// let file = ProtoConverter::new(&document, ProtoConfig::default()).convert()?;
/// ```
pub struct ProtoConverter<'a> {
    document: &'a Document,
    config: ProtoConfig,
    file: ProtoFile,
}

impl<'a> ProtoConverter<'a> {
    pub fn new(document: &'a Document, config: ProtoConfig) -> Self {
        let file = ProtoFile::new(config.package.clone());
        Self {
            document,
            config,
            file,
        }
    }

    /// Walk components and paths and return the finished file
    pub fn convert(mut self) -> Result<ProtoFile> {
        if self.config.api_options {
            self.file.add_import(API_IMPORT);
        }
        if self.config.openapi_options {
            self.file.add_import(OPENAPI_IMPORT);
        }
        for (name, value) in &self.config.file_options {
            self.file
                .options
                .push(ProtoOption::new(name.clone(), OptionValue::String(value.clone())));
        }

        let document = self.document;
        for (name, schema) in &document.components.schemas {
            self.convert_component(name, schema)
                .with_context(|| format!("schema {}", name))?;
        }

        for (path, item) in &document.paths {
            for method in HTTP_METHODS {
                if let Some(operation) = item.operation(method) {
                    self.convert_operation(path, method, item, operation)
                        .with_context(|| format!("operation {} {}", method.to_uppercase(), path))?;
                }
            }
        }

        tracing::debug!(
            messages = self.file.messages.len(),
            services = self.file.services.len(),
            "converted OpenAPI document to proto"
        );

        Ok(self.file)
    }

    fn convert_component(&mut self, name: &str, schema: &SchemaOrRef) -> Result<()> {
        let type_name = to_proto_ident(name);
        if let Some(values) = schema.as_schema().and_then(string_enum_values) {
            self.file.add_enum(build_enum(&type_name, &values));
            return Ok(());
        }

        match self.convert_schema(schema, &type_name, None)? {
            Converted::Message(message) => self.file.add_message(message),
            Converted::Field(mut field) => {
                // Arrays, scalars and aliases are wrapped so the name stays usable as a type
                field.name = if field.repeated {
                    "items".to_string()
                } else {
                    "value".to_string()
                };
                let mut message = ProtoMessage::new(type_name);
                message.add_field(field);
                self.file.add_message(message);
            },
        }
        Ok(())
    }

    /// Convert one schema under `proposed_name`
    ///
    /// Objects become messages named `proposed_name`; everything else
    /// becomes a field named `proposed_name`. Nested types created along
    /// the way attach to `parent`, or to the file when there is none.
    pub fn convert_schema(
        &mut self,
        schema: &SchemaOrRef,
        proposed_name: &str,
        mut parent: Option<&mut ProtoMessage>,
    ) -> Result<Converted> {
        let schema = match schema {
            SchemaOrRef::Reference { reference } => {
                let target = self.resolve_schema_ref(reference)?;
                return Ok(Converted::Field(ProtoField::new(proposed_name, target)));
            },
            SchemaOrRef::Schema(schema) => schema,
        };

        let schema_type = schema.schema_type.as_deref().ok_or_else(|| {
            ConvertError::Conversion(format!("schema type is required for '{}'", proposed_name))
        })?;

        match schema_type {
            "object" => self.convert_object(schema, proposed_name).map(Converted::Message),
            "array" => {
                let items = schema.items.as_deref().ok_or_else(|| {
                    ConvertError::Conversion(format!(
                        "array schema '{}' has no items",
                        proposed_name
                    ))
                })?;
                let item_name = to_pascal_case(&format!("{}Item", proposed_name));
                let element_type =
                    match self.convert_schema(items, &item_name, parent.as_deref_mut())? {
                        Converted::Field(field) => {
                            if field.repeated {
                                tracing::warn!(
                                    field = proposed_name,
                                    "nested arrays are flattened to a single repeated field"
                                );
                            }
                            field.field_type
                        },
                        Converted::Message(message) => {
                            let name = message.name.clone();
                            self.attach_message(message, parent);
                            name
                        },
                    };
                Ok(Converted::Field(ProtoField::repeated(
                    proposed_name,
                    element_type,
                )))
            },
            scalar_type => {
                if let Some(values) = string_enum_values(schema) {
                    let enum_name = nested_type_name(proposed_name, "Enum");
                    let proto_enum = build_enum(&enum_name, &values);
                    match parent {
                        Some(parent) => parent.add_enum(proto_enum),
                        None => self.file.add_enum(proto_enum),
                    }
                    return Ok(Converted::Field(ProtoField::new(proposed_name, enum_name)));
                }

                let scalar = TypeMapper::openapi_to_proto(scalar_type, schema.format.as_deref())
                    .ok_or_else(|| {
                        ConvertError::Conversion(format!(
                            "unsupported schema type '{}' for '{}'",
                            scalar_type, proposed_name
                        ))
                    })?;
                if let Some(import) = scalar.import {
                    self.file.add_import(import);
                }
                Ok(Converted::Field(ProtoField::new(
                    proposed_name,
                    scalar.type_name,
                )))
            },
        }
    }

    fn convert_object(&mut self, schema: &Schema, name: &str) -> Result<ProtoMessage> {
        let mut message = ProtoMessage::new(name);

        for (property, property_schema) in &schema.properties {
            self.convert_property(property_schema, property, &mut message)
                .with_context(|| format!("property {}", property))?;
        }

        if let Some(additional) = &schema.additional_properties {
            let value_type = match additional {
                AdditionalProperties::Schema(value_schema) => {
                    let value_name = nested_type_name("additionalProperties", "Value");
                    match self.convert_schema(value_schema, &value_name, Some(&mut message)) {
                        Ok(Converted::Field(field)) if !field.repeated => field.field_type,
                        Ok(Converted::Message(mut nested)) => {
                            nested.name = to_pascal_case(&format!("{}Value", name));
                            let nested_name = nested.name.clone();
                            message.add_nested(nested);
                            nested_name
                        },
                        Ok(Converted::Field(_)) => "string".to_string(),
                        Err(e) => {
                            tracing::warn!(schema = name, error = %e, "unresolvable additionalProperties, using string");
                            "string".to_string()
                        },
                    }
                },
                AdditionalProperties::Bool(_) => "string".to_string(),
            };
            message.add_field(ProtoField::new(
                "additionalProperties",
                format!("map<string, {}>", value_type),
            ));
        }

        Ok(message)
    }

    /// Convert a property, parameter or header into a field of `message`
    fn convert_property(
        &mut self,
        schema: &SchemaOrRef,
        name: &str,
        message: &mut ProtoMessage,
    ) -> Result<()> {
        let field_name = to_proto_ident(name);
        let is_inline_object = schema.as_schema().is_some_and(|s| s.is_type("object"));

        if is_inline_object {
            let type_name = nested_type_name(&field_name, "Message");
            if let Converted::Message(nested) = self.convert_schema(schema, &type_name, None)? {
                message.add_nested(nested);
            }
            message.add_field(ProtoField::new(field_name, type_name));
            return Ok(());
        }

        match self.convert_schema(schema, &field_name, Some(message))? {
            Converted::Field(field) => message.add_field(field),
            Converted::Message(nested) => {
                let type_name = nested.name.clone();
                message.add_nested(nested);
                message.add_field(ProtoField::new(field_name, type_name));
            },
        }
        Ok(())
    }

    fn attach_message(&mut self, message: ProtoMessage, parent: Option<&mut ProtoMessage>) {
        match parent {
            Some(parent) => parent.add_nested(message),
            None => self.file.add_message(message),
        }
    }

    fn convert_operation(
        &mut self,
        path: &str,
        method: &str,
        item: &PathItem,
        operation: &Operation,
    ) -> Result<()> {
        let service_name = operation
            .tags
            .first()
            .map(|tag| to_proto_ident(tag))
            .unwrap_or_else(|| DEFAULT_SERVICE.to_string());
        let method_name = operation
            .operation_id
            .as_deref()
            .map(to_proto_ident)
            .unwrap_or_else(|| default_method_name(method));

        let input_type = self.convert_request(operation, item, &method_name)?;
        let output_type = self.convert_responses(operation, &method_name)?;

        let mut options = Vec::new();
        if self.config.api_options && ROUTED_METHODS.contains(&method) {
            options.push(ProtoOption::new(
                format!("api.{}", method),
                OptionValue::String(colon_path_params(path)),
            ));
        }
        if self.config.openapi_options {
            let value = serde_json::to_value(operation)?;
            options.push(ProtoOption::new(
                "openapi.operation",
                OptionValue::from_json(&value),
            ));
        }

        let added = self.file.service_mut(&service_name).add_method(ProtoMethod {
            name: method_name.clone(),
            input_type,
            output_type,
            options,
        });
        if !added {
            tracing::debug!(
                service = %service_name,
                method = %method_name,
                "duplicate method name, keeping the first"
            );
        }
        Ok(())
    }

    /// Build `<op>Request`, or return the empty type when there is nothing to carry
    fn convert_request(
        &mut self,
        operation: &Operation,
        item: &PathItem,
        method_name: &str,
    ) -> Result<String> {
        let mut parameters: Vec<Parameter> = Vec::new();
        for parameter in operation.parameters.iter().chain(item.parameters.iter()) {
            let parameter = self.resolve_parameter(parameter)?;
            // Operation-level parameters come first and win
            push_unique(&mut parameters, parameter, |p| (p.name.clone(), p.location.clone()));
        }
        let body = operation
            .request_body
            .as_ref()
            .map(|body| self.resolve_request_body(body))
            .transpose()?;

        if parameters.is_empty() && body.is_none() {
            return Ok(self.empty_type());
        }

        let request_name = format!("{}Request", method_name);
        let mut message = ProtoMessage::new(&request_name);

        for parameter in &parameters {
            match &parameter.schema {
                Some(schema) => self
                    .convert_property(schema, &parameter.name, &mut message)
                    .with_context(|| format!("parameter {}", parameter.name))?,
                None => message.add_field(ProtoField::new(to_proto_ident(&parameter.name), "string")),
            }
        }

        if let Some(body) = &body {
            for (media_type, media) in &body.content {
                if let Some(schema) = &media.schema {
                    let body_name = to_pascal_case(&format!("{}{}", request_name, media_type));
                    self.merge_body(schema, &body_name, &mut message)
                        .with_context(|| format!("request body {}", media_type))?;
                }
            }
        }

        let name = self.finish_message(message);
        Ok(if name.is_empty() {
            self.empty_type()
        } else {
            name
        })
    }

    fn convert_responses(&mut self, operation: &Operation, method_name: &str) -> Result<String> {
        let mut responses: Vec<(&String, Response)> = Vec::new();
        for (code, response) in &operation.responses {
            responses.push((code, self.resolve_response(response)?));
        }

        if let [(code, response)] = responses.as_slice() {
            if is_content_less(response) {
                return Ok(self.empty_type());
            }
            let name = format!("{}Response_{}", method_name, status_suffix(code));
            let message = self
                .response_message(&name, response)
                .with_context(|| format!("response {}", code))?;
            let name = self.finish_message(message);
            return Ok(if name.is_empty() {
                self.empty_type()
            } else {
                name
            });
        }

        let mut wrapper = ProtoMessage::new(method_name);
        for (code, response) in &responses {
            if is_content_less(response) {
                continue;
            }
            let code = status_suffix(code);
            let name = format!("{}Response_{}", method_name, code);
            let message = self
                .response_message(&name, response)
                .with_context(|| format!("response {}", code))?;
            let name = self.finish_message(message);
            if !name.is_empty() {
                wrapper.add_field(ProtoField::new(format!("response_{}", code), name));
            }
        }

        let name = self.finish_message(wrapper);
        Ok(if name.is_empty() {
            self.empty_type()
        } else {
            name
        })
    }

    fn response_message(&mut self, name: &str, response: &Response) -> Result<ProtoMessage> {
        let mut message = ProtoMessage::new(name);

        for (header_name, header) in &response.headers {
            let header = self.resolve_header(header)?;
            match &header.schema {
                Some(schema) => self
                    .convert_property(schema, header_name, &mut message)
                    .with_context(|| format!("header {}", header_name))?,
                None => message.add_field(ProtoField::new(to_proto_ident(header_name), "string")),
            }
        }

        for (media_type, media) in &response.content {
            if let Some(schema) = &media.schema {
                let body_name = to_pascal_case(&format!("{}{}", name, media_type));
                self.merge_body(schema, &body_name, &mut message)
                    .with_context(|| format!("content {}", media_type))?;
            }
        }

        Ok(message)
    }

    /// Fold a body schema into `message`
    ///
    /// Inline objects contribute their fields directly; references and
    /// other schemas become a `body` field.
    fn merge_body(
        &mut self,
        schema: &SchemaOrRef,
        body_name: &str,
        message: &mut ProtoMessage,
    ) -> Result<()> {
        if schema.as_schema().is_some_and(|s| s.is_type("object")) {
            if let Converted::Message(mut body) = self.convert_schema(schema, body_name, None)? {
                body.name = message.name.clone();
                message.merge(body);
            }
            return Ok(());
        }
        self.convert_property(schema, "body", message)
    }

    /// Register `message` and return its name, or `""` when it has no fields
    fn finish_message(&mut self, message: ProtoMessage) -> String {
        if message.is_empty() {
            return String::new();
        }
        let name = message.name.clone();
        self.file.add_message(message);
        name
    }

    fn empty_type(&mut self) -> String {
        self.file.add_import(EMPTY_IMPORT);
        EMPTY_TYPE.to_string()
    }

    fn resolve_schema_ref(&self, reference: &str) -> Result<String> {
        if let Some(name) = reference.strip_prefix(COMPONENT_SCHEMA_PREFIX) {
            if !self.document.components.schemas.contains_key(name) {
                return Err(ConvertError::UnresolvedRef(reference.to_string()));
            }
        }
        Ok(to_proto_ident(ref_name(reference)))
    }

    fn resolve_parameter(&self, parameter: &ParameterOrRef) -> Result<Parameter> {
        match parameter {
            ParameterOrRef::Parameter(parameter) => Ok((**parameter).clone()),
            ParameterOrRef::Reference { reference } => {
                match self.document.components.parameters.get(ref_name(reference)) {
                    Some(ParameterOrRef::Parameter(parameter)) => Ok((**parameter).clone()),
                    _ => Err(ConvertError::UnresolvedRef(reference.clone())),
                }
            },
        }
    }

    fn resolve_request_body(&self, body: &RequestBodyOrRef) -> Result<RequestBody> {
        match body {
            RequestBodyOrRef::RequestBody(body) => Ok((**body).clone()),
            RequestBodyOrRef::Reference { reference } => {
                match self.document.components.request_bodies.get(ref_name(reference)) {
                    Some(RequestBodyOrRef::RequestBody(body)) => Ok((**body).clone()),
                    _ => Err(ConvertError::UnresolvedRef(reference.clone())),
                }
            },
        }
    }

    fn resolve_response(&self, response: &ResponseOrRef) -> Result<Response> {
        match response {
            ResponseOrRef::Response(response) => Ok((**response).clone()),
            ResponseOrRef::Reference { reference } => {
                match self.document.components.responses.get(ref_name(reference)) {
                    Some(ResponseOrRef::Response(response)) => Ok((**response).clone()),
                    _ => Err(ConvertError::UnresolvedRef(reference.clone())),
                }
            },
        }
    }

    fn resolve_header(&self, header: &HeaderOrRef) -> Result<Header> {
        match header {
            HeaderOrRef::Header(header) => Ok((**header).clone()),
            HeaderOrRef::Reference { reference } => {
                match self.document.components.headers.get(ref_name(reference)) {
                    Some(HeaderOrRef::Header(header)) => Ok((**header).clone()),
                    _ => Err(ConvertError::UnresolvedRef(reference.clone())),
                }
            },
        }
    }
}

/// Status code as it appears in generated names (`2XX`, `default`)
fn status_suffix(code: &str) -> String {
    code.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Headers alone never make a response worth a message
fn is_content_less(response: &Response) -> bool {
    response.content.is_empty()
}

/// Type name for a nested message or enum declared for field `field`
///
/// The PascalCase form of the field name, suffixed when that would equal
/// the field name itself.
fn nested_type_name(field: &str, suffix: &str) -> String {
    let pascal = to_pascal_case(field);
    if pascal == field || pascal.is_empty() {
        format!("{}{}", pascal, suffix)
    } else {
        pascal
    }
}

fn string_enum_values(schema: &Schema) -> Option<Vec<String>> {
    if !schema.is_type("string") || schema.enum_values.is_empty() {
        return None;
    }
    let values: Vec<String> = schema
        .enum_values
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    (!values.is_empty()).then_some(values)
}

/// proto3 enum with a zero `<NAME>_UNSPECIFIED` value first
fn build_enum(name: &str, values: &[String]) -> ProtoEnum {
    let prefix = to_upper_snake_case(name);
    let mut proto_values = vec![ProtoEnumValue {
        name: format!("{}_UNSPECIFIED", prefix),
        number: 0,
    }];
    let mut number = 1;
    for value in values {
        let value_name = to_proto_ident(&format!("{}_{}", prefix, to_upper_snake_case(value)));
        if push_unique(
            &mut proto_values,
            ProtoEnumValue {
                name: value_name,
                number,
            },
            |v| v.name.clone(),
        ) {
            number += 1;
        }
    }
    ProtoEnum {
        name: name.to_string(),
        values: proto_values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: serde_json::Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    fn convert(value: serde_json::Value) -> Result<ProtoFile> {
        let document = document(value);
        ProtoConverter::new(&document, ProtoConfig::default()).convert()
    }

    #[test]
    fn test_object_with_array_and_scalar() {
        let file = convert(json!({
            "openapi": "3.0.3",
            "info": {"title": "t", "version": "1"},
            "components": {"schemas": {
                "Shape": {"type": "object", "properties": {
                    "a": {"type": "string"},
                    "b": {"type": "array", "items": {"type": "integer", "format": "int32"}}
                }}
            }}
        }))
        .unwrap();

        let shape = file.find_message("Shape").unwrap();
        assert_eq!(shape.find_field("a").unwrap(), &ProtoField::new("a", "string"));
        assert_eq!(shape.find_field("b").unwrap(), &ProtoField::repeated("b", "int32"));
    }

    #[test]
    fn test_nested_object_gets_pascal_type() {
        let file = convert(json!({
            "openapi": "3.0.3",
            "info": {"title": "t", "version": "1"},
            "components": {"schemas": {
                "Pet": {"type": "object", "properties": {
                    "owner": {"type": "object", "properties": {"name": {"type": "string"}}},
                    "tags": {"type": "array", "items": {
                        "type": "object", "properties": {"label": {"type": "string"}}
                    }}
                }}
            }}
        }))
        .unwrap();

        let pet = file.find_message("Pet").unwrap();
        assert_eq!(pet.find_field("owner").unwrap().field_type, "Owner");
        assert!(pet.find_nested("Owner").unwrap().find_field("name").is_some());
        assert_eq!(pet.find_field("tags").unwrap(), &ProtoField::repeated("tags", "TagsItem"));
        assert!(pet.find_nested("TagsItem").is_some());
    }

    #[test]
    fn test_additional_properties() {
        let file = convert(json!({
            "openapi": "3.0.3",
            "info": {"title": "t", "version": "1"},
            "components": {"schemas": {
                "Counts": {"type": "object", "additionalProperties": {"type": "integer"}},
                "Loose": {"type": "object", "additionalProperties": true}
            }}
        }))
        .unwrap();

        assert_eq!(
            file.find_message("Counts").unwrap().fields[0].field_type,
            "map<string, int64>"
        );
        assert_eq!(
            file.find_message("Loose").unwrap().fields[0].field_type,
            "map<string, string>"
        );
    }

    #[test]
    fn test_string_enum_component() {
        let file = convert(json!({
            "openapi": "3.0.3",
            "info": {"title": "t", "version": "1"},
            "components": {"schemas": {
                "PetStatus": {"type": "string", "enum": ["available", "sold"]}
            }}
        }))
        .unwrap();

        let status = &file.enums[0];
        assert_eq!(status.name, "PetStatus");
        let names: Vec<_> = status.values.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["PET_STATUS_UNSPECIFIED", "PET_STATUS_AVAILABLE", "PET_STATUS_SOLD"]
        );
    }

    #[test]
    fn test_missing_type_is_error() {
        let err = convert(json!({
            "openapi": "3.0.3",
            "info": {"title": "t", "version": "1"},
            "components": {"schemas": {"Broken": {"description": "no type"}}}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("schema Broken"));
        assert!(err.to_string().contains("schema type is required"));
    }

    #[test]
    fn test_unresolved_ref_is_error() {
        let err = convert(json!({
            "openapi": "3.0.3",
            "info": {"title": "t", "version": "1"},
            "components": {"schemas": {
                "Pet": {"type": "object", "properties": {
                    "owner": {"$ref": "#/components/schemas/Owner"}
                }}
            }}
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Context { .. }
        ));
        assert!(err.to_string().contains("#/components/schemas/Owner"));
    }

    #[test]
    fn test_array_without_items_is_error() {
        assert!(convert(json!({
            "openapi": "3.0.3",
            "info": {"title": "t", "version": "1"},
            "components": {"schemas": {"List": {"type": "array"}}}
        }))
        .is_err());
    }

    #[test]
    fn test_multiple_responses_wrapper() {
        let file = convert(json!({
            "openapi": "3.0.3",
            "info": {"title": "t", "version": "1"},
            "paths": {"/pets/{id}": {"get": {
                "operationId": "getPet",
                "tags": ["PetService"],
                "parameters": [{"name": "id", "in": "path", "required": true,
                                "schema": {"type": "integer"}}],
                "responses": {
                    "200": {"description": "ok", "content": {"application/json": {
                        "schema": {"type": "object", "properties": {"name": {"type": "string"}}}
                    }}},
                    "404": {"description": "missing"},
                    "500": {"description": "error", "content": {"application/json": {
                        "schema": {"type": "object", "properties": {"message": {"type": "string"}}}
                    }}}
                }
            }}}
        }))
        .unwrap();

        let method = file.find_service("PetService").unwrap().find_method("getPet").unwrap();
        assert_eq!(method.input_type, "getPetRequest");
        assert_eq!(method.output_type, "getPet");
        assert_eq!(
            method.options,
            vec![ProtoOption::new("api.get", OptionValue::String("/pets/:id".into()))]
        );

        let wrapper = file.find_message("getPet").unwrap();
        let fields: Vec<_> = wrapper.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["response_200", "response_500"]);
        assert!(file.find_message("getPetResponse_200").unwrap().find_field("name").is_some());
    }

    #[test]
    fn test_headers_only_response_is_empty() {
        let file = convert(json!({
            "openapi": "3.0.3",
            "info": {"title": "t", "version": "1"},
            "paths": {"/ping": {"get": {
                "operationId": "ping",
                "responses": {"200": {
                    "description": "ok",
                    "headers": {"X-Rate": {"schema": {"type": "integer"}}}
                }}
            }}}
        }))
        .unwrap();

        let method = file.find_service("DefaultService").unwrap().find_method("ping").unwrap();
        assert_eq!(method.output_type, EMPTY_TYPE);
        assert!(file.find_message("pingResponse_200").is_none());
        assert!(file.imports.contains(&EMPTY_IMPORT.to_string()));
    }

    #[test]
    fn test_default_service_and_method_names() {
        let file = convert(json!({
            "openapi": "3.0.3",
            "info": {"title": "t", "version": "1"},
            "paths": {"/health": {"head": {"responses": {"200": {"description": "ok"}}}}}
        }))
        .unwrap();

        let method = file.find_service("DefaultService").unwrap().find_method("HeadMethod").unwrap();
        assert_eq!(method.input_type, EMPTY_TYPE);
        assert_eq!(method.output_type, EMPTY_TYPE);
        assert!(method.options.is_empty());
    }

    #[test]
    fn test_ref_request_body_becomes_body_field() {
        let file = convert(json!({
            "openapi": "3.0.3",
            "info": {"title": "t", "version": "1"},
            "paths": {"/pets": {"post": {
                "operationId": "createPet",
                "requestBody": {"$ref": "#/components/requestBodies/PetBody"},
                "responses": {"201": {"description": "created"}}
            }}},
            "components": {
                "schemas": {"Pet": {"type": "object", "properties": {"name": {"type": "string"}}}},
                "requestBodies": {"PetBody": {"content": {"application/json": {
                    "schema": {"$ref": "#/components/schemas/Pet"}
                }}}}
            }
        }))
        .unwrap();

        let request = file.find_message("createPetRequest").unwrap();
        assert_eq!(request.fields, vec![ProtoField::new("body", "Pet")]);
    }

    #[test]
    fn test_nested_type_name() {
        assert_eq!(nested_type_name("owner", "Message"), "Owner");
        assert_eq!(nested_type_name("Owner", "Message"), "OwnerMessage");
    }
}
