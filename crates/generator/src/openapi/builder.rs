//! IDL model to OpenAPI document conversion

use crate::TypeMapper;
use idlbridge_common::annotations::{
    API_BASE_DOMAIN, API_BASE_URL, API_BODY, API_COOKIE, API_FORM, API_HEADER, API_PATH,
    API_QUERY, API_RAW_BODY, HTTP_METHOD_ANNOTATIONS, OPENAPI_DOCUMENT, OPENAPI_OPERATION,
    OPENAPI_PARAMETER, OPENAPI_PROPERTY, OPENAPI_SCHEMA,
};
use idlbridge_common::merge::overlay;
use idlbridge_common::naming::brace_path_params;
use idlbridge_common::openapi::{
    AdditionalProperties, Document, Header, HeaderOrRef, Info, MediaType, Operation, Parameter,
    ParameterOrRef, RequestBody, RequestBodyOrRef, Response, ResponseOrRef, Schema, SchemaOrRef,
    Server, Tag, OPENAPI_VERSION,
};
use idlbridge_common::{
    Annotations, ConvertError, EnumStyle, FieldDef, GenerationMode, IdlFile, MethodDef,
    NamingStyle, OpenApiConfig, Result, ResultExt, ServiceDef, StructDef, TypeRef,
};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

const JSON_MEDIA_TYPE: &str = "application/json";
const MULTIPART_MEDIA_TYPE: &str = "multipart/form-data";
const URLENCODED_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";
const TEXT_MEDIA_TYPE: &str = "text/plain";
const DEFAULT_RESPONSE_DESCRIPTION: &str = "Successful response";
const RPC_METAINFO_PARAMETER: &str = "ttheader";

/// Parameter annotations in precedence order; a later match wins
const PARAMETER_LOCATIONS: [(&str, &str); 4] = [
    (API_QUERY, "query"),
    (API_PATH, "path"),
    (API_COOKIE, "cookie"),
    (API_HEADER, "header"),
];

/// Builds an OpenAPI document from an [`IdlFile`]
///
/// Structs are expanded lazily: a struct becomes a component schema only
/// once something refers to it, and each struct is expanded at most once.
///
/// # Example
/// ```rust,ignore
/// let idl = ThriftParser::from_file("pet.thrift")?.parse()?;
/// let document = OpenApiBuilder::new(&idl, &OpenApiConfig::default()).build()?;
/// ```
pub struct OpenApiBuilder<'a> {
    idl: &'a IdlFile,
    config: &'a OpenApiConfig,
    document: Document,
    /// Structs waiting to be expanded, in discovery order
    pending: VecDeque<String>,
    /// Structs already queued or expanded
    generated: HashSet<String>,
}

impl<'a> OpenApiBuilder<'a> {
    pub fn new(idl: &'a IdlFile, config: &'a OpenApiConfig) -> Self {
        let document = Document {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                title: config.title.clone().unwrap_or_default(),
                description: config.description.clone(),
                version: config.version.clone(),
            },
            ..Default::default()
        };
        Self {
            idl,
            config,
            document,
            pending: VecDeque::new(),
            generated: HashSet::new(),
        }
    }

    /// Convert every service and the structs they reach
    pub fn build(mut self) -> Result<Document> {
        let idl = self.idl;
        self.apply_document_overlay();
        for service in &idl.services {
            self.add_service(service)
                .with_context(|| format!("service {}", service.name))?;
        }
        self.expand_pending()?;

        super::postprocess::postprocess(&mut self.document, &self.config.default_server);
        if self.document.info.title.is_empty() {
            self.document.info.title = format!("{} API", idl.name);
        }

        tracing::debug!(
            paths = self.document.paths.len(),
            schemas = self.document.components.schemas.len(),
            "built OpenAPI document"
        );

        Ok(self.document)
    }

    fn add_service(&mut self, service: &ServiceDef) -> Result<()> {
        let mut added = 0;
        for method in &service.methods {
            let operations = match self.config.mode {
                GenerationMode::Http => self.http_operations(service, method),
                GenerationMode::Rpc => self.rpc_operation(service, method).map(|op| vec![op]),
            }
            .with_context(|| format!("method {}", method.name))?;

            for (path, http_method, operation) in operations {
                let item = self.document.paths.entry(path.clone()).or_default();
                if item.operation(http_method).is_some() {
                    tracing::warn!(path = %path, method = http_method, "route declared twice, keeping the last");
                }
                item.set_operation(http_method, operation);
                added += 1;
            }
        }

        if added > 0 {
            self.document.tags.push(Tag {
                name: service.name.clone(),
                description: non_empty(&service.comment),
            });
        }
        Ok(())
    }

    /// Routes declared by `api.<method>` annotations
    fn http_operations(
        &mut self,
        service: &ServiceDef,
        method: &MethodDef,
    ) -> Result<Vec<(String, &'static str, Operation)>> {
        let mut operations = Vec::new();
        for (key, http_method) in HTTP_METHOD_ANNOTATIONS {
            let Some(route) = method.annotations.first(key) else {
                continue;
            };
            if http_method == "any" {
                tracing::warn!(
                    method = %method.name,
                    "api.any has no OpenAPI equivalent, skipping route"
                );
                continue;
            }
            let operation = self.http_operation(service, method, http_method)?;
            operations.push((brace_path_params(route), http_method, operation));
        }
        Ok(operations)
    }

    fn http_operation(
        &mut self,
        service: &ServiceDef,
        method: &MethodDef,
        http_method: &str,
    ) -> Result<Operation> {
        let mut operation = self.base_operation(service, method);
        let input = self.input_struct(method)?;
        let output = self.output_struct(method)?;

        if let Some(input) = input {
            for field in &input.fields {
                if let Some(parameter) = self.field_parameter(field) {
                    operation
                        .parameters
                        .push(ParameterOrRef::Parameter(Box::new(parameter)));
                }
            }

            if !matches!(http_method, "get" | "head" | "delete") {
                let mut content = IndexMap::new();
                if let Some(schema) = self.schema_by_option(input, API_BODY) {
                    content.insert(JSON_MEDIA_TYPE.to_string(), MediaType::with_schema(schema.into()));
                }
                if let Some(schema) = self.schema_by_option(input, API_FORM) {
                    content.insert(
                        MULTIPART_MEDIA_TYPE.to_string(),
                        MediaType::with_schema(schema.clone().into()),
                    );
                    content.insert(URLENCODED_MEDIA_TYPE.to_string(), MediaType::with_schema(schema.into()));
                }
                if let Some(schema) = self.schema_by_option(input, API_RAW_BODY) {
                    content.insert(TEXT_MEDIA_TYPE.to_string(), MediaType::with_schema(schema.into()));
                }
                if !content.is_empty() {
                    operation.request_body = Some(RequestBodyOrRef::RequestBody(Box::new(RequestBody {
                        description: non_empty(&input.comment),
                        content,
                        required: false,
                    })));
                }
            }
        }

        if let Some(output) = output {
            let mut headers = IndexMap::new();
            for field in &output.fields {
                let Some(name) = field.annotations.first_non_empty(API_HEADER) else {
                    continue;
                };
                let name = name.to_string();
                let schema = self.field_schema(field);
                headers.insert(
                    name,
                    HeaderOrRef::Header(Box::new(Header {
                        description: non_empty(&field.comment),
                        required: false,
                        schema: Some(schema),
                    })),
                );
            }

            let mut content = IndexMap::new();
            if let Some(schema) = self.schema_by_option(output, API_BODY) {
                let name = format!("{}Body", output.name);
                self.add_component(&name, schema.into());
                content.insert(
                    JSON_MEDIA_TYPE.to_string(),
                    MediaType::with_schema(SchemaOrRef::component(&name)),
                );
            }
            if let Some(schema) = self.schema_by_option(output, API_RAW_BODY) {
                let name = format!("{}RawBody", output.name);
                self.add_component(&name, schema.into());
                content.insert(
                    TEXT_MEDIA_TYPE.to_string(),
                    MediaType::with_schema(SchemaOrRef::component(&name)),
                );
            }

            if !headers.is_empty() || !content.is_empty() {
                operation.responses.insert(
                    "200".to_string(),
                    ResponseOrRef::Response(Box::new(Response {
                        description: response_description(output),
                        headers,
                        content,
                    })),
                );
            }
        }

        Ok(apply_overlay(
            operation,
            &method.annotations,
            OPENAPI_OPERATION,
            &method.name,
        ))
    }

    /// `POST /<Method>` carrying the whole input struct as the JSON body
    fn rpc_operation(
        &mut self,
        service: &ServiceDef,
        method: &MethodDef,
    ) -> Result<(String, &'static str, Operation)> {
        let mut operation = self.base_operation(service, method);
        operation
            .parameters
            .push(ParameterOrRef::Parameter(Box::new(Parameter {
                name: RPC_METAINFO_PARAMETER.to_string(),
                location: "query".to_string(),
                description: Some("metainfo for request".to_string()),
                schema: Some(Schema::object().into()),
                ..Default::default()
            })));

        if let Some(input) = self.input_struct(method)? {
            let mut schema = Schema::object();
            for field in &input.fields {
                let name = self.property_name(field);
                let property = self.field_schema(field);
                schema.properties.insert(name, property);
            }
            let schema = apply_schema_overlay(schema, &input.annotations, &input.name);

            let mut content = IndexMap::new();
            content.insert(JSON_MEDIA_TYPE.to_string(), MediaType::with_schema(schema.into()));
            operation.request_body = Some(RequestBodyOrRef::RequestBody(Box::new(RequestBody {
                description: non_empty(&input.comment),
                content,
                required: false,
            })));
        }

        if let Some(output) = self.output_struct(method)? {
            self.enqueue(&output.name);
            let mut content = IndexMap::new();
            content.insert(
                JSON_MEDIA_TYPE.to_string(),
                MediaType::with_schema(SchemaOrRef::component(&output.name)),
            );
            operation.responses.insert(
                "200".to_string(),
                ResponseOrRef::Response(Box::new(Response {
                    description: response_description(output),
                    headers: IndexMap::new(),
                    content,
                })),
            );
        }

        let operation = apply_overlay(
            operation,
            &method.annotations,
            OPENAPI_OPERATION,
            &method.name,
        );
        Ok((format!("/{}", method.name), "post", operation))
    }

    fn base_operation(&self, service: &ServiceDef, method: &MethodDef) -> Operation {
        let servers = method
            .annotations
            .first_non_empty(API_BASE_URL)
            .or_else(|| service.annotations.first_non_empty(API_BASE_DOMAIN))
            .map(|host| vec![Server::new(with_scheme(host))])
            .unwrap_or_default();

        Operation {
            tags: vec![service.name.clone()],
            description: non_empty(&method.comment),
            operation_id: Some(format!("{}_{}", service.name, method.name)),
            servers,
            ..Default::default()
        }
    }

    fn input_struct(&self, method: &MethodDef) -> Result<Option<&'a StructDef>> {
        if method.arguments.len() > 1 {
            tracing::warn!(
                method = %method.name,
                arguments = method.arguments.len(),
                "method has more than one argument, using the first"
            );
        }
        match method.arguments.first().and_then(TypeRef::struct_name) {
            Some(name) => self.find_struct(name).map(Some),
            None => Ok(None),
        }
    }

    fn output_struct(&self, method: &MethodDef) -> Result<Option<&'a StructDef>> {
        match method.output.as_ref().and_then(TypeRef::struct_name) {
            Some(name) => self.find_struct(name).map(Some),
            None => Ok(None),
        }
    }

    fn find_struct(&self, name: &str) -> Result<&'a StructDef> {
        self.idl
            .find_struct(name)
            .ok_or_else(|| ConvertError::Conversion(format!("unknown struct '{}'", name)))
    }

    /// Parameter for a field annotated with a named parameter location
    fn field_parameter(&mut self, field: &FieldDef) -> Option<Parameter> {
        let (name, location) = PARAMETER_LOCATIONS
            .iter()
            .rev()
            .find_map(|(key, location)| {
                field
                    .annotations
                    .first_non_empty(key)
                    .map(|name| (name.to_string(), *location))
            })?;

        let parameter = Parameter {
            name,
            location: location.to_string(),
            description: non_empty(&field.comment),
            required: location == "path",
            schema: Some(self.field_schema(field)),
            ..Default::default()
        };
        let parameter = apply_overlay(parameter, &field.annotations, OPENAPI_PARAMETER, &field.name);

        (!parameter.name.is_empty() && !parameter.location.is_empty()).then_some(parameter)
    }

    /// Object schema made of the fields carrying annotation `key`
    fn schema_by_option(&mut self, def: &StructDef, key: &str) -> Option<Schema> {
        let mut schema = Schema::object();
        for field in def.fields.iter().filter(|f| f.annotations.contains(key)) {
            let name = match field.annotations.first_non_empty(key) {
                Some(name) => name.to_string(),
                None => self.property_name(field),
            };
            let property = self.field_schema(field);
            schema.properties.insert(name, property);
        }
        if schema.properties.is_empty() {
            return None;
        }
        Some(apply_schema_overlay(schema, &def.annotations, &def.name))
    }

    /// Component schema for a struct
    fn struct_schema(&mut self, def: &StructDef) -> Schema {
        let mut schema = Schema::object();
        schema.description = non_empty(&def.comment);
        for field in &def.fields {
            let name = self.property_name(field);
            let property = self.field_schema(field);
            schema.properties.insert(name, property);
        }
        apply_schema_overlay(schema, &def.annotations, &def.name)
    }

    /// Schema for a field: the type schema plus the field's description and overlay
    fn field_schema(&mut self, field: &FieldDef) -> SchemaOrRef {
        let schema = self.schema_for_type(&field.type_ref);
        match schema {
            SchemaOrRef::Schema(mut inline) => {
                if inline.description.is_none() {
                    inline.description = non_empty(&field.comment);
                }
                let inline =
                    apply_overlay(*inline, &field.annotations, OPENAPI_PROPERTY, &field.name);
                SchemaOrRef::schema(inline)
            },
            reference => reference,
        }
    }

    /// Schema for a resolved type; structs are referenced and queued
    pub fn schema_for_type(&mut self, type_ref: &TypeRef) -> SchemaOrRef {
        match type_ref {
            TypeRef::Scalar(kind) => TypeMapper::scalar_schema(kind).into(),
            TypeRef::Struct(name) => {
                self.enqueue(name);
                SchemaOrRef::component(name)
            },
            TypeRef::Enum(name) => self.enum_schema(name).into(),
            TypeRef::List(element) | TypeRef::Set(element) => {
                Schema::array(self.schema_for_type(element)).into()
            },
            TypeRef::Map(_, value) => Schema {
                additional_properties: Some(AdditionalProperties::Schema(Box::new(
                    self.schema_for_type(value),
                ))),
                ..Schema::object()
            }
            .into(),
        }
    }

    fn enum_schema(&self, name: &str) -> Schema {
        match self.config.enum_style {
            EnumStyle::Integer => Schema::typed("integer", Some("int32")),
            EnumStyle::String => {
                let mut schema = Schema::typed("string", None);
                if let Some(def) = self.idl.find_enum(name) {
                    schema.enum_values = def
                        .values
                        .iter()
                        .map(|v| serde_json::Value::String(v.name.clone()))
                        .collect();
                }
                schema
            },
        }
    }

    fn property_name(&self, field: &FieldDef) -> String {
        match (self.config.naming, &field.json_name) {
            (NamingStyle::Json, Some(json_name)) if !json_name.is_empty() => json_name.clone(),
            _ => field.name.clone(),
        }
    }

    fn enqueue(&mut self, name: &str) {
        if self.generated.insert(name.to_string()) {
            self.pending.push_back(name.to_string());
        }
    }

    /// Expand queued structs until no new names appear
    fn expand_pending(&mut self) -> Result<()> {
        while let Some(name) = self.pending.pop_front() {
            let def = self.find_struct(&name)?;
            let schema = self.struct_schema(def);
            self.add_component(&name, schema.into());
        }
        Ok(())
    }

    fn add_component(&mut self, name: &str, schema: SchemaOrRef) {
        self.document
            .components
            .schemas
            .entry(name.to_string())
            .or_insert(schema);
    }

    /// Overlay `openapi.document` from the first service carrying it, else the first struct
    fn apply_document_overlay(&mut self) {
        let idl = self.idl;
        let source = idl
            .services
            .iter()
            .map(|s| (&s.annotations, &s.name))
            .chain(idl.structs.iter().map(|s| (&s.annotations, &s.name)))
            .find(|(annotations, _)| annotations.contains(OPENAPI_DOCUMENT));

        if let Some((annotations, owner)) = source {
            let document = std::mem::take(&mut self.document);
            self.document = apply_overlay(document, annotations, OPENAPI_DOCUMENT, owner);
        }
    }
}

/// Apply a structured annotation onto `target`, keeping `target` if it fails
fn apply_overlay<T>(target: T, annotations: &Annotations, key: &str, owner: &str) -> T
where
    T: Serialize + DeserializeOwned,
{
    let Some(parsed) = annotations.parse::<serde_json::Value>(key) else {
        return target;
    };
    match parsed.and_then(|patch| overlay(&target, patch)) {
        Ok(merged) => merged,
        Err(e) => {
            tracing::warn!(annotation = key, owner, error = %e, "ignoring annotation");
            target
        },
    }
}

/// Struct-level `openapi.schema` overlay; derived and annotated `required` are unioned
fn apply_schema_overlay(schema: Schema, annotations: &Annotations, owner: &str) -> Schema {
    let derived_required = schema.required.clone();
    let mut schema = apply_overlay(schema, annotations, OPENAPI_SCHEMA, owner);
    for name in derived_required {
        if !schema.required.contains(&name) {
            schema.required.push(name);
        }
    }
    schema
}

fn response_description(output: &StructDef) -> String {
    non_empty(&output.comment).unwrap_or_else(|| DEFAULT_RESPONSE_DESCRIPTION.to_string())
}

fn with_scheme(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
