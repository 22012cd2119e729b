//! End-to-end tests for OpenAPI to proto3 generation

use idlbridge_common::proto::EMPTY_IMPORT;
use idlbridge_common::ProtoConfig;
use idlbridge_generator::ProtoGenerator;
use idlbridge_parser::OpenApiParser;
use pretty_assertions::assert_eq;
use std::fs;

const PETSTORE: &str = r##"
openapi: 3.0.3
info:
  title: Petstore
  version: 1.0.0
paths:
  /pets/{petId}:
    get:
      tags: [pets]
      operationId: GetPet
      parameters:
        - name: petId
          in: path
          required: true
          schema:
            type: string
      responses:
        "200":
          description: A pet
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Shape"
  /health:
    get:
      operationId: Health
      responses:
        "204":
          description: healthy
  /ping:
    post:
      operationId: Ping
      responses:
        "204":
          description: pong
components:
  schemas:
    Shape:
      type: object
      properties:
        a:
          type: string
        b:
          type: array
          items:
            type: integer
            format: int32
"##;

fn config(package: &str) -> ProtoConfig {
    ProtoConfig {
        package: package.to_string(),
        ..Default::default()
    }
}

fn generate(yaml: &str) -> String {
    let document = OpenApiParser::from_yaml(yaml).unwrap().into_document();
    ProtoGenerator::from_openapi(&document, config("petstore"))
        .unwrap()
        .render()
}

#[test]
fn test_petstore_proto() {
    let expected = r#"syntax = "proto3";

package petstore;

import "api.proto";
import "google/protobuf/empty.proto";

message GetPetRequest {
  string petId = 1;
}

message GetPetResponse_200 {
  Shape body = 1;
}

message Shape {
  string a = 1;
  repeated int32 b = 2;
}

service DefaultService {
  rpc Health(google.protobuf.Empty) returns (google.protobuf.Empty) {
    option (api.get) = "/health";
  }
  rpc Ping(google.protobuf.Empty) returns (google.protobuf.Empty) {
    option (api.post) = "/ping";
  }
}

service pets {
  rpc GetPet(GetPetRequest) returns (GetPetResponse_200) {
    option (api.get) = "/pets/:petId";
  }
}
"#;
    assert_eq!(generate(PETSTORE), expected);
}

#[test]
fn test_output_is_deterministic() {
    let first = generate(PETSTORE);
    let second = generate(PETSTORE);
    assert_eq!(first, second);
}

#[test]
fn test_empty_import_added_once() {
    let document = OpenApiParser::from_yaml(PETSTORE).unwrap().into_document();
    let generator = ProtoGenerator::from_openapi(&document, config("petstore")).unwrap();
    let imports = &generator.proto_file().imports;
    assert_eq!(imports.iter().filter(|i| i.as_str() == EMPTY_IMPORT).count(), 1);
    assert_eq!(generator.render().matches(EMPTY_IMPORT).count(), 1);
}

#[test]
fn test_same_operation_twice_merges() {
    let yaml = r#"
openapi: 3.0.3
info:
  title: Pets
  version: "1"
paths:
  /pets:
    get:
      tags: [pets]
      operationId: ListPets
      parameters:
        - name: limit
          in: query
          schema:
            type: integer
            format: int32
      responses:
        "204":
          description: none
  /v2/pets:
    get:
      tags: [pets]
      operationId: ListPets
      parameters:
        - name: limit
          in: query
          schema:
            type: integer
            format: int32
        - name: offset
          in: query
          schema:
            type: integer
      responses:
        "204":
          description: none
"#;
    let document = OpenApiParser::from_yaml(yaml).unwrap().into_document();
    let generator = ProtoGenerator::from_openapi(&document, config("pets")).unwrap();
    let file = generator.proto_file();

    let service = file.find_service("pets").unwrap();
    assert_eq!(service.methods.len(), 1);
    assert_eq!(service.methods[0].options[0].name, "api.get");

    let request = file.find_message("ListPetsRequest").unwrap();
    let fields: Vec<_> = request.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(fields, vec!["limit", "offset"]);
    assert_eq!(request.find_field("offset").unwrap().field_type, "int64");

    let rendered = generator.render();
    assert_eq!(rendered.matches("message ListPetsRequest").count(), 1);
    assert_eq!(rendered.matches("rpc ListPets").count(), 1);
}

#[test]
fn test_mutually_referencing_components() {
    let yaml = r##"
openapi: 3.0.3
info:
  title: Cycle
  version: "1"
paths: {}
components:
  schemas:
    A:
      type: object
      properties:
        b:
          $ref: "#/components/schemas/B"
    B:
      type: object
      properties:
        a:
          $ref: "#/components/schemas/A"
"##;
    let rendered = generate(yaml);
    assert!(rendered.contains("message A {\n  B b = 1;\n}\n"));
    assert!(rendered.contains("message B {\n  A a = 1;\n}\n"));
}

#[test]
fn test_openapi_operation_option() {
    let document = OpenApiParser::from_yaml(PETSTORE).unwrap().into_document();
    let config = ProtoConfig {
        openapi_options: true,
        ..config("petstore")
    };
    let rendered = ProtoGenerator::from_openapi(&document, config)
        .unwrap()
        .render();

    assert!(rendered.contains("import \"openapi.proto\";"));
    assert!(rendered.contains("option (openapi.operation) = {"));
    assert!(rendered.contains("operationId: \"GetPet\""));
}

#[test]
fn test_unresolved_reference_names_operation() {
    let yaml = r##"
openapi: 3.0.3
info:
  title: Broken
  version: "1"
paths:
  /pets:
    post:
      operationId: CreatePet
      requestBody:
        content:
          application/json:
            schema:
              $ref: "#/components/schemas/Missing"
      responses:
        "204":
          description: none
"##;
    let document = OpenApiParser::from_yaml(yaml).unwrap().into_document();
    let err = ProtoGenerator::from_openapi(&document, config("broken"))
        .err()
        .unwrap()
        .to_string();
    assert!(err.starts_with("operation POST /pets"), "{}", err);
    assert!(err.contains("#/components/schemas/Missing"), "{}", err);
}

#[test]
fn test_generate_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out/petstore.proto");

    let document = OpenApiParser::from_yaml(PETSTORE).unwrap().into_document();
    let generator = ProtoGenerator::from_openapi(&document, config("petstore")).unwrap();
    generator.generate_to_file(&path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), generator.render());
}
