//! Integration test for the Thrift parser

use idlbridge_common::{ScalarKind, TypeRef};
use idlbridge_parser::ThriftParser;
use pretty_assertions::assert_eq;
use std::fs;
use tracing_test::traced_test;

const SHARED: &str = r#"
namespace go shared

/** Pagination cursor */
struct Page {
    1: i32 size (api.query = "size")
    2: string token
}

enum Order {
    ASC = 1,
    DESC = 2,
}
"#;

const PET: &str = r#"
include "common/shared.thrift"

namespace go pet

typedef i64 PetId

// A pet in the store
struct Pet {
    1: required PetId id
    2: string name // display name
    3: optional list<string> tags
    4: map<string, double> scores
}

struct ListPetsRequest {
    1: shared.Page page
    2: shared.Order order (api.query = "order")
}

struct ListPetsResponse {
    1: list<Pet> pets (api.body = "pets")
}

/** Pet operations */
service PetService {
    ListPetsResponse ListPets(1: ListPetsRequest req) (api.get = "/pets")
    oneway void Ping()
}
"#;

#[test]
fn test_parse_file_with_include() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("common")).unwrap();
    fs::write(dir.path().join("common/shared.thrift"), SHARED).unwrap();
    fs::write(dir.path().join("pet.thrift"), PET).unwrap();

    let idl = ThriftParser::from_file(dir.path().join("pet.thrift"))
        .unwrap()
        .parse()
        .unwrap();

    assert_eq!(idl.name, "pet");

    let pet = idl.find_struct("Pet").unwrap();
    assert_eq!(pet.comment, "A pet in the store");
    assert_eq!(pet.fields[0].type_ref, TypeRef::Scalar(ScalarKind::I64));
    assert_eq!(pet.fields[1].comment, "display name");
    assert_eq!(
        pet.fields[3].type_ref,
        TypeRef::map(
            TypeRef::Scalar(ScalarKind::String),
            TypeRef::Scalar(ScalarKind::Double)
        )
    );

    let request = idl.find_struct("ListPetsRequest").unwrap();
    assert_eq!(request.fields[0].type_ref, TypeRef::Struct("shared.Page".into()));
    assert_eq!(request.fields[1].type_ref, TypeRef::Enum("shared.Order".into()));

    let page = idl.find_struct("shared.Page").unwrap();
    assert_eq!(page.comment, "Pagination cursor");
    assert_eq!(page.fields[0].annotations.first("api.query"), Some("size"));

    let service = &idl.services[0];
    assert_eq!(service.name, "PetService");
    assert_eq!(service.comment, "Pet operations");
    assert_eq!(service.methods.len(), 2);
    assert_eq!(service.methods[0].annotations.first("api.get"), Some("/pets"));
    assert_eq!(service.methods[1].output, None);
    assert!(service.methods[1].arguments.is_empty());
}

#[test]
fn test_missing_include_is_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("pet.thrift"), PET).unwrap();

    let err = ThriftParser::from_file(dir.path().join("pet.thrift"))
        .err()
        .unwrap();
    assert!(err.to_string().contains("shared.thrift"));
}

#[traced_test]
#[test]
fn test_unknown_type_is_permissive() {
    let idl = ThriftParser::from_str("struct Order { 1: Missing item }")
        .unwrap()
        .parse()
        .unwrap();

    let order = idl.find_struct("Order").unwrap();
    assert_eq!(
        order.fields[0].type_ref,
        TypeRef::Scalar(ScalarKind::Unknown("Missing".into()))
    );
    assert!(logs_contain("unknown thrift type"));
}
