//! Thrift grammar as `combine` parsers
//!
//! Every parser is generic over the input stream and skips its own
//! leading whitespace. Comments are trivia too, except in the positions
//! where they document a definition, field, function or enum value.

mod comment;
mod definition;
mod literal;
mod service;
mod type_name;

use super::ast::Document;
use combine::stream::easy;
use combine::stream::position::{self, SourcePosition};
use combine::{any, attempt, eof, look_ahead, many, none_of, one_of, optional};
use combine::{EasyParser, Parser, Stream};
use idlbridge_common::{ConvertError, Result};

use comment::{doc_comment, skip_trivia};
use definition::{definition, Definition};

/// Parse Thrift source text into a [`Document`]
pub(crate) fn parse_document(source: &str) -> Result<Document> {
    match document().easy_parse(position::Stream::new(source)) {
        Ok((document, _)) => Ok(document),
        Err(error) => Err(syntax_error(error)),
    }
}

fn syntax_error(error: easy::Errors<char, &str, SourcePosition>) -> ConvertError {
    let details: Vec<String> = error.errors.iter().map(ToString::to_string).collect();
    ConvertError::Parse(format!(
        "Invalid Thrift syntax at line {}, column {}: {}",
        error.position.line,
        error.position.column,
        details.join("; ")
    ))
}

fn document<Input>() -> impl Parser<Input, Output = Document>
where
    Input: Stream<Token = char>,
{
    many::<Vec<_>, _, _>((
        attempt(doc_comment().skip(look_ahead(any()))),
        definition(),
    ))
    .skip(skip_trivia())
    .skip(eof())
    .map(|definitions: Vec<(String, Definition)>| {
        let mut document = Document::default();
        for (doc, definition) in definitions {
            match definition {
                Definition::Include(path) => document.includes.push(path),
                Definition::Namespace(scope, name) => document.namespaces.push((scope, name)),
                Definition::Typedef(typedef) => document.typedefs.push(typedef),
                Definition::Enum(mut value) => {
                    value.comment = doc;
                    document.enums.push(value);
                },
                Definition::Struct(mut value) => {
                    value.comment = doc;
                    document.structs.push(value);
                },
                Definition::Service(mut value) => {
                    value.comment = doc;
                    document.services.push(value);
                },
                Definition::Skipped => {},
            }
        }
        document
    })
}

/// `item`s up to, but not including, `close`, each with its leading doc
fn documented_until<Input, P>(
    close: char,
    item: P,
) -> impl Parser<Input, Output = Vec<(String, P::Output)>>
where
    Input: Stream<Token = char>,
    P: Parser<Input>,
{
    many((attempt(doc_comment().skip(look_ahead(none_of([close])))), item))
}

/// `,` or `;` between list entries
fn separator<Input>() -> impl Parser<Input, Output = Option<char>>
where
    Input: Stream<Token = char>,
{
    optional(attempt(skip_trivia().with(one_of(",;".chars()))))
}

/// Leading doc followed by a same-line trailing comment
fn join_comments(doc: String, trailing: String) -> String {
    if trailing.is_empty() {
        doc
    } else if doc.is_empty() {
        trailing
    } else {
        format!("{}\n{}", doc, trailing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thrift::ast::{StructKind, Type, Typedef};

    #[test]
    fn test_parse_headers_and_typedef() {
        let doc = parse_document(
            r#"
            include "shared.thrift"
            cpp_include "<vector>"
            namespace go example.user
            namespace * user
            typedef i64 UserId
            const i32 MAX = 10
            const list<string> NAMES = ["a", "b"]
            const map<string, i32> IDS = {"a": 1, "b": 2};
            "#,
        )
        .unwrap();

        assert_eq!(doc.includes, vec!["shared.thrift".to_string()]);
        assert_eq!(
            doc.namespaces,
            vec![
                ("go".to_string(), "example.user".to_string()),
                ("*".to_string(), "user".to_string())
            ]
        );
        assert_eq!(
            doc.typedefs,
            vec![Typedef {
                name: "UserId".into(),
                target: Type::Base("i64".into())
            }]
        );
    }

    #[test]
    fn test_definition_docs() {
        let doc = parse_document(
            "// user record\n# second line\n/**\n * Block doc\n */\nstruct User {}\n\nunion Choice {} // not a doc\nexception Oops {}",
        )
        .unwrap();

        assert_eq!(doc.structs[0].comment, "user record\nsecond line\nBlock doc");
        assert_eq!(doc.structs[1].kind, StructKind::Union);
        assert_eq!(doc.structs[2].kind, StructKind::Exception);
        assert_eq!(doc.structs[2].comment, "");
    }

    #[test]
    fn test_trailing_comments_and_whitespace_at_end() {
        let doc = parse_document("struct A {}\n// dangling\n/* also dangling */\n").unwrap();
        assert_eq!(doc.structs.len(), 1);
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let err = parse_document("struct A {\n 1: string\n}").unwrap_err();
        assert!(err.to_string().contains("line 3"), "{}", err);
    }

    #[test]
    fn test_unknown_definition_is_error() {
        let err = parse_document("struct A {}\nmessage B {}").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{}", err);
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert!(parse_document("/* never closed").is_err());
    }

    #[test]
    fn test_join_comments() {
        assert_eq!(join_comments("doc".into(), "tail".into()), "doc\ntail");
        assert_eq!(join_comments(String::new(), "tail".into()), "tail");
        assert_eq!(join_comments("doc".into(), String::new()), "doc");
    }
}
