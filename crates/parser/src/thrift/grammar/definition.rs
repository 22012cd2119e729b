use super::comment::trailing_comment;
use super::literal::{const_value, identifier, int_constant, keyword, lex, string_literal, symbol};
use super::service::service_body;
use super::type_name::{annotations, field_type};
use super::{documented_until, join_comments, separator};
use crate::thrift::ast::{Enum, Field, Requiredness, Service, Struct, StructKind, Typedef};
use combine::parser::char::char;
use combine::{attempt, between, choice, optional, Parser, Stream};

/// Top-level declaration; docs are attached by the caller
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Definition {
    Include(String),
    Namespace(String, String),
    Typedef(Typedef),
    Enum(Enum),
    Struct(Struct),
    Service(Service),
    /// `cpp_include` and `const`
    Skipped,
}

pub(crate) fn definition<Input>() -> impl Parser<Input, Output = Definition>
where
    Input: Stream<Token = char>,
{
    let namespace_scope = choice((char('*').map(|_| "*".to_string()), identifier()));
    choice((
        keyword("include")
            .with(lex(string_literal()))
            .map(Definition::Include),
        keyword("cpp_include")
            .with(lex(string_literal()))
            .map(|_| Definition::Skipped),
        keyword("namespace")
            .with((lex(namespace_scope), lex(identifier())))
            .skip(annotations())
            .map(|(scope, name)| Definition::Namespace(scope, name)),
        keyword("const")
            .with((field_type(), lex(identifier()), symbol('='), const_value()))
            .map(|_| Definition::Skipped),
        keyword("typedef")
            .with((field_type(), lex(identifier())))
            .skip(annotations())
            .map(|(target, name)| Definition::Typedef(Typedef { name, target })),
        keyword("enum").with(enum_body()).map(Definition::Enum),
        keyword("struct")
            .with(struct_body(StructKind::Struct))
            .map(Definition::Struct),
        keyword("union")
            .with(struct_body(StructKind::Union))
            .map(Definition::Struct),
        keyword("exception")
            .with(struct_body(StructKind::Exception))
            .map(Definition::Struct),
        keyword("service").with(service_body()).map(Definition::Service),
    ))
    .expected("definition")
    .skip(separator())
    .skip(trailing_comment())
}

/// Values without `= n` continue from the previous value
fn enum_body<Input>() -> impl Parser<Input, Output = Enum>
where
    Input: Stream<Token = char>,
{
    let value = (
        lex(identifier()),
        optional(attempt(symbol('=')).with(lex(int_constant()))),
    )
        .skip(annotations())
        .skip(separator())
        .skip(trailing_comment());
    (
        lex(identifier()),
        between(symbol('{'), symbol('}'), documented_until('}', value)),
        annotations(),
    )
        .map(|(name, entries, _)| {
            let mut next_value = 0;
            let values = entries
                .into_iter()
                .map(|(_, (value_name, number))| {
                    let number = number.unwrap_or(next_value);
                    next_value = number + 1;
                    (value_name, number)
                })
                .collect();
            Enum {
                name,
                comment: String::new(),
                values,
            }
        })
}

fn struct_body<Input>(kind: StructKind) -> impl Parser<Input, Output = Struct>
where
    Input: Stream<Token = char>,
{
    (
        lex(identifier()),
        optional(attempt(lex(keyword("xsd_all")))),
        between(symbol('{'), symbol('}'), fields('}')),
        annotations(),
    )
        .map(move |(name, _, fields, annotations)| Struct {
            kind,
            name,
            comment: String::new(),
            annotations,
            fields,
        })
}

/// Fields up to `close`, with leading and same-line comments joined
pub(crate) fn fields<Input>(close: char) -> impl Parser<Input, Output = Vec<Field>>
where
    Input: Stream<Token = char>,
{
    documented_until(close, field()).map(|entries: Vec<(String, Field)>| {
        entries
            .into_iter()
            .map(|(doc, mut field)| {
                field.comment = join_comments(doc, field.comment);
                field
            })
            .collect()
    })
}

/// `[id:] [required|optional] type name [= const] [annotations] [sep]`
fn field<Input>() -> impl Parser<Input, Output = Field>
where
    Input: Stream<Token = char>,
{
    let requiredness = optional(choice((
        attempt(lex(keyword("required"))).map(|_| Requiredness::Required),
        attempt(lex(keyword("optional"))).map(|_| Requiredness::Optional),
    )))
    .map(|requiredness| requiredness.unwrap_or(Requiredness::Default));
    (
        optional(attempt(lex(int_constant()).skip(symbol(':')))),
        requiredness,
        field_type(),
        lex(identifier()),
        optional(attempt(symbol('=')).with(const_value())),
        annotations(),
        separator().with(trailing_comment()),
    )
        .map(
            |(id, requiredness, field_type, name, _, annotations, trailing)| Field {
                id,
                requiredness,
                field_type,
                name,
                comment: trailing.unwrap_or_default(),
                annotations,
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thrift::ast::Type;
    use combine::EasyParser;

    #[test]
    fn test_parse_struct_with_annotations() {
        let (definition, rest) = definition()
            .easy_parse(
                r#"struct GetUserReq {
                    1: required i64 id (api.path = "id")
                    // tag filter
                    2: optional list<string> tags = [] (api.query = "tags"); // repeatable
                    3: map<string, shared.Item> items
                } (openapi.schema = '{"title": "GetUserReq"}')"#,
            )
            .unwrap();
        assert_eq!(rest, "");
        let Definition::Struct(s) = definition else {
            panic!("expected a struct, got {:?}", definition);
        };

        assert_eq!(s.kind, StructKind::Struct);
        assert_eq!(s.name, "GetUserReq");
        assert_eq!(
            s.annotations,
            vec![("openapi.schema".into(), r#"{"title": "GetUserReq"}"#.into())]
        );
        assert_eq!(s.fields.len(), 3);
        assert_eq!(s.fields[0].id, Some(1));
        assert_eq!(s.fields[0].requiredness, Requiredness::Required);
        assert_eq!(s.fields[0].annotations, vec![("api.path".into(), "id".into())]);
        assert_eq!(
            s.fields[1].field_type,
            Type::List(Box::new(Type::Base("string".into())))
        );
        assert_eq!(s.fields[1].requiredness, Requiredness::Optional);
        assert_eq!(s.fields[1].comment, "tag filter\nrepeatable");
        assert_eq!(s.fields[2].id, Some(3));
        assert_eq!(s.fields[2].requiredness, Requiredness::Default);
        assert_eq!(
            s.fields[2].field_type,
            Type::Map(
                Box::new(Type::Base("string".into())),
                Box::new(Type::Named("shared.Item".into()))
            )
        );
    }

    #[test]
    fn test_fields_without_ids() {
        let fields = fields(')').easy_parse("string name, i32 age)").unwrap().0;
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].id, None);
        assert_eq!(fields[1].name, "age");
    }

    #[test]
    fn test_parse_enum_values() {
        let (definition, _) = definition()
            .easy_parse("enum Status { ACTIVE, DISABLED = 5 (deprecated), DELETED } (x = \"y\")")
            .unwrap();
        let Definition::Enum(value) = definition else {
            panic!("expected an enum, got {:?}", definition);
        };
        assert_eq!(
            value.values,
            vec![
                ("ACTIVE".to_string(), 0),
                ("DISABLED".to_string(), 5),
                ("DELETED".to_string(), 6)
            ]
        );
    }

    #[test]
    fn test_skipped_definitions() {
        assert_eq!(
            definition().easy_parse(r#"cpp_include "<map>""#),
            Ok((Definition::Skipped, ""))
        );
        assert_eq!(
            definition().easy_parse("const double RATE = 2.5;"),
            Ok((Definition::Skipped, ""))
        );
    }
}
