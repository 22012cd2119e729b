use super::comment::skip_trivia;
use super::literal::{identifier, keyword, lex, string_literal, symbol};
use crate::thrift::ast::Type;
use combine::{attempt, between, choice, optional, parser, Parser, Stream};

const BASE_TYPES: [&str; 10] = [
    "bool", "byte", "i8", "i16", "i32", "i64", "double", "string", "binary", "uuid",
];

/// `( key = "value", ... )`; a key without a value maps to `""`
pub(crate) fn annotations<Input>() -> impl Parser<Input, Output = Vec<(String, String)>>
where
    Input: Stream<Token = char>,
{
    let annotation = (
        lex(identifier()),
        optional(attempt(symbol('=')).with(lex(string_literal()))),
    )
        .skip(super::separator())
        .map(|(key, value)| (key, value.unwrap_or_default()));
    optional(
        attempt(symbol('('))
            .with(super::documented_until(')', annotation))
            .skip(symbol(')')),
    )
    .map(|entries| {
        entries
            .unwrap_or_default()
            .into_iter()
            .map(|(_, annotation)| annotation)
            .collect()
    })
}

fn field_type_<Input>() -> impl Parser<Input, Output = Type>
where
    Input: Stream<Token = char>,
{
    let element = || between(symbol('<'), symbol('>'), field_type());
    let named = identifier().map(|name| {
        if BASE_TYPES.contains(&name.as_str()) {
            Type::Base(name)
        } else {
            Type::Named(name)
        }
    });
    skip_trivia()
        .with(choice((
            keyword("list")
                .with(element())
                .map(|t| Type::List(Box::new(t))),
            keyword("set")
                .with(element())
                .map(|t| Type::Set(Box::new(t))),
            keyword("map")
                .with(between(
                    symbol('<'),
                    symbol('>'),
                    (field_type(), symbol(','), field_type()),
                ))
                .map(|(key, _, value)| Type::Map(Box::new(key), Box::new(value))),
            named,
        )))
        .skip(optional(attempt(lex(keyword("cpp_type"))).with(lex(string_literal()))))
        // annotations on a type reference carry no meaning
        .skip(annotations())
}

parser! {
    pub(crate) fn field_type[Input]()(Input) -> Type
    where [Input: Stream<Token = char>,]
    {
        field_type_()
    }
}
