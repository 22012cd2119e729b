use super::comment::trailing_comment;
use super::definition::fields;
use super::literal::{identifier, keyword, lex, symbol};
use super::type_name::{annotations, field_type};
use super::{documented_until, join_comments, separator};
use crate::thrift::ast::{Function, Service};
use combine::{attempt, between, choice, optional, Parser, Stream};

/// `Name [extends Base] { functions } [annotations]`
pub(crate) fn service_body<Input>() -> impl Parser<Input, Output = Service>
where
    Input: Stream<Token = char>,
{
    (
        lex(identifier()),
        optional(attempt(lex(keyword("extends"))).with(lex(identifier()))),
        between(
            symbol('{'),
            symbol('}'),
            documented_until('}', function()),
        ),
        annotations(),
    )
        .map(|(name, extends, entries, annotations)| Service {
            name,
            extends,
            comment: String::new(),
            annotations,
            functions: entries
                .into_iter()
                .map(|(doc, mut function)| {
                    function.comment = join_comments(doc, function.comment);
                    function
                })
                .collect(),
        })
}

/// `[oneway] (void|type) Name(args) [throws (fields)] [annotations] [sep]`
fn function<Input>() -> impl Parser<Input, Output = Function>
where
    Input: Stream<Token = char>,
{
    let returns = choice((
        attempt(lex(keyword("void"))).map(|_| None),
        field_type().map(Some),
    ));
    // declared exceptions have no place in the generated document
    let throws = optional(
        attempt(lex(keyword("throws"))).with(between(symbol('('), symbol(')'), fields(')'))),
    );
    (
        optional(attempt(lex(keyword("oneway")))),
        returns,
        lex(identifier()),
        between(symbol('('), symbol(')'), fields(')')),
        throws,
        annotations(),
        separator().with(trailing_comment()),
    )
        .map(
            |(oneway, returns, name, arguments, _, annotations, trailing)| Function {
                name,
                oneway: oneway.is_some(),
                returns,
                arguments,
                comment: trailing.unwrap_or_default(),
                annotations,
            },
        )
}
