use super::comment::skip_trivia;
use super::separator;
use combine::error::StreamError;
use combine::parser::char::{char, digit, hex_digit, string};
use combine::stream::StreamErrorFor;
use combine::{any, attempt, between, choice, many, many1, none_of, not_followed_by, one_of};
use combine::{optional, parser, satisfy, Parser, Stream};

/// `parser` after any whitespace or comments
pub(crate) fn lex<Input, P>(parser: P) -> impl Parser<Input, Output = P::Output>
where
    Input: Stream<Token = char>,
    P: Parser<Input>,
{
    skip_trivia().with(parser)
}

pub(crate) fn symbol<Input>(c: char) -> impl Parser<Input, Output = char>
where
    Input: Stream<Token = char>,
{
    lex(char(c))
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Identifiers may be include-qualified (`shared.Item`)
pub(crate) fn identifier<Input>() -> impl Parser<Input, Output = String>
where
    Input: Stream<Token = char>,
{
    (
        satisfy(|c: char| c.is_ascii_alphabetic() || c == '_'),
        many(satisfy(is_identifier_char)),
    )
        .map(|(first, rest): (char, String)| format!("{}{}", first, rest))
        .expected("identifier")
}

/// A reserved word, not matching a longer identifier it prefixes
pub(crate) fn keyword<Input>(word: &'static str) -> impl Parser<Input, Output = ()>
where
    Input: Stream<Token = char>,
{
    attempt(string(word).skip(not_followed_by(satisfy(is_identifier_char)))).map(|_| ())
}

/// Single- or double-quoted string
pub(crate) fn string_literal<Input>() -> impl Parser<Input, Output = String>
where
    Input: Stream<Token = char>,
{
    choice((quoted('"'), quoted('\''))).expected("string literal")
}

fn quoted<Input>(quote: char) -> impl Parser<Input, Output = String>
where
    Input: Stream<Token = char>,
{
    let escaped = char('\\').with(any()).map(|c| match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        other => other,
    });
    between(
        char(quote),
        char(quote),
        many(choice((escaped, none_of(vec![quote, '\\'])))),
    )
}

/// Signed decimal or `0x` hexadecimal integer
pub(crate) fn int_constant<Input>() -> impl Parser<Input, Output = i64>
where
    Input: Stream<Token = char>,
{
    (
        optional(one_of("+-".chars())),
        choice((
            attempt(char('0').with(one_of("xX".chars())))
                .with(many1(hex_digit()))
                .map(|digits: String| (16, digits)),
            many1(digit()).map(|digits: String| (10, digits)),
        )),
    )
        .and_then(|(sign, (radix, digits)): (Option<char>, (u32, String))| {
            i64::from_str_radix(&digits, radix)
                .map(|value| if sign == Some('-') { -value } else { value })
                .map_err(StreamErrorFor::<Input>::other)
        })
        .expected("integer")
}

fn const_value_<Input>() -> impl Parser<Input, Output = ()>
where
    Input: Stream<Token = char>,
{
    let number = (
        optional(one_of("+-".chars())),
        many1::<String, _, _>(satisfy(|c: char| c.is_ascii_alphanumeric() || c == '.')),
    );
    let list = between(
        char('['),
        symbol(']'),
        many::<Vec<_>, _, _>(attempt(const_value()).skip(separator())),
    );
    let map = between(
        char('{'),
        symbol('}'),
        many::<Vec<_>, _, _>(
            (attempt(const_value()), symbol(':'), const_value()).skip(separator()),
        ),
    );
    skip_trivia()
        .with(choice((
            string_literal().map(|_| ()),
            identifier().map(|_| ()),
            number.map(|_| ()),
            list.map(|_| ()),
            map.map(|_| ()),
        )))
        .expected("constant value")
}

// Constants are validated and dropped
parser! {
    pub(crate) fn const_value[Input]()(Input) -> ()
    where [Input: Stream<Token = char>,]
    {
        const_value_()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combine::EasyParser;

    #[test]
    fn test_identifier() {
        assert_eq!(
            identifier().easy_parse("shared.Item rest"),
            Ok(("shared.Item".to_string(), " rest"))
        );
        assert!(identifier().easy_parse("1abc").is_err());
    }

    #[test]
    fn test_keyword_needs_word_boundary() {
        assert_eq!(keyword("list").easy_parse("list<i32>"), Ok(((), "<i32>")));
        assert!(keyword("list").easy_parse("listing").is_err());
    }

    #[test]
    fn test_single_quoted_string_with_escape() {
        assert_eq!(
            string_literal().easy_parse(r#"'{"title": "x"}'"#),
            Ok((r#"{"title": "x"}"#.to_string(), ""))
        );
        assert_eq!(
            string_literal().easy_parse(r#""a\"b\n""#),
            Ok(("a\"b\n".to_string(), ""))
        );
        assert!(string_literal().easy_parse("\"open").is_err());
    }

    #[test]
    fn test_int_constant() {
        assert_eq!(int_constant().easy_parse("-1"), Ok((-1, "")));
        assert_eq!(int_constant().easy_parse("0x10"), Ok((16, "")));
        assert_eq!(int_constant().easy_parse("0"), Ok((0, "")));
        assert!(int_constant().easy_parse("99999999999999999999").is_err());
    }

    #[test]
    fn test_const_values() {
        for input in [
            "10",
            "-2.5",
            "1e3",
            "'text'",
            "Status.ACTIVE",
            "[1, 2; 3]",
            "{\"a\": [1], \"b\": {}}",
            "[ ]",
        ] {
            assert_eq!(const_value().easy_parse(input), Ok(((), "")), "{}", input);
        }
    }
}
