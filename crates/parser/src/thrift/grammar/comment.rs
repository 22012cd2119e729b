use combine::parser::char::{char, space, string};
use combine::{attempt, choice, many, none_of, not_followed_by, one_of, optional, skip_many};
use combine::{Parser, Stream};

/// Whitespace and comments, discarded
pub(crate) fn skip_trivia<Input>() -> impl Parser<Input, Output = ()>
where
    Input: Stream<Token = char>,
{
    skip_many(choice((space().map(|_| ()), comment().map(|_| ()))))
}

/// Whitespace and comments, keeping the comment text as a doc string
pub(crate) fn doc_comment<Input>() -> impl Parser<Input, Output = String>
where
    Input: Stream<Token = char>,
{
    many(choice((space().map(|_| None), comment().map(Some)))).map(
        |parts: Vec<Option<String>>| {
            parts
                .into_iter()
                .flatten()
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        },
    )
}

/// A comment starting on the current line
pub(crate) fn trailing_comment<Input>() -> impl Parser<Input, Output = Option<String>>
where
    Input: Stream<Token = char>,
{
    optional(attempt(
        skip_many(one_of(" \t".chars())).with(comment()),
    ))
}

fn comment<Input>() -> impl Parser<Input, Output = String>
where
    Input: Stream<Token = char>,
{
    choice((line_comment(), block_comment()))
}

fn line_comment<Input>() -> impl Parser<Input, Output = String>
where
    Input: Stream<Token = char>,
{
    choice((attempt(string("//")).map(|_| ()), char('#').map(|_| ())))
        .with(many(none_of(vec!['\n'])))
        .map(|text: String| text.trim().to_string())
}

fn block_comment<Input>() -> impl Parser<Input, Output = String>
where
    Input: Stream<Token = char>,
{
    attempt(string("/*"))
        .with(many(choice((
            none_of(vec!['*']),
            attempt(char('*').skip(not_followed_by(char('/')))),
        ))))
        .skip(string("*/"))
        .map(|body: String| clean_block_comment(&body))
}

/// Strip the common indent and each line's leading `*`
fn clean_block_comment(body: &str) -> String {
    let lines: Vec<&str> = body.lines().collect();
    let min_indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let stripped: Vec<String> = lines
        .iter()
        .map(|l| {
            let line = l.get(min_indent..).unwrap_or(l);
            let line = line.trim_start();
            line.strip_prefix('*').unwrap_or(line).trim().to_string()
        })
        .collect();

    stripped.join("\n").trim().to_string()
}
