use chumsky::prelude::*;
use std::fmt;

use crate::diagnostic::{Diagnostic, Label, Span};
use crate::keywords;
use crate::token::{InfixOp, SpannedToken, Token};

/// An unrecognised character. Lexing stops at the first one; the tokens
/// scanned before it are still returned so the caller can decide what to do
/// with the partial stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexError {
    pub character: char,
    pub offset: usize,
}

impl LexError {
    pub fn span(&self) -> Span {
        Span::new(self.offset, self.offset + self.character.len_utf8())
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(format!("unrecognised character `{}`", self.character))
            .with_code("E0001")
            .with_label(Label::primary(self.span(), "lexing stopped here"))
            .with_note("tokens before this point were still produced")
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unrecognised character [{}] at character index {}",
            self.character, self.offset
        )
    }
}

impl std::error::Error for LexError {}

/// The result of a full lexing pass. `tokens` always ends with exactly one
/// `Eof`; when `error` is set the stream is the prefix scanned before the
/// offending character and callers must treat it as suspect.
#[derive(Debug, Clone, PartialEq)]
pub struct LexOutput {
    pub tokens: Vec<SpannedToken>,
    pub error: Option<LexError>,
}

pub fn lexer<'a>()
-> impl Parser<'a, &'a str, Vec<(Token, SimpleSpan)>, extra::Err<Simple<'a, char>>> {
    let number = text::digits(10)
        .to_slice()
        .map(|s: &str| Token::Number(s.parse().unwrap()));

    // No escape sequences; a string runs to the next quote, or to the end of
    // input when the closing quote is missing.
    let string = just('"')
        .ignore_then(none_of('"').repeated().collect::<String>())
        .then_ignore(just('"').or_not())
        .map(Token::String);

    // Identifiers are maximal alphabetic runs; `foo123` is two tokens.
    let word = any()
        .filter(|c: &char| c.is_alphabetic())
        .repeated()
        .at_least(1)
        .to_slice()
        .map(keywords::keyword_or_identifier);

    let symbol = choice((
        just('(').to(Token::OpenParen),
        just(')').to(Token::CloseParen),
        just('{').to(Token::OpenBrace),
        just('}').to(Token::CloseBrace),
        just('[').to(Token::OpenBracket),
        just(']').to(Token::CloseBracket),
        just('=').to(Token::Equals),
        just('.').to(Token::Dot),
        just(',').to(Token::Comma),
        just(':').to(Token::Colon),
        just(';').to(Token::SemiColon),
        just('+').to(Token::InfixOperator(InfixOp::Add)),
        just('-').to(Token::InfixOperator(InfixOp::Sub)),
        just('*').to(Token::InfixOperator(InfixOp::Mul)),
        just('/').to(Token::InfixOperator(InfixOp::Div)),
        just('%').to(Token::InfixOperator(InfixOp::Rem)),
        just('^').to(Token::InfixOperator(InfixOp::Caret)),
    ));

    let comment = just("//")
        .then(any().and_is(just('\n').not()).repeated())
        .padded();

    let token = number
        .or(string)
        .or(word)
        .or(symbol)
        .map_with(|token, e| (token, e.span()))
        .padded_by(comment.repeated())
        .padded();

    // `lazy` makes an unrecognised character end the scan with the tokens
    // collected so far instead of failing the whole parse.
    token.repeated().collect().lazy()
}

/// Tokenize `source` in a single left-to-right pass.
///
/// The returned stream is always terminated by exactly one `Eof` token. An
/// unrecognised character does not abort: lexing stops there and the partial
/// stream is returned alongside a `LexError` naming the character and its
/// offset.
pub fn tokenize(source: &str) -> LexOutput {
    let raw = lexer().parse(source).into_output().unwrap_or_default();

    let mut tokens: Vec<SpannedToken> = raw
        .into_iter()
        .map(|(token, span)| SpannedToken::new(token, Span::new(span.start, span.end)))
        .collect();

    let resume = tokens.last().map(|t| t.span.end).unwrap_or(0);
    let error = scan_unrecognised(source, resume);

    tokens.push(SpannedToken::new(
        Token::Eof,
        Span::new(source.len(), source.len()),
    ));

    LexOutput { tokens, error }
}

/// Everything between the last lexed token and the stop point is whitespace
/// or comments; the first character past those is the one the lexer rejected.
fn scan_unrecognised(source: &str, from: usize) -> Option<LexError> {
    let mut chars = source[from..].char_indices().peekable();
    while let Some((offset, character)) = chars.next() {
        if character.is_whitespace() {
            continue;
        }
        if character == '/' && matches!(chars.peek(), Some((_, '/'))) {
            for (_, skipped) in chars.by_ref() {
                if skipped == '\n' {
                    break;
                }
            }
            continue;
        }
        return Some(LexError {
            character,
            offset: from + offset,
        });
    }
    None
}
