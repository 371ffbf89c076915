use logos::Logos;
use std::fmt;

/// Token type for Fabula scripts.
///
/// Keywords (`label`, `menu`, `jump`, `return`) are plain `Word`s; the parser
/// recognises them by position. Indentation only matters at line starts, so
/// it rides on the `Newline` token that opens each line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Start of a line, carrying its indentation width.
    Newline(usize),
    /// Colon `:` closing a `label` or `menu` header.
    Colon,
    /// Dash `-` opening a choice line.
    Dash,
    /// Dot `.` inside a `story.scene` target.
    Dot,
    /// Double-quoted string literal.
    Str(String),
    /// Bare word (identifier or keyword).
    Word(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Newline(_) => write!(f, "newline"),
            Token::Colon => write!(f, ":"),
            Token::Dash => write!(f, "-"),
            Token::Dot => write!(f, "."),
            Token::Str(s) => write!(f, "\"{s}\""),
            Token::Word(w) => write!(f, "{w}"),
        }
    }
}

/// Columns a tab advances the indentation by.
pub const TAB_WIDTH: usize = 4;

#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"#[^\n]*")]
enum RawToken {
    #[regex(r"\n[ \t]*")]
    Newline,

    #[token(":")]
    Colon,

    #[token("-")]
    Dash,

    #[token(".")]
    Dot,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,

    #[regex(r#""([^"\\\n]|\\.)*"#)]
    UnterminatedStr,

    #[regex(r"[\p{XID_Start}_]\p{XID_Continue}*")]
    Word,
}

/// A lexer error with source location.
#[derive(Debug, Clone)]
pub struct LexError {
    /// Byte range of the erroneous input in the source.
    pub span: std::ops::Range<usize>,
    /// Human-readable description of the lexer error.
    pub message: String,
}

/// Lex source code into a sequence of `(Token, Span)` pairs.
///
/// Every line, including the first, is opened by a `Newline` token. Lexing
/// continues past errors so all of them can be reported at once.
pub fn lex(source: &str) -> (Vec<(Token, std::ops::Range<usize>)>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    let first_indent = indent_width(
        source
            .split('\n')
            .next()
            .map(|line| &line[..line.len() - line.trim_start_matches([' ', '\t']).len()])
            .unwrap_or(""),
    );
    tokens.push((Token::Newline(first_indent), 0..0));

    let mut lexer = RawToken::lexer(source);
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(raw) => {
                let token = match raw {
                    RawToken::Newline => Token::Newline(indent_width(&lexer.slice()[1..])),
                    RawToken::Colon => Token::Colon,
                    RawToken::Dash => Token::Dash,
                    RawToken::Dot => Token::Dot,
                    RawToken::Str => {
                        let slice = lexer.slice();
                        Token::Str(unescape(&slice[1..slice.len() - 1]))
                    }
                    RawToken::UnterminatedStr => {
                        errors.push(LexError {
                            span: span.clone(),
                            message: "unterminated string (missing closing \")".to_string(),
                        });
                        continue;
                    }
                    RawToken::Word => Token::Word(lexer.slice().to_string()),
                };
                tokens.push((token, span));
            }
            Err(()) => {
                errors.push(LexError {
                    span: span.clone(),
                    message: format!("unexpected character: {:?}", &source[span.clone()]),
                });
            }
        }
    }

    (tokens, errors)
}

fn indent_width(whitespace: &str) -> usize {
    whitespace
        .chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

/// Process escape sequences in a string literal.
///
/// Supports `\\`, `\n`, `\t`, `\"`. Unknown sequences are kept as-is.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
