use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::ast::*;
use crate::diagnostics::Code;
use crate::lexer::Token;

type Span = SimpleSpan;

/// Parse error with source span.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Diagnostic category.
    pub code: Code,
    /// Byte range of the offending input.
    pub span: std::ops::Range<usize>,
    /// Human-readable description.
    pub message: String,
}

fn spanned<T>(node: T, span: Span) -> Spanned<T> {
    Spanned {
        node,
        span: span.into_range(),
    }
}

/// Parser for the tokens of one line (the leading `Newline` stripped).
fn line_parser<'a, I>() -> impl Parser<'a, I, Stmt, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    let kw = |k: &'static str| select! { Token::Word(ref w) if w.as_str() == k => () }.labelled(k);
    let word = select! { Token::Word(w) => w }.labelled("name");
    let string_lit = select! { Token::Str(s) => s }.labelled("string");
    let name = word.clone().map_with(|w, e| spanned(w, e.span()));

    // label <name>:
    let label = kw("label")
        .ignore_then(name.clone())
        .then_ignore(just(Token::Colon))
        .map(Stmt::Label)
        .labelled("label");

    // menu <name>:
    let menu = kw("menu")
        .ignore_then(name.clone())
        .then_ignore(just(Token::Colon))
        .map(Stmt::Menu)
        .labelled("menu");

    // - <option>
    let choice_line = just(Token::Dash)
        .ignore_then(name)
        .map(Stmt::Choice)
        .labelled("choice");

    // jump <scene> | jump <story>.<scene>
    let target = word
        .clone()
        .separated_by(just(Token::Dot))
        .at_least(1)
        .at_most(2)
        .collect::<Vec<String>>()
        .map_with(|parts, e| spanned(parts.join("."), e.span()))
        .labelled("jump target");
    let jump = kw("jump").ignore_then(target).map(Stmt::Jump);

    let ret = kw("return").to(Stmt::Return);

    // [speaker] "text"
    let say = word
        .or_not()
        .then(string_lit)
        .map(|(speaker, text)| Stmt::Say(SayStmt { speaker, text }))
        .labelled("dialogue");

    choice((label, menu, choice_line, jump, ret, say)).then_ignore(end())
}

/// The tokens of one non-empty source line.
struct SourceLine {
    indent: usize,
    tokens: Vec<(Token, std::ops::Range<usize>)>,
    span: std::ops::Range<usize>,
}

fn split_lines(tokens: &[(Token, std::ops::Range<usize>)]) -> Vec<SourceLine> {
    let mut lines = Vec::new();
    let mut current: Option<SourceLine> = None;

    for (tok, span) in tokens {
        if let Token::Newline(indent) = tok {
            if let Some(line) = current.take()
                && !line.tokens.is_empty()
            {
                lines.push(line);
            }
            current = Some(SourceLine {
                indent: *indent,
                tokens: Vec::new(),
                span: span.end..span.end,
            });
            continue;
        }

        let line = current.get_or_insert_with(|| SourceLine {
            indent: 0,
            tokens: Vec::new(),
            span: span.start..span.start,
        });
        if line.tokens.is_empty() {
            line.span.start = span.start;
        }
        line.span.end = span.end;
        line.tokens.push((tok.clone(), span.clone()));
    }

    if let Some(line) = current
        && !line.tokens.is_empty()
    {
        lines.push(line);
    }
    lines
}

fn parse_line(line: &SourceLine) -> Result<Spanned<Stmt>, ParseError> {
    let token_iter = line
        .tokens
        .iter()
        .map(|(tok, span)| (tok.clone(), Span::from(span.clone())));

    let eoi: Span = (line.span.end..line.span.end).into();
    let stream = Stream::from_iter(token_iter).map(eoi, |(t, s): (_, _)| (t, s));

    let (output, errors) = line_parser().parse(stream).into_output_errors();

    match (output, errors.into_iter().next()) {
        (Some(stmt), None) => Ok(Spanned {
            node: stmt,
            span: line.span.clone(),
        }),
        (_, Some(e)) => Err(ParseError {
            code: Code::Syntax,
            span: e.span().into_range(),
            message: e.to_string(),
        }),
        (None, None) => Err(ParseError {
            code: Code::Syntax,
            span: line.span.clone(),
            message: "unrecognised statement".to_string(),
        }),
    }
}

/// Folds parsed lines into scenes and menu blocks by indentation.
#[derive(Default)]
struct Assembler {
    script: Script,
    scene: Option<Spanned<SceneDecl>>,
    /// Open menu block and the indentation of its header.
    menu: Option<(usize, Spanned<MenuDecl>)>,
    errors: Vec<ParseError>,
}

impl Assembler {
    fn push(&mut self, indent: usize, stmt: Spanned<Stmt>) {
        if self
            .menu
            .as_ref()
            .is_some_and(|(menu_indent, _)| indent <= *menu_indent)
        {
            self.close_menu();
        }

        let Spanned { node, span } = stmt;

        if !matches!(node, Stmt::Label(_))
            && let Some((menu_indent, mut menu)) = self.menu.take()
        {
            match node {
                Stmt::Choice(name) => {
                    menu.span.end = span.end;
                    menu.node.choices.push(name);
                }
                Stmt::Say(say) if menu.node.prompt.is_none() && menu.node.choices.is_empty() => {
                    menu.span.end = span.end;
                    menu.node.prompt = Some(Spanned { node: say, span });
                }
                Stmt::Say(_) => self.error(
                    Code::Syntax,
                    span,
                    "a menu block takes a single prompt before its choices",
                ),
                _ => self.error(
                    Code::Syntax,
                    span,
                    "only a prompt and choices may appear inside a menu block",
                ),
            }
            self.menu = Some((menu_indent, menu));
            return;
        }

        match node {
            Stmt::Label(name) => {
                self.close_menu();
                self.close_scene();
                self.scene = Some(Spanned {
                    node: SceneDecl {
                        name,
                        items: Vec::new(),
                    },
                    span,
                });
            }
            Stmt::Choice(name) => self.error(
                Code::ChoiceOutsideMenu,
                span,
                format!("choice \"{}\" is outside any menu block", name.node),
            ),
            _ if self.scene.is_none() => self.error(
                Code::StatementOutsideScene,
                span,
                "statement before the first `label`",
            ),
            Stmt::Menu(name) => {
                self.menu = Some((
                    indent,
                    Spanned {
                        node: MenuDecl {
                            name,
                            prompt: None,
                            choices: Vec::new(),
                        },
                        span,
                    },
                ));
            }
            Stmt::Say(say) => self.push_item(Item::Say(say), span),
            Stmt::Jump(target) => self.push_item(Item::Jump(target), span),
            Stmt::Return => self.push_item(Item::Return, span),
        }
    }

    fn push_item(&mut self, item: Item, span: std::ops::Range<usize>) {
        if let Some(scene) = self.scene.as_mut() {
            scene.span.end = span.end;
            scene.node.items.push(Spanned { node: item, span });
        }
    }

    fn close_menu(&mut self) {
        if let Some((_, menu)) = self.menu.take() {
            self.push_item(Item::Menu(menu.node), menu.span);
        }
    }

    fn close_scene(&mut self) {
        if let Some(scene) = self.scene.take() {
            self.script.scenes.push(scene);
        }
    }

    fn error(&mut self, code: Code, span: std::ops::Range<usize>, message: impl Into<String>) {
        self.errors.push(ParseError {
            code,
            span,
            message: message.into(),
        });
    }

    fn finish(mut self) -> (Script, Vec<ParseError>) {
        self.close_menu();
        self.close_scene();
        (self.script, self.errors)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a token stream into an AST.
pub fn parse(tokens: &[(Token, std::ops::Range<usize>)]) -> Result<Script, Vec<ParseError>> {
    let (script, errors) = parse_lenient(tokens);
    if errors.is_empty() {
        Ok(script)
    } else {
        Err(errors)
    }
}

/// Parse a token stream leniently; always returns an AST (possibly partial)
/// alongside any errors. Lines that fail to parse are skipped, so one bad
/// line does not hide errors further down.
pub fn parse_lenient(tokens: &[(Token, std::ops::Range<usize>)]) -> (Script, Vec<ParseError>) {
    let mut assembler = Assembler::default();

    for line in split_lines(tokens) {
        match parse_line(&line) {
            Ok(stmt) => assembler.push(line.indent, stmt),
            Err(e) => assembler.errors.push(e),
        }
    }

    assembler.finish()
}
