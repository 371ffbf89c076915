/// Source span as a byte range.
pub type Span = std::ops::Range<usize>;

/// An AST node with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    /// The wrapped AST node.
    pub node: T,
    /// The byte range of this node in the source text.
    pub span: Span,
}

/// A parsed script: scene declarations in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    /// Scene declarations, duplicates included.
    pub scenes: Vec<Spanned<SceneDecl>>,
}

/// A `label <name>:` block.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDecl {
    /// The scene name.
    pub name: Spanned<String>,
    /// Items in the scene body.
    pub items: Vec<Spanned<Item>>,
}

/// One item of a scene body.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// A dialogue line.
    Say(SayStmt),
    /// A menu block.
    Menu(MenuDecl),
    /// `jump <target>`.
    Jump(Spanned<String>),
    /// `return`.
    Return,
}

/// `[speaker] "text"`.
#[derive(Debug, Clone, PartialEq)]
pub struct SayStmt {
    /// Optional speaker tag.
    pub speaker: Option<String>,
    /// Dialogue text.
    pub text: String,
}

/// A `menu <name>:` block with its indented prompt and choices.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuDecl {
    /// The menu name.
    pub name: Spanned<String>,
    /// Optional prompt line.
    pub prompt: Option<Spanned<SayStmt>>,
    /// Choice lines: option names.
    pub choices: Vec<Spanned<String>>,
}

/// A single parsed line, before block structure is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `label <name>:`.
    Label(Spanned<String>),
    /// `menu <name>:`.
    Menu(Spanned<String>),
    /// `- <option>`.
    Choice(Spanned<String>),
    /// `[speaker] "text"`.
    Say(SayStmt),
    /// `jump <target>`.
    Jump(Spanned<String>),
    /// `return`.
    Return,
}
