//! Concrete syntax tree produced by the parser.
//!
//! Every node carries a [`Span`] pointing back into the source text so that
//! later passes (comment attachment in particular) can reason about line
//! adjacency. AST nodes are plain immutable values; the mutable graph lives
//! in [`crate::model`].

/// A location in the source text. `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// Half-open source range: `end` points just past the last consumed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// Bare identifier or numeral, written without quotes.
    Bare,
    /// Double-quoted string.
    Quoted,
    /// HTML-like string delimited by balanced angle brackets.
    Html,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: String,
    pub kind: LiteralKind,
    pub span: Span,
}

impl Literal {
    /// Builds a literal without a source location, for hand-assembled ASTs.
    pub fn new(value: impl Into<String>, kind: LiteralKind) -> Self {
        Self {
            value: value.into(),
            kind,
            span: Span::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub id: Option<Literal>,
    pub directed: bool,
    pub strict: bool,
    /// Comments written above the `graph`/`digraph` keyword.
    pub comments: Vec<Comment>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subgraph {
    pub id: Option<Literal>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: Literal,
    pub body: Vec<Attribute>,
    pub span: Span,
}

/// A chain `a -> b -> c` stays one `Edge` with three targets. Callers that
/// need per-pair edges derive them from the target list.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub targets: Vec<EdgeTarget>,
    pub body: Vec<Attribute>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EdgeTarget {
    Ref(NodeRef),
    Group(NodeRefGroup),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeRef {
    pub id: Literal,
    pub port: Option<Literal>,
    pub compass: Option<Literal>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeRefGroup {
    pub body: Vec<NodeRef>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub key: Literal,
    pub value: Literal,
    pub span: Span,
}

/// Which default-attribute store a `graph`/`node`/`edge [...]` block feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    Graph,
    Node,
    Edge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributesBlock {
    pub kind: AttrKind,
    pub body: Vec<Attribute>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `/* ... */`, possibly spanning lines.
    Block,
    /// A run of consecutive `// ...` lines.
    Slash,
    /// A run of consecutive `# ...` lines.
    Macro,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub kind: CommentKind,
    pub value: String,
    pub span: Span,
}

/// One statement inside a cluster body.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Subgraph(Subgraph),
    Attribute(Attribute),
    Node(Node),
    Edge(Edge),
    AttributesBlock(AttributesBlock),
    Comment(Comment),
}
