//! Recursive-descent parser for the DOT language.
//!
//! One public entry point exists per top-level grammar rule so callers can
//! parse sub-fragments (`parse_edge`, `parse_attribute`, ...) as well as
//! whole graphs. The stream threads two pieces of context: a line index for
//! resolving byte offsets into line/column positions, and the directedness
//! of the enclosing root, which the edge-operator rule checks at parse time.

use winnow::ModalResult;
use winnow::Parser;
use winnow::ascii::{Caseless, digit0, digit1, line_ending, multispace0, space0, till_line_ending};
use winnow::combinator::{alt, delimited, not, opt, preceded, repeat, separated, terminated};
use winnow::error::{ContextError, ErrMode, ParseError, StrContext, StrContextValue};
use winnow::stream::{LocatingSlice, Location, Stateful};
use winnow::token::{any, none_of, one_of, take_until, take_while};

use crate::ast;
use crate::ast::{Position, Span};
use crate::error::SyntaxError;
use crate::model::Compass;

/// Contract message for an undirected operator inside a `digraph`.
pub const DIGRAPH_OPERATOR_MSG: &str =
    "In digraph, it's necessary to describe with \"->\" operator to create edge.";

/// Contract message for a directed operator inside a `graph`.
pub const GRAPH_OPERATOR_MSG: &str =
    "In graph, it's necessary to describe with \"--\" operator to create edge.";

#[derive(Debug, Clone)]
struct State<'s> {
    index: &'s LineIndex,
    /// Directedness of the nearest enclosing root, once the `graph` or
    /// `digraph` keyword has been seen.
    directed: Option<bool>,
}

type Input<'s> = Stateful<LocatingSlice<&'s str>, State<'s>>;

/// Byte offsets of line starts, shared by parser and converter so line
/// counting stays consistent. `\r\n` and `\n` both end a line.
#[derive(Debug)]
pub(crate) struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    pub(crate) fn position(&self, offset: usize) -> Position {
        let line = self.line_starts.partition_point(|&s| s <= offset) - 1;
        Position {
            offset,
            line: line + 1,
            column: offset - self.line_starts[line] + 1,
        }
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span {
            start: self.position(start),
            end: self.position(end.max(start)),
        }
    }
}

// --- entry points -----------------------------------------------------------

/// Parses a whole `graph`/`digraph` (the default rule).
pub fn parse(text: &str) -> Result<ast::Graph, SyntaxError> {
    run(text, graph)
}

pub fn parse_subgraph(text: &str) -> Result<ast::Subgraph, SyntaxError> {
    run(text, subgraph)
}

pub fn parse_node(text: &str) -> Result<ast::Node, SyntaxError> {
    run(text, node)
}

pub fn parse_edge(text: &str) -> Result<ast::Edge, SyntaxError> {
    run(text, edge)
}

pub fn parse_attribute(text: &str) -> Result<ast::Attribute, SyntaxError> {
    run(text, attribute)
}

pub fn parse_attributes_block(text: &str) -> Result<ast::AttributesBlock, SyntaxError> {
    run(text, attributes_block)
}

pub fn parse_statements(text: &str) -> Result<Vec<ast::Stmt>, SyntaxError> {
    run(text, statements)
}

fn run<O>(
    text: &str,
    rule: for<'s> fn(&mut Input<'s>) -> ModalResult<O>,
) -> Result<O, SyntaxError> {
    let index = LineIndex::new(text);
    let input = Stateful {
        input: LocatingSlice::new(text),
        state: State {
            index: &index,
            directed: None,
        },
    };
    delimited(sep0, rule, trailing)
        .parse(input)
        .map_err(|err| syntax_error(text, &index, &err))
}

fn syntax_error(
    text: &str,
    index: &LineIndex,
    err: &ParseError<Input<'_>, ContextError>,
) -> SyntaxError {
    let offset = err.offset().min(text.len());
    let message = match contract_message(err.inner()) {
        Some(msg) => msg.to_string(),
        None => {
            let snippet: String = text[offset..]
                .trim_start()
                .lines()
                .next()
                .unwrap_or("")
                .chars()
                .take(40)
                .collect();
            if snippet.is_empty() {
                "syntax error: unexpected end of input".to_string()
            } else {
                format!("syntax error: unexpected `{snippet}`")
            }
        }
    };
    let pos = index.position(offset);
    SyntaxError {
        message,
        span: Span {
            start: pos,
            end: pos,
        },
    }
}

fn contract_message(err: &ContextError) -> Option<&'static str> {
    err.context().find_map(|c| match c {
        StrContext::Expected(StrContextValue::Description(d)) => Some(*d),
        _ => None,
    })
}

// --- grammar ----------------------------------------------------------------

fn graph(input: &mut Input<'_>) -> ModalResult<ast::Graph> {
    let comments: Vec<ast::Comment> =
        repeat(0.., preceded(multispace0, comment)).parse_next(input)?;
    multispace0.parse_next(input)?;

    let start = input.current_token_start();
    let strict = opt(terminated(keyword("strict"), multispace0))
        .parse_next(input)?
        .is_some();
    let directed = alt((
        keyword("digraph").value(true),
        keyword("graph").value(false),
    ))
    .parse_next(input)?;
    input.state.directed = Some(directed);

    let id = opt(preceded(multispace0, literal)).parse_next(input)?;
    multispace0.parse_next(input)?;
    '{'.parse_next(input)?;
    let body = statements(input)?;
    sep0.parse_next(input)?;
    '}'.parse_next(input)?;
    let end = input.previous_token_end();

    Ok(ast::Graph {
        id,
        directed,
        strict,
        comments,
        body,
        span: input.state.index.span(start, end),
    })
}

fn statements(input: &mut Input<'_>) -> ModalResult<Vec<ast::Stmt>> {
    repeat(0.., preceded(sep0, statement)).parse_next(input)
}

fn statement(input: &mut Input<'_>) -> ModalResult<ast::Stmt> {
    alt((
        comment.map(ast::Stmt::Comment),
        attributes_block.map(ast::Stmt::AttributesBlock),
        edge.map(ast::Stmt::Edge),
        subgraph.map(ast::Stmt::Subgraph),
        attribute.map(ast::Stmt::Attribute),
        node.map(ast::Stmt::Node),
    ))
    .parse_next(input)
}

fn subgraph(input: &mut Input<'_>) -> ModalResult<ast::Subgraph> {
    let start = input.current_token_start();
    let id = opt((
        keyword("subgraph"),
        multispace0,
        opt(literal),
    ))
    .parse_next(input)?
    .and_then(|(_, _, id)| id);
    multispace0.parse_next(input)?;
    '{'.parse_next(input)?;
    let body = statements(input)?;
    sep0.parse_next(input)?;
    '}'.parse_next(input)?;
    let end = input.previous_token_end();

    Ok(ast::Subgraph {
        id,
        body,
        span: input.state.index.span(start, end),
    })
}

fn node(input: &mut Input<'_>) -> ModalResult<ast::Node> {
    let start = input.current_token_start();
    let id = literal(input)?;
    let body = opt(preceded(multispace0, attr_lists))
        .parse_next(input)?
        .unwrap_or_default();
    let end = input.previous_token_end();

    Ok(ast::Node {
        id,
        body,
        span: input.state.index.span(start, end),
    })
}

fn edge(input: &mut Input<'_>) -> ModalResult<ast::Edge> {
    let start = input.current_token_start();
    let first = edge_target(input)?;
    let rest: Vec<ast::EdgeTarget> = repeat(
        1..,
        preceded((multispace0, edge_operator, multispace0), edge_target),
    )
    .parse_next(input)?;
    let body = opt(preceded(multispace0, attr_lists))
        .parse_next(input)?
        .unwrap_or_default();
    let end = input.previous_token_end();

    let mut targets = vec![first];
    targets.extend(rest);
    Ok(ast::Edge {
        targets,
        body,
        span: input.state.index.span(start, end),
    })
}

/// Accepts `->` or `--` and, when the enclosing root's directedness is
/// known, fails hard with the contract message on a mismatch.
fn edge_operator(input: &mut Input<'_>) -> ModalResult<bool> {
    let directed_op = alt(("->".value(true), "--".value(false))).parse_next(input)?;
    if let Some(directed) = input.state.directed {
        if directed != directed_op {
            let msg = if directed {
                DIGRAPH_OPERATOR_MSG
            } else {
                GRAPH_OPERATOR_MSG
            };
            let mut err = ContextError::new();
            err.push(StrContext::Expected(StrContextValue::Description(msg)));
            return Err(ErrMode::Cut(err));
        }
    }
    Ok(directed_op)
}

fn edge_target(input: &mut Input<'_>) -> ModalResult<ast::EdgeTarget> {
    alt((
        node_ref_group.map(ast::EdgeTarget::Group),
        node_ref.map(ast::EdgeTarget::Ref),
    ))
    .parse_next(input)
}

fn node_ref_group(input: &mut Input<'_>) -> ModalResult<ast::NodeRefGroup> {
    let start = input.current_token_start();
    '{'.parse_next(input)?;
    let body: Vec<ast::NodeRef> = repeat(1.., preceded(sep0, node_ref)).parse_next(input)?;
    sep0.parse_next(input)?;
    '}'.parse_next(input)?;
    let end = input.previous_token_end();

    Ok(ast::NodeRefGroup {
        body,
        span: input.state.index.span(start, end),
    })
}

fn node_ref(input: &mut Input<'_>) -> ModalResult<ast::NodeRef> {
    let start = input.current_token_start();
    let id = literal(input)?;
    let mut port = None;
    let mut compass = None;
    if opt(colon).parse_next(input)?.is_some() {
        if opt(colon).parse_next(input)?.is_some() {
            compass = Some(compass_literal(input)?);
        } else {
            let first = preceded(multispace0, literal).parse_next(input)?;
            port = Some(first);
            if opt(colon).parse_next(input)?.is_some() {
                compass = Some(compass_literal(input)?);
            }
        }
    }
    let end = input.previous_token_end();

    Ok(ast::NodeRef {
        id,
        port,
        compass,
        span: input.state.index.span(start, end),
    })
}

fn colon(input: &mut Input<'_>) -> ModalResult<char> {
    preceded(multispace0, ':').parse_next(input)
}

fn compass_literal(input: &mut Input<'_>) -> ModalResult<ast::Literal> {
    preceded(
        multispace0,
        literal.verify(|l: &ast::Literal| Compass::parse(&l.value).is_some()),
    )
    .parse_next(input)
}

fn attribute(input: &mut Input<'_>) -> ModalResult<ast::Attribute> {
    let start = input.current_token_start();
    let key = literal(input)?;
    preceded(multispace0, '=').parse_next(input)?;
    let value = preceded(multispace0, literal).parse_next(input)?;
    let end = input.previous_token_end();

    Ok(ast::Attribute {
        key,
        value,
        span: input.state.index.span(start, end),
    })
}

fn attributes_block(input: &mut Input<'_>) -> ModalResult<ast::AttributesBlock> {
    let start = input.current_token_start();
    let kind = alt((
        keyword("graph").value(ast::AttrKind::Graph),
        keyword("node").value(ast::AttrKind::Node),
        keyword("edge").value(ast::AttrKind::Edge),
    ))
    .parse_next(input)?;
    let body = preceded(multispace0, attr_lists).parse_next(input)?;
    let end = input.previous_token_end();

    Ok(ast::AttributesBlock {
        kind,
        body,
        span: input.state.index.span(start, end),
    })
}

/// One or more consecutive `[...]` groups, flattened in order.
fn attr_lists(input: &mut Input<'_>) -> ModalResult<Vec<ast::Attribute>> {
    let groups: Vec<Vec<ast::Attribute>> =
        repeat(1.., preceded(multispace0, bracket_group)).parse_next(input)?;
    Ok(groups.into_iter().flatten().collect())
}

fn bracket_group(input: &mut Input<'_>) -> ModalResult<Vec<ast::Attribute>> {
    '['.parse_next(input)?;
    let items: Vec<ast::Attribute> =
        repeat(0.., preceded(sep0, attribute)).parse_next(input)?;
    sep0.parse_next(input)?;
    ']'.parse_next(input)?;
    Ok(items)
}

// --- literals ---------------------------------------------------------------

fn literal(input: &mut Input<'_>) -> ModalResult<ast::Literal> {
    let start = input.current_token_start();
    let (value, kind) = alt((
        quoted_concat.map(|v| (v, ast::LiteralKind::Quoted)),
        html_string.map(|v| (v, ast::LiteralKind::Html)),
        numeral.map(|v: &str| (v.to_string(), ast::LiteralKind::Bare)),
        bare_identifier.map(|v: &str| (v.to_string(), ast::LiteralKind::Bare)),
    ))
    .parse_next(input)?;
    let end = input.previous_token_end();

    Ok(ast::Literal {
        value,
        kind,
        span: input.state.index.span(start, end),
    })
}

/// `"a" + "b"` concatenates into one quoted literal.
fn quoted_concat(input: &mut Input<'_>) -> ModalResult<String> {
    let parts: Vec<String> =
        separated(1.., quoted_string, (multispace0, '+', multispace0)).parse_next(input)?;
    Ok(parts.concat())
}

fn quoted_string(input: &mut Input<'_>) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let value = repeat(0.., quoted_piece)
        .fold(String::new, |mut acc, piece: QuotedPiece| {
            match piece {
                QuotedPiece::Ch(c) => acc.push(c),
                QuotedPiece::Quote => acc.push('"'),
                QuotedPiece::Newline => acc.push('\n'),
                QuotedPiece::Continuation => {}
                QuotedPiece::Escaped(c) => {
                    acc.push('\\');
                    acc.push(c);
                }
            }
            acc
        })
        .parse_next(input)?;
    '"'.parse_next(input)?;
    Ok(value)
}

#[derive(Clone)]
enum QuotedPiece {
    Ch(char),
    Quote,
    Newline,
    /// Backslash-newline: the line break disappears.
    Continuation,
    /// Any other escape is kept as written.
    Escaped(char),
}

fn quoted_piece(input: &mut Input<'_>) -> ModalResult<QuotedPiece> {
    alt((
        preceded(
            '\\',
            alt((
                '"'.value(QuotedPiece::Quote),
                'n'.value(QuotedPiece::Newline),
                line_ending.value(QuotedPiece::Continuation),
                any.map(QuotedPiece::Escaped),
            )),
        ),
        none_of('"').map(QuotedPiece::Ch),
    ))
    .parse_next(input)
}

/// `<...>` with balanced angle brackets; the contents are not parsed as
/// HTML, only bracket-balanced.
fn html_string(input: &mut Input<'_>) -> ModalResult<String> {
    '<'.parse_next(input)?;
    let mut value = String::from("<");
    let mut depth = 1usize;
    while depth > 0 {
        let c: char = any.parse_next(input)?;
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            _ => {}
        }
        value.push(c);
    }
    Ok(value)
}

fn numeral<'s>(input: &mut Input<'s>) -> ModalResult<&'s str> {
    terminated(
        (
            opt('-'),
            alt((('.', digit1).void(), (digit1, opt(('.', digit0))).void())),
        )
            .take(),
        not(one_of(is_ident_char)),
    )
    .parse_next(input)
}

fn bare_identifier<'s>(input: &mut Input<'s>) -> ModalResult<&'s str> {
    take_while(1.., is_ident_char)
        .verify(|s: &str| !s.starts_with(|c: char| c.is_ascii_digit()) && !is_keyword(s))
        .parse_next(input)
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c >= '\u{80}'
}

pub(crate) fn is_keyword(s: &str) -> bool {
    ["strict", "graph", "digraph", "subgraph", "node", "edge"]
        .iter()
        .any(|k| s.eq_ignore_ascii_case(k))
}

fn keyword<'s>(kw: &'static str) -> impl Parser<Input<'s>, &'s str, ErrMode<ContextError>> {
    terminated(Caseless(kw), not(one_of(is_ident_char)))
}

// --- comments ---------------------------------------------------------------

fn comment(input: &mut Input<'_>) -> ModalResult<ast::Comment> {
    alt((block_comment, slash_comment, macro_comment)).parse_next(input)
}

fn block_comment(input: &mut Input<'_>) -> ModalResult<ast::Comment> {
    let start = input.current_token_start();
    "/*".parse_next(input)?;
    let inner = take_until(0.., "*/").parse_next(input)?;
    "*/".parse_next(input)?;
    let end = input.previous_token_end();

    Ok(ast::Comment {
        kind: ast::CommentKind::Block,
        value: strip_block_decoration(inner),
        span: input.state.index.span(start, end),
    })
}

fn slash_comment(input: &mut Input<'_>) -> ModalResult<ast::Comment> {
    line_comment_run(input, "//", ast::CommentKind::Slash)
}

fn macro_comment(input: &mut Input<'_>) -> ModalResult<ast::Comment> {
    line_comment_run(input, "#", ast::CommentKind::Macro)
}

/// Collapses a run of consecutive marker lines into one comment. The run
/// swallows its trailing newline, so the span ends on the following line;
/// the converter's adjacency rules rely on that.
fn line_comment_run(
    input: &mut Input<'_>,
    marker: &'static str,
    kind: ast::CommentKind,
) -> ModalResult<ast::Comment> {
    let start = input.current_token_start();
    let first = preceded(marker, till_line_ending).parse_next(input)?;
    let mut lines = vec![first.trim().to_string()];
    while let Some((_, _, line)) =
        opt((line_ending, space0, preceded(marker, till_line_ending))).parse_next(input)?
    {
        lines.push(line.trim().to_string());
    }
    opt(line_ending).parse_next(input)?;
    let end = input.previous_token_end();

    Ok(ast::Comment {
        kind,
        value: lines.join("\n"),
        span: input.state.index.span(start, end),
    })
}

fn strip_block_decoration(inner: &str) -> String {
    let mut lines: Vec<&str> = inner
        .lines()
        .map(|l| l.trim().trim_start_matches('*').trim())
        .collect();
    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

// --- separators -------------------------------------------------------------

fn is_sep_char(c: char) -> bool {
    c.is_whitespace() || c == ';' || c == ','
}

fn sep0(input: &mut Input<'_>) -> ModalResult<()> {
    take_while(0.., is_sep_char).void().parse_next(input)
}

/// Trailing separators and comments after a fragment are consumed and
/// dropped.
fn trailing(input: &mut Input<'_>) -> ModalResult<()> {
    repeat(
        0..,
        alt((take_while(1.., is_sep_char).void(), comment.void())),
    )
    .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AttrKind, CommentKind, EdgeTarget, LiteralKind, Stmt};
    use pretty_assertions::assert_eq;

    // --- literals ---

    #[test]
    fn parse_bare_identifier_literal() {
        let lit = run("abc_1", literal).unwrap();
        assert_eq!(lit.value, "abc_1");
        assert_eq!(lit.kind, LiteralKind::Bare);
    }

    #[test]
    fn parse_numeral_literals() {
        for n in ["1", "-1", "1.5", ".5", "-0.2", "10."] {
            let lit = run(n, literal).unwrap();
            assert_eq!(lit.value, n);
            assert_eq!(lit.kind, LiteralKind::Bare);
        }
    }

    #[test]
    fn parse_quoted_literal_with_escapes() {
        let lit = run(r#""a\"b""#, literal).unwrap();
        assert_eq!(lit.value, "a\"b");
        assert_eq!(lit.kind, LiteralKind::Quoted);
    }

    #[test]
    fn parse_quoted_newline_escape() {
        let lit = run(r#""a\nb""#, literal).unwrap();
        assert_eq!(lit.value, "a\nb");
    }

    #[test]
    fn parse_quoted_keeps_unknown_escapes() {
        let lit = run(r#""a\lb""#, literal).unwrap();
        assert_eq!(lit.value, "a\\lb");
    }

    #[test]
    fn parse_quoted_line_continuation() {
        let lit = run("\"ab\\\ncd\"", literal).unwrap();
        assert_eq!(lit.value, "abcd");
    }

    #[test]
    fn parse_quoted_concatenation() {
        let lit = run(r#""foo" + "bar""#, literal).unwrap();
        assert_eq!(lit.value, "foobar");
        assert_eq!(lit.kind, LiteralKind::Quoted);
    }

    #[test]
    fn parse_html_literal_nested_brackets() {
        let lit = run("<<table><tr></tr></table>>", literal).unwrap();
        assert_eq!(lit.value, "<<table><tr></tr></table>>");
        assert_eq!(lit.kind, LiteralKind::Html);
    }

    #[test]
    fn unbalanced_html_fails() {
        assert!(run("<<b>", literal).is_err());
    }

    #[test]
    fn keywords_rejected_as_bare_ids() {
        assert!(run("graph", literal).is_err());
        assert!(run("SUBGRAPH", literal).is_err());
    }

    // --- node rule ---

    #[test]
    fn parse_node_plain() {
        let n = parse_node("a;").unwrap();
        assert_eq!(n.id.value, "a");
        assert!(n.body.is_empty());
    }

    #[test]
    fn parse_node_with_attributes() {
        let n = parse_node(r#"a[label="x #1"];"#).unwrap();
        assert_eq!(n.body.len(), 1);
        assert_eq!(n.body[0].key.value, "label");
        assert_eq!(n.body[0].value.value, "x #1");
        assert_eq!(n.body[0].value.kind, LiteralKind::Quoted);
    }

    #[test]
    fn parse_node_with_repeated_bracket_groups() {
        let n = parse_node("a [color=red] [shape=box]").unwrap();
        let keys: Vec<&str> = n.body.iter().map(|a| a.key.value.as_str()).collect();
        assert_eq!(keys, vec!["color", "shape"]);
    }

    // --- edge rule ---

    #[test]
    fn parse_edge_pair() {
        let e = parse_edge("a -> b").unwrap();
        assert_eq!(e.targets.len(), 2);
    }

    #[test]
    fn parse_edge_chain_is_one_edge() {
        let e = parse_edge("a -> b -> c").unwrap();
        assert_eq!(e.targets.len(), 3);
    }

    #[test]
    fn parse_edge_with_ports_and_compass() {
        let e = parse_edge("a:p1:w -> b::n").unwrap();
        match &e.targets[0] {
            EdgeTarget::Ref(r) => {
                assert_eq!(r.id.value, "a");
                assert_eq!(r.port.as_ref().unwrap().value, "p1");
                assert_eq!(r.compass.as_ref().unwrap().value, "w");
            }
            other => panic!("expected Ref, got {other:?}"),
        }
        match &e.targets[1] {
            EdgeTarget::Ref(r) => {
                assert_eq!(r.id.value, "b");
                assert!(r.port.is_none());
                assert_eq!(r.compass.as_ref().unwrap().value, "n");
            }
            other => panic!("expected Ref, got {other:?}"),
        }
    }

    #[test]
    fn parse_edge_grouped_targets() {
        let e = parse_edge("{a1, a2} -> {b1, b2};").unwrap();
        assert_eq!(e.targets.len(), 2);
        match &e.targets[0] {
            EdgeTarget::Group(g) => {
                let ids: Vec<&str> = g.body.iter().map(|r| r.id.value.as_str()).collect();
                assert_eq!(ids, vec!["a1", "a2"]);
            }
            other => panic!("expected Group, got {other:?}"),
        }
    }

    #[test]
    fn parse_edge_with_attributes() {
        let e = parse_edge("a -> b [weight=2]").unwrap();
        assert_eq!(e.body.len(), 1);
        assert_eq!(e.body[0].key.value, "weight");
    }

    #[test]
    fn standalone_edge_accepts_both_operators() {
        assert!(parse_edge("a -> b").is_ok());
        assert!(parse_edge("a -- b").is_ok());
    }

    // --- operator/directedness invariant ---

    #[test]
    fn digraph_rejects_undirected_operator() {
        let err = parse("digraph { a -- b; }").unwrap_err();
        assert_eq!(err.message, DIGRAPH_OPERATOR_MSG);
    }

    #[test]
    fn graph_rejects_directed_operator() {
        let err = parse("graph { a -> b; }").unwrap_err();
        assert_eq!(err.message, GRAPH_OPERATOR_MSG);
    }

    #[test]
    fn mismatch_detected_in_nested_subgraph() {
        let err = parse("digraph { subgraph s { a -- b; } }").unwrap_err();
        assert_eq!(err.message, DIGRAPH_OPERATOR_MSG);
    }

    // --- graph rule ---

    #[test]
    fn parse_minimal_digraph() {
        let g = parse("digraph { a -> b; }").unwrap();
        assert!(g.directed);
        assert!(!g.strict);
        assert_eq!(g.body.len(), 1);
        assert!(matches!(g.body[0], Stmt::Edge(_)));
    }

    #[test]
    fn parse_strict_graph_with_id() {
        let g = parse("strict graph g1 {}").unwrap();
        assert!(g.strict);
        assert!(!g.directed);
        assert_eq!(g.id.as_ref().unwrap().value, "g1");
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let g = parse("STRICT DiGraph {}").unwrap();
        assert!(g.strict);
        assert!(g.directed);
    }

    #[test]
    fn parse_graph_with_quoted_id() {
        let g = parse("digraph \"my graph\" {}").unwrap();
        assert_eq!(g.id.as_ref().unwrap().value, "my graph");
    }

    #[test]
    fn statement_separators_are_insignificant() {
        let g = parse("digraph { a; b, c }").unwrap();
        assert_eq!(g.body.len(), 3);
    }

    #[test]
    fn parse_attribute_statement_in_body() {
        let g = parse("digraph { rankdir = LR; }").unwrap();
        assert!(matches!(g.body[0], Stmt::Attribute(_)));
    }

    #[test]
    fn parse_attributes_block_statement() {
        let b = parse_attributes_block("node [shape=box, color=red]").unwrap();
        assert_eq!(b.kind, AttrKind::Node);
        assert_eq!(b.body.len(), 2);
    }

    #[test]
    fn parse_anonymous_subgraph() {
        let g = parse("digraph { { a; b } }").unwrap();
        match &g.body[0] {
            Stmt::Subgraph(s) => {
                assert!(s.id.is_none());
                assert_eq!(s.body.len(), 2);
            }
            other => panic!("expected Subgraph, got {other:?}"),
        }
    }

    #[test]
    fn parse_subgraph_keyword_form() {
        let s = parse_subgraph("subgraph cluster_0 { a; }").unwrap();
        assert_eq!(s.id.as_ref().unwrap().value, "cluster_0");
    }

    #[test]
    fn syntax_error_carries_location() {
        let err = parse("digraph {\n  a -> ;\n}").unwrap_err();
        assert_eq!(err.span.start.line, 2);
        assert!(err.message.contains("syntax error"));
    }

    // --- comments ---

    #[test]
    fn slash_comment_run_collapses() {
        let stmts = parse_statements("// one\n// two\na;").unwrap();
        assert_eq!(stmts.len(), 2);
        match &stmts[0] {
            Stmt::Comment(c) => {
                assert_eq!(c.kind, CommentKind::Slash);
                assert_eq!(c.value, "one\ntwo");
            }
            other => panic!("expected Comment, got {other:?}"),
        }
    }

    #[test]
    fn macro_comment_run_collapses() {
        let stmts = parse_statements("# one\n# two\n").unwrap();
        match &stmts[0] {
            Stmt::Comment(c) => {
                assert_eq!(c.kind, CommentKind::Macro);
                assert_eq!(c.value, "one\ntwo");
            }
            other => panic!("expected Comment, got {other:?}"),
        }
    }

    #[test]
    fn blank_line_splits_comment_runs() {
        let stmts = parse_statements("// one\n\n// two\n").unwrap();
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn block_comment_decoration_stripped() {
        let stmts = parse_statements("/**\n * hello\n * world\n */\n").unwrap();
        match &stmts[0] {
            Stmt::Comment(c) => {
                assert_eq!(c.kind, CommentKind::Block);
                assert_eq!(c.value, "hello\nworld");
            }
            other => panic!("expected Comment, got {other:?}"),
        }
    }

    #[test]
    fn slash_comment_span_ends_on_following_line() {
        let stmts = parse_statements("// hi\na;").unwrap();
        match (&stmts[0], &stmts[1]) {
            (Stmt::Comment(c), Stmt::Node(n)) => {
                assert_eq!(c.span.end.line, 2);
                assert_eq!(n.span.start.line, 2);
            }
            other => panic!("unexpected statements: {other:?}"),
        }
    }

    #[test]
    fn block_comment_span_ends_on_its_own_line() {
        let stmts = parse_statements("/* hi */\na;").unwrap();
        match (&stmts[0], &stmts[1]) {
            (Stmt::Comment(c), Stmt::Node(n)) => {
                assert_eq!(c.span.end.line, 1);
                assert_eq!(n.span.start.line, 2);
            }
            other => panic!("unexpected statements: {other:?}"),
        }
    }

    #[test]
    fn graph_leading_comments_collected() {
        let g = parse("// title\ndigraph {}").unwrap();
        assert_eq!(g.comments.len(), 1);
        assert_eq!(g.comments[0].value, "title");
    }

    // --- spans ---

    #[test]
    fn node_span_is_one_based() {
        let n = parse_node("a").unwrap();
        assert_eq!(n.span.start.line, 1);
        assert_eq!(n.span.start.column, 1);
        assert_eq!(n.span.end.offset, 1);
    }

    #[test]
    fn crlf_line_endings_count_lines() {
        let stmts = parse_statements("// hi\r\na;").unwrap();
        match &stmts[1] {
            Stmt::Node(n) => assert_eq!(n.span.start.line, 2),
            other => panic!("expected Node, got {other:?}"),
        }
    }
}
