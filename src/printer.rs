//! DOT serialization.
//!
//! Two serializers share one output style. [`print`] renders the object
//! model in canonical order: cluster attributes, then `graph`/`node`/`edge`
//! default blocks, then nodes, subgraphs and edges, each in insertion
//! order. [`print_ast`] renders a parsed tree and keeps the source
//! statement order instead.
//!
//! Identifiers and values are written bare when DOT allows it and quoted
//! otherwise; HTML-like values pass through verbatim. Bodies indent by two
//! spaces per level, and an empty body collapses to `{}` on the header
//! line.

use crate::ast;
use crate::attr::{AttributeStore, dot_id, quote};
use crate::model::{Cluster, Edge, EdgeTarget, Graph, Node, NodeRef, Subgraph};

#[derive(Clone, Copy)]
struct Ctx {
    directed: bool,
    indent: usize,
}

impl Ctx {
    fn pad(self) -> String {
        "  ".repeat(self.indent)
    }

    fn op(self) -> &'static str {
        if self.directed { " -> " } else { " -- " }
    }

    fn nested(self) -> Self {
        Ctx {
            indent: self.indent + 1,
            ..self
        }
    }
}

/// Serializes a model graph.
pub fn print(graph: &Graph) -> String {
    let mut out = Vec::new();
    if let Some(comment) = graph.comment() {
        comment_lines(&mut out, "", comment);
    }
    let mut header = String::new();
    if graph.is_strict() {
        header.push_str("strict ");
    }
    header.push_str(if graph.is_directed() {
        "digraph"
    } else {
        "graph"
    });
    if let Some(id) = graph.id() {
        header.push(' ');
        header.push_str(&dot_id(id));
    }
    let ctx = Ctx {
        directed: graph.is_directed(),
        indent: 1,
    };
    let body = cluster_lines(graph, ctx);
    push_braced(&mut out, header, body, "");
    out.join("\n")
}

fn cluster_lines(cluster: &Cluster, ctx: Ctx) -> Vec<String> {
    let mut out = Vec::new();
    let pad = ctx.pad();
    for (key, value) in cluster.attrs().iter() {
        out.push(format!("{pad}{} = {};", dot_id(key), value.to_dot()));
    }
    for (keyword, store) in [
        ("graph", cluster.graph_defaults()),
        ("node", cluster.node_defaults()),
        ("edge", cluster.edge_defaults()),
    ] {
        if !store.is_empty() || store.comment().is_some() {
            out.push(format!("{pad}{keyword} ["));
            attr_block_lines(&mut out, store, ctx.nested());
            out.push(format!("{pad}];"));
        }
    }
    for node in cluster.nodes() {
        node_lines(&mut out, node, ctx);
    }
    for subgraph in cluster.subgraphs() {
        subgraph_lines(&mut out, subgraph, ctx);
    }
    for edge in cluster.edges() {
        edge_lines(&mut out, edge, ctx);
    }
    out
}

fn node_lines(out: &mut Vec<String>, node: &Node, ctx: Ctx) {
    let pad = ctx.pad();
    if let Some(comment) = node.comment() {
        comment_lines(out, &pad, comment);
    }
    entity_lines(out, dot_id(node.id()), node.attrs(), ctx);
}

fn edge_lines(out: &mut Vec<String>, edge: &Edge, ctx: Ctx) {
    let pad = ctx.pad();
    if let Some(comment) = edge.comment() {
        comment_lines(out, &pad, comment);
    }
    let head = edge
        .targets()
        .iter()
        .map(target_token)
        .collect::<Vec<_>>()
        .join(ctx.op());
    entity_lines(out, head, edge.attrs(), ctx);
}

/// `head;` when there is nothing to say in brackets, a multi-line
/// `head [ ... ];` block otherwise.
fn entity_lines(out: &mut Vec<String>, head: String, attrs: &AttributeStore, ctx: Ctx) {
    let pad = ctx.pad();
    if attrs.is_empty() && attrs.comment().is_none() {
        out.push(format!("{pad}{head};"));
    } else {
        out.push(format!("{pad}{head} ["));
        attr_block_lines(out, attrs, ctx.nested());
        out.push(format!("{pad}];"));
    }
}

fn attr_block_lines(out: &mut Vec<String>, store: &AttributeStore, ctx: Ctx) {
    let pad = ctx.pad();
    if let Some(comment) = store.comment() {
        comment_lines(out, &pad, comment);
    }
    for (key, value) in store.iter() {
        out.push(format!("{pad}{} = {},", dot_id(key), value.to_dot()));
    }
}

fn subgraph_lines(out: &mut Vec<String>, subgraph: &Subgraph, ctx: Ctx) {
    let pad = ctx.pad();
    if let Some(comment) = subgraph.comment() {
        comment_lines(out, &pad, comment);
    }
    let mut header = format!("{pad}subgraph ");
    if let Some(id) = subgraph.id() {
        header.push_str(&dot_id(id));
        header.push(' ');
    }
    let body = cluster_lines(subgraph, ctx.nested());
    push_braced_raw(out, header, body, &pad);
}

fn target_token(target: &EdgeTarget) -> String {
    match target {
        EdgeTarget::Node(r) => ref_token(r),
        EdgeTarget::Group(refs) => {
            let inner = refs.iter().map(ref_token).collect::<Vec<_>>().join(" ");
            format!("{{{inner}}}")
        }
    }
}

/// `id[:port][:compass]`. A compass without a port keeps its slot empty
/// (`a::n`), so the text reads back as a compass rather than a port.
fn ref_token(r: &NodeRef) -> String {
    let mut out = dot_id(&r.id);
    if let Some(port) = &r.port {
        out.push(':');
        out.push_str(&dot_id(port));
    } else if r.compass.is_some() {
        out.push(':');
    }
    if let Some(compass) = r.compass {
        out.push(':');
        out.push_str(compass.as_str());
    }
    out
}

fn comment_lines(out: &mut Vec<String>, pad: &str, text: &str) {
    if text.is_empty() {
        out.push(format!("{pad}//"));
        return;
    }
    for line in text.lines() {
        if line.is_empty() {
            out.push(format!("{pad}//"));
        } else {
            out.push(format!("{pad}// {line}"));
        }
    }
}

/// `header {}` when the body is empty, a braced block otherwise. The
/// header is expected not to end in a space.
fn push_braced(out: &mut Vec<String>, header: String, body: Vec<String>, pad: &str) {
    if body.is_empty() {
        out.push(format!("{header} {{}}"));
    } else {
        out.push(format!("{header} {{"));
        out.extend(body);
        out.push(format!("{pad}}}"));
    }
}

/// Same as [`push_braced`], for headers that already carry their
/// trailing space (`subgraph `, `subgraph id `).
fn push_braced_raw(out: &mut Vec<String>, header: String, body: Vec<String>, pad: &str) {
    if body.is_empty() {
        out.push(format!("{header}{{}}"));
    } else {
        out.push(format!("{header}{{"));
        out.extend(body);
        out.push(format!("{pad}}}"));
    }
}

// --- syntax tree side -------------------------------------------------------

/// Serializes a parsed graph, statement for statement.
pub fn print_ast(graph: &ast::Graph) -> String {
    let mut out = Vec::new();
    for comment in &graph.comments {
        ast_comment_lines(&mut out, "", comment);
    }
    let mut header = String::new();
    if graph.strict {
        header.push_str("strict ");
    }
    header.push_str(if graph.directed { "digraph" } else { "graph" });
    if let Some(id) = &graph.id {
        header.push(' ');
        header.push_str(&literal_token(id));
    }
    let ctx = Ctx {
        directed: graph.directed,
        indent: 1,
    };
    let mut body = Vec::new();
    for stmt in &graph.body {
        ast_stmt_lines(&mut body, stmt, ctx);
    }
    push_braced(&mut out, header, body, "");
    out.join("\n")
}

/// Serializes a single statement at top level.
pub fn print_ast_stmt(stmt: &ast::Stmt, directed: bool) -> String {
    let mut out = Vec::new();
    ast_stmt_lines(&mut out, stmt, Ctx { directed, indent: 0 });
    out.join("\n")
}

fn ast_stmt_lines(out: &mut Vec<String>, stmt: &ast::Stmt, ctx: Ctx) {
    let pad = ctx.pad();
    match stmt {
        ast::Stmt::Comment(c) => ast_comment_lines(out, &pad, c),
        ast::Stmt::Attribute(a) => out.push(format!(
            "{pad}{} = {};",
            literal_token(&a.key),
            literal_token(&a.value)
        )),
        ast::Stmt::AttributesBlock(block) => {
            let keyword = match block.kind {
                ast::AttrKind::Graph => "graph",
                ast::AttrKind::Node => "node",
                ast::AttrKind::Edge => "edge",
            };
            out.push(format!("{pad}{keyword} {};", ast_attr_list(&block.body)));
        }
        ast::Stmt::Node(n) => {
            let mut line = format!("{pad}{}", literal_token(&n.id));
            if !n.body.is_empty() {
                line.push(' ');
                line.push_str(&ast_attr_list(&n.body));
            }
            line.push(';');
            out.push(line);
        }
        ast::Stmt::Edge(e) => {
            let mut line = format!(
                "{pad}{}",
                e.targets
                    .iter()
                    .map(ast_target_token)
                    .collect::<Vec<_>>()
                    .join(ctx.op())
            );
            if !e.body.is_empty() {
                line.push(' ');
                line.push_str(&ast_attr_list(&e.body));
            }
            line.push(';');
            out.push(line);
        }
        ast::Stmt::Subgraph(s) => {
            let mut header = format!("{pad}subgraph ");
            if let Some(id) = &s.id {
                header.push_str(&literal_token(id));
                header.push(' ');
            }
            let mut body = Vec::new();
            for inner in &s.body {
                ast_stmt_lines(&mut body, inner, ctx.nested());
            }
            push_braced_raw(out, header, body, &pad);
        }
    }
}

fn ast_attr_list(attrs: &[ast::Attribute]) -> String {
    let inner = attrs
        .iter()
        .map(|a| format!("{} = {}", literal_token(&a.key), literal_token(&a.value)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{inner}]")
}

fn ast_target_token(target: &ast::EdgeTarget) -> String {
    match target {
        ast::EdgeTarget::Ref(r) => ast_ref_token(r),
        ast::EdgeTarget::Group(g) => {
            let inner = g
                .body
                .iter()
                .map(ast_ref_token)
                .collect::<Vec<_>>()
                .join(" ");
            format!("{{{inner}}}")
        }
    }
}

fn ast_ref_token(r: &ast::NodeRef) -> String {
    let mut out = literal_token(&r.id);
    if let Some(port) = &r.port {
        out.push(':');
        out.push_str(&literal_token(port));
    } else if r.compass.is_some() {
        out.push(':');
    }
    if let Some(compass) = &r.compass {
        out.push(':');
        out.push_str(&compass.value);
    }
    out
}

/// Renders a literal the way it was spelled: bare text stays bare, quoted
/// text is re-quoted and re-escaped, HTML-like text passes through.
fn literal_token(literal: &ast::Literal) -> String {
    match literal.kind {
        ast::LiteralKind::Bare => literal.value.clone(),
        ast::LiteralKind::Quoted => quote(&literal.value),
        ast::LiteralKind::Html => literal.value.clone(),
    }
}

fn ast_comment_lines(out: &mut Vec<String>, pad: &str, comment: &ast::Comment) {
    let lines: Vec<&str> = if comment.value.is_empty() {
        vec![""]
    } else {
        comment.value.lines().collect()
    };
    match comment.kind {
        ast::CommentKind::Slash => {
            for line in &lines {
                if line.is_empty() {
                    out.push(format!("{pad}//"));
                } else {
                    out.push(format!("{pad}// {line}"));
                }
            }
        }
        ast::CommentKind::Macro => {
            for line in &lines {
                if line.is_empty() {
                    out.push(format!("{pad}#"));
                } else {
                    out.push(format!("{pad}# {line}"));
                }
            }
        }
        ast::CommentKind::Block => {
            out.push(format!("{pad}/**"));
            for line in &lines {
                if line.is_empty() {
                    out.push(format!("{pad} *"));
                } else {
                    out.push(format!("{pad} * {line}"));
                }
            }
            out.push(format!("{pad} */"));
        }
    }
}
