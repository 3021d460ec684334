//! Lowers the parsed syntax tree into the mutable object model.
//!
//! Statement order inside a body is not preserved as such; statements are
//! replayed against a [`Cluster`], which files nodes, subgraphs, edges and
//! attributes into its own containers. Comment statements are not kept as
//! entities either: a comment that sits directly above a node, edge or
//! subgraph becomes that entity's `comment`, and any other comment is
//! dropped.

use crate::ast;
use crate::attr::Value;
use crate::error::{Error, Result};
use crate::model::{Cluster, Compass, Edge, EdgeTarget, Graph, Node, NodeRef, Subgraph};

/// Result of converting a single statement outside of any body.
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    Subgraph(Subgraph),
    Node(Node),
    Edge(Edge),
}

/// Builds a model graph from a parsed one.
pub fn convert_graph(graph: &ast::Graph) -> Result<Graph> {
    let mut out = Graph::new(graph.directed);
    out.set_strict(graph.strict);
    if let Some(id) = &graph.id {
        out.set_id(id.value.clone());
    }
    let mut slot = CommentSlot::default();
    for comment in &graph.comments {
        slot.hold(comment);
    }
    if let Some(text) = slot.take_for(&graph.span.start) {
        out.set_comment(text);
    }
    apply_statements(&mut out, &graph.body)?;
    Ok(out)
}

pub fn convert_subgraph(subgraph: &ast::Subgraph) -> Result<Subgraph> {
    let mut out = Subgraph::new(subgraph.id.as_ref().map(|id| id.value.as_str()));
    apply_statements(&mut out, &subgraph.body)?;
    Ok(out)
}

pub fn convert_node(node: &ast::Node) -> Node {
    let mut out = Node::new(node.id.value.clone());
    apply_attributes(out.attrs_mut(), &node.body);
    out
}

pub fn convert_edge(edge: &ast::Edge) -> Result<Edge> {
    let targets: Vec<EdgeTarget> = edge.targets.iter().map(convert_target).collect();
    let mut out = Edge::new(targets)?;
    apply_attributes(out.attrs_mut(), &edge.body);
    Ok(out)
}

/// Converts one statement in isolation. Attribute, attribute-block and
/// comment statements only make sense against an enclosing body and are
/// rejected.
pub fn convert_stmt(stmt: &ast::Stmt) -> Result<Converted> {
    match stmt {
        ast::Stmt::Subgraph(s) => Ok(Converted::Subgraph(convert_subgraph(s)?)),
        ast::Stmt::Node(n) => Ok(Converted::Node(convert_node(n))),
        ast::Stmt::Edge(e) => Ok(Converted::Edge(convert_edge(e)?)),
        ast::Stmt::Attribute(_) => Err(Error::Unconvertible("attribute")),
        ast::Stmt::AttributesBlock(_) => Err(Error::Unconvertible("attribute block")),
        ast::Stmt::Comment(_) => Err(Error::Unconvertible("comment")),
    }
}

/// Replays a statement list against a cluster.
pub fn apply_statements(cluster: &mut Cluster, stmts: &[ast::Stmt]) -> Result<()> {
    let mut slot = CommentSlot::default();
    for stmt in stmts {
        match stmt {
            ast::Stmt::Comment(c) => slot.hold(c),
            ast::Stmt::Attribute(a) => {
                slot.clear();
                cluster.set(a.key.value.clone(), value_of(&a.value));
            }
            ast::Stmt::AttributesBlock(block) => {
                slot.clear();
                let store = match block.kind {
                    ast::AttrKind::Graph => cluster.graph_defaults_mut(),
                    ast::AttrKind::Node => cluster.node_defaults_mut(),
                    ast::AttrKind::Edge => cluster.edge_defaults_mut(),
                };
                apply_attributes(store, &block.body);
            }
            ast::Stmt::Node(n) => {
                let comment = slot.take_for(&n.span.start);
                let node = cluster.node(n.id.value.clone());
                apply_attributes(node.attrs_mut(), &n.body);
                if let Some(text) = comment {
                    node.set_comment(text);
                }
            }
            ast::Stmt::Edge(e) => {
                let comment = slot.take_for(&e.span.start);
                let targets: Vec<EdgeTarget> = e.targets.iter().map(convert_target).collect();
                let edge = cluster.create_edge(targets)?;
                apply_attributes(edge.attrs_mut(), &e.body);
                if let Some(text) = comment {
                    edge.set_comment(text);
                }
            }
            ast::Stmt::Subgraph(s) => {
                let comment = slot.take_for(&s.span.start);
                let sub = match &s.id {
                    Some(id) => cluster.subgraph(&id.value),
                    None => cluster.create_subgraph(None),
                };
                if let Some(text) = comment {
                    sub.set_comment(text);
                }
                apply_statements(sub, &s.body)?;
            }
        }
    }
    Ok(())
}

fn apply_attributes(store: &mut crate::attr::AttributeStore, attrs: &[ast::Attribute]) {
    for a in attrs {
        store.set(a.key.value.clone(), value_of(&a.value));
    }
}

/// HTML-like literals keep their kind and quoted text stays a string.
/// Bare tokens that spell a numeral or a boolean become typed values, so
/// `weight=2` reads back as the same value `set("weight", 2)` stores.
fn value_of(literal: &ast::Literal) -> Value {
    let text = literal.value.as_str();
    match literal.kind {
        ast::LiteralKind::Html => Value::Html(text.to_string()),
        ast::LiteralKind::Quoted => Value::Str(text.to_string()),
        ast::LiteralKind::Bare => {
            if text == "true" {
                Value::Bool(true)
            } else if text == "false" {
                Value::Bool(false)
            } else if crate::attr::looks_number(text) {
                if let Ok(n) = text.parse::<i64>() {
                    Value::Int(n)
                } else if let Ok(n) = text.parse::<f64>() {
                    Value::Float(n)
                } else {
                    Value::Str(text.to_string())
                }
            } else {
                Value::Str(text.to_string())
            }
        }
    }
}

fn convert_target(target: &ast::EdgeTarget) -> EdgeTarget {
    match target {
        ast::EdgeTarget::Ref(r) => EdgeTarget::Node(convert_ref(r)),
        ast::EdgeTarget::Group(g) => EdgeTarget::Group(g.body.iter().map(convert_ref).collect()),
    }
}

fn convert_ref(r: &ast::NodeRef) -> NodeRef {
    NodeRef {
        id: r.id.value.clone(),
        port: r.port.as_ref().map(|p| p.value.clone()),
        compass: r.compass.as_ref().and_then(|c| Compass::parse(&c.value)),
    }
}

/// Tracks the most recent comment while replaying statements, so it can
/// be attached to the entity that immediately follows it.
#[derive(Default)]
struct CommentSlot<'a> {
    pending: Option<&'a ast::Comment>,
}

impl<'a> CommentSlot<'a> {
    fn hold(&mut self, comment: &'a ast::Comment) {
        self.pending = Some(comment);
    }

    fn clear(&mut self) {
        self.pending = None;
    }

    /// Returns the held comment text when it ends on the line directly
    /// above `start`, and drops it otherwise. Slash and macro runs
    /// consume their final newline, so their end position already sits
    /// on the entity's line; block comments end at the closing `*/`.
    fn take_for(&mut self, start: &ast::Position) -> Option<String> {
        let comment = self.pending.take()?;
        let adjacent = match comment.kind {
            ast::CommentKind::Block => start.line == comment.span.end.line + 1,
            ast::CommentKind::Slash | ast::CommentKind::Macro => {
                start.line == comment.span.end.line
            }
        };
        adjacent.then(|| comment.value.clone())
    }
}
