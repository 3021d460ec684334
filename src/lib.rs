//! A DOT (Graphviz) toolkit: parse DOT text into a syntax tree, lower it
//! into a mutable graph model, and serialize either form back to
//! canonical DOT.
//!
//! The round trip is the contract: [`from_dot`] followed by [`to_dot`]
//! yields text that parses back into an equal model.

pub mod ast;
pub mod attr;
pub mod catalog;
pub mod convert;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod printer;

pub use attr::{AttributeStore, Value};
pub use error::{Error, Result, SyntaxError};
pub use model::{Compass, Edge, EdgeTarget, Graph, Node, NodeRef, Subgraph};

/// Parses DOT source text into a model graph.
pub fn from_dot(input: &str) -> Result<Graph> {
    let parsed = parser::parse(input)?;
    convert::convert_graph(&parsed)
}

/// Serializes a model graph to canonical DOT text.
pub fn to_dot(graph: &Graph) -> String {
    printer::print(graph)
}
