//! Error taxonomy for the pipeline.
//!
//! Parse failures carry a source location; structural failures carry enough
//! context to report precisely. Lookups (`get_node`, `get_subgraph`) return
//! `Option` instead of erroring.

use crate::ast::Span;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("edge requires at least 2 targets, got {0}")]
    EdgeArity(usize),

    #[error("cannot convert a standalone {0} into a graph model")]
    Unconvertible(&'static str),
}

/// A parse-time failure with the offending source range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at line {}, column {}", .span.start.line, .span.start.column)]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
}
