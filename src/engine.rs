//! Hand-off point to an external layout backend.
//!
//! Nothing here runs Graphviz itself. [`LayoutEngine`] is the seam a
//! caller plugs a backend into (a wasm build, a spawned `dot` process, a
//! network service), and [`layout_graph`] serializes a model graph and
//! feeds it through.

use crate::model::Graph;
use crate::printer;

/// The Graphviz layout algorithms a backend may be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engine {
    #[default]
    Dot,
    Neato,
    Fdp,
    Sfdp,
    Circo,
    Twopi,
    Osage,
    Patchwork,
}

impl Engine {
    pub fn as_str(self) -> &'static str {
        match self {
            Engine::Dot => "dot",
            Engine::Neato => "neato",
            Engine::Fdp => "fdp",
            Engine::Sfdp => "sfdp",
            Engine::Circo => "circo",
            Engine::Twopi => "twopi",
            Engine::Osage => "osage",
            Engine::Patchwork => "patchwork",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
    Json,
    Dot,
    Xdot,
    Plain,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Json => "json",
            OutputFormat::Dot => "dot",
            OutputFormat::Xdot => "xdot",
            OutputFormat::Plain => "plain",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("layout backend is unavailable: {0}")]
    Unavailable(String),

    #[error("layout backend rejected the input: {0}")]
    Rejected(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A pluggable layout backend.
pub trait LayoutEngine {
    /// Lays out `dot` source text and returns the rendered bytes.
    fn layout(
        &self,
        dot: &str,
        format: OutputFormat,
        engine: Engine,
    ) -> Result<Vec<u8>, LayoutError>;
}

/// Serializes `graph` and runs it through `backend`.
pub fn layout_graph(
    backend: &dyn LayoutEngine,
    graph: &Graph,
    format: OutputFormat,
    engine: Engine,
) -> Result<Vec<u8>, LayoutError> {
    backend.layout(&printer::print(graph), format, engine)
}
