//! Mutable graph object model.
//!
//! A [`Graph`] (directed or not) and every [`Subgraph`] share the same
//! cluster surface: an own attribute store, three default-attribute stores
//! fanned out by `graph`/`node`/`edge [...]` blocks, and exclusively owned
//! collections of nodes, subgraphs and edges. Nodes are indexed by id;
//! edges are identified by their target sequence.

use indexmap::IndexMap;

use crate::attr::{AttributeStore, Value};
use crate::error::{Error, Result};

/// Compass point qualifying which side of a node an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compass {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
    C,
    Underscore,
}

impl Compass {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "n" => Compass::N,
            "ne" => Compass::Ne,
            "e" => Compass::E,
            "se" => Compass::Se,
            "s" => Compass::S,
            "sw" => Compass::Sw,
            "w" => Compass::W,
            "nw" => Compass::Nw,
            "c" => Compass::C,
            "_" => Compass::Underscore,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Compass::N => "n",
            Compass::Ne => "ne",
            Compass::E => "e",
            Compass::Se => "se",
            Compass::S => "s",
            Compass::Sw => "sw",
            Compass::W => "w",
            Compass::Nw => "nw",
            Compass::C => "c",
            Compass::Underscore => "_",
        }
    }
}

/// A reference to a node, optionally qualified by port and compass.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRef {
    pub id: String,
    pub port: Option<String>,
    pub compass: Option<Compass>,
}

impl NodeRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            port: None,
            compass: None,
        }
    }
}

impl From<&str> for NodeRef {
    /// Splits `id[:port][:compass]`. The trailing segment counts as a
    /// compass only when it is one of the compass tokens; anything else
    /// stays part of the port.
    fn from(value: &str) -> Self {
        let mut parts = value.split(':');
        let id = parts.next().unwrap_or_default().to_string();
        let rest: Vec<&str> = parts.collect();
        let (port, compass) = match rest.split_last() {
            None => (None, None),
            Some((last, init)) => match Compass::parse(last) {
                Some(c) => (non_empty(init.join(":")), Some(c)),
                None => (non_empty(rest.join(":")), None),
            },
        };
        Self { id, port, compass }
    }
}

impl From<String> for NodeRef {
    fn from(value: String) -> Self {
        NodeRef::from(value.as_str())
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// One endpoint of an edge: a single node reference or a braced group.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeTarget {
    Node(NodeRef),
    Group(Vec<NodeRef>),
}

impl EdgeTarget {
    pub fn group<R: Into<NodeRef>>(refs: impl IntoIterator<Item = R>) -> Self {
        EdgeTarget::Group(refs.into_iter().map(Into::into).collect())
    }

    fn refs(&self) -> &[NodeRef] {
        match self {
            EdgeTarget::Node(r) => std::slice::from_ref(r),
            EdgeTarget::Group(refs) => refs,
        }
    }
}

impl From<NodeRef> for EdgeTarget {
    fn from(value: NodeRef) -> Self {
        EdgeTarget::Node(value)
    }
}

impl From<&str> for EdgeTarget {
    fn from(value: &str) -> Self {
        EdgeTarget::Node(NodeRef::from(value))
    }
}

impl From<String> for EdgeTarget {
    fn from(value: String) -> Self {
        EdgeTarget::Node(NodeRef::from(value))
    }
}

impl From<&Node> for EdgeTarget {
    fn from(value: &Node) -> Self {
        EdgeTarget::Node(NodeRef::new(value.id()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: String,
    attrs: AttributeStore,
    comment: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attrs: AttributeStore::new(),
            comment: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attrs.set(key, value);
    }

    pub fn attrs(&self) -> &AttributeStore {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut AttributeStore {
        &mut self.attrs
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    targets: Vec<EdgeTarget>,
    attrs: AttributeStore,
    comment: Option<String>,
}

impl Edge {
    /// Validates arity before constructing; a failed call builds nothing.
    pub fn new<T: Into<EdgeTarget>>(targets: impl IntoIterator<Item = T>) -> Result<Self> {
        let targets: Vec<EdgeTarget> = targets.into_iter().map(Into::into).collect();
        if targets.len() < 2 {
            return Err(Error::EdgeArity(targets.len()));
        }
        Ok(Self {
            targets,
            attrs: AttributeStore::new(),
            comment: None,
        })
    }

    pub fn targets(&self) -> &[EdgeTarget] {
        &self.targets
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attrs.set(key, value);
    }

    pub fn attrs(&self) -> &AttributeStore {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut AttributeStore {
        &mut self.attrs
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }

    pub(crate) fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.targets
            .iter()
            .flat_map(|t| t.refs().iter())
            .map(|r| r.id.as_str())
    }
}

/// Shared container behind every root graph and subgraph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cluster {
    attrs: AttributeStore,
    graph_defaults: AttributeStore,
    node_defaults: AttributeStore,
    edge_defaults: AttributeStore,
    nodes: IndexMap<String, Node>,
    subgraphs: Vec<Subgraph>,
    edges: Vec<Edge>,
}

impl Cluster {
    // --- own attributes -----------------------------------------------------

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attrs.set(key, value);
    }

    pub fn attrs(&self) -> &AttributeStore {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut AttributeStore {
        &mut self.attrs
    }

    // --- default-attribute stores -------------------------------------------

    pub fn graph_defaults(&self) -> &AttributeStore {
        &self.graph_defaults
    }

    pub fn graph_defaults_mut(&mut self) -> &mut AttributeStore {
        &mut self.graph_defaults
    }

    pub fn node_defaults(&self) -> &AttributeStore {
        &self.node_defaults
    }

    pub fn node_defaults_mut(&mut self) -> &mut AttributeStore {
        &mut self.node_defaults
    }

    pub fn edge_defaults(&self) -> &AttributeStore {
        &self.edge_defaults
    }

    pub fn edge_defaults_mut(&mut self) -> &mut AttributeStore {
        &mut self.edge_defaults
    }

    pub fn set_graph_defaults<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.graph_defaults.apply(pairs);
    }

    pub fn set_node_defaults<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.node_defaults.apply(pairs);
    }

    pub fn set_edge_defaults<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.edge_defaults.apply(pairs);
    }

    // --- nodes ---------------------------------------------------------------

    /// Inserts a fresh node, replacing any node with the same id while
    /// keeping its position in the declaration order.
    pub fn create_node(&mut self, id: impl Into<String>) -> &mut Node {
        let id = id.into();
        let node = Node::new(id.clone());
        match self.nodes.entry(id) {
            indexmap::map::Entry::Occupied(mut e) => {
                e.insert(node);
                e.into_mut()
            }
            indexmap::map::Entry::Vacant(e) => e.insert(node),
        }
    }

    /// Get-or-create by id.
    pub fn node(&mut self, id: impl Into<String>) -> &mut Node {
        let id = id.into();
        self.nodes
            .entry(id.clone())
            .or_insert_with(|| Node::new(id))
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn exist_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn remove_node(&mut self, id: &str) -> bool {
        self.nodes.shift_remove(id).is_some()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    // --- subgraphs -----------------------------------------------------------

    pub fn create_subgraph(&mut self, id: Option<&str>) -> &mut Subgraph {
        self.subgraphs.push(Subgraph::new(id));
        let idx = self.subgraphs.len() - 1;
        &mut self.subgraphs[idx]
    }

    /// Get-or-create by id.
    pub fn subgraph(&mut self, id: &str) -> &mut Subgraph {
        match self.subgraphs.iter().position(|s| s.id() == Some(id)) {
            Some(idx) => &mut self.subgraphs[idx],
            None => self.create_subgraph(Some(id)),
        }
    }

    pub fn get_subgraph(&self, id: &str) -> Option<&Subgraph> {
        self.subgraphs.iter().find(|s| s.id() == Some(id))
    }

    pub fn get_subgraph_mut(&mut self, id: &str) -> Option<&mut Subgraph> {
        self.subgraphs.iter_mut().find(|s| s.id() == Some(id))
    }

    pub fn exist_subgraph(&self, id: &str) -> bool {
        self.get_subgraph(id).is_some()
    }

    pub fn remove_subgraph(&mut self, id: &str) -> bool {
        match self.subgraphs.iter().position(|s| s.id() == Some(id)) {
            Some(idx) => {
                self.subgraphs.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn subgraphs(&self) -> impl Iterator<Item = &Subgraph> {
        self.subgraphs.iter()
    }

    // --- edges ---------------------------------------------------------------

    /// Creates an edge and materializes any referenced nodes that do not
    /// exist yet. Fails without mutating anything when fewer than two
    /// targets are supplied.
    pub fn create_edge<T: Into<EdgeTarget>>(
        &mut self,
        targets: impl IntoIterator<Item = T>,
    ) -> Result<&mut Edge> {
        let edge = Edge::new(targets)?;
        for id in edge.node_ids() {
            if !self.nodes.contains_key(id) {
                self.nodes.insert(id.to_string(), Node::new(id));
            }
        }
        self.edges.push(edge);
        let idx = self.edges.len() - 1;
        Ok(&mut self.edges[idx])
    }

    /// Get-or-create by target sequence.
    pub fn edge<T: Into<EdgeTarget>>(
        &mut self,
        targets: impl IntoIterator<Item = T>,
    ) -> Result<&mut Edge> {
        let targets: Vec<EdgeTarget> = targets.into_iter().map(Into::into).collect();
        match self.edges.iter().position(|e| e.targets() == targets) {
            Some(idx) => Ok(&mut self.edges[idx]),
            None => self.create_edge(targets),
        }
    }

    pub fn exist_edge(&self, targets: &[EdgeTarget]) -> bool {
        self.edges.iter().any(|e| e.targets() == targets)
    }

    pub fn remove_edge(&mut self, targets: &[EdgeTarget]) -> bool {
        match self.edges.iter().position(|e| e.targets() == targets) {
            Some(idx) => {
                self.edges.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
            && self.graph_defaults.is_empty()
            && self.node_defaults.is_empty()
            && self.edge_defaults.is_empty()
            && self.nodes.is_empty()
            && self.subgraphs.is_empty()
            && self.edges.is_empty()
    }
}

/// A root cluster: `digraph` or `graph`, optionally `strict`.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    id: Option<String>,
    directed: bool,
    strict: bool,
    comment: Option<String>,
    body: Cluster,
}

impl Graph {
    pub fn new(directed: bool) -> Self {
        Self {
            id: None,
            directed,
            strict: false,
            comment: None,
            body: Cluster::default(),
        }
    }

    pub fn digraph() -> Self {
        Self::new(true)
    }

    pub fn undirected() -> Self {
        Self::new(false)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }
}

impl std::ops::Deref for Graph {
    type Target = Cluster;

    fn deref(&self) -> &Cluster {
        &self.body
    }
}

impl std::ops::DerefMut for Graph {
    fn deref_mut(&mut self) -> &mut Cluster {
        &mut self.body
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subgraph {
    id: Option<String>,
    comment: Option<String>,
    body: Cluster,
}

impl Subgraph {
    pub fn new(id: Option<&str>) -> Self {
        Self {
            id: id.map(str::to_string),
            comment: None,
            body: Cluster::default(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Graphviz treats a subgraph as a cluster when its id starts with
    /// `cluster`.
    pub fn is_cluster(&self) -> bool {
        self.id.as_deref().is_some_and(|id| id.starts_with("cluster"))
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }
}

impl std::ops::Deref for Subgraph {
    type Target = Cluster;

    fn deref(&self) -> &Cluster {
        &self.body
    }
}

impl std::ops::DerefMut for Subgraph {
    fn deref_mut(&mut self) -> &mut Cluster {
        &mut self.body
    }
}
