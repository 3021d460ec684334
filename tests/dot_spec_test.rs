use dotkit::parser::{DIGRAPH_OPERATOR_MSG, GRAPH_OPERATOR_MSG};
use dotkit::{Compass, EdgeTarget, Error, Graph, from_dot, to_dot};
use pretty_assertions::assert_eq;

// =============================================================================
// Parsing into the model
// =============================================================================

#[test]
fn spec_edge_materializes_its_endpoints() {
    let g = from_dot("digraph { hoge -> fuga; }").unwrap();
    assert!(g.exist_node("hoge"));
    assert!(g.exist_node("fuga"));
    assert_eq!(g.edges().count(), 1);
}

#[test]
fn spec_edge_chain_is_one_edge() {
    let g = from_dot("digraph { a -> b -> c; }").unwrap();
    let edge = g.edges().next().unwrap();
    assert_eq!(edge.targets().len(), 3);
    assert_eq!(g.nodes().count(), 3);
}

#[test]
fn spec_strict_and_id_are_kept() {
    let g = from_dot("strict digraph main {}").unwrap();
    assert!(g.is_strict());
    assert!(g.is_directed());
    assert_eq!(g.id(), Some("main"));
}

#[test]
fn spec_keywords_are_case_insensitive() {
    let g = from_dot("DiGraph { A -> B; }").unwrap();
    assert!(g.is_directed());
    let g = from_dot("STRICT GRAPH {}").unwrap();
    assert!(g.is_strict());
}

#[test]
fn spec_quoted_strings_concatenate() {
    let g = from_dot(r#"digraph { a [label="foo" + "bar"]; }"#).unwrap();
    let label = g.get_node("a").unwrap().attrs().get("label").unwrap();
    assert_eq!(label.as_str(), Some("foobar"));
}

#[test]
fn spec_repeated_bracket_groups_merge() {
    let g = from_dot("digraph { a [color=red] [shape=box]; }").unwrap();
    let node = g.get_node("a").unwrap();
    assert!(node.attrs().get("color").is_some());
    assert!(node.attrs().get("shape").is_some());
}

#[test]
fn spec_ports_and_compass_parse() {
    let g = from_dot("digraph { a:out:n -> b::sw; }").unwrap();
    let edge = g.edges().next().unwrap();
    let EdgeTarget::Node(head) = &edge.targets()[0] else {
        panic!("expected a plain target");
    };
    let EdgeTarget::Node(tail) = &edge.targets()[1] else {
        panic!("expected a plain target");
    };
    assert_eq!(head.port.as_deref(), Some("out"));
    assert_eq!(head.compass, Some(Compass::N));
    assert_eq!(tail.port, None);
    assert_eq!(tail.compass, Some(Compass::Sw));
}

#[test]
fn spec_grouped_targets_fan_out() {
    let g = from_dot("digraph { {a b} -> c; }").unwrap();
    assert_eq!(g.nodes().count(), 3);
    let edge = g.edges().next().unwrap();
    assert!(matches!(&edge.targets()[0], EdgeTarget::Group(refs) if refs.len() == 2));
}

// =============================================================================
// Edge operator contract
// =============================================================================

#[test]
fn spec_digraph_rejects_undirected_operator() {
    let err = from_dot("digraph { a -- b; }").unwrap_err();
    assert!(err.to_string().contains(DIGRAPH_OPERATOR_MSG), "got: {err}");
}

#[test]
fn spec_graph_rejects_directed_operator() {
    let err = from_dot("graph { a -> b; }").unwrap_err();
    assert!(err.to_string().contains(GRAPH_OPERATOR_MSG), "got: {err}");
}

#[test]
fn spec_operator_contract_applies_inside_subgraphs() {
    let err = from_dot("digraph { subgraph s { a -- b; } }").unwrap_err();
    assert!(err.to_string().contains(DIGRAPH_OPERATOR_MSG), "got: {err}");
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn spec_syntax_error_carries_line_and_column() {
    let err = from_dot("digraph {\n  a -> ;\n}").unwrap_err();
    let Error::Syntax(err) = err else {
        panic!("expected a syntax error, got: {err}");
    };
    assert_eq!(err.span.start.line, 2);
}

#[test]
fn spec_edge_needs_two_targets() {
    let mut g = Graph::digraph();
    let err = g.create_edge(["only"]).unwrap_err();
    assert_eq!(err, Error::EdgeArity(1));
    assert!(!g.exist_node("only"));
    assert_eq!(g.edges().count(), 0);
}

// =============================================================================
// Comments
// =============================================================================

#[test]
fn spec_comment_above_node_attaches() {
    let g = from_dot("digraph {\n  // the entry point\n  a;\n}").unwrap();
    assert_eq!(g.get_node("a").unwrap().comment(), Some("the entry point"));
}

#[test]
fn spec_comment_runs_collapse() {
    let g = from_dot("digraph {\n  // first\n  // second\n  a;\n}").unwrap();
    assert_eq!(g.get_node("a").unwrap().comment(), Some("first\nsecond"));
}

#[test]
fn spec_block_comment_decoration_is_stripped() {
    let g = from_dot("digraph {\n  /**\n   * stars gone\n   */\n  a;\n}").unwrap();
    assert_eq!(g.get_node("a").unwrap().comment(), Some("stars gone"));
}

#[test]
fn spec_leading_comment_becomes_graph_comment() {
    let g = from_dot("# build order\ndigraph {}").unwrap();
    assert_eq!(g.comment(), Some("build order"));
}

// =============================================================================
// Serialization
// =============================================================================

#[test]
fn spec_empty_graph_prints_inline() {
    let mut g = Graph::digraph();
    g.set_id("test");
    assert_eq!(to_dot(&g), "digraph test {}");
}

#[test]
fn spec_canonical_order_and_indent() {
    let g = from_dot(
        "digraph {\n  a -> b;\n  node [shape=box];\n  rankdir = LR;\n  subgraph s { c; }\n}",
    )
    .unwrap();
    assert_eq!(
        to_dot(&g),
        "digraph {\n\
         \x20 rankdir = LR;\n\
         \x20 node [\n\
         \x20   shape = box,\n\
         \x20 ];\n\
         \x20 a;\n\
         \x20 b;\n\
         \x20 subgraph s {\n\
         \x20   c;\n\
         \x20 }\n\
         \x20 a -> b;\n\
         }"
    );
}

// =============================================================================
// Attribute catalog
// =============================================================================

#[test]
fn spec_catalog_flags_unknown_keys() {
    let g = from_dot("digraph { a [shape=box, colour=red]; }").unwrap();
    let unknown = dotkit::catalog::check_keys(g.get_node("a").unwrap().attrs());
    assert_eq!(unknown, vec!["colour"]);
}
