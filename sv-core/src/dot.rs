use dot_structures::{Attribute, EdgeTy, Id, Stmt, Vertex};
use thiserror::Error;
use tracing::trace;

use crate::{
    common::{NodeId, Position, PositionError},
    graph::Graph,
};

const POS: &str = "pos";

#[derive(Error, Debug)]
pub enum DotError {
    #[error("Unsupported graph: {0}")]
    Unsupported(&'static str),
    #[error("Dot parsing error:\n{0}")]
    Parse(String),
    #[error("Node `{node}`: {error}")]
    Position {
        node: NodeId,
        #[source]
        error: PositionError,
    },
}

fn id_to_string(id: &Id) -> String {
    match id {
        Id::Html(s) | Id::Plain(s) | Id::Anonymous(s) => s.clone(),
        Id::Escaped(s) => s.trim_matches(|x| x == '\"').to_owned(),
    }
}

fn vertex_id(vertex: &Vertex) -> Result<NodeId, DotError> {
    match vertex {
        Vertex::N(node) => Ok(NodeId(id_to_string(&node.0))),
        Vertex::S(_) => Err(DotError::Unsupported("subgraph endpoints")),
    }
}

fn position(node: &NodeId, attributes: &[Attribute]) -> Result<Option<Position>, DotError> {
    attributes
        .iter()
        .find(|attr| id_to_string(&attr.0) == POS)
        .map(|attr| {
            id_to_string(&attr.1)
                .parse()
                .map_err(|error| DotError::Position {
                    node: node.clone(),
                    error,
                })
        })
        .transpose()
}

/// Parse a Graphviz digraph whose nodes carry a `pos="x,y"` attribute.
///
/// # Errors
///
/// Fails on syntax errors and on anything [`dot_to_graph`] rejects.
pub fn parse_dot(source: &str) -> Result<Graph, DotError> {
    let dot = graphviz_rust::parse(source).map_err(DotError::Parse)?;
    dot_to_graph(&dot)
}

/// Convert a parsed digraph. Node statements are taken in order; edge chains
/// `a -> b -> c` become consecutive edges.
///
/// # Errors
///
/// Fails on undirected graphs, subgraphs and malformed positions.
pub fn dot_to_graph(dot: &dot_structures::Graph) -> Result<Graph, DotError> {
    match dot {
        dot_structures::Graph::Graph { .. } => Err(DotError::Unsupported("undirected graph")),
        dot_structures::Graph::DiGraph { stmts, .. } => {
            let mut graph = Graph::new();
            for s in stmts {
                match s {
                    Stmt::Node(n) => {
                        let id = NodeId(id_to_string(&n.id.0));
                        let pos = position(&id, &n.attributes)?;
                        graph.add_node(id, pos);
                    }
                    Stmt::Edge(e) => {
                        let vertices = match &e.ty {
                            EdgeTy::Pair(x, y) => vec![vertex_id(x)?, vertex_id(y)?],
                            EdgeTy::Chain(vs) => {
                                vs.iter().map(vertex_id).collect::<Result<_, _>>()?
                            }
                        };
                        for pair in vertices.windows(2) {
                            graph.add_edge(pair[0].clone(), pair[1].clone());
                        }
                    }
                    // Graph-wide styling carries no structure.
                    Stmt::Attribute(_) | Stmt::GAttribute(_) => {}
                    Stmt::Subgraph(_) => return Err(DotError::Unsupported("subgraphs")),
                }
            }
            trace!(
                "Read digraph with {} nodes and {} edges",
                graph.node_count(),
                graph.edge_count()
            );
            Ok(graph)
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::*;

    #[test]
    fn scenario() -> Result<()> {
        let graph = parse_dot(
            r#"digraph {
                A [pos="0,1"];
                B [pos="1,2"];
                C [pos="2,1"];
                A -> B;
                B -> C;
            }"#,
        )?;
        let ids: Vec<&str> = graph.nodes().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(graph.position(&"B".into()), Some(Position::new(1.0, 2.0)));
        assert_eq!(graph.edge_count(), 2);
        Ok(())
    }

    #[test]
    fn chains_and_missing_positions() -> Result<()> {
        let graph = parse_dot(r#"digraph { rankdir=LR; "s1" [pos="5,3"]; s1 -> s2 -> s3; }"#)?;
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.position(&"s1".into()), Some(Position::new(5.0, 3.0)));
        assert_eq!(graph.position(&"s3".into()), None);
        Ok(())
    }

    #[test]
    fn rejects_undirected() {
        assert!(matches!(
            parse_dot("graph { a -- b }"),
            Err(DotError::Unsupported(_))
        ));
    }

    #[test]
    fn rejects_bad_position() {
        assert!(matches!(
            parse_dot(r#"digraph { a [pos="left"]; }"#),
            Err(DotError::Position { .. })
        ));
    }
}
