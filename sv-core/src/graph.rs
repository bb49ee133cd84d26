use indexmap::IndexMap;

use crate::common::{NodeId, Position};

/// A directed edge `source -> sink`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: NodeId,
    pub sink: NodeId,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, sink: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            sink: sink.into(),
        }
    }
}

/// A directed graph of segments with optional layout positions.
///
/// Nodes keep their insertion order, which downstream encodings rely on to stay
/// index-aligned. Cycles are allowed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    nodes: IndexMap<NodeId, Option<Position>>,
    edges: Vec<Edge>,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node or update the position of an existing one.
    /// An existing node keeps its place in the iteration order.
    pub fn add_node(&mut self, id: impl Into<NodeId>, pos: impl Into<Option<Position>>) {
        let pos = pos.into();
        let slot = self.nodes.entry(id.into()).or_insert(None);
        if pos.is_some() {
            *slot = pos;
        }
    }

    /// Insert an edge, creating position-less endpoints that are not yet known.
    pub fn add_edge(&mut self, source: impl Into<NodeId>, sink: impl Into<NodeId>) {
        let edge = Edge::new(source, sink);
        self.nodes.entry(edge.source.clone()).or_insert(None);
        self.nodes.entry(edge.sink.clone()).or_insert(None);
        self.edges.push(edge);
    }

    pub fn nodes(&self) -> impl ExactSizeIterator<Item = (&NodeId, Option<Position>)> + '_ {
        self.nodes.iter().map(|(id, pos)| (id, *pos))
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn position(&self, id: &NodeId) -> Option<Position> {
        self.nodes.get(id).copied().flatten()
    }

    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_is_kept() {
        let mut graph = Graph::new();
        graph.add_node("B", Position::new(1.0, 2.0));
        graph.add_node("A", Position::new(0.0, 1.0));
        graph.add_edge("A", "C");
        graph.add_node("B", Position::new(5.0, 5.0));

        let ids: Vec<&str> = graph.nodes().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
        assert_eq!(graph.position(&"B".into()), Some(Position::new(5.0, 5.0)));
        assert_eq!(graph.position(&"C".into()), None);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn edge_does_not_clear_position() {
        let mut graph = Graph::new();
        graph.add_node("A", Position::new(0.0, 1.0));
        graph.add_edge("A", "A");
        graph.add_node("A", None::<Position>);
        assert_eq!(graph.position(&"A".into()), Some(Position::new(0.0, 1.0)));
        assert_eq!(graph.node_count(), 1);
    }
}
