use egui::{Rect, pos2};
use itertools::Itertools;
use ordered_float::OrderedFloat;
use sv_core::{common::NodeId, graph::Graph};
use tracing::trace;

use crate::EncodeError;

/// Coordinate buffers of a graph, ready for a line/marker renderer.
///
/// Every edge contributes three entries to `edge_x` and `edge_y`: its two
/// endpoints followed by a `None` gap, so consecutive edges never join. The
/// `node_*` buffers follow the graph's node order and are index-aligned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    pub edge_x: Vec<Option<f64>>,
    pub edge_y: Vec<Option<f64>>,
    pub node_x: Vec<f64>,
    pub node_y: Vec<f64>,
    pub node_id: Vec<NodeId>,
}

impl Layout {
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_id.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_x.len() / 3
    }

    /// Line segments drawn from the edge buffers. A `None` in either buffer breaks the line.
    pub fn segments(&self) -> impl Iterator<Item = [(f64, f64); 2]> + '_ {
        self.edge_x
            .iter()
            .zip(&self.edge_y)
            .map(|(x, y)| x.zip(*y))
            .tuple_windows()
            .filter_map(|(a, b)| Some([a?, b?]))
    }

    /// Bounding box of the node positions, `None` when there are no nodes.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        let (min_x, max_x) = self
            .node_x
            .iter()
            .copied()
            .map(OrderedFloat)
            .minmax()
            .into_option()?;
        let (min_y, max_y) = self
            .node_y
            .iter()
            .copied()
            .map(OrderedFloat)
            .minmax()
            .into_option()?;
        Some(Rect::from_min_max(
            pos2(min_x.0 as f32, min_y.0 as f32),
            pos2(max_x.0 as f32, max_y.0 as f32),
        ))
    }
}

/// Flatten the edges and nodes of `graph` into coordinate buffers.
///
/// # Errors
///
/// Returns [`EncodeError::MissingNodePosition`] for the first node (or edge
/// endpoint) without a position.
pub fn flatten(graph: &Graph) -> Result<Layout, EncodeError> {
    let position = |id: &NodeId| {
        graph
            .position(id)
            .ok_or_else(|| EncodeError::MissingNodePosition(id.clone()))
    };

    let mut layout = Layout {
        edge_x: Vec::with_capacity(3 * graph.edge_count()),
        edge_y: Vec::with_capacity(3 * graph.edge_count()),
        node_x: Vec::with_capacity(graph.node_count()),
        node_y: Vec::with_capacity(graph.node_count()),
        node_id: Vec::with_capacity(graph.node_count()),
    };

    for edge in graph.edges() {
        let start = position(&edge.source)?;
        let end = position(&edge.sink)?;
        layout.edge_x.extend([Some(start.x), Some(end.x), None]);
        layout.edge_y.extend([Some(start.y), Some(end.y), None]);
    }

    for (id, _) in graph.nodes() {
        let pos = position(id)?;
        layout.node_x.push(pos.x);
        layout.node_y.push(pos.y);
        layout.node_id.push(id.clone());
    }

    trace!(
        "Flattened {} nodes and {} edges",
        layout.node_count(),
        layout.edge_count()
    );
    Ok(layout)
}

#[cfg(test)]
pub(crate) mod tests {
    use rstest::{fixture, rstest};
    use sv_core::common::Position;

    use super::*;

    #[fixture]
    pub(crate) fn scenario_graph() -> Graph {
        let mut graph = Graph::new();
        graph.add_node("A", Position::new(0.0, 1.0));
        graph.add_node("B", Position::new(1.0, 2.0));
        graph.add_node("C", Position::new(2.0, 1.0));
        graph.add_edge("A", "B");
        graph.add_edge("B", "C");
        graph
    }

    #[rstest]
    fn scenario(scenario_graph: Graph) -> Result<(), EncodeError> {
        let layout = flatten(&scenario_graph)?;
        assert_eq!(
            layout.edge_x,
            vec![Some(0.0), Some(1.0), None, Some(1.0), Some(2.0), None]
        );
        assert_eq!(
            layout.edge_y,
            vec![Some(1.0), Some(2.0), None, Some(2.0), Some(1.0), None]
        );
        assert_eq!(layout.node_x, vec![0.0, 1.0, 2.0]);
        assert_eq!(layout.node_y, vec![1.0, 2.0, 1.0]);
        assert_eq!(
            layout.node_id,
            vec![NodeId::from("A"), NodeId::from("B"), NodeId::from("C")]
        );
        Ok(())
    }

    #[rstest]
    fn buffer_lengths(scenario_graph: Graph) -> Result<(), EncodeError> {
        let mut graph = scenario_graph;
        graph.add_edge("C", "A");
        graph.add_edge("A", "A");
        let layout = flatten(&graph)?;

        assert_eq!(layout.edge_x.len(), 3 * graph.edge_count());
        assert_eq!(layout.edge_y.len(), 3 * graph.edge_count());
        assert!(layout.edge_x.iter().skip(2).step_by(3).all(Option::is_none));
        assert!(layout.edge_y.iter().skip(2).step_by(3).all(Option::is_none));
        assert_eq!(layout.node_x.len(), graph.node_count());
        assert_eq!(layout.node_y.len(), graph.node_count());
        assert_eq!(layout.node_id.len(), graph.node_count());
        Ok(())
    }

    #[rstest]
    fn segments_break_at_gaps(scenario_graph: Graph) -> Result<(), EncodeError> {
        let layout = flatten(&scenario_graph)?;
        let segments: Vec<_> = layout.segments().collect();
        assert_eq!(
            segments,
            vec![[(0.0, 1.0), (1.0, 2.0)], [(1.0, 2.0), (2.0, 1.0)]]
        );
        assert_eq!(
            layout.bounds(),
            Some(Rect::from_min_max(pos2(0.0, 1.0), pos2(2.0, 2.0)))
        );
        Ok(())
    }

    #[rstest]
    fn missing_position(scenario_graph: Graph) {
        let mut graph = scenario_graph;
        graph.add_edge("C", "D");
        assert_eq!(
            flatten(&graph),
            Err(EncodeError::MissingNodePosition("D".into()))
        );
    }

    #[test]
    fn empty_graph() -> Result<(), EncodeError> {
        let layout = flatten(&Graph::new())?;
        assert_eq!(layout, Layout::default());
        assert_eq!(layout.bounds(), None);
        assert_eq!(layout.segments().count(), 0);
        Ok(())
    }
}
