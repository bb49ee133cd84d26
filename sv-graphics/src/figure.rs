use sv_core::{
    chromosome::Chromosome,
    dataset::{Dataset, GraphKind},
    graph::Graph,
    table::Table,
};
use tracing::{debug, warn};

use crate::{
    EncodeError,
    annotate::{Adjacency, annotate},
    colorscale::{ColorScale, Palette, compile},
    flatten::{Layout, flatten},
};

/// Everything a renderer needs to draw one graph. All per-node vectors are
/// index-aligned with `layout.node_id`.
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    pub kind: GraphKind,
    pub title: String,
    pub annotation: String,
    pub layout: Layout,
    /// Color-axis value of every node, see [`ColorScale::value_of`].
    pub colors: Vec<f64>,
    pub scale: ColorScale<Chromosome>,
    pub hover: Vec<String>,
}

impl Figure {
    /// Encode `graph` against the shared `table`.
    ///
    /// An empty graph yields an empty figure rather than an error.
    ///
    /// # Errors
    ///
    /// Any [`EncodeError`] raised by flattening, node lookup or palette compilation.
    pub fn encode(
        kind: GraphKind,
        graph: &Graph,
        table: &Table,
        palette: &Palette,
    ) -> Result<Self, EncodeError> {
        let layout = flatten(graph)?;
        let adjacency = Adjacency::new(table);

        let chromosomes = layout
            .node_id
            .iter()
            .map(|id| adjacency.record(id).map(|record| record.chromosome))
            .collect::<Result<Vec<_>, _>>()?;
        let encoding = compile(&chromosomes, palette)?;
        let hover = annotate(&layout, &adjacency)?;

        let annotation = match kind {
            GraphKind::LongestChain => format!("Length of the chain: {}", layout.node_count()),
            GraphKind::Full | GraphKind::Cycles => format!(
                "Nodes: {} | Edges: {}",
                layout.node_count(),
                layout.edge_count()
            ),
        };

        debug!(
            "Encoded {kind:?}: {} nodes, {} edges, {} bands",
            layout.node_count(),
            layout.edge_count(),
            encoding.scale.len()
        );
        Ok(Self {
            kind,
            title: kind.title().to_owned(),
            annotation,
            layout,
            colors: encoding.values,
            scale: encoding.scale,
            hover,
        })
    }

    /// Fill color of node `i`.
    #[must_use]
    pub fn node_color(&self, i: usize) -> Option<egui::Color32> {
        self.colors.get(i).and_then(|value| self.scale.sample(*value))
    }
}

/// Encode every graph of a dataset. A failing graph does not stop the others.
pub fn encode_dataset(
    dataset: &Dataset,
    palette: &Palette,
) -> Vec<(GraphKind, Result<Figure, EncodeError>)> {
    dataset
        .graphs
        .iter()
        .map(|(kind, graph)| {
            let figure = Figure::encode(*kind, graph, &dataset.table, palette);
            if let Err(err) = &figure {
                warn!("Could not render {kind:?} of `{}`: {err}", dataset.name);
            }
            (*kind, figure)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::{fixture, rstest};
    use sv_core::common::{NodeId, Position};

    use super::*;
    use crate::{colorscale::ALPHABET, flatten::tests::scenario_graph};

    #[fixture]
    fn table() -> Table {
        Table::from_csv("Source,Sink,Chromosome\nA,B,1\nB,C,2\nC,loose,X\n".as_bytes()).unwrap()
    }

    #[rstest]
    fn scenario(scenario_graph: Graph, table: Table) -> Result<(), EncodeError> {
        let figure = Figure::encode(GraphKind::Full, &scenario_graph, &table, &Palette::default())?;
        assert_eq!(
            figure.layout.edge_x,
            vec![Some(0.0), Some(1.0), None, Some(1.0), Some(2.0), None]
        );
        assert_eq!(figure.scale.len(), 3);
        assert_eq!(figure.colors, vec![1.0, 2.0, 3.0]);
        assert!(figure.hover[1].contains("Prev: A"));
        assert!(figure.hover[1].contains("Next: C"));
        assert!(figure.hover[2].contains("Chromosome: X"));
        assert_eq!(figure.node_color(2), Some(ALPHABET[2]));
        assert_eq!(figure.annotation, "Nodes: 3 | Edges: 2");
        assert_eq!(figure.title, GraphKind::Full.title());
        Ok(())
    }

    #[rstest]
    fn aligned_buffers(scenario_graph: Graph, table: Table) -> Result<(), EncodeError> {
        let mut graph = scenario_graph;
        graph.add_edge("C", "A");
        let figure = Figure::encode(GraphKind::Cycles, &graph, &table, &Palette::default())?;
        let n = graph.node_count();
        assert_eq!(figure.layout.node_x.len(), n);
        assert_eq!(figure.layout.node_y.len(), n);
        assert_eq!(figure.colors.len(), n);
        assert_eq!(figure.hover.len(), n);
        for (i, id) in figure.layout.node_id.iter().enumerate() {
            assert!(figure.hover[i].contains(&format!("Node: {id}")));
        }
        Ok(())
    }

    #[rstest]
    fn empty_graph_is_valid(table: Table) -> Result<(), EncodeError> {
        let figure = Figure::encode(GraphKind::Cycles, &Graph::new(), &table, &Palette::default())?;
        assert!(figure.layout.node_id.is_empty());
        assert!(figure.scale.is_empty());
        assert!(figure.hover.is_empty());
        assert_eq!(figure.annotation, "Nodes: 0 | Edges: 0");
        Ok(())
    }

    #[rstest]
    fn failures_are_independent(scenario_graph: Graph, table: Table) {
        let mut unresolved = Graph::new();
        unresolved.add_node("Z", Position::new(0.0, 0.0));
        let mut unplaced = scenario_graph.clone();
        unplaced.add_edge("A", "Q");

        let dataset = Dataset {
            name: "test".to_owned(),
            table: Arc::new(table),
            graphs: vec![
                (GraphKind::Full, scenario_graph),
                (GraphKind::LongestChain, unplaced),
                (GraphKind::Cycles, unresolved),
            ],
        };
        let figures = encode_dataset(&dataset, &Palette::default());
        assert_eq!(figures.len(), 3);
        assert!(figures[0].1.is_ok());
        assert_eq!(
            figures[1].1,
            Err(EncodeError::MissingNodePosition(NodeId::from("Q")))
        );
        assert_eq!(
            figures[2].1,
            Err(EncodeError::UnresolvedNode(NodeId::from("Z")))
        );
    }

    #[rstest]
    fn chain_annotation(scenario_graph: Graph, table: Table) -> Result<(), EncodeError> {
        let figure = Figure::encode(
            GraphKind::LongestChain,
            &scenario_graph,
            &table,
            &Palette::default(),
        )?;
        assert_eq!(figure.annotation, "Length of the chain: 3");
        Ok(())
    }
}
