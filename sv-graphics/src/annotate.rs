use std::collections::HashMap;

use indexmap::IndexSet;
use itertools::Itertools;
use sv_core::{
    common::NodeId,
    table::{Record, Table},
};

use crate::{EncodeError, flatten::Layout};

/// Shown in place of an empty neighbour list.
pub const NONE: &str = "None";

/// Relational index over the `Source`/`Sink` columns of a table.
///
/// Neighbours come from the table rather than from a graph's edges, so a node in
/// a subgraph still reports every neighbour it has in the full dataset.
#[derive(Debug)]
pub struct Adjacency<'a> {
    records: HashMap<&'a NodeId, &'a Record>,
    successors: HashMap<&'a NodeId, IndexSet<&'a NodeId>>,
    predecessors: HashMap<&'a NodeId, IndexSet<&'a NodeId>>,
}

impl<'a> Adjacency<'a> {
    #[must_use]
    pub fn new(table: &'a Table) -> Self {
        let mut records = HashMap::new();
        let mut successors: HashMap<_, IndexSet<_>> = HashMap::new();
        let mut predecessors: HashMap<_, IndexSet<_>> = HashMap::new();

        for record in table.records() {
            records.entry(&record.source).or_insert(record);
            if let Some(sink) = record.sink.node() {
                successors.entry(&record.source).or_default().insert(sink);
                predecessors.entry(sink).or_default().insert(&record.source);
            }
        }

        Self {
            records,
            successors,
            predecessors,
        }
    }

    /// The first row whose `Source` is `node`.
    ///
    /// # Errors
    ///
    /// [`EncodeError::UnresolvedNode`] if there is no such row.
    pub fn record(&self, node: &NodeId) -> Result<&'a Record, EncodeError> {
        self.records
            .get(node)
            .copied()
            .ok_or_else(|| EncodeError::UnresolvedNode(node.clone()))
    }

    /// Distinct sinks of the rows leaving `node`, in table order. `loose` sinks are skipped.
    #[must_use]
    pub fn successors(&self, node: &NodeId) -> Vec<&'a NodeId> {
        self.successors
            .get(node)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Distinct sources of the rows entering `node`, in table order.
    #[must_use]
    pub fn predecessors(&self, node: &NodeId) -> Vec<&'a NodeId> {
        self.predecessors
            .get(node)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Hover text of one node.
    ///
    /// # Errors
    ///
    /// [`EncodeError::UnresolvedNode`] if the node has no row in the table.
    pub fn hover_text(&self, node: &NodeId, copy_number: f64) -> Result<String, EncodeError> {
        let record = self.record(node)?;
        Ok(format!(
            "Prev: {}\nNode: {node}\nNext: {}\nChromosome: {} | Copy number: {copy_number}",
            join(&self.predecessors(node)),
            join(&self.successors(node)),
            record.chromosome,
        ))
    }
}

fn join(ids: &[&NodeId]) -> String {
    if ids.is_empty() {
        NONE.to_owned()
    } else {
        ids.iter().join(", ")
    }
}

/// Hover texts for every node of `layout`, index-aligned with its buffers.
///
/// # Errors
///
/// [`EncodeError::UnresolvedNode`] for the first node without a table row.
pub fn annotate(layout: &Layout, adjacency: &Adjacency<'_>) -> Result<Vec<String>, EncodeError> {
    layout
        .node_id
        .iter()
        .zip(&layout.node_y)
        .map(|(id, y)| adjacency.hover_text(id, *y))
        .collect()
}
