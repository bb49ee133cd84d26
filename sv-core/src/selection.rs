use std::{
    ops::{Index, IndexMut},
    sync::Arc,
};

use indexmap::IndexMap;
use tracing::debug;

use crate::table::{RowId, Table, TableError};

/// Checked state of every row shown in the grid, in grid order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionMap(IndexMap<RowId, bool>);

impl From<&Table> for SelectionMap {
    fn from(table: &Table) -> Self {
        Self(table.row_ids().map(|row| (row, false)).collect())
    }
}

impl Index<&RowId> for SelectionMap {
    type Output = bool;

    fn index(&self, index: &RowId) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<&RowId> for SelectionMap {
    fn index_mut(&mut self, index: &RowId) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl SelectionMap {
    /// Unselect all rows.
    pub fn clear_selection(&mut self) {
        self.0.values_mut().for_each(|selected| *selected = false);
    }

    pub fn select_all(&mut self) {
        self.0.values_mut().for_each(|selected| *selected = true);
    }

    /// Flip a row, returning its new state. Unknown rows are ignored.
    pub fn toggle(&mut self, row: RowId) -> bool {
        self.0.get_mut(&row).is_some_and(|selected| {
            *selected = !*selected;
            *selected
        })
    }

    pub fn set(&mut self, row: RowId, selected: bool) {
        if let Some(slot) = self.0.get_mut(&row) {
            *slot = selected;
        }
    }

    #[must_use]
    pub fn is_selected(&self, row: RowId) -> bool {
        self.0.get(&row).copied().unwrap_or_default()
    }

    /// Iterator of selected rows.
    pub fn iter(&self) -> impl Iterator<Item = RowId> + Clone + '_ {
        self.0
            .iter()
            .filter_map(|(row, selected)| selected.then_some(row))
            .copied()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Follow a new table snapshot: rows keep their state, new rows start unselected
    /// and rows that no longer exist are dropped.
    pub fn sync_rows(&mut self, table: &Table) {
        let previous = std::mem::take(&mut self.0);
        self.0 = table
            .row_ids()
            .map(|row| (row, previous.get(&row).copied().unwrap_or_default()))
            .collect();
    }
}

/// Output of one render cycle of a [`SelectionView`].
#[derive(Clone, Debug)]
pub struct ViewCycle {
    pub full: Arc<Table>,
    pub filtered: Table,
}

/// A grid bound to a table snapshot, republishing the selected rows each cycle.
#[derive(Clone, Debug)]
pub struct SelectionView {
    full: Arc<Table>,
    selection: SelectionMap,
}

impl SelectionView {
    #[must_use]
    pub fn new(table: Arc<Table>) -> Self {
        let selection = SelectionMap::from(table.as_ref());
        Self {
            full: table,
            selection,
        }
    }

    #[must_use]
    pub fn table(&self) -> &Arc<Table> {
        &self.full
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionMap {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionMap {
        &mut self.selection
    }

    /// Replace the full table with a copy carrying the edit. Later cycles see the edit.
    ///
    /// # Errors
    ///
    /// See [`Table::with_cell`]; on error the current snapshot is kept.
    pub fn edit_cell(&mut self, row: RowId, column: &str, value: &str) -> Result<(), TableError> {
        let edited = self.full.with_cell(row, column, value)?;
        debug!("Edited row {row} column `{column}`");
        self.full = Arc::new(edited);
        self.selection.sync_rows(&self.full);
        Ok(())
    }

    #[must_use]
    pub fn render_cycle(&self) -> ViewCycle {
        ViewCycle {
            full: Arc::clone(&self.full),
            filtered: self.full.select_rows(self.selection.iter()),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use rstest::rstest;

    use super::*;
    use crate::table::tests::scenario;

    #[rstest]
    fn empty_selection_is_empty_table(scenario: Table) {
        let view = SelectionView::new(Arc::new(scenario));
        let cycle = view.render_cycle();
        assert!(cycle.filtered.is_empty());
        assert_eq!(cycle.filtered.columns(), cycle.full.columns());
    }

    #[rstest]
    fn select_all_is_full_table(scenario: Table) {
        let mut view = SelectionView::new(Arc::new(scenario));
        view.selection_mut().select_all();
        let cycle = view.render_cycle();
        assert_eq!(&cycle.filtered, cycle.full.as_ref());

        view.selection_mut().clear_selection();
        assert!(view.render_cycle().filtered.is_empty());
    }

    #[rstest]
    fn toggle_rows(scenario: Table) {
        let mut view = SelectionView::new(Arc::new(scenario));
        assert!(view.selection_mut().toggle(RowId(2)));
        assert!(view.selection_mut().toggle(RowId(0)));
        assert!(!view.selection_mut().toggle(RowId(0)));
        assert!(!view.selection_mut().toggle(RowId(42)));

        let cycle = view.render_cycle();
        let rows: Vec<RowId> = cycle.filtered.row_ids().collect();
        assert_eq!(rows, vec![RowId(2)]);
        assert!(view.selection()[&RowId(2)]);
        assert_eq!(view.selection().count(), 1);
    }

    #[rstest]
    fn edits_persist_across_cycles(scenario: Table) -> Result<()> {
        let original = Arc::new(scenario);
        let mut view = SelectionView::new(Arc::clone(&original));
        view.selection_mut().set(RowId(1), true);
        view.edit_cell(RowId(1), "Start", "42")?;

        let first = view.render_cycle();
        let second = view.render_cycle();
        for cycle in [first, second] {
            assert_eq!(
                cycle.filtered.get(RowId(1)).and_then(|r| r.cell("Start")).as_deref(),
                Some("42")
            );
        }
        assert_eq!(
            original.get(RowId(1)).and_then(|r| r.cell("Start")).as_deref(),
            Some("0")
        );
        assert!(view.edit_cell(RowId(1), "Chromosome", "??").is_err());
        assert!(view.selection().is_selected(RowId(1)));
        Ok(())
    }
}
