use std::sync::Arc;

use eframe::egui;
use egui::{Label, Sense};
use sv_core::{
    selection::{SelectionView, ViewCycle},
    table::{RowId, Table, TableError},
};

struct Edit {
    row: RowId,
    column: String,
    buffer: String,
}

/// What happened in the grid during one frame.
#[derive(Default)]
pub(crate) struct GridResponse {
    pub(crate) edited: bool,
    pub(crate) export: bool,
}

/// Checkbox grid over the full table, followed by the selected rows.
pub(crate) struct Grid {
    view: SelectionView,
    editing: Option<Edit>,
}

impl Grid {
    pub(crate) fn new(table: Arc<Table>) -> Self {
        Self {
            view: SelectionView::new(table),
            editing: None,
        }
    }

    pub(crate) fn cycle(&self) -> ViewCycle {
        self.view.render_cycle()
    }

    /// # Errors
    ///
    /// A rejected cell edit; the table keeps its previous value.
    pub(crate) fn ui(&mut self, ui: &mut egui::Ui) -> Result<GridResponse, TableError> {
        let mut response = GridResponse::default();
        let table = Arc::clone(self.view.table());

        ui.horizontal(|ui| {
            if ui.button("Select all").clicked() {
                self.view.selection_mut().select_all();
            }
            if ui.button("Clear").clicked() {
                self.view.selection_mut().clear_selection();
            }
            ui.label(format!(
                "{} of {} selected",
                self.view.selection().count(),
                table.len()
            ));
        });
        ui.small("Double click a cell to edit it.");

        let mut commit = None;
        egui::Grid::new("records").striped(true).show(ui, |ui| {
            ui.label("");
            for column in table.columns() {
                ui.strong(column);
            }
            ui.end_row();

            for record in table.records() {
                let mut selected = self.view.selection().is_selected(record.row);
                if ui.checkbox(&mut selected, "").changed() {
                    self.view.selection_mut().set(record.row, selected);
                }
                for column in table.columns() {
                    let editing = self
                        .editing
                        .as_ref()
                        .is_some_and(|edit| edit.row == record.row && edit.column == *column);
                    if let (true, Some(edit)) = (editing, &mut self.editing) {
                        let field = ui.text_edit_singleline(&mut edit.buffer);
                        if field.lost_focus() {
                            commit = Some((edit.row, edit.column.clone(), edit.buffer.clone()));
                        } else {
                            field.request_focus();
                        }
                    } else {
                        let text = record.cell(column).unwrap_or_default();
                        let label = ui.add(Label::new(text.as_str()).sense(Sense::click()));
                        if label.double_clicked() {
                            self.editing = Some(Edit {
                                row: record.row,
                                column: column.clone(),
                                buffer: text,
                            });
                        }
                    }
                }
                ui.end_row();
            }
        });

        ui.separator();
        ui.horizontal(|ui| {
            ui.strong("Selected records");
            response.export = ui.button("Export CSV").clicked();
        });
        let cycle = self.view.render_cycle();
        egui::Grid::new("filtered").striped(true).show(ui, |ui| {
            for column in cycle.filtered.columns() {
                ui.strong(column);
            }
            ui.end_row();
            for record in cycle.filtered.records() {
                for column in cycle.filtered.columns() {
                    ui.label(record.cell(column).unwrap_or_default());
                }
                ui.end_row();
            }
        });

        if let Some((row, column, value)) = commit {
            self.editing = None;
            self.view.edit_cell(row, &column, &value)?;
            response.edited = true;
        }
        Ok(response)
    }
}
