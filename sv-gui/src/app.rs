use std::{num::NonZeroUsize, sync::Arc};

use anyhow::anyhow;
use eframe::egui;
use egui_notify::Toasts;
use sv_core::dataset::{Catalog, Dataset};
use sv_graphics::colorscale::Palette;
use tracing::debug;

use crate::{dataset_cache::DatasetCache, export, graph_ui::GraphUi, grid::Grid};

pub struct App {
    cache: DatasetCache<Catalog>,
    current: Option<Arc<Dataset>>,
    palette: Palette,
    graphs: Vec<GraphUi>,
    grid: Option<Grid>,
    toasts: Toasts,
}

impl App {
    #[must_use]
    pub fn new(catalog: Catalog, cache_size: NonZeroUsize) -> Self {
        Self {
            cache: DatasetCache::new(catalog, cache_size),
            current: None,
            palette: Palette::default(),
            graphs: Vec::new(),
            grid: None,
            toasts: Toasts::default(),
        }
    }

    /// Show dataset `name`, loading it unless it is cached.
    ///
    /// # Errors
    ///
    /// Load errors; the previous dataset stays on screen.
    pub fn select(&mut self, name: &str) -> anyhow::Result<()> {
        let dataset = self.cache.get(name)?;
        debug!("Showing dataset `{name}`");
        self.graphs = dataset
            .graphs
            .iter()
            .map(|(kind, graph)| GraphUi::new(*kind, graph.clone(), &dataset.table, &self.palette))
            .collect();
        self.grid = Some(Grid::new(Arc::clone(&dataset.table)));
        self.current = Some(dataset);
        Ok(())
    }

    pub fn select_or_notify(&mut self, name: &str) {
        if let Err(err) = self.select(name) {
            self.toasts.error(err.to_string());
            debug!("{:?}", err);
        }
    }

    fn refresh(&mut self) {
        if let Some(grid) = &self.grid {
            let cycle = grid.cycle();
            for graph in &mut self.graphs {
                graph.refresh(&cycle.full, &self.palette);
            }
        }
    }

    fn export_records(&self) -> anyhow::Result<()> {
        let grid = self.grid.as_ref().ok_or_else(|| anyhow!("No dataset loaded"))?;
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name("records.csv")
            .save_file()
        else {
            return Ok(());
        };
        export::write_table(&grid.cycle().filtered, &path)?;
        Ok(())
    }

    fn export_graph(&self, index: usize) -> anyhow::Result<()> {
        let figure = self
            .graphs
            .get(index)
            .and_then(GraphUi::figure)
            .ok_or_else(|| anyhow!("Nothing to export"))?;
        let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG", &["svg"])
            .set_file_name(format!("{:?}.svg", figure.kind).to_lowercase())
            .save_file()
        else {
            return Ok(());
        };
        export::write_svg(figure, &path)?;
        Ok(())
    }

    fn menu_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.visuals_mut().button_frame = false;
            egui::widgets::global_theme_preference_buttons(ui);

            ui.separator();

            let current = self.current.as_ref().map(|dataset| dataset.name.clone());
            let mut selected = current.clone();
            egui::ComboBox::from_label("Dataset")
                .selected_text(current.as_deref().unwrap_or("None"))
                .show_ui(ui, |ui| {
                    for name in self.cache.loader().names() {
                        ui.selectable_value(&mut selected, Some(name.clone()), name);
                    }
                });
            if selected != current {
                if let Some(name) = selected {
                    self.select_or_notify(&name);
                }
            }

            ui.separator();

            if ui.button("Reload").clicked() {
                if let Some(name) = current {
                    self.cache.invalidate(&name);
                    self.select_or_notify(&name);
                }
            }
        });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("menu").show(ctx, |ui| self.menu_ui(ui));

        let mut edited = false;
        let mut export_records = false;
        egui::SidePanel::right("records_panel")
            .default_width(420.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("records")
                    .show(ui, |ui| {
                        let Some(grid) = &mut self.grid else {
                            ui.label("No dataset loaded");
                            return;
                        };
                        match grid.ui(ui) {
                            Ok(response) => {
                                edited = response.edited;
                                export_records = response.export;
                            }
                            Err(err) => {
                                self.toasts.error(err.to_string());
                            }
                        }
                    });
            });

        if edited {
            self.refresh();
        }
        if export_records {
            if let Err(err) = self.export_records() {
                self.toasts.error(err.to_string());
            }
        }

        let mut export_graph = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().id_salt("graphs").show(ui, |ui| {
                for (i, graph) in self.graphs.iter().enumerate() {
                    graph.ui(ui);
                    if graph.figure().is_some() && ui.small_button("Save SVG").clicked() {
                        export_graph = Some(i);
                    }
                    ui.separator();
                }
            });
        });

        if let Some(index) = export_graph {
            if let Err(err) = self.export_graph(index) {
                self.toasts.error(err.to_string());
            }
        }

        self.toasts.show(ctx);
    }
}
