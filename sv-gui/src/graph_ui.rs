use eframe::egui;
use egui::{CornerRadius, Sense, vec2};
use sv_core::{dataset::GraphKind, graph::Graph, table::Table};
use sv_graphics::{
    EncodeError,
    colorscale::Palette,
    common::TOLERANCE,
    figure::Figure,
    shape::Shapes,
};

const HEIGHT: f32 = 420.0;

/// One graph panel of the dashboard.
pub(crate) struct GraphUi {
    pub(crate) kind: GraphKind,
    graph: Graph,
    figure: Result<Figure, EncodeError>,
}

impl GraphUi {
    pub(crate) fn new(kind: GraphKind, graph: Graph, table: &Table, palette: &Palette) -> Self {
        let figure = Figure::encode(kind, &graph, table, palette);
        Self {
            kind,
            graph,
            figure,
        }
    }

    /// Re-encode against a new table snapshot, e.g. after an edit.
    pub(crate) fn refresh(&mut self, table: &Table, palette: &Palette) {
        self.figure = Figure::encode(self.kind, &self.graph, table, palette);
    }

    pub(crate) fn figure(&self) -> Option<&Figure> {
        self.figure.as_ref().ok()
    }

    pub(crate) fn ui(&self, ui: &mut egui::Ui) {
        let figure = match &self.figure {
            Ok(figure) => figure,
            Err(err) => {
                ui.group(|ui| {
                    ui.set_min_size(vec2(ui.available_width(), HEIGHT / 4.0));
                    ui.strong(self.kind.title());
                    ui.colored_label(ui.visuals().error_fg_color, err.to_string());
                });
                return;
            }
        };

        let (response, painter) =
            ui.allocate_painter(vec2(ui.available_width(), HEIGHT), Sense::hover());
        let rect = response.rect;
        let shapes = Shapes::from_figure(figure, rect.size()).placed_in(rect);

        let hover = response
            .hover_pos()
            .and_then(|pos| shapes.hover_at(pos, TOLERANCE))
            .map(str::to_owned);

        painter.add(egui::Shape::rect_filled(
            rect,
            CornerRadius::ZERO,
            ui.visuals().faint_bg_color,
        ));
        painter.extend(
            shapes
                .shapes
                .into_iter()
                .map(|shape| shape.into_egui_shape(ui)),
        );

        if let Some(text) = hover {
            response.on_hover_text_at_pointer(text);
        }
    }
}
