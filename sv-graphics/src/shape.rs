use egui::{
    Align2, Color32, CornerRadius, FontId, Pos2, Rect, Stroke, Vec2, emath::RectTransform,
    epaint::CircleShape, pos2, vec2,
};
use sv_core::common::NodeId;

use crate::{
    common::{
        EDGE_COLOR, EDGE_STROKE, MARGIN, MARKER_RADIUS, MARKER_STROKE, MISSING_COLOR, TEXT_SIZE,
        TITLE_SIZE,
    },
    figure::Figure,
};

const LEGEND_WIDTH: f32 = 80.0;
const SWATCH: f32 = 12.0;
const LEGEND_ROW: f32 = 18.0;

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Line {
        start: Pos2,
        end: Pos2,
    },
    Marker {
        center: Pos2,
        radius: f32,
        fill: Color32,
        node: NodeId,
        hover: String,
    },
    Swatch {
        rect: Rect,
        fill: Color32,
    },
    Text {
        text: String,
        pos: Pos2,
        size: f32,
        anchor: Align2,
    },
}

/// Shapes of one figure, laid out in a canvas of the given size.
#[derive(Clone, Debug, PartialEq)]
pub struct Shapes {
    pub shapes: Vec<Shape>,
    pub size: Vec2,
}

impl Shape {
    pub fn apply_transform(&mut self, transform: &RectTransform) {
        match self {
            Self::Line { start, end } => {
                *start = transform.transform_pos(*start);
                *end = transform.transform_pos(*end);
            }
            Self::Marker { center, .. } => {
                *center = transform.transform_pos(*center);
            }
            Self::Swatch { rect, .. } => {
                *rect = transform.transform_rect(*rect);
            }
            Self::Text { pos, .. } => {
                *pos = transform.transform_pos(*pos);
            }
        }
    }

    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        match self {
            Self::Line { start, end } => Rect::from_two_pos(*start, *end),
            Self::Marker { center, radius, .. } => {
                Rect::from_center_size(*center, Vec2::splat(*radius * 2.0))
            }
            Self::Swatch { rect, .. } => *rect,
            Self::Text { pos, size, .. } => Rect::from_center_size(*pos, vec2(0.0, *size)),
        }
    }

    #[must_use]
    pub fn into_egui_shape(self, ui: &egui::Ui) -> egui::Shape {
        match self {
            Self::Line { start, end } => {
                egui::Shape::line_segment([start, end], Stroke::new(EDGE_STROKE, EDGE_COLOR))
            }
            Self::Marker {
                center,
                radius,
                fill,
                ..
            } => egui::Shape::Circle(CircleShape {
                center,
                radius,
                fill,
                stroke: Stroke::new(MARKER_STROKE, ui.visuals().extreme_bg_color),
            }),
            Self::Swatch { rect, fill } => egui::Shape::rect_filled(rect, CornerRadius::ZERO, fill),
            Self::Text {
                text,
                pos,
                size,
                anchor,
            } => ui.fonts(|fonts| {
                egui::Shape::text(
                    fonts,
                    pos,
                    anchor,
                    text,
                    FontId::proportional(size),
                    ui.visuals().text_color(),
                )
            }),
        }
    }
}

impl Shapes {
    /// Lay out `figure` in a canvas of `size`: edges, then markers, then the
    /// title, annotation and a legend with one swatch per color band.
    #[must_use]
    pub fn from_figure(figure: &Figure, size: Vec2) -> Self {
        let [left, right, top, bottom] = MARGIN;
        let plot = Rect::from_min_max(
            pos2(left, top),
            pos2(
                (size.x - right - LEGEND_WIDTH).max(left + 1.0),
                (size.y - bottom).max(top + 1.0),
            ),
        );
        let data = figure
            .layout
            .bounds()
            .map_or(Rect::from_min_max(Pos2::ZERO, pos2(1.0, 1.0)), pad);

        // Data `y` grows upwards, screen `y` downwards.
        let to_screen = |x: f64, y: f64| {
            pos2(
                plot.min.x + (x as f32 - data.min.x) / data.width() * plot.width(),
                plot.max.y - (y as f32 - data.min.y) / data.height() * plot.height(),
            )
        };

        let mut shapes = Vec::new();

        for [(x0, y0), (x1, y1)] in figure.layout.segments() {
            shapes.push(Shape::Line {
                start: to_screen(x0, y0),
                end: to_screen(x1, y1),
            });
        }

        let layout = &figure.layout;
        for (i, node) in layout.node_id.iter().enumerate() {
            shapes.push(Shape::Marker {
                center: to_screen(layout.node_x[i], layout.node_y[i]),
                radius: MARKER_RADIUS,
                fill: figure.node_color(i).unwrap_or(MISSING_COLOR),
                node: node.clone(),
                hover: figure.hover.get(i).cloned().unwrap_or_default(),
            });
        }

        shapes.push(Shape::Text {
            text: figure.title.clone(),
            pos: pos2(left, top / 2.0),
            size: TITLE_SIZE,
            anchor: Align2::LEFT_CENTER,
        });
        shapes.push(Shape::Text {
            text: figure.annotation.clone(),
            pos: pos2(plot.max.x, top / 2.0),
            size: TEXT_SIZE,
            anchor: Align2::RIGHT_CENTER,
        });

        let legend_x = plot.max.x + 10.0;
        for (i, chromosome) in figure.scale.categories().iter().enumerate() {
            let y = plot.min.y + i as f32 * LEGEND_ROW;
            let rect = Rect::from_min_size(pos2(legend_x, y), Vec2::splat(SWATCH));
            let fill = figure
                .scale
                .color_of(chromosome)
                .unwrap_or(MISSING_COLOR);
            shapes.push(Shape::Swatch { rect, fill });
            shapes.push(Shape::Text {
                text: format!("chr{chromosome}"),
                pos: pos2(rect.max.x + 4.0, rect.center().y),
                size: TEXT_SIZE,
                anchor: Align2::LEFT_CENTER,
            });
        }

        Self { shapes, size }
    }

    /// The hover text of the marker closest to `pos`, if `pos` lies within
    /// `tolerance` of its outline.
    #[must_use]
    pub fn hover_at(&self, pos: Pos2, tolerance: f32) -> Option<&str> {
        self.shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Marker {
                    center,
                    radius,
                    hover,
                    ..
                } => {
                    let distance = center.distance(pos);
                    (distance <= radius + tolerance).then_some((distance, hover.as_str()))
                }
                _ => None,
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, hover)| hover)
    }

    /// Move every shape into `rect`, e.g. the screen area of a panel.
    #[must_use]
    pub fn placed_in(&self, rect: Rect) -> Self {
        let transform = RectTransform::from_to(Rect::from_min_size(Pos2::ZERO, self.size), rect);
        let mut shapes = self.shapes.clone();
        for shape in &mut shapes {
            shape.apply_transform(&transform);
        }
        Self {
            shapes,
            size: rect.size(),
        }
    }
}

/// Give degenerate bounds some extent and keep markers off the plot edges.
fn pad(rect: Rect) -> Rect {
    let extent = vec2(rect.width().max(1.0), rect.height().max(1.0));
    Rect::from_center_size(rect.center(), extent * 1.1)
}
