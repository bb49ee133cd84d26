use egui::Align;
use svg::{
    Document, Node,
    node::element::{Circle, Element, Line, Rectangle},
};

use crate::{
    common::{EDGE_COLOR, EDGE_STROKE, MARKER_STROKE, to_hex},
    shape::{Shape, Shapes},
};

fn text_element(content: &str) -> Element {
    let mut text = Element::new("text");
    text.append(svg::node::Text::new(content));
    text
}

impl Shape {
    pub(crate) fn to_svg(&self) -> Box<dyn Node> {
        match self {
            Self::Line { start, end } => Box::new(
                Line::new()
                    .set("x1", start.x)
                    .set("y1", start.y)
                    .set("x2", end.x)
                    .set("y2", end.y)
                    .set("stroke", to_hex(EDGE_COLOR))
                    .set("stroke-width", EDGE_STROKE),
            ),
            Self::Marker {
                center,
                radius,
                fill,
                hover,
                ..
            } => {
                let mut title = Element::new("title");
                title.append(svg::node::Text::new(hover.as_str()));
                Box::new(
                    Circle::new()
                        .set("cx", center.x)
                        .set("cy", center.y)
                        .set("r", *radius)
                        .set("fill", to_hex(*fill))
                        .set("stroke", "white")
                        .set("stroke-width", MARKER_STROKE)
                        .add(title),
                )
            }
            Self::Swatch { rect, fill } => Box::new(
                Rectangle::new()
                    .set("x", rect.min.x)
                    .set("y", rect.min.y)
                    .set("width", rect.width())
                    .set("height", rect.height())
                    .set("fill", to_hex(*fill)),
            ),
            Self::Text {
                text,
                pos,
                size,
                anchor,
            } => {
                let text_anchor = match anchor.x() {
                    Align::Min => "start",
                    Align::Center => "middle",
                    Align::Max => "end",
                };
                let mut element = text_element(text);
                element.assign("x", pos.x);
                element.assign("y", pos.y);
                element.assign("font-size", *size);
                element.assign("font-family", "sans-serif");
                element.assign("text-anchor", text_anchor);
                element.assign("dominant-baseline", "middle");
                Box::new(element)
            }
        }
    }
}

impl Shapes {
    #[must_use]
    pub fn to_svg(&self) -> Document {
        let mut document = Document::new()
            .set("width", self.size.x)
            .set("height", self.size.y)
            .set("viewBox", format!("0 0 {} {}", self.size.x, self.size.y));

        for shape in &self.shapes {
            document = document.add(shape.to_svg());
        }

        document
    }
}
