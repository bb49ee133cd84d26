use egui::Color32;

pub const MARKER_RADIUS: f32 = 5.0;
pub const MARKER_STROKE: f32 = 2.0;
pub const EDGE_STROKE: f32 = 0.5;
pub const EDGE_COLOR: Color32 = Color32::from_rgb(0x88, 0x88, 0x88);
/// Fill of markers whose color value falls outside the scale.
pub const MISSING_COLOR: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);
pub const TITLE_SIZE: f32 = 16.0;
pub const TEXT_SIZE: f32 = 12.0;
/// Hover tolerance around markers, in screen units.
pub const TOLERANCE: f32 = 3.0;

/// Space kept around the plot area: left, right, top, bottom.
pub const MARGIN: [f32; 4] = [15.0, 5.0, 40.0, 20.0];

#[must_use]
pub fn to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}
