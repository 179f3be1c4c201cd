use chronotope_protocol::Color;

pub mod category_axis;
pub mod scatter;

pub use category_axis::render_category_axis;
pub use scatter::render_scatter;

/// Outline color a renderer applies to the hovered point.
pub const HOVER_COLOR: Color = Color::rgb(0x01, 0xff, 0x46);
