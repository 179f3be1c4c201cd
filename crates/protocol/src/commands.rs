use serde::{Deserialize, Serialize};

use crate::types::{Color, Point};

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` per view. Renderers consume the
/// list sequentially — each command carries all the data it needs, with
/// colors resolved from the dataset rather than a theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled circle, optionally carrying the logical node id it
    /// represents (for hit-testing / hover wiring).
    DrawCircle {
        center: Point,
        radius: f64,
        color: Color,
        node_id: Option<String>,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: Color,
        width: f64,
    },

    /// Draw a text string at a position.
    DrawText {
        position: Point,
        text: String,
        color: Color,
        font_size: f64,
        align: TextAlign,
    },

    /// Begin a logical group (e.g. the scatter layer or the category axis).
    /// Renderers may use this for batching or accessibility.
    BeginGroup {
        id: String,
        label: Option<String>,
    },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}
