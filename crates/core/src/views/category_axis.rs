use chronotope_protocol::{Point, RenderCommand, TextAlign};

use crate::layout::{ChartDimensions, Layout};

const TICK_LENGTH: f64 = 6.0;
const LABEL_GAP: f64 = 3.0;

/// Render the categorical y-axis: one tick per segment, emitted
/// top-to-bottom. Each label is colored with the segment's own color; the
/// short divider beside it is stroked with the owning group's color at a
/// row-height width, marking the group band. Segments without a resolvable
/// group get a label but no divider.
///
/// Commands are emitted in axis-local coordinates: x = 0 is the chart's
/// left edge, labels extend into negative x by the computed axis offset.
pub fn render_category_axis(layout: &Layout, dims: &ChartDimensions) -> Vec<RenderCommand> {
    let segments = layout.ordered_segments();
    if segments.is_empty() {
        return Vec::new();
    }

    let offset = layout.axis_offset(dims);
    let mut commands = Vec::with_capacity(segments.len() * 2 + 2);
    commands.push(RenderCommand::BeginGroup {
        id: "category-axis".into(),
        label: Some("Segments".into()),
    });

    let count = segments.len();
    for (tick, segment) in layout.tick_labels().enumerate() {
        let rank = count - 1 - tick;
        let y = layout.y_for_rank(rank);

        if let Some(color) = layout.group_color(segment.group_no) {
            commands.push(RenderCommand::DrawLine {
                from: Point::new(-offset, y),
                to: Point::new(-offset + TICK_LENGTH, y),
                color,
                width: dims.height_per_segment + 1.0,
            });
        }

        commands.push(RenderCommand::DrawText {
            position: Point::new(-offset + TICK_LENGTH + LABEL_GAP, y),
            text: segment.name.clone(),
            color: layout.segment_color(segment.segment_no),
            font_size: dims.segment_name_font_size,
            align: TextAlign::Left,
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}
