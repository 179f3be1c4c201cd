use chronotope_protocol::{Point, RenderCommand};

use crate::layout::Layout;
use crate::model::Dataset;

const POINT_RADIUS: f64 = 2.0;

/// Plot every chronotope event as a circle: x = event instant through the
/// horizontal scale, y = the resolved segment's rank through the vertical
/// scale, fill = the segment's own color.
///
/// Events whose `segment_no` resolves to nothing are still plotted, at
/// rank 0 with the red fallback fill — hovering them shows no detail.
pub fn render_scatter(dataset: &Dataset, layout: &Layout) -> Vec<RenderCommand> {
    if dataset.chronotope.is_empty() {
        return Vec::new();
    }

    let mut commands = Vec::with_capacity(dataset.chronotope.len() + 2);
    commands.push(RenderCommand::BeginGroup {
        id: "chronotope-scatter".into(),
        label: Some("Chronotope nodes".into()),
    });

    for node in &dataset.chronotope {
        let rank = layout.rank_of(node.segment_no).unwrap_or(0);
        commands.push(RenderCommand::DrawCircle {
            center: Point::new(layout.x_for_time(node.hit_time), layout.y_for_rank(rank)),
            radius: POINT_RADIUS,
            color: layout.segment_color(node.segment_no),
            node_id: Some(node.node_id.clone()),
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}
