use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::layout::Layout;
use crate::model::ChronotopeNode;

/// Placeholder shown for a group that cannot be resolved from a hovered
/// segment. The segment fields stay accurate; only the group fields
/// degrade.
pub const UNRESOLVED_GROUP_LABEL: &str = "technical difficulties";

/// Detail-panel font size, in rem.
pub const DISPLAY_FONT_SIZE_REM: f64 = 0.6;

/// The enriched record shown while a plotted point is hovered. Ephemeral —
/// recomputed on every pointer-enter, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetNode {
    pub message_id: String,
    pub hit_time: DateTime<Utc>,
    pub segment_name: String,
    pub segment_hex: String,
    pub group_name: String,
    pub group_hex: String,
}

/// Resolve a hovered event into its detail record.
///
/// Returns `None` when the event's `segment_no` matches no fetched segment
/// (silent degradation — no detail is shown). A segment whose group is
/// missing yields sentinel group fields instead of failing.
pub fn compose_target_node(node: &ChronotopeNode, layout: &Layout) -> Option<TargetNode> {
    let segment = layout.resolve_segment(node.segment_no)?;
    let group = layout.group(segment.group_no);
    Some(TargetNode {
        message_id: node.message_id.clone(),
        hit_time: node.hit_time,
        segment_name: segment.name.clone(),
        segment_hex: segment.hexadecimal.clone(),
        group_name: group
            .map(|g| g.name.clone())
            .unwrap_or_else(|| UNRESOLVED_GROUP_LABEL.into()),
        group_hex: group
            .map(|g| g.hexadecimal.clone())
            .unwrap_or_else(|| UNRESOLVED_GROUP_LABEL.into()),
    })
}

/// Exclusive hover state: `idle → hovering → idle`, at most one active
/// target. A pointer-enter on a different point replaces the previous
/// target directly, with no intermediate idle frame.
#[derive(Debug, Clone, Default)]
pub struct HoverController {
    active: Option<TargetNode>,
}

impl HoverController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer entered a plotted point. Returns the new active target,
    /// or `None` if the event resolves to nothing (state falls to idle).
    pub fn pointer_enter(&mut self, node: &ChronotopeNode, layout: &Layout) -> Option<&TargetNode> {
        self.active = compose_target_node(node, layout);
        self.active.as_ref()
    }

    /// Pointer left the hovered point.
    pub fn pointer_leave(&mut self) {
        self.active = None;
    }

    /// The currently hovered target, if any.
    pub fn target(&self) -> Option<&TargetNode> {
        self.active.as_ref()
    }

    pub fn is_hovering(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ChartDimensions;
    use crate::model::{ChartMap, Dataset, Group, Segment};
    use chrono::TimeZone;

    fn fixture() -> (Dataset, Layout) {
        let dataset = Dataset {
            map: ChartMap {
                identification: 1,
                name: "test".into(),
                description: String::new(),
                kind: "chronotope".into(),
                created_at: Some(Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap()),
                num_nodes: 1,
                num_groups: 1,
                num_segments: 2,
            },
            groups: vec![Group {
                identification: 1,
                group_no: 1,
                name: "alpha".into(),
                description: String::new(),
                position: 0,
                hexadecimal: "1d3557".into(),
                num_segments: 1,
                num_nodes: 1,
            }],
            segments: vec![
                Segment {
                    identification: 10,
                    segment_no: 10,
                    group_no: 1,
                    name: "alpha-1".into(),
                    position: 0,
                    hexadecimal: "e63946".into(),
                    num_nodes: 1,
                },
                // References group 7, which was never fetched.
                Segment {
                    identification: 11,
                    segment_no: 11,
                    group_no: 7,
                    name: "stray".into(),
                    position: 0,
                    hexadecimal: "f4845f".into(),
                    num_nodes: 0,
                },
            ],
            chronotope: vec![node(10), node(11)],
        };
        let layout = Layout::build(&dataset, &ChartDimensions::default());
        (dataset, layout)
    }

    fn node(segment_no: u32) -> ChronotopeNode {
        ChronotopeNode {
            node_id: format!("n-{segment_no}"),
            message_id: format!("m-{segment_no}"),
            hit_time: Utc.with_ymd_and_hms(2022, 1, 5, 12, 0, 0).unwrap(),
            segment_no,
        }
    }

    #[test]
    fn resolves_segment_and_group() {
        let (_, layout) = fixture();
        let target = compose_target_node(&node(10), &layout).unwrap();
        assert_eq!(target.message_id, "m-10");
        assert_eq!(target.segment_name, "alpha-1");
        assert_eq!(target.segment_hex, "e63946");
        assert_eq!(target.group_name, "alpha");
        assert_eq!(target.group_hex, "1d3557");
    }

    #[test]
    fn unknown_segment_yields_no_detail() {
        let (_, layout) = fixture();
        assert!(compose_target_node(&node(99), &layout).is_none());
    }

    #[test]
    fn unknown_group_degrades_to_sentinel() {
        let (_, layout) = fixture();
        let target = compose_target_node(&node(11), &layout).unwrap();
        assert_eq!(target.segment_name, "stray");
        assert_eq!(target.segment_hex, "f4845f");
        assert_eq!(target.group_name, UNRESOLVED_GROUP_LABEL);
        assert_eq!(target.group_hex, UNRESOLVED_GROUP_LABEL);
    }

    #[test]
    fn hover_state_is_exclusive() {
        let (_, layout) = fixture();
        let mut hover = HoverController::new();
        assert!(!hover.is_hovering());

        hover.pointer_enter(&node(10), &layout);
        assert_eq!(hover.target().map(|t| t.segment_name.as_str()), Some("alpha-1"));

        // A new enter replaces the target without passing through idle.
        hover.pointer_enter(&node(11), &layout);
        assert_eq!(hover.target().map(|t| t.segment_name.as_str()), Some("stray"));

        hover.pointer_leave();
        assert!(hover.target().is_none());
    }

    #[test]
    fn unresolvable_enter_falls_to_idle() {
        let (_, layout) = fixture();
        let mut hover = HoverController::new();
        hover.pointer_enter(&node(10), &layout);
        assert!(hover.is_hovering());
        hover.pointer_enter(&node(99), &layout);
        assert!(!hover.is_hovering());
    }
}
