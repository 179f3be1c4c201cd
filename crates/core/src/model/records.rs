use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level dataset descriptor — one per dataset.
///
/// The `num_*` fields are advisory counts reported by the source; they are
/// never asserted against the actual collection lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartMap {
    pub identification: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Creation instant. Absence marks the dataset incomplete.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub num_nodes: u64,
    pub num_groups: u64,
    pub num_segments: u64,
}

/// Top-level category. `position` defines the group ordering on the axis;
/// `group_no` is the stable identifier segments reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub identification: u64,
    pub group_no: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub position: i64,
    /// Bare hex color (no leading `#`), as delivered by the source.
    pub hexadecimal: String,
    #[serde(default)]
    pub num_segments: u64,
    #[serde(default)]
    pub num_nodes: u64,
}

/// Sub-category within exactly one group. `position` orders segments
/// *within* their group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub identification: u64,
    pub segment_no: u32,
    pub group_no: u32,
    pub name: String,
    pub position: i64,
    /// Bare hex color (no leading `#`), as delivered by the source.
    pub hexadecimal: String,
    #[serde(default)]
    pub num_nodes: u64,
}

/// A timestamped event tied to one segment. Arrival order is not sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChronotopeNode {
    pub node_id: String,
    pub message_id: String,
    pub hit_time: DateTime<Utc>,
    pub segment_no: u32,
}
