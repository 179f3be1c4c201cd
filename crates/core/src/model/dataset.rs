use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::records::{ChartMap, ChronotopeNode, Group, Segment};

/// The merged result of one fetch cycle.
///
/// Created once per successful fetch and held immutable for the session;
/// the layout engine and hover resolver only ever read from it. A fresh
/// fetch replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub map: ChartMap,
    pub groups: Vec<Group>,
    pub segments: Vec<Segment>,
    pub chronotope: Vec<ChronotopeNode>,
}

impl Dataset {
    /// The completeness gate applied after all sources settle: the map
    /// carries a creation instant and every collection is non-empty.
    pub fn is_complete(&self) -> bool {
        self.map.created_at.is_some()
            && !self.groups.is_empty()
            && !self.segments.is_empty()
            && !self.chronotope.is_empty()
    }

    /// Earliest and latest `hit_time` across all events, or `None` when
    /// there are no events.
    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let earliest = self.chronotope.iter().map(|n| n.hit_time).min()?;
        let latest = self.chronotope.iter().map(|n| n.hit_time).max()?;
        Some((earliest, latest))
    }

    /// Whole days spanned by the event time range, rounded. Drives the
    /// horizontal pixel width of the chart.
    pub fn time_frame_days(&self) -> i64 {
        let Some((earliest, latest)) = self.time_range() else {
            return 0;
        };
        let seconds = (latest - earliest).num_seconds();
        (seconds as f64 / 86_400.0).round() as i64
    }
}
