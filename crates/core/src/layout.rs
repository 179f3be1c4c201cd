use chrono::{DateTime, Utc};
use chronotope_protocol::Color;
use serde::{Deserialize, Serialize};

use crate::model::{Dataset, Group, Segment};

/// Pixel geometry knobs for the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartDimensions {
    /// Horizontal pixels per day of the event time range.
    pub width_per_day: f64,
    /// Vertical pixels per segment row.
    pub height_per_segment: f64,
    /// Font size of the axis segment labels, in pixels.
    pub segment_name_font_size: f64,
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self {
            width_per_day: 18.0,
            height_per_segment: 8.0,
            segment_name_font_size: 6.4,
        }
    }
}

/// A linear value → pixel mapping. Degenerate domains (zero span) map
/// every input to the start of the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn scale(&self, value: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 {
            return self.range.0;
        }
        self.range.0 + (value - self.domain.0) * (self.range.1 - self.range.0) / span
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// One ordered group and the segments it owns, in their axis order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    pub group: Group,
    pub segments: Vec<Segment>,
}

/// Derived chart layout: the group-then-segment total order over segments,
/// the two value → pixel scales, and the color/reverse lookups built on
/// that order.
///
/// Pure derived state — recomputed from scratch whenever the dataset
/// changes, never incrementally updated. Building a layout cannot fail;
/// unresolvable references surface as `Option`s at lookup time.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    rows: Vec<GroupRow>,
    /// Flattened total order. Index = rank; rank 0 renders at the bottom
    /// of the chart, the highest rank nearest the top.
    order: Vec<Segment>,
    y_scale: LinearScale,
    x_scale: LinearScale,
    total_height: f64,
    pixel_width: f64,
}

impl Layout {
    /// Compute the ordered, colored, indexed layout for a merged dataset.
    pub fn build(dataset: &Dataset, dims: &ChartDimensions) -> Self {
        // Group ordering: ascending by `position`. `sort_by_key` is stable,
        // so groups sharing a position keep their input order.
        let mut ordered_groups = dataset.groups.clone();
        ordered_groups.sort_by_key(|g| g.position);

        // Segment grouping: one row per ordered group, segments sorted by
        // `position` within it (again stable on ties).
        let mut claimed = vec![false; dataset.segments.len()];
        let mut rows = Vec::with_capacity(ordered_groups.len());
        for group in ordered_groups {
            let mut segments = Vec::new();
            for (index, segment) in dataset.segments.iter().enumerate() {
                if segment.group_no == group.group_no {
                    claimed[index] = true;
                    segments.push(segment.clone());
                }
            }
            segments.sort_by_key(|s| s.position);
            rows.push(GroupRow { group, segments });
        }

        // Segments referencing an unknown group still take a rank, after
        // all rows, so the order always covers every fetched segment.
        let mut unattached: Vec<Segment> = dataset
            .segments
            .iter()
            .zip(&claimed)
            .filter(|(_, claimed)| !**claimed)
            .map(|(segment, _)| segment.clone())
            .collect();
        unattached.sort_by_key(|s| s.position);

        let mut order: Vec<Segment> = rows
            .iter()
            .flat_map(|row| row.segments.iter().cloned())
            .collect();
        order.append(&mut unattached);

        // Vertical scale: position 0 nearest the bottom, the highest
        // position nearest the top (inverted axis). The chart height uses
        // the map's advisory segment count, as the source does.
        let total_height = dims.height_per_segment * dataset.map.num_segments as f64;
        let max_position = dataset
            .segments
            .iter()
            .map(|s| s.position)
            .max()
            .unwrap_or(0) as f64;
        let y_scale = LinearScale::new((max_position, 0.0), (0.0, total_height));

        // Horizontal scale: event time range → rounded day count at a
        // fixed pixel width per day.
        let pixel_width = dims.width_per_day * dataset.time_frame_days() as f64;
        let (x0, x1) = dataset
            .time_range()
            .map(|(earliest, latest)| {
                (
                    earliest.timestamp_millis() as f64,
                    latest.timestamp_millis() as f64,
                )
            })
            .unwrap_or((0.0, 0.0));
        let x_scale = LinearScale::new((x0, x1), (0.0, pixel_width));

        Self {
            rows,
            order,
            y_scale,
            x_scale,
            total_height,
            pixel_width,
        }
    }

    /// The jagged group → segments table, in axis order.
    pub fn rows(&self) -> &[GroupRow] {
        &self.rows
    }

    /// The flattened total order over segments (rank = index).
    pub fn ordered_segments(&self) -> &[Segment] {
        &self.order
    }

    /// Axis tick labels, emitted top-to-bottom — the reverse of the
    /// bottom-to-top rank order.
    pub fn tick_labels(&self) -> impl Iterator<Item = &Segment> {
        self.order.iter().rev()
    }

    /// Reverse lookup from a raw `segment_no` to its ordered segment.
    pub fn resolve_segment(&self, segment_no: u32) -> Option<&Segment> {
        self.order.iter().find(|s| s.segment_no == segment_no)
    }

    /// Rank of a segment in the total order, if it was fetched.
    pub fn rank_of(&self, segment_no: u32) -> Option<usize> {
        self.order.iter().position(|s| s.segment_no == segment_no)
    }

    /// The group a segment belongs to, if it was fetched.
    pub fn group(&self, group_no: u32) -> Option<&Group> {
        self.rows
            .iter()
            .map(|row| &row.group)
            .find(|g| g.group_no == group_no)
    }

    /// Plotted color of a segment: its own hex color, red when the hex
    /// string is malformed or the segment is unknown.
    pub fn segment_color(&self, segment_no: u32) -> Color {
        self.resolve_segment(segment_no)
            .and_then(|s| Color::from_hex(&s.hexadecimal))
            .unwrap_or(Color::RED)
    }

    /// Divider color of a group, if the group resolves and its hex parses.
    pub fn group_color(&self, group_no: u32) -> Option<Color> {
        self.group(group_no)
            .and_then(|g| Color::from_hex(&g.hexadecimal))
    }

    /// The vertical value → pixel scale.
    pub fn y_scale(&self) -> &LinearScale {
        &self.y_scale
    }

    /// The horizontal value → pixel scale (domain in epoch milliseconds).
    pub fn x_scale(&self) -> &LinearScale {
        &self.x_scale
    }

    /// Vertical pixel for a rank in the total order.
    pub fn y_for_rank(&self, rank: usize) -> f64 {
        self.y_scale.scale(rank as f64)
    }

    /// Horizontal pixel for an event instant.
    pub fn x_for_time(&self, time: DateTime<Utc>) -> f64 {
        self.x_scale.scale(time.timestamp_millis() as f64)
    }

    pub fn total_height(&self) -> f64 {
        self.total_height
    }

    pub fn pixel_width(&self) -> f64 {
        self.pixel_width
    }

    /// Left offset reserving room for the longest axis label.
    pub fn axis_offset(&self, dims: &ChartDimensions) -> f64 {
        let longest = self
            .order
            .iter()
            .map(|s| s.name.chars().count().saturating_sub(1))
            .max()
            .unwrap_or(0);
        longest as f64 * dims.segment_name_font_size * 0.5 + 9.0
    }
}
