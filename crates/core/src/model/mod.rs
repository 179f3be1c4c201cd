pub mod dataset;
pub mod records;

pub use dataset::Dataset;
pub use records::{ChartMap, ChronotopeNode, Group, Segment};
