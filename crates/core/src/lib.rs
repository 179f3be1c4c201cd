pub mod hover;
pub mod layout;
pub mod model;
pub mod svg;
pub mod views;

pub use hover::{HoverController, TargetNode};
pub use layout::{ChartDimensions, Layout, LinearScale};
pub use model::{ChartMap, ChronotopeNode, Dataset, Group, Segment};
