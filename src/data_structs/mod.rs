//! Value types produced and consumed by the level-detection pipeline.

mod level;
mod segment;

pub use level::{LevelDetection, LevelGroup, LevelSummary};
pub use segment::{is_sorted_disjoint, Segment};
