//! Convenience re-exports of the types and entry points most callers
//! need.

pub use crate::data_structs::{
    is_sorted_disjoint,
    LevelDetection,
    LevelGroup,
    LevelSummary,
    Segment,
};
pub use crate::tools::levels::{
    detect_levels,
    detect_levels_batch,
    group_levels,
    segment_detect,
    segment_extend,
    segment_filter,
    segment_merge,
    segment_split,
    LevelConfig,
};
pub use crate::utils::stats::{
    has_gradient,
    ks_dist_p,
    ks_dist_q,
    ks_test_one_sample,
    ks_test_two_sample,
    mean,
    median,
    normal_cdf,
    std_dev,
    trend_statistic,
    whiten,
};
