//! Level-detection pipeline for single-molecule intensity traces.
//!
//! The pipeline turns a raw per-frame intensity trace into a set of
//! statistically validated piecewise-constant levels, then groups
//! levels that are indistinguishable from one another:
//!
//! 1. [segment_detect]: window scan for candidate flat segments
//! 2. [segment_merge]: fuse close, compatible neighbours
//! 3. [segment_extend]: grow boundaries into consistent samples
//! 4. [segment_split]: cut segments at outlier samples
//! 5. [segment_filter]: final length, trend and normality validation
//! 6. [group_levels]: partition survivors into level groups
//!
//! Each stage is a pure function of the trace and the previous
//! stage's segment list; [detect_levels] chains them, and
//! [detect_levels_batch] maps the chain over many traces in parallel.

mod config;
mod detect;
mod extend;
mod filter;
mod group;
mod merge;
mod split;

use anyhow::{ensure, Result};
use log::*;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

pub use self::config::LevelConfig;
pub use self::detect::segment_detect;
pub use self::extend::segment_extend;
pub use self::filter::segment_filter;
pub use self::group::group_levels;
pub use self::merge::segment_merge;
pub use self::split::segment_split;
use crate::data_structs::{is_sorted_disjoint, LevelDetection};

/// Runs the full level-detection pipeline on one trace.
///
/// An empty result (no validated levels) is a legitimate outcome for
/// short or featureless traces. Errors indicate contract violations:
/// an invalid configuration or non-finite samples.
pub fn detect_levels(
    trace: &[f64],
    config: &LevelConfig,
) -> Result<LevelDetection> {
    config.validate()?;
    ensure!(
        trace.iter().all(|x| x.is_finite()),
        "trace contains non-finite samples"
    );
    info!("detecting levels in a trace of {} samples", trace.len());

    let candidates = segment_detect(trace, config)?;
    debug_assert!(is_sorted_disjoint(&candidates));

    let merged = segment_merge(&candidates, trace, config)?;
    debug_assert!(is_sorted_disjoint(&merged));

    let extended = segment_extend(&merged, trace, config)?;
    debug_assert!(is_sorted_disjoint(&extended));

    let split = segment_split(&extended, trace, config)?;
    debug_assert!(is_sorted_disjoint(&split));

    let levels = segment_filter(&split, trace, config)?;
    let groups = group_levels(&levels, trace, config)?;

    info!(
        "trace of {} samples resolved into {} levels across {} groups",
        trace.len(),
        levels.len(),
        groups.len()
    );
    Ok(LevelDetection::new(levels, groups))
}

/// Runs [detect_levels] over many independent traces in parallel.
///
/// Results keep the input order. A trace that fails keeps its error in
/// place and never disturbs the neighbouring traces; callers decide
/// whether to log and skip or abort.
pub fn detect_levels_batch<T: AsRef<[f64]> + Sync>(
    traces: &[T],
    config: &LevelConfig,
) -> Vec<Result<LevelDetection>> {
    traces
        .par_iter()
        .map(|trace| detect_levels(trace.as_ref(), config))
        .collect()
}
