use anyhow::Result;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::data_structs::Segment;
use crate::getter_fn;
use crate::utils::{mean, median, std_dev};

/// A set of segments judged to share one underlying intensity level
/// and noise distribution (e.g. a photophysical state the molecule
/// revisits after an excursion).
///
/// Segments keep the left-to-right order they had in the validated
/// segment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelGroup {
    segments: Vec<Segment>,
}

impl LevelGroup {
    /// Creates a group from its member segments.
    ///
    /// # Panics
    ///
    /// Panics on an empty member list; the grouper never emits one.
    pub fn new(segments: Vec<Segment>) -> Self {
        assert!(!segments.is_empty(), "a level group cannot be empty");
        Self { segments }
    }

    getter_fn!(segments, Vec<Segment>);

    pub fn n_segments(&self) -> usize {
        self.segments.len()
    }

    /// Total number of trace samples covered by the group.
    pub fn n_samples(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    /// Whether `index` falls inside any member segment.
    pub fn contains(
        &self,
        index: usize,
    ) -> bool {
        self.segments.iter().any(|s| s.contains(index))
    }

    /// Concatenates the samples of all member segments, in segment
    /// order.
    pub fn samples(
        &self,
        trace: &[f64],
    ) -> Vec<f64> {
        self.segments
            .iter()
            .flat_map(|s| s.slice(trace).iter().copied())
            .collect_vec()
    }

    /// Descriptive statistics of the group over the given trace.
    pub fn summary(
        &self,
        trace: &[f64],
    ) -> Result<LevelSummary> {
        let samples = self.samples(trace);
        Ok(LevelSummary {
            n_segments: self.n_segments(),
            n_samples:  samples.len(),
            mean:       mean(&samples),
            median:     median(&samples)?,
            std_dev:    std_dev(&samples)?,
        })
    }
}

/// Descriptive statistics of one level group, for callers that export
/// per-level scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub n_segments: usize,
    pub n_samples:  usize,
    pub mean:       f64,
    pub median:     f64,
    pub std_dev:    f64,
}

/// Final output of the level-detection pipeline: the validated segment
/// list (pre-grouping "levels") and its partition into level groups.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelDetection {
    segments: Vec<Segment>,
    groups:   Vec<LevelGroup>,
}

impl LevelDetection {
    pub fn new(
        segments: Vec<Segment>,
        groups: Vec<LevelGroup>,
    ) -> Self {
        Self { segments, groups }
    }

    getter_fn!(segments, Vec<Segment>);

    getter_fn!(groups, Vec<LevelGroup>);

    /// Number of distinct levels found.
    pub fn n_levels(&self) -> usize {
        self.groups.len()
    }

    /// True when no segment survived validation, a legitimate outcome
    /// for short or featureless traces, not an error.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Per-group descriptive statistics, in group order.
    pub fn summaries(
        &self,
        trace: &[f64],
    ) -> Result<Vec<LevelSummary>> {
        self.groups.iter().map(|g| g.summary(trace)).collect()
    }
}
