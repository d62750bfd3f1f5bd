use std::fmt::Display;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A half-open index range `[start, end)` into a trace, believed to
/// represent one constant-intensity region.
///
/// A segment is a plain value: it has no identity beyond its range and
/// no reference to the trace it was cut from. Ordering is by start
/// position, then end.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub struct Segment {
    start: usize,
    end:   usize,
}

impl Segment {
    /// Creates a new `Segment`.
    ///
    /// # Panics
    ///
    /// Panics if `start >= end`; empty segments are never meaningful.
    pub fn new(
        start: usize,
        end: usize,
    ) -> Self {
        assert!(
            start < end,
            "segment start must be less than end, got [{}, {})",
            start,
            end
        );
        Self { start, end }
    }

    /// Returns the first sample index covered by the segment.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the past-the-end sample index.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the number of samples covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false; construction forbids empty ranges.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `index` falls inside the segment.
    pub fn contains(
        &self,
        index: usize,
    ) -> bool {
        self.start <= index && index < self.end
    }

    /// Borrows the samples this segment covers.
    ///
    /// # Panics
    ///
    /// Panics if the segment reaches past the end of `trace`.
    pub fn slice<'a, F>(
        &self,
        trace: &'a [F],
    ) -> &'a [F] {
        &trace[self.start..self.end]
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl Display for Segment {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl From<Segment> for Range<usize> {
    fn from(value: Segment) -> Self {
        value.as_range()
    }
}

/// Whether the segments are sorted ascending by start and pairwise
/// disjoint. Every pipeline stage preserves this invariant.
pub fn is_sorted_disjoint(segments: &[Segment]) -> bool {
    segments
        .windows(2)
        .all(|pair| pair[0].end <= pair[1].start)
}
