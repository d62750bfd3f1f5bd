//! # photolevels
//!
//! `photolevels` segments a noisy one-dimensional intensity trace
//! (single-molecule fluorescence photon counts sampled frame by frame)
//! into a set of statistically validated piecewise-constant "levels,"
//! and further groups levels that are statistically indistinguishable
//! from one another (e.g. a photophysical state the molecule revisits
//! after an excursion).
//!
//! The crate is a pure computation library: where the trace comes from
//! (tracking, channel selection) and where the resulting boundaries go
//! (databases, plots) is the caller's business. The engine consumes a
//! plain `&[f64]` and produces index ranges into it.
//!
//! ## Key features
//!
//! * **Windowed changepoint detection**: local variance estimation
//!   over fixed windows, with homogeneity, normality and linear-trend
//!   tests guarding candidate growth.
//! * **Statistical validation**: one- and two-sample
//!   Kolmogorov-Smirnov hypothesis testing with the asymptotic
//!   Kolmogorov distribution drives merging, filtering and grouping.
//! * **Level grouping**: greedy equivalence clustering of validated
//!   segments into distinct intensity levels.
//! * **Batch processing**: Rayon-parallel mapping over independent
//!   traces, with per-trace error isolation.
//!
//! ## Structure
//!
//! * [`data_structs`]: value types [`Segment`], [`LevelGroup`],
//!   [`LevelDetection`] and [`LevelSummary`].
//! * [`tools`]: the level-detection pipeline and its configuration.
//! * [`utils`]: statistics primitives shared by every stage.
//!
//! ## Usage
//!
//! ```
//! use photolevels::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     // one channel's per-frame photon counts for one tracked object
//!     let trace: Vec<f64> = vec![5.1, 4.9, 5.0, 5.05, 4.95, 5.02, 4.98, 5.1];
//!
//!     let config = LevelConfig::default();
//!     let detection = detect_levels(&trace, &config)?;
//!
//!     for (i, group) in detection.groups().iter().enumerate() {
//!         let summary = group.summary(&trace)?;
//!         println!(
//!             "level {}: {} segments, {} samples, mean {:.2}",
//!             i, summary.n_segments, summary.n_samples, summary.mean
//!         );
//!     }
//!     // a trace too short for even two windows is a valid empty result
//!     assert!(detection.is_empty());
//!     Ok(())
//! }
//! ```
//!
//! Driving the pipeline stage by stage is also supported; every stage
//! is exported as a free function taking the trace and the previous
//! stage's segment list:
//!
//! ```
//! use photolevels::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let trace: Vec<f64> = (0..100)
//!         .map(|i| 5.0 + 0.01 * ((i % 7) as f64 - 3.0))
//!         .collect();
//!     let config = LevelConfig::default();
//!
//!     let candidates = segment_detect(&trace, &config)?;
//!     let merged = segment_merge(&candidates, &trace, &config)?;
//!     let extended = segment_extend(&merged, &trace, &config)?;
//!     assert!(is_sorted_disjoint(&extended));
//!     Ok(())
//! }
//! ```
//!
//! [`Segment`]: data_structs::Segment
//! [`LevelGroup`]: data_structs::LevelGroup
//! [`LevelDetection`]: data_structs::LevelDetection
//! [`LevelSummary`]: data_structs::LevelSummary

pub mod data_structs;
pub mod prelude;
pub mod tools;
pub mod utils;
