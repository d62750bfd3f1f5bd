use anyhow::Result;
use log::*;

use crate::data_structs::Segment;
use crate::tools::levels::LevelConfig;
use crate::utils::{median, std_dev};

/// Removes outlier samples from within each segment, splitting it into
/// maximal outlier-free runs.
///
/// A sample is an outlier when `|x - median| > outlier_sigma * std`,
/// with median and std taken over the segment's full extent. Each
/// contiguous run of non-outlier samples becomes its own segment;
/// outliers themselves are dropped from the segmentation.
pub fn segment_split(
    segments: &[Segment],
    trace: &[f64],
    config: &LevelConfig,
) -> Result<Vec<Segment>> {
    let mut split = Vec::with_capacity(segments.len());

    for segment in segments {
        let data = segment.slice(trace);
        let m = median(data)?;
        let band = config.outlier_sigma * std_dev(data)?;

        let mut run_start = 0usize;
        let mut run_on = false;
        for (j, &x) in data.iter().enumerate() {
            let outlier = (x - m).abs() > band;
            if outlier && run_on {
                trace!(
                    "outlier at {} splits {}",
                    segment.start() + j,
                    segment
                );
                split.push(Segment::new(
                    segment.start() + run_start,
                    segment.start() + j,
                ));
                run_on = false;
            }
            else if !outlier && !run_on {
                run_start = j;
                run_on = true;
            }
        }
        if run_on {
            split.push(Segment::new(
                segment.start() + run_start,
                segment.end(),
            ));
        }
    }

    debug!(
        "splitter turned {} segments into {}",
        segments.len(),
        split.len()
    );
    Ok(split)
}
