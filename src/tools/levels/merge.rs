use anyhow::Result;
use log::*;

use crate::data_structs::Segment;
use crate::tools::levels::LevelConfig;
use crate::utils::ks_test_two_sample;

/// Fuses adjacent candidate segments that are statistically
/// indistinguishable and close together.
///
/// An adjacent pair is mergeable when the gap between them is under
/// two samples AND a two-sample KS test cannot tell their raw samples
/// apart. Mergeable flags glue transitively: a run of mergeable pairs
/// collapses all segments it spans into one segment from the first
/// start to the last end.
pub fn segment_merge(
    segments: &[Segment],
    trace: &[f64],
    config: &LevelConfig,
) -> Result<Vec<Segment>> {
    if segments.is_empty() {
        return Ok(Vec::new());
    }

    let pair_count = segments.len() - 1;
    let mut mergeable = Vec::with_capacity(pair_count);
    for pair in segments.windows(2) {
        let close = pair[1].start() - pair[0].end() < 2;
        let flag = close
            && ks_test_two_sample(pair[0].slice(trace), pair[1].slice(trace))?
                > config.significance_level;
        mergeable.push(flag);
    }

    let mut merged = Vec::new();
    let mut merging = false;
    let mut merge_start = 0usize;
    let mut idx = 0usize;

    for i in 0..pair_count {
        if mergeable[i] && merging {
            idx += 1;
        }
        else if mergeable[i] && !merging {
            merging = true;
            merge_start = idx;
            idx += 1;
        }
        else if !mergeable[i] && merging {
            merging = false;
            merged.push(Segment::new(
                segments[merge_start].start(),
                segments[idx].end(),
            ));
            idx += 1;
        }
        else {
            merged.push(segments[idx]);
            idx += 1;
        }
    }
    if merging {
        merged.push(Segment::new(
            segments[merge_start].start(),
            segments[pair_count].end(),
        ));
    }
    else {
        merged.push(segments[pair_count]);
    }

    debug!(
        "merger fused {} candidates into {}",
        segments.len(),
        merged.len()
    );
    Ok(merged)
}
