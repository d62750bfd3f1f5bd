use anyhow::Result;
use log::*;

use crate::data_structs::Segment;
use crate::tools::levels::LevelConfig;
use crate::utils::{median, std_dev};

/// Grows each segment's boundaries into adjacent samples consistent
/// with the segment's statistics.
///
/// For every segment the walk reaches at most `window_size - 1`
/// samples outward on each side, clamped against the trace bounds and
/// against the neighbouring segments (the left walk clamps against the
/// already-extended previous segment, so the output stays disjoint).
/// A sample joins the segment while `|x - median| < gradient_sigma *
/// std`; the walk stops at the first failure.
///
/// The acceptance band is computed once per segment, from the
/// segment's extent before extension.
pub fn segment_extend(
    segments: &[Segment],
    trace: &[f64],
    config: &LevelConfig,
) -> Result<Vec<Segment>> {
    let w = config.window_size;
    let n = trace.len();
    let mut extended: Vec<Segment> = Vec::with_capacity(segments.len());

    for (k, segment) in segments.iter().enumerate() {
        let data = segment.slice(trace);
        let m = median(data)?;
        let band = config.gradient_sigma * std_dev(data)?;

        let next_start = segments
            .get(k + 1)
            .map_or(n, |next| next.start());
        let ceil = (segment.end() + w - 1).min(n).min(next_start);
        let mut end = segment.end();
        while end < ceil && (trace[end] - m).abs() < band {
            end += 1;
        }

        let prev_end = if k > 0 { extended[k - 1].end() } else { 0 };
        let floor = segment
            .start()
            .saturating_sub(w - 1)
            .max(prev_end);
        let mut start = segment.start();
        while start > floor && (trace[start - 1] - m).abs() < band {
            start -= 1;
        }

        if start != segment.start() || end != segment.end() {
            trace!("extended {} to [{}, {})", segment, start, end);
        }
        extended.push(Segment::new(start, end));
    }

    debug!("extender processed {} segments", extended.len());
    Ok(extended)
}
