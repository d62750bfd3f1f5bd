use anyhow::Result;
use log::*;

use crate::data_structs::Segment;
use crate::tools::levels::LevelConfig;
use crate::utils::{
    has_gradient,
    ks_test_one_sample,
    mean,
    normal_cdf,
    std_dev,
    whiten,
};

/// Scans the trace window by window and emits the initial set of
/// candidate flat segments.
///
/// The trace is divided into `floor(N / W)` non-overlapping windows; a
/// candidate level keeps growing across window `i` while all of the
/// following hold:
///
/// 1. the mean of the per-window standard deviations over the whole
///    candidate matches the standard deviation of the candidate's raw
///    samples within the homogeneity tolerance (no hidden
///    sub-structure),
/// 2. the same ratio test holds restricted to the last two windows,
/// 3. the whitened candidate passes a one-sample KS normality test,
/// 4. the candidate carries no significant linear trend,
/// 5. neither does the newest window on its own.
///
/// Emitted segments are window-aligned. Trailing `N mod W` samples are
/// never examined here; boundary extension may recover them later.
pub fn segment_detect(
    trace: &[f64],
    config: &LevelConfig,
) -> Result<Vec<Segment>> {
    let w = config.window_size;
    let tr = config.homogeneity_tolerance;
    let n_windows = trace.len() / w;

    if n_windows < 2 {
        debug!(
            "trace of {} samples holds fewer than two {}-sample windows, \
             no candidates",
            trace.len(),
            w
        );
        return Ok(Vec::new());
    }
    debug!(
        "scanning {} windows of {} samples ({} trailing samples ignored)",
        n_windows,
        w,
        trace.len() % w
    );

    let window_std = (0..n_windows)
        .map(|k| std_dev(&trace[k * w..(k + 1) * w]))
        .collect::<Result<Vec<f64>>>()?;

    let mut segments = Vec::new();
    let mut level_on = false;
    let mut ls = 0usize;

    for i in 1..n_windows {
        let candidate = &trace[ls * w..(i + 1) * w];
        let newest_pair = &trace[(i - 1) * w..(i + 1) * w];

        let whole_ratio =
            (mean(&window_std[ls..=i]) / std_dev(candidate)? - 1.0).abs();
        let pair_ratio =
            (mean(&window_std[i - 1..=i]) / std_dev(newest_pair)? - 1.0).abs();

        let extends = whole_ratio < tr
            && pair_ratio < tr
            && ks_test_one_sample(&whiten(candidate)?, normal_cdf)?
                > config.significance_level
            && !has_gradient(candidate, config.gradient_sigma)?
            && !has_gradient(
                &trace[i * w..(i + 1) * w],
                config.gradient_sigma,
            )?;

        if extends {
            level_on = true;
        }
        else if level_on {
            let segment = Segment::new(ls * w, i * w);
            trace!("closing candidate {}", segment);
            segments.push(segment);
            level_on = false;
            ls = i;
        }
        else {
            ls += 1;
        }
    }

    if level_on {
        segments.push(Segment::new(ls * w, n_windows * w));
    }

    info!(
        "detector found {} window-aligned candidates",
        segments.len()
    );
    Ok(segments)
}
