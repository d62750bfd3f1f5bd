use anyhow::Result;
use log::*;

use crate::data_structs::Segment;
use crate::tools::levels::LevelConfig;
use crate::utils::{
    has_gradient,
    ks_test_one_sample,
    normal_cdf,
    whiten,
};

/// Final validation pass: discards segments that are too short, carry
/// a trend, or fail a normality check. The survivors are the
/// validated levels.
pub fn segment_filter(
    segments: &[Segment],
    trace: &[f64],
    config: &LevelConfig,
) -> Result<Vec<Segment>> {
    let mut kept = Vec::with_capacity(segments.len());

    for segment in segments {
        if segment.len() <= config.min_level_length {
            trace!("{} dropped: too short", segment);
            continue;
        }
        let data = segment.slice(trace);
        if has_gradient(data, config.gradient_sigma)? {
            trace!("{} dropped: significant trend", segment);
            continue;
        }
        if ks_test_one_sample(&whiten(data)?, normal_cdf)?
            <= config.significance_level
        {
            trace!("{} dropped: not normally distributed", segment);
            continue;
        }
        kept.push(*segment);
    }

    info!(
        "filter kept {} of {} segments as levels",
        kept.len(),
        segments.len()
    );
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::levels::fixtures::FLAT40;

    #[test]
    fn keeps_flat_normal_segment() {
        let segments = vec![Segment::new(0, 40)];
        let kept =
            segment_filter(&segments, &FLAT40, &LevelConfig::default())
                .unwrap();
        assert_eq!(kept, segments);
    }

    #[test]
    fn drops_short_segment() {
        // length 10 does not exceed the minimum of 10
        let segments = vec![Segment::new(0, 10)];
        let kept =
            segment_filter(&segments, &FLAT40, &LevelConfig::default())
                .unwrap();
        assert!(kept.is_empty());
    }

    #[test]
    fn drops_trending_segment() {
        let ramp = (0..30).map(|i| 0.1 * i as f64).collect::<Vec<_>>();
        let segments = vec![Segment::new(0, 30)];
        let kept =
            segment_filter(&segments, &ramp, &LevelConfig::default()).unwrap();
        assert!(kept.is_empty());
    }

    #[test]
    fn drops_non_normal_segment() {
        // a two-point distribution is flat and trendless but fails the
        // normality check
        let bimodal = (0..24)
            .map(|i| if i % 2 == 0 { 1.0 } else { 2.0 })
            .collect::<Vec<_>>();
        let segments = vec![Segment::new(0, 24)];
        let kept =
            segment_filter(&segments, &bimodal, &LevelConfig::default())
                .unwrap();
        assert!(kept.is_empty());
    }
}
