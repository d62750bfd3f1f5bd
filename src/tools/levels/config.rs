use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::with_field_fn;

/// Tuning parameters of the level-detection pipeline.
///
/// The defaults reproduce the reference parameterization this engine
/// was calibrated with; `window_size` and `homogeneity_tolerance` are
/// the knobs worth turning first, the remaining thresholds interact
/// with each other and with [trend_statistic]'s non-standard error
/// proxy.
///
/// [trend_statistic]: crate::utils::stats::trend_statistic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Detector window size `W` in samples.
    pub window_size:           usize,
    /// Allowed relative deviation of windowed vs whole-candidate
    /// spread in the detector homogeneity tests.
    pub homogeneity_tolerance: f64,
    /// Threshold on the trend statistic, and the sigma multiplier for
    /// boundary extension.
    pub gradient_sigma:        f64,
    /// Sigma multiplier above which a sample counts as an outlier in
    /// the splitter.
    pub outlier_sigma:         f64,
    /// Segments at or below this length are discarded by the filter.
    pub min_level_length:      usize,
    /// KS p-value acceptance level for every hypothesis test in the
    /// pipeline.
    pub significance_level:    f64,
}

impl LevelConfig {
    with_field_fn!(window_size, usize);

    with_field_fn!(homogeneity_tolerance, f64);

    with_field_fn!(gradient_sigma, f64);

    with_field_fn!(outlier_sigma, f64);

    with_field_fn!(min_level_length, usize);

    with_field_fn!(significance_level, f64);

    pub fn new(
        window_size: usize,
        homogeneity_tolerance: f64,
        gradient_sigma: f64,
        outlier_sigma: f64,
        min_level_length: usize,
        significance_level: f64,
    ) -> Self {
        Self {
            window_size,
            homogeneity_tolerance,
            gradient_sigma,
            outlier_sigma,
            min_level_length,
            significance_level,
        }
    }

    /// Checks the parameters for internal consistency.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.window_size >= 2,
            "window size must be at least 2, got {}",
            self.window_size
        );
        ensure!(
            self.homogeneity_tolerance.is_finite()
                && self.homogeneity_tolerance > 0.0,
            "homogeneity tolerance must be positive and finite, got {}",
            self.homogeneity_tolerance
        );
        ensure!(
            self.gradient_sigma.is_finite() && self.gradient_sigma > 0.0,
            "gradient sigma must be positive and finite, got {}",
            self.gradient_sigma
        );
        ensure!(
            self.outlier_sigma.is_finite() && self.outlier_sigma > 0.0,
            "outlier sigma must be positive and finite, got {}",
            self.outlier_sigma
        );
        ensure!(
            self.significance_level > 0.0 && self.significance_level < 1.0,
            "significance level must lie in (0, 1), got {}",
            self.significance_level
        );
        Ok(())
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            window_size:           5,
            homogeneity_tolerance: 0.2,
            gradient_sigma:        2.0,
            outlier_sigma:         3.0,
            min_level_length:      10,
            significance_level:    0.05,
        }
    }
}
