use anyhow::{ensure, Result};
use itertools::Itertools;
use log::*;
use num::Float;
use once_cell::sync::Lazy;
use statrs::distribution::{ContinuousCDF, Normal};

static STD_NORMAL: Lazy<Normal> =
    Lazy::new(|| Normal::new(0.0, 1.0).unwrap());

/// Arithmetic mean of a sample. Returns NaN for an empty slice.
pub fn mean<F: Float>(data: &[F]) -> F {
    if data.is_empty() {
        return F::nan();
    }
    data.iter().fold(F::zero(), |acc, &x| acc + x)
        / F::from(data.len()).unwrap()
}

/// Sample standard deviation with the `n - 1` denominator.
///
/// # Errors
///
/// Fails if fewer than two samples are supplied; a single observation
/// carries no spread information and indicates a caller bug.
pub fn std_dev<F: Float>(data: &[F]) -> Result<F> {
    ensure!(
        data.len() >= 2,
        "sample standard deviation requires at least 2 samples, got {}",
        data.len()
    );
    let m = mean(data);
    let ss = data
        .iter()
        .fold(F::zero(), |acc, &x| acc + (x - m) * (x - m));
    Ok((ss / F::from(data.len() - 1).unwrap()).sqrt())
}

/// Median of a sample; the input is left untouched, sorting happens on
/// a private copy. For an even count the two central elements are
/// averaged.
pub fn median<F: Float>(data: &[F]) -> Result<F> {
    ensure!(!data.is_empty(), "median of an empty sample is undefined");
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| {
        a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
    });
    let n = sorted.len();
    if n % 2 == 1 {
        Ok(sorted[n / 2])
    }
    else {
        Ok((sorted[n / 2 - 1] + sorted[n / 2])
            / F::from(2.0).unwrap())
    }
}

/// Standardizes a sample to zero mean and unit variance.
pub fn whiten<F: Float>(data: &[F]) -> Result<Vec<F>> {
    let m = mean(data);
    let sd = std_dev(data)?;
    Ok(data.iter().map(|&x| (x - m) / sd).collect())
}

/// Cumulative distribution function of the Kolmogorov distribution,
/// `P(K <= z)`, using the two-branch practical approximation.
///
/// # Errors
///
/// Fails for negative `z`; the KS statistic is non-negative by
/// construction, so a negative argument is a caller bug.
pub fn ks_dist_p(z: f64) -> Result<f64> {
    ensure!(z >= 0.0, "Kolmogorov statistic must be non-negative, got {}", z);
    if z == 0.0 {
        return Ok(0.0);
    }
    if z < 1.18 {
        let y = (-1.23370055013616983 / (z * z)).exp();
        Ok(2.25675833419102515
            * (-y.ln()).sqrt()
            * (y + y.powi(9) + y.powi(25) + y.powi(49)))
    }
    else {
        let x = (-2.0 * z * z).exp();
        Ok(1.0 - 2.0 * (x - x.powi(4) + x.powi(9)))
    }
}

/// Tail function of the Kolmogorov distribution, `P(K > z)`.
/// Complement of [ks_dist_p]; `ks_dist_q(0) == 1`.
pub fn ks_dist_q(z: f64) -> Result<f64> {
    ensure!(z >= 0.0, "Kolmogorov statistic must be non-negative, got {}", z);
    if z == 0.0 {
        return Ok(1.0);
    }
    if z < 1.18 {
        return Ok(1.0 - ks_dist_p(z)?);
    }
    let x = (-2.0 * z * z).exp();
    Ok(2.0 * (x - x.powi(4) + x.powi(9)))
}

/// CDF of the standard normal distribution.
pub fn normal_cdf(z: f64) -> f64 {
    STD_NORMAL.cdf(z)
}

/// Two-sample Kolmogorov-Smirnov homogeneity test.
///
/// Computes the classic KS statistic `D` between the empirical
/// distributions of the two samples (tied values advance the running
/// CDFs together) and returns the asymptotic p-value
/// `Q_KS((sqrt(n_e) + 0.12 + 0.11/sqrt(n_e)) * D)` with
/// `n_e = n1*n2/(n1+n2)`.
///
/// # Arguments
///
/// * `sample1` - First sample, any order.
/// * `sample2` - Second sample, any order.
///
/// # Returns
///
/// The p-value for the null hypothesis that both samples are drawn
/// from the same distribution.
pub fn ks_test_two_sample<F: Float>(
    sample1: &[F],
    sample2: &[F],
) -> Result<f64> {
    ensure!(
        !sample1.is_empty() && !sample2.is_empty(),
        "two-sample KS test requires non-empty samples, got {} and {}",
        sample1.len(),
        sample2.len()
    );

    let mut data1 = sample1
        .iter()
        .map(|x| x.to_f64().unwrap())
        .collect_vec();
    let mut data2 = sample2
        .iter()
        .map(|x| x.to_f64().unwrap())
        .collect_vec();
    data1.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    data2.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let (n1, n2) = (data1.len(), data2.len());
    let (en1, en2) = (n1 as f64, n2 as f64);
    let (mut j1, mut j2) = (0usize, 0usize);
    let (mut fn1, mut fn2) = (0.0f64, 0.0f64);
    let mut d = 0.0f64;

    while j1 < n1 && j2 < n2 {
        let v1 = data1[j1];
        let v2 = data2[j2];
        if v1 <= v2 {
            loop {
                j1 += 1;
                fn1 = j1 as f64 / en1;
                if !(j1 < n1 && v1 == data1[j1]) {
                    break;
                }
            }
        }
        if v2 <= v1 {
            loop {
                j2 += 1;
                fn2 = j2 as f64 / en2;
                if !(j2 < n2 && v2 == data2[j2]) {
                    break;
                }
            }
        }
        let dt = (fn2 - fn1).abs();
        if dt > d {
            d = dt;
        }
    }

    let en = (en1 * en2 / (en1 + en2)).sqrt();
    let p = ks_dist_q((en + 0.12 + 0.11 / en) * d)?;
    trace!("two-sample KS: n1={}, n2={}, D={:.4}, p={:.6}", n1, n2, d, p);
    Ok(p)
}

/// One-sample Kolmogorov-Smirnov goodness-of-fit test against a
/// supplied CDF.
///
/// The statistic is the maximum distance between the empirical CDF of
/// the sample and `cdf`, checked on both sides of each step; the
/// p-value uses the same asymptotic transform as the two-sample test
/// with `n_e = n`.
pub fn ks_test_one_sample<F, C>(
    sample: &[F],
    cdf: C,
) -> Result<f64>
where
    F: Float,
    C: Fn(f64) -> f64, {
    ensure!(
        !sample.is_empty(),
        "one-sample KS test requires a non-empty sample"
    );

    let mut data = sample
        .iter()
        .map(|x| x.to_f64().unwrap())
        .collect_vec();
    data.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let en = data.len() as f64;
    let mut fo = 0.0f64;
    let mut d = 0.0f64;
    for (j, &x) in data.iter().enumerate() {
        let fj = (j + 1) as f64 / en;
        let ff = cdf(x);
        let dt = (fo - ff).abs().max((fj - ff).abs());
        if dt > d {
            d = dt;
        }
        fo = fj;
    }

    let en = en.sqrt();
    let p = ks_dist_q((en + 0.12 + 0.11 / en) * d)?;
    trace!("one-sample KS: n={}, D={:.4}, p={:.6}", data.len(), d, p);
    Ok(p)
}

/// Significance statistic of a least-squares linear trend.
///
/// Fits `y = a + b*t` with `t` linearly spaced in `[0, 1]`, after
/// dividing `y` by its mean when that mean exceeds 1 (scale
/// stabilization for count data). The returned statistic is
/// `|b| / (std(residual) / sum((y - mean(y))^2))`.
///
/// The denominator is NOT the textbook OLS slope standard error; it
/// divides the residual spread by a raw sum of squares. The sigma
/// thresholds used throughout the level pipeline were tuned against
/// this exact quantity, so it must not be replaced with the textbook
/// formula.
pub fn trend_statistic<F: Float>(data: &[F]) -> Result<f64> {
    ensure!(
        data.len() >= 2,
        "trend test requires at least 2 samples, got {}",
        data.len()
    );
    let n = data.len();
    let mut y = data
        .iter()
        .map(|x| x.to_f64().unwrap())
        .collect_vec();
    let scale = mean(&y);
    if scale > 1.0 {
        y.iter_mut().for_each(|v| *v /= scale);
    }

    let t = (0..n)
        .map(|i| i as f64 / (n - 1) as f64)
        .collect_vec();
    let tm = mean(&t);
    let ym = mean(&y);

    let s_tt = t.iter().map(|ti| (ti - tm) * (ti - tm)).sum::<f64>();
    let s_ty = t
        .iter()
        .zip(y.iter())
        .map(|(ti, yi)| (ti - tm) * (yi - ym))
        .sum::<f64>();
    let slope = s_ty / s_tt;
    let intercept = ym - slope * tm;

    let misfit = t
        .iter()
        .zip(y.iter())
        .map(|(ti, yi)| intercept + slope * ti - yi)
        .collect_vec();
    let ssd = y.iter().map(|yi| (yi - ym) * (yi - ym)).sum::<f64>();

    let std_err = std_dev(&misfit)? / ssd;
    Ok(slope.abs() / std_err)
}

/// Whether a sample carries a significant monotonic drift.
///
/// NaN statistics (constant input) compare false, so a perfectly flat
/// sample never reports a gradient.
pub fn has_gradient<F: Float>(
    data: &[F],
    threshold: f64,
) -> Result<bool> {
    Ok(trend_statistic(data)? > threshold)
}
