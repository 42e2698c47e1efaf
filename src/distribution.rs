//! Distribution analysis.
//!
//! Normal quantile approximation, QQ-plot data, histogram binning, normal PDF
//! overlays, and shape statistics (skewness, kurtosis, normality).
//!
//! # Examples
//!
//! ```
//! use cd_spc::distribution::normal_inverse_cdf;
//!
//! assert_eq!(normal_inverse_cdf(0.5), 0.0);
//! assert!((normal_inverse_cdf(0.975) - 1.959963985).abs() < 1e-6);
//! assert_eq!(normal_inverse_cdf(0.0), f64::NEG_INFINITY);
//! ```

use serde::Serialize;
use tracing::debug;
use u_numflow::stats;

use crate::config::AnalysisConfig;
use crate::descriptive::quantile_stats;
use crate::error::{require_finite, Result, SpcError};

// ---------------------------------------------------------------------------
// Inverse normal CDF (Beasley-Springer-Moro)
// ---------------------------------------------------------------------------

/// Central-region numerator coefficients (Beasley & Springer, 1977).
const BSM_A: [f64; 4] = [
    2.50662823884,
    -18.61500062529,
    41.39119773534,
    -25.44106049637,
];

/// Central-region denominator coefficients (Beasley & Springer, 1977).
const BSM_B: [f64; 4] = [
    -8.47351093090,
    23.08336743743,
    -21.06224101826,
    3.13082909833,
];

/// Tail coefficients (Moro, 1995).
const BSM_C: [f64; 9] = [
    0.3374754822726147,
    0.9761690190917186,
    0.1607979714918209,
    0.0276438810333863,
    0.0038405729373609,
    0.0003951896511919,
    0.0000321767881768,
    0.0000002888167364,
    0.0000003960315187,
];

/// Half-width of the central region in `|p - 0.5|`.
const BSM_SPLIT: f64 = 0.42;

/// Standard normal quantile function Φ⁻¹(p).
///
/// # Algorithm
///
/// Beasley-Springer-Moro: a rational approximation in `u²` for
/// `|p - 0.5| < 0.42`, and a Chebyshev-style polynomial in
/// `ln(-ln(min(p, 1 - p)))` for the tails.
///
/// # Returns
///
/// `-∞` for `p <= 0`, `+∞` for `p >= 1`, NaN for NaN input.
///
/// # References
///
/// - Beasley & Springer (1977), "The Percentage Points of the Normal
///   Distribution", *Applied Statistics* 26(1).
/// - Moro (1995), "The Full Monte", *Risk* 8(2).
pub fn normal_inverse_cdf(p: f64) -> f64 {
    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    let u = p - 0.5;
    if u.abs() < BSM_SPLIT {
        let r = u * u;
        let num = ((BSM_A[3] * r + BSM_A[2]) * r + BSM_A[1]) * r + BSM_A[0];
        let den = (((BSM_B[3] * r + BSM_B[2]) * r + BSM_B[1]) * r + BSM_B[0]) * r + 1.0;
        return u * num / den;
    }

    let tail = if p < 0.5 { p } else { 1.0 - p };
    let r = (-tail.ln()).ln();
    let x = BSM_C
        .iter()
        .rev()
        .fold(0.0, |acc, &c| acc * r + c);
    if p < 0.5 {
        -x
    } else {
        x
    }
}

// ---------------------------------------------------------------------------
// QQ-plot
// ---------------------------------------------------------------------------

/// One point of a normal QQ-plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QqPoint {
    /// `mean + z·std_dev` at the Hazen plotting position.
    pub theoretical: f64,
    /// The matching order statistic.
    pub sample: f64,
    /// Whether the sample lies outside the unclamped 1.5·IQR bounds.
    pub outlier: bool,
}

/// QQ-plot data with a least-squares reference line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QqPlot {
    pub points: Vec<QqPoint>,
    pub mean: f64,
    pub std_dev: f64,
    pub slope: f64,
    pub intercept: f64,
}

impl QqPlot {
    /// Endpoints of the reference line across the theoretical range.
    pub fn reference_line(&self) -> Option<((f64, f64), (f64, f64))> {
        let first = self.points.first()?.theoretical;
        let last = self.points.last()?.theoretical;
        Some((
            (first, self.slope * first + self.intercept),
            (last, self.slope * last + self.intercept),
        ))
    }
}

/// Pairs sorted sample values with theoretical normal quantiles.
///
/// The i-th order statistic is matched with `mean + z·std_dev`, where
/// `z = Φ⁻¹((i + 0.5) / n)` (Hazen plotting position). The input is sorted
/// on a copy, so unsorted slices are accepted.
///
/// # Examples
///
/// ```
/// use cd_spc::distribution::qq_points;
///
/// let pairs = qq_points(&[3.0, 1.0, 2.0], 2.0, 1.0).unwrap();
/// assert_eq!(pairs.len(), 3);
/// assert_eq!(pairs[1], (2.0, 2.0));
/// assert!(pairs[0].0 < pairs[2].0);
/// ```
pub fn qq_points(values: &[f64], mean: f64, std_dev: f64) -> Result<Vec<(f64, f64)>> {
    require_finite(values, 1)?;
    if !mean.is_finite() || !std_dev.is_finite() || std_dev < 0.0 {
        return Err(SpcError::DegenerateInput {
            reason: "mean and std_dev must be finite with std_dev >= 0",
        });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let nf = sorted.len() as f64;
    Ok(sorted
        .into_iter()
        .enumerate()
        .map(|(i, sample)| {
            let z = normal_inverse_cdf((i as f64 + 0.5) / nf);
            (mean + z * std_dev, sample)
        })
        .collect())
}

/// Builds a QQ-plot from raw values using their mean and sample standard
/// deviation.
///
/// # Errors
///
/// `InsufficientData` below 2 values, `DegenerateInput` when all values are
/// equal (the reference line is undefined).
pub fn qq_plot(values: &[f64]) -> Result<QqPlot> {
    require_finite(values, 2)?;

    let mean = stats::mean(values).ok_or(SpcError::InsufficientData {
        required: 2,
        actual: values.len(),
    })?;
    let std_dev = stats::std_dev(values).ok_or(SpcError::InsufficientData {
        required: 2,
        actual: values.len(),
    })?;
    if std_dev < 1e-300 {
        debug!("qq plot skipped for zero-variance data");
        return Err(SpcError::DegenerateInput {
            reason: "zero variance",
        });
    }

    let summary = quantile_stats(values)?;
    let pairs = qq_points(values, mean, std_dev)?;

    let n = pairs.len() as f64;
    let (mut sx, mut sy, mut sxy, mut sxx) = (0.0, 0.0, 0.0, 0.0);
    for &(x, y) in &pairs {
        sx += x;
        sy += y;
        sxy += x * y;
        sxx += x * x;
    }
    let denom = n * sxx - sx * sx;
    if denom.abs() < 1e-300 {
        return Err(SpcError::DegenerateInput {
            reason: "theoretical quantiles have no spread",
        });
    }
    let slope = (n * sxy - sx * sy) / denom;
    let intercept = (sy - slope * sx) / n;

    let points = pairs
        .into_iter()
        .map(|(theoretical, sample)| QqPoint {
            theoretical,
            sample,
            outlier: summary.is_outlier(sample),
        })
        .collect();

    Ok(QqPlot {
        points,
        mean,
        std_dev,
        slope,
        intercept,
    })
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Scott's-rule bin width constant used by the dashboard.
const SCOTT_FACTOR: f64 = 3.5;

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Bin edges (length = bins + 1).
    pub edges: Vec<f64>,
    /// Bin midpoints.
    pub centers: Vec<f64>,
    /// Counts per bin; the last bin is closed on the right.
    pub counts: Vec<usize>,
    pub bin_width: f64,
}

impl Histogram {
    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    /// Largest bin count.
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Bins `values` using Scott's rule `h = 3.5·s·n^(-1/3)`.
///
/// The bin count `⌈range / h⌉` is clamped to
/// `[config.histogram_min_bins, config.histogram_max_bins]`. When every value
/// is equal, `histogram_min_bins` bins span `[v - 0.5, v + 0.5]`.
///
/// # Errors
///
/// `InvalidConfig` when the bin bounds are not a valid range,
/// `InsufficientData` below 2 values.
///
/// # Examples
///
/// ```
/// use cd_spc::config::AnalysisConfig;
/// use cd_spc::distribution::histogram;
///
/// let data = [44.8, 45.0, 45.1, 45.1, 45.2, 45.3, 45.5, 45.9];
/// let hist = histogram(&data, &AnalysisConfig::default()).unwrap();
/// assert_eq!(hist.edges.len(), hist.n_bins() + 1);
/// assert_eq!(hist.counts.iter().sum::<usize>(), data.len());
/// ```
pub fn histogram(values: &[f64], config: &AnalysisConfig) -> Result<Histogram> {
    config.validate()?;
    require_finite(values, 2)?;

    let min_val = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max_val = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max_val - min_val;

    let (lo, hi, n_bins) = if range < 1e-300 {
        debug!(value = min_val, "histogram of constant data");
        (min_val - 0.5, max_val + 0.5, config.histogram_min_bins)
    } else {
        let sd = stats::std_dev(values).unwrap_or(0.0);
        let h = SCOTT_FACTOR * sd * (values.len() as f64).powf(-1.0 / 3.0);
        let raw = if h > 0.0 {
            (range / h).ceil() as usize
        } else {
            config.histogram_min_bins
        };
        (
            min_val,
            max_val,
            raw.clamp(config.histogram_min_bins, config.histogram_max_bins),
        )
    };

    let bin_width = (hi - lo) / n_bins as f64;
    let edges: Vec<f64> = (0..=n_bins).map(|i| lo + i as f64 * bin_width).collect();
    let centers = edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect();

    let mut counts = vec![0_usize; n_bins];
    for &x in values {
        let bin = (((x - lo) / bin_width).floor() as usize).min(n_bins - 1);
        counts[bin] += 1;
    }

    Ok(Histogram {
        edges,
        centers,
        counts,
        bin_width,
    })
}

// ---------------------------------------------------------------------------
// Normal PDF overlay
// ---------------------------------------------------------------------------

/// Normal density sampled on a regular grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub mean: f64,
    pub std_dev: f64,
}

impl NormalCurve {
    /// Largest density on the grid.
    pub fn max_density(&self) -> f64 {
        self.y.iter().copied().fold(0.0, f64::max)
    }

    /// Densities rescaled so the curve peak matches the tallest histogram bin.
    pub fn scaled_to(&self, hist: &Histogram) -> Vec<f64> {
        let scale = pdf_scale(hist.max_count() as f64, self.max_density());
        self.y.iter().map(|y| y * scale).collect()
    }
}

/// Samples the N(mean, std_dev²) density on `config.pdf_points` points over
/// `mean ± config.pdf_sigma_span·std_dev`.
///
/// # Errors
///
/// `DegenerateInput` when `std_dev <= 0` or either parameter is non-finite,
/// `InvalidConfig` for a config that fails [`AnalysisConfig::validate`].
pub fn normal_curve(mean: f64, std_dev: f64, config: &AnalysisConfig) -> Result<NormalCurve> {
    config.validate()?;
    if !mean.is_finite() || !std_dev.is_finite() || std_dev <= 0.0 {
        return Err(SpcError::DegenerateInput {
            reason: "normal curve needs a finite mean and positive std_dev",
        });
    }
    let points = config.pdf_points;
    let lo = mean - config.pdf_sigma_span * std_dev;
    let hi = mean + config.pdf_sigma_span * std_dev;
    let step = (hi - lo) / (points - 1) as f64;

    let norm = 1.0 / (std_dev * (2.0 * std::f64::consts::PI).sqrt());
    let x: Vec<f64> = (0..points).map(|i| lo + i as f64 * step).collect();
    let y = x
        .iter()
        .map(|&xi| {
            let z = (xi - mean) / std_dev;
            norm * (-0.5 * z * z).exp()
        })
        .collect();

    Ok(NormalCurve {
        x,
        y,
        mean,
        std_dev,
    })
}

/// Display scale that lifts a PDF peak to the tallest histogram bin.
///
/// Returns `0.0` when `max_pdf` is not a positive finite number, so a flat
/// overlay is drawn instead of NaN geometry.
pub fn pdf_scale(max_count: f64, max_pdf: f64) -> f64 {
    if !max_pdf.is_finite() || max_pdf <= 0.0 || !max_count.is_finite() {
        return 0.0;
    }
    max_count / max_pdf
}

// ---------------------------------------------------------------------------
// Shape statistics
// ---------------------------------------------------------------------------

/// Simplified D'Agostino-Pearson normality check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalityTest {
    /// `K² = n·(skew²/6 + kurt²/24)`.
    pub statistic: f64,
    /// `exp(-K²/2)`, or 0 once `K² >= 100`.
    pub p_value: f64,
    pub is_normal: bool,
}

/// Location, spread, and shape of a sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionStats {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    /// `m3 / s³` with population `m3` and sample `s`.
    pub skewness: f64,
    /// Excess kurtosis `m4 / s⁴ - 3`.
    pub kurtosis: f64,
    pub normality: NormalityTest,
}

/// Computes mean, median, skewness, kurtosis, and a normality decision at
/// `config.normality_alpha`.
///
/// # Errors
///
/// `InsufficientData` below 3 values, `DegenerateInput` for zero variance,
/// `InvalidConfig` for an invalid `config`.
pub fn distribution_stats(values: &[f64], config: &AnalysisConfig) -> Result<DistributionStats> {
    config.validate()?;
    require_finite(values, 3)?;

    let n = values.len();
    let insufficient = || SpcError::InsufficientData {
        required: 3,
        actual: n,
    };
    let mean = stats::mean(values).ok_or_else(insufficient)?;
    let std_dev = stats::std_dev(values).ok_or_else(insufficient)?;
    if std_dev < 1e-300 {
        return Err(SpcError::DegenerateInput {
            reason: "zero variance",
        });
    }

    let median = quantile_stats(values)?.median;

    let nf = n as f64;
    let m3 = values.iter().map(|x| (x - mean).powi(3)).sum::<f64>() / nf;
    let m4 = values.iter().map(|x| (x - mean).powi(4)).sum::<f64>() / nf;
    let skewness = m3 / std_dev.powi(3);
    let kurtosis = m4 / std_dev.powi(4) - 3.0;

    let statistic = nf * (skewness * skewness / 6.0 + kurtosis * kurtosis / 24.0);
    let p_value = if statistic < 100.0 {
        (-0.5 * statistic).exp()
    } else {
        0.0
    };

    Ok(DistributionStats {
        mean,
        median,
        std_dev,
        skewness,
        kurtosis,
        normality: NormalityTest {
            statistic,
            p_value,
            is_normal: p_value > config.normality_alpha,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Inverse normal CDF
    // -----------------------------------------------------------------------

    #[test]
    fn inverse_cdf_center_is_exact_zero() {
        assert_eq!(normal_inverse_cdf(0.5), 0.0);
    }

    #[test]
    fn inverse_cdf_bounds() {
        assert_eq!(normal_inverse_cdf(0.0), f64::NEG_INFINITY);
        assert_eq!(normal_inverse_cdf(-0.3), f64::NEG_INFINITY);
        assert_eq!(normal_inverse_cdf(1.0), f64::INFINITY);
        assert_eq!(normal_inverse_cdf(1.7), f64::INFINITY);
        assert!(normal_inverse_cdf(f64::NAN).is_nan());
    }

    #[test]
    fn inverse_cdf_known_quantiles() {
        let cases = [
            (0.975, 1.959_963_984_540_054),
            (0.025, -1.959_963_984_540_054),
            (0.841_344_746_068_542_9, 1.0),
            (0.977_249_868_051_820_8, 2.0),
            (0.998_650_101_968_369_9, 3.0),
            (0.75, 0.674_489_750_196_081_7),
            (0.001, -3.090_232_306_167_813),
        ];
        for (p, expected) in cases {
            let z = normal_inverse_cdf(p);
            assert!(
                (z - expected).abs() < 1e-7,
                "p = {p}: got {z}, expected {expected}"
            );
        }
    }

    #[test]
    fn inverse_cdf_symmetric() {
        for p in [0.01, 0.05, 0.1, 0.3, 0.45] {
            let lo = normal_inverse_cdf(p);
            let hi = normal_inverse_cdf(1.0 - p);
            assert!((lo + hi).abs() < 1e-9, "p = {p}");
        }
    }

    #[test]
    fn inverse_cdf_strictly_increasing_on_grid() {
        let mut prev = f64::NEG_INFINITY;
        for i in 1..10_000 {
            let z = normal_inverse_cdf(i as f64 / 10_000.0);
            assert!(z > prev, "not increasing at i = {i}");
            prev = z;
        }
    }

    // -----------------------------------------------------------------------
    // QQ-plot
    // -----------------------------------------------------------------------

    #[test]
    fn qq_points_use_hazen_positions() {
        let pairs = qq_points(&[10.0, 30.0, 20.0, 40.0], 25.0, 5.0).unwrap();
        let samples: Vec<f64> = pairs.iter().map(|p| p.1).collect();
        assert_eq!(samples, vec![10.0, 20.0, 30.0, 40.0]);
        let z0 = normal_inverse_cdf(0.125);
        assert!((pairs[0].0 - (25.0 + 5.0 * z0)).abs() < 1e-12);
        // Symmetric positions give symmetric theoretical quantiles.
        assert!((pairs[0].0 + pairs[3].0 - 50.0).abs() < 1e-9);
    }

    #[test]
    fn qq_points_empty() {
        assert!(qq_points(&[], 0.0, 1.0).unwrap_err().is_insufficient_data());
    }

    #[test]
    fn qq_plot_normalish_data_has_unit_slope() {
        // Data placed exactly at normal quantiles of N(45, 0.5²).
        let n = 40;
        let data: Vec<f64> = (0..n)
            .map(|i| 45.0 + 0.5 * normal_inverse_cdf((i as f64 + 0.5) / n as f64))
            .collect();
        let plot = qq_plot(&data).unwrap();
        assert_eq!(plot.points.len(), n);
        assert!(plot.slope > 0.9 && plot.slope < 1.1, "slope = {}", plot.slope);
        assert!(plot.points.iter().all(|p| !p.outlier));
        let ((x0, _), (x1, _)) = plot.reference_line().unwrap();
        assert!(x0 < x1);
    }

    #[test]
    fn qq_plot_flags_outlier() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 100.0];
        let plot = qq_plot(&data).unwrap();
        let flagged: Vec<f64> = plot
            .points
            .iter()
            .filter(|p| p.outlier)
            .map(|p| p.sample)
            .collect();
        assert_eq!(flagged, vec![100.0]);
    }

    #[test]
    fn qq_plot_constant_data_is_degenerate() {
        assert!(qq_plot(&[2.0, 2.0, 2.0]).unwrap_err().is_degenerate());
    }

    // -----------------------------------------------------------------------
    // Histogram
    // -----------------------------------------------------------------------

    #[test]
    fn histogram_respects_min_bins() {
        let hist = histogram(&[1.0, 2.0, 3.0], &AnalysisConfig::default()).unwrap();
        assert_eq!(hist.n_bins(), 5);
        assert!((hist.edges[0] - 1.0).abs() < 1e-12);
        assert!((hist.edges[5] - 3.0).abs() < 1e-12);
        assert_eq!(hist.counts, vec![1, 0, 1, 0, 1]);
    }

    #[test]
    fn histogram_respects_max_bins() {
        let mut data: Vec<f64> = (0..2000).map(|i| (i % 7) as f64 * 0.01).collect();
        data.push(1000.0);
        let config = AnalysisConfig::default();
        let hist = histogram(&data, &config).unwrap();
        assert_eq!(hist.n_bins(), config.histogram_max_bins);
        assert_eq!(hist.counts.iter().sum::<usize>(), data.len());
        assert_eq!(*hist.counts.last().unwrap(), 1);
    }

    #[test]
    fn histogram_constant_data() {
        let hist = histogram(&[4.0, 4.0, 4.0], &AnalysisConfig::default()).unwrap();
        assert_eq!(hist.n_bins(), 5);
        assert!((hist.edges[0] - 3.5).abs() < 1e-12);
        assert!((hist.edges[5] - 4.5).abs() < 1e-12);
        assert_eq!(hist.counts, vec![0, 0, 3, 0, 0]);
    }

    #[test]
    fn histogram_too_short() {
        let err = histogram(&[1.0], &AnalysisConfig::default()).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn histogram_rejects_invalid_bin_bounds() {
        let inverted = AnalysisConfig {
            histogram_min_bins: 60,
            ..AnalysisConfig::default()
        };
        let err = histogram(&[1.0, 2.0, 3.0], &inverted).unwrap_err();
        assert!(matches!(err, SpcError::InvalidConfig(_)));

        let zero = AnalysisConfig {
            histogram_min_bins: 0,
            ..AnalysisConfig::default()
        };
        let err = histogram(&[4.0, 4.0, 4.0], &zero).unwrap_err();
        assert!(matches!(err, SpcError::InvalidConfig(_)));
    }

    #[test]
    fn histogram_centers_are_midpoints() {
        let hist = histogram(&[0.0, 10.0, 5.0], &AnalysisConfig::default()).unwrap();
        for (i, c) in hist.centers.iter().enumerate() {
            assert!((c - (hist.edges[i] + hist.edges[i + 1]) / 2.0).abs() < 1e-12);
        }
    }

    // -----------------------------------------------------------------------
    // Normal curve
    // -----------------------------------------------------------------------

    #[test]
    fn normal_curve_grid_and_peak() {
        let config = AnalysisConfig {
            pdf_points: 201,
            ..AnalysisConfig::default()
        };
        let curve = normal_curve(10.0, 2.0, &config).unwrap();
        assert_eq!(curve.x.len(), 201);
        assert!((curve.x[0] - 2.0).abs() < 1e-12);
        assert!((curve.x[200] - 18.0).abs() < 1e-12);
        // Midpoint of an odd grid sits on the mean.
        let peak = 1.0 / (2.0 * (2.0 * std::f64::consts::PI).sqrt());
        assert!((curve.y[100] - peak).abs() < 1e-12);
        assert!((curve.max_density() - peak).abs() < 1e-12);
    }

    #[test]
    fn normal_curve_rejects_zero_sigma() {
        let err = normal_curve(1.0, 0.0, &AnalysisConfig::default()).unwrap_err();
        assert!(err.is_degenerate());
    }

    #[test]
    fn normal_curve_rejects_too_few_points() {
        let config = AnalysisConfig {
            pdf_points: 1,
            ..AnalysisConfig::default()
        };
        let err = normal_curve(0.0, 1.0, &config).unwrap_err();
        assert!(matches!(err, SpcError::InvalidConfig(_)));
    }

    #[test]
    fn pdf_scale_matches_peak_to_count() {
        assert!((pdf_scale(12.0, 0.4) - 30.0).abs() < 1e-12);
        assert_eq!(pdf_scale(12.0, 0.0), 0.0);
        assert_eq!(pdf_scale(12.0, f64::NAN), 0.0);
    }

    #[test]
    fn scaled_curve_peak_equals_max_count() {
        let config = AnalysisConfig::default();
        let data = [44.8, 45.0, 45.1, 45.1, 45.2, 45.3, 45.5, 45.9];
        let hist = histogram(&data, &config).unwrap();
        let curve = normal_curve(45.2, 0.3, &config).unwrap();
        let scaled = curve.scaled_to(&hist);
        let peak = scaled.iter().copied().fold(0.0, f64::max);
        assert!((peak - hist.max_count() as f64).abs() < 1e-9);
    }

    // -----------------------------------------------------------------------
    // Shape statistics
    // -----------------------------------------------------------------------

    #[test]
    fn symmetric_data_has_zero_skew() {
        let stats =
            distribution_stats(&[1.0, 2.0, 3.0, 4.0, 5.0], &AnalysisConfig::default()).unwrap();
        assert!((stats.mean - 3.0).abs() < 1e-12);
        assert!((stats.median - 3.0).abs() < 1e-12);
        assert!(stats.skewness.abs() < 1e-12);
        // m4 = 6.8, s² = 2.5 → 6.8 / 6.25 - 3.
        assert!((stats.kurtosis - (6.8 / 6.25 - 3.0)).abs() < 1e-12);
    }

    #[test]
    fn skewed_data_fails_normality() {
        let mut data = vec![1.0; 30];
        data.extend([50.0, 60.0, 70.0]);
        let stats = distribution_stats(&data, &AnalysisConfig::default()).unwrap();
        assert!(stats.skewness > 1.0);
        assert!(!stats.normality.is_normal);
    }

    #[test]
    fn distribution_stats_minimums() {
        let config = AnalysisConfig::default();
        assert!(distribution_stats(&[1.0, 2.0], &config)
            .unwrap_err()
            .is_insufficient_data());
        assert!(distribution_stats(&[1.0, 1.0, 1.0], &config)
            .unwrap_err()
            .is_degenerate());
        let bad_alpha = AnalysisConfig {
            normality_alpha: 1.5,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            distribution_stats(&[1.0, 2.0, 4.0], &bad_alpha),
            Err(SpcError::InvalidConfig(_))
        ));
    }
}
