//! Piecewise-linear interpolation over sampled cost curves.
//!
//! Every cost, maintenance and embodied-impact figure for an energy system is looked up from a
//! curve sampled at increasing system sizes. Inputs outside the sampled range are clamped to the
//! first or last sample rather than extrapolated.
use thiserror::Error;

/// Reasons why a pair of sequences cannot be interpolated
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    /// There are no samples
    #[error("Curve has no points")]
    Empty,
    /// The two sequences differ in length
    #[error("Curve has {x_len} x values but {y_len} y values")]
    LengthMismatch {
        /// Number of independent values
        x_len: usize,
        /// Number of dependent values
        y_len: usize,
    },
    /// The independent values are not strictly increasing
    #[error("Curve x values must be strictly increasing")]
    NotStrictlyIncreasing,
    /// The dependent values decrease somewhere
    #[error("Curve y values must not decrease")]
    Decreasing,
}

/// Check whether `seq` is monotonically increasing.
///
/// If `strict` is true, adjacent equal values are rejected too. Sequences with fewer than two
/// elements are always monotonic.
pub fn monotonic_increasing(seq: &[f64], strict: bool) -> bool {
    seq.windows(2).all(|pair| {
        // NB: NaN fails both comparisons
        if strict {
            pair[1] > pair[0]
        } else {
            pair[1] >= pair[0]
        }
    })
}

/// Check that `xs` and `ys` describe a curve which can be interpolated
fn check_curve(xs: &[f64], ys: &[f64]) -> Result<(), CurveError> {
    if xs.len() != ys.len() {
        return Err(CurveError::LengthMismatch {
            x_len: xs.len(),
            y_len: ys.len(),
        });
    }
    if xs.is_empty() {
        return Err(CurveError::Empty);
    }
    if !monotonic_increasing(xs, true) {
        return Err(CurveError::NotStrictlyIncreasing);
    }
    if !monotonic_increasing(ys, false) {
        return Err(CurveError::Decreasing);
    }

    Ok(())
}

/// The line through `(x1, y1)` and `(x2, y2)`, evaluated at `x`.
///
/// Returns NaN if `x1 == x2`.
fn interpolate_point(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    (y1 * (x2 - x) + y2 * (x - x1)) / (x2 - x1)
}

/// Linearly interpolate the curve sampled at `xs`/`ys` at `x`.
///
/// Values of `x` before the first sample return the first `y` and values at or after the last
/// sample return the last `y`.
///
/// # Errors
///
/// Fails if the sequences are empty, differ in length, `xs` is not strictly increasing or `ys`
/// decreases anywhere.
pub fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> Result<f64, CurveError> {
    check_curve(xs, ys)?;

    if x <= xs[0] {
        return Ok(ys[0]);
    }

    for i in 0..xs.len() - 1 {
        if x < xs[i + 1] {
            return Ok(interpolate_point(xs[i], ys[i], xs[i + 1], ys[i + 1], x));
        }
    }

    // Validated as non-empty above
    Ok(ys[ys.len() - 1])
}

/// A cost (or impact) as a function of system size
#[derive(Debug, Clone, PartialEq)]
pub struct CostCurve {
    /// System sizes at which the curve is sampled (kW)
    pub sizes: Vec<f64>,
    /// The value at each size
    pub values: Vec<f64>,
}

impl CostCurve {
    /// Create a new [`CostCurve`], checking that it can be interpolated
    pub fn new(sizes: Vec<f64>, values: Vec<f64>) -> Result<Self, CurveError> {
        check_curve(&sizes, &values)?;
        Ok(Self { sizes, values })
    }

    /// Look up the value of the curve for a system of the given size
    pub fn value_at(&self, size: f64) -> Result<f64, CurveError> {
        interpolate(&self.sizes, &self.values, size)
    }
}
