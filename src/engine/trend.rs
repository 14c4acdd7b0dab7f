//! Least-squares polynomial trend curves

use crate::{
    domain::Series,
    error::{Error, insufficient_data},
};

const OPERATION: &str = "trend fit";

/// A polynomial fitted through a series.
///
/// To keep the normal equations well conditioned for row counts in the billions, the fit runs on
/// `t = (x - center) / half_width`, which maps the x range of the series onto `[-1, 1]`. The
/// coefficients are in ascending order of the power of `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendCurve {
    coefficients: Vec<f64>,
    center: f64,
    half_width: f64,
    fitted: Vec<f64>,
}

impl TrendCurve {
    /// Fits a polynomial of `degree` through the points of `series`.
    ///
    /// Fails with [`Error::InsufficientData`] when there are fewer than `degree + 1` points or the x
    /// values do not span an interval.
    pub fn fit(series: &Series, degree: usize) -> Result<Self, Error> {
        let terms = degree + 1;
        if series.len() < terms {
            return Err(insufficient_data(
                OPERATION,
                format!(
                    "series '{}' has {} points, a degree {degree} fit needs at least {terms}",
                    series.label(),
                    series.len()
                ),
            ));
        }

        let (min, max) = series
            .x()
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });
        let center = (min + max) / 2.0;
        let half_width = (max - min) / 2.0;
        if degree > 0 && !(half_width > 0.0 && half_width.is_finite()) {
            return Err(insufficient_data(
                OPERATION,
                format!("x values of series '{}' do not span an interval", series.label()),
            ));
        }
        let half_width = if half_width > 0.0 { half_width } else { 1.0 };

        // Normal equations: (VᵀV) c = Vᵀy with V the Vandermonde matrix of t
        let mut matrix = vec![vec![0.0; terms]; terms];
        let mut rhs = vec![0.0; terms];
        for (x, y) in series.points() {
            let t = (x - center) / half_width;
            let powers = powers(t, 2 * degree);
            for row in 0..terms {
                rhs[row] += y * powers[row];
                for col in 0..terms {
                    matrix[row][col] += powers[row + col];
                }
            }
        }

        let coefficients = solve(matrix, rhs).ok_or_else(|| {
            insufficient_data(
                OPERATION,
                format!("points of series '{}' do not determine a curve", series.label()),
            )
        })?;

        let mut curve = Self {
            coefficients,
            center,
            half_width,
            fitted: Vec::new(),
        };
        curve.fitted = series.x().iter().map(|&x| curve.evaluate(x)).collect();
        Ok(curve)
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// The curve evaluated at the x positions of the fitted series
    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let t = (x - self.center) / self.half_width;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * t + c)
    }
}

fn powers(t: f64, max_power: usize) -> Vec<f64> {
    std::iter::successors(Some(1.0), |p| Some(p * t))
        .take(max_power + 1)
        .collect()
}

/// Gaussian elimination with partial pivoting. `None` if the system is singular.
fn solve(mut matrix: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Option<Vec<f64>> {
    let n = rhs.len();
    let scale = matrix
        .iter()
        .flatten()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let tolerance = scale * 1e-12;

    for col in 0..n {
        let pivot = (col..n).max_by(|&a, &b| matrix[a][col].abs().total_cmp(&matrix[b][col].abs()))?;
        if matrix[pivot][col].abs() <= tolerance {
            return None;
        }
        matrix.swap(col, pivot);
        rhs.swap(col, pivot);

        for row in col + 1..n {
            let factor = matrix[row][col] / matrix[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| matrix[row][k] * solution[k]).sum();
        solution[row] = (rhs[row] - tail) / matrix[row][row];
    }
    solution.iter().all(|c| c.is_finite()).then_some(solution)
}
