//! Non-extrapolating spline fits of sampled surfaces. The cubic variant is a penalized
//! regression spline: it minimizes the squared residual at the knots plus `smoothing` times the
//! integrated squared second derivative, so a smoothing factor of zero reproduces the natural
//! interpolating cubic spline.

use crate::algorithms::{interpolate_linear, preceding_index_search};
use crate::{Result, WingError};
use ncollide2d::na::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplineDegree {
    Linear,
    #[default]
    Cubic,
}

impl SplineDegree {
    fn min_points(&self) -> usize {
        match self {
            SplineDegree::Linear => 2,
            SplineDegree::Cubic => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplineSettings {
    pub degree: SplineDegree,

    /// Weight of the curvature penalty, zero interpolates the data exactly
    pub smoothing: f64,
}

impl Default for SplineSettings {
    fn default() -> Self {
        SplineSettings {
            degree: SplineDegree::Cubic,
            smoothing: 0.0,
        }
    }
}

impl SplineSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.smoothing.is_finite() || self.smoothing < 0.0 {
            return Err(WingError::InvalidSettings(format!(
                "spline smoothing must be a non-negative number, got {}",
                self.smoothing
            )));
        }
        Ok(())
    }
}

pub struct SmoothingSpline {
    degree: SplineDegree,
    knots: Vec<f64>,
    values: Vec<f64>,
    second: Vec<f64>,
}

impl SmoothingSpline {
    /// Fit a spline through points with strictly increasing x values.
    pub fn fit(xs: &[f64], ys: &[f64], settings: &SplineSettings) -> Result<Self> {
        settings.validate()?;

        let needed = settings.degree.min_points();
        if xs.len() < needed || ys.len() != xs.len() {
            return Err(WingError::NotEnoughPoints {
                needed,
                got: xs.len().min(ys.len()),
            });
        }

        if let Some(w) = xs.windows(2).find(|w| w[1] <= w[0]) {
            return Err(WingError::NonMonotonicSurface(w[1]));
        }

        let (values, second) = match settings.degree {
            SplineDegree::Linear => (ys.to_vec(), vec![0.0; xs.len()]),
            SplineDegree::Cubic => solve_cubic(xs, ys, settings.smoothing)?,
        };

        Ok(SmoothingSpline {
            degree: settings.degree,
            knots: xs.to_vec(),
            values,
            second,
        })
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    /// Evaluate the spline at `x`, which must lie within the span of the fitted data.
    pub fn eval(&self, x: f64) -> Result<f64> {
        let (min, max) = self.domain();
        if x < min || x > max || x.is_nan() {
            return Err(WingError::OutsideDefinedRange { value: x, min, max });
        }

        if self.degree == SplineDegree::Linear {
            return interpolate_linear(&self.knots, &self.values, x);
        }

        let i = preceding_index_search(&self.knots, x).min(self.knots.len() - 2);
        let x0 = self.knots[i];
        let x1 = self.knots[i + 1];
        let h = x1 - x0;
        let a = x - x0;
        let b = x1 - x;

        let linear = (a * self.values[i + 1] + b * self.values[i]) / h;
        let curvature = a * b / 6.0
            * ((1.0 + a / h) * self.second[i + 1] + (1.0 + b / h) * self.second[i]);

        Ok(linear - curvature)
    }
}

/// Solves `(R + s Q'Q) g2 = Q'y` for the interior second derivatives and returns the smoothed
/// knot values together with the full second derivative vector (zero at both natural ends).
fn solve_cubic(xs: &[f64], ys: &[f64], smoothing: f64) -> Result<(Vec<f64>, Vec<f64>)> {
    let n = xs.len();
    let m = n - 2;
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();

    let mut q = DMatrix::<f64>::zeros(n, m);
    let mut r = DMatrix::<f64>::zeros(m, m);
    for j in 0..m {
        q[(j, j)] = 1.0 / h[j];
        q[(j + 1, j)] = -1.0 / h[j] - 1.0 / h[j + 1];
        q[(j + 2, j)] = 1.0 / h[j + 1];

        r[(j, j)] = (h[j] + h[j + 1]) / 3.0;
        if j + 1 < m {
            r[(j, j + 1)] = h[j + 1] / 6.0;
            r[(j + 1, j)] = h[j + 1] / 6.0;
        }
    }

    let y = DVector::from_column_slice(ys);
    let qt = q.transpose();
    let system = r + (&qt * &q) * smoothing;
    let rhs = &qt * &y;

    let gamma = system
        .cholesky()
        .ok_or(WingError::SingularSpline)?
        .solve(&rhs);

    let g = &y - (&q * &gamma) * smoothing;

    let mut second = Vec::with_capacity(n);
    second.push(0.0);
    second.extend(gamma.iter());
    second.push(0.0);

    Ok((g.iter().cloned().collect(), second))
}
