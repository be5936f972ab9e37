use crate::{Result, WingError};
use ncollide2d::na::RealField;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Returns the index of the last element in a sorted slice which is less than or equal to the
/// test value, clamped to the valid index range of the slice.
pub fn preceding_index_search<N: RealField + Copy>(slice: &[N], test_value: N) -> usize {
    if slice.len() <= 1 || slice[1] > test_value {
        return 0;
    }

    let mut a = 1;
    let mut b = slice.len() - 1;
    if slice[b] <= test_value {
        return b;
    }

    while b > a + 1 {
        let check = (a + b) / 2;
        if test_value >= slice[check] {
            a = check;
        } else {
            b = check;
        }
    }
    a
}

/// Linearly interpolates a value at `x` from a table of strictly increasing positions and their
/// values. Both ends of the table are part of the domain, anything beyond them is an error.
pub fn interpolate_linear(positions: &[f64], values: &[f64], x: f64) -> Result<f64> {
    let (first, last) = match (positions.first(), positions.last()) {
        (Some(f), Some(l)) => (*f, *l),
        _ => return Err(WingError::NotEnoughPoints { needed: 1, got: 0 }),
    };

    if x < first || x > last || x.is_nan() {
        return Err(WingError::OutsideDefinedRange {
            value: x,
            min: first,
            max: last,
        });
    }

    let i = preceding_index_search(positions, x);
    if i + 1 >= positions.len() {
        return Ok(values[i]);
    }

    let f = (x - positions[i]) / (positions[i + 1] - positions[i]);
    Ok(values[i] * (1.0 - f) + values[i + 1] * f)
}

/// Locates the leading edge of a horseshoe ordered coordinate sequence: the index at which the
/// x values stop decreasing. The scan walks forward keeping the running minimum and stops at the
/// first value that exceeds it. If no value ever exceeds the minimum the sequence never turns
/// around and is not an airfoil contour.
pub fn find_turning_point(xs: &[f64]) -> Result<usize> {
    let mut min_index = 0;
    let mut min_value = *xs.first().ok_or(WingError::TurningPointNotFound)?;

    for (i, x) in xs.iter().enumerate().skip(1) {
        if *x > min_value {
            return Ok(min_index);
        }
        if *x < min_value {
            min_value = *x;
            min_index = i;
        }
    }

    Err(WingError::TurningPointNotFound)
}

/// Chordwise (or spanwise) distribution of sample points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Spacing {
    /// Evenly spaced samples
    #[default]
    Uniform,

    /// Samples concentrated near both ends following `x = c/2 (1 - cos(pi i / (n - 1)))`
    Cosine,
}

impl Spacing {
    pub fn from_flag(cosine_spacing: bool) -> Self {
        if cosine_spacing {
            Spacing::Cosine
        } else {
            Spacing::Uniform
        }
    }
}

impl FromStr for Spacing {
    type Err = WingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "uniform" | "linear" => Ok(Spacing::Uniform),
            "cosine" => Ok(Spacing::Cosine),
            _ => Err(WingError::UnsupportedSpacing(s.to_string())),
        }
    }
}

impl TryFrom<String> for Spacing {
    type Error = WingError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Spacing> for String {
    fn from(value: Spacing) -> Self {
        value.to_string()
    }
}

impl Display for Spacing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Spacing::Uniform => write!(f, "uniform"),
            Spacing::Cosine => write!(f, "cosine"),
        }
    }
}

/// Generates `n` sample positions over `[0, length]`. The first and last samples are exactly
/// 0 and `length`.
pub fn sample_grid(n: usize, length: f64, spacing: Spacing) -> Result<Vec<f64>> {
    if n < 2 {
        return Err(WingError::NotEnoughPoints { needed: 2, got: n });
    }

    let last = (n - 1) as f64;
    let grid = (0..n)
        .map(|i| {
            if i == n - 1 {
                return length;
            }
            let f = i as f64 / last;
            match spacing {
                Spacing::Uniform => f * length,
                Spacing::Cosine => 0.5 * length * (1.0 - (PI * f).cos()),
            }
        })
        .collect();

    Ok(grid)
}
