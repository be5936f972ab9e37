use crate::algorithms::{find_turning_point, sample_grid, Spacing};
use crate::spline::{SmoothingSpline, SplineSettings};
use crate::{Result, WingError};
use generate::{AirfoilGenerator, Naca4Digit, Naca5Digit};
use loaded::{CoordinateRepository, LoadedAirfoil};
use ncollide2d::na::Point2;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub mod generate;
pub mod loaded;
pub mod series;

/// Identifies the shape of an airfoil section, either as a NACA code or as the name of a
/// digitized coordinate set in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AirfoilCode {
    /// NACA 4-digit `MPTT`: max camber in percent, camber position in tenths, thickness in
    /// percent of chord
    Naca4 { camber: u8, position: u8, thickness: u8 },

    /// NACA 5-digit: a three digit camber series followed by two thickness digits
    Naca5 { series: u16, thickness: u8 },

    /// A named set of digitized coordinates
    Digitized(String),
}

impl AirfoilCode {
    fn from_digits(original: &str, digits: &str) -> Result<Self> {
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(WingError::InvalidAirfoilCode {
                code: original.to_string(),
                reason: "expected a numeric NACA code".to_string(),
            });
        }

        let value = |range: std::ops::Range<usize>| digits[range].parse::<u16>().unwrap_or(0);
        match digits.len() {
            4 => Ok(AirfoilCode::Naca4 {
                camber: value(0..1) as u8,
                position: value(1..2) as u8,
                thickness: value(2..4) as u8,
            }),
            5 => Ok(AirfoilCode::Naca5 {
                series: value(0..3),
                thickness: value(3..5) as u8,
            }),
            n => Err(WingError::InvalidAirfoilCode {
                code: original.to_string(),
                reason: format!("expected a 4 or 5 digit NACA code, got {} digits", n),
            }),
        }
    }
}

impl FromStr for AirfoilCode {
    type Err = WingError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        if code.is_empty() {
            return Err(WingError::InvalidAirfoilCode {
                code: s.to_string(),
                reason: "empty airfoil code".to_string(),
            });
        }

        match code.get(..4) {
            Some(prefix) if prefix.eq_ignore_ascii_case("naca") => {
                let digits =
                    code[4..].trim_start_matches(|c: char| c == ' ' || c == '-' || c == '_');
                Self::from_digits(code, digits)
            }
            _ if code.chars().all(|c| c.is_ascii_digit()) => Self::from_digits(code, code),
            _ => Ok(AirfoilCode::Digitized(code.to_string())),
        }
    }
}

impl TryFrom<String> for AirfoilCode {
    type Error = WingError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<AirfoilCode> for String {
    fn from(value: AirfoilCode) -> Self {
        value.to_string()
    }
}

impl Display for AirfoilCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AirfoilCode::Naca4 {
                camber,
                position,
                thickness,
            } => write!(f, "NACA{}{}{:02}", camber, position, thickness),
            AirfoilCode::Naca5 { series, thickness } => {
                write!(f, "NACA{:03}{:02}", series, thickness)
            }
            AirfoilCode::Digitized(name) => write!(f, "{}", name),
        }
    }
}

/// Selects the last coefficient of the NACA thickness polynomial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrailingEdge {
    /// The published polynomial, which leaves a small finite trailing edge thickness
    #[default]
    Open,

    /// The modified polynomial that closes the trailing edge to zero thickness
    Closed,
}

impl TrailingEdge {
    pub fn quartic_coefficient(&self) -> f64 {
        match self {
            TrailingEdge::Open => -0.1015,
            TrailingEdge::Closed => -0.1036,
        }
    }
}

/// Controls how a section is sampled when its coordinates are generated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sampling {
    /// Number of chordwise samples per surface
    pub points: usize,
    pub spacing: Spacing,

    /// Forward difference step for the camber slope, as a fraction of chord
    pub step: f64,
    pub trailing_edge: TrailingEdge,

    /// Fit used to resample digitized coordinates
    pub spline: SplineSettings,
}

impl Default for Sampling {
    fn default() -> Self {
        Sampling {
            points: 25,
            spacing: Spacing::Uniform,
            step: 1e-4,
            trailing_edge: TrailingEdge::Open,
            spline: SplineSettings::default(),
        }
    }
}

impl Sampling {
    pub fn new(points: usize, spacing: Spacing) -> Self {
        Sampling {
            points,
            spacing,
            ..Default::default()
        }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn with_trailing_edge(mut self, trailing_edge: TrailingEdge) -> Self {
        self.trailing_edge = trailing_edge;
        self
    }

    pub fn with_spline(mut self, spline: SplineSettings) -> Self {
        self.spline = spline;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.points < 2 {
            return Err(WingError::InvalidSettings(format!(
                "at least 2 chordwise points are required, got {}",
                self.points
            )));
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(WingError::InvalidSettings(format!(
                "slope step must be positive, got {}",
                self.step
            )));
        }
        self.spline.validate()
    }

    /// Chordwise sample positions for a unit chord
    pub fn unit_grid(&self) -> Result<Vec<f64>> {
        sample_grid(self.points, 1.0, self.spacing)
    }
}

/// Upper and lower surface points at one chordwise station
pub struct SurfaceStation {
    pub upper: Point2<f64>,
    pub lower: Point2<f64>,
}

impl SurfaceStation {
    pub fn new(upper: Point2<f64>, lower: Point2<f64>) -> SurfaceStation {
        SurfaceStation { upper, lower }
    }
}

/// A 2D airfoil section as (x, z) points in horseshoe order: starting at the upper trailing edge,
/// running forward along the upper surface, around the leading edge, and back along the lower
/// surface to the lower trailing edge.
///
/// `leading_edge` is the last point of the upper surface and `lower_start` the first point of the
/// lower surface. Digitized tables share a single leading edge point between both surfaces, while
/// generated sections carry one leading edge point per surface.
#[derive(Debug, Clone, PartialEq)]
pub struct AirfoilGeometry {
    points: Vec<Point2<f64>>,
    leading_edge: usize,
    lower_start: usize,
}

impl AirfoilGeometry {
    /// Build a geometry from horseshoe ordered points, locating the leading edge turning point.
    pub fn from_points(points: Vec<Point2<f64>>) -> Result<Self> {
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let leading_edge = find_turning_point(&xs)?;
        Ok(AirfoilGeometry {
            points,
            leading_edge,
            lower_start: leading_edge,
        })
    }

    /// Build a geometry from an upper and a lower surface, both ordered from the leading edge to
    /// the trailing edge. The seam between the surfaces is taken from their lengths, so upper
    /// surface points that wrap ahead of the lower leading edge stay on the upper surface.
    pub fn from_surfaces(upper: &[Point2<f64>], lower: &[Point2<f64>]) -> Result<Self> {
        if upper.is_empty() || lower.is_empty() {
            return Err(WingError::NotEnoughPoints {
                needed: 1,
                got: upper.len().min(lower.len()),
            });
        }

        let mut points: Vec<Point2<f64>> = upper.iter().rev().cloned().collect();
        points.extend_from_slice(lower);
        Ok(AirfoilGeometry {
            points,
            leading_edge: upper.len() - 1,
            lower_start: upper.len(),
        })
    }

    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point2<f64>> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn leading_edge_index(&self) -> usize {
        self.leading_edge
    }

    pub fn leading_edge(&self) -> Point2<f64> {
        self.points[self.leading_edge]
    }

    /// Upper surface from the leading edge to the trailing edge
    pub fn upper(&self) -> Vec<Point2<f64>> {
        self.points[..=self.leading_edge].iter().rev().cloned().collect()
    }

    /// Lower surface from the leading edge to the trailing edge
    pub fn lower(&self) -> Vec<Point2<f64>> {
        self.points[self.lower_start..].to_vec()
    }

    /// Scale all coordinates by the chord length
    pub fn scaled(&self, chord: f64) -> AirfoilGeometry {
        AirfoilGeometry {
            points: self.points.iter().map(|p| Point2::new(p.x * chord, p.y * chord)).collect(),
            leading_edge: self.leading_edge,
            lower_start: self.lower_start,
        }
    }

    /// Fit independent splines to the upper and lower surfaces and sample both at the given
    /// x positions. The positions must lie inside the x range covered by each surface.
    pub fn resample(&self, grid: &[f64], settings: &SplineSettings) -> Result<AirfoilGeometry> {
        let upper = resample_surface(&self.upper(), grid, settings)?;
        let lower = resample_surface(&self.lower(), grid, settings)?;
        Self::from_surfaces(&upper, &lower)
    }
}

fn resample_surface(
    surface: &[Point2<f64>],
    grid: &[f64],
    settings: &SplineSettings,
) -> Result<Vec<Point2<f64>>> {
    // A cambered upper surface can wrap slightly ahead of its first point near the nose, the fit
    // starts at the foremost point so that x is increasing
    let nose = surface
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.x.total_cmp(&b.1.x))
        .map_or(0, |(i, _)| i);

    let mut xs: Vec<f64> = Vec::with_capacity(surface.len());
    let mut zs: Vec<f64> = Vec::with_capacity(surface.len());
    for p in surface[nose..].iter() {
        if xs.last().map_or(false, |x| *x == p.x) {
            continue;
        }
        xs.push(p.x);
        zs.push(p.y);
    }

    let spline = SmoothingSpline::fit(&xs, &zs, settings)?;
    grid.iter()
        .map(|x| spline.eval(*x).map(|z| Point2::new(*x, z)))
        .collect()
}

/// Produce the section geometry for an airfoil code at the given chord length.
pub fn profile(
    code: &AirfoilCode,
    chord: f64,
    sampling: &Sampling,
    repository: &dyn CoordinateRepository,
) -> Result<AirfoilGeometry> {
    match code {
        AirfoilCode::Naca4 {
            camber,
            position,
            thickness,
        } => Naca4Digit::from_digits(*camber, *position, *thickness).generate(chord, sampling),
        AirfoilCode::Naca5 { series, thickness } => {
            Naca5Digit::from_series(*series, *thickness)?.generate(chord, sampling)
        }
        AirfoilCode::Digitized(name) => {
            LoadedAirfoil::load(repository, name)?.generate(chord, sampling)
        }
    }
}
