use crate::airfoil::series::{five_digit_coefficients, FiveDigitCoefficients};
use crate::airfoil::{AirfoilGeometry, Sampling, SurfaceStation, TrailingEdge};
use crate::Result;
use ncollide2d::na::Point2;

/// The shape parameters shared by the NACA families, all expressed as fractions of the chord.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirfoilParameters {
    /// Maximum camber
    pub m: f64,

    /// Chordwise position of the maximum camber
    pub p: f64,

    /// Maximum thickness
    pub t: f64,
}

impl AirfoilParameters {
    pub fn new(m: f64, p: f64, t: f64) -> Self {
        AirfoilParameters { m, p, t }
    }

    pub fn is_symmetric(&self) -> bool {
        self.m == 0.0 && self.p == 0.0
    }
}

/// Which polynomial of a piecewise camber line is in effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CamberSegment {
    Forward,
    Aft,
}

/// Half thickness of the NACA thickness distribution at chord fraction `x` for a maximum
/// thickness `t`.
pub fn thickness_distribution(t: f64, x: f64, trailing_edge: TrailingEdge) -> f64 {
    t / 0.2
        * (0.2969 * x.sqrt() - 0.1260 * x - 0.3515 * x.powi(2) + 0.2843 * x.powi(3)
            + trailing_edge.quartic_coefficient() * x.powi(4))
}

/// NACA 4-digit mean camber line evaluated with the polynomial of the given segment. With a zero
/// camber position the forward segment shrinks to the leading edge, where the camber is zero.
pub fn naca4_camber(params: &AirfoilParameters, x: f64, segment: CamberSegment) -> f64 {
    if params.is_symmetric() {
        return 0.0;
    }

    let (m, p) = (params.m, params.p);
    match segment {
        CamberSegment::Forward if p == 0.0 => 0.0,
        CamberSegment::Forward => m / p.powi(2) * (2.0 * p * x - x.powi(2)),
        CamberSegment::Aft => m / (1.0 - p).powi(2) * (1.0 - 2.0 * p + 2.0 * p * x - x.powi(2)),
    }
}

/// NACA 5-digit mean camber line, where `m` is the chord fraction at which the cubic forward
/// polynomial hands over to the linear aft segment.
pub fn naca5_camber(m: f64, k1: f64, x: f64, segment: CamberSegment) -> f64 {
    match segment {
        CamberSegment::Forward => {
            k1 / 6.0 * (x.powi(3) - 3.0 * m * x.powi(2) + m.powi(2) * (3.0 - m) * x)
        }
        CamberSegment::Aft => k1 / 6.0 * m.powi(3) * (1.0 - x),
    }
}

/// Forward difference derivative of `f` at `x`
pub fn forward_slope(f: impl Fn(f64) -> f64, x: f64, step: f64) -> f64 {
    (f(x + step) - f(x)) / step
}

/// An AirfoilGenerator is an entity which can generate the position of the mean camber line and
/// the thickness at fractions of the chord. This provides the information necessary for a
/// generator to compute the airfoil surfaces.
pub trait AirfoilGenerator {
    fn params(&self) -> &AirfoilParameters;

    /// The camber polynomial that owns the chord fraction `x`
    fn segment(&self, x: f64) -> CamberSegment;

    /// Camber ordinate at `x` evaluated with a specific segment polynomial
    fn camber_on(&self, segment: CamberSegment, x: f64) -> f64;

    fn camber_line(&self, x: f64) -> f64 {
        self.camber_on(self.segment(x), x)
    }

    /// The slope is differentiated on the segment that owns `x`, so the step never straddles
    /// the junction between the two polynomials.
    fn camber_slope(&self, x: f64, step: f64) -> f64 {
        let segment = self.segment(x);
        forward_slope(|v| self.camber_on(segment, v), x, step)
    }

    fn thickness(&self, x: f64, trailing_edge: TrailingEdge) -> f64 {
        thickness_distribution(self.params().t, x, trailing_edge)
    }

    /// Upper and lower surface points at the unit chord fraction `x`
    fn station_at(&self, x: f64, sampling: &Sampling) -> SurfaceStation {
        let yc = self.camber_line(x);
        let yt = self.thickness(x, sampling.trailing_edge);
        let theta = self.camber_slope(x, sampling.step).atan();
        let (sin, cos) = theta.sin_cos();

        SurfaceStation::new(
            Point2::new(x - yt * sin, yc + yt * cos),
            Point2::new(x + yt * sin, yc - yt * cos),
        )
    }

    /// Sample the section at the chord fractions described by `sampling` and scale it to the
    /// given chord length.
    fn generate(&self, chord: f64, sampling: &Sampling) -> Result<AirfoilGeometry> {
        sampling.validate()?;

        let stations: Vec<SurfaceStation> = sampling
            .unit_grid()?
            .into_iter()
            .map(|x| self.station_at(x, sampling))
            .collect();

        let scale = |p: &Point2<f64>| Point2::new(p.x * chord, p.y * chord);
        let upper: Vec<Point2<f64>> = stations.iter().map(|s| scale(&s.upper)).collect();
        let lower: Vec<Point2<f64>> = stations.iter().map(|s| scale(&s.lower)).collect();

        AirfoilGeometry::from_surfaces(&upper, &lower)
    }
}

/// A generator for a NACA 4-digit airfoil of the form MPTT, where M is the maximum camber P is the
/// location of the maximum camber, and TT is the maximum thickness of the airfoil as a fraction of
/// the chord.  For example, a NACA 2412 airfoil has a 2% camber at 40% of the chord and a max
/// thickness which is 12% of the chord length.
pub struct Naca4Digit {
    params: AirfoilParameters,
}

impl Naca4Digit {
    /// Create a new NACA 4 digit generator.
    ///
    /// # Arguments
    ///
    /// * `max_camber` - The max camber as a fraction, for example on a NACA 2412 this value should
    /// be set to 0.02
    ///
    /// * `max_camber_chord` - The location of the max camber as a fraction of chord length. For
    /// example on a NACA 2412 this values should be 0.4
    ///
    /// * `t_max` - the maximum thickness of the airfoil as a fraction of the chord length. For
    /// instance, on a NACA 2412 t_max should be 0.12
    pub fn new(max_camber: f64, max_camber_chord: f64, t_max: f64) -> Naca4Digit {
        let params = AirfoilParameters::new(max_camber, max_camber_chord, t_max);
        if params.m != 0.0 && params.p == 0.0 {
            log::warn!(
                "NACA 4-digit camber {} with zero camber position jumps at the leading edge",
                params.m
            );
        }
        Naca4Digit { params }
    }

    pub fn from_digits(camber: u8, position: u8, thickness: u8) -> Naca4Digit {
        Self::new(
            camber as f64 / 100.0,
            position as f64 / 10.0,
            thickness as f64 / 100.0,
        )
    }
}

impl AirfoilGenerator for Naca4Digit {
    fn params(&self) -> &AirfoilParameters {
        &self.params
    }

    fn segment(&self, x: f64) -> CamberSegment {
        if x <= self.params.p {
            CamberSegment::Forward
        } else {
            CamberSegment::Aft
        }
    }

    fn camber_on(&self, segment: CamberSegment, x: f64) -> f64 {
        naca4_camber(&self.params, x, segment)
    }
}

/// A generator for a NACA 5-digit airfoil. The first three digits select a tabulated camber line
/// and the last two give the maximum thickness in percent of chord, so a NACA 23012 has the 230
/// camber line (max camber at 15% chord) and is 12% thick.
pub struct Naca5Digit {
    params: AirfoilParameters,
    coefficients: FiveDigitCoefficients,
}

impl Naca5Digit {
    pub fn new(coefficients: FiveDigitCoefficients, t_max: f64) -> Naca5Digit {
        Naca5Digit {
            params: AirfoilParameters::new(coefficients.m, coefficients.p, t_max),
            coefficients,
        }
    }

    pub fn from_series(series: u16, thickness: u8) -> Result<Naca5Digit> {
        let coefficients = five_digit_coefficients(series)?;
        Ok(Self::new(coefficients, thickness as f64 / 100.0))
    }
}

impl AirfoilGenerator for Naca5Digit {
    fn params(&self) -> &AirfoilParameters {
        &self.params
    }

    fn segment(&self, x: f64) -> CamberSegment {
        if x <= self.coefficients.m {
            CamberSegment::Forward
        } else {
            CamberSegment::Aft
        }
    }

    fn camber_on(&self, segment: CamberSegment, x: f64) -> f64 {
        naca5_camber(self.coefficients.m, self.coefficients.k1, x, segment)
    }
}
