use crate::airfoil::loaded::CoordinateRepository;
use crate::airfoil::Sampling;
use crate::algorithms::{sample_grid, Spacing};
use crate::{Result, WingError};
use assemble::{shift_reference_line, SectionAssembler};
use distribution::{AirfoilDistribution, Distribution};
use serde::{Deserialize, Serialize};
use store::GeometryStore;
use transform::GeometryTransformer;

pub mod assemble;
pub mod distribution;
pub mod store;
pub mod transform;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WingSettings {
    /// How every airfoil section is sampled
    pub airfoil: Sampling,

    /// Chord fraction behind the leading edge that is placed on the span axis
    pub reference_fraction: f64,
}

impl Default for WingSettings {
    fn default() -> Self {
        WingSettings {
            airfoil: Sampling::default(),
            reference_fraction: 0.25,
        }
    }
}

/// Summary of the resolved chord distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Planform {
    pub half_span: f64,
    pub root_chord: f64,
    pub tip_chord: f64,
    pub taper_ratio: f64,

    /// Mean of the chord over the span stations
    pub mean_chord: f64,
}

impl Planform {
    fn from_chords(stations: &[f64], chords: &[f64]) -> Planform {
        let root_chord = chords[0];
        let tip_chord = chords[chords.len() - 1];
        Planform {
            half_span: stations[stations.len() - 1],
            root_chord,
            tip_chord,
            taper_ratio: tip_chord / root_chord,
            mean_chord: chords.iter().sum::<f64>() / chords.len() as f64,
        }
    }
}

/// Generate `count` span stations from the root to `half_span`.
pub fn span_stations(half_span: f64, count: usize, spacing: Spacing) -> Result<Vec<f64>> {
    if !half_span.is_finite() || half_span <= 0.0 {
        return Err(WingError::InvalidStations(format!(
            "half span must be positive, got {}",
            half_span
        )));
    }
    sample_grid(count, half_span, spacing).map_err(|_| {
        WingError::InvalidStations(format!("at least 2 stations required, got {}", count))
    })
}

fn validate_stations(stations: &[f64]) -> Result<()> {
    if stations.len() < 2 {
        return Err(WingError::InvalidStations(format!(
            "at least 2 stations required, got {}",
            stations.len()
        )));
    }
    if let Some(y) = stations.iter().find(|y| !y.is_finite()) {
        return Err(WingError::InvalidStations(format!("station {} is not finite", y)));
    }
    if stations[0] < 0.0 {
        return Err(WingError::InvalidStations(format!(
            "stations start at {}, before the root",
            stations[0]
        )));
    }
    if let Some(w) = stations.windows(2).find(|w| w[1] <= w[0]) {
        return Err(WingError::InvalidStations(format!(
            "stations must be strictly increasing, {} follows {}",
            w[1], w[0]
        )));
    }
    Ok(())
}

/// A half wing described by spanwise distributions. Calling `construct` resolves the
/// distributions at the span stations and builds the surface geometry.
pub struct Wing {
    stations: Vec<f64>,
    chord: Option<Distribution>,
    twist: Option<Distribution>,
    sweep: Option<Distribution>,
    dihedral: Option<Distribution>,
    airfoil: Option<AirfoilDistribution>,
    settings: WingSettings,
    geometry: GeometryStore,
    planform: Option<Planform>,
}

impl Wing {
    pub fn new(stations: Vec<f64>) -> Result<Wing> {
        validate_stations(&stations)?;
        Ok(Wing {
            stations,
            chord: None,
            twist: None,
            sweep: None,
            dihedral: None,
            airfoil: None,
            settings: WingSettings::default(),
            geometry: GeometryStore::default(),
            planform: None,
        })
    }

    pub fn with_span(half_span: f64, count: usize, spacing: Spacing) -> Result<Wing> {
        Self::new(span_stations(half_span, count, spacing)?)
    }

    pub fn stations(&self) -> &[f64] {
        &self.stations
    }

    pub fn half_span(&self) -> f64 {
        self.stations[self.stations.len() - 1]
    }

    pub fn set_chord(&mut self, chord: Distribution) {
        self.chord = Some(chord);
    }

    /// Twist angles in radians
    pub fn set_twist(&mut self, twist: Distribution) {
        self.twist = Some(twist);
    }

    /// Sweep angles in radians, the value at a station applies to the segment outboard of it
    pub fn set_sweep(&mut self, sweep: Distribution) {
        self.sweep = Some(sweep);
    }

    /// Dihedral angles in radians, the value at a station applies to the segment outboard of it
    pub fn set_dihedral(&mut self, dihedral: Distribution) {
        self.dihedral = Some(dihedral);
    }

    pub fn set_airfoil(&mut self, airfoil: AirfoilDistribution) {
        self.airfoil = Some(airfoil);
    }

    pub fn settings(&self) -> &WingSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: WingSettings) {
        self.settings = settings;
    }

    pub fn set_airfoil_points(&mut self, points: usize) {
        self.settings.airfoil.points = points;
    }

    pub fn set_cosine_spacing(&mut self, cosine_spacing: bool) {
        self.settings.airfoil.spacing = Spacing::from_flag(cosine_spacing);
    }

    /// The most recently constructed geometry
    pub fn geometry(&self) -> &GeometryStore {
        &self.geometry
    }

    pub fn planform(&self) -> Option<&Planform> {
        self.planform.as_ref()
    }

    fn resolve_angles(&self, name: &str, dist: &Option<Distribution>) -> Result<Option<Vec<f64>>> {
        dist.as_ref()
            .map(|d| d.resolve(name, &self.stations))
            .transpose()
    }

    /// Build the wing surface. The new geometry replaces the previous one only when every stage
    /// succeeds; on error the previously constructed geometry is left untouched.
    pub fn construct(&mut self, repository: &dyn CoordinateRepository) -> Result<&GeometryStore> {
        self.settings.airfoil.validate()?;
        if !self.settings.reference_fraction.is_finite() {
            return Err(WingError::InvalidSettings(
                "reference fraction must be finite".to_string(),
            ));
        }

        let chord = self.chord.as_ref().ok_or(WingError::MissingDistribution("chord"))?;
        let airfoil = self.airfoil.as_ref().ok_or(WingError::MissingDistribution("airfoil"))?;

        let chords = chord.resolve("chord", &self.stations)?;
        if let Some((y, c)) = self.stations.iter().zip(chords.iter()).find(|(_, c)| **c <= 0.0) {
            return Err(WingError::InvalidDistribution {
                name: "chord".to_string(),
                reason: format!("chord {} at y = {} is not positive", c, y),
            });
        }

        let transformer = GeometryTransformer::new(
            self.resolve_angles("twist", &self.twist)?,
            self.resolve_angles("sweep", &self.sweep)?,
            self.resolve_angles("dihedral", &self.dihedral)?,
        );

        let mut assembler = SectionAssembler::new(&self.settings.airfoil, repository);
        let mut sections = assembler.assemble(&self.stations, &chords, airfoil)?;
        shift_reference_line(&mut sections, &chords, self.settings.reference_fraction);

        let mut store = GeometryStore::from_sections(sections)?;
        transformer.apply(&mut store)?;

        log::info!(
            "Constructed wing with {} stations and {} points per section",
            store.station_count(),
            store.points_per_section()
        );

        self.planform = Some(Planform::from_chords(&self.stations, &chords));
        self.geometry = store;
        Ok(&self.geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airfoil::generate::{thickness_distribution, AirfoilGenerator, Naca4Digit};
    use crate::airfoil::loaded::{LoadedAirfoil, MemoryRepository};
    use crate::airfoil::{AirfoilCode, TrailingEdge};
    use ncollide2d::na::Point2;
    use crate::wing::distribution::AirfoilRegion;
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn code(text: &str) -> AirfoilCode {
        text.parse().unwrap()
    }

    fn rectangular_wing() -> Wing {
        let mut wing = Wing::with_span(10.0, 5, Spacing::Uniform).unwrap();
        wing.set_chord(Distribution::constant(2.0));
        wing.set_twist(Distribution::constant(0.0));
        wing.set_sweep(Distribution::constant(0.0));
        wing.set_dihedral(Distribution::constant(0.0));
        wing.set_airfoil(AirfoilDistribution::uniform(code("NACA2412")));
        wing
    }

    #[test]
    fn test_rectangular_wing() {
        let mut wing = rectangular_wing();
        let repository = MemoryRepository::default();
        let store = wing.construct(&repository).unwrap();

        let n = store.points_per_section();
        assert_eq!(5, store.station_count());
        assert_eq!(50, n);
        assert_eq!(250, store.array().ncols());

        let expected: Vec<f64> = vec![0.0, 2.5, 5.0, 7.5, 10.0];
        let ys: Vec<f64> = (0..5).map(|i| store.array()[(1, i * n)]).collect();
        assert_eq!(expected, ys);

        let profile = Naca4Digit::from_digits(2, 4, 12)
            .generate(2.0, &wing.settings().airfoil)
            .unwrap();
        for section in wing.geometry().sections() {
            for (p, q) in section.points.iter().zip(profile.points().iter()) {
                assert_relative_eq!(-q.x + 0.5, p.x, epsilon = 1e-12);
                assert_relative_eq!(q.y, p.y, epsilon = 1e-12);
            }
        }
    }

    /// Digitized cambered section with a single leading edge point
    fn digitized_table() -> Vec<Point2<f64>> {
        let naca = Naca4Digit::from_digits(4, 4, 12);
        let xs = sample_grid(61, 1.0, Spacing::Cosine).unwrap();
        let surface = |x: f64, side: f64| {
            Point2::new(x, naca.camber_line(x) + side * naca.thickness(x, TrailingEdge::Open))
        };
        xs.iter()
            .rev()
            .map(|x| surface(*x, 1.0))
            .chain(xs.iter().skip(1).map(|x| surface(*x, -1.0)))
            .collect()
    }

    #[test]
    fn test_wing_with_digitized_airfoil() {
        let repository = MemoryRepository::default().with("mh4412", digitized_table());
        let mut wing = Wing::with_span(10.0, 3, Spacing::Uniform).unwrap();
        wing.set_chord(Distribution::samples(vec![(0.0, 2.0), (10.0, 1.0)]));
        wing.set_airfoil(
            AirfoilDistribution::new(vec![
                AirfoilRegion::new(code("NACA0012"), 0.0, 0.5),
                AirfoilRegion::new(code("MH4412"), 0.5, 1.0),
            ])
            .unwrap(),
        );

        let store = wing.construct(&repository).unwrap();
        assert_eq!(3, store.station_count());
        assert_eq!(50, store.points_per_section());

        let loaded = LoadedAirfoil::from_points("mh4412", digitized_table()).unwrap();
        let settings = wing.settings().airfoil;
        for (section, chord) in wing.geometry().sections()[1..].iter().zip([1.5, 1.0]) {
            let profile = loaded.generate(chord, &settings).unwrap();
            for (p, q) in section.points.iter().zip(profile.points().iter()) {
                assert_relative_eq!(-q.x + 0.25 * chord, p.x, epsilon = 1e-12);
                assert_relative_eq!(q.y, p.y, epsilon = 1e-12);
            }
        }

        // Cambered mid station: the upper surface at half chord is further from the chord line
        let mid = &wing.geometry().sections()[1];
        assert!(mid.points[12].y > -mid.points[37].y);
    }

    #[test]
    fn test_construct_is_idempotent() {
        let mut wing = rectangular_wing();
        wing.set_sweep(Distribution::function(|y| 0.3 - 0.01 * y));
        wing.set_twist(Distribution::samples(vec![(0.0, 0.05), (10.0, -0.02)]));
        let repository = MemoryRepository::default();

        let first = wing.construct(&repository).unwrap().array().clone();
        let second = wing.construct(&repository).unwrap().array().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_dihedral_scenario() {
        let mut wing = Wing::new(vec![0.0, 5.0, 10.0]).unwrap();
        wing.set_chord(Distribution::constant(1.0));
        wing.set_dihedral(Distribution::constant(0.1));
        wing.set_airfoil(AirfoilDistribution::uniform(code("NACA0012")));
        let repository = MemoryRepository::default();
        let store = wing.construct(&repository).unwrap();

        let sections = store.sections();
        for (a, b) in sections[0].points.iter().zip(sections[1].points.iter()) {
            assert_relative_eq!(5.0 * 0.1f64.tan(), b.y - a.y, epsilon = 1e-12);
        }
        for (a, c) in sections[0].points.iter().zip(sections[2].points.iter()) {
            assert_relative_eq!(10.0 * 0.1f64.tan(), c.y - a.y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_lookup_failure_leaves_no_geometry() {
        let mut wing = Wing::new(vec![0.0, 0.55, 1.0]).unwrap();
        wing.set_chord(Distribution::constant(1.0));
        wing.set_airfoil(
            AirfoilDistribution::new(vec![
                AirfoilRegion::new(code("NACA2412"), 0.0, 0.5),
                AirfoilRegion::new(code("NACA0012"), 0.6, 1.0),
            ])
            .unwrap(),
        );

        let repository = MemoryRepository::default();
        let result = wing.construct(&repository);
        assert!(matches!(result, Err(WingError::SpanLookup { .. })));
        assert!(wing.geometry().is_empty());
        assert!(wing.planform().is_none());
    }

    #[test]
    fn test_failed_pass_keeps_previous_geometry() {
        let mut wing = rectangular_wing();
        let repository = MemoryRepository::default();
        let before = wing.construct(&repository).unwrap().array().clone();

        wing.set_airfoil(AirfoilDistribution::uniform(code("missing_foil")));
        assert!(matches!(
            wing.construct(&repository),
            Err(WingError::AirfoilNotFound(_))
        ));
        assert_eq!(&before, wing.geometry().array());
    }

    #[test]
    fn test_twist_rotates_about_reference_line() {
        let mut wing = Wing::new(vec![0.0, 1.0]).unwrap();
        wing.set_chord(Distribution::constant(1.0));
        wing.set_twist(Distribution::constant(0.2));
        wing.set_airfoil(AirfoilDistribution::uniform(code("NACA0012")));
        wing.set_airfoil_points(11);
        let repository = MemoryRepository::default();
        let store = wing.construct(&repository).unwrap();

        // Before twisting the upper trailing edge of the symmetric section is at (-0.75, t)
        let te = store.sections()[0].points[0];
        let t = thickness_distribution(0.12, 1.0, TrailingEdge::Open);
        let (sin, cos) = 0.2f64.sin_cos();
        assert_relative_eq!(-0.75 * cos - t * sin, te.x, epsilon = 1e-9);
        assert_relative_eq!(-0.75 * sin + t * cos, te.y, epsilon = 1e-9);
    }

    #[test]
    fn test_planform() {
        let mut wing = Wing::new(vec![0.0, 5.0, 10.0]).unwrap();
        wing.set_chord(Distribution::samples(vec![(0.0, 3.0), (10.0, 1.0)]));
        wing.set_airfoil(AirfoilDistribution::uniform(code("NACA0012")));
        wing.construct(&MemoryRepository::default()).unwrap();

        let planform = wing.planform().unwrap();
        assert_eq!(10.0, planform.half_span);
        assert_eq!(3.0, planform.root_chord);
        assert_eq!(1.0, planform.tip_chord);
        assert_relative_eq!(1.0 / 3.0, planform.taper_ratio);
        assert_relative_eq!(2.0, planform.mean_chord);
    }

    #[test]
    fn test_missing_distributions() {
        let repository = MemoryRepository::default();
        let mut wing = Wing::new(vec![0.0, 1.0]).unwrap();
        assert!(matches!(
            wing.construct(&repository),
            Err(WingError::MissingDistribution("chord"))
        ));

        wing.set_chord(Distribution::constant(1.0));
        assert!(matches!(
            wing.construct(&repository),
            Err(WingError::MissingDistribution("airfoil"))
        ));
    }

    #[test]
    fn test_chord_outside_defined_range() {
        let mut wing = Wing::new(vec![0.0, 5.0, 12.0]).unwrap();
        wing.set_chord(Distribution::samples(vec![(0.0, 3.0), (10.0, 1.0)]));
        wing.set_airfoil(AirfoilDistribution::uniform(code("NACA0012")));
        assert!(matches!(
            wing.construct(&MemoryRepository::default()),
            Err(WingError::OutsideDefinedRange { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_chord() {
        let mut wing = Wing::new(vec![0.0, 1.0]).unwrap();
        wing.set_chord(Distribution::function(|y| 1.0 - y));
        wing.set_airfoil(AirfoilDistribution::uniform(code("NACA0012")));
        assert!(matches!(
            wing.construct(&MemoryRepository::default()),
            Err(WingError::InvalidDistribution { .. })
        ));
    }

    #[test_case(vec![0.0])]
    #[test_case(vec![0.0, 2.0, 1.0])]
    #[test_case(vec![-1.0, 2.0])]
    #[test_case(vec![0.0, f64::NAN])]
    fn test_invalid_stations(stations: Vec<f64>) {
        assert!(matches!(
            Wing::new(stations),
            Err(WingError::InvalidStations(_))
        ));
    }

    #[test]
    fn test_cosine_span_stations() {
        let stations = span_stations(10.0, 5, Spacing::Cosine).unwrap();
        assert_eq!(0.0, stations[0]);
        assert_eq!(10.0, stations[4]);
        assert_relative_eq!(5.0, stations[2], epsilon = 1e-12);
    }
}
