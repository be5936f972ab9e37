use crate::airfoil::loaded::CoordinateRepository;
use crate::airfoil::{profile, AirfoilCode, AirfoilGeometry, Sampling};
use crate::wing::distribution::AirfoilDistribution;
use crate::wing::store::Section;
use crate::Result;
use ncollide2d::na::Point2;
use std::collections::HashMap;

/// Places the airfoil section of each span station: picks the airfoil active at the station,
/// scales the unit chord profile by the local chord and mirrors x so that the leading edge sits
/// at the origin with the section trailing aft along negative x.
pub struct SectionAssembler<'a> {
    sampling: &'a Sampling,
    repository: &'a dyn CoordinateRepository,
    profiles: HashMap<AirfoilCode, AirfoilGeometry>,
}

impl<'a> SectionAssembler<'a> {
    pub fn new(sampling: &'a Sampling, repository: &'a dyn CoordinateRepository) -> Self {
        SectionAssembler {
            sampling,
            repository,
            profiles: HashMap::new(),
        }
    }

    fn unit_profile(&mut self, code: &AirfoilCode) -> Result<&AirfoilGeometry> {
        if !self.profiles.contains_key(code) {
            log::debug!("Generating profile for {}", code);
            let geometry = profile(code, 1.0, self.sampling, self.repository)?;
            self.profiles.insert(code.clone(), geometry);
        }
        Ok(&self.profiles[code])
    }

    /// Build one section per station. Stations must be strictly increasing and `chords` must
    /// hold one value per station.
    pub fn assemble(
        &mut self,
        stations: &[f64],
        chords: &[f64],
        airfoils: &AirfoilDistribution,
    ) -> Result<Vec<Section>> {
        let half_span = stations.last().cloned().unwrap_or(0.0);

        stations
            .iter()
            .zip(chords.iter())
            .map(|(y, c)| {
                let code = airfoils.lookup(y / half_span)?;
                let unit = self.unit_profile(code)?;
                let points = unit
                    .points()
                    .iter()
                    .map(|p| Point2::new(-c * p.x, c * p.y))
                    .collect();
                Ok(Section::new(*y, points))
            })
            .collect()
    }
}

/// Move each section forward by `fraction` of its local chord, so that the chosen reference line
/// (the quarter chord line by default) lies on the span axis.
pub fn shift_reference_line(sections: &mut [Section], chords: &[f64], fraction: f64) {
    for (section, c) in sections.iter_mut().zip(chords.iter()) {
        let dx = c * fraction;
        section.points.iter_mut().for_each(|p| p.x += dx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airfoil::loaded::MemoryRepository;
    use crate::algorithms::Spacing;
    use crate::wing::distribution::AirfoilRegion;
    use crate::WingError;
    use approx::assert_relative_eq;

    fn code(text: &str) -> AirfoilCode {
        text.parse().unwrap()
    }

    #[test]
    fn test_sections_are_scaled_and_mirrored() {
        let sampling = Sampling::new(11, Spacing::Uniform);
        let repository = MemoryRepository::default();
        let mut assembler = SectionAssembler::new(&sampling, &repository);
        let airfoils = AirfoilDistribution::uniform(code("NACA2412"));

        let sections = assembler
            .assemble(&[0.0, 5.0], &[2.0, 1.0], &airfoils)
            .unwrap();

        assert_eq!(2, sections.len());
        assert_eq!(22, sections[0].points.len());

        // Upper trailing edge is the first point, mirrored behind the leading edge
        assert_relative_eq!(-2.0, sections[0].points[0].x, epsilon = 1e-2);
        assert_relative_eq!(-1.0, sections[1].points[0].x, epsilon = 1e-2);

        for (a, b) in sections[0].points.iter().zip(sections[1].points.iter()) {
            assert_relative_eq!(a.x, 2.0 * b.x, epsilon = 1e-12);
            assert_relative_eq!(a.y, 2.0 * b.y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_region_selection() {
        let sampling = Sampling::new(11, Spacing::Uniform);
        let repository = MemoryRepository::default();
        let mut assembler = SectionAssembler::new(&sampling, &repository);
        let airfoils = AirfoilDistribution::new(vec![
            AirfoilRegion::new(code("NACA0012"), 0.0, 0.5),
            AirfoilRegion::new(code("NACA4412"), 0.5, 1.0),
        ])
        .unwrap();

        let sections = assembler
            .assemble(&[0.0, 10.0], &[1.0, 1.0], &airfoils)
            .unwrap();

        // Mid chord camber of the root section is zero, the tip section is cambered
        let mid = |s: &Section| s.points[5].y + s.points[16].y;
        assert_relative_eq!(0.0, mid(&sections[0]), epsilon = 1e-12);
        assert!(mid(&sections[1]) > 0.05);
    }

    #[test]
    fn test_station_in_gap_fails() {
        let sampling = Sampling::new(11, Spacing::Uniform);
        let repository = MemoryRepository::default();
        let mut assembler = SectionAssembler::new(&sampling, &repository);
        let airfoils = AirfoilDistribution::new(vec![
            AirfoilRegion::new(code("NACA0012"), 0.0, 0.5),
            AirfoilRegion::new(code("NACA4412"), 0.6, 1.0),
        ])
        .unwrap();

        let result = assembler.assemble(&[0.0, 5.5, 10.0], &[1.0, 1.0, 1.0], &airfoils);
        assert!(matches!(result, Err(WingError::SpanLookup { .. })));
    }

    #[test]
    fn test_shift_reference_line() {
        let mut sections = vec![
            Section::new(0.0, vec![Point2::new(0.0, 0.0), Point2::new(-2.0, 0.0)]),
            Section::new(1.0, vec![Point2::new(0.0, 0.0), Point2::new(-1.0, 0.0)]),
        ];
        shift_reference_line(&mut sections, &[2.0, 1.0], 0.25);

        assert_relative_eq!(0.5, sections[0].points[0].x);
        assert_relative_eq!(-1.5, sections[0].points[1].x);
        assert_relative_eq!(0.25, sections[1].points[0].x);
        assert_relative_eq!(-0.75, sections[1].points[1].x);
    }
}
