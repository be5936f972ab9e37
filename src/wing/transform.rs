use crate::wing::store::{GeometryStore, Section};
use crate::Result;
use itertools::Itertools;
use ncollide2d::na::Rotation2;

/// The shaping stages, in the order they are applied. Sections are rotated about their own
/// reference point before the cumulative sweep and dihedral offsets move them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transformation {
    Twist,
    Sweep,
    Dihedral,
}

pub const TRANSFORMATION_ORDER: [Transformation; 3] = [
    Transformation::Twist,
    Transformation::Sweep,
    Transformation::Dihedral,
];

/// Rotate each section in its own plane by the station's twist angle in radians.
pub fn apply_twist(sections: &mut [Section], twist: &[f64]) {
    for (section, theta) in sections.iter_mut().zip(twist.iter()) {
        let rotation = Rotation2::new(*theta);
        section.points.iter_mut().for_each(|p| *p = rotation * *p);
    }
}

/// Running offsets produced by a per-segment angle: the offset at station `k` is the sum of
/// `dy * tan(angle)` over all segments between the root and `k`, where each segment uses the
/// angle of its inboard station. The per-segment deltas are independent; only the prefix sum is
/// sequential.
pub fn cumulative_offsets(stations: &[f64], angles: &[f64]) -> Vec<f64> {
    let deltas = stations
        .iter()
        .tuple_windows()
        .zip(angles.iter())
        .map(|((y0, y1), a)| (y1 - y0) * a.tan());

    std::iter::once(0.0)
        .chain(deltas.scan(0.0, |offset, d| {
            *offset += d;
            Some(*offset)
        }))
        .collect()
}

/// Move each section aft by the accumulated sweep offset.
pub fn apply_sweep(sections: &mut [Section], sweep: &[f64]) {
    let stations: Vec<f64> = sections.iter().map(|s| s.y).collect();
    let offsets = cumulative_offsets(&stations, sweep);
    for (section, dx) in sections.iter_mut().zip(offsets.iter()) {
        section.points.iter_mut().for_each(|p| p.x -= dx);
    }
}

/// Raise each section by the accumulated dihedral offset.
pub fn apply_dihedral(sections: &mut [Section], dihedral: &[f64]) {
    let stations: Vec<f64> = sections.iter().map(|s| s.y).collect();
    let offsets = cumulative_offsets(&stations, dihedral);
    for (section, dz) in sections.iter_mut().zip(offsets.iter()) {
        section.points.iter_mut().for_each(|p| p.y += dz);
    }
}

/// Resolved angle distributions for one construction pass. Stages without a distribution are
/// skipped.
#[derive(Debug, Clone, Default)]
pub struct GeometryTransformer {
    pub twist: Option<Vec<f64>>,
    pub sweep: Option<Vec<f64>>,
    pub dihedral: Option<Vec<f64>>,
}

impl GeometryTransformer {
    pub fn new(
        twist: Option<Vec<f64>>,
        sweep: Option<Vec<f64>>,
        dihedral: Option<Vec<f64>>,
    ) -> Self {
        GeometryTransformer {
            twist,
            sweep,
            dihedral,
        }
    }

    /// Apply every configured stage once, in the fixed order.
    pub fn apply(&self, store: &mut GeometryStore) -> Result<()> {
        for stage in TRANSFORMATION_ORDER {
            let values = match stage {
                Transformation::Twist => &self.twist,
                Transformation::Sweep => &self.sweep,
                Transformation::Dihedral => &self.dihedral,
            };

            if let Some(values) = values {
                log::debug!("Applying {:?} to {} sections", stage, store.station_count());
                store.update_sections(|sections| {
                    match stage {
                        Transformation::Twist => apply_twist(sections, values),
                        Transformation::Sweep => apply_sweep(sections, values),
                        Transformation::Dihedral => apply_dihedral(sections, values),
                    }
                    Ok(())
                })?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ncollide2d::na::Point2;
    use rand::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    fn flat_sections(stations: &[f64]) -> Vec<Section> {
        stations
            .iter()
            .map(|y| Section::new(*y, vec![Point2::new(0.0, 0.0), Point2::new(-1.0, 0.0)]))
            .collect()
    }

    #[test]
    fn test_twist_is_local_rotation() {
        let mut sections = flat_sections(&[0.0, 1.0]);
        apply_twist(&mut sections, &[0.0, FRAC_PI_2]);

        assert_relative_eq!(-1.0, sections[0].points[1].x, epsilon = 1e-12);
        assert_relative_eq!(0.0, sections[0].points[1].y, epsilon = 1e-12);

        // [[cos, -sin], [sin, cos]] takes (-1, 0) to (0, -1) at 90 degrees
        assert_relative_eq!(0.0, sections[1].points[1].x, epsilon = 1e-12);
        assert_relative_eq!(-1.0, sections[1].points[1].y, epsilon = 1e-12);
        assert_relative_eq!(0.0, sections[1].points[0].x, epsilon = 1e-12);
    }

    #[test]
    fn test_sweep_closed_form() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let dy: f64 = rng.gen_range(0.1..5.0);
            let theta: f64 = rng.gen_range(-0.6..0.6);
            let count: usize = rng.gen_range(2..30);
            let stations: Vec<f64> = (0..count).map(|k| k as f64 * dy).collect();

            let mut sections = flat_sections(&stations);
            apply_sweep(&mut sections, &vec![theta; count]);

            for (k, s) in sections.iter().enumerate() {
                let expected = k as f64 * dy * theta.tan();
                assert_relative_eq!(-expected, s.points[0].x, epsilon = 1e-9);
                assert_relative_eq!(-1.0 - expected, s.points[1].x, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_dihedral_offsets() {
        let mut sections = flat_sections(&[0.0, 5.0, 10.0]);
        apply_dihedral(&mut sections, &[0.1, 0.1, 0.1]);

        assert_eq!(0.0, sections[0].points[0].y);
        assert_relative_eq!(5.0 * 0.1f64.tan(), sections[1].points[0].y, epsilon = 1e-12);
        assert_relative_eq!(10.0 * 0.1f64.tan(), sections[2].points[0].y, epsilon = 1e-12);
    }

    #[test]
    fn test_segment_uses_inboard_angle() {
        let offsets = cumulative_offsets(&[0.0, 1.0, 3.0], &[0.2, 0.4, 0.9]);
        assert_eq!(3, offsets.len());
        assert_relative_eq!(0.2f64.tan(), offsets[1], epsilon = 1e-12);
        assert_relative_eq!(0.2f64.tan() + 2.0 * 0.4f64.tan(), offsets[2], epsilon = 1e-12);
    }

    #[test]
    fn test_transformer_order() {
        // Twisting after the dihedral shift would rotate the raised section about the root
        let mut store = GeometryStore::from_sections(flat_sections(&[0.0, 1.0])).unwrap();
        let transformer =
            GeometryTransformer::new(Some(vec![FRAC_PI_2, FRAC_PI_2]), None, Some(vec![0.5, 0.5]));
        transformer.apply(&mut store).unwrap();

        let tip = &store.sections()[1];
        assert_relative_eq!(0.0, tip.points[0].x, epsilon = 1e-12);
        assert_relative_eq!(0.5f64.tan(), tip.points[0].y, epsilon = 1e-12);
        assert_relative_eq!(0.5f64.tan() - 1.0, tip.points[1].y, epsilon = 1e-12);
        assert_relative_eq!(0.5f64.tan(), store.array()[(2, 2)], epsilon = 1e-12);
    }
}
