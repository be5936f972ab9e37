use crate::{Result, WingError};
use itertools::Itertools;
use ncollide2d::na::{Matrix3xX, Point2};

/// The (x, z) points of one section at span position `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub y: f64,
    pub points: Vec<Point2<f64>>,
}

impl Section {
    pub fn new(y: f64, points: Vec<Point2<f64>>) -> Self {
        Section { y, points }
    }
}

/// Holds a wing surface both as a sequence of sections ordered by span station and as a 3xN
/// array with rows x, y, z, where the points of each station occupy one contiguous block of
/// columns. Setting either representation rebuilds the other, so both are always consistent.
#[derive(Debug, Clone)]
pub struct GeometryStore {
    sections: Vec<Section>,
    array: Matrix3xX<f64>,
}

impl Default for GeometryStore {
    fn default() -> Self {
        GeometryStore {
            sections: Vec::new(),
            array: Matrix3xX::zeros(0),
        }
    }
}

impl GeometryStore {
    pub fn from_sections(sections: Vec<Section>) -> Result<Self> {
        let mut store = GeometryStore::default();
        store.set_from_sections(sections)?;
        Ok(store)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn array(&self) -> &Matrix3xX<f64> {
        &self.array
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn station_count(&self) -> usize {
        self.sections.len()
    }

    pub fn points_per_section(&self) -> usize {
        self.sections.first().map_or(0, |s| s.points.len())
    }

    pub fn set_from_sections(&mut self, sections: Vec<Section>) -> Result<()> {
        self.array = sections_to_array(&sections)?;
        self.sections = sections;
        Ok(())
    }

    pub fn set_from_array(&mut self, array: Matrix3xX<f64>) -> Result<()> {
        self.sections = array_to_sections(&array)?;
        self.array = array;
        Ok(())
    }

    /// Apply a whole-geometry pass to the sections and rebuild the array view afterwards.
    pub fn update_sections<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut [Section]) -> Result<()>,
    {
        let mut sections = std::mem::take(&mut self.sections);
        let result = f(&mut sections);
        self.set_from_sections(sections)?;
        result
    }
}

fn sections_to_array(sections: &[Section]) -> Result<Matrix3xX<f64>> {
    if let Some((a, b)) = sections.iter().tuple_windows().find(|(a, b)| b.y <= a.y) {
        return Err(WingError::InvalidStations(format!(
            "section at y = {} follows y = {}",
            b.y, a.y
        )));
    }

    let block = sections.first().map_or(0, |s| s.points.len());
    if let Some(s) = sections.iter().find(|s| s.points.len() != block) {
        return Err(WingError::NonUniformBlocks(format!(
            "section at y = {} has {} points, expected {}",
            s.y,
            s.points.len(),
            block
        )));
    }

    let mut array = Matrix3xX::zeros(block * sections.len());
    for (i, section) in sections.iter().enumerate() {
        for (j, p) in section.points.iter().enumerate() {
            let k = i * block + j;
            array[(0, k)] = p.x;
            array[(1, k)] = section.y;
            array[(2, k)] = p.y;
        }
    }

    Ok(array)
}

fn array_to_sections(array: &Matrix3xX<f64>) -> Result<Vec<Section>> {
    let n = array.ncols();
    if n == 0 {
        return Ok(Vec::new());
    }

    // The block size is the run length of the first station's y value
    let y0 = array[(1, 0)];
    let block = (1..n).find(|k| array[(1, *k)] != y0).unwrap_or(n);
    if n % block != 0 {
        return Err(WingError::NonUniformBlocks(format!(
            "{} points cannot be split into blocks of {}",
            n, block
        )));
    }

    let mut sections: Vec<Section> = Vec::with_capacity(n / block);
    for start in (0..n).step_by(block) {
        let y = array[(1, start)];
        if let Some(k) = (start..start + block).find(|k| array[(1, *k)] != y) {
            return Err(WingError::NonUniformBlocks(format!(
                "point {} has y = {} inside the block for y = {}",
                k,
                array[(1, k)],
                y
            )));
        }
        if let Some(previous) = sections.last() {
            if y <= previous.y {
                return Err(WingError::NonUniformBlocks(format!(
                    "block for y = {} follows y = {}",
                    y, previous.y
                )));
            }
        }

        let points = (start..start + block)
            .map(|k| Point2::new(array[(0, k)], array[(2, k)]))
            .collect();
        sections.push(Section::new(y, points));
    }

    Ok(sections)
}
