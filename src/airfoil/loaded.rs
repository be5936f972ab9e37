use crate::airfoil::{AirfoilGeometry, Sampling};
use crate::{Result, WingError};
use ncollide2d::na::Point2;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A source of digitized airfoil coordinates, looked up by airfoil name. Coordinates are returned
/// in horseshoe order, from the upper trailing edge around the leading edge to the lower trailing
/// edge.
pub trait CoordinateRepository {
    fn coordinates(&self, name: &str) -> Result<Vec<Point2<f64>>>;
}

/// Parse a two column coordinate table. The first line is a descriptive header and is skipped;
/// columns may be separated by whitespace or commas and blank lines are ignored.
pub fn parse_coordinates(text: &str) -> Result<Vec<Point2<f64>>> {
    let mut points = Vec::new();
    for (i, line) in text.lines().enumerate().skip(1) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let parse_error = || WingError::Parse {
            line: i + 1,
            text: trimmed.to_string(),
        };

        let values = trimmed
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f64>().map_err(|_| parse_error()))
            .collect::<Result<Vec<f64>>>()?;

        match values.as_slice() {
            [x, z, ..] => points.push(Point2::new(*x, *z)),
            _ => return Err(parse_error()),
        }
    }

    Ok(points)
}

/// Coordinate files stored in a single directory as `<name>.dat` (or `<name>.txt`).
pub struct DirectoryRepository {
    root: PathBuf,
}

impl DirectoryRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryRepository { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        let lower = name.to_lowercase();
        [name, lower.as_str()]
            .iter()
            .flat_map(|stem| ["dat", "txt"].map(|ext| self.root.join(format!("{}.{}", stem, ext))))
            .find(|path| path.is_file())
    }
}

impl CoordinateRepository for DirectoryRepository {
    fn coordinates(&self, name: &str) -> Result<Vec<Point2<f64>>> {
        let path = self
            .locate(name)
            .ok_or_else(|| WingError::AirfoilNotFound(name.to_string()))?;

        log::debug!("Loading airfoil '{}' from {}", name, path.display());
        parse_coordinates(&fs::read_to_string(path)?)
    }
}

/// Coordinate sets held in memory, keyed by lowercase name.
#[derive(Default)]
pub struct MemoryRepository {
    entries: HashMap<String, Vec<Point2<f64>>>,
}

impl MemoryRepository {
    pub fn insert(&mut self, name: &str, points: Vec<Point2<f64>>) {
        self.entries.insert(name.to_lowercase(), points);
    }

    pub fn with(mut self, name: &str, points: Vec<Point2<f64>>) -> Self {
        self.insert(name, points);
        self
    }
}

impl CoordinateRepository for MemoryRepository {
    fn coordinates(&self, name: &str) -> Result<Vec<Point2<f64>>> {
        self.entries
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| WingError::AirfoilNotFound(name.to_string()))
    }
}

/// An airfoil defined by digitized unit chord coordinates. Sections are produced by fitting each
/// surface with a spline and resampling it on the requested chordwise grid.
pub struct LoadedAirfoil {
    name: String,
    source: AirfoilGeometry,
}

impl LoadedAirfoil {
    pub fn load(repository: &dyn CoordinateRepository, name: &str) -> Result<LoadedAirfoil> {
        Self::from_points(name, repository.coordinates(name)?)
    }

    pub fn from_points(name: &str, points: Vec<Point2<f64>>) -> Result<LoadedAirfoil> {
        Ok(LoadedAirfoil {
            name: name.to_string(),
            source: AirfoilGeometry::from_points(points)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &AirfoilGeometry {
        &self.source
    }

    pub fn generate(&self, chord: f64, sampling: &Sampling) -> Result<AirfoilGeometry> {
        sampling.validate()?;
        let grid = sampling.unit_grid()?;
        Ok(self.source.resample(&grid, &sampling.spline)?.scaled(chord))
    }
}
