use crate::airfoil::AirfoilCode;
use crate::algorithms::interpolate_linear;
use crate::{Result, WingError};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

pub type SpanFunction = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// A scalar quantity defined along the span. Every form resolves to one value per span station.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    /// The same value at every station
    Constant(f64),

    /// `(position, value)` pairs with strictly increasing positions, linearly interpolated
    Samples(Vec<(f64, f64)>),

    /// A continuous function of the span position
    #[serde(skip)]
    Function(SpanFunction),

    /// Column form of `Samples`
    Table { positions: Vec<f64>, values: Vec<f64> },
}

impl Debug for Distribution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Distribution::Constant(v) => write!(f, "Constant({})", v),
            Distribution::Samples(s) => write!(f, "Samples({:?})", s),
            Distribution::Function(_) => write!(f, "Function(..)"),
            Distribution::Table { positions, values } => {
                write!(f, "Table {{ positions: {:?}, values: {:?} }}", positions, values)
            }
        }
    }
}

impl Distribution {
    pub fn constant(value: f64) -> Self {
        Distribution::Constant(value)
    }

    pub fn samples(pairs: Vec<(f64, f64)>) -> Self {
        Distribution::Samples(pairs)
    }

    pub fn function(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Distribution::Function(Arc::new(f))
    }

    pub fn table(positions: Vec<f64>, values: Vec<f64>) -> Self {
        Distribution::Table { positions, values }
    }

    /// Evaluate the distribution at each station. `name` identifies the distribution in errors.
    pub fn resolve(&self, name: &str, stations: &[f64]) -> Result<Vec<f64>> {
        let invalid = |reason: String| WingError::InvalidDistribution {
            name: name.to_string(),
            reason,
        };

        let values: Vec<f64> = match self {
            Distribution::Constant(v) => vec![*v; stations.len()],
            Distribution::Function(f) => stations.iter().map(|y| f(*y)).collect(),
            Distribution::Samples(pairs) => {
                let (positions, values): (Vec<f64>, Vec<f64>) = pairs.iter().cloned().unzip();
                interpolate_table(&positions, &values, stations).map_err(|e| match e {
                    WingError::InvalidDistribution { reason, .. } => invalid(reason),
                    other => other,
                })?
            }
            Distribution::Table { positions, values } => {
                if positions.len() != values.len() {
                    return Err(invalid(format!(
                        "{} positions but {} values",
                        positions.len(),
                        values.len()
                    )));
                }
                interpolate_table(positions, values, stations).map_err(|e| match e {
                    WingError::InvalidDistribution { reason, .. } => invalid(reason),
                    other => other,
                })?
            }
        };

        if let Some((y, v)) = stations.iter().zip(values.iter()).find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("non-finite value {} at y = {}", v, y)));
        }

        Ok(values)
    }
}

fn interpolate_table(positions: &[f64], values: &[f64], stations: &[f64]) -> Result<Vec<f64>> {
    let invalid = |reason: &str| WingError::InvalidDistribution {
        name: String::new(),
        reason: reason.to_string(),
    };

    if positions.is_empty() {
        return Err(invalid("no sample points"));
    }
    if positions.windows(2).any(|w| w[1] <= w[0]) {
        return Err(invalid("sample positions must be strictly increasing"));
    }

    stations
        .iter()
        .map(|y| interpolate_linear(positions, values, *y))
        .collect()
}

/// One airfoil applied over the half-open span fraction interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirfoilRegion {
    pub airfoil: AirfoilCode,
    pub start: f64,
    pub end: f64,
}

impl AirfoilRegion {
    pub fn new(airfoil: AirfoilCode, start: f64, end: f64) -> Self {
        AirfoilRegion {
            airfoil,
            start,
            end,
        }
    }

    fn contains(&self, fraction: f64) -> bool {
        (self.start <= fraction && fraction < self.end) || (self.end == 1.0 && fraction == 1.0)
    }
}

/// Serialized form of an airfoil distribution: one airfoil code, or a list of regions
#[derive(Deserialize)]
#[serde(untagged)]
pub enum AirfoilLayout {
    Single(AirfoilCode),
    Regions(Vec<AirfoilRegion>),
}

/// Assigns airfoils to span fractions `y / halfspan`. Regions may not overlap; a fraction that
/// falls in a gap between regions is reported when it is looked up.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "AirfoilLayout")]
pub struct AirfoilDistribution {
    regions: Vec<AirfoilRegion>,
}

impl TryFrom<AirfoilLayout> for AirfoilDistribution {
    type Error = WingError;

    fn try_from(value: AirfoilLayout) -> Result<Self> {
        match value {
            AirfoilLayout::Single(code) => Ok(Self::uniform(code)),
            AirfoilLayout::Regions(regions) => Self::new(regions),
        }
    }
}

impl AirfoilDistribution {
    pub fn new(mut regions: Vec<AirfoilRegion>) -> Result<Self> {
        let invalid = |reason: String| WingError::InvalidDistribution {
            name: "airfoil".to_string(),
            reason,
        };

        if regions.is_empty() {
            return Err(invalid("at least one airfoil region is required".to_string()));
        }

        for r in regions.iter() {
            if !(0.0..=1.0).contains(&r.start) || !(0.0..=1.0).contains(&r.end) || r.start >= r.end
            {
                return Err(invalid(format!(
                    "region [{}, {}) for {} is not an interval within [0, 1]",
                    r.start, r.end, r.airfoil
                )));
            }
        }

        regions.sort_by(|a, b| a.start.total_cmp(&b.start));
        if let Some(w) = regions.windows(2).find(|w| w[1].start < w[0].end) {
            return Err(invalid(format!(
                "regions for {} and {} overlap",
                w[0].airfoil, w[1].airfoil
            )));
        }

        Ok(AirfoilDistribution { regions })
    }

    /// A single airfoil over the entire span
    pub fn uniform(airfoil: AirfoilCode) -> Self {
        AirfoilDistribution {
            regions: vec![AirfoilRegion::new(airfoil, 0.0, 1.0)],
        }
    }

    pub fn regions(&self) -> &[AirfoilRegion] {
        &self.regions
    }

    pub fn lookup(&self, fraction: f64) -> Result<&AirfoilCode> {
        self.regions
            .iter()
            .find(|r| r.contains(fraction))
            .map(|r| &r.airfoil)
            .ok_or(WingError::SpanLookup { fraction })
    }
}
