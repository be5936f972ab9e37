//! JSON description of a wing: span stations, the spanwise distributions, sampling settings and
//! the directory holding digitized airfoil coordinates.

use crate::airfoil::loaded::{CoordinateRepository, DirectoryRepository, MemoryRepository};
use crate::algorithms::Spacing;
use crate::wing::distribution::{AirfoilDistribution, Distribution};
use crate::wing::{span_stations, Wing, WingSettings};
use crate::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StationLayout {
    /// Explicit, strictly increasing span positions
    Explicit(Vec<f64>),

    /// `count` stations from the root to `half_span`
    Generated {
        half_span: f64,
        count: usize,
        #[serde(default)]
        spacing: Spacing,
    },
}

impl StationLayout {
    pub fn stations(&self) -> Result<Vec<f64>> {
        match self {
            StationLayout::Explicit(stations) => Ok(stations.clone()),
            StationLayout::Generated {
                half_span,
                count,
                spacing,
            } => span_stations(*half_span, *count, *spacing),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WingConfig {
    pub stations: StationLayout,
    pub chord: Distribution,
    #[serde(default)]
    pub twist: Option<Distribution>,
    #[serde(default)]
    pub sweep: Option<Distribution>,
    #[serde(default)]
    pub dihedral: Option<Distribution>,
    pub airfoil: AirfoilDistribution,
    #[serde(default)]
    pub settings: WingSettings,

    /// Directory of digitized airfoil coordinate files, relative paths are resolved against the
    /// directory of the configuration file
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

/// JSON pointers of the fields holding a spacing token
const SPACING_FIELDS: [&str; 2] = ["/stations/spacing", "/settings/airfoil/spacing"];

/// Spacing tokens are checked ahead of deserialization so that an unknown token is reported as
/// `UnsupportedSpacing` rather than a generic parse failure.
fn check_spacing_tokens(value: &serde_json::Value) -> Result<()> {
    for pointer in SPACING_FIELDS {
        if let Some(token) = value.pointer(pointer).and_then(|v| v.as_str()) {
            token.parse::<Spacing>()?;
        }
    }
    Ok(())
}

impl WingConfig {
    pub fn from_json(text: &str) -> Result<WingConfig> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        check_spacing_tokens(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_file(path: &Path) -> Result<WingConfig> {
        let mut config = Self::from_json(&fs::read_to_string(path)?)?;
        if let (Some(catalog), Some(parent)) = (&config.catalog, path.parent()) {
            if catalog.is_relative() {
                config.catalog = Some(parent.join(catalog));
            }
        }
        Ok(config)
    }

    pub fn build(&self) -> Result<Wing> {
        let mut wing = Wing::new(self.stations.stations()?)?;
        wing.set_settings(self.settings);
        wing.set_chord(self.chord.clone());
        wing.set_airfoil(self.airfoil.clone());

        if let Some(twist) = &self.twist {
            wing.set_twist(twist.clone());
        }
        if let Some(sweep) = &self.sweep {
            wing.set_sweep(sweep.clone());
        }
        if let Some(dihedral) = &self.dihedral {
            wing.set_dihedral(dihedral.clone());
        }

        Ok(wing)
    }

    /// The coordinate catalog named by the configuration, or an empty one when none is given
    pub fn repository(&self) -> Box<dyn CoordinateRepository> {
        match &self.catalog {
            Some(root) => Box::new(DirectoryRepository::new(root)),
            None => Box::new(MemoryRepository::default()),
        }
    }
}
