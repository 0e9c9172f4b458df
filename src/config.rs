//! Application configuration.
//!
//! Settings are read from an optional JSON file. Every field has a default,
//! so a partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Scale applied to every scene length (1/100) to stay inside the
/// renderer's usable frustum range.
pub const GLOBAL_SCALE: f64 = 0.01;

/// Meters per degree of latitude.
pub const METERS_PER_DEG_LAT: f64 = 111_319.9;

/// Meters per degree of longitude at the reference box latitude (~48.87°N).
pub const METERS_PER_DEG_LON: f64 = 73_324.94;

/// Geographic bounding box the scene is centred on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    /// Meters per degree of latitude
    pub meters_per_deg_lat: f64,
    /// Meters per degree of longitude at this box's latitude
    pub meters_per_deg_lon: f64,
    /// Scene units per meter
    pub global_scale: f64,
}

impl Default for MapBounds {
    fn default() -> Self {
        Self {
            lat_min: 48.868276,
            lat_max: 48.876301,
            lon_min: 2.768697,
            lon_max: 2.784665,
            meters_per_deg_lat: METERS_PER_DEG_LAT,
            meters_per_deg_lon: METERS_PER_DEG_LON,
            global_scale: GLOBAL_SCALE,
        }
    }
}

impl MapBounds {
    pub fn lat_mid(&self) -> f64 {
        (self.lat_min + self.lat_max) * 0.5
    }

    pub fn lon_mid(&self) -> f64 {
        (self.lon_min + self.lon_max) * 0.5
    }

    /// Latitude span in degrees.
    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Longitude span in degrees.
    pub fn lon_span(&self) -> f64 {
        self.lon_max - self.lon_min
    }
}

/// Errors that can occur while loading the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file is not a valid configuration document.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// A setting holds a value outside its allowed range.
    Invalid {
        path: PathBuf,
        field: &'static str,
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Could not read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Invalid config {}: {}", path.display(), source)
            }
            ConfigError::Invalid { path, field, reason } => {
                write!(f, "Invalid config {}: {} {}", path.display(), field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Invalid { .. } => None,
        }
    }
}

/// Top-level application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// OSM-style export holding the park outline
    pub contour_path: PathBuf,

    /// JSON building table; the built-in table is used when absent
    pub buildings_path: Option<PathBuf>,

    /// Reference bounding box for the projection
    pub bounds: MapBounds,

    /// Earliest year the timeline can step back to
    pub first_year: i32,

    /// Latest year the timeline can step forward to
    pub last_year: i32,

    /// Animation speed when moving between years
    pub years_per_second: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            contour_path: PathBuf::from("assets/buildings/contour.json"),
            buildings_path: None,
            bounds: MapBounds::default(),
            first_year: 1992,
            last_year: 2025,
            years_per_second: 1.0,
        }
    }
}

impl AppConfig {
    /// Loads settings from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate(path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: String| ConfigError::Invalid {
            path: path.to_path_buf(),
            field,
            reason,
        };

        if !(self.years_per_second > 0.0 && self.years_per_second.is_finite()) {
            return Err(invalid(
                "years_per_second",
                format!("must be positive, got {}", self.years_per_second),
            ));
        }
        if self.first_year > self.last_year {
            return Err(invalid(
                "first_year",
                format!("{} is after last_year {}", self.first_year, self.last_year),
            ));
        }
        Ok(())
    }
}
