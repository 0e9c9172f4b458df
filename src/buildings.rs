//! Park buildings and their lifetimes.
//!
//! Buildings are static data: a built-in table or a JSON file read once at
//! startup. Each one rises out of the ground in the year before it opens and
//! lifts away in the year after it closes.

use crate::config::GLOBAL_SCALE;
use crate::geo::GeoPoint;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// RGBA color.
pub type Rgba = [u8; 4];

pub const RED: Rgba = [0xff, 0x00, 0x00, 0xff];
pub const GREEN: Rgba = [0x00, 0xff, 0x00, 0xff];
pub const BLUE: Rgba = [0x00, 0x00, 0xff, 0xff];

/// A building drawn as a cuboid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub name: String,

    /// First year the building stands
    pub year_from: i32,

    /// Year the building is gone; `None` (or `-1` in JSON) while still standing
    #[serde(default, deserialize_with = "open_ended_year")]
    pub year_to: Option<i32>,

    /// Anchor of the footprint centre, in degrees
    #[serde(with = "latlon")]
    pub latlon: GeoPoint,

    /// Footprint as [width, depth] in meters
    pub size: [f64; 2],

    /// Height in meters
    pub height: f64,

    pub color: Rgba,
}

impl Building {
    /// Vertical offset in meters at `current_year`, or `None` when the
    /// building is not on screen.
    ///
    /// The building climbs from one scene unit below ground during the year
    /// before `year_from`, and rises ten scene units during the year after
    /// `year_to`.
    pub fn vertical_offset(&self, current_year: f64) -> Option<f64> {
        let from = self.year_from as f64;

        let closed = matches!(self.year_to, Some(to) if current_year >= to as f64);
        if current_year >= from && !closed {
            return Some(0.0);
        }

        if current_year > from - 1.0 && current_year < from {
            return Some(map_range(current_year, from, from - 1.0, 0.0, -1.0 / GLOBAL_SCALE));
        }

        // Only positive closing years get the lift phase
        if let Some(to) = self.year_to.filter(|to| *to > 0) {
            let to = to as f64;
            if current_year >= to && current_year < to + 1.0 {
                return Some(map_range(current_year, to, to + 1.0, 0.0, 10.0 / GLOBAL_SCALE));
            }
        }

        None
    }

    /// Height of the cuboid centre above ground, in meters.
    pub fn center_height(&self, offset: f64) -> f64 {
        0.5 * self.height + offset
    }
}

/// The park's landmark buildings.
pub fn default_buildings() -> Vec<Building> {
    vec![
        Building {
            name: "Castle".to_string(),
            year_from: 1992,
            year_to: None,
            latlon: GeoPoint::new(48.873183, 2.776001),
            size: [35.0, 25.0],
            height: 60.0,
            color: RED,
        },
        Building {
            name: "Hotel".to_string(),
            year_from: 1992,
            year_to: None,
            latlon: GeoPoint::new(48.87031, 2.779653),
            size: [270.0, 100.0],
            height: 30.0,
            color: BLUE,
        },
        Building {
            name: "Space Mountain".to_string(),
            year_from: 1995,
            year_to: Some(1998),
            latlon: GeoPoint::new(48.874022, 2.779266),
            size: [75.0, 75.0],
            height: 32.0,
            color: GREEN,
        },
    ]
}

/// Errors that can occur while loading a building table.
#[derive(Debug)]
pub enum BuildingsError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl std::fmt::Display for BuildingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildingsError::Read { path, source } => {
                write!(f, "Could not read buildings {}: {}", path.display(), source)
            }
            BuildingsError::Parse { path, source } => {
                write!(f, "Invalid buildings {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for BuildingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildingsError::Read { source, .. } => Some(source),
            BuildingsError::Parse { source, .. } => Some(source),
        }
    }
}

/// Loads a JSON array of buildings.
pub fn load_buildings(path: &Path) -> Result<Vec<Building>, BuildingsError> {
    let text = std::fs::read_to_string(path).map_err(|source| BuildingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let buildings: Vec<Building> =
        serde_json::from_str(&text).map_err(|source| BuildingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    log::info!("Loaded {} buildings from {}", buildings.len(), path.display());
    Ok(buildings)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + (b - a) * t
}

fn map_range(value: f64, from_min: f64, from_max: f64, to_min: f64, to_max: f64) -> f64 {
    lerp((value - from_min) / (from_max - from_min), to_min, to_max)
}

fn open_ended_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let year = Option::<i32>::deserialize(deserializer)?;
    Ok(year.filter(|y| *y != -1))
}

/// `[lat, lon]` pairs in JSON.
mod latlon {
    use crate::geo::GeoPoint;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(p: &GeoPoint, s: S) -> Result<S::Ok, S::Error> {
        [p.lat, p.lon].serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<GeoPoint, D::Error> {
        let [lat, lon] = <[f64; 2]>::deserialize(d)?;
        Ok(GeoPoint::new(lat, lon))
    }
}
