//! Application state.
//!
//! Holds the loaded scene data and the timeline driving it.

mod timeline;

pub use timeline::YearTimeline;

use crate::buildings::{default_buildings, load_buildings, Building};
use crate::config::AppConfig;
use crate::geo::{build_contour, Contour, MapProjection};

/// Root application state containing all sub-states.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Park outline
    pub contour: Contour,

    /// Buildings shown over the years
    pub buildings: Vec<Building>,

    /// Projection onto the configured map box
    pub projection: MapProjection,

    /// Year stepping state
    pub timeline: YearTimeline,
}

impl AppState {
    /// Loads everything the scene needs. Any failure here means the
    /// application cannot start.
    pub fn load(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let contour = build_contour(&config.contour_path)?;
        if !contour.diagnostics.is_empty() {
            log::warn!(
                "Skipped {} malformed or unresolved items in {}",
                contour.diagnostics.len(),
                config.contour_path.display()
            );
        }
        log::info!(
            "Loaded contour with {} points from {}",
            contour.len(),
            config.contour_path.display()
        );

        let buildings = match &config.buildings_path {
            Some(path) => load_buildings(path)?,
            None => default_buildings(),
        };

        Ok(Self {
            contour,
            buildings,
            projection: MapProjection::new(config.bounds),
            timeline: YearTimeline::new(
                config.first_year,
                config.last_year,
                config.years_per_second,
            ),
        })
    }
}
