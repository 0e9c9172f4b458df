#![warn(clippy::all)]

//! Park Timeline - a 3D view of theme park buildings over the years.
//!
//! The crate loads the park outline from an OpenStreetMap-style export,
//! projects it and the building table into scene space, and feeds the
//! result to a renderer for whatever year the timeline shows.

pub mod buildings;
pub mod config;
pub mod geo;
pub mod scene;
pub mod state;

pub use buildings::Building;
pub use config::{AppConfig, MapBounds};
pub use geo::{build_contour, project, Contour, GeoPoint, ParseError, WorldPoint};
pub use scene::{Scene, SceneRenderer};
pub use state::{AppState, YearTimeline};
