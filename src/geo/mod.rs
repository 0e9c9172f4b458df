//! Geographic data for the park scene.
//!
//! This module provides the lat/lon to scene projection and the loader for
//! the park outline.

mod contour;
mod projection;

pub use contour::{
    build_contour, parse_contour, Contour, ItemDiagnostic, ParseError, SchemaViolation,
};
pub use projection::{project, GeoPoint, MapProjection, WorldPoint};
