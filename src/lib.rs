//! Venue floor-plan georeferencing
//!
//! Anchors uploaded floor-plan images to the map with two calibration
//! points, and converts coordinates between image pixels and geographic
//! positions through a spherical Mercator projection.

pub mod core;
pub mod algorithms;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{GeoPoint, PixelPoint, PixelRect, ProjectedPoint, ReferencePoint, CoordinateSpace, DEFAULT_TILE_SIZE};
pub use crate::algorithms::{
    bounding_box_footprint, footprint_corners, geographic_envelope, mercator_forward, mercator_inverse,
    Georeference, MercatorProjector,
};
pub use crate::validation::{GeoreferenceError, RecordError, RecordResult, Result};
pub use crate::utils::{AppConfig, ConfigError};
pub use crate::api::{CalibrationRecord, RecordPoint};
