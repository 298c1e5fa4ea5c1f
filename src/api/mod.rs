//! Data exchange with the surrounding application
//!
//! Calibration records as stored on floor documents, and GeoJSON features
//! converted between pixel and geographic space.

pub mod geojson;
pub mod record;

pub use geojson::{
    corner_markers, project_feature, project_feature_collection, unproject_feature,
    unproject_feature_collection,
};
pub use record::{CalibrationRecord, RecordPoint};
