use thiserror::Error;

use crate::core::CoordinateSpace;

/// Result type for georeferencing operations
pub type Result<T> = std::result::Result<T, GeoreferenceError>;

/// Failures raised while building or applying a georeference.
///
/// All variants are deterministic validation failures; none of them is
/// transient, so callers should never retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoreferenceError {
    /// The two anchors collapse onto one position, leaving no baseline
    #[error("Degenerate calibration: reference points coincide in {space} space")]
    DegenerateCalibration { space: CoordinateSpace },

    /// Latitude outside the open interval (-90, 90) or not finite
    #[error("Invalid latitude {latitude}: spherical Mercator is undefined at or beyond ±90°")]
    InvalidLatitude { latitude: f64 },

    #[error("Invalid longitude {longitude}: must be between -180 and 180 degrees")]
    InvalidLongitude { longitude: f64 },

    #[error("Invalid bounding box ({x0}, {y0}, {x1}, {y1}): width and height must be positive")]
    InvalidBoundingBox { x0: f64, y0: f64, x1: f64, y1: f64 },

    #[error("Invalid pixel coordinate ({x}, {y})")]
    InvalidPixel { x: f64, y: f64 },

    #[error("Invalid tile size {tile_size}: must be a positive number")]
    InvalidTileSize { tile_size: f64 },

    #[error("No coordinates given")]
    EmptyInput,

    #[error("Geometry type {kind} is not supported")]
    UnsupportedGeometry { kind: String },

    #[error("Malformed feature: {reason}")]
    MalformedFeature { reason: String },

    #[error("Malformed calibration record: {reason}")]
    MalformedRecord { reason: String },
}

impl GeoreferenceError {
    /// Whether the error stems from the calibration itself rather than a query
    pub fn is_calibration_error(&self) -> bool {
        matches!(
            self,
            GeoreferenceError::DegenerateCalibration { .. }
                | GeoreferenceError::InvalidBoundingBox { .. }
                | GeoreferenceError::MalformedRecord { .. }
        )
    }
}

/// Result type for reading and writing calibration records
pub type RecordResult<T> = std::result::Result<T, RecordError>;

/// Failures raised while loading or storing a calibration record file.
///
/// File access is kept apart from [`GeoreferenceError`] so that a missing or
/// unreadable file is never mistaken for a bad calibration.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Failed to access calibration record '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Invalid(#[from] GeoreferenceError),
}

impl RecordError {
    pub fn is_calibration_error(&self) -> bool {
        match self {
            RecordError::Io { .. } => false,
            RecordError::Invalid(err) => err.is_calibration_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GeoreferenceError::DegenerateCalibration { space: CoordinateSpace::Pixel };
        assert_eq!(
            err.to_string(),
            "Degenerate calibration: reference points coincide in pixel space"
        );

        let err = GeoreferenceError::UnsupportedGeometry { kind: "LineString".to_string() };
        assert_eq!(err.to_string(), "Geometry type LineString is not supported");
    }

    #[test]
    fn test_calibration_error_classification() {
        assert!(GeoreferenceError::DegenerateCalibration { space: CoordinateSpace::Projected }
            .is_calibration_error());
        assert!(!GeoreferenceError::InvalidLatitude { latitude: 90.0 }.is_calibration_error());
        assert!(!GeoreferenceError::EmptyInput.is_calibration_error());
    }

    #[test]
    fn test_record_error_classification() {
        let err = RecordError::Io {
            path: "floor.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(!err.is_calibration_error());
        assert!(std::error::Error::source(&err).is_some());

        let err = RecordError::from(GeoreferenceError::MalformedRecord { reason: "empty".to_string() });
        assert!(err.is_calibration_error());
        assert_eq!(err.to_string(), "Malformed calibration record: empty");
    }
}
