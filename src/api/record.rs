//! Persisted calibration record
//!
//! Floor documents store their calibration as
//! `{"points": [{"x", "y", "latitude", "longitude"}, ...], "bbox": [x0, y0, x1, y1]}`.
//! The record is a loose container; [`CalibrationRecord::to_georeference`]
//! enforces the shape and every georeference invariant.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algorithms::{Georeference, MercatorProjector};
use crate::core::{GeoPoint, PixelPoint, PixelRect, ReferencePoint};
use crate::validation::{GeoreferenceError, RecordError, RecordResult, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPoint {
    pub x: f64,
    pub y: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&ReferencePoint> for RecordPoint {
    fn from(point: &ReferencePoint) -> Self {
        Self {
            x: point.pixel.x,
            y: point.pixel.y,
            latitude: point.geo.lat,
            longitude: point.geo.lon,
        }
    }
}

impl From<&RecordPoint> for ReferencePoint {
    fn from(point: &RecordPoint) -> Self {
        ReferencePoint::new(
            PixelPoint::new(point.x, point.y),
            GeoPoint::new(point.longitude, point.latitude),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    pub points: Vec<RecordPoint>,
    pub bbox: Vec<f64>,
}

impl CalibrationRecord {
    /// Validate the record and build its georeference
    pub fn to_georeference(&self, projector: MercatorProjector) -> Result<Georeference> {
        let [first, second] = self.points.as_slice() else {
            return Err(GeoreferenceError::MalformedRecord {
                reason: format!("expected exactly 2 reference points, found {}", self.points.len()),
            });
        };

        let &[x0, y0, x1, y1] = self.bbox.as_slice() else {
            return Err(GeoreferenceError::MalformedRecord {
                reason: format!("expected bbox of 4 numbers, found {}", self.bbox.len()),
            });
        };

        Georeference::with_projector(
            first.into(),
            second.into(),
            PixelRect::new(x0, y0, x1, y1),
            projector,
        )
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GeoreferenceError::MalformedRecord {
            reason: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| GeoreferenceError::MalformedRecord {
            reason: e.to_string(),
        })
    }

    /// Read a record from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> RecordResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| RecordError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_json(&content)?)
    }

    /// Write the record as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> RecordResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| RecordError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

impl From<&Georeference> for CalibrationRecord {
    fn from(georef: &Georeference) -> Self {
        Self {
            points: georef.points().iter().map(RecordPoint::from).collect(),
            bbox: georef.bbox().to_array().to_vec(),
        }
    }
}
