//! Domain checks for coordinates entering the transform engine

use crate::core::{GeoPoint, PixelPoint, PixelRect, ReferencePoint, MAX_LATITUDE, MAX_LONGITUDE};
use crate::validation::error::{GeoreferenceError, Result};

pub struct CoordinateValidator;

impl CoordinateValidator {
    /// Latitude must lie strictly inside (-90, 90)
    pub fn validate_latitude(latitude: f64) -> Result<()> {
        if !latitude.is_finite() || latitude.abs() >= MAX_LATITUDE {
            return Err(GeoreferenceError::InvalidLatitude { latitude });
        }
        Ok(())
    }

    pub fn validate_longitude(longitude: f64) -> Result<()> {
        if !longitude.is_finite() || longitude.abs() > MAX_LONGITUDE {
            return Err(GeoreferenceError::InvalidLongitude { longitude });
        }
        Ok(())
    }

    /// Full check for a calibration anchor's geographic side
    pub fn validate_geo(geo: &GeoPoint) -> Result<()> {
        Self::validate_latitude(geo.lat)?;
        Self::validate_longitude(geo.lon)
    }

    /// Query pixels only need to be finite; they may fall outside the image
    pub fn validate_query_pixel(pixel: &PixelPoint) -> Result<()> {
        if !pixel.is_finite() {
            return Err(GeoreferenceError::InvalidPixel { x: pixel.x, y: pixel.y });
        }
        Ok(())
    }

    /// Anchor pixels must be finite and non-negative
    pub fn validate_anchor_pixel(pixel: &PixelPoint) -> Result<()> {
        Self::validate_query_pixel(pixel)?;
        if pixel.x < 0.0 || pixel.y < 0.0 {
            return Err(GeoreferenceError::InvalidPixel { x: pixel.x, y: pixel.y });
        }
        Ok(())
    }

    pub fn validate_reference_point(point: &ReferencePoint) -> Result<()> {
        Self::validate_anchor_pixel(&point.pixel)?;
        Self::validate_geo(&point.geo)
    }

    /// Width and height must be positive; NaN edges fail the comparison too
    pub fn validate_bbox(bbox: &PixelRect) -> Result<()> {
        let valid = bbox.x0.is_finite()
            && bbox.y0.is_finite()
            && bbox.x1.is_finite()
            && bbox.y1.is_finite()
            && bbox.x1 > bbox.x0
            && bbox.y1 > bbox.y0;

        if !valid {
            return Err(GeoreferenceError::InvalidBoundingBox {
                x0: bbox.x0,
                y0: bbox.y0,
                x1: bbox.x1,
                y1: bbox.y1,
            });
        }
        Ok(())
    }
}
