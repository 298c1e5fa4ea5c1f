//! Spherical Mercator projection
//!
//! Classic spherical (non-ellipsoidal) Web-Mercator formula on a sphere whose
//! radius is derived from the tile size, `R = tile_size / (2π)`, so that the
//! full longitude range spans exactly one tile at zoom 0.
//!
//! The projected y coordinate diverges as latitude approaches ±90°. That is a
//! hard domain boundary: [`MercatorProjector::forward`] rejects such
//! latitudes instead of clamping them.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::core::{GeoPoint, ProjectedPoint, DEFAULT_TILE_SIZE};
use crate::validation::{CoordinateValidator, GeoreferenceError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorProjector {
    tile_size: f64,
    radius: f64,
}

impl Default for MercatorProjector {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            radius: DEFAULT_TILE_SIZE / (2.0 * PI),
        }
    }
}

impl MercatorProjector {
    /// Create a projector for the given tile size in pixels
    pub fn new(tile_size: f64) -> Result<Self> {
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(GeoreferenceError::InvalidTileSize { tile_size });
        }

        Ok(Self {
            tile_size,
            radius: tile_size / (2.0 * PI),
        })
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// Sphere radius in projected units
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Geographic degrees to planar units.
    ///
    /// Fails with [`GeoreferenceError::InvalidLatitude`] at or beyond ±90°.
    /// Longitude is not wrapped.
    pub fn forward(&self, geo: GeoPoint) -> Result<ProjectedPoint> {
        CoordinateValidator::validate_latitude(geo.lat)?;

        let x = self.radius * geo.lon.to_radians();
        let y = self.radius * (FRAC_PI_4 + geo.lat.to_radians() / 2.0).tan().ln();

        Ok(ProjectedPoint::new(x, y))
    }

    /// Planar units to geographic degrees. Total over the real plane.
    pub fn inverse(&self, point: ProjectedPoint) -> GeoPoint {
        let lon = (point.x / self.radius).to_degrees();
        let lat = (2.0 * (point.y / self.radius).exp().atan() - FRAC_PI_2).to_degrees();

        GeoPoint::new(lon, lat)
    }
}

/// [`MercatorProjector::forward`] with the default tile size
pub fn mercator_forward(lon: f64, lat: f64) -> Result<(f64, f64)> {
    let p = MercatorProjector::default().forward(GeoPoint::new(lon, lat))?;
    Ok((p.x, p.y))
}

/// [`MercatorProjector::inverse`] with the default tile size
pub fn mercator_inverse(x: f64, y: f64) -> (f64, f64) {
    let g = MercatorProjector::default().inverse(ProjectedPoint::new(x, y));
    (g.lon, g.lat)
}
