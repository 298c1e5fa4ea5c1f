//! Core coordinate types for georeferencing

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Position in image pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_vector2(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    pub fn from_vector2(v: Vector2<f64>) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// GeoJSON coordinate order
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub fn from_lng_lat(coords: [f64; 2]) -> Self {
        Self { lon: coords[0], lat: coords[1] }
    }
}

/// Position in planar spherical-Mercator units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

impl ProjectedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_vector2(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    pub fn from_vector2(v: Vector2<f64>) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Calibration anchor tying one pixel to one geographic position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub pixel: PixelPoint,
    pub geo: GeoPoint,
}

impl ReferencePoint {
    pub fn new(pixel: PixelPoint, geo: GeoPoint) -> Self {
        Self { pixel, geo }
    }
}

/// Pixel-space bounding box of a source image, `(x0, y0)` to `(x1, y1)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PixelRect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box anchored at the origin covering a `width` x `height` image
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }
}

/// Coordinate space a degenerate baseline was detected in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateSpace {
    Pixel,
    Projected,
}

impl std::fmt::Display for CoordinateSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateSpace::Pixel => write!(f, "pixel"),
            CoordinateSpace::Projected => write!(f, "projected"),
        }
    }
}
