//! Geographic footprints of images and marker sets

use crate::algorithms::georeference::Georeference;
use crate::core::{GeoPoint, PixelPoint, PixelRect};
use crate::validation::{GeoreferenceError, Result};

/// Pixel corners of `bbox` in footprint order:
/// `(x0, y1)`, `(x1, y1)`, `(x1, y0)`, `(x0, y0)`.
pub fn footprint_corners(bbox: &PixelRect) -> [PixelPoint; 4] {
    [
        PixelPoint::new(bbox.x0, bbox.y1),
        PixelPoint::new(bbox.x1, bbox.y1),
        PixelPoint::new(bbox.x1, bbox.y0),
        PixelPoint::new(bbox.x0, bbox.y0),
    ]
}

/// Project the image bounding box into a four-corner geographic polygon.
///
/// Corner order follows [`footprint_corners`]; map layers seed their
/// initial placement polygon from it, so the order is part of the contract.
pub fn bounding_box_footprint(georef: &Georeference) -> Result<[GeoPoint; 4]> {
    let [a, b, c, d] = footprint_corners(&georef.bbox());

    Ok([
        georef.project_point(a)?,
        georef.project_point(b)?,
        georef.project_point(c)?,
        georef.project_point(d)?,
    ])
}

/// Axis-aligned envelope of `points` as NW, NE, SE, SW corners.
///
/// Coordinates are not range-checked, since projected positions may run past
/// the antimeridian, but every one of them must be finite.
pub fn geographic_envelope(points: &[GeoPoint]) -> Result<[GeoPoint; 4]> {
    let first = points.first().ok_or(GeoreferenceError::EmptyInput)?;

    for p in points {
        if !p.lat.is_finite() {
            return Err(GeoreferenceError::InvalidLatitude { latitude: p.lat });
        }
        if !p.lon.is_finite() {
            return Err(GeoreferenceError::InvalidLongitude { longitude: p.lon });
        }
    }

    let (mut west, mut east) = (first.lon, first.lon);
    let (mut south, mut north) = (first.lat, first.lat);
    for p in &points[1..] {
        west = west.min(p.lon);
        east = east.max(p.lon);
        south = south.min(p.lat);
        north = north.max(p.lat);
    }

    Ok([
        GeoPoint::new(west, north),
        GeoPoint::new(east, north),
        GeoPoint::new(east, south),
        GeoPoint::new(west, south),
    ])
}
