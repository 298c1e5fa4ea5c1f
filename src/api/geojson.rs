//! GeoJSON features in pixel and geographic space
//!
//! Annotations drawn on a floor plan are stored as GeoJSON with `[x, y]`
//! pixel positions; the map layer shows them as `[lon, lat]`. Only `Point`
//! and `Polygon` geometries occur in venue data. Inputs are never modified;
//! every function returns a converted copy with properties left intact.

use serde_json::{json, Value};
use tracing::debug;

use crate::algorithms::Georeference;
use crate::core::{GeoPoint, PixelPoint};
use crate::validation::{GeoreferenceError, Result};

/// Pixel-space feature to a `[lon, lat]` feature
pub fn project_feature(feature: &Value, georef: &Georeference) -> Result<Value> {
    map_feature(feature, |[x, y]| {
        georef
            .project_point(PixelPoint::new(x, y))
            .map(GeoPoint::to_lng_lat)
    })
}

/// `[lon, lat]` feature back to pixel space, as `[x, y]`
pub fn unproject_feature(feature: &Value, georef: &Georeference) -> Result<Value> {
    map_feature(feature, |lng_lat| {
        georef
            .unproject_point(GeoPoint::from_lng_lat(lng_lat))
            .map(|pixel| [pixel.x, pixel.y])
    })
}

pub fn project_feature_collection(collection: &Value, georef: &Georeference) -> Result<Value> {
    map_collection(collection, |feature| project_feature(feature, georef))
}

pub fn unproject_feature_collection(collection: &Value, georef: &Georeference) -> Result<Value> {
    map_collection(collection, |feature| unproject_feature(feature, georef))
}

/// Four numbered `Point` features used to seed draggable map markers
pub fn corner_markers(corners: &[GeoPoint; 4]) -> Value {
    let features: Vec<Value> = corners
        .iter()
        .enumerate()
        .map(|(i, corner)| {
            json!({
                "type": "Feature",
                "properties": { "description": (i + 1).to_string() },
                "geometry": { "type": "Point", "coordinates": corner.to_lng_lat() },
            })
        })
        .collect();

    json!({ "type": "FeatureCollection", "features": features })
}

fn map_collection<F>(collection: &Value, map: F) -> Result<Value>
where
    F: Fn(&Value) -> Result<Value>,
{
    let features = collection
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("feature collection without a features array"))?;

    let mapped = features.iter().map(map).collect::<Result<Vec<_>>>()?;
    debug!(count = mapped.len(), "converted feature collection");

    let mut out = collection.clone();
    out["features"] = Value::Array(mapped);
    Ok(out)
}

fn map_feature<F>(feature: &Value, map: F) -> Result<Value>
where
    F: Fn([f64; 2]) -> Result<[f64; 2]>,
{
    let mut out = feature.clone();

    let geometry = match out.get_mut("geometry") {
        Some(geometry) if !geometry.is_null() => geometry,
        _ => {
            return Err(GeoreferenceError::UnsupportedGeometry {
                kind: "null".to_string(),
            })
        }
    };

    let kind = geometry
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("geometry without a type"))?
        .to_string();

    let coordinates = geometry
        .get_mut("coordinates")
        .ok_or_else(|| malformed("geometry without coordinates"))?;

    match kind.as_str() {
        "Point" => map_position(coordinates, &map)?,
        "Polygon" => {
            let rings = coordinates
                .as_array_mut()
                .ok_or_else(|| malformed("polygon coordinates must be an array of rings"))?;
            for ring in rings {
                let positions = ring
                    .as_array_mut()
                    .ok_or_else(|| malformed("polygon ring must be an array of positions"))?;
                for position in positions {
                    map_position(position, &map)?;
                }
            }
        }
        _ => return Err(GeoreferenceError::UnsupportedGeometry { kind }),
    }

    Ok(out)
}

/// Replace the first two numbers of a position; trailing values are kept
fn map_position<F>(position: &mut Value, map: &F) -> Result<()>
where
    F: Fn([f64; 2]) -> Result<[f64; 2]>,
{
    let values = position
        .as_array_mut()
        .ok_or_else(|| malformed("position must be an array"))?;

    let (a, b) = match values.as_slice() {
        [a, b, ..] => (a.as_f64(), b.as_f64()),
        _ => (None, None),
    };
    let (Some(a), Some(b)) = (a, b) else {
        return Err(malformed("position needs at least two numbers"));
    };

    let [u, v] = map([a, b])?;
    values[0] = json!(u);
    values[1] = json!(v);
    Ok(())
}

fn malformed(reason: &str) -> GeoreferenceError {
    GeoreferenceError::MalformedFeature {
        reason: reason.to_string(),
    }
}
