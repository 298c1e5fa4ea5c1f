//! Two-point georeferencing of floor-plan images
//!
//! A [`Georeference`] anchors an image's pixel space to geographic space
//! through two reference points. Any pixel offset from the first anchor is
//! written as a pair of fractional coordinates along the anchor baseline and
//! along its perpendicular; the same pair is then reapplied to the baseline
//! between the anchors' spherical-Mercator projections. The inverse runs the
//! same decomposition in projected space and rebuilds the pixel position.
//!
//! This is exact only when the image relates to the map by a similarity
//! (rotation, scale, translation). Two anchors cannot capture shear, so
//! sheared or distorted scans will drift away from the anchors.

use nalgebra::Vector2;
use tracing::{debug, warn};

use crate::algorithms::mercator::MercatorProjector;
use crate::core::{CoordinateSpace, GeoPoint, PixelPoint, PixelRect, ProjectedPoint, ReferencePoint};
use crate::validation::{CoordinateValidator, GeoreferenceError, Result};

/// Calibration state for one image. Immutable; recalibrate by building a new one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Georeference {
    points: [ReferencePoint; 2],
    bbox: PixelRect,
    projector: MercatorProjector,
    /// Anchors' geographic positions in projected units
    projected: [ProjectedPoint; 2],
}

impl Georeference {
    /// Build a georeference with the default 256px tile projection
    pub fn new(point1: ReferencePoint, point2: ReferencePoint, bbox: PixelRect) -> Result<Self> {
        Self::with_projector(point1, point2, bbox, MercatorProjector::default())
    }

    /// Build a georeference, rejecting anchors that cannot define a transform
    pub fn with_projector(
        point1: ReferencePoint,
        point2: ReferencePoint,
        bbox: PixelRect,
        projector: MercatorProjector,
    ) -> Result<Self> {
        CoordinateValidator::validate_reference_point(&point1)?;
        CoordinateValidator::validate_reference_point(&point2)?;
        CoordinateValidator::validate_bbox(&bbox)?;

        let pixel_baseline = point2.pixel.to_vector2() - point1.pixel.to_vector2();
        if is_degenerate(&pixel_baseline) {
            warn!(
                "rejecting calibration: both anchors at pixel ({}, {})",
                point1.pixel.x, point1.pixel.y
            );
            return Err(GeoreferenceError::DegenerateCalibration { space: CoordinateSpace::Pixel });
        }

        let projected = [projector.forward(point1.geo)?, projector.forward(point2.geo)?];
        let projected_baseline = projected[1].to_vector2() - projected[0].to_vector2();
        if is_degenerate(&projected_baseline) {
            warn!(
                "rejecting calibration: both anchors project to ({}, {})",
                point1.geo.lon, point1.geo.lat
            );
            return Err(GeoreferenceError::DegenerateCalibration {
                space: CoordinateSpace::Projected,
            });
        }

        debug!(
            pixel_baseline = pixel_baseline.norm(),
            projected_baseline = projected_baseline.norm(),
            "georeference calibrated"
        );

        Ok(Self {
            points: [point1, point2],
            bbox,
            projector,
            projected,
        })
    }

    /// Anchor the image's pixel origin to `sw` and its far corner
    /// `(width, height)` to `ne`.
    pub fn from_image_corners(
        width: f64,
        height: f64,
        sw: GeoPoint,
        ne: GeoPoint,
        projector: MercatorProjector,
    ) -> Result<Self> {
        Self::with_projector(
            ReferencePoint::new(PixelPoint::new(0.0, 0.0), sw),
            ReferencePoint::new(PixelPoint::new(width, height), ne),
            PixelRect::from_size(width, height),
            projector,
        )
    }

    /// Recalibrate after the SW/NE calibration markers were moved on the map.
    ///
    /// Returns a new georeference over the same image and projection; the
    /// anchors sit at pixel `(0, 0)` and at the far bbox corner.
    pub fn with_markers(&self, sw: GeoPoint, ne: GeoPoint) -> Result<Self> {
        Self::with_projector(
            ReferencePoint::new(PixelPoint::new(0.0, 0.0), sw),
            ReferencePoint::new(PixelPoint::new(self.bbox.x1, self.bbox.y1), ne),
            self.bbox,
            self.projector,
        )
    }

    pub fn points(&self) -> &[ReferencePoint; 2] {
        &self.points
    }

    pub fn bbox(&self) -> PixelRect {
        self.bbox
    }

    pub fn projector(&self) -> MercatorProjector {
        self.projector
    }

    /// Map a pixel to its geographic position
    pub fn project_point(&self, pixel: PixelPoint) -> Result<GeoPoint> {
        CoordinateValidator::validate_query_pixel(&pixel)?;

        let p1 = self.points[0].pixel.to_vector2();
        let p2 = self.points[1].pixel.to_vector2();
        let q1 = self.projected[0].to_vector2();
        let q2 = self.projected[1].to_vector2();

        let fractions = decompose(&(p2 - p1), &(pixel.to_vector2() - p1));
        let q0 = recompose(&q1, &(q2 - q1), fractions);

        if !q0.x.is_finite() || !q0.y.is_finite() {
            return Err(GeoreferenceError::InvalidPixel { x: pixel.x, y: pixel.y });
        }

        // Far enough off the image the inverse saturates at a pole, which
        // `forward` cannot map back
        let geo = self.projector.inverse(ProjectedPoint::from_vector2(q0));
        if CoordinateValidator::validate_latitude(geo.lat).is_err() {
            return Err(GeoreferenceError::InvalidPixel { x: pixel.x, y: pixel.y });
        }

        Ok(geo)
    }

    /// Map a geographic position back to its pixel
    pub fn unproject_point(&self, geo: GeoPoint) -> Result<PixelPoint> {
        let q0 = self.projector.forward(geo)?.to_vector2();

        let p1 = self.points[0].pixel.to_vector2();
        let p2 = self.points[1].pixel.to_vector2();
        let q1 = self.projected[0].to_vector2();
        let q2 = self.projected[1].to_vector2();

        let fractions = decompose(&(q2 - q1), &(q0 - q1));
        let p0 = recompose(&p1, &(p2 - p1), fractions);

        if !p0.x.is_finite() || !p0.y.is_finite() {
            return Err(GeoreferenceError::InvalidLongitude { longitude: geo.lon });
        }

        Ok(PixelPoint::from_vector2(p0))
    }
}

/// The baseline rotated a quarter turn: `(y, -x)`
fn perpendicular(v: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(v.y, -v.x)
}

fn is_degenerate(baseline: &Vector2<f64>) -> bool {
    let len_sq = baseline.norm_squared();
    !(len_sq > 0.0) || !len_sq.is_finite()
}

/// Signed fractional coordinates of `offset` along `baseline` and along its perpendicular
fn decompose(baseline: &Vector2<f64>, offset: &Vector2<f64>) -> (f64, f64) {
    let perp = perpendicular(baseline);
    let t_parallel = baseline.dot(offset) / baseline.norm_squared();
    let t_perp = perp.dot(offset) / perp.norm_squared();
    (t_parallel, t_perp)
}

fn recompose(origin: &Vector2<f64>, baseline: &Vector2<f64>, (t_parallel, t_perp): (f64, f64)) -> Vector2<f64> {
    origin + baseline * t_parallel + perpendicular(baseline) * t_perp
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn anchor(x: f64, y: f64, lon: f64, lat: f64) -> ReferencePoint {
        ReferencePoint::new(PixelPoint::new(x, y), GeoPoint::new(lon, lat))
    }

    fn scenario() -> Georeference {
        Georeference::new(
            anchor(0.0, 0.0, 0.0, 0.0),
            anchor(600.0, 400.0, 4.0, 4.0),
            PixelRect::new(0.0, 0.0, 600.0, 400.0),
        )
        .unwrap()
    }

    #[test]
    fn test_midpoint_golden_value() {
        let geo = scenario().project_point(PixelPoint::new(300.0, 200.0)).unwrap();

        assert_abs_diff_eq!(geo.lon, 2.0, epsilon = 1e-9);
        // Mercator is non-linear in latitude, so the midpoint sits slightly north
        assert_abs_diff_eq!(geo.lat, 2.0012195844332847, epsilon = 1e-9);
    }

    #[test]
    fn test_anchors_map_to_themselves() {
        let georef = Georeference::new(
            anchor(120.0, 80.0, 13.3777, 52.5163),
            anchor(940.0, 610.0, 13.3850, 52.5120),
            PixelRect::new(0.0, 0.0, 1024.0, 768.0),
        )
        .unwrap();

        for point in georef.points() {
            let geo = georef.project_point(point.pixel).unwrap();
            assert_abs_diff_eq!(geo.lon, point.geo.lon, epsilon = 1e-9);
            assert_abs_diff_eq!(geo.lat, point.geo.lat, epsilon = 1e-9);

            let pixel = georef.unproject_point(point.geo).unwrap();
            assert_abs_diff_eq!(pixel.x, point.pixel.x, epsilon = 1e-6);
            assert_abs_diff_eq!(pixel.y, point.pixel.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_round_trip_across_image() {
        let georefs = [
            scenario(),
            // Anchors in reverse order
            Georeference::new(
                anchor(600.0, 400.0, 4.0, 4.0),
                anchor(0.0, 0.0, 0.0, 0.0),
                PixelRect::new(0.0, 0.0, 600.0, 400.0),
            )
            .unwrap(),
            // Rotated plan in the southern hemisphere
            Georeference::new(
                anchor(35.0, 910.0, 151.2070, -33.8675),
                anchor(1480.0, 120.0, 151.2105, -33.8690),
                PixelRect::new(0.0, 0.0, 1600.0, 1000.0),
            )
            .unwrap(),
        ];

        for georef in &georefs {
            for i in 0..=8 {
                for j in 0..=8 {
                    let pixel = PixelPoint::new(-200.0 + i as f64 * 250.0, -100.0 + j as f64 * 150.0);
                    let geo = georef.project_point(pixel).unwrap();
                    let back = georef.unproject_point(geo).unwrap();

                    assert_abs_diff_eq!(back.x, pixel.x, epsilon = 1e-6);
                    assert_abs_diff_eq!(back.y, pixel.y, epsilon = 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_pixel_degenerate_baseline() {
        let result = Georeference::new(
            anchor(10.0, 10.0, 0.0, 0.0),
            anchor(10.0, 10.0, 4.0, 4.0),
            PixelRect::new(0.0, 0.0, 600.0, 400.0),
        );

        assert_eq!(
            result,
            Err(GeoreferenceError::DegenerateCalibration { space: CoordinateSpace::Pixel })
        );
    }

    #[test]
    fn test_projected_degenerate_baseline() {
        let result = Georeference::new(
            anchor(0.0, 0.0, 8.5, 47.3),
            anchor(600.0, 400.0, 8.5, 47.3),
            PixelRect::new(0.0, 0.0, 600.0, 400.0),
        );

        assert_eq!(
            result,
            Err(GeoreferenceError::DegenerateCalibration { space: CoordinateSpace::Projected })
        );
    }

    #[test]
    fn test_pole_anchor_rejected() {
        let result = Georeference::new(
            anchor(0.0, 0.0, 0.0, 0.0),
            anchor(600.0, 400.0, 4.0, 90.0),
            PixelRect::new(0.0, 0.0, 600.0, 400.0),
        );

        assert_eq!(result, Err(GeoreferenceError::InvalidLatitude { latitude: 90.0 }));
    }

    #[test]
    fn test_invalid_bbox_rejected() {
        let result = Georeference::new(
            anchor(0.0, 0.0, 0.0, 0.0),
            anchor(600.0, 400.0, 4.0, 4.0),
            PixelRect::new(0.0, 0.0, 600.0, 0.0),
        );

        assert!(matches!(result, Err(GeoreferenceError::InvalidBoundingBox { .. })));
    }

    #[test]
    fn test_unproject_rejects_pole_query() {
        let result = scenario().unproject_point(GeoPoint::new(2.0, -90.0));
        assert_eq!(result, Err(GeoreferenceError::InvalidLatitude { latitude: -90.0 }));
    }

    #[test]
    fn test_project_rejects_nan_pixel() {
        let result = scenario().project_point(PixelPoint::new(f64::NAN, 1.0));
        assert!(matches!(result, Err(GeoreferenceError::InvalidPixel { .. })));
    }

    #[test]
    fn test_far_off_image_pixel_rejected() {
        let georef = scenario();

        let result = georef.project_point(PixelPoint::new(300.0, 300000.0));
        assert_eq!(result, Err(GeoreferenceError::InvalidPixel { x: 300.0, y: 300000.0 }));

        // Still well short of the pole, so the round trip holds
        let pixel = PixelPoint::new(300.0, 100000.0);
        let geo = georef.project_point(pixel).unwrap();
        assert!(geo.lat < 90.0);
        let back = georef.unproject_point(geo).unwrap();
        assert_abs_diff_eq!(back.x, pixel.x, epsilon = 1e-3);
        assert_abs_diff_eq!(back.y, pixel.y, epsilon = 1e-3);
    }

    #[test]
    fn test_from_image_corners() {
        let sw = GeoPoint::new(-0.1280, 51.5070);
        let ne = GeoPoint::new(-0.1260, 51.5080);
        let georef =
            Georeference::from_image_corners(800.0, 600.0, sw, ne, MercatorProjector::default()).unwrap();

        assert_eq!(georef.bbox(), PixelRect::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(georef.points()[0].pixel, PixelPoint::new(0.0, 0.0));
        assert_eq!(georef.points()[1].pixel, PixelPoint::new(800.0, 600.0));

        let far = georef.project_point(PixelPoint::new(800.0, 600.0)).unwrap();
        assert_abs_diff_eq!(far.lon, ne.lon, epsilon = 1e-9);
        assert_abs_diff_eq!(far.lat, ne.lat, epsilon = 1e-9);
    }

    #[test]
    fn test_with_markers_builds_new_value() {
        let original = Georeference::new(
            anchor(20.0, 30.0, 0.0, 0.0),
            anchor(600.0, 400.0, 4.0, 4.0),
            PixelRect::new(0.0, 0.0, 600.0, 400.0),
        )
        .unwrap();

        let moved = original
            .with_markers(GeoPoint::new(1.0, 1.0), GeoPoint::new(5.0, 5.0))
            .unwrap();

        assert_eq!(original.points()[0].pixel, PixelPoint::new(20.0, 30.0));
        assert_eq!(moved.points()[0].pixel, PixelPoint::new(0.0, 0.0));
        assert_eq!(moved.points()[1].pixel, PixelPoint::new(600.0, 400.0));
        assert_eq!(moved.points()[1].geo, GeoPoint::new(5.0, 5.0));
        assert_eq!(moved.bbox(), original.bbox());

        // Both markers dropped on one spot
        assert!(original
            .with_markers(GeoPoint::new(1.0, 1.0), GeoPoint::new(1.0, 1.0))
            .is_err());
    }

    #[test]
    fn test_tile_size_does_not_change_result() {
        let default = scenario();
        let large = Georeference::with_projector(
            anchor(0.0, 0.0, 0.0, 0.0),
            anchor(600.0, 400.0, 4.0, 4.0),
            PixelRect::new(0.0, 0.0, 600.0, 400.0),
            MercatorProjector::new(512.0).unwrap(),
        )
        .unwrap();

        let pixel = PixelPoint::new(123.0, 321.0);
        let a = default.project_point(pixel).unwrap();
        let b = large.project_point(pixel).unwrap();

        assert_abs_diff_eq!(a.lon, b.lon, epsilon = 1e-9);
        assert_abs_diff_eq!(a.lat, b.lat, epsilon = 1e-9);
    }

    #[test]
    fn test_decompose_recovers_fractions() {
        let baseline = Vector2::new(3.0, 4.0);
        let offset = baseline * 0.5 + perpendicular(&baseline) * -0.25;

        let (t_parallel, t_perp) = decompose(&baseline, &offset);
        assert_abs_diff_eq!(t_parallel, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(t_perp, -0.25, epsilon = 1e-12);

        let rebuilt = recompose(&Vector2::zeros(), &baseline, (t_parallel, t_perp));
        assert_abs_diff_eq!(rebuilt.x, offset.x, epsilon = 1e-12);
        assert_abs_diff_eq!(rebuilt.y, offset.y, epsilon = 1e-12);
    }
}
