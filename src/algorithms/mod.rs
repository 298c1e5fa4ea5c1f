//! Georeferencing algorithms

pub mod mercator;
pub mod georeference;
pub mod footprint;

pub use mercator::{mercator_forward, mercator_inverse, MercatorProjector};
pub use georeference::Georeference;
pub use footprint::{bounding_box_footprint, footprint_corners, geographic_envelope};
