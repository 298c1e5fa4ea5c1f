//! Projection constants and coordinate domain limits

/// Tile size the application's map layers are rendered with (pixels)
pub const DEFAULT_TILE_SIZE: f64 = 256.0;

/// Latitude bound of the spherical Mercator domain (exclusive, degrees)
pub const MAX_LATITUDE: f64 = 90.0;

/// Longitude bound accepted for reference points (inclusive, degrees)
pub const MAX_LONGITUDE: f64 = 180.0;
