//! Core types and constants for venue georeferencing

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
