//! Input validation and error types

pub mod data;
pub mod error;

pub use data::CoordinateValidator;
pub use error::{GeoreferenceError, RecordError, RecordResult, Result};
