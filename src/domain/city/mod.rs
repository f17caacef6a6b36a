//! City domain
//!
//! Geographic metadata cached per normalized city search string.

mod entity;

pub use entity::{CityFields, CityRecord, CoordinateError, Coordinates, UNKNOWN};
