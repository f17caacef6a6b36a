//! Geocoding provider clients

mod geonames;

pub use geonames::{GeoNamesProvider, DEFAULT_GEONAMES_BASE_URL};
