//! Transit status provider clients

mod tfl;

pub use tfl::{TflProvider, DEFAULT_TFL_BASE_URL};
