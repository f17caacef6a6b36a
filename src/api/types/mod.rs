//! Response envelope, errors and extractors shared by every endpoint

pub mod envelope;
pub mod error;
pub mod json;

pub use envelope::Envelope;
pub use error::ApiError;
pub use json::Json;
