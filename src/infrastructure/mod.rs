//! Infrastructure layer - External service implementations

pub mod geocoding;
pub mod http;
pub mod logging;
pub mod report;
pub mod resolver;
pub mod storage;
pub mod transit;
