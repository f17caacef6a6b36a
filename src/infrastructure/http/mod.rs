//! Outbound HTTP

mod client;

pub use client::{HttpClient, HttpClientTrait};

#[cfg(test)]
pub use client::mock::MockHttpClient;
