//! API layer - HTTP endpoints

pub mod geo;
pub mod health;
pub mod incidents;
pub mod lookup;
pub mod reports;
pub mod router;
pub mod state;
pub mod transit;
pub mod types;

pub use router::create_router;
pub use state::AppState;
