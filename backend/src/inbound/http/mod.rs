//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod envelope;
pub mod error;
pub mod guard;
pub mod health;
pub mod itinerary;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod trips;
pub mod validation;

pub use error::ApiResult;
