//! Domain model and use-case services.
//!
//! This layer is persistence- and transport-agnostic: entities validate their
//! own invariants, services orchestrate them over the [`ports`] traits, and
//! adapters live under `outbound`.

pub mod account;
mod account_service;
mod error;
pub mod itinerary;
mod itinerary_service;
pub mod ports;
pub mod trip;
mod trip_service;

pub use account_service::{
    AccountService, RegisteredAccount, RegistrationRequest, PASSWORD_MIN,
};
pub use error::{Error, ErrorCode};
pub use itinerary_service::ItineraryService;
pub use trip_service::TripService;
