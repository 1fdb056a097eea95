//! PostgreSQL persistence adapters built on Diesel.

mod diesel_itinerary_repository;
mod diesel_trip_repository;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod pool;
pub mod schema;

pub use diesel_itinerary_repository::DieselItineraryRepository;
pub use diesel_trip_repository::DieselTripRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
