//! Domain ports: async traits implemented by outbound adapters.

mod clock;
mod itinerary_repository;
pub(crate) mod macros;
mod password_hasher;
mod trip_repository;
mod user_repository;

pub use clock::{Clock, FixedClock, SystemClock};
pub use itinerary_repository::{ItineraryRepository, ItineraryRepositoryError};
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use trip_repository::{TripRepository, TripRepositoryError};
pub use user_repository::{UserRepository, UserRepositoryError};

#[cfg(test)]
pub use clock::MockClock;
#[cfg(test)]
pub use itinerary_repository::MockItineraryRepository;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
#[cfg(test)]
pub use trip_repository::MockTripRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
