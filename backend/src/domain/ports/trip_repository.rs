//! Port for trip persistence.
//!
//! Every read and write is scoped by `(id, owner)`; the adapter reports "no
//! row matched" rather than distinguishing absence from foreign ownership.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::trip::Trip;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by trip repository adapters.
    pub enum TripRepositoryError {
        /// Repository connection could not be established.
        Connection => "trip repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "trip repository query failed: {message}",
    }
}

/// Port for owner-scoped trip CRUD.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Persist a freshly created trip.
    async fn insert(&self, trip: &Trip) -> Result<(), TripRepositoryError>;

    /// All trips owned by `user_id`, newest-created first.
    async fn list_for_owner(&self, user_id: Uuid) -> Result<Vec<Trip>, TripRepositoryError>;

    /// One trip matched by `(trip_id, owner)`.
    async fn find_for_owner(
        &self,
        trip_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Trip>, TripRepositoryError>;

    /// Write a complete updated record, scoped by owner.
    ///
    /// Returns false when no row matched (absent or not owned).
    async fn update_for_owner(&self, trip: &Trip) -> Result<bool, TripRepositoryError>;

    /// Hard-delete, cascading to itinerary days and blocks.
    ///
    /// Returns false when no row matched.
    async fn delete_for_owner(
        &self,
        trip_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, TripRepositoryError>;
}
