//! Port for itinerary day and block persistence.
//!
//! Ownership is always re-derived through the join chain back to the calling
//! user: days via `day -> trip -> user`, blocks via `block -> day -> trip ->
//! user`. No cached ownership is trusted across requests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::itinerary::{ItineraryBlock, ItineraryDay};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by itinerary repository adapters.
    pub enum ItineraryRepositoryError {
        /// Repository connection could not be established.
        Connection => "itinerary repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "itinerary repository query failed: {message}",
    }
}

/// Port for ownership-chained day and block CRUD.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItineraryRepository: Send + Sync {
    /// True when the trip exists and belongs to `user_id`.
    async fn trip_exists_for_owner(
        &self,
        trip_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, ItineraryRepositoryError>;

    /// Persist a freshly created day.
    async fn insert_day(&self, day: &ItineraryDay) -> Result<(), ItineraryRepositoryError>;

    /// Days of a trip ordered by ascending `day_number`.
    async fn list_days_for_trip(
        &self,
        trip_id: Uuid,
    ) -> Result<Vec<ItineraryDay>, ItineraryRepositoryError>;

    /// One day matched through the `day -> trip -> user` chain.
    async fn find_day_for_owner(
        &self,
        day_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ItineraryDay>, ItineraryRepositoryError>;

    /// Write a complete updated day record.
    ///
    /// Returns false when no row matched.
    async fn update_day(&self, day: &ItineraryDay) -> Result<bool, ItineraryRepositoryError>;

    /// Delete a day through the ownership chain, cascading to its blocks.
    ///
    /// Returns false when no row matched.
    async fn delete_day_for_owner(
        &self,
        day_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, ItineraryRepositoryError>;

    /// Persist a freshly created block.
    async fn insert_block(&self, block: &ItineraryBlock) -> Result<(), ItineraryRepositoryError>;

    /// Blocks of a day ordered by ascending `start_time`.
    async fn list_blocks_for_day(
        &self,
        day_id: Uuid,
    ) -> Result<Vec<ItineraryBlock>, ItineraryRepositoryError>;

    /// One block matched through the `block -> day -> trip -> user` chain.
    async fn find_block_for_owner(
        &self,
        block_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ItineraryBlock>, ItineraryRepositoryError>;

    /// Write a complete updated block record.
    ///
    /// Returns false when no row matched.
    async fn update_block(&self, block: &ItineraryBlock)
        -> Result<bool, ItineraryRepositoryError>;

    /// Delete a block through the ownership chain.
    ///
    /// Returns false when no row matched.
    async fn delete_block_for_owner(
        &self,
        block_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, ItineraryRepositoryError>;
}
