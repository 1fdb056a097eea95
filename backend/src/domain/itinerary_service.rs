//! Itinerary day and block use-cases.
//!
//! Every operation re-derives ownership through the repository join chain and
//! reports both absence and foreign ownership as `NotFound`, so callers cannot
//! probe for resources they do not own.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::itinerary::{
    BlockDraft, BlockPatch, DayDraft, DayPatch, ItineraryBlock, ItineraryDay,
    ItineraryValidationError, OverlapPolicy,
};
use crate::domain::ports::{ItineraryRepository, ItineraryRepositoryError};
use crate::domain::Error;

/// Day and block operations over the itinerary repository.
#[derive(Clone)]
pub struct ItineraryService {
    repository: Arc<dyn ItineraryRepository>,
    overlap_policy: Arc<dyn OverlapPolicy>,
}

fn map_repository_error(error: ItineraryRepositoryError) -> Error {
    Error::internal(error.to_string())
}

fn map_validation_error(error: &ItineraryValidationError) -> Error {
    let error_out = Error::invalid_request(error.to_string());
    match error {
        ItineraryValidationError::Overlap { with } => {
            error_out.with_details(json!({ "conflictsWith": with }))
        }
        _ => error_out,
    }
}

fn trip_not_found() -> Error {
    Error::not_found("Trip not found")
}

fn day_not_found() -> Error {
    Error::not_found("Itinerary day not found")
}

fn block_not_found() -> Error {
    Error::not_found("Itinerary block not found")
}

impl ItineraryService {
    /// Build the service over its repository and the configured overlap
    /// policy.
    pub fn new(
        repository: Arc<dyn ItineraryRepository>,
        overlap_policy: Arc<dyn OverlapPolicy>,
    ) -> Self {
        Self {
            repository,
            overlap_policy,
        }
    }

    /// Add a day to a trip the caller owns.
    pub async fn create_day(
        &self,
        trip_id: Uuid,
        user_id: Uuid,
        draft: DayDraft,
    ) -> Result<ItineraryDay, Error> {
        let owned = self
            .repository
            .trip_exists_for_owner(trip_id, user_id)
            .await
            .map_err(map_repository_error)?;
        if !owned {
            return Err(trip_not_found());
        }
        let day = ItineraryDay::create(trip_id, draft).map_err(|err| map_validation_error(&err))?;
        self.repository
            .insert_day(&day)
            .await
            .map_err(map_repository_error)?;
        info!(day_id = %day.id, %trip_id, "itinerary day created");
        Ok(day)
    }

    /// Days of an owned trip, ordered by day number.
    pub async fn list_days(&self, trip_id: Uuid, user_id: Uuid) -> Result<Vec<ItineraryDay>, Error> {
        let owned = self
            .repository
            .trip_exists_for_owner(trip_id, user_id)
            .await
            .map_err(map_repository_error)?;
        if !owned {
            return Err(trip_not_found());
        }
        self.repository
            .list_days_for_trip(trip_id)
            .await
            .map_err(map_repository_error)
    }

    /// Merge a patch into a stored day and revalidate the whole record.
    pub async fn update_day(
        &self,
        day_id: Uuid,
        user_id: Uuid,
        patch: DayPatch,
    ) -> Result<ItineraryDay, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_request("No fields to update"));
        }
        let current = self
            .repository
            .find_day_for_owner(day_id, user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(day_not_found)?;
        let updated = current
            .apply(patch)
            .map_err(|err| map_validation_error(&err))?;
        let matched = self
            .repository
            .update_day(&updated)
            .await
            .map_err(map_repository_error)?;
        if !matched {
            return Err(day_not_found());
        }
        Ok(updated)
    }

    /// Delete a day and, by cascade, its blocks.
    pub async fn delete_day(&self, day_id: Uuid, user_id: Uuid) -> Result<(), Error> {
        let matched = self
            .repository
            .delete_day_for_owner(day_id, user_id)
            .await
            .map_err(map_repository_error)?;
        if !matched {
            return Err(day_not_found());
        }
        info!(%day_id, "itinerary day deleted");
        Ok(())
    }

    /// Add a block to a day the caller owns, subject to the overlap policy.
    pub async fn create_block(
        &self,
        day_id: Uuid,
        user_id: Uuid,
        draft: BlockDraft,
    ) -> Result<ItineraryBlock, Error> {
        self.repository
            .find_day_for_owner(day_id, user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(day_not_found)?;
        let block =
            ItineraryBlock::create(day_id, draft).map_err(|err| map_validation_error(&err))?;
        let siblings = self
            .repository
            .list_blocks_for_day(day_id)
            .await
            .map_err(map_repository_error)?;
        self.overlap_policy
            .check(&block, &siblings)
            .map_err(|err| map_validation_error(&err))?;
        self.repository
            .insert_block(&block)
            .await
            .map_err(map_repository_error)?;
        info!(block_id = %block.id, %day_id, "itinerary block created");
        Ok(block)
    }

    /// Blocks of an owned day, ordered by start time.
    pub async fn list_blocks(
        &self,
        day_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<ItineraryBlock>, Error> {
        self.repository
            .find_day_for_owner(day_id, user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(day_not_found)?;
        self.repository
            .list_blocks_for_day(day_id)
            .await
            .map_err(map_repository_error)
    }

    /// Merge a patch into a stored block, revalidate the whole record, and
    /// re-run the overlap policy against the block's current siblings.
    pub async fn update_block(
        &self,
        block_id: Uuid,
        user_id: Uuid,
        patch: BlockPatch,
    ) -> Result<ItineraryBlock, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_request("No fields to update"));
        }
        let current = self
            .repository
            .find_block_for_owner(block_id, user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(block_not_found)?;
        let updated = current
            .apply(patch)
            .map_err(|err| map_validation_error(&err))?;
        let siblings: Vec<ItineraryBlock> = self
            .repository
            .list_blocks_for_day(updated.itinerary_day_id)
            .await
            .map_err(map_repository_error)?
            .into_iter()
            .filter(|sibling| sibling.id != updated.id)
            .collect();
        self.overlap_policy
            .check(&updated, &siblings)
            .map_err(|err| map_validation_error(&err))?;
        let matched = self
            .repository
            .update_block(&updated)
            .await
            .map_err(map_repository_error)?;
        if !matched {
            return Err(block_not_found());
        }
        Ok(updated)
    }

    /// Delete a block through the ownership chain.
    pub async fn delete_block(&self, block_id: Uuid, user_id: Uuid) -> Result<(), Error> {
        let matched = self
            .repository
            .delete_block_for_owner(block_id, user_id)
            .await
            .map_err(map_repository_error)?;
        if !matched {
            return Err(block_not_found());
        }
        info!(%block_id, "itinerary block deleted");
        Ok(())
    }
}
