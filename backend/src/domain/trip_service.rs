//! Trip CRUD use-cases scoped to the authenticated owner.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{Clock, TripRepository, TripRepositoryError};
use crate::domain::trip::{Trip, TripDraft, TripPatch, TripValidationError};
use crate::domain::Error;

/// Owner-scoped trip operations over the trip repository.
#[derive(Clone)]
pub struct TripService {
    trips: Arc<dyn TripRepository>,
    clock: Arc<dyn Clock>,
}

fn map_repository_error(error: TripRepositoryError) -> Error {
    Error::internal(error.to_string())
}

fn map_validation_error(error: &TripValidationError) -> Error {
    let field = match error {
        TripValidationError::EmptyTitle => "title",
        TripValidationError::StartInPast => "startDate",
        TripValidationError::EndBeforeStart => "endDate",
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

fn trip_not_found() -> Error {
    Error::not_found("Trip not found")
}

impl TripService {
    /// Build the service over its ports.
    pub fn new(trips: Arc<dyn TripRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { trips, clock }
    }

    /// Validate and persist a new trip owned by `user_id`.
    pub async fn create(&self, user_id: Uuid, draft: TripDraft) -> Result<Trip, Error> {
        let trip = Trip::create(user_id, draft, self.clock.today())
            .map_err(|err| map_validation_error(&err))?;
        self.trips
            .insert(&trip)
            .await
            .map_err(map_repository_error)?;
        info!(trip_id = %trip.id, "trip created");
        Ok(trip)
    }

    /// All trips owned by `user_id`, newest first.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Trip>, Error> {
        self.trips
            .list_for_owner(user_id)
            .await
            .map_err(map_repository_error)
    }

    /// One trip by id, visible only to its owner.
    pub async fn get(&self, trip_id: Uuid, user_id: Uuid) -> Result<Trip, Error> {
        self.trips
            .find_for_owner(trip_id, user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(trip_not_found)
    }

    /// Merge a patch into the stored trip and revalidate the whole record.
    ///
    /// The stored record is read first so single-field patches are checked
    /// against the values they leave untouched.
    pub async fn update(
        &self,
        trip_id: Uuid,
        user_id: Uuid,
        patch: TripPatch,
    ) -> Result<Trip, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_request("No fields to update"));
        }
        let current = self
            .trips
            .find_for_owner(trip_id, user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(trip_not_found)?;
        let updated = current
            .apply(patch, self.clock.today())
            .map_err(|err| map_validation_error(&err))?;
        let matched = self
            .trips
            .update_for_owner(&updated)
            .await
            .map_err(map_repository_error)?;
        if !matched {
            return Err(trip_not_found());
        }
        Ok(updated)
    }

    /// Delete a trip and, by cascade, its itinerary.
    pub async fn delete(&self, trip_id: Uuid, user_id: Uuid) -> Result<(), Error> {
        let matched = self
            .trips
            .delete_for_owner(trip_id, user_id)
            .await
            .map_err(map_repository_error)?;
        if !matched {
            return Err(trip_not_found());
        }
        info!(%trip_id, "trip deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::ports::{FixedClock, MockTripRepository};
    use crate::domain::ErrorCode;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    fn service(trips: MockTripRepository) -> TripService {
        TripService::new(Arc::new(trips), Arc::new(FixedClock(today())))
    }

    fn draft() -> TripDraft {
        TripDraft {
            title: "Summer in Lisbon".into(),
            description: None,
            start_date: today(),
            end_date: today(),
            cover_photo_url: None,
        }
    }

    fn stored(user_id: Uuid) -> Trip {
        Trip::create(user_id, draft(), today()).expect("valid draft")
    }

    #[tokio::test]
    async fn create_persists_valid_trip() {
        let user_id = Uuid::new_v4();
        let mut trips = MockTripRepository::new();
        trips
            .expect_insert()
            .withf(move |trip| trip.user_id == user_id && trip.title == "Summer in Lisbon")
            .returning(|_| Ok(()));

        let trip = service(trips)
            .create(user_id, draft())
            .await
            .expect("create succeeds");
        assert_eq!(trip.user_id, user_id);
    }

    #[tokio::test]
    async fn create_rejects_past_start_without_touching_repository() {
        let mut bad = draft();
        bad.start_date = today().pred_opt().expect("previous day");

        let error = service(MockTripRepository::new())
            .create(Uuid::new_v4(), bad)
            .await
            .expect_err("past start must fail");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), "Trip start date cannot be in the past");
    }

    #[tokio::test]
    async fn get_hides_foreign_trips_as_not_found() {
        let trip_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let mut trips = MockTripRepository::new();
        trips
            .expect_find_for_owner()
            .with(eq(trip_id), eq(user_id))
            .returning(|_, _| Ok(None));

        let error = service(trips)
            .get(trip_id, user_id)
            .await
            .expect_err("foreign trip must be hidden");
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "Trip not found");
    }

    #[tokio::test]
    async fn update_rejects_empty_patch_before_any_read() {
        let error = service(MockTripRepository::new())
            .update(Uuid::new_v4(), Uuid::new_v4(), TripPatch::default())
            .await
            .expect_err("empty patch must fail");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), "No fields to update");
    }

    #[tokio::test]
    async fn update_revalidates_merged_record() {
        let user_id = Uuid::new_v4();
        let current = stored(user_id);
        let trip_id = current.id;
        let mut trips = MockTripRepository::new();
        trips
            .expect_find_for_owner()
            .returning(move |_, _| Ok(Some(current.clone())));

        let patch = TripPatch {
            end_date: Some(today().pred_opt().expect("previous day")),
            ..TripPatch::default()
        };
        let error = service(trips)
            .update(trip_id, user_id, patch)
            .await
            .expect_err("end before start must fail");
        assert_eq!(error.message(), "End date cannot be before start date");
    }

    #[tokio::test]
    async fn update_writes_merged_record() {
        let user_id = Uuid::new_v4();
        let current = stored(user_id);
        let trip_id = current.id;
        let mut trips = MockTripRepository::new();
        trips
            .expect_find_for_owner()
            .returning(move |_, _| Ok(Some(current.clone())));
        trips
            .expect_update_for_owner()
            .withf(|trip| trip.title == "Renamed")
            .returning(|_| Ok(true));

        let patch = TripPatch {
            title: Some("Renamed".into()),
            ..TripPatch::default()
        };
        let updated = service(trips)
            .update(trip_id, user_id, patch)
            .await
            .expect("update succeeds");
        assert_eq!(updated.title, "Renamed");
    }

    #[tokio::test]
    async fn delete_maps_missing_row_to_not_found() {
        let mut trips = MockTripRepository::new();
        trips
            .expect_delete_for_owner()
            .returning(|_, _| Ok(false));

        let error = service(trips)
            .delete(Uuid::new_v4(), Uuid::new_v4())
            .await
            .expect_err("missing trip must fail");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn repository_failures_surface_as_internal() {
        let mut trips = MockTripRepository::new();
        trips
            .expect_list_for_owner()
            .returning(|_| Err(TripRepositoryError::connection("pool exhausted")));

        let error = service(trips)
            .list(Uuid::new_v4())
            .await
            .expect_err("connection failure must fail");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
