//! PostgreSQL-backed `TripRepository` implementation using Diesel.
//!
//! All reads and writes are scoped by `(id, user_id)` in the SQL itself;
//! ownership never relies on state cached between requests. Deletes cascade
//! to itinerary days and blocks through the schema's foreign keys.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{TripRepository, TripRepositoryError};
use crate::domain::trip::Trip;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::TripRow;
use super::pool::{DbPool, PoolError};
use super::schema::trips;

/// Diesel-backed implementation of the trip repository port.
#[derive(Clone)]
pub struct DieselTripRepository {
    pool: DbPool,
}

impl DieselTripRepository {
    /// New repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> TripRepositoryError {
    map_pool_error(error, TripRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> TripRepositoryError {
    map_diesel_error(
        error,
        TripRepositoryError::query,
        TripRepositoryError::connection,
    )
}

fn row_to_trip(row: TripRow) -> Trip {
    Trip {
        id: row.id,
        user_id: row.user_id,
        title: row.title,
        description: row.description,
        start_date: row.start_date,
        end_date: row.end_date,
        cover_photo_url: row.cover_photo_url,
        created_at: row.created_at,
    }
}

fn trip_to_row(trip: &Trip) -> TripRow {
    TripRow {
        id: trip.id,
        user_id: trip.user_id,
        title: trip.title.clone(),
        description: trip.description.clone(),
        start_date: trip.start_date,
        end_date: trip.end_date,
        cover_photo_url: trip.cover_photo_url.clone(),
        created_at: trip.created_at,
    }
}

#[async_trait]
impl TripRepository for DieselTripRepository {
    async fn insert(&self, trip: &Trip) -> Result<(), TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        diesel::insert_into(trips::table)
            .values(trip_to_row(trip))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(())
    }

    async fn list_for_owner(&self, user_id: Uuid) -> Result<Vec<Trip>, TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<TripRow> = trips::table
            .filter(trips::user_id.eq(user_id))
            .order(trips::created_at.desc())
            .select(TripRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(rows.into_iter().map(row_to_trip).collect())
    }

    async fn find_for_owner(
        &self,
        trip_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Trip>, TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<TripRow> = trips::table
            .filter(trips::id.eq(trip_id))
            .filter(trips::user_id.eq(user_id))
            .select(TripRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        Ok(row.map(row_to_trip))
    }

    async fn update_for_owner(&self, trip: &Trip) -> Result<bool, TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let updated = diesel::update(
            trips::table
                .filter(trips::id.eq(trip.id))
                .filter(trips::user_id.eq(trip.user_id)),
        )
        .set((
            trips::title.eq(&trip.title),
            trips::description.eq(&trip.description),
            trips::start_date.eq(trip.start_date),
            trips::end_date.eq(trip.end_date),
            trips::cover_photo_url.eq(&trip.cover_photo_url),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel)?;
        Ok(updated > 0)
    }

    async fn delete_for_owner(
        &self,
        trip_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let deleted = diesel::delete(
            trips::table
                .filter(trips::id.eq(trip_id))
                .filter(trips::user_id.eq(user_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel)?;
        Ok(deleted > 0)
    }
}
