//! PostgreSQL-backed `ItineraryRepository` implementation using Diesel.
//!
//! Ownership is enforced in SQL with subqueries along the
//! `block -> day -> trip -> user` chain, so a matching row implies the caller
//! owns the whole chain.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::itinerary::{BlockType, ItineraryBlock, ItineraryDay};
use crate::domain::ports::{ItineraryRepository, ItineraryRepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BlockRow, DayRow};
use super::pool::{DbPool, PoolError};
use super::schema::{itinerary_blocks, itinerary_days, trips};

/// Diesel-backed implementation of the itinerary repository port.
#[derive(Clone)]
pub struct DieselItineraryRepository {
    pool: DbPool,
}

impl DieselItineraryRepository {
    /// New repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> ItineraryRepositoryError {
    map_pool_error(error, ItineraryRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> ItineraryRepositoryError {
    map_diesel_error(
        error,
        ItineraryRepositoryError::query,
        ItineraryRepositoryError::connection,
    )
}

fn row_to_day(row: DayRow) -> ItineraryDay {
    ItineraryDay {
        id: row.id,
        trip_id: row.trip_id,
        day_number: row.day_number,
        date: row.date,
        city: row.city,
        country: row.country,
    }
}

fn day_to_row(day: &ItineraryDay) -> DayRow {
    DayRow {
        id: day.id,
        trip_id: day.trip_id,
        day_number: day.day_number,
        date: day.date,
        city: day.city.clone(),
        country: day.country.clone(),
    }
}

fn row_to_block(row: BlockRow) -> Result<ItineraryBlock, ItineraryRepositoryError> {
    let block_type = row.block_type.parse::<BlockType>().map_err(|()| {
        ItineraryRepositoryError::query(format!("unknown block type: {}", row.block_type))
    })?;
    Ok(ItineraryBlock {
        id: row.id,
        itinerary_day_id: row.itinerary_day_id,
        block_type,
        title: row.title,
        description: row.description,
        start_time: row.start_time,
        end_time: row.end_time,
        estimated_cost: row.estimated_cost,
    })
}

fn block_to_row(block: &ItineraryBlock) -> BlockRow {
    BlockRow {
        id: block.id,
        itinerary_day_id: block.itinerary_day_id,
        block_type: block.block_type.as_str().to_owned(),
        title: block.title.clone(),
        description: block.description.clone(),
        start_time: block.start_time,
        end_time: block.end_time,
        estimated_cost: block.estimated_cost,
    }
}

/// Subquery: ids of trips owned by `user_id`.
#[diesel::dsl::auto_type]
fn owned_trip_ids(user_id: Uuid) -> _ {
    trips::table
        .filter(trips::user_id.eq(user_id))
        .select(trips::id)
}

#[async_trait]
impl ItineraryRepository for DieselItineraryRepository {
    async fn trip_exists_for_owner(
        &self,
        trip_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, ItineraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        diesel::select(exists(
            trips::table
                .filter(trips::id.eq(trip_id))
                .filter(trips::user_id.eq(user_id)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel)
    }

    async fn insert_day(&self, day: &ItineraryDay) -> Result<(), ItineraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        diesel::insert_into(itinerary_days::table)
            .values(day_to_row(day))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(())
    }

    async fn list_days_for_trip(
        &self,
        trip_id: Uuid,
    ) -> Result<Vec<ItineraryDay>, ItineraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<DayRow> = itinerary_days::table
            .filter(itinerary_days::trip_id.eq(trip_id))
            .order(itinerary_days::day_number.asc())
            .select(DayRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(rows.into_iter().map(row_to_day).collect())
    }

    async fn find_day_for_owner(
        &self,
        day_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ItineraryDay>, ItineraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<DayRow> = itinerary_days::table
            .filter(itinerary_days::id.eq(day_id))
            .filter(itinerary_days::trip_id.eq_any(owned_trip_ids(user_id)))
            .select(DayRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        Ok(row.map(row_to_day))
    }

    async fn update_day(&self, day: &ItineraryDay) -> Result<bool, ItineraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let updated = diesel::update(
            itinerary_days::table
                .filter(itinerary_days::id.eq(day.id))
                .filter(itinerary_days::trip_id.eq(day.trip_id)),
        )
        .set((
            itinerary_days::day_number.eq(day.day_number),
            itinerary_days::date.eq(day.date),
            itinerary_days::city.eq(&day.city),
            itinerary_days::country.eq(&day.country),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel)?;
        Ok(updated > 0)
    }

    async fn delete_day_for_owner(
        &self,
        day_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, ItineraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let deleted = diesel::delete(
            itinerary_days::table
                .filter(itinerary_days::id.eq(day_id))
                .filter(itinerary_days::trip_id.eq_any(owned_trip_ids(user_id))),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel)?;
        Ok(deleted > 0)
    }

    async fn insert_block(&self, block: &ItineraryBlock) -> Result<(), ItineraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        diesel::insert_into(itinerary_blocks::table)
            .values(block_to_row(block))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(())
    }

    async fn list_blocks_for_day(
        &self,
        day_id: Uuid,
    ) -> Result<Vec<ItineraryBlock>, ItineraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<BlockRow> = itinerary_blocks::table
            .filter(itinerary_blocks::itinerary_day_id.eq(day_id))
            .order(itinerary_blocks::start_time.asc())
            .select(BlockRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        rows.into_iter().map(row_to_block).collect()
    }

    async fn find_block_for_owner(
        &self,
        block_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ItineraryBlock>, ItineraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let owned_days = itinerary_days::table
            .filter(itinerary_days::trip_id.eq_any(owned_trip_ids(user_id)))
            .select(itinerary_days::id);
        let row: Option<BlockRow> = itinerary_blocks::table
            .filter(itinerary_blocks::id.eq(block_id))
            .filter(itinerary_blocks::itinerary_day_id.eq_any(owned_days))
            .select(BlockRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        row.map(row_to_block).transpose()
    }

    async fn update_block(
        &self,
        block: &ItineraryBlock,
    ) -> Result<bool, ItineraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let updated = diesel::update(
            itinerary_blocks::table
                .filter(itinerary_blocks::id.eq(block.id))
                .filter(itinerary_blocks::itinerary_day_id.eq(block.itinerary_day_id)),
        )
        .set((
            itinerary_blocks::block_type.eq(block.block_type.as_str()),
            itinerary_blocks::title.eq(&block.title),
            itinerary_blocks::description.eq(&block.description),
            itinerary_blocks::start_time.eq(block.start_time),
            itinerary_blocks::end_time.eq(block.end_time),
            itinerary_blocks::estimated_cost.eq(block.estimated_cost),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel)?;
        Ok(updated > 0)
    }

    async fn delete_block_for_owner(
        &self,
        block_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, ItineraryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let owned_days = itinerary_days::table
            .filter(itinerary_days::trip_id.eq_any(owned_trip_ids(user_id)))
            .select(itinerary_days::id);
        let deleted = diesel::delete(
            itinerary_blocks::table
                .filter(itinerary_blocks::id.eq(block_id))
                .filter(itinerary_blocks::itinerary_day_id.eq_any(owned_days)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel)?;
        Ok(deleted > 0)
    }
}
