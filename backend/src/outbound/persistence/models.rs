//! Row types mapping Diesel query results to and from the domain.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{itinerary_blocks, itinerary_days, trips, users};

/// Insertable user account row; `created_at` is set by the database.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub phone: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub city: Option<&'a str>,
    pub country: Option<&'a str>,
    pub bio: Option<&'a str>,
}

/// Complete trip row.
#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = trips)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TripRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cover_photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Complete itinerary day row.
#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = itinerary_days)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DayRow {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub day_number: i32,
    pub date: NaiveDate,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Complete itinerary block row.
#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = itinerary_blocks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BlockRow {
    pub id: Uuid,
    pub itinerary_day_id: Uuid,
    pub block_type: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub estimated_cost: Option<f64>,
}
