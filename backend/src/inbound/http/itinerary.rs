//! Itinerary API handlers.
//!
//! ```text
//! POST   /api/itinerary-days/{tripId}
//! GET    /api/itinerary-days/{tripId}
//! PUT    /api/itinerary-days/day/{dayId}
//! DELETE /api/itinerary-days/day/{dayId}
//! POST   /api/itinerary/blocks/{dayId}
//! GET    /api/itinerary/blocks/{dayId}
//! PUT    /api/itinerary/blocks/block/{blockId}
//! DELETE /api/itinerary/blocks/block/{blockId}
//! ```
//!
//! Ownership is re-derived through the `block -> day -> trip -> user` chain on
//! every request; resources outside the caller's chain render as `404`.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::itinerary::{
    BlockDraft, BlockPatch, DayDraft, DayPatch, ItineraryBlock, ItineraryDay,
};

use super::envelope::Envelope;
use super::error::ErrorBody;
use super::guard::{require_role, USER_OR_ADMIN};
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{
    parse_date, parse_optional_block_type, parse_optional_date, parse_optional_time,
    parse_block_type, parse_time, require, FieldName,
};
use super::ApiResult;

/// Request body for `POST /api/itinerary-days/{tripId}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDayRequest {
    /// Position within the trip; positive, required.
    pub day_number: Option<i32>,
    /// Calendar date, `YYYY-MM-DD`; required.
    pub date: Option<String>,
    /// Optional city.
    pub city: Option<String>,
    /// Optional country.
    pub country: Option<String>,
}

/// Request body for `PUT /api/itinerary-days/day/{dayId}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDayRequest {
    /// Replacement day number.
    pub day_number: Option<i32>,
    /// Replacement date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Replacement city.
    pub city: Option<String>,
    /// Replacement country.
    pub country: Option<String>,
}

/// Wire representation of an itinerary day.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayPayload {
    /// Day identifier.
    pub id: Uuid,
    /// Parent trip.
    pub trip_id: Uuid,
    /// Position within the trip.
    pub day_number: i32,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Optional city.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Optional country.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl From<ItineraryDay> for DayPayload {
    fn from(day: ItineraryDay) -> Self {
        Self {
            id: day.id,
            trip_id: day.trip_id,
            day_number: day.day_number,
            date: day.date.to_string(),
            city: day.city,
            country: day.country,
        }
    }
}

/// Request body for `POST /api/itinerary/blocks/{dayId}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlockRequest {
    /// Block type name; required.
    pub block_type: Option<String>,
    /// Title; required.
    pub title: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Start time of day, `HH:MM`; required.
    pub start_time: Option<String>,
    /// End time of day, `HH:MM`; required, after the start.
    pub end_time: Option<String>,
    /// Optional non-negative cost estimate.
    pub estimated_cost: Option<f64>,
}

/// Request body for `PUT /api/itinerary/blocks/block/{blockId}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlockRequest {
    /// Replacement block type name.
    pub block_type: Option<String>,
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement start time, `HH:MM`.
    pub start_time: Option<String>,
    /// Replacement end time, `HH:MM`.
    pub end_time: Option<String>,
    /// Replacement cost estimate.
    pub estimated_cost: Option<f64>,
}

/// Wire representation of an itinerary block.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockPayload {
    /// Block identifier.
    pub id: Uuid,
    /// Parent day.
    pub itinerary_day_id: Uuid,
    /// Block type name.
    pub block_type: String,
    /// Title.
    pub title: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Start time of day, `HH:MM:SS`.
    pub start_time: String,
    /// End time of day, `HH:MM:SS`.
    pub end_time: String,
    /// Optional cost estimate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
}

impl From<ItineraryBlock> for BlockPayload {
    fn from(block: ItineraryBlock) -> Self {
        Self {
            id: block.id,
            itinerary_day_id: block.itinerary_day_id,
            block_type: block.block_type.to_string(),
            title: block.title,
            description: block.description,
            start_time: block.start_time.to_string(),
            end_time: block.end_time.to_string(),
            estimated_cost: block.estimated_cost,
        }
    }
}

/// Add a day to one of the caller's trips.
#[utoipa::path(
    post,
    path = "/api/itinerary-days/{tripId}",
    params(("tripId" = Uuid, Path, description = "Trip identifier")),
    request_body = CreateDayRequest,
    responses(
        (status = 201, description = "Day created", body = Envelope<DayPayload>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Trip not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["itinerary"],
    operation_id = "createItineraryDay"
)]
#[post("/{tripId}")]
pub async fn create_day(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<CreateDayRequest>,
) -> ApiResult<HttpResponse> {
    let user = require_role(&session, USER_OR_ADMIN)?;
    let body = payload.into_inner();
    let draft = DayDraft {
        day_number: require(body.day_number, FieldName::new("dayNumber"))?,
        date: parse_date(
            &require(body.date, FieldName::new("date"))?,
            FieldName::new("date"),
        )?,
        city: body.city,
        country: body.country,
    };
    let day = state
        .itinerary
        .create_day(path.into_inner(), user.user_id, draft)
        .await?;
    Ok(HttpResponse::Created().json(Envelope::with_message(
        "Itinerary day created successfully",
        DayPayload::from(day),
    )))
}

/// List the days of one of the caller's trips.
#[utoipa::path(
    get,
    path = "/api/itinerary-days/{tripId}",
    params(("tripId" = Uuid, Path, description = "Trip identifier")),
    responses(
        (status = 200, description = "Days", body = Envelope<Vec<DayPayload>>),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Trip not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["itinerary"],
    operation_id = "listItineraryDays"
)]
#[get("/{tripId}")]
pub async fn list_days(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user = require_role(&session, USER_OR_ADMIN)?;
    let days = state
        .itinerary
        .list_days(path.into_inner(), user.user_id)
        .await?;
    let payload: Vec<DayPayload> = days.into_iter().map(DayPayload::from).collect();
    Ok(HttpResponse::Ok().json(Envelope::data(payload)))
}

/// Partially update one of the caller's itinerary days.
#[utoipa::path(
    put,
    path = "/api/itinerary-days/day/{dayId}",
    params(("dayId" = Uuid, Path, description = "Day identifier")),
    request_body = UpdateDayRequest,
    responses(
        (status = 200, description = "Day updated", body = Envelope<DayPayload>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Day not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["itinerary"],
    operation_id = "updateItineraryDay"
)]
#[put("/day/{dayId}")]
pub async fn update_day(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateDayRequest>,
) -> ApiResult<HttpResponse> {
    let user = require_role(&session, USER_OR_ADMIN)?;
    let body = payload.into_inner();
    let patch = DayPatch {
        day_number: body.day_number,
        date: parse_optional_date(body.date.as_deref(), FieldName::new("date"))?,
        city: body.city,
        country: body.country,
    };
    let day = state
        .itinerary
        .update_day(path.into_inner(), user.user_id, patch)
        .await?;
    Ok(HttpResponse::Ok().json(Envelope::with_message(
        "Itinerary day updated successfully",
        DayPayload::from(day),
    )))
}

/// Delete one of the caller's itinerary days, cascading to its blocks.
#[utoipa::path(
    delete,
    path = "/api/itinerary-days/day/{dayId}",
    params(("dayId" = Uuid, Path, description = "Day identifier")),
    responses(
        (status = 200, description = "Day deleted"),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Day not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["itinerary"],
    operation_id = "deleteItineraryDay"
)]
#[delete("/day/{dayId}")]
pub async fn delete_day(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user = require_role(&session, USER_OR_ADMIN)?;
    state
        .itinerary
        .delete_day(path.into_inner(), user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(Envelope::message("Itinerary day deleted successfully")))
}

/// Add a block to one of the caller's itinerary days.
#[utoipa::path(
    post,
    path = "/api/itinerary/blocks/{dayId}",
    params(("dayId" = Uuid, Path, description = "Day identifier")),
    request_body = CreateBlockRequest,
    responses(
        (status = 201, description = "Block created", body = Envelope<BlockPayload>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Day not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["itinerary"],
    operation_id = "createItineraryBlock"
)]
#[post("/{dayId}")]
pub async fn create_block(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<CreateBlockRequest>,
) -> ApiResult<HttpResponse> {
    let user = require_role(&session, USER_OR_ADMIN)?;
    let body = payload.into_inner();
    let draft = BlockDraft {
        block_type: parse_block_type(
            &require(body.block_type, FieldName::new("blockType"))?,
            FieldName::new("blockType"),
        )?,
        title: require(body.title, FieldName::new("title"))?,
        description: body.description,
        start_time: parse_time(
            &require(body.start_time, FieldName::new("startTime"))?,
            FieldName::new("startTime"),
        )?,
        end_time: parse_time(
            &require(body.end_time, FieldName::new("endTime"))?,
            FieldName::new("endTime"),
        )?,
        estimated_cost: body.estimated_cost,
    };
    let block = state
        .itinerary
        .create_block(path.into_inner(), user.user_id, draft)
        .await?;
    Ok(HttpResponse::Created().json(Envelope::with_message(
        "Itinerary block created successfully",
        BlockPayload::from(block),
    )))
}

/// List the blocks of one of the caller's itinerary days.
#[utoipa::path(
    get,
    path = "/api/itinerary/blocks/{dayId}",
    params(("dayId" = Uuid, Path, description = "Day identifier")),
    responses(
        (status = 200, description = "Blocks", body = Envelope<Vec<BlockPayload>>),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Day not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["itinerary"],
    operation_id = "listItineraryBlocks"
)]
#[get("/{dayId}")]
pub async fn list_blocks(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user = require_role(&session, USER_OR_ADMIN)?;
    let blocks = state
        .itinerary
        .list_blocks(path.into_inner(), user.user_id)
        .await?;
    let payload: Vec<BlockPayload> = blocks.into_iter().map(BlockPayload::from).collect();
    Ok(HttpResponse::Ok().json(Envelope::data(payload)))
}

/// Partially update one of the caller's itinerary blocks.
#[utoipa::path(
    put,
    path = "/api/itinerary/blocks/block/{blockId}",
    params(("blockId" = Uuid, Path, description = "Block identifier")),
    request_body = UpdateBlockRequest,
    responses(
        (status = 200, description = "Block updated", body = Envelope<BlockPayload>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Block not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["itinerary"],
    operation_id = "updateItineraryBlock"
)]
#[put("/block/{blockId}")]
pub async fn update_block(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateBlockRequest>,
) -> ApiResult<HttpResponse> {
    let user = require_role(&session, USER_OR_ADMIN)?;
    let body = payload.into_inner();
    let patch = BlockPatch {
        block_type: parse_optional_block_type(
            body.block_type.as_deref(),
            FieldName::new("blockType"),
        )?,
        title: body.title,
        description: body.description,
        start_time: parse_optional_time(body.start_time.as_deref(), FieldName::new("startTime"))?,
        end_time: parse_optional_time(body.end_time.as_deref(), FieldName::new("endTime"))?,
        estimated_cost: body.estimated_cost,
    };
    let block = state
        .itinerary
        .update_block(path.into_inner(), user.user_id, patch)
        .await?;
    Ok(HttpResponse::Ok().json(Envelope::with_message(
        "Itinerary block updated successfully",
        BlockPayload::from(block),
    )))
}

/// Delete one of the caller's itinerary blocks.
#[utoipa::path(
    delete,
    path = "/api/itinerary/blocks/block/{blockId}",
    params(("blockId" = Uuid, Path, description = "Block identifier")),
    responses(
        (status = 200, description = "Block deleted"),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Block not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["itinerary"],
    operation_id = "deleteItineraryBlock"
)]
#[delete("/block/{blockId}")]
pub async fn delete_block(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user = require_role(&session, USER_OR_ADMIN)?;
    state
        .itinerary
        .delete_block(path.into_inner(), user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(Envelope::message("Itinerary block deleted successfully")))
}
