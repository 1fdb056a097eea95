//! Trip API handlers.
//!
//! ```text
//! POST   /api/trip
//! GET    /api/trip
//! GET    /api/trip/{tripId}
//! PUT    /api/trip/{tripId}
//! DELETE /api/trip/{tripId}
//! ```
//!
//! All routes require an authenticated session with an allowed primary role.
//! A trip that exists but belongs to someone else renders as `404`.

use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::trip::{Trip, TripDraft, TripPatch};

use super::envelope::Envelope;
use super::error::ErrorBody;
use super::guard::{require_role, USER_OR_ADMIN};
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{parse_date, parse_optional_date, require, FieldName};
use super::ApiResult;

/// Request body for `POST /api/trip`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    /// Trip title; required.
    pub title: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// First day, `YYYY-MM-DD`; required.
    pub start_date: Option<String>,
    /// Last day, `YYYY-MM-DD`; required.
    pub end_date: Option<String>,
    /// Optional cover photo URL.
    pub cover_photo_url: Option<String>,
}

/// Request body for `PUT /api/trip/{tripId}`; all fields optional, at least
/// one required.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripRequest {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement start date, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Replacement end date, `YYYY-MM-DD`.
    pub end_date: Option<String>,
    /// Replacement cover photo URL.
    pub cover_photo_url: Option<String>,
}

/// Wire representation of a trip.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripPayload {
    /// Trip identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Trip title.
    pub title: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// First day, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day, `YYYY-MM-DD`.
    pub end_date: String,
    /// Optional cover photo URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_photo_url: Option<String>,
    /// Creation timestamp, RFC 3339.
    pub created_at: DateTime<Utc>,
}

impl From<Trip> for TripPayload {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id,
            user_id: trip.user_id,
            title: trip.title,
            description: trip.description,
            start_date: trip.start_date.to_string(),
            end_date: trip.end_date.to_string(),
            cover_photo_url: trip.cover_photo_url,
            created_at: trip.created_at,
        }
    }
}

/// Create a trip owned by the caller.
#[utoipa::path(
    post,
    path = "/api/trip",
    request_body = CreateTripRequest,
    responses(
        (status = 201, description = "Trip created", body = Envelope<TripPayload>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["trips"],
    operation_id = "createTrip"
)]
#[post("")]
pub async fn create_trip(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateTripRequest>,
) -> ApiResult<HttpResponse> {
    let user = require_role(&session, USER_OR_ADMIN)?;
    let body = payload.into_inner();
    let draft = TripDraft {
        title: require(body.title, FieldName::new("title"))?,
        description: body.description,
        start_date: parse_date(
            &require(body.start_date, FieldName::new("startDate"))?,
            FieldName::new("startDate"),
        )?,
        end_date: parse_date(
            &require(body.end_date, FieldName::new("endDate"))?,
            FieldName::new("endDate"),
        )?,
        cover_photo_url: body.cover_photo_url,
    };
    let trip = state.trips.create(user.user_id, draft).await?;
    Ok(HttpResponse::Created().json(Envelope::with_message(
        "Trip created successfully",
        TripPayload::from(trip),
    )))
}

/// List the caller's trips, newest first.
#[utoipa::path(
    get,
    path = "/api/trip",
    responses(
        (status = 200, description = "Trips", body = Envelope<Vec<TripPayload>>),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["trips"],
    operation_id = "listTrips"
)]
#[get("")]
pub async fn list_trips(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = require_role(&session, USER_OR_ADMIN)?;
    let trips = state.trips.list(user.user_id).await?;
    let payload: Vec<TripPayload> = trips.into_iter().map(TripPayload::from).collect();
    Ok(HttpResponse::Ok().json(Envelope::data(payload)))
}

/// Fetch one of the caller's trips.
#[utoipa::path(
    get,
    path = "/api/trip/{tripId}",
    params(("tripId" = Uuid, Path, description = "Trip identifier")),
    responses(
        (status = 200, description = "Trip", body = Envelope<TripPayload>),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Trip not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["trips"],
    operation_id = "getTrip"
)]
#[get("/{tripId}")]
pub async fn get_trip(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user = require_role(&session, USER_OR_ADMIN)?;
    let trip = state.trips.get(path.into_inner(), user.user_id).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(TripPayload::from(trip))))
}

/// Partially update one of the caller's trips.
#[utoipa::path(
    put,
    path = "/api/trip/{tripId}",
    params(("tripId" = Uuid, Path, description = "Trip identifier")),
    request_body = UpdateTripRequest,
    responses(
        (status = 200, description = "Trip updated", body = Envelope<TripPayload>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Trip not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["trips"],
    operation_id = "updateTrip"
)]
#[put("/{tripId}")]
pub async fn update_trip(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateTripRequest>,
) -> ApiResult<HttpResponse> {
    let user = require_role(&session, USER_OR_ADMIN)?;
    let body = payload.into_inner();
    let patch = TripPatch {
        title: body.title,
        description: body.description,
        start_date: parse_optional_date(body.start_date.as_deref(), FieldName::new("startDate"))?,
        end_date: parse_optional_date(body.end_date.as_deref(), FieldName::new("endDate"))?,
        cover_photo_url: body.cover_photo_url,
    };
    let trip = state
        .trips
        .update(path.into_inner(), user.user_id, patch)
        .await?;
    Ok(HttpResponse::Ok().json(Envelope::with_message(
        "Trip updated successfully",
        TripPayload::from(trip),
    )))
}

/// Delete one of the caller's trips, cascading to its itinerary.
#[utoipa::path(
    delete,
    path = "/api/trip/{tripId}",
    params(("tripId" = Uuid, Path, description = "Trip identifier")),
    responses(
        (status = 200, description = "Trip deleted"),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Trip not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["trips"],
    operation_id = "deleteTrip"
)]
#[delete("/{tripId}")]
pub async fn delete_trip(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user = require_role(&session, USER_OR_ADMIN)?;
    state.trips.delete(path.into_inner(), user.user_id).await?;
    Ok(HttpResponse::Ok().json(Envelope::message("Trip deleted successfully")))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};

    use crate::inbound::http::test_utils::{
        register_and_login, test_session_middleware, test_state,
    };
    use crate::server::configure_api;

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(actix_web::web::Data::new(test_state()))
            .wrap(test_session_middleware())
            .configure(configure_api)
    }

    fn trip_body() -> Value {
        let start = Utc::now().date_naive();
        let end = start + Duration::days(4);
        json!({
            "title": "Summer in Lisbon",
            "startDate": start.to_string(),
            "endDate": end.to_string(),
        })
    }

    #[actix_web::test]
    async fn anonymous_requests_are_unauthorised() {
        let app = actix_test::init_service(test_app()).await;
        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/api/trip").to_request())
                .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn create_then_list_round_trips() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = register_and_login(&app).await;

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/trip")
                .cookie(cookie.clone())
                .set_json(trip_body())
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let created: Value = actix_test::read_body_json(created).await;
        assert_eq!(created["message"], json!("Trip created successfully"));

        let listed = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/trip")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(listed.status(), StatusCode::OK);
        let listed: Value = actix_test::read_body_json(listed).await;
        assert_eq!(
            listed["data"][0]["title"],
            json!("Summer in Lisbon")
        );
    }

    #[actix_web::test]
    async fn create_rejects_past_start_date() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = register_and_login(&app).await;

        let mut body = trip_body();
        body["startDate"] = json!((Utc::now().date_naive() - Duration::days(1)).to_string());
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/trip")
                .cookie(cookie)
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], json!("Trip start date cannot be in the past"));
    }

    #[actix_web::test]
    async fn update_with_no_fields_is_rejected() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = register_and_login(&app).await;

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/trip")
                .cookie(cookie.clone())
                .set_json(trip_body())
                .to_request(),
        )
        .await;
        let created: Value = actix_test::read_body_json(created).await;
        let trip_id = created["data"]["id"].as_str().expect("trip id").to_owned();

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/trip/{trip_id}"))
                .cookie(cookie)
                .set_json(json!({}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], json!("No fields to update"));
    }

    #[actix_web::test]
    async fn unknown_trip_is_not_found() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = register_and_login(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/trip/{}", uuid::Uuid::new_v4()))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], json!("Trip not found"));
    }

    #[actix_web::test]
    async fn delete_removes_the_trip() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = register_and_login(&app).await;

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/trip")
                .cookie(cookie.clone())
                .set_json(trip_body())
                .to_request(),
        )
        .await;
        let created: Value = actix_test::read_body_json(created).await;
        let trip_id = created["data"]["id"].as_str().expect("trip id").to_owned();

        let deleted = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/trip/{trip_id}"))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(deleted.status(), StatusCode::OK);

        let missing = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/trip/{trip_id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
