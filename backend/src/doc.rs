//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the specification for the REST API: every endpoint
//! from the inbound layer, the response envelope and error schemas, and the
//! session cookie security scheme. Swagger UI serves the document in debug
//! builds at `/docs`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::account::Role;
use crate::domain::itinerary::BlockType;
use crate::domain::ErrorCode;
use crate::inbound::http::auth::{LoginPayload, LoginRequest, RegisterRequest, RegisteredPayload};
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::itinerary::{
    BlockPayload, CreateBlockRequest, CreateDayRequest, DayPayload, UpdateBlockRequest,
    UpdateDayRequest,
};
use crate::inbound::http::trips::{CreateTripRequest, TripPayload, UpdateTripRequest};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "GlobeTrotter backend API",
        description = "Session-authenticated travel planning: accounts, trips, and itineraries."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::trips::create_trip,
        crate::inbound::http::trips::list_trips,
        crate::inbound::http::trips::get_trip,
        crate::inbound::http::trips::update_trip,
        crate::inbound::http::trips::delete_trip,
        crate::inbound::http::itinerary::create_day,
        crate::inbound::http::itinerary::list_days,
        crate::inbound::http::itinerary::update_day,
        crate::inbound::http::itinerary::delete_day,
        crate::inbound::http::itinerary::create_block,
        crate::inbound::http::itinerary::list_blocks,
        crate::inbound::http::itinerary::update_block,
        crate::inbound::http::itinerary::delete_block,
        crate::inbound::http::health::live,
        crate::inbound::http::health::ready,
    ),
    components(schemas(
        ErrorBody,
        ErrorCode,
        Role,
        BlockType,
        RegisterRequest,
        RegisteredPayload,
        LoginRequest,
        LoginPayload,
        CreateTripRequest,
        UpdateTripRequest,
        TripPayload,
        CreateDayRequest,
        UpdateDayRequest,
        DayPayload,
        CreateBlockRequest,
        UpdateBlockRequest,
        BlockPayload,
        Envelope<RegisteredPayload>,
        Envelope<LoginPayload>,
        Envelope<TripPayload>,
        Envelope<Vec<TripPayload>>,
        Envelope<DayPayload>,
        Envelope<Vec<DayPayload>>,
        Envelope<BlockPayload>,
        Envelope<Vec<BlockPayload>>,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "trips", description = "Trip planning"),
        (name = "itinerary", description = "Itinerary days and blocks"),
        (name = "health", description = "Health checks")
    )
)]
pub struct ApiDoc;
