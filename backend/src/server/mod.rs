//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_cors::Cors;
use actix_session::{
    config::{CookieContentSecurity, PersistentSession, TtlExtensionPolicy},
    storage::CookieSessionStore,
    SessionMiddleware,
};
use actix_web::body::{BoxBody, EitherBody};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
use tracing::warn;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::itinerary::{AllowOverlaps, OverlapPolicy, RejectOverlaps};
use crate::domain::ports::SystemClock;
use crate::domain::{AccountService, ItineraryService, TripService};
use crate::inbound::http::auth::{login, register};
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::itinerary::{
    create_block, create_day, delete_block, delete_day, list_blocks, list_days, update_block,
    update_day,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::trips::{create_trip, delete_trip, get_trip, list_trips, update_trip};
use crate::middleware::trace::Trace;
use crate::outbound::memory::{
    MemoryItineraryRepository, MemoryStore, MemoryTripRepository, MemoryUserRepository,
};
use crate::outbound::persistence::{
    DieselItineraryRepository, DieselTripRepository, DieselUserRepository,
};
use crate::outbound::security::BcryptHasher;

/// Register every REST endpoint under its scope.
///
/// Session middleware and shared state are supplied by the caller, so tests
/// can mount the same route table over in-memory services.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/auth").service(register).service(login))
        .service(
            web::scope("/api/trip")
                .service(create_trip)
                .service(list_trips)
                .service(get_trip)
                .service(update_trip)
                .service(delete_trip),
        )
        .service(
            web::scope("/api/itinerary-days")
                .service(update_day)
                .service(delete_day)
                .service(create_day)
                .service(list_days),
        )
        .service(
            web::scope("/api/itinerary/blocks")
                .service(update_block)
                .service(delete_block)
                .service(create_block)
                .service(list_blocks),
        );
}

/// Build the services over the configured storage backend.
///
/// A database pool selects the Diesel adapters; without one the server runs
/// on in-memory repositories, which lose all state on restart.
fn build_http_state(config: &ServerConfig) -> HttpState {
    let overlap_policy: Arc<dyn OverlapPolicy> = if config.reject_overlaps {
        Arc::new(RejectOverlaps)
    } else {
        Arc::new(AllowOverlaps)
    };
    match &config.db_pool {
        Some(pool) => HttpState::new(
            AccountService::new(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(BcryptHasher::new()),
            ),
            TripService::new(
                Arc::new(DieselTripRepository::new(pool.clone())),
                Arc::new(SystemClock),
            ),
            ItineraryService::new(
                Arc::new(DieselItineraryRepository::new(pool.clone())),
                overlap_policy,
            ),
        ),
        None => {
            warn!("no database pool configured; using in-memory repositories");
            let store = MemoryStore::new();
            HttpState::new(
                AccountService::new(
                    Arc::new(MemoryUserRepository::new(store.clone())),
                    Arc::new(BcryptHasher::new()),
                ),
                TripService::new(
                    Arc::new(MemoryTripRepository::new(store.clone())),
                    Arc::new(SystemClock),
                ),
                ItineraryService::new(
                    Arc::new(MemoryItineraryRepository::new(store)),
                    overlap_policy,
                ),
            )
        }
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    cors_origins: Vec<String>,
}

fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(["GET", "POST", "PUT", "DELETE"])
        .allowed_headers([
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
        ])
        .supports_credentials()
        .max_age(3600);
    if origins.is_empty() {
        // Frontend dev server default.
        cors.allowed_origin("http://localhost:5173")
    } else {
        origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
        cors_origins,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(actix_web::cookie::time::Duration::hours(4))
                .session_ttl_extension_policy(TtlExtensionPolicy::OnEveryRequest),
        )
        .build();

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(session)
        .wrap(Trace)
        .wrap(build_cors(&cors_origins))
        .configure(configure_api)
        .service(web::scope("/health").service(live).service(ready));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct the HTTP server from the provided configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        cors_origins,
        db_pool: _,
        reject_overlaps: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
            cors_origins: cors_origins.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
