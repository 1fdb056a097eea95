//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test as actix_test;
use serde_json::json;

use crate::domain::itinerary::AllowOverlaps;
use crate::domain::ports::SystemClock;
use crate::domain::{AccountService, ItineraryService, TripService};
use crate::outbound::memory::{
    MemoryItineraryRepository, MemoryStore, MemoryTripRepository, MemoryUserRepository,
};
use crate::outbound::security::BcryptHasher;

use super::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Services wired over a fresh in-memory store.
///
/// Bcrypt runs at its minimum cost so login-heavy tests stay fast.
pub fn test_state() -> HttpState {
    let store = MemoryStore::new();
    HttpState::new(
        AccountService::new(
            Arc::new(MemoryUserRepository::new(store.clone())),
            Arc::new(BcryptHasher::with_cost(4)),
        ),
        TripService::new(
            Arc::new(MemoryTripRepository::new(store.clone())),
            Arc::new(SystemClock),
        ),
        ItineraryService::new(
            Arc::new(MemoryItineraryRepository::new(store)),
            Arc::new(AllowOverlaps),
        ),
    )
}

/// Register a fixture user and log in, returning the session cookie.
pub async fn register_and_login<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let registered = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "email": "ada@example.com",
                "phone": "+15551234567",
                "password": "secret1",
                "firstName": "Ada",
                "lastName": "Lovelace",
            }))
            .to_request(),
    )
    .await;
    assert!(
        registered.status().is_success(),
        "fixture registration failed: {}",
        registered.status()
    );

    let login = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "ada@example.com", "password": "secret1" }))
            .to_request(),
    )
    .await;
    assert!(login.status().is_success(), "fixture login failed");
    login
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
