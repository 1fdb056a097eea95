//! Liveness and readiness probes.
//!
//! `/health/live` answers as soon as the process serves requests;
//! `/health/ready` stays `503` until startup wiring (including the database
//! pool, when configured) has completed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use actix_web::{get, web, HttpResponse};
use serde_json::json;

/// Readiness flag shared with the startup path.
#[derive(Clone, Default)]
pub struct HealthState {
    ready: Arc<AtomicBool>,
}

impl HealthState {
    /// Fresh, not-yet-ready state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark startup as complete.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// True once startup has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    responses((status = 200, description = "Process is serving requests")),
    tags = ["health"],
    operation_id = "healthLive",
    security([])
)]
#[get("/live")]
pub async fn live() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Startup complete"),
        (status = 503, description = "Still starting")
    ),
    tags = ["health"],
    operation_id = "healthReady",
    security([])
)]
#[get("/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_ready() {
        HttpResponse::Ok().json(json!({ "status": "ok" }))
    } else {
        HttpResponse::ServiceUnavailable().json(json!({ "status": "starting" }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, web, App};

    use super::*;

    #[actix_web::test]
    async fn live_always_answers() {
        let app = actix_test::init_service(App::new().service(web::scope("/health").service(live)))
            .await;
        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/health/live").to_request())
                .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn ready_flips_with_the_flag() {
        let state = HealthState::new();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .service(web::scope("/health").service(ready)),
        )
        .await;

        let starting =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/health/ready").to_request())
                .await;
        assert_eq!(starting.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.mark_ready();
        let ready_now =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/health/ready").to_request())
                .await;
        assert_eq!(ready_now.status(), StatusCode::OK);
    }
}
