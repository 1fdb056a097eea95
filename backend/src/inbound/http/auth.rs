//! Authentication API handlers.
//!
//! ```text
//! POST /api/auth/register
//! POST /api/auth/login
//! ```
//!
//! Registration creates the account and its default role; login verifies
//! credentials and establishes the cookie session.

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::account::Role;
use crate::domain::RegistrationRequest;

use super::envelope::Envelope;
use super::error::ErrorBody;
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{require, FieldName};
use super::ApiResult;

/// Request body for `POST /api/auth/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Email address; unique.
    pub email: Option<String>,
    /// Phone number; unique.
    pub phone: Option<String>,
    /// Clear password, hashed server-side.
    pub password: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Optional home city.
    pub city: Option<String>,
    /// Optional home country.
    pub country: Option<String>,
    /// Optional biography.
    pub bio: Option<String>,
}

/// Payload returned on successful registration.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredPayload {
    /// Identifier of the new user.
    pub id: Uuid,
    /// Assigned roles.
    pub roles: Vec<Role>,
}

/// Request body for `POST /api/auth/login`.
///
/// The `email` field also accepts a registered phone number.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address or phone number.
    pub email: Option<String>,
    /// Clear password.
    pub password: Option<String>,
}

/// Payload returned on successful login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    /// Authenticated user id.
    pub user_id: Uuid,
    /// Registered email.
    pub email: String,
    /// Assigned roles, in assignment order.
    pub roles: Vec<Role>,
}

/// Register a new user account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = Envelope<RegisteredPayload>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 409, description = "Email or phone already registered", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = RegistrationRequest {
        email: require(body.email, FieldName::new("email"))?,
        phone: require(body.phone, FieldName::new("phone"))?,
        password: require(body.password, FieldName::new("password"))?,
        first_name: require(body.first_name, FieldName::new("firstName"))?,
        last_name: require(body.last_name, FieldName::new("lastName"))?,
        city: body.city,
        country: body.country,
        bio: body.bio,
    };
    let registered = state.accounts.register(request).await?;
    Ok(HttpResponse::Created().json(Envelope::with_message(
        "User registered successfully",
        RegisteredPayload {
            id: registered.user_id,
            roles: registered.roles,
        },
    )))
}

/// Verify credentials and establish the cookie session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = Envelope<LoginPayload>,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let identifier = require(body.email, FieldName::new("email"))?;
    let password = require(body.password, FieldName::new("password"))?;

    let user = state.accounts.login(&identifier, &password).await?;
    session.persist_user(&user)?;
    Ok(HttpResponse::Ok().json(Envelope::with_message(
        "Login successful",
        LoginPayload {
            user_id: user.user_id,
            email: user.email,
            roles: user.roles,
        },
    )))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use serde_json::{json, Value};

    use crate::inbound::http::test_utils::{test_session_middleware, test_state};
    use crate::server::configure_api;

    fn register_body() -> Value {
        json!({
            "email": "ada@example.com",
            "phone": "+15551234567",
            "password": "secret1",
            "firstName": "Ada",
            "lastName": "Lovelace",
        })
    }

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

    #[actix_web::test]
    async fn register_creates_user_with_default_role() {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(register_body())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["message"], json!("User registered successfully"));
        assert_eq!(body["data"]["roles"], json!(["USER"]));
    }

    #[actix_web::test]
    async fn register_rejects_missing_required_field() {
        let mut body = register_body();
        body.as_object_mut().expect("object body").remove("email");

        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("missing required field: email"));
    }

    #[actix_web::test]
    async fn duplicate_registration_conflicts() {
        let app = actix_test::init_service(test_app()).await;
        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let response = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/auth/register")
                    .set_json(register_body())
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), expected);
        }
    }

    #[actix_web::test]
    async fn login_sets_session_cookie() {
        let app = actix_test::init_service(test_app()).await;
        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(register_body())
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({ "email": "ada@example.com", "password": "secret1" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .response()
            .cookies()
            .any(|cookie| cookie.name() == "session"));

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], json!("Login successful"));
        assert_eq!(body["data"]["email"], json!("ada@example.com"));
    }

    #[actix_web::test]
    async fn wrong_password_and_unknown_user_share_a_message() {
        let app = actix_test::init_service(test_app()).await;
        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(register_body())
                .to_request(),
        )
        .await;

        let mut messages = Vec::new();
        for (email, password) in [
            ("ada@example.com", "wrong-password"),
            ("ghost@example.com", "secret1"),
        ] {
            let response = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/auth/login")
                    .set_json(json!({ "email": email, "password": password }))
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body: Value = actix_test::read_body_json(response).await;
            messages.push(body["message"].clone());
        }
        assert_eq!(messages[0], messages[1]);
    }

    #[actix_web::test]
    async fn login_accepts_phone_as_identifier() {
        let app = actix_test::init_service(test_app()).await;
        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(register_body())
                .to_request(),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({ "email": "+15551234567", "password": "secret1" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
