#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, web, App, Error};
use serde_json::{json, Value};
use taskdesk::auth::{AuthMiddleware, AuthResponse};
use taskdesk::cors::cors;
use taskdesk::models::User;
use taskdesk::routes;
use taskdesk::store::MemoryStore;
use taskdesk::AppState;

pub const PASSWORD: &str = "Password123!";
pub const JWT_SECRET: &str = "integration-test-secret";

/// Helper struct to hold auth details
pub struct TestUser {
    pub token: String,
    pub user: User,
}

impl TestUser {
    pub fn id(&self) -> &str {
        &self.user.id
    }

    pub fn auth(&self) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", self.token))
    }
}

pub fn state() -> web::Data<AppState> {
    web::Data::new(AppState::new(Arc::new(MemoryStore::new()), JWT_SECRET))
}

/// The full application as `main` assembles it, over the given state.
pub async fn init_app(
    state: web::Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    test::init_service(
        App::new()
            .app_data(state)
            .wrap(cors(&["*".to_string()]))
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await
}

/// Sends a request and returns the status with the parsed JSON body (`Null` if empty).
pub async fn send(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    req: Request,
) -> (StatusCode, Value) {
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            panic!("Non-JSON body: {:?}", String::from_utf8_lossy(&body))
        })
    };
    (status, json)
}

pub async fn register(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    email: &str,
    role: &str,
) -> TestUser {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": email,
            "full_name": email.split('@').next().unwrap_or(email),
            "role": role,
            "password": PASSWORD
        }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK, "Registration failed. Body: {}", body);

    let auth: AuthResponse =
        serde_json::from_value(body).expect("Failed to parse registration response");
    TestUser {
        token: auth.access_token,
        user: auth.user,
    }
}

pub async fn create_task(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    as_user: &TestUser,
    payload: Value,
) -> Value {
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(as_user.auth())
        .set_json(payload)
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK, "Create task failed. Body: {}", body);
    body
}

pub async fn update_task(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    as_user: &TestUser,
    task_id: &str,
    payload: Value,
) -> (StatusCode, Value) {
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", task_id))
        .insert_header(as_user.auth())
        .set_json(payload)
        .to_request();
    send(app, req).await
}

pub async fn get(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    as_user: &TestUser,
    uri: &str,
) -> (StatusCode, Value) {
    let req = test::TestRequest::get()
        .uri(uri)
        .insert_header(as_user.auth())
        .to_request();
    send(app, req).await
}
