#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{http::header, test};
use serde_json::json;
use taskvault::auth::TokenResponse;
use taskvault::config::{HashingSettings, JwtSettings};
use taskvault::models::UserResponse;
use taskvault::store::InMemoryStore;
use taskvault::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn jwt_settings() -> JwtSettings {
    JwtSettings {
        secret: TEST_SECRET.to_string(),
        algorithm: "HS256".to_string(),
        access_token_expire_minutes: 30,
    }
}

/// Cheap Argon2 parameters so the suites stay fast.
pub fn hashing_settings() -> HashingSettings {
    HashingSettings {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn test_state() -> (AppState, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(&jwt_settings(), &hashing_settings(), store.clone(), store.clone())
        .expect("test settings are valid");
    (state, store)
}

// Helper struct to hold auth details
pub struct TestUser {
    pub id: i32,
    pub token: String,
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub async fn register_and_login_user(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> Result<TestUser, String> {
    let req_register = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp_register = test::call_service(app, req_register).await;
    let status = resp_register.status();
    let body = test::read_body(resp_register).await;
    if !status.is_success() {
        return Err(format!(
            "Failed to register user. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }
    let user: UserResponse = serde_json::from_slice(&body)
        .map_err(|e| format!("Failed to parse registration response: {}", e))?;

    let req_login = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp_login = test::call_service(app, req_login).await;
    let status = resp_login.status();
    let body = test::read_body(resp_login).await;
    if !status.is_success() {
        return Err(format!(
            "Failed to log in. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }
    let token: TokenResponse = serde_json::from_slice(&body)
        .map_err(|e| format!("Failed to parse login response: {}", e))?;

    Ok(TestUser {
        id: user.id,
        token: token.access_token,
    })
}
