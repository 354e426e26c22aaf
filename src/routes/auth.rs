use crate::{
    auth::{CurrentUser, LoginRequest, TokenResponse},
    error::AppError,
    models::{NewUser, UserInput, UserResponse},
    state::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use log::info;
use validator::Validate;

/// Register a new user
///
/// Stores the email with an Argon2id hash of the password.
///
/// ## Responses:
/// - `201 Created`: the new user as `UserResponse`.
/// - `409 Conflict`: the email is already registered.
/// - `422 Unprocessable Entity`: invalid email or empty password.
#[post("")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<UserInput>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let UserInput { email, password } = register_data.into_inner();

    if state.users.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "User with email: {} already exists",
            email
        )));
    }

    let password_hash = state.hasher.hash(&password)?;
    // The store's uniqueness check still guards against concurrent registrations.
    let user = state
        .users
        .create_user(NewUser {
            email,
            password_hash,
        })
        .await?;

    info!("Registered user {}", user.id);
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Current user
///
/// Returns the principal behind the bearer token.
#[get("")]
pub async fn me(CurrentUser(user): CurrentUser) -> impl Responder {
    HttpResponse::Ok().json(UserResponse::from(user))
}

/// Login user
///
/// Verifies the credentials and returns a bearer token. Unknown emails and
/// wrong passwords get the same response.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let invalid = || AppError::Unauthorized("Invalid credentials".into());

    let user = match state.users.find_user_by_email(&login_data.email).await? {
        Some(user) => user,
        None => {
            // Spend the same Argon2 work as a wrong password would.
            state.hasher.verify_decoy(&login_data.password);
            return Err(invalid());
        }
    };

    if !state.hasher.verify(&login_data.password, &user.password_hash)? {
        return Err(invalid());
    }

    let token = state.tokens.issue(user.id)?;
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
}
