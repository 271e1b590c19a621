use crate::{
    auth::{hash_password, verify_password, AuthError, AuthResponse},
    error::AppError,
    models::{LoginRequest, RegisterRequest, UserRecord},
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates a new user account and returns an authentication token.
///
/// ## Responses:
/// - `200 OK`: `{access_token, token_type, user}`.
/// - `400 Bad Request`: invalid input, or the email is already registered.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let request = register_data.into_inner();

    // Checked before hashing to skip the bcrypt work; the repository checks again on insert.
    if state.users.find_by_email(&request.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hashed_password = hash_password(&request.password)?;
    let record = UserRecord::new(request, hashed_password);
    state.users.insert(&record).await?;
    log::info!("Registered user {} as {:?}", record.user.id, record.user.role);

    let token = state.tokens.issue_token(&record.user.id)?;
    Ok(HttpResponse::Ok().json(AuthResponse::bearer(token, record.user)))
}

/// Login user
///
/// Authenticates a user and returns an authentication token. Unknown emails and
/// wrong passwords are indistinguishable to the caller.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let Some(record) = state.users.find_by_email(&login_data.email).await? else {
        return Err(AuthError::InvalidCredentials.into());
    };
    if !verify_password(&login_data.password, &record.hashed_password)? {
        log::info!("Failed login for user {}", record.user.id);
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens.issue_token(&record.user.id)?;
    Ok(HttpResponse::Ok().json(AuthResponse::bearer(token, record.user)))
}
