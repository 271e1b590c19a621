use crate::{
    auth::CurrentUser,
    error::AppError,
    models::UserUpdate,
    policy::{authorize, Action},
    state::AppState,
};
use actix_web::{get, put, web, HttpResponse, Responder};
use validator::Validate;

/// Lists every user. Admins and managers only.
#[get("")]
pub async fn list_users(
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<impl Responder, AppError> {
    authorize(&actor, Action::ListUsers)?;
    let users = state.users.find_all().await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Returns the authenticated user's own profile.
#[get("/me")]
pub async fn get_me(CurrentUser(actor): CurrentUser) -> Result<impl Responder, AppError> {
    authorize(&actor, Action::ViewOwnProfile)?;
    Ok(HttpResponse::Ok().json(actor))
}

/// Partially updates a user profile.
///
/// Anyone may update themselves; only admins may update other users.
///
/// ## Responses:
/// - `200 OK`: the updated user.
/// - `403 Forbidden`: the actor may not edit this user.
/// - `404 Not Found`: no user with that id.
#[put("/{id}")]
pub async fn update_user(
    state: web::Data<AppState>,
    user_id: web::Path<String>,
    user_data: web::Json<UserUpdate>,
    CurrentUser(actor): CurrentUser,
) -> Result<impl Responder, AppError> {
    let target_id = user_id.into_inner();
    authorize(
        &actor,
        Action::UpdateUser {
            target_id: &target_id,
        },
    )?;
    user_data.validate()?;

    let updated = state.users.update_fields(&target_id, &user_data).await?;
    log::info!("User {} updated profile {}", actor.id, target_id);
    Ok(HttpResponse::Ok().json(updated))
}
