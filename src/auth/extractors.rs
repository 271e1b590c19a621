use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;

use super::{AuthError, Claims};
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// The authenticated actor of a request.
///
/// Requires `AuthMiddleware` to have stored the token's claims. The user record
/// is loaded fresh for every request; a subject that no longer exists is
/// rejected as `unknown_user`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let subject = req.extensions().get::<Claims>().map(|c| c.sub.clone());
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let subject = subject.ok_or(AppError::from(AuthError::MissingToken))?;
            let state = state.ok_or_else(|| {
                AppError::InternalServerError("Application state not configured".into())
            })?;
            match state.users.find_by_id(&subject).await? {
                Some(user) => Ok(CurrentUser(user)),
                None => Err(AppError::from(AuthError::UnknownUser).into()),
            }
        })
    }
}
