pub mod auth;
pub mod dashboard;
pub mod health;
pub mod tasks;
pub mod users;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::error::AppError;

/// Mounts every `/api` route. Expects to be wrapped in [`AuthMiddleware`](crate::auth::AuthMiddleware).
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::scope("/auth")
                .service(auth::login)
                .service(auth::register),
        )
        .service(
            web::scope("/users")
                .service(users::list_users)
                .service(users::get_me)
                .service(users::update_user),
        )
        .service(
            web::scope("/tasks")
                .service(tasks::get_my_tasks)
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        )
        .service(web::scope("/dashboard").service(dashboard::get_stats));
}

/// Answers unreadable JSON bodies with the usual `{"error": ...}` 400.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}
