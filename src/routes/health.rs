use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::codec;

/// Liveness probe. Unauthenticated, outside `/api`; does not touch the store.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": codec::format_timestamp(&Utc::now())
    }))
}
