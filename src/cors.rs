use actix_cors::Cors;

/// Builds the CORS policy for the configured origin allow-list.
///
/// `*` anywhere in the list allows every origin.
pub fn cors(origins: &[String]) -> Cors {
    let cors = if origins.iter().any(|origin| origin == "*") {
        Cors::default().allow_any_origin()
    } else {
        origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .supports_credentials()
    };
    cors.allow_any_method().allow_any_header().max_age(3600)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header;
    use actix_web::{test, web, App, HttpResponse};

    async fn call_with_origin(origins: &[String], origin: &str) -> Option<String> {
        let app = test::init_service(
            App::new()
                .wrap(cors(origins))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, origin))
            .to_request();
        let resp = test::call_service(&app, req).await;
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    #[actix_rt::test]
    async fn test_allow_list() {
        let origins = vec!["https://app.example".to_string()];
        assert_eq!(
            call_with_origin(&origins, "https://app.example").await.as_deref(),
            Some("https://app.example")
        );
    }

    #[actix_rt::test]
    async fn test_wildcard_allows_any_origin() {
        let origins = vec!["*".to_string()];
        assert!(call_with_origin(&origins, "https://anything.example")
            .await
            .is_some());
    }
}
