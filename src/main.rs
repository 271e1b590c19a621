use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use taskdesk::{
    auth::AuthMiddleware,
    config::{Config, StoreBackend},
    cors::cors,
    routes,
    store::{DocumentStore, MemoryStore, PgStore},
    AppError, AppState,
};

async fn open_store(config: &Config) -> Result<Arc<dyn DocumentStore>, AppError> {
    match (config.store_backend, config.database_url.as_deref()) {
        (StoreBackend::Postgres, Some(url)) => Ok(Arc::new(PgStore::connect(url).await?)),
        (StoreBackend::Postgres, None) => Err(AppError::InternalServerError(
            "DATABASE_URL must be set for the postgres store".into(),
        )),
        (StoreBackend::Memory, _) => {
            log::warn!("Using the in-memory store; data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let store = open_store(&config)
        .await
        .map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState::new(store, &config.jwt_secret));
    let app_state = state.clone();

    log::info!("Starting TaskDesk server at {}", config.server_url());
    let cors_origins = config.cors_origins.clone();
    let result = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(cors(&cors_origins))
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await;

    state.store.close().await;
    log::info!("Server stopped");
    result
}
