use std::env;
use std::str::FromStr;

use crate::error::AppError;

/// Secret used when `JWT_SECRET` is not set. Only suitable for development.
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::InternalServerError(format!(
                "STORE_BACKEND must be 'postgres' or 'memory', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    pub server_port: u16,
    pub server_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match var("STORE_BACKEND") {
            Some(value) => value.parse()?,
            None => StoreBackend::Postgres,
        };

        let database_url = var("DATABASE_URL").filter(|url| !url.is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(AppError::InternalServerError(
                "DATABASE_URL must be set for the postgres store".into(),
            ));
        }

        let jwt_secret = match var("JWT_SECRET").filter(|secret| !secret.is_empty()) {
            Some(secret) => secret,
            None => {
                log::warn!("JWT_SECRET is not set; using the development default");
                DEFAULT_JWT_SECRET.to_string()
            }
        };

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let server_port = match var("SERVER_PORT") {
            Some(port) => port.parse().map_err(|_| {
                AppError::InternalServerError(format!("SERVER_PORT must be a number, got '{}'", port))
            })?,
            None => 8080,
        };

        Ok(Self {
            store_backend,
            database_url,
            jwt_secret,
            cors_origins,
            server_port,
            server_host: var("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
