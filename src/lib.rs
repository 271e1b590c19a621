#![doc = "The `taskdesk` library crate."]
#![doc = ""]
#![doc = "Role-based task management: authentication, the user directory, tasks with"]
#![doc = "role-scoped visibility, and dashboard statistics, stored as schemaless documents."]
#![doc = "It is used by the main binary (`main.rs`) to construct and run the application."]

pub mod auth;
pub mod codec;
pub mod config;
pub mod cors;
pub mod error;
pub mod models;
pub mod policy;
pub mod repository;
pub mod routes;
pub mod state;
pub mod store;

pub use error::AppError;
pub use state::AppState;
