use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::repository::{TaskRepository, UserRepository};
use crate::store::DocumentStore;

/// Everything a handler needs, injected as `web::Data<AppState>`.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub users: UserRepository,
    pub tasks: TaskRepository,
    pub tokens: TokenKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, jwt_secret: &str) -> Self {
        Self {
            users: UserRepository::new(store.clone()),
            tasks: TaskRepository::new(store.clone()),
            tokens: TokenKeys::new(jwt_secret),
            store,
        }
    }
}
