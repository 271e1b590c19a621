use std::sync::Arc;

use crate::codec;
use crate::error::AppError;
use crate::models::{User, UserRecord, UserUpdate};
use crate::store::{Collection, DocumentStore, Filter};

#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Stores a new user.
    ///
    /// The email check and the insert are separate store calls, so two concurrent
    /// registrations with the same email can both succeed.
    pub async fn insert(&self, record: &UserRecord) -> Result<(), AppError> {
        if self.find_by_email(&record.user.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        self.store
            .insert(Collection::Users, codec::serialize(record)?)
            .await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .find_record(Filter::by_id(id))
            .await?
            .map(|record| record.user))
    }

    /// Looks a user up by email, including the password hash.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        self.find_record(Filter::new().eq("email", email)).await
    }

    pub async fn find_all(&self) -> Result<Vec<User>, AppError> {
        self.store
            .find_many(Collection::Users, &Filter::new())
            .await?
            .into_iter()
            .map(|fields| codec::deserialize::<UserRecord>(fields).map(|record| record.user))
            .collect()
    }

    /// Applies a partial update and returns the re-read user.
    ///
    /// A new email must not belong to another user. Like [`insert`](Self::insert),
    /// the check and the write are separate store calls.
    pub async fn update_fields(&self, id: &str, update: &UserUpdate) -> Result<User, AppError> {
        if let Some(email) = &update.email {
            if let Some(owner) = self.find_by_email(email).await? {
                if owner.user.id != id {
                    return Err(AppError::Conflict("Email already registered".into()));
                }
            }
        }
        let fields = codec::serialize(update)?;
        if !self.store.update_one(Collection::Users, id, fields).await? {
            return Err(AppError::NotFound("User not found".into()));
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    pub async fn count_all(&self) -> Result<u64, AppError> {
        self.store.count(Collection::Users, &Filter::new()).await
    }

    async fn find_record(&self, filter: Filter) -> Result<Option<UserRecord>, AppError> {
        self.store
            .find_one(Collection::Users, &filter)
            .await?
            .map(codec::deserialize)
            .transpose()
    }
}
