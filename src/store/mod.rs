//! Schemaless document storage.
//!
//! Records live as flat JSON field maps ([`Document`]) in named collections, each
//! keyed by a unique string `id`. The [`DocumentStore`] trait is the only way the
//! repositories touch storage; [`MemoryStore`] and [`PgStore`] implement it.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;

use crate::codec::Document;
use crate::error::AppError;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// The collections the application keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Tasks,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Users, Collection::Tasks];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Tasks => "tasks",
        }
    }
}

/// One predicate on a top-level document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value. `null` also matches a missing field.
    Eq(String, Value),
    /// Field differs from the value. A missing field also matches.
    Ne(String, Value),
    /// Field is a string ordered strictly before the given string (bytewise).
    Lt(String, String),
}

impl Condition {
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Condition::Eq(field, expected) => {
                field_equals(document.get(field.as_str()), expected)
            }
            Condition::Ne(field, expected) => {
                !field_equals(document.get(field.as_str()), expected)
            }
            Condition::Lt(field, bound) => matches!(
                document.get(field.as_str()),
                Some(Value::String(value)) if value.as_str() < bound.as_str()
            ),
        }
    }
}

fn field_equals(actual: Option<&Value>, expected: &Value) -> bool {
    match actual {
        Some(value) => value == expected,
        None => expected.is_null(),
    }
}

/// A conjunction of conditions. The empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Eq(field.to_string(), value.into()));
        self
    }

    pub fn ne(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Ne(field.to_string(), value.into()));
        self
    }

    pub fn lt(mut self, field: &str, bound: impl Into<String>) -> Self {
        self.conditions
            .push(Condition::Lt(field.to_string(), bound.into()));
        self
    }

    pub fn by_id(id: &str) -> Self {
        Self::new().eq("id", id)
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|c| c.matches(document))
    }
}

/// Storage backend for documents.
///
/// Implementations must return documents in insertion order and reject a second
/// document with an existing `id` as [`AppError::Conflict`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: Collection, document: Document) -> Result<(), AppError>;

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, AppError>;

    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, AppError>;

    /// Merges `fields` into the document with the given id. Returns `false` if
    /// no document matched. The `id` field itself is never rewritten.
    async fn update_one(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
    ) -> Result<bool, AppError>;

    /// Removes the document with the given id. Returns `false` if none existed.
    async fn delete_one(&self, collection: Collection, id: &str) -> Result<bool, AppError>;

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, AppError>;

    /// Releases the backend's resources. Called once at shutdown.
    async fn close(&self) {}
}

/// Reads the `id` field every stored document must carry.
pub(crate) fn document_id(document: &Document) -> Result<String, AppError> {
    match document.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        _ => Err(AppError::InternalServerError(
            "Document is missing a string id".into(),
        )),
    }
}
