use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{document_id, Collection, Condition, DocumentStore, Filter};
use crate::codec::Document;
use crate::error::AppError;

/// PostgreSQL-backed document store.
///
/// Each collection is a table of JSONB documents keyed by `id`; `seq` preserves
/// insertion order.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects to `database_url` and creates the collection tables if needed.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Wraps an existing pool. The schema is assumed to be in place.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        for collection in Collection::ALL {
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    seq BIGSERIAL,
                    id TEXT PRIMARY KEY,
                    doc JSONB NOT NULL
                )",
                collection.name()
            );
            sqlx::query(&ddl).execute(&self.pool).await?;
        }
        log::info!("Document tables ready");
        Ok(())
    }
}

/// Appends `AND <predicate>` for every condition of `filter`.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    builder.push(" WHERE TRUE");
    for condition in filter.conditions() {
        match condition {
            Condition::Eq(field, Value::Null) => {
                builder
                    .push(" AND (doc -> ")
                    .push_bind(field.clone())
                    .push(" IS NULL OR doc -> ")
                    .push_bind(field.clone())
                    .push(" = 'null'::jsonb)");
            }
            Condition::Eq(field, value) => {
                builder
                    .push(" AND doc -> ")
                    .push_bind(field.clone())
                    .push(" = ")
                    .push_bind(Json(value.clone()));
            }
            Condition::Ne(field, Value::Null) => {
                builder
                    .push(" AND (doc -> ")
                    .push_bind(field.clone())
                    .push(" IS NOT NULL AND doc -> ")
                    .push_bind(field.clone())
                    .push(" <> 'null'::jsonb)");
            }
            Condition::Ne(field, value) => {
                builder
                    .push(" AND (doc -> ")
                    .push_bind(field.clone())
                    .push(" IS NULL OR doc -> ")
                    .push_bind(field.clone())
                    .push(" <> ")
                    .push_bind(Json(value.clone()))
                    .push(")");
            }
            Condition::Lt(field, bound) => {
                builder
                    .push(" AND jsonb_typeof(doc -> ")
                    .push_bind(field.clone())
                    .push(") = 'string' AND (doc ->> ")
                    .push_bind(field.clone())
                    .push(") COLLATE \"C\" < ")
                    .push_bind(bound.clone());
            }
        }
    }
}

fn into_document(value: Value) -> Result<Document, AppError> {
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(AppError::DatabaseError(format!(
            "Stored document is not an object: {}",
            other
        ))),
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert(&self, collection: Collection, document: Document) -> Result<(), AppError> {
        let id = document_id(&document)?;
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", collection.name());
        sqlx::query(&sql)
            .bind(id)
            .bind(Json(Value::Object(document)))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, AppError> {
        let mut builder = QueryBuilder::new("SELECT doc FROM ");
        builder.push(collection.name());
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY seq LIMIT 1");

        let row = builder
            .build_query_as::<(Json<Value>,)>()
            .fetch_optional(&self.pool)
            .await?;
        row.map(|(Json(value),)| into_document(value)).transpose()
    }

    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, AppError> {
        let mut builder = QueryBuilder::new("SELECT doc FROM ");
        builder.push(collection.name());
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY seq");

        let rows = builder
            .build_query_as::<(Json<Value>,)>()
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|(Json(value),)| into_document(value))
            .collect()
    }

    async fn update_one(
        &self,
        collection: Collection,
        id: &str,
        mut fields: Document,
    ) -> Result<bool, AppError> {
        fields.remove("id");
        let sql = format!(
            "UPDATE {} SET doc = doc || $2 WHERE id = $1",
            collection.name()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(Json(Value::Object(fields)))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_one(&self, collection: Collection, id: &str) -> Result<bool, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", collection.name());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, AppError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM ");
        builder.push(collection.name());
        push_filter(&mut builder, filter);

        let (count,) = builder
            .build_query_as::<(i64,)>()
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn close(&self) {
        self.pool.close().await;
        log::info!("Database pool closed");
    }
}
