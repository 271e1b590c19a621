use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::codec;
use crate::error::AppError;
use crate::models::{Task, TaskStatus, TaskUpdate};
use crate::store::{Collection, DocumentStore, Filter};

/// Per-status task counts, optionally restricted to one assignee.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub overdue: u64,
}

#[derive(Clone)]
pub struct TaskRepository {
    store: Arc<dyn DocumentStore>,
}

impl TaskRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn insert(&self, task: &Task) -> Result<(), AppError> {
        self.store
            .insert(Collection::Tasks, codec::serialize(task)?)
            .await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Task>, AppError> {
        self.store
            .find_one(Collection::Tasks, &Filter::by_id(id))
            .await?
            .map(codec::deserialize)
            .transpose()
    }

    pub async fn find_all(&self) -> Result<Vec<Task>, AppError> {
        self.find_many(Filter::new()).await
    }

    pub async fn find_by_assignee(&self, user_id: &str) -> Result<Vec<Task>, AppError> {
        self.find_many(assignee_filter(Some(user_id))).await
    }

    /// Applies a partial update, stamps `updated_at`, and returns the re-read task.
    pub async fn update_fields(&self, id: &str, update: &TaskUpdate) -> Result<Task, AppError> {
        self.update_fields_at(id, update, Utc::now()).await
    }

    pub async fn update_fields_at(
        &self,
        id: &str,
        update: &TaskUpdate,
        now: DateTime<Utc>,
    ) -> Result<Task, AppError> {
        let mut fields = codec::serialize(update)?;
        fields.insert(
            "updated_at".to_string(),
            Value::String(codec::format_timestamp(&now)),
        );
        if !self.store.update_one(Collection::Tasks, id, fields).await? {
            return Err(AppError::NotFound("Task not found".into()));
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        if self.store.delete_one(Collection::Tasks, id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("Task not found".into()))
        }
    }

    /// Counts tasks matching the optional assignee and status.
    pub async fn count(
        &self,
        assignee: Option<&str>,
        status: Option<TaskStatus>,
    ) -> Result<u64, AppError> {
        let mut filter = assignee_filter(assignee);
        if let Some(status) = status {
            filter = filter.eq("status", status.as_str());
        }
        self.store.count(Collection::Tasks, &filter).await
    }

    /// Counts tasks due before `now` that are not completed.
    pub async fn count_overdue(
        &self,
        assignee: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let filter = assignee_filter(assignee)
            .lt("due_date", codec::format_timestamp(&now))
            .ne("status", TaskStatus::Completed.as_str());
        self.store.count(Collection::Tasks, &filter).await
    }

    /// All counts shown on the dashboard, as of `now`.
    pub async fn counts(
        &self,
        assignee: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<TaskCounts, AppError> {
        Ok(TaskCounts {
            total: self.count(assignee, None).await?,
            pending: self.count(assignee, Some(TaskStatus::Pending)).await?,
            in_progress: self.count(assignee, Some(TaskStatus::InProgress)).await?,
            completed: self.count(assignee, Some(TaskStatus::Completed)).await?,
            overdue: self.count_overdue(assignee, now).await?,
        })
    }

    async fn find_many(&self, filter: Filter) -> Result<Vec<Task>, AppError> {
        self.store
            .find_many(Collection::Tasks, &filter)
            .await?
            .into_iter()
            .map(codec::deserialize::<Task>)
            .collect()
    }
}

fn assignee_filter(assignee: Option<&str>) -> Filter {
    match assignee {
        Some(user_id) => Filter::new().eq("assigned_to", user_id),
        None => Filter::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Document;
    use crate::models::{TaskInput, TaskPriority};
    use crate::store::MemoryStore;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Field map for an arbitrary stored task, for tests that need to plant raw documents.
    fn raw_task(id: &str, extra: Value) -> Document {
        let mut fields = Document::new();
        fields.insert("id".into(), Value::String(id.into()));
        fields.insert("title".into(), Value::String("raw".into()));
        fields.insert("created_by".into(), Value::String("someone".into()));
        if let Value::Object(extra) = extra {
            fields.extend(extra);
        }
        fields
    }

    fn task(assignee: Option<&str>, due: Option<DateTime<Utc>>) -> Task {
        Task::new(
            TaskInput {
                title: "Write report".to_string(),
                description: None,
                priority: TaskPriority::High,
                due_date: due,
                assigned_to: assignee.map(str::to_string),
                category: Some("ops".to_string()),
            },
            "creator",
        )
    }

    fn setup() -> (Arc<MemoryStore>, TaskRepository) {
        let store = Arc::new(MemoryStore::new());
        let repository = TaskRepository::new(store.clone());
        (store, repository)
    }

    #[actix_rt::test]
    async fn test_insert_find_and_scope() {
        let (_, tasks) = setup();
        let mine = task(Some("alice"), None);
        let theirs = task(Some("bob"), None);
        let nobody = task(None, None);
        for t in [&mine, &theirs, &nobody] {
            tasks.insert(t).await.unwrap();
        }

        assert_eq!(tasks.find_by_id(&mine.id).await.unwrap(), Some(mine.clone()));
        assert_eq!(tasks.find_all().await.unwrap().len(), 3);
        assert_eq!(tasks.find_by_assignee("alice").await.unwrap(), vec![mine]);
        assert!(tasks.find_by_assignee("carol").await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_update_changes_only_supplied_fields() {
        let (_, tasks) = setup();
        let original = task(Some("alice"), None);
        tasks.insert(&original).await.unwrap();

        let later = original.updated_at + Duration::minutes(5);
        let update = TaskUpdate {
            status: Some(TaskStatus::InProgress),
            category: Some(None),
            ..Default::default()
        };
        let updated = tasks
            .update_fields_at(&original.id, &update, later)
            .await
            .unwrap();

        assert_eq!(updated.status, TaskStatus::InProgress);
        assert_eq!(updated.category, None);
        assert_eq!(updated.title, original.title);
        assert_eq!(updated.priority, original.priority);
        assert_eq!(updated.assigned_to, original.assigned_to);
        assert_eq!(updated.created_by, original.created_by);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.updated_at, later);
    }

    #[actix_rt::test]
    async fn test_update_and_delete_missing() {
        let (_, tasks) = setup();
        let err = tasks
            .update_fields("nope", &TaskUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(matches!(
            tasks.delete("nope").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[actix_rt::test]
    async fn test_delete_is_hard() {
        let (_, tasks) = setup();
        let t = task(None, None);
        tasks.insert(&t).await.unwrap();
        tasks.delete(&t.id).await.unwrap();
        assert!(tasks.find_by_id(&t.id).await.unwrap().is_none());
        assert_eq!(tasks.count(None, None).await.unwrap(), 0);
    }

    #[actix_rt::test]
    async fn test_counts_and_overdue() {
        let (_, tasks) = setup();
        let now = Utc::now();
        let past = Some(now - Duration::days(1));
        let future = Some(now + Duration::days(1));

        let overdue = task(Some("alice"), past);
        tasks.insert(&overdue).await.unwrap();
        tasks.insert(&task(Some("alice"), future)).await.unwrap();
        tasks.insert(&task(Some("bob"), past)).await.unwrap();
        let done = task(Some("alice"), None);
        tasks.insert(&done).await.unwrap();
        let update = TaskUpdate {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        tasks.update_fields(&done.id, &update).await.unwrap();

        let alice = tasks.counts(Some("alice"), now).await.unwrap();
        assert_eq!(
            alice,
            TaskCounts {
                total: 3,
                pending: 2,
                in_progress: 0,
                completed: 1,
                overdue: 1,
            }
        );

        let everyone = tasks.counts(None, now).await.unwrap();
        assert_eq!(everyone.total, 4);
        assert_eq!(everyone.overdue, 2);

        tasks.update_fields(&overdue.id, &update).await.unwrap();
        assert_eq!(tasks.count_overdue(Some("alice"), now).await.unwrap(), 0);
    }

    #[actix_rt::test]
    async fn test_overdue_counts_cancelled_but_not_undated() {
        let (store, tasks) = setup();
        let now = Utc::now();
        let past = codec::format_timestamp(&(now - Duration::hours(1)));

        store
            .insert(
                Collection::Tasks,
                raw_task("cancelled", json!({ "status": "cancelled", "due_date": past })),
            )
            .await
            .unwrap();
        store
            .insert(
                Collection::Tasks,
                raw_task("undated", json!({ "status": "pending", "due_date": null })),
            )
            .await
            .unwrap();

        // Cancelled still counts as overdue; a missing due date never does.
        assert_eq!(tasks.count_overdue(None, now).await.unwrap(), 1);
    }

    #[actix_rt::test]
    async fn test_malformed_stored_timestamp_fails_the_read() {
        let (store, tasks) = setup();
        store
            .insert(
                Collection::Tasks,
                raw_task(
                    "broken",
                    json!({
                        "created_at": "yesterday-ish",
                        "updated_at": "2024-01-01T00:00:00Z",
                    }),
                ),
            )
            .await
            .unwrap();

        let err = tasks.find_by_id("broken").await.unwrap_err();
        assert!(matches!(err, AppError::DatabaseError(_)));
    }

    #[actix_rt::test]
    async fn test_z_suffixed_stored_timestamps_are_read() {
        let (store, tasks) = setup();
        store
            .insert(
                Collection::Tasks,
                raw_task(
                    "legacy",
                    json!({
                        "created_at": "2024-01-01T00:00:00Z",
                        "updated_at": "2024-01-02T00:00:00",
                        "due_date": "2024-02-01T12:00:00+02:00",
                    }),
                ),
            )
            .await
            .unwrap();

        let task = tasks.find_by_id("legacy").await.unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(
            task.due_date.map(|d| codec::format_timestamp(&d)),
            Some("2024-02-01T10:00:00.000000000+00:00".to_string())
        );
    }
}
