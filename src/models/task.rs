use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::deserialize_some;

/// Represents the priority of a task.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority.
    #[default]
    Medium,
    /// High priority.
    High,
    /// Urgent priority.
    Urgent,
}

/// Represents the status of a task.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    Pending,
    /// Task is currently being worked on.
    InProgress,
    /// Task is finished.
    Completed,
    /// Task was dropped.
    Cancelled,
}

impl TaskStatus {
    /// The stored string form, as used in store filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional description for the task.
    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Defaults to medium when omitted.
    #[serde(default)]
    pub priority: TaskPriority,

    /// Optional due date for the task.
    pub due_date: Option<DateTime<Utc>>,

    /// Identifier of the assignee. Not checked against the user directory.
    pub assigned_to: Option<String>,

    #[validate(length(max = 100))]
    pub category: Option<String>,
}

/// Represents a task entity as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for the task (UUID v4 string).
    pub id: String,
    /// The title of the task.
    pub title: String,
    /// An optional description for the task.
    #[serde(default)]
    pub description: Option<String>,
    /// The current status of the task.
    #[serde(default)]
    pub status: TaskStatus,
    /// The priority of the task.
    #[serde(default)]
    pub priority: TaskPriority,
    /// Optional due date for the task.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Identifier of the user the task is assigned to.
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Identifier of the user who created the task. Never changes.
    pub created_by: String,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new pending `Task` from `TaskInput` and the creator's id.
    pub fn new(input: TaskInput, created_by: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            status: TaskStatus::Pending,
            priority: input.priority,
            due_date: input.due_date,
            assigned_to: input.assigned_to,
            category: input.category,
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for `PUT /api/tasks/{id}`.
///
/// Absent fields are left alone; for the nullable fields an explicit `null`
/// (`Some(None)`) clears the stored value. `created_by` cannot be changed.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub assigned_to: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Option<String>>,
}

impl TaskUpdate {
    /// Checks the lengths of the nullable text fields, which the derive cannot see through.
    pub fn validate_text(&self) -> Result<(), crate::error::AppError> {
        self.validate()?;
        if let Some(Some(description)) = &self.description {
            if description.chars().count() > 1000 {
                return Err(crate::error::AppError::ValidationError(
                    "description: must be at most 1000 characters".into(),
                ));
            }
        }
        if let Some(Some(category)) = &self.category {
            if category.chars().count() > 100 {
                return Err(crate::error::AppError::ValidationError(
                    "category: must be at most 100 characters".into(),
                ));
            }
        }
        Ok(())
    }
}
