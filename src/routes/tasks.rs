use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{Task, TaskInput, TaskUpdate},
    policy::{authorize, task_scope, Action, TaskScope},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: required, 1 to 200 characters.
/// - `description`, `due_date`, `assigned_to`, `category` (optional).
/// - `priority` (optional): defaults to `medium`.
///
/// The task always starts `pending` with `created_by` set to the actor.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    task_data: web::Json<TaskInput>,
    CurrentUser(actor): CurrentUser,
) -> Result<impl Responder, AppError> {
    authorize(&actor, Action::CreateTask)?;
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), &actor.id);
    state.tasks.insert(&task).await?;
    log::info!("User {} created task {}", actor.id, task.id);

    Ok(HttpResponse::Ok().json(task))
}

/// Lists tasks visible to the actor.
///
/// Admins and managers see every task; employees see only tasks assigned to them.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<impl Responder, AppError> {
    let tasks = match task_scope(&actor) {
        TaskScope::All => state.tasks.find_all().await?,
        TaskScope::AssignedTo(user_id) => state.tasks.find_by_assignee(user_id).await?,
    };
    Ok(HttpResponse::Ok().json(tasks))
}

/// Lists the tasks assigned to the actor, whatever their role.
#[get("/my-tasks")]
pub async fn get_my_tasks(
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.find_by_assignee(&actor.id).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Partially updates a task.
///
/// Employees may only update tasks assigned to or created by them.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `403 Forbidden`: the actor may not edit this task.
/// - `404 Not Found`: no task with that id (checked before permissions).
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<String>,
    task_data: web::Json<TaskUpdate>,
    CurrentUser(actor): CurrentUser,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();
    let existing = state
        .tasks
        .find_by_id(&task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    authorize(&actor, Action::UpdateTask { task: &existing })?;
    task_data.validate_text()?;

    let updated = state.tasks.update_fields(&task_id, &task_data).await?;
    log::info!("User {} updated task {}", actor.id, task_id);
    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a task permanently. Admins and managers only.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task deleted successfully"}`.
/// - `403 Forbidden`: the actor may not delete tasks.
/// - `404 Not Found`: no task with that id.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<String>,
    CurrentUser(actor): CurrentUser,
) -> Result<impl Responder, AppError> {
    authorize(&actor, Action::DeleteTask)?;

    let task_id = task_id.into_inner();
    state.tasks.delete(&task_id).await?;
    log::info!("User {} deleted task {}", actor.id, task_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use crate::models::{TaskInput, TaskPriority};
    use validator::Validate;

    #[test]
    fn test_task_input_validation() {
        let valid = TaskInput {
            title: "Valid Title".to_string(),
            description: Some("Test Description".to_string()),
            priority: TaskPriority::Low,
            due_date: None,
            assigned_to: None,
            category: None,
        };
        assert!(valid.validate().is_ok(), "Validation should pass for valid input.");

        let long_title = TaskInput {
            title: "a".repeat(201),
            ..valid
        };
        assert!(
            long_title.validate().is_err(),
            "Validation should fail for overly long title."
        );
    }
}
