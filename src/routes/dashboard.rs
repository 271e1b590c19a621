use crate::{
    auth::CurrentUser,
    error::AppError,
    models::DashboardStats,
    policy::{task_scope, TaskScope},
    state::AppState,
};
use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;

/// Aggregate task counts.
///
/// Admins and managers get global numbers; employees get numbers for the tasks
/// assigned to them, with `total_employees` reported as 1.
#[get("/stats")]
pub async fn get_stats(
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<impl Responder, AppError> {
    let scope = task_scope(&actor);
    let counts = state.tasks.counts(scope.assignee(), Utc::now()).await?;
    let total_employees = match scope {
        TaskScope::All => state.users.count_all().await?,
        TaskScope::AssignedTo(_) => 1,
    };

    Ok(HttpResponse::Ok().json(DashboardStats {
        total_employees,
        total_tasks: counts.total,
        pending_tasks: counts.pending,
        completed_tasks: counts.completed,
        in_progress_tasks: counts.in_progress,
        overdue_tasks: counts.overdue,
    }))
}
