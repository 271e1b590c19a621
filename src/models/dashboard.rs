use serde::{Deserialize, Serialize};

/// Aggregate task counts for `GET /api/dashboard/stats`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_employees: u64,
    pub total_tasks: u64,
    pub pending_tasks: u64,
    pub completed_tasks: u64,
    pub in_progress_tasks: u64,
    /// Tasks past their due date that are not completed.
    pub overdue_tasks: u64,
}
