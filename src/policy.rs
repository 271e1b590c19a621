//! Role-based access control.
//!
//! [`decide`] is a pure function of the actor's role, the actor's id, and the
//! operation (including whatever it touches). Listing operations never deny;
//! instead [`task_scope`] narrows what an employee sees.

use crate::error::AppError;
use crate::models::{Role, Task, User};

/// An operation an actor may attempt.
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    ListUsers,
    ViewOwnProfile,
    UpdateUser { target_id: &'a str },
    CreateTask,
    UpdateTask { task: &'a Task },
    DeleteTask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Which tasks a listing or aggregate covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope<'a> {
    All,
    AssignedTo(&'a str),
}

impl<'a> TaskScope<'a> {
    /// The assignee restriction, if any.
    pub fn assignee(&self) -> Option<&'a str> {
        match self {
            TaskScope::All => None,
            TaskScope::AssignedTo(user_id) => Some(user_id),
        }
    }
}

pub fn decide(role: Role, actor_id: &str, action: Action<'_>) -> Decision {
    let allowed = match (role, action) {
        (_, Action::ViewOwnProfile | Action::CreateTask) => true,

        (Role::Admin | Role::Manager, Action::ListUsers) => true,
        (Role::Employee, Action::ListUsers) => false,

        (Role::Admin, Action::UpdateUser { .. }) => true,
        (Role::Manager | Role::Employee, Action::UpdateUser { target_id }) => {
            target_id == actor_id
        }

        (Role::Admin | Role::Manager, Action::UpdateTask { .. }) => true,
        (Role::Employee, Action::UpdateTask { task }) => {
            task.assigned_to.as_deref() == Some(actor_id) || task.created_by == actor_id
        }

        (Role::Admin | Role::Manager, Action::DeleteTask) => true,
        (Role::Employee, Action::DeleteTask) => false,
    };
    if allowed {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Fails with [`AppError::Forbidden`] unless `actor` may perform `action`.
pub fn authorize(actor: &User, action: Action<'_>) -> Result<(), AppError> {
    match decide(actor.role, &actor.id, action) {
        Decision::Allow => Ok(()),
        Decision::Deny => {
            log::debug!("Denied {:?} for user {} ({:?})", action, actor.id, actor.role);
            Err(AppError::Forbidden("Not enough permissions".into()))
        }
    }
}

/// Tasks visible to `actor` in listings and dashboard aggregates.
pub fn task_scope(actor: &User) -> TaskScope<'_> {
    match actor.role {
        Role::Admin | Role::Manager => TaskScope::All,
        Role::Employee => TaskScope::AssignedTo(&actor.id),
    }
}
