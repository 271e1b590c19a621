pub mod dashboard;
pub mod task;
pub mod user;

use serde::{Deserialize, Deserializer};

pub use dashboard::DashboardStats;
pub use task::{Task, TaskInput, TaskPriority, TaskStatus, TaskUpdate};
pub use user::{LoginRequest, RegisterRequest, Role, User, UserRecord, UserUpdate};

/// Wraps any present value, including `null`, in `Some`.
///
/// Combined with `#[serde(default)]` this lets an update payload tell an absent
/// field (`None`) apart from an explicit `null` (`Some(None)`).
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
