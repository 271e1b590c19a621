//! Typed access to the `users` and `tasks` collections.
//!
//! Repositories are the only writers of stored records. Every write passes
//! through [`codec::serialize`](crate::codec::serialize) and every read through
//! [`codec::deserialize`](crate::codec::deserialize).

pub mod tasks;
pub mod users;

pub use tasks::{TaskCounts, TaskRepository};
pub use users::UserRepository;
