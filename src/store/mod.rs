//! Persistence collaborators.
//!
//! Handlers and the session resolver only see these traits; the binary wires
//! in [`postgres::PgStore`] and the tests use [`memory::InMemoryStore`].

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{NewUser, Task, TaskInput, TaskQuery, User};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Error both stores return when a task names an owner that does not exist.
pub fn unknown_owner(owner_id: i32) -> AppError {
    AppError::BadRequest(format!("Unknown owner id: {}", owner_id))
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user. A duplicate email fails with [`AppError::Conflict`].
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Removes a user and every task they own. Returns whether a user was removed.
    async fn delete_user(&self, id: i32) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a task. An unknown owner fails with [`unknown_owner`].
    async fn create_task(&self, owner_id: i32, input: TaskInput) -> Result<Task, AppError>;

    async fn find_task_by_id(&self, id: i32) -> Result<Option<Task>, AppError>;

    /// Tasks owned by `owner_id`, newest first.
    async fn list_tasks(&self, owner_id: i32, query: &TaskQuery) -> Result<Vec<Task>, AppError>;

    /// Replaces title, content and completion. The owner is left untouched.
    async fn update_task(&self, id: i32, input: TaskInput) -> Result<Option<Task>, AppError>;

    async fn delete_task(&self, id: i32) -> Result<bool, AppError>;
}
