//! In-memory store
//!
//! Keeps users and tasks in ordered maps behind a single async lock. Data is
//! lost on restart; used by the test suites and for running without Postgres.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::{NewUser, Task, TaskInput, TaskQuery, User};
use crate::store::{unknown_owner, TaskRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    tasks: BTreeMap<i32, Task>,
    last_user_id: i32,
    last_task_id: i32,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::Conflict(format!(
                "User with email: {} already exists",
                new_user.email
            )));
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn delete_user(&self, id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.tasks.retain(|_, task| task.owner_id != id);
        Ok(true)
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn create_task(&self, owner_id: i32, input: TaskInput) -> Result<Task, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&owner_id) {
            return Err(unknown_owner(owner_id));
        }

        tables.last_task_id += 1;
        let task = Task {
            id: tables.last_task_id,
            title: input.title,
            content: input.content,
            completed: input.completed,
            created_at: Utc::now(),
            owner_id,
        };
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_task_by_id(&self, id: i32) -> Result<Option<Task>, AppError> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, owner_id: i32, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        let tables = self.tables.read().await;
        // Ids grow with insertion, so reverse id order is newest first.
        Ok(tables
            .tasks
            .values()
            .rev()
            .filter(|task| task.owner_id == owner_id && query.matches(task))
            .cloned()
            .collect())
    }

    async fn update_task(&self, id: i32, input: TaskInput) -> Result<Option<Task>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.tasks.get_mut(&id).map(|task| {
            task.title = input.title;
            task.content = input.content;
            task.completed = input.completed;
            task.clone()
        }))
    }

    async fn delete_task(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.tables.write().await.tasks.remove(&id).is_some())
    }
}
