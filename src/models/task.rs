use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Input structure for creating or replacing a task.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 10000))]
    pub content: String,

    #[serde(default)]
    pub completed: bool,
}

/// A task as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// Identifier of the user who created the task. Never changes.
    pub owner_id: i32,
}

/// Query parameters for listing the caller's tasks.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Filter tasks by completion.
    pub completed: Option<bool>,
    /// Case-insensitive substring of title or content. `%` and `_` match literally.
    pub search: Option<String>,
}

impl TaskQuery {
    /// In-memory counterpart of the SQL filter used by the Postgres store.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(completed) = self.completed {
            if task.completed != completed {
                return false;
            }
        }
        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                task.title.to_lowercase().contains(&term)
                    || task.content.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}
