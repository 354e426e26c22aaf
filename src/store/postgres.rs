use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{NewUser, Task, TaskInput, TaskQuery, User};
use crate::store::{unknown_owner, TaskRepository, UserRepository};

const USER_COLUMNS: &str = "id, email, password AS password_hash, created_at";
const TASK_COLUMNS: &str = "id, title, content, completed, created_at, owner_id";

/// Store backed by the `users` and `tasks` tables described in `schema.sql`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (email, password) VALUES ($1, $2) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => AppError::Conflict(format!(
                    "User with email: {} already exists",
                    new_user.email
                )),
                other => other,
            })
    }

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_user(&self, id: i32) -> Result<bool, AppError> {
        // Tasks go with the user through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TaskRepository for PgStore {
    async fn create_task(&self, owner_id: i32, input: TaskInput) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks (title, content, completed, owner_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            TASK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(input.title)
            .bind(input.content)
            .bind(input.completed)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    unknown_owner(owner_id)
                }
                other => AppError::from(other),
            })?)
    }

    async fn find_task_by_id(&self, id: i32) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_tasks(&self, owner_id: i32, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        let sql = list_tasks_sql(query);
        let mut query_builder = sqlx::query_as::<_, Task>(&sql).bind(owner_id);
        if let Some(completed) = query.completed {
            query_builder = query_builder.bind(completed);
        }
        if let Some(search) = &query.search {
            query_builder = query_builder.bind(like_pattern(search));
        }

        Ok(query_builder.fetch_all(&self.pool).await?)
    }

    async fn update_task(&self, id: i32, input: TaskInput) -> Result<Option<Task>, AppError> {
        let sql = format!(
            "UPDATE tasks SET title = $1, content = $2, completed = $3 WHERE id = $4 RETURNING {}",
            TASK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(input.title)
            .bind(input.content)
            .bind(input.completed)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_task(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Builds the task listing query. Placeholders are numbered in the order
/// `list_tasks` binds them: owner, then `completed`, then `search`.
fn list_tasks_sql(query: &TaskQuery) -> String {
    let mut sql = format!("SELECT {} FROM tasks WHERE owner_id = $1", TASK_COLUMNS);
    let mut param_count = 2;

    if query.completed.is_some() {
        sql.push_str(&format!(" AND completed = ${}", param_count));
        param_count += 1;
    }
    if query.search.is_some() {
        sql.push_str(&format!(
            " AND (title ILIKE ${0} ESCAPE '\\' OR content ILIKE ${0} ESCAPE '\\')",
            param_count
        ));
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC");
    sql
}

/// Wraps a search term for `ILIKE`, escaping `%`, `_` and `\` so they match
/// literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
