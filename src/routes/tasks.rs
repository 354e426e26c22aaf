use crate::{
    auth::{require_owned, CurrentUser},
    error::AppError,
    models::{TaskInput, TaskQuery},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

/// Retrieves the authenticated user's tasks.
///
/// Tasks are ordered by creation date, newest first.
///
/// ## Query Parameters:
/// - `completed` (optional): only tasks with this completion state.
/// - `search` (optional): case-insensitive match against title and content.
///
/// ## Responses:
/// - `200 OK`: a JSON array of `Task` objects.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    query_params: web::Query<TaskQuery>,
    CurrentUser(user): CurrentUser,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list_tasks(user.id, &query_params).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `400 Bad Request`: the body is not a `TaskInput`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `422 Unprocessable Entity`: `TaskInput` validation failed.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    task_data: web::Json<TaskInput>,
    CurrentUser(user): CurrentUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = state
        .tasks
        .create_task(user.id, task_data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a specific task by its ID.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `403 Forbidden`: the task belongs to another user.
/// - `404 Not Found`: no task with this ID.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
    CurrentUser(user): CurrentUser,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();
    let task = state.tasks.find_task_by_id(task_id).await?;
    let task = require_owned(&user, task, task_id)?;

    Ok(HttpResponse::Ok().json(task))
}

/// Replaces an existing task's title, content and completion flag.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `403 Forbidden`: the task belongs to another user.
/// - `404 Not Found`: no task with this ID.
/// - `422 Unprocessable Entity`: `TaskInput` validation failed.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
    task_data: web::Json<TaskInput>,
    CurrentUser(user): CurrentUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task_id = task_id.into_inner();

    let existing = state.tasks.find_task_by_id(task_id).await?;
    require_owned(&user, existing, task_id)?;

    let updated = state
        .tasks
        .update_task(task_id, task_data.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task with id: {} was not found", task_id)))?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a task by its ID.
///
/// ## Responses:
/// - `204 No Content`: on successful deletion.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `403 Forbidden`: the task belongs to another user.
/// - `404 Not Found`: no task with this ID.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
    CurrentUser(user): CurrentUser,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();

    let existing = state.tasks.find_task_by_id(task_id).await?;
    require_owned(&user, existing, task_id)?;

    if !state.tasks.delete_task(task_id).await? {
        return Err(AppError::NotFound(format!(
            "Task with id: {} was not found",
            task_id
        )));
    }

    Ok(HttpResponse::NoContent().finish())
}
