use crate::error::AppError;
use crate::models::{Task, User};

/// A resource with a single, fixed owner.
pub trait Owned {
    fn owner_id(&self) -> i32;
}

impl Owned for Task {
    fn owner_id(&self) -> i32 {
        self.owner_id
    }
}

/// Allows the principal to act on `resource` only if they own it.
pub fn authorize<R: Owned>(principal: &User, resource: &R) -> Result<(), AppError> {
    if resource.owner_id() == principal.id {
        Ok(())
    } else {
        log::debug!(
            "User {} denied access to resource owned by {}",
            principal.id,
            resource.owner_id()
        );
        Err(AppError::forbidden())
    }
}

/// Existence is checked before ownership: a missing task is `NotFound` for
/// everyone, an existing one owned by someone else is `Forbidden`.
pub fn require_owned(principal: &User, task: Option<Task>, task_id: i32) -> Result<Task, AppError> {
    let task = task.ok_or_else(|| AppError::NotFound(format!("Task with id: {} was not found", task_id)))?;
    authorize(principal, &task)?;
    Ok(task)
}
