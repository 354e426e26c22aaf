pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

use crate::auth::AuthMiddleware;

/// Registers the API routes. `/tasks` and `/users/me` require a bearer token.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::index)
        .service(health::health)
        .service(auth::login)
        .service(
            web::scope("/users")
                .service(web::scope("/me").wrap(AuthMiddleware).service(auth::me))
                .service(auth::register),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}
