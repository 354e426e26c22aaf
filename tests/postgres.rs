//! Runs the Postgres store against a live database.
//!
//! Every test returns early when `DATABASE_URL` is unset. The tables from
//! `schema.sql` are created if missing; rows are keyed by a per-run email
//! suffix so reruns do not collide.

mod common;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use dotenv::dotenv;
use serde_json::json;
use sqlx::PgPool;
use taskvault::error::AppError;
use taskvault::models::{NewUser, Task, TaskInput, TaskQuery};
use taskvault::routes;
use taskvault::store::{PgStore, TaskRepository, UserRepository};
use taskvault::AppState;

use common::{bearer, register_and_login_user};

async fn pg_store() -> Option<Arc<PgStore>> {
    dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres tests");
        return None;
    };
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");

    // Concurrent CREATE ... IF NOT EXISTS can still race, so the schema is
    // applied under an advisory lock.
    let mut tx = pool.begin().await.expect("Failed to open transaction");
    sqlx::query("SELECT pg_advisory_xact_lock(7321)")
        .execute(&mut *tx)
        .await
        .expect("Failed to take schema lock");
    for statement in include_str!("../schema.sql").split(';') {
        if statement.lines().all(|l| l.trim().is_empty() || l.trim().starts_with("--")) {
            continue;
        }
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .expect("Failed to apply schema.sql");
    }
    tx.commit().await.expect("Failed to commit schema");

    Some(Arc::new(PgStore::new(pool)))
}

fn unique_email(name: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{}-{}-{}@example.com", name, std::process::id(), nanos)
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_string(),
    }
}

fn input(title: &str, content: &str, completed: bool) -> TaskInput {
    TaskInput {
        title: title.to_string(),
        content: content.to_string(),
        completed,
    }
}

fn ids(tasks: &[Task]) -> Vec<i32> {
    tasks.iter().map(|t| t.id).collect()
}

#[actix_rt::test]
async fn test_pg_user_lookup_and_conflict() {
    let Some(store) = pg_store().await else { return };
    let email = unique_email("pg-user");

    let created = store.create_user(new_user(&email)).await.unwrap();
    assert_eq!(created.email, email);
    assert_eq!(created.password_hash, new_user(&email).password_hash);

    assert_eq!(store.find_user_by_id(created.id).await.unwrap(), Some(created.clone()));
    assert_eq!(store.find_user_by_email(&email).await.unwrap(), Some(created.clone()));
    assert_eq!(
        store.find_user_by_email(&email.to_uppercase()).await.unwrap(),
        None
    );

    match store.create_user(new_user(&email)).await {
        Err(AppError::Conflict(msg)) => assert!(msg.contains(&email), "message: {}", msg),
        other => panic!("expected Conflict, got {:?}", other),
    }

    assert!(store.delete_user(created.id).await.unwrap());
    assert!(!store.delete_user(created.id).await.unwrap());
    assert_eq!(store.find_user_by_id(created.id).await.unwrap(), None);
}

#[actix_rt::test]
async fn test_pg_task_listing_filters_and_order() {
    let Some(store) = pg_store().await else { return };
    let owner = store.create_user(new_user(&unique_email("pg-owner"))).await.unwrap();
    let other = store.create_user(new_user(&unique_email("pg-other"))).await.unwrap();

    let groceries = store
        .create_task(owner.id, input("Groceries", "milk and eggs", false))
        .await
        .unwrap();
    let report = store
        .create_task(owner.id, input("Report", "100% finished", true))
        .await
        .unwrap();
    let snake = store
        .create_task(owner.id, input("snake_case rename", "refactor", false))
        .await
        .unwrap();
    store
        .create_task(other.id, input("Groceries", "not yours", false))
        .await
        .unwrap();

    let query = |completed: Option<bool>, search: Option<&str>| TaskQuery {
        completed,
        search: search.map(str::to_string),
    };

    let cases = vec![
        (query(None, None), vec![snake.id, report.id, groceries.id], "all, newest first"),
        (query(Some(true), None), vec![report.id], "completed"),
        (query(Some(false), None), vec![snake.id, groceries.id], "open"),
        (query(None, Some("GROCER")), vec![groceries.id], "case-insensitive title"),
        (query(None, Some("eggs")), vec![groceries.id], "content"),
        (query(Some(true), Some("groceries")), vec![], "completed and search"),
        (query(None, Some("%")), vec![report.id], "percent is literal"),
        (query(None, Some("_")), vec![snake.id], "underscore is literal"),
    ];

    for (task_query, expected, description) in cases {
        let listed = store.list_tasks(owner.id, &task_query).await.unwrap();
        assert_eq!(ids(&listed), expected, "case: {}", description);
        assert!(listed.iter().all(|t| t.owner_id == owner.id));
    }

    store.delete_user(owner.id).await.unwrap();
    store.delete_user(other.id).await.unwrap();
}

#[actix_rt::test]
async fn test_pg_task_update_delete_and_cascade() {
    let Some(store) = pg_store().await else { return };
    let owner = store.create_user(new_user(&unique_email("pg-cascade"))).await.unwrap();

    let task = store
        .create_task(owner.id, input("Draft", "first pass", false))
        .await
        .unwrap();
    assert_eq!(store.find_task_by_id(task.id).await.unwrap(), Some(task.clone()));

    let updated = store
        .update_task(task.id, input("Final", "second pass", true))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, task.id);
    assert_eq!(updated.owner_id, owner.id);
    assert_eq!(updated.created_at, task.created_at);
    assert_eq!(
        (updated.title.as_str(), updated.content.as_str(), updated.completed),
        ("Final", "second pass", true)
    );

    assert!(store.delete_task(task.id).await.unwrap());
    assert!(!store.delete_task(task.id).await.unwrap());
    assert_eq!(
        store.update_task(task.id, input("Gone", "", false)).await.unwrap(),
        None
    );

    let kept = store
        .create_task(owner.id, input("Kept", "until the owner goes", false))
        .await
        .unwrap();
    assert!(store.delete_user(owner.id).await.unwrap());
    assert_eq!(store.find_task_by_id(kept.id).await.unwrap(), None);

    match store.create_task(owner.id, input("Orphan", "", false)).await {
        Err(AppError::BadRequest(msg)) => {
            assert_eq!(msg, format!("Unknown owner id: {}", owner.id))
        }
        other => panic!("expected BadRequest, got {:?}", other),
    }
}

#[actix_rt::test]
async fn test_pg_backed_api_flow() {
    let Some(store) = pg_store().await else { return };
    let state = AppState::new(
        &common::jwt_settings(),
        &common::hashing_settings(),
        store.clone(),
        store.clone(),
    )
    .expect("test settings are valid");
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::config),
    )
    .await;

    let owner_email = unique_email("pg-api-owner");
    let owner = register_and_login_user(&app, &owner_email, "pw1").await.unwrap();
    let stranger = register_and_login_user(&app, &unique_email("pg-api-stranger"), "pw2")
        .await
        .unwrap();

    let duplicate = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "email": owner_email, "password": "pw3" }))
        .to_request();
    assert_eq!(test::call_service(&app, duplicate).await.status(), StatusCode::CONFLICT);

    let create = test::TestRequest::post()
        .uri("/tasks")
        .insert_header(bearer(&owner.token))
        .set_json(json!({ "title": "Stored in Postgres", "content": "" }))
        .to_request();
    let resp = test::call_service(&app, create).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let task: Task = test::read_body_json(resp).await;
    assert_eq!(task.owner_id, owner.id);

    let as_stranger = test::TestRequest::get()
        .uri(&format!("/tasks/{}", task.id))
        .insert_header(bearer(&stranger.token))
        .to_request();
    assert_eq!(test::call_service(&app, as_stranger).await.status(), StatusCode::FORBIDDEN);

    let as_owner = test::TestRequest::get()
        .uri(&format!("/tasks/{}", task.id))
        .insert_header(bearer(&owner.token))
        .to_request();
    let fetched: Task = test::read_body_json(test::call_service(&app, as_owner).await).await;
    assert_eq!(fetched, task);

    store.delete_user(owner.id).await.unwrap();
    store.delete_user(stranger.id).await.unwrap();
}
