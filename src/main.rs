use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;
use sqlx::PgPool;

use taskvault::config::Config;
use taskvault::routes;
use taskvault::store::PgStore;
use taskvault::AppState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::ConnectionRefused, e))?;
    let store = Arc::new(PgStore::new(pool));

    let state = AppState::new(&config.jwt, &config.hashing, store.clone(), store)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let state = web::Data::new(state);

    info!("Starting taskvault server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
