#![doc = "The `taskvault` library crate."]
#![doc = ""]
#![doc = "Holds the authentication core (password hashing, bearer tokens, session"]
#![doc = "resolution and ownership checks), the domain models, the persistence"]
#![doc = "stores, routing configuration and error handling. The binary (`main.rs`)"]
#![doc = "wires them into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
