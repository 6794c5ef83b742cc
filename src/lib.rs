//! Back-end for the corporate site admin: an HTTP JSON API over an
//! in-memory record store, with one shared filter/sort/paginate engine
//! behind every list.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod query;
pub mod routes;
pub mod services;
pub mod store;
pub mod workspace;

pub use app::{create_app, AppState};
pub use config::Settings;
pub use store::AdminStore;
