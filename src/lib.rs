//! Prensa Server Library
//!
//! This crate exposes the rendering subsystem and router assembly for
//! integration tests. The server binary is in main.rs.
//!
//! # Modules
//!
//! - `render`: the renderer pool, engine adapter traits, and the
//!   Chromium implementation
//! - `routes`: HTTP endpoints
//! - `config` / `state` / `error`: service glue

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;

use state::AppState;

/// Assemble the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/health", routes::health::router())
        .nest("/pdf", routes::pdf::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
