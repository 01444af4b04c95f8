//! JSON API routes.

pub mod customers;
pub mod jokes;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Customer API routes.
///
/// Paths are spelled out rather than nested so both `/api/customer` and
/// `/api/customer/` reach the listing.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/api/customer", get(customers::list))
        .route("/api/customer/", get(customers::list))
        .route("/api/customer/{id}", get(customers::show))
        .route("/api/customer/delete/{id}", delete(customers::delete))
        .route("/api/customer/post", post(customers::create))
        .route("/api/customer/search", post(customers::search))
        .route("/api/customer/setStats", post(customers::set_stats))
}

/// Joke API routes.
pub fn joke_routes() -> Router<AppState> {
    Router::new()
        .route("/api/jokes", get(jokes::list))
        .route("/api/jokes/", get(jokes::list))
        .route("/api/jokes/like/{id}", put(jokes::like))
        .route("/api/jokes/jeer/{id}", put(jokes::jeer))
}
