//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Redirect to the customer list
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Database readiness check
//!
//! # Customer API (JSON)
//! GET    /api/customer/               - All customers
//! GET    /api/customer/{id}           - One customer
//! DELETE /api/customer/delete/{id}    - Delete customer
//! POST   /api/customer/post           - Create (query parameters)
//! POST   /api/customer/search         - Search by name/email
//! POST   /api/customer/setStats       - Replace an order-history entry
//!
//! # Joke API (JSON)
//! GET  /api/jokes/                    - All jokes
//! PUT  /api/jokes/like/{id}           - Increment haha
//! PUT  /api/jokes/jeer/{id}           - Increment boohoo
//!
//! # Customer views (HTML)
//! GET  /mvc/customer/read             - Customer table
//! GET  /mvc/customer/create           - Create form
//! POST /mvc/customer/create           - Create action
//! GET  /mvc/customer/update/{id}      - Update form
//! POST /mvc/customer/update/{id}      - Update action
//! GET  /mvc/customer/delete/{id}      - Delete, then redirect to the table
//! GET  /mvc/customer/search           - Search page (?term=)
//!
//! # Auth
//! GET  /login                         - Login page
//! POST /login                         - Login action
//! POST /logout                        - Logout action
//! ```

pub mod api;
pub mod auth;
pub mod customers;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the customer view routes router.
pub fn customer_view_routes() -> Router<AppState> {
    Router::new()
        .route("/read", get(customers::read))
        .route(
            "/create",
            get(customers::create_form).post(customers::create),
        )
        .route(
            "/update/{id}",
            get(customers::update_form).post(customers::update),
        )
        .route("/delete/{id}", get(customers::delete))
        .route("/search", get(customers::search))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/mvc/customer/read") }))
        .merge(api::customer_routes())
        .merge(api::joke_routes())
        .nest("/mvc/customer", customer_view_routes())
        .merge(auth_routes())
}
