use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Auth Router Module
///
/// Entry pages for the login flow. Only anonymous requests reach these handlers.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(handlers::login_page))
        .route("/signup", get(handlers::signup_page))
}
