use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Protected Router Module
///
/// Pages that need a valid session mapped to an existing account. The root interceptor
/// confirms the account for every protected path, so a stale session is destroyed
/// before any handler here runs.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        // GET /system/ranking
        // The authenticated landing page; signed-in users hitting /login end up here.
        .route("/system/ranking", get(handlers::ranking))
        // POST /logout
        // Clears the session cookie and redirects to /login.
        .route("/logout", post(handlers::logout))
}
