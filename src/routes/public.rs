use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Every path here is classified Public by the route table (`/`, `/about`, `/docs/...`),
/// so the gate lets them through without resolving a session.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        .route("/", get(handlers::landing))
        // GET /about
        .route("/about", get(handlers::about))
        // GET /docs and GET /docs/{*page}
        // Static guidance pages such as `/docs/bonus-guidelines` or `/docs/guides/intro`.
        .route("/docs", get(handlers::docs_index))
        .route("/docs/{*page}", get(handlers::docs_page))
}
