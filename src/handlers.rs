use crate::{
    auth::GuardedUser,
    gate::{GateError, GateState},
    models::{PageResponse, RankingResponse},
};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};

// --- Public Pages ---
// The gate short-circuits these before any lookup, so they never carry a viewer.

/// landing
///
/// [Public Route] The root page.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Landing page", body = PageResponse))
)]
pub async fn landing() -> Json<PageResponse> {
    Json(PageResponse {
        page: "home".to_string(),
        viewer: None,
    })
}

/// about
///
/// [Public Route] Static information about the portal.
#[utoipa::path(
    get,
    path = "/about",
    responses((status = 200, description = "About page", body = PageResponse))
)]
pub async fn about() -> Json<PageResponse> {
    Json(PageResponse {
        page: "about".to_string(),
        viewer: None,
    })
}

/// docs_index
///
/// [Public Route] Entry page of the documentation section.
#[utoipa::path(
    get,
    path = "/docs",
    responses((status = 200, description = "Documentation index", body = PageResponse))
)]
pub async fn docs_index() -> Json<PageResponse> {
    Json(PageResponse {
        page: "docs".to_string(),
        viewer: None,
    })
}

/// docs_page
///
/// [Public Route] A static documentation page, e.g. `/docs/bonus-guidelines`. Nested
/// pages such as `/docs/guides/intro` are captured whole.
#[utoipa::path(
    get,
    path = "/docs/{page}",
    params(("page" = String, Path, description = "Documentation page path; may contain `/`")),
    responses((status = 200, description = "Documentation page", body = PageResponse))
)]
pub async fn docs_page(Path(page): Path<String>) -> Json<PageResponse> {
    Json(PageResponse {
        page: format!("docs/{page}"),
        viewer: None,
    })
}

// --- Auth Entry Pages ---
// Reached only without a session; signed-in visitors are redirected by the gate.

/// login_page
///
/// [Auth Route] Placeholder for the login form. Credential checks and token issuance
/// are handled by the identity provider.
#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login page", body = PageResponse),
        (status = 302, description = "Already signed in; redirected to the landing page")
    )
)]
pub async fn login_page() -> Json<PageResponse> {
    Json(PageResponse {
        page: "login".to_string(),
        viewer: None,
    })
}

/// signup_page
///
/// [Auth Route] Placeholder for the registration form.
#[utoipa::path(
    get,
    path = "/signup",
    responses(
        (status = 200, description = "Signup page", body = PageResponse),
        (status = 302, description = "Already signed in; redirected to the landing page")
    )
)]
pub async fn signup_page() -> Json<PageResponse> {
    Json(PageResponse {
        page: "signup".to_string(),
        viewer: None,
    })
}

// --- Protected Pages ---

/// ranking
///
/// [Protected Route] The authenticated landing page. The `GuardedUser` argument means
/// the account behind the session was confirmed to exist for this request.
#[utoipa::path(
    get,
    path = "/system/ranking",
    responses(
        (status = 200, description = "Ranking page", body = RankingResponse),
        (status = 302, description = "No session, or stale session destroyed; redirected to login")
    )
)]
pub async fn ranking(GuardedUser(viewer): GuardedUser) -> Json<RankingResponse> {
    Json(RankingResponse { viewer })
}

/// logout
///
/// [Protected Route] Invalidates the session cookie and redirects to the login page.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 302, description = "Session destroyed; redirected to login"))
)]
pub async fn logout(
    State(gate): State<GateState>,
    headers: HeaderMap,
) -> Result<Response, GateError> {
    let response = gate
        .sessions()
        .logout(&headers, &gate.config().login_path)
        .await?;
    Ok(response)
}

/// not_found
///
/// Fallback for unmatched paths. It sits behind the root interceptor like every page, so
/// an anonymous request to an unknown (protected) path is redirected to login first.
pub async fn not_found() -> (StatusCode, Json<PageResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(PageResponse {
            page: "not-found".to_string(),
            viewer: None,
        }),
    )
}
