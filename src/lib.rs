use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
    routing::get,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Request gating: path classification, the access gate, and its axum wiring.
pub mod auth;
pub mod classifier;
pub mod gate;

// Collaborators the gate consumes.
pub mod repository;
pub mod session;

pub mod config;
pub mod handlers;
pub mod models;

// Route segregation by path category.
pub mod routes;
use auth::gate_middleware;
use routes::{auth as auth_pages, protected, public};

// --- Public Re-exports ---

pub use classifier::{PathCategory, RouteTable};
pub use config::{AppConfig, GateConfig};
pub use gate::{AccessGate, GateState, GuardOutcome, RoutingDecision};
pub use repository::{PostgresRepository, RepositoryState};
pub use session::{JwtSessionProvider, SessionState};

/// ApiDoc
///
/// OpenAPI description of the page surface, served under the public `/docs` prefix so
/// it is reachable without a session.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::landing, handlers::about, handlers::docs_index, handlers::docs_page,
        handlers::login_page, handlers::signup_page,
        handlers::ranking, handlers::logout
    ),
    components(
        schemas(models::Identity, models::PageResponse, models::RankingResponse)
    ),
    tags(
        (name = "ranking-portal", description = "Ranking portal pages and access gate")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, immutable container shared across all requests.
#[derive(Clone)]
pub struct AppState {
    /// The access gate, already wired to its session and record collaborators.
    pub gate: GateState,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for GateState {
    fn from_ref(app_state: &AppState) -> GateState {
        app_state.gate.clone()
    }
}

/// create_router
///
/// Assembles the routing structure. Every page route, and the 404 fallback, sits behind
/// the root interceptor, which also confirms the account on protected paths. `/health`
/// is registered after the gate layer so probes never depend on sessions or storage.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Gated Router Assembly
    let base_router = Router::new()
        // Documentation lives under the public `/docs` prefix.
        .merge(SwaggerUi::new("/docs/swagger-ui").url("/docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(auth_pages::auth_routes())
        .merge(protected::protected_routes())
        .fallback(handlers::not_found)
        // Root interceptor over everything registered above, fallback included. It also
        // runs the record check on every protected path.
        .layer(middleware::from_fn_with_state(
            state.gate.clone(),
            gate_middleware,
        ))
        .route("/health", get(|| async { "ok" }))
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: every log line of a request, including the gate's
/// redirect and stale-session events, carries its `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        path = %request.uri().path(),
        req_id = %request_id,
    )
}
