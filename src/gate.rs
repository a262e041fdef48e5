use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::{
    classifier::PathCategory,
    config::GateConfig,
    models::Identity,
    repository::{RepoError, RepositoryState},
    session::{SessionError, SessionState},
};

/// GateError
///
/// A lookup could not be performed at all. Never produced for a missing session or a
/// missing record; those are ordinary redirect branches.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("identity lookup failed: {0}")]
    Session(#[from] SessionError),
    #[error("user record lookup failed: {0}")]
    Repository(#[from] RepoError),
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "access gate infrastructure failure");
        let body = json!({
            "error": {
                "code": "INTERNAL_SERVER_ERROR",
                "message": "internal server error",
            }
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// RoutingDecision
///
/// The outcome of one pass through the gate. Produced once per request, never stored.
#[derive(Debug, Clone)]
pub enum RoutingDecision {
    /// Hand the request to the page layer, with whatever identity was resolved.
    Continue(Option<Identity>),
    /// Plain 302 redirect.
    RedirectTo(String),
    /// Finish the request with this status and headers (redirect plus cookie mutation).
    Terminate {
        status: StatusCode,
        headers: HeaderMap,
    },
}

impl RoutingDecision {
    /// The redirect destination, if this decision redirects at all.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            RoutingDecision::Continue(_) => None,
            RoutingDecision::RedirectTo(target) => Some(target.as_str()),
            RoutingDecision::Terminate { headers, .. } => headers
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
        }
    }

    /// Converts a stopping decision into its HTTP response. `Continue` yields `None`.
    pub fn into_rejection(self) -> Option<Response> {
        let response = match self {
            RoutingDecision::Continue(_) => return None,
            RoutingDecision::RedirectTo(target) => match HeaderValue::from_str(&target) {
                Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
                Err(e) => GateError::Session(SessionError::from(e)).into_response(),
            },
            RoutingDecision::Terminate { status, headers } => (status, headers).into_response(),
        };
        Some(response)
    }
}

/// GuardOutcome
///
/// Result of the standalone guard.
#[derive(Debug, Clone)]
pub enum GuardOutcome {
    /// Session exists and still maps to a live record. The identity is returned unchanged.
    Allowed(Identity),
    /// The request must stop here.
    Rejected(RoutingDecision),
}

/// AccessGate
///
/// Decides, per request, whether the caller may proceed. Two entry points share one
/// identity resolution step:
/// - `intercept` runs before any page logic and never touches storage;
/// - `guard` additionally proves the identity still has a user record, and destroys the
///   session when it does not.
///
/// The gate holds no mutable state; concurrent requests are independent.
pub struct AccessGate {
    config: GateConfig,
    sessions: SessionState,
    users: RepositoryState,
}

/// GateState
///
/// Shared handle to the gate, pulled from the application state via `FromRef`.
pub type GateState = Arc<AccessGate>;

impl AccessGate {
    pub fn new(config: GateConfig, sessions: SessionState, users: RepositoryState) -> Self {
        Self {
            config,
            sessions,
            users,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionState {
        &self.sessions
    }

    /// intercept
    ///
    /// Root interceptor mode. Public paths short-circuit before any lookup, so public
    /// pages stay reachable when sessions or storage are down. No cookies are touched.
    pub async fn intercept(
        &self,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<RoutingDecision, GateError> {
        let category = self.config.routes.classify(path);
        if category == PathCategory::Public {
            return Ok(RoutingDecision::Continue(None));
        }

        let identity = self.resolve_identity(headers).await?;

        let decision = match (category, identity) {
            (PathCategory::Auth, Some(identity)) => {
                tracing::info!(
                    user_id = %identity.id,
                    path,
                    "already signed in; redirecting home"
                );
                RoutingDecision::RedirectTo(self.config.home_path.clone())
            }
            (PathCategory::Protected, None) => {
                tracing::info!(path, "no session on protected path; redirecting to login");
                RoutingDecision::RedirectTo(self.config.login_path.clone())
            }
            (_, identity) => RoutingDecision::Continue(identity),
        };

        Ok(decision)
    }

    /// guard
    ///
    /// Standalone guard mode for handlers that need "session exists AND the account is
    /// still live". A stale session is destroyed in the same response that redirects to
    /// login; the `Location` and `Set-Cookie` headers are always emitted together.
    pub async fn guard(&self, headers: &HeaderMap) -> Result<GuardOutcome, GateError> {
        let Some(identity) = self.resolve_identity(headers).await? else {
            tracing::info!("guard: no session; redirecting to login");
            return Ok(GuardOutcome::Rejected(RoutingDecision::RedirectTo(
                self.config.login_path.clone(),
            )));
        };

        self.check_record(identity, headers).await
    }

    /// check_record
    ///
    /// The record half of the guard, for an identity the caller already resolved. The
    /// root interceptor uses it on protected paths so that no route, the 404 fallback
    /// included, sees an identity whose account is gone.
    pub async fn check_record(
        &self,
        identity: Identity,
        headers: &HeaderMap,
    ) -> Result<GuardOutcome, GateError> {
        if self.users.find_user(identity.id).await?.is_some() {
            return Ok(GuardOutcome::Allowed(identity));
        }

        tracing::warn!(
            user_id = %identity.id,
            "session refers to a missing user record; destroying session"
        );
        let cookie = self.sessions.destroy_session(headers).await?;
        let location =
            HeaderValue::from_str(&self.config.login_path).map_err(SessionError::from)?;

        let mut stale = HeaderMap::new();
        stale.insert(header::LOCATION, location);
        stale.insert(header::SET_COOKIE, cookie);

        Ok(GuardOutcome::Rejected(RoutingDecision::Terminate {
            status: StatusCode::FOUND,
            headers: stale,
        }))
    }

    async fn resolve_identity(&self, headers: &HeaderMap) -> Result<Option<Identity>, GateError> {
        let identity = self.sessions.authenticate(headers).await?;
        if identity.is_none() {
            tracing::debug!("no session identity on request");
        }
        Ok(identity)
    }
}
