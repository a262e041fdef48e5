use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    classifier::PathCategory,
    gate::{GateState, GuardOutcome, RoutingDecision},
    models::Identity,
};

/// GuardedUser Extractor Result
///
/// An identity that has passed the standalone guard: the session is valid and the
/// account behind it still exists. Handlers that take a `GuardedUser` argument can rely
/// on both.
#[derive(Debug, Clone)]
pub struct GuardedUser(pub Identity);

/// GuardedUser Extractor Implementation
///
/// Reuses the `GuardedUser` cached by `gate_middleware` when present; otherwise runs
/// `AccessGate::guard` itself and caches the result in the request extensions.
///
/// Rejection: the gate's own redirect response (302 to login, with a session-destroying
/// `Set-Cookie` when the record is gone), or a 500 on infrastructure failure.
impl<S> FromRequestParts<S> for GuardedUser
where
    S: Send + Sync,
    GateState: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<GuardedUser>() {
            return Ok(user.clone());
        }

        let gate = GateState::from_ref(state);

        match gate.guard(&parts.headers).await {
            Ok(GuardOutcome::Allowed(identity)) => {
                let user = GuardedUser(identity);
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            Ok(GuardOutcome::Rejected(decision)) => Err(stop_response(decision)),
            Err(e) => Err(e.into_response()),
        }
    }
}

/// gate_middleware
///
/// The root interceptor. Runs once per gated request before any handler. A resolved
/// identity is stored in the request extensions for the page layer
/// (`Option<Extension<Identity>>`). On protected paths the identity is also checked
/// against the user records and cached as `GuardedUser`, so a handler extracting it
/// costs no second lookup.
pub async fn gate_middleware(
    State(gate): State<GateState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let decision = match gate.intercept(parts.uri.path(), &parts.headers).await {
        Ok(decision) => decision,
        Err(e) => return e.into_response(),
    };

    let identity = match decision {
        RoutingDecision::Continue(identity) => identity,
        stop => return stop_response(stop),
    };

    if let Some(identity) = identity {
        // Protected paths, routed or not, also need a live account behind the session.
        if gate.config().routes.classify(parts.uri.path()) == PathCategory::Protected {
            match gate.check_record(identity.clone(), &parts.headers).await {
                Ok(GuardOutcome::Allowed(confirmed)) => {
                    parts.extensions.insert(GuardedUser(confirmed));
                }
                Ok(GuardOutcome::Rejected(stop)) => return stop_response(stop),
                Err(e) => return e.into_response(),
            }
        }
        parts.extensions.insert(identity);
    }

    next.run(Request::from_parts(parts, body)).await
}

fn stop_response(decision: RoutingDecision) -> Response {
    // `Continue` never reaches here.
    decision
        .into_rejection()
        .unwrap_or_else(|| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
