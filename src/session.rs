use async_trait::async_trait;
use axum::{
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{self, InvalidHeaderValue},
    },
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    models::Identity,
};

/// Header accepted in `Env::Local` in place of a session token.
pub const DEV_USER_HEADER: &str = "x-user-id";

/// SessionError
///
/// Infrastructure faults of the session layer. "No session" is never one of these.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid session header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
    #[error("session backend unavailable: {0}")]
    Backend(String),
}

/// Claims
///
/// Payload of the session token. `sub` is the user id that keys the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

/// SessionProvider Trait
///
/// The identity-lookup capability consumed by the access gate. Login and token issuance
/// live elsewhere; this trait only reads and invalidates sessions.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Resolves the session identity carried by the request headers.
    ///
    /// Returns `Ok(None)` when there is no usable session. `Err` is reserved for genuine
    /// infrastructure failures.
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Option<Identity>, SessionError>;

    /// Produces the `Set-Cookie` value that invalidates the request's session client-side.
    async fn destroy_session(&self, headers: &HeaderMap) -> Result<HeaderValue, SessionError>;

    /// Terminates the session and redirects to `redirect_target`.
    async fn logout(
        &self,
        headers: &HeaderMap,
        redirect_target: &str,
    ) -> Result<Response, SessionError> {
        let cookie = self.destroy_session(headers).await?;
        let location = HeaderValue::from_str(redirect_target)?;
        Ok((
            StatusCode::FOUND,
            [(header::LOCATION, location), (header::SET_COOKIE, cookie)],
        )
            .into_response())
    }
}

/// SessionState
///
/// Shared handle to the session provider.
pub type SessionState = Arc<dyn SessionProvider>;

/// JwtSessionProvider
///
/// Stateless sessions: the cookie holds an HS256 token signed with the configured secret.
/// Invalidation therefore means overwriting the cookie with an expired blank value.
pub struct JwtSessionProvider {
    decoding_key: DecodingKey,
    cookie_name: String,
    cookie_secure: bool,
    env: Env,
}

impl JwtSessionProvider {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            cookie_name: config.session_cookie_name.clone(),
            cookie_secure: config.cookie_secure,
            env: config.env,
        }
    }

    /// Session cookie first, then `Authorization: Bearer`.
    ///
    /// A bearer token is client-held state the destroy cookie cannot reach. A client that
    /// keeps sending a stale bearer token bounces between the login page and the home
    /// page; it has to drop the header itself.
    fn session_token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        let from_cookie = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .find_map(|cookie| {
                let (name, value) = cookie.trim().split_once('=')?;
                (name == self.cookie_name && !value.is_empty()).then_some(value)
            });

        from_cookie.or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
        })
    }
}

/// Local development bypass: a bare user id, no signature.
fn dev_bypass_identity(headers: &HeaderMap) -> Option<Identity> {
    let raw = headers.get(DEV_USER_HEADER)?.to_str().ok()?;
    let id = Uuid::parse_str(raw).ok()?;
    Some(Identity { id, email: None })
}

#[async_trait]
impl SessionProvider for JwtSessionProvider {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Option<Identity>, SessionError> {
        if self.env == Env::Local {
            if let Some(identity) = dev_bypass_identity(headers) {
                tracing::debug!(user_id = %identity.id, "identity taken from local bypass header");
                return Ok(Some(identity));
            }
        }

        let Some(token) = self.session_token(headers) else {
            return Ok(None);
        };

        let mut validation = Validation::default();
        validation.validate_exp = true;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(Some(Identity {
                id: data.claims.sub,
                email: data.claims.email,
            })),
            Err(e) => {
                // Expired, tampered or malformed tokens are simply not a session.
                tracing::debug!(error = %e, "session token rejected");
                Ok(None)
            }
        }
    }

    async fn destroy_session(&self, _headers: &HeaderMap) -> Result<HeaderValue, SessionError> {
        let cookie = format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0{}",
            self.cookie_name,
            if self.cookie_secure { "; Secure" } else { "" }
        );
        Ok(HeaderValue::from_str(&cookie)?)
    }
}
