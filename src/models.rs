use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Persisted Records ---

/// User
///
/// The system-of-record entry in the `users` table, keyed by the same identifier the
/// session carries. The gate only ever reads it.
#[derive(Clone, Serialize, Deserialize, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    // Credential hash written by account provisioning. Never leaves the server.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

// --- Session Subjects ---

/// Identity
///
/// The subject of an authenticated session as resolved by the session provider.
/// It is not proof that the account still exists; only the guard establishes that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Identity {
    pub id: Uuid,
    pub email: Option<String>,
}

// --- Response Payloads ---

/// PageResponse
///
/// Minimal body returned by the placeholder page handlers. Rendering happens elsewhere.
#[derive(Debug, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageResponse {
    pub page: String,
    pub viewer: Option<Identity>,
}

/// RankingResponse
///
/// Body of the authenticated landing page.
#[derive(Debug, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RankingResponse {
    pub viewer: Identity,
}
