use crate::models::User;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// RepoError
///
/// A storage fault. "No such row" is not an error and is reported as `Ok(None)`.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Repository Trait
///
/// The record-lookup capability the gate depends on. Implementations must keep
/// "absent" (`Ok(None)`) and "could not ask" (`Err`) apart: folding a failed query into
/// `None` would turn a storage outage into a mass logout.
///
/// **Send + Sync + async_trait** make `Arc<dyn Repository>` shareable across Axum tasks.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Point lookup by primary key.
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, RepoError>;
}

/// RepositoryState
///
/// The concrete type used to share record access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The `Repository` implementation backed by the `users` table.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// find_user
    ///
    /// Resolves the persisted record behind a session identity.
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("find_user error: {:?}", e);
            RepoError::Db(e)
        })?;

        Ok(user)
    }
}
