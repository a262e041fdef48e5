#![allow(dead_code)]

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue, Method, Request, Uri, header, request::Parts};
use jsonwebtoken::{EncodingKey, Header, encode};
use ranking_portal::{
    AccessGate, GateConfig,
    models::{Identity, User},
    repository::{RepoError, Repository, RepositoryState},
    session::{Claims, SessionError, SessionProvider, SessionState},
};
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::SystemTime,
};
use uuid::Uuid;

pub const TEST_USER_ID: Uuid = Uuid::from_u128(1);
pub const DESTROY_COOKIE: &str = "auth_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0";

// --- Mock Session Provider ---

#[derive(Default)]
pub struct MockSessions {
    pub identity: Option<Identity>,
    pub fail: bool,
    pub authenticate_calls: AtomicUsize,
    pub destroy_calls: AtomicUsize,
}

impl MockSessions {
    pub fn signed_in(id: Uuid) -> Self {
        Self {
            identity: Some(Identity {
                id,
                email: Some("u1@example.com".to_string()),
            }),
            ..Default::default()
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn authenticate_calls(&self) -> usize {
        self.authenticate_calls.load(Ordering::SeqCst)
    }

    pub fn destroy_calls(&self) -> usize {
        self.destroy_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProvider for MockSessions {
    async fn authenticate(&self, _headers: &HeaderMap) -> Result<Option<Identity>, SessionError> {
        self.authenticate_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SessionError::Backend("session store unreachable".to_string()));
        }
        Ok(self.identity.clone())
    }

    async fn destroy_session(&self, _headers: &HeaderMap) -> Result<HeaderValue, SessionError> {
        self.destroy_calls.fetch_add(1, Ordering::SeqCst);
        Ok(HeaderValue::from_static(DESTROY_COOKIE))
    }
}

// --- Mock Repository ---

#[derive(Default)]
pub struct MockUserRepo {
    pub user: Option<User>,
    pub fail: bool,
    pub lookups: AtomicUsize,
}

impl MockUserRepo {
    pub fn with_user(id: Uuid) -> Self {
        Self {
            user: Some(User {
                id,
                email: "u1@example.com".to_string(),
                password_hash: "$argon2id$v=19$stub".to_string(),
            }),
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Repository for MockUserRepo {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RepoError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(self.user.clone().filter(|user| user.id == id))
    }
}

// --- Helper Functions ---

pub fn build_gate(sessions: &Arc<MockSessions>, repo: &Arc<MockUserRepo>) -> AccessGate {
    AccessGate::new(
        GateConfig::default(),
        sessions.clone() as SessionState,
        repo.clone() as RepositoryState,
    )
}

/// Signs a session token with `secret`, expiring `exp_offset` seconds from now
/// (negative for an already expired token).
pub fn create_token(user_id: Uuid, secret: &str, exp_offset: i64) -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: user_id,
        email: Some("u1@example.com".to_string()),
        iat: now as usize,
        exp: (now + exp_offset) as usize,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

/// Builds request `Parts` for extractor tests.
pub fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

pub fn cookie_headers(cookie: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
    headers
}
