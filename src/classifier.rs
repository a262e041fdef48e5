use thiserror::Error;

/// Auth entry points. A signed-in user visiting one of these is sent to the landing page.
pub const AUTH_PREFIXES: [&str; 4] = ["/login", "/signup", "/auth/google", "/auth/google/callback"];

/// Pages that never require an identity. The exact root `/` is public as well.
pub const PUBLIC_PREFIXES: [&str; 5] = ["/docs", "/register", "/about", "/careers", "/contact"];

/// PathCategory
///
/// The access class of a request path, derived purely from the path string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCategory {
    /// Login, signup and OAuth entry points.
    Auth,
    /// No identity required.
    Public,
    /// Identity required. Anything not matched by a configured prefix lands here.
    Protected,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route prefix {0:?} must be non-empty and start with '/'")]
    InvalidPrefix(String),
    #[error("route prefix \"/\" would shadow every path; the root is matched exactly")]
    RootPrefix,
    #[error("auth prefix {auth:?} overlaps public prefix {public:?}")]
    Overlap { auth: String, public: String },
}

/// RouteTable
///
/// The ordered prefix lists used to classify paths. Built once at startup and shared
/// read-only by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    auth_prefixes: Vec<String>,
    public_prefixes: Vec<String>,
}

impl Default for RouteTable {
    /// The production classification table.
    fn default() -> Self {
        Self {
            auth_prefixes: AUTH_PREFIXES.iter().map(|p| p.to_string()).collect(),
            public_prefixes: PUBLIC_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl RouteTable {
    /// new
    ///
    /// Validates and builds a table. A prefix of one category may not be a prefix of
    /// (or equal to) a prefix of the other category, since the first-match rule would
    /// then silently pick one of them. Nesting within one category is allowed.
    pub fn new<A, P>(auth_prefixes: A, public_prefixes: P) -> Result<Self, RouteTableError>
    where
        A: IntoIterator,
        A::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        let auth_prefixes: Vec<String> = auth_prefixes.into_iter().map(Into::into).collect();
        let public_prefixes: Vec<String> = public_prefixes.into_iter().map(Into::into).collect();

        for prefix in auth_prefixes.iter().chain(public_prefixes.iter()) {
            if prefix == "/" {
                return Err(RouteTableError::RootPrefix);
            }
            if !prefix.starts_with('/') {
                return Err(RouteTableError::InvalidPrefix(prefix.clone()));
            }
        }

        for auth in &auth_prefixes {
            for public in &public_prefixes {
                if auth.starts_with(public.as_str()) || public.starts_with(auth.as_str()) {
                    return Err(RouteTableError::Overlap {
                        auth: auth.clone(),
                        public: public.clone(),
                    });
                }
            }
        }

        Ok(Self {
            auth_prefixes,
            public_prefixes,
        })
    }

    /// classify
    ///
    /// Total and side-effect free: every input yields exactly one category.
    pub fn classify(&self, path: &str) -> PathCategory {
        if path == "/" {
            return PathCategory::Public;
        }
        if self.auth_prefixes.iter().any(|p| path.starts_with(p.as_str())) {
            return PathCategory::Auth;
        }
        if self.public_prefixes.iter().any(|p| path.starts_with(p.as_str())) {
            return PathCategory::Public;
        }
        PathCategory::Protected
    }

    pub fn auth_prefixes(&self) -> &[String] {
        &self.auth_prefixes
    }

    pub fn public_prefixes(&self) -> &[String] {
        &self.public_prefixes
    }
}
