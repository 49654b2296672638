//! Authentication collaborators.
//!
//! A request authenticator looks at a whole request (here only its headers);
//! a token authenticator looks at a bare bearer token. Both report one of
//! three outcomes: `Ok(Some(_))` authenticated, `Ok(None)` not
//! authenticated, `Err(_)` the authenticator itself failed.

use crate::storage::StorageError;
use http::HeaderMap;
use std::collections::HashMap;
use thiserror::Error;

pub mod access_tokens;
pub mod audiences;
pub mod bearer;
pub mod static_tokens;
pub mod union;
pub mod webhook;

pub use access_tokens::AccessTokenAuthenticator;
pub use audiences::AudienceAgnostic;
pub use bearer::BearerTokenAuthenticator;
pub use static_tokens::StaticTokenAuthenticator;
pub use union::UnionTokenAuthenticator;
pub use webhook::WebhookTokenAuthenticator;

/// Identity established by an authenticator
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserInfo {
    pub name: String,
    pub uid: String,
    pub groups: Vec<String>,
    pub extra: HashMap<String, Vec<String>>,
}

impl UserInfo {
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Ordered list of token audiences
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Audiences(Vec<String>);

impl Audiences {
    pub fn new<I, S>(audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(audiences.into_iter().map(Into::into).collect())
    }

    /// Entries of `self` that also appear in `other`, in `self`'s order
    pub fn intersect(&self, other: &Audiences) -> Audiences {
        Audiences(
            self.0
                .iter()
                .filter(|aud| other.0.contains(aud))
                .cloned()
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Request handed to a request authenticator
#[derive(Debug, Clone, Default)]
pub struct AuthenticationRequest {
    pub headers: HeaderMap,
    /// Audiences the caller wants the credential to be valid for
    pub audiences: Option<Audiences>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticationResponse {
    pub user: UserInfo,
    /// Audiences the credential was validated against
    pub audiences: Audiences,
}

impl AuthenticationResponse {
    pub fn for_user(user: UserInfo) -> Self {
        Self {
            user,
            audiences: Audiences::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("invalid bearer token")]
    InvalidBearerToken,
    #[error("token expired")]
    TokenExpired,
    #[error("token timed out")]
    TokenTimedOut,
    #[error("user \"{0}\" not found")]
    UserNotFound(String),
    #[error("user.UID ({user_uid}) does not match token.userUID ({token_uid})")]
    UserUidMismatch { user_uid: String, token_uid: String },
    #[error("authentication timed out")]
    Timeout,
    #[error("{0}")]
    Storage(#[from] StorageError),
    #[error("webhook: {0}")]
    Webhook(String),
    #[error("[{}]", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    Aggregate(Vec<AuthenticationError>),
}

/// Authenticates a whole request
#[async_trait::async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate_request(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<Option<AuthenticationResponse>, AuthenticationError>;
}

/// Authenticates a bare bearer token
#[async_trait::async_trait]
pub trait TokenAuthenticator: Send + Sync {
    async fn authenticate_token(
        &self,
        token: &str,
        audiences: Option<&Audiences>,
    ) -> Result<Option<AuthenticationResponse>, AuthenticationError>;
}
