//! Authorization: deciding whether an authenticated caller may perform a
//! request.

use crate::authn::UserInfo;
use thiserror::Error;

pub mod hardcoded;
pub mod request_info;
pub mod rules;
pub mod union;

pub use hardcoded::TokenReviewAuthorizer;
pub use request_info::resolve_attributes;
pub use rules::RuleAuthorizer;
pub use union::UnionAuthorizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
    NoOpinion,
}

/// What is being asked for, and by whom
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attributes {
    pub user: Option<UserInfo>,
    pub verb: String,
    pub api_group: String,
    pub api_version: String,
    pub resource: String,
    pub subresource: String,
    pub name: String,
    pub namespace: String,
    pub path: String,
    /// False for non-resource URLs such as `/healthz`
    pub resource_request: bool,
}

impl Attributes {
    pub fn user_name(&self) -> &str {
        self.user.as_ref().map(|u| u.name.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Authorization {
    pub decision: Decision,
    pub reason: String,
}

impl Authorization {
    pub fn allow<S: Into<String>>(reason: S) -> Self {
        Self {
            decision: Decision::Allow,
            reason: reason.into(),
        }
    }

    pub fn no_opinion() -> Self {
        Self {
            decision: Decision::NoOpinion,
            reason: String::new(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthorizationError {
    #[error("{0}")]
    Failed(String),
    #[error("[{}]", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    Aggregate(Vec<AuthorizationError>),
}

#[async_trait::async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorize(&self, attributes: &Attributes)
        -> Result<Authorization, AuthorizationError>;
}
