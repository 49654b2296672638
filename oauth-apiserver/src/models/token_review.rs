use super::{ApiObject, ObjectMeta};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

const API_VERSION: &str = "authentication.k8s.io/v1";
const KIND: &str = "TokenReview";

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    KIND.to_string()
}

/// Request to authenticate a bearer token.
///
/// The object is never persisted: the server fills in `status` and sends the
/// same object back.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenReview {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// What should be reviewed
    #[serde(default)]
    pub spec: TokenReviewSpec,
    /// Outcome of the review, filled in by the server
    #[serde(default)]
    pub status: TokenReviewStatus,
}

impl Default for TokenReview {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata: ObjectMeta::default(),
            spec: TokenReviewSpec::default(),
            status: TokenReviewStatus::default(),
        }
    }
}

impl TokenReview {
    pub fn for_token<S: Into<String>>(token: S) -> Self {
        Self {
            spec: TokenReviewSpec {
                token: token.into(),
                audiences: Vec::new(),
            },
            ..Default::default()
        }
    }

    pub fn with_audiences<I, S>(mut self, audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.audiences = audiences.into_iter().map(Into::into).collect();
        self
    }
}

impl ApiObject for TokenReview {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn name(&self) -> &str {
        &self.metadata.name
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TokenReviewSpec {
    /// Opaque bearer token
    #[serde(default)]
    pub token: String,
    /// Audiences the token should be valid for; empty means the server defaults
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audiences: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TokenReviewStatus {
    /// Whether the token was accepted
    #[serde(default)]
    pub authenticated: bool,
    /// Identity bound to the token, present only when authenticated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<TokenReviewUser>,
    /// Audiences the token is actually valid for
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audiences: Vec<String>,
    /// Why authentication failed, if it errored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TokenReviewUser {
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, ExtraValue>,
}

/// Values of a single extra attribute
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct ExtraValue(pub Vec<String>);

impl From<Vec<String>> for ExtraValue {
    fn from(values: Vec<String>) -> Self {
        ExtraValue(values)
    }
}
