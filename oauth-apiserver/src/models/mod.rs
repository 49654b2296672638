//! Wire types served by the API server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use utoipa::ToSchema;

pub mod access_token;
pub mod token_review;
pub mod user;

pub use access_token::OAuthAccessToken;
pub use token_review::{ExtraValue, TokenReview, TokenReviewUser};
pub use user::User;

/// API group of the OAuth resources
pub const OAUTH_GROUP: &str = "oauth.openshift.io";
/// API group of the user resources
pub const USER_GROUP: &str = "user.openshift.io";

pub const TOKEN_REVIEWS_RESOURCE: &str = "tokenreviews";
pub const ACCESS_TOKENS_RESOURCE: &str = "oauthaccesstokens";
pub const USERS_RESOURCE: &str = "users";

/// Metadata shared by every object
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Unique name of the object within its resource
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Namespace of the object; cluster scoped resources leave it empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Server assigned unique identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Time the object was persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

impl ObjectMeta {
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Implemented by every object that can flow through admission.
pub trait ApiObject: Debug + Send + Sync {
    /// Kind of the object, e.g. `OAuthAccessToken`
    fn kind(&self) -> &'static str;

    /// Name of the object
    fn name(&self) -> &str;

    /// Capability check for objects that belong to a user
    fn as_user_owned(&self) -> Option<&dyn UserOwned> {
        None
    }
}

/// Objects attributable to the user that owns them.
pub trait UserOwned {
    fn owning_user_name(&self) -> &str;
}
