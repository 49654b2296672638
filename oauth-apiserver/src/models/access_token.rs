use super::{ApiObject, ObjectMeta, UserOwned};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const API_VERSION: &str = "oauth.openshift.io/v1";
const KIND: &str = "OAuthAccessToken";

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    KIND.to_string()
}

/// An OAuth access token issued to a user through a client
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OAuthAccessToken {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Name of the OAuth client that requested the token
    #[serde(default)]
    pub client_name: String,
    /// Lifetime in seconds from creation; zero never expires
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub redirect_uri: String,
    /// Name of the user the token was issued to
    #[serde(default)]
    pub user_name: String,
    /// UID of the user the token was issued to
    #[serde(default, rename = "userUID")]
    pub user_uid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub authorize_token: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub refresh_token: String,
    /// Seconds from creation after which an unused token times out; zero disables
    #[serde(default)]
    pub inactivity_timeout_seconds: i32,
}

impl Default for OAuthAccessToken {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata: ObjectMeta::default(),
            client_name: String::new(),
            expires_in: 0,
            scopes: Vec::new(),
            redirect_uri: String::new(),
            user_name: String::new(),
            user_uid: String::new(),
            authorize_token: String::new(),
            refresh_token: String::new(),
            inactivity_timeout_seconds: 0,
        }
    }
}

impl OAuthAccessToken {
    fn created_at(&self) -> DateTime<Utc> {
        self.metadata.creation_timestamp.unwrap_or_else(Utc::now)
    }

    /// Seconds elapsed since the token was created
    pub fn age_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at()).num_seconds()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_in > 0 && self.created_at() + Duration::seconds(self.expires_in) <= now
    }

    pub fn is_timed_out(&self, now: DateTime<Utc>) -> bool {
        self.inactivity_timeout_seconds > 0
            && self.created_at() + Duration::seconds(self.inactivity_timeout_seconds.into()) <= now
    }
}

impl ApiObject for OAuthAccessToken {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn name(&self) -> &str {
        &self.metadata.name
    }

    fn as_user_owned(&self) -> Option<&dyn UserOwned> {
        Some(self)
    }
}

impl UserOwned for OAuthAccessToken {
    fn owning_user_name(&self) -> &str {
        &self.user_name
    }
}
