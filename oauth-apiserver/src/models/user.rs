use super::{ApiObject, ObjectMeta};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const API_VERSION: &str = "user.openshift.io/v1";
const KIND: &str = "User";

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    KIND.to_string()
}

/// A user known to the OAuth server
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Identities mapped to this user, as `provider:name`
    #[serde(default)]
    pub identities: Vec<String>,
    /// Groups the user is a member of
    #[serde(default)]
    pub groups: Vec<String>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata: ObjectMeta::default(),
            full_name: None,
            identities: Vec::new(),
            groups: Vec::new(),
        }
    }
}

impl ApiObject for User {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn name(&self) -> &str {
        &self.metadata.name
    }
}
