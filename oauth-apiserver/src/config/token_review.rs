//! Token review configuration

use confique::Config;
use serde::Deserialize;

/// Backend consulted when a token review is created
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum TokenReviewBackend {
    /// Validate OAuth access tokens held by this server
    AccessTokens,
    /// Forward the review to a remote webhook
    Webhook,
    /// Return every review unauthenticated
    None,
}

/// Token review configuration
#[derive(Debug, Config, Clone)]
pub struct TokenReviewConfig {
    /// Default audiences for reviews that do not name any.
    /// Comma-separated list (default: empty)
    #[config(env = "OAUTH_APISERVER_API_AUDIENCES", default = "")]
    pub audiences: String,

    /// Authenticator timeout in seconds (default: 10)
    #[config(env = "OAUTH_APISERVER_TOKEN_REVIEW_TIMEOUT", default = 10)]
    pub timeout: u64,

    /// Copy authenticator error strings into the review status (default: true)
    #[config(env = "OAUTH_APISERVER_EXPOSE_AUTHENTICATOR_ERRORS", default = true)]
    pub expose_authenticator_errors: bool,

    /// Review backend: "access-tokens", "webhook" or "none" (default: access-tokens)
    #[config(env = "OAUTH_APISERVER_TOKEN_REVIEW_BACKEND", default = "access-tokens")]
    pub backend: TokenReviewBackend,
}

impl TokenReviewConfig {
    /// Get the default API audiences as a vector
    pub fn api_audiences(&self) -> Vec<String> {
        super::split_list(&self.audiences)
    }
}
