//! Authenticator configuration

use confique::Config;
use serde::Deserialize;
use std::path::PathBuf;

/// Authentication configuration
#[derive(Debug, Config, Clone)]
pub struct AuthenticationConfig {
    /// YAML file mapping static bearer tokens to identities
    #[config(env = "OAUTH_APISERVER_STATIC_TOKENS_FILE")]
    pub static_tokens_file: Option<PathBuf>,

    /// Inactivity timeout in seconds applied to access tokens on use
    #[config(env = "OAUTH_APISERVER_ACCESS_TOKEN_INACTIVITY_TIMEOUT")]
    pub access_token_inactivity_timeout: Option<u64>,

    /// Remote token review webhook
    #[config(nested)]
    pub webhook: WebhookConfig,
}

/// Remote token review webhook configuration
#[derive(Debug, Config, Clone)]
pub struct WebhookConfig {
    /// URL the TokenReview is POSTed to
    #[config(env = "OAUTH_APISERVER_WEBHOOK_URL")]
    pub url: Option<String>,

    /// Request timeout in seconds (default: 10)
    #[config(env = "OAUTH_APISERVER_WEBHOOK_TIMEOUT", default = 10)]
    pub timeout: u64,
}

/// Contents of the static tokens file
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StaticTokensFile {
    #[serde(default)]
    pub tokens: Vec<StaticToken>,
}

/// A bearer token and the identity it authenticates as
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StaticToken {
    pub token: String,
    pub user: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub groups: Vec<String>,
}
