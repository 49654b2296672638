use confique::Config;
use std::path::Path;
use thiserror::Error;

pub mod admission;
pub mod authentication;
pub mod authorization;
pub mod storage;
pub mod token_review;

pub(crate) use admission::AdmissionConfig;
pub(crate) use authentication::{AuthenticationConfig, StaticToken, StaticTokensFile, WebhookConfig};
pub(crate) use authorization::{AuthorizationConfig, PolicyFile, PolicyRule};
pub(crate) use storage::StorageConfig;
pub(crate) use token_review::{TokenReviewBackend, TokenReviewConfig};

/// Environment variable naming the TOML configuration file
pub const CONFIG_FILE_ENV: &str = "OAUTH_APISERVER_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "oauth-apiserver.toml";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load settings: {0}")]
    Settings(#[from] confique::Error),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
}

/// Main configuration structure for the OAuth API server
#[derive(Debug, Config, Clone)]
pub struct Settings {
    /// The port the server will listen to (default: 8080)
    #[config(env = "OAUTH_APISERVER_PORT", default = 8080)]
    pub port: u16,

    /// Token review endpoint configuration
    #[config(nested)]
    pub token_review: TokenReviewConfig,

    /// Authenticators for inbound requests and token reviews
    #[config(nested)]
    pub authentication: AuthenticationConfig,

    /// General authorizer configuration
    #[config(nested)]
    pub authorization: AuthorizationConfig,

    /// Admission chain configuration
    #[config(nested)]
    pub admission: AdmissionConfig,

    /// Resource storage configuration
    #[config(nested)]
    pub storage: StorageConfig,
}

impl Settings {
    /// Loads settings from environment variables, then from the TOML file
    /// named by `OAUTH_APISERVER_CONFIG` (missing files are skipped).
    pub fn new() -> Result<Self, ConfigError> {
        let file = std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Ok(Settings::builder().env().file(file).load()?)
    }

    #[cfg(test)]
    pub fn for_test() -> Self {
        Self {
            port: 0, // Let the OS choose a port
            token_review: TokenReviewConfig {
                audiences: String::new(),
                timeout: 5,
                expose_authenticator_errors: true,
                backend: TokenReviewBackend::AccessTokens,
            },
            authentication: AuthenticationConfig {
                static_tokens_file: None,
                access_token_inactivity_timeout: None,
                webhook: WebhookConfig {
                    url: None,
                    timeout: 5,
                },
            },
            authorization: AuthorizationConfig { policy_file: None },
            admission: AdmissionConfig {
                enable_plugins: crate::admission::audit_logouts::PLUGIN_NAME.to_string(),
                plugin_config_dir: None,
            },
            storage: StorageConfig { capacity: 1000 },
        }
    }
}

/// Splits a comma separated setting into its trimmed, non-empty parts
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Reads a YAML side file such as the policy or static token file
pub(crate) fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let parsed = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("Loaded {}", path.display());
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        let settings = Settings::builder().load().unwrap();

        assert_eq!(settings.port, 8080);
        assert_eq!(settings.token_review.timeout, 10);
        assert!(settings.token_review.expose_authenticator_errors);
        assert_eq!(settings.token_review.backend, TokenReviewBackend::AccessTokens);
        assert!(settings.token_review.api_audiences().is_empty());
        assert_eq!(settings.authentication.webhook.timeout, 10);
        assert!(settings.authentication.static_tokens_file.is_none());
        assert!(settings.authentication.access_token_inactivity_timeout.is_none());
        assert!(settings.authorization.policy_file.is_none());
        assert_eq!(
            settings.admission.enabled_plugins(),
            vec!["oauth.openshift.io/AuditLogouts"]
        );
        assert_eq!(settings.storage.capacity, 100_000);
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("OAUTH_APISERVER_API_AUDIENCES", "https://kubernetes.default.svc, other");
        std::env::set_var("OAUTH_APISERVER_TOKEN_REVIEW_BACKEND", "webhook");
        std::env::set_var("OAUTH_APISERVER_WEBHOOK_URL", "http://localhost:9443/review");
        std::env::set_var("OAUTH_APISERVER_ACCESS_TOKEN_INACTIVITY_TIMEOUT", "300");

        let settings = Settings::builder().env().load().unwrap();
        assert_eq!(
            settings.token_review.api_audiences(),
            vec!["https://kubernetes.default.svc", "other"]
        );
        assert_eq!(settings.token_review.backend, TokenReviewBackend::Webhook);
        assert_eq!(
            settings.authentication.webhook.url.as_deref(),
            Some("http://localhost:9443/review")
        );
        assert_eq!(
            settings.authentication.access_token_inactivity_timeout,
            Some(300)
        );

        std::env::remove_var("OAUTH_APISERVER_API_AUDIENCES");
        std::env::remove_var("OAUTH_APISERVER_TOKEN_REVIEW_BACKEND");
        std::env::remove_var("OAUTH_APISERVER_WEBHOOK_URL");
        std::env::remove_var("OAUTH_APISERVER_ACCESS_TOKEN_INACTIVITY_TIMEOUT");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" a , b ,,c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
