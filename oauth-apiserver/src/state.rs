use crate::admission::{AdmissionChain, AdmissionError, Plugins};
use crate::authn::{
    AccessTokenAuthenticator, AudienceAgnostic, Audiences, AuthenticationError, Authenticator,
    BearerTokenAuthenticator, StaticTokenAuthenticator, TokenAuthenticator,
    UnionTokenAuthenticator, WebhookTokenAuthenticator,
};
use crate::authz::{Authorizer, RuleAuthorizer, TokenReviewAuthorizer, UnionAuthorizer};
use crate::config::{
    load_yaml, ConfigError, PolicyFile, PolicyRule, Settings, StaticToken, StaticTokensFile,
    TokenReviewBackend,
};
use crate::models::{OAuthAccessToken, User, ACCESS_TOKENS_RESOURCE, USERS_RESOURCE};
use crate::storage::{InMemoryStore, ResourceStore};
use crate::tokenreview::TokenReviewRest;
use log::info;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to set up admission: {0}")]
    Admission(#[from] AdmissionError),
    #[error("Failed to set up token review authenticator: {0}")]
    Authenticator(#[from] AuthenticationError),
    #[error("token review backend \"webhook\" requires a webhook URL")]
    MissingWebhookUrl,
}

#[derive(Clone)]
pub struct AppState {
    pub access_tokens: Arc<dyn ResourceStore<OAuthAccessToken>>,
    pub users: Arc<dyn ResourceStore<User>>,
    /// Authenticates callers of the protected API
    pub authenticator: Arc<dyn Authenticator>,
    pub authorizer: Arc<dyn Authorizer>,
    pub admission: Arc<AdmissionChain>,
    pub token_reviews: Arc<TokenReviewRest>,
}

impl AppState {
    /// Build the state, loading the static tokens and policy files named in
    /// the settings
    pub fn new(settings: Settings) -> Result<Self, StateError> {
        let tokens = match &settings.authentication.static_tokens_file {
            Some(path) => {
                let file: StaticTokensFile = load_yaml(path)?;
                info!("Loaded {} static tokens from {}", file.tokens.len(), path.display());
                file.tokens
            }
            None => Vec::new(),
        };
        let rules = match &settings.authorization.policy_file {
            Some(path) => {
                let policy: PolicyFile = load_yaml(path)?;
                info!("Loaded {} policy rules from {}", policy.rules.len(), path.display());
                policy.rules
            }
            None => Vec::new(),
        };
        Self::build(settings, &tokens, rules)
    }

    pub fn build(
        settings: Settings,
        static_tokens: &[StaticToken],
        rules: Vec<PolicyRule>,
    ) -> Result<Self, StateError> {
        let capacity = settings.storage.capacity;
        let access_tokens: Arc<dyn ResourceStore<OAuthAccessToken>> =
            Arc::new(InMemoryStore::new(ACCESS_TOKENS_RESOURCE, capacity));
        let users: Arc<dyn ResourceStore<User>> =
            Arc::new(InMemoryStore::new(USERS_RESOURCE, capacity));

        let access_token_authn: Arc<dyn TokenAuthenticator> = Arc::new(AccessTokenAuthenticator::new(
            access_tokens.clone(),
            users.clone(),
            settings.authentication.access_token_inactivity_timeout,
        ));
        let authenticator = Arc::new(BearerTokenAuthenticator::new(Arc::new(
            UnionTokenAuthenticator::new(vec![
                Arc::new(StaticTokenAuthenticator::new(static_tokens)) as Arc<dyn TokenAuthenticator>,
                access_token_authn.clone(),
            ]),
        )));

        let token_reviews = Arc::new(TokenReviewRest::new(
            Self::token_review_authenticator(&settings, access_token_authn)?,
            Audiences::new(settings.token_review.api_audiences()),
            Duration::from_secs(settings.token_review.timeout),
            settings.token_review.expose_authenticator_errors,
        ));

        let authorizer = Arc::new(UnionAuthorizer::new(vec![
            Arc::new(TokenReviewAuthorizer) as Arc<dyn Authorizer>,
            Arc::new(RuleAuthorizer::new(rules)),
        ]));

        let admission = Plugins::with_builtin().new_chain(
            &settings.admission.enabled_plugins(),
            settings.admission.plugin_config_dir.as_deref(),
        )?;
        info!("Admission plugins enabled: {:?}", admission.plugin_names());

        Ok(Self {
            access_tokens,
            users,
            authenticator,
            authorizer,
            admission: Arc::new(admission),
            token_reviews,
        })
    }

    fn token_review_authenticator(
        settings: &Settings,
        access_tokens: Arc<dyn TokenAuthenticator>,
    ) -> Result<Option<Arc<dyn Authenticator>>, StateError> {
        let token_authn: Arc<dyn TokenAuthenticator> = match settings.token_review.backend {
            TokenReviewBackend::AccessTokens => Arc::new(AudienceAgnostic::new(
                Audiences::new(settings.token_review.api_audiences()),
                access_tokens,
            )),
            TokenReviewBackend::Webhook => {
                let webhook = &settings.authentication.webhook;
                let url = webhook.url.as_deref().ok_or(StateError::MissingWebhookUrl)?;
                info!("Token reviews are delegated to {url}");
                Arc::new(WebhookTokenAuthenticator::new(url, webhook.timeout)?)
            }
            TokenReviewBackend::None => {
                info!("Token reviews are disabled and will never authenticate");
                return Ok(None);
            }
        };
        Ok(Some(Arc::new(BearerTokenAuthenticator::new(token_authn))))
    }

    /// Check if all components are healthy
    pub async fn health_check(&self) -> Result<(), String> {
        self.access_tokens.health_check().await?;
        self.users.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_state_from_files() {
        let mut tokens = NamedTempFile::new().unwrap();
        tokens
            .write_all(b"tokens:\n  - token: admin-token\n    user: admin\n    groups: [\"system:masters\"]\n")
            .unwrap();
        let mut policy = NamedTempFile::new().unwrap();
        policy
            .write_all(b"rules:\n  - groups: [\"system:masters\"]\n    verbs: ['*']\n    apiGroups: ['*']\n    resources: ['*']\n")
            .unwrap();

        let mut settings = Settings::for_test();
        settings.authentication.static_tokens_file = Some(tokens.path().to_path_buf());
        settings.authorization.policy_file = Some(policy.path().to_path_buf());

        let state = AppState::new(settings).unwrap();
        assert!(state.health_check().await.is_ok());
        assert_eq!(
            state.admission.plugin_names(),
            vec![crate::admission::audit_logouts::PLUGIN_NAME]
        );
    }

    #[test]
    fn test_missing_policy_file() {
        let mut settings = Settings::for_test();
        settings.authorization.policy_file = Some("/nonexistent/policy.yaml".into());
        assert!(matches!(AppState::new(settings), Err(StateError::Config(_))));
    }

    #[test]
    fn test_webhook_backend_requires_url() {
        let mut settings = Settings::for_test();
        settings.token_review.backend = TokenReviewBackend::Webhook;
        assert!(matches!(
            AppState::build(settings, &[], Vec::new()),
            Err(StateError::MissingWebhookUrl)
        ));
    }

    #[test]
    fn test_unknown_admission_plugin() {
        let mut settings = Settings::for_test();
        settings.admission.enable_plugins = "example.io/Missing".to_string();
        assert!(matches!(
            AppState::build(settings, &[], Vec::new()),
            Err(StateError::Admission(AdmissionError::UnknownPlugin(_)))
        ));
    }

    #[test]
    fn test_app_state_clone() {
        let state = AppState::build(Settings::for_test(), &[], Vec::new()).unwrap();
        let state2 = state.clone();
        assert!(Arc::ptr_eq(&state.access_tokens, &state2.access_tokens));
        assert!(Arc::ptr_eq(&state.token_reviews, &state2.token_reviews));
    }
}
