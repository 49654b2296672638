use super::{
    Audiences, AuthenticationError, AuthenticationResponse, TokenAuthenticator, UserInfo,
};
use crate::models::{OAuthAccessToken, User};
use crate::storage::ResourceStore;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use log::{debug, warn};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

/// Prefix of tokens whose object is stored under a hash of the secret
pub const SHA256_PREFIX: &str = "sha256~";

/// Extra key carrying the scopes granted to the token
pub const SCOPES_EXTRA_KEY: &str = "scopes.authorization.openshift.io";

/// Name of the stored object backing `token`.
///
/// `sha256~<secret>` tokens are stored as `sha256~` followed by the unpadded
/// URL-safe base64 SHA-256 of the secret; anything else is the name itself.
pub fn token_object_name(token: &str) -> String {
    match token.strip_prefix(SHA256_PREFIX) {
        Some(secret) => {
            let digest = Sha256::digest(secret.as_bytes());
            format!("{SHA256_PREFIX}{}", URL_SAFE_NO_PAD.encode(digest))
        }
        None => token.to_string(),
    }
}

/// Validates OAuth access tokens held by this server.
pub struct AccessTokenAuthenticator {
    tokens: Arc<dyn ResourceStore<OAuthAccessToken>>,
    users: Arc<dyn ResourceStore<User>>,
    inactivity_timeout: Option<u64>,
}

impl AccessTokenAuthenticator {
    pub fn new(
        tokens: Arc<dyn ResourceStore<OAuthAccessToken>>,
        users: Arc<dyn ResourceStore<User>>,
        inactivity_timeout: Option<u64>,
    ) -> Self {
        Self {
            tokens,
            users,
            inactivity_timeout,
        }
    }

    /// Push the token's inactivity deadline to `timeout` seconds from now
    async fn bump_inactivity_timeout(
        &self,
        mut token: OAuthAccessToken,
        timeout: u64,
    ) -> Result<(), AuthenticationError> {
        let age = token.age_seconds(Utc::now()).max(0) as u64;
        let seconds = i32::try_from(age.saturating_add(timeout)).unwrap_or(i32::MAX);
        token.inactivity_timeout_seconds = seconds;
        self.tokens.update(token).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TokenAuthenticator for AccessTokenAuthenticator {
    async fn authenticate_token(
        &self,
        token: &str,
        _audiences: Option<&Audiences>,
    ) -> Result<Option<AuthenticationResponse>, AuthenticationError> {
        let name = token_object_name(token);
        let Some(access_token) = self.tokens.get(&name).await? else {
            debug!("No access token stored under {name}");
            return Ok(None);
        };

        let now = Utc::now();
        if access_token.is_expired(now) {
            return Err(AuthenticationError::TokenExpired);
        }
        if access_token.is_timed_out(now) {
            return Err(AuthenticationError::TokenTimedOut);
        }

        let user = self
            .users
            .get(&access_token.user_name)
            .await?
            .ok_or_else(|| AuthenticationError::UserNotFound(access_token.user_name.clone()))?;
        let user_uid = user.metadata.uid.clone().unwrap_or_default();
        if user_uid != access_token.user_uid {
            warn!(
                "Access token for {} carries a stale user UID",
                access_token.user_name
            );
            return Err(AuthenticationError::UserUidMismatch {
                user_uid,
                token_uid: access_token.user_uid.clone(),
            });
        }

        let mut extra = HashMap::new();
        if !access_token.scopes.is_empty() {
            extra.insert(SCOPES_EXTRA_KEY.to_string(), access_token.scopes.clone());
        }
        let info = UserInfo {
            name: user.metadata.name,
            uid: user_uid,
            groups: user.groups,
            extra,
        };

        if let Some(timeout) = self.inactivity_timeout {
            self.bump_inactivity_timeout(access_token, timeout).await?;
        }

        Ok(Some(AuthenticationResponse::for_user(info)))
    }
}
