use super::{Audiences, AuthenticationError, AuthenticationResponse, TokenAuthenticator, UserInfo};
use crate::config::StaticToken;
use std::collections::HashMap;

/// Maps configured bearer tokens to fixed identities.
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, UserInfo>,
}

impl StaticTokenAuthenticator {
    pub fn new(tokens: &[StaticToken]) -> Self {
        let tokens = tokens
            .iter()
            .map(|t| {
                (
                    t.token.clone(),
                    UserInfo {
                        name: t.user.clone(),
                        uid: t.uid.clone(),
                        groups: t.groups.clone(),
                        extra: HashMap::new(),
                    },
                )
            })
            .collect();
        Self { tokens }
    }
}

#[async_trait::async_trait]
impl TokenAuthenticator for StaticTokenAuthenticator {
    async fn authenticate_token(
        &self,
        token: &str,
        _audiences: Option<&Audiences>,
    ) -> Result<Option<AuthenticationResponse>, AuthenticationError> {
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self
            .tokens
            .get(token)
            .cloned()
            .map(AuthenticationResponse::for_user))
    }
}
