use super::{Audiences, AuthenticationError, AuthenticationResponse, TokenAuthenticator};
use std::sync::Arc;

/// Tries token authenticators in order; the first to authenticate wins.
///
/// Member errors are only reported when no member authenticated the token.
pub struct UnionTokenAuthenticator {
    authenticators: Vec<Arc<dyn TokenAuthenticator>>,
}

impl UnionTokenAuthenticator {
    pub fn new(authenticators: Vec<Arc<dyn TokenAuthenticator>>) -> Self {
        Self { authenticators }
    }
}

#[async_trait::async_trait]
impl TokenAuthenticator for UnionTokenAuthenticator {
    async fn authenticate_token(
        &self,
        token: &str,
        audiences: Option<&Audiences>,
    ) -> Result<Option<AuthenticationResponse>, AuthenticationError> {
        let mut errors = Vec::new();
        for authenticator in &self.authenticators {
            match authenticator.authenticate_token(token, audiences).await {
                Ok(Some(response)) => return Ok(Some(response)),
                Ok(None) => {}
                Err(err) => errors.push(err),
            }
        }

        match errors.len() {
            0 => Ok(None),
            1 => Err(errors.remove(0)),
            _ => Err(AuthenticationError::Aggregate(errors)),
        }
    }
}
