use super::{Audiences, AuthenticationError, AuthenticationResponse, TokenAuthenticator};
use log::debug;
use std::sync::Arc;

/// Adapts a token authenticator that knows nothing about audiences.
///
/// Tokens it accepts are taken to be valid for the server's implicit
/// audiences, so a request naming audiences only succeeds when it shares
/// at least one with them.
pub struct AudienceAgnostic {
    implicit: Audiences,
    delegate: Arc<dyn TokenAuthenticator>,
}

impl AudienceAgnostic {
    pub fn new(implicit: Audiences, delegate: Arc<dyn TokenAuthenticator>) -> Self {
        Self { implicit, delegate }
    }
}

#[async_trait::async_trait]
impl TokenAuthenticator for AudienceAgnostic {
    async fn authenticate_token(
        &self,
        token: &str,
        audiences: Option<&Audiences>,
    ) -> Result<Option<AuthenticationResponse>, AuthenticationError> {
        let Some(requested) = audiences.filter(|a| !a.is_empty()) else {
            return self.delegate.authenticate_token(token, None).await;
        };

        let shared = self.implicit.intersect(requested);
        if shared.is_empty() {
            debug!(
                "Requested audiences {:?} do not overlap implicit audiences {:?}",
                requested.as_slice(),
                self.implicit.as_slice()
            );
            return Ok(None);
        }

        Ok(self
            .delegate
            .authenticate_token(token, None)
            .await?
            .map(|mut response| {
                response.audiences = shared;
                response
            }))
    }
}
