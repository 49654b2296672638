use super::{Audiences, AuthenticationError, AuthenticationResponse, TokenAuthenticator, UserInfo};
use crate::models::TokenReview;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue};
use log::debug;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Delegates token reviews to a remote service speaking the TokenReview API.
pub struct WebhookTokenAuthenticator {
    url: Url,
    client: Client,
}

impl WebhookTokenAuthenticator {
    pub fn new(url: &str, timeout: u64) -> Result<Self, AuthenticationError> {
        let url = Url::parse(url)
            .map_err(|e| AuthenticationError::Webhook(format!("invalid URL {url}: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(2))
            .default_headers(headers)
            .build()
            .map_err(|e| AuthenticationError::Webhook(e.to_string()))?;

        Ok(Self { url, client })
    }
}

#[async_trait::async_trait]
impl TokenAuthenticator for WebhookTokenAuthenticator {
    async fn authenticate_token(
        &self,
        token: &str,
        audiences: Option<&Audiences>,
    ) -> Result<Option<AuthenticationResponse>, AuthenticationError> {
        let mut review = TokenReview::for_token(token);
        if let Some(audiences) = audiences {
            review.spec.audiences = audiences.as_slice().to_vec();
        }

        debug!("Forwarding token review to {}", self.url);
        let response = self
            .client
            .post(self.url.clone())
            .json(&review)
            .send()
            .await
            .map_err(|e| AuthenticationError::Webhook(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthenticationError::Webhook(format!(
                "request failed with status: {}",
                response.status()
            )));
        }

        let review: TokenReview = response
            .json()
            .await
            .map_err(|e| AuthenticationError::Webhook(format!("invalid response: {e}")))?;
        let status = review.status;

        if !status.authenticated {
            return match status.error {
                Some(error) if !error.is_empty() => Err(AuthenticationError::Webhook(error)),
                _ => Ok(None),
            };
        }

        let user = status.user.unwrap_or_default();
        Ok(Some(AuthenticationResponse {
            user: UserInfo {
                name: user.username,
                uid: user.uid,
                groups: user.groups,
                extra: user.extra.into_iter().map(|(k, v)| (k, v.0)).collect(),
            },
            audiences: Audiences::new(status.audiences),
        }))
    }
}
