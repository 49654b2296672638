//! The `tokenreviews` resource: create-only, never persisted.

use crate::authn::{Audiences, AuthenticationError, AuthenticationRequest, Authenticator};
use crate::errors::ApiError;
use crate::models::{ExtraValue, TokenReview, TokenReviewUser};
use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};
use log::{debug, error, warn};
use std::sync::Arc;
use std::time::Duration;

/// Status error reported when authenticator errors are not exposed
pub const GENERIC_AUTHENTICATION_ERROR: &str = "token authentication failed";

pub struct TokenReviewRest {
    authenticator: Option<Arc<dyn Authenticator>>,
    api_audiences: Audiences,
    timeout: Duration,
    expose_errors: bool,
}

impl TokenReviewRest {
    pub fn new(
        authenticator: Option<Arc<dyn Authenticator>>,
        api_audiences: Audiences,
        timeout: Duration,
        expose_errors: bool,
    ) -> Self {
        Self {
            authenticator,
            api_audiences,
            timeout,
            expose_errors,
        }
    }

    /// Authenticate the token carried by `review` and fill in its status.
    ///
    /// `validation` sees a copy of the review before authentication and can
    /// abort the request.
    pub async fn create<V>(
        &self,
        namespace: Option<&str>,
        mut review: TokenReview,
        validation: Option<V>,
    ) -> Result<TokenReview, ApiError>
    where
        V: FnOnce(&TokenReview) -> Result<(), ApiError>,
    {
        let namespace = namespace
            .filter(|ns| !ns.is_empty())
            .or(review.metadata.namespace.as_deref().filter(|ns| !ns.is_empty()));
        if let Some(ns) = namespace {
            return Err(ApiError::bad_request(format!(
                "namespace is not allowed on this type: {ns}"
            )));
        }

        if review.spec.token.is_empty() {
            return Err(ApiError::bad_request(
                "token is required for TokenReview in authentication",
            ));
        }

        if let Some(validate) = validation {
            let copy = review.clone();
            validate(&copy)?;
        }

        let Some(authenticator) = &self.authenticator else {
            return Ok(review);
        };

        let audiences = if review.spec.audiences.is_empty() {
            self.api_audiences.clone()
        } else {
            Audiences::new(review.spec.audiences.iter().cloned())
        };

        let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", review.spec.token)) else {
            return Ok(self.failed(review, AuthenticationError::InvalidBearerToken));
        };
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        let request = AuthenticationRequest {
            headers,
            audiences: (!audiences.is_empty()).then(|| audiences.clone()),
        };

        let outcome = tokio::time::timeout(self.timeout, authenticator.authenticate_request(&request))
            .await
            .unwrap_or(Err(AuthenticationError::Timeout));

        let response = match outcome {
            Ok(Some(response)) => response,
            Ok(None) => return Ok(review),
            Err(err) => return Ok(self.failed(review, err)),
        };

        if !audiences.is_empty() && audiences.intersect(&response.audiences).is_empty() {
            error!(
                "Error validating audience. wanted={:?}, got={:?}",
                audiences.as_slice(),
                response.audiences.as_slice()
            );
            return Err(ApiError::internal("error validating audiences"));
        }

        debug!("Token review authenticated {}", response.user.name);
        let user = response.user;
        review.status.authenticated = true;
        review.status.user = Some(TokenReviewUser {
            username: user.name,
            uid: user.uid,
            groups: user.groups,
            extra: user
                .extra
                .into_iter()
                .map(|(key, values)| (key, ExtraValue::from(values)))
                .collect(),
        });
        review.status.audiences = response.audiences.into_vec();

        Ok(review)
    }

    /// Unauthenticated review carrying the error, or the generic text when
    /// errors are not exposed
    fn failed(&self, mut review: TokenReview, err: AuthenticationError) -> TokenReview {
        warn!("Token review authentication failed: {err}");
        review.status.error = Some(if self.expose_errors {
            err.to_string()
        } else {
            GENERIC_AUTHENTICATION_ERROR.to_string()
        });
        review
    }
}

/// Validation callback used by callers that have none
pub type NoValidation = fn(&TokenReview) -> Result<(), ApiError>;
