use super::{
    AuthenticationError, AuthenticationRequest, AuthenticationResponse, Authenticator,
    TokenAuthenticator,
};
use log::debug;
use std::sync::Arc;

/// Pulls `Authorization: Bearer <token>` out of a request and hands the
/// token to a token authenticator.
pub struct BearerTokenAuthenticator {
    delegate: Arc<dyn TokenAuthenticator>,
}

impl BearerTokenAuthenticator {
    pub fn new(delegate: Arc<dyn TokenAuthenticator>) -> Self {
        Self { delegate }
    }
}

#[async_trait::async_trait]
impl Authenticator for BearerTokenAuthenticator {
    async fn authenticate_request(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<Option<AuthenticationResponse>, AuthenticationError> {
        let Some(header) = request.headers.get(http::header::AUTHORIZATION) else {
            return Ok(None);
        };
        let Ok(header) = header.to_str() else {
            debug!("Authorization header is not valid ASCII");
            return Ok(None);
        };

        let Some((scheme, token)) = header.trim_start().split_once(' ') else {
            return Ok(None);
        };
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Ok(None);
        }

        let token = token.trim();
        if token.is_empty() {
            return Err(AuthenticationError::InvalidBearerToken);
        }

        self.delegate
            .authenticate_token(token, request.audiences.as_ref())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authn::{Audiences, UserInfo};
    use http::{HeaderMap, HeaderValue};
    use std::sync::Mutex;

    /// Records the token it was called with and accepts everything
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(String, Option<Audiences>)>>,
    }

    #[async_trait::async_trait]
    impl TokenAuthenticator for Recorder {
        async fn authenticate_token(
            &self,
            token: &str,
            audiences: Option<&Audiences>,
        ) -> Result<Option<AuthenticationResponse>, AuthenticationError> {
            self.seen
                .lock()
                .unwrap()
                .push((token.to_string(), audiences.cloned()));
            Ok(Some(AuthenticationResponse::for_user(UserInfo::named(
                "alice",
            ))))
        }
    }

    fn request(header: Option<&str>) -> AuthenticationRequest {
        let mut headers = HeaderMap::new();
        if let Some(value) = header {
            headers.insert(
                http::header::AUTHORIZATION,
                HeaderValue::from_str(value).unwrap(),
            );
        }
        AuthenticationRequest {
            headers,
            audiences: None,
        }
    }

    #[tokio::test]
    async fn test_extracts_bearer_token() {
        let recorder = Arc::new(Recorder::default());
        let authn = BearerTokenAuthenticator::new(recorder.clone());

        let mut req = request(Some("bearer   my-token "));
        req.audiences = Some(Audiences::new(["api"]));
        let resp = authn.authenticate_request(&req).await.unwrap().unwrap();

        assert_eq!(resp.user.name, "alice");
        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen[0].0, "my-token");
        assert_eq!(seen[0].1, Some(Audiences::new(["api"])));
    }

    #[tokio::test]
    async fn test_missing_or_foreign_header() {
        let recorder = Arc::new(Recorder::default());
        let authn = BearerTokenAuthenticator::new(recorder.clone());

        assert!(authn.authenticate_request(&request(None)).await.unwrap().is_none());
        assert!(authn
            .authenticate_request(&request(Some("Basic dXNlcjpwYXNz")))
            .await
            .unwrap()
            .is_none());
        assert!(recorder.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_token_is_an_error() {
        let recorder = Arc::new(Recorder::default());
        let authn = BearerTokenAuthenticator::new(recorder.clone());

        let result = authn.authenticate_request(&request(Some("Bearer   "))).await;
        assert!(matches!(result, Err(AuthenticationError::InvalidBearerToken)));
        assert!(recorder.seen.lock().unwrap().is_empty());
    }
}
