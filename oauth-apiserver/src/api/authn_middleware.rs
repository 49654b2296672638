use crate::authn::AuthenticationRequest;
use crate::errors::ApiError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use log::{debug, warn};

/// Authenticates the caller and stores its `UserInfo` in the request
/// extensions for the handlers and the authorization filter.
pub(super) async fn authentication_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if !request.headers().contains_key(http::header::AUTHORIZATION) {
        warn!("Missing Authorization header");
        return ApiError::unauthorized("Unauthorized").into_response();
    }

    let authn_request = AuthenticationRequest {
        headers: request.headers().clone(),
        audiences: None,
    };

    match state.authenticator.authenticate_request(&authn_request).await {
        Ok(Some(response)) => {
            debug!("Authenticated request as {}", response.user.name);
            request.extensions_mut().insert(response.user);
            next.run(request).await
        }
        Ok(None) => {
            debug!("Request carried no valid credentials");
            ApiError::unauthorized("Unauthorized").into_response()
        }
        Err(e) => {
            warn!("Authentication failed: {e}");
            ApiError::unauthorized("Unauthorized").into_response()
        }
    }
}
