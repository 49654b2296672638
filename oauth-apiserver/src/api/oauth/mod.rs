//! Routes of the `oauth.openshift.io/v1` API group.

pub mod access_tokens;
pub mod tokenreviews;

use crate::state::AppState;
use axum::routing::{get, post, Router};

/// Creates the OAuth API group routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/apis/oauth.openshift.io/v1/tokenreviews",
            post(tokenreviews::create_token_review),
        )
        .route(
            "/apis/oauth.openshift.io/v1/namespaces/{namespace}/tokenreviews",
            post(tokenreviews::create_namespaced_token_review),
        )
        .route(
            "/apis/oauth.openshift.io/v1/oauthaccesstokens",
            post(access_tokens::create_access_token),
        )
        .route(
            "/apis/oauth.openshift.io/v1/oauthaccesstokens/{name}",
            get(access_tokens::get_access_token).delete(access_tokens::delete_access_token),
        )
}
