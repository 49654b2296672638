use crate::models::TokenReview;
use crate::openapi::OAUTH_TAG;
use crate::state::AppState;
use crate::tokenreview::NoValidation;
use axum::{
    extract::{Json, Path, State},
    response::{IntoResponse, Response},
};
use http::StatusCode;

async fn create(state: &AppState, namespace: Option<&str>, review: TokenReview) -> Response {
    match state
        .token_reviews
        .create(namespace, review, None::<NoValidation>)
        .await
    {
        Ok(review) => (StatusCode::CREATED, Json(review)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Review an OAuth access token
#[utoipa::path(
    post,
    path = "/apis/oauth.openshift.io/v1/tokenreviews",
    tag = OAUTH_TAG,
    request_body = TokenReview,
    params(
        ("Authorization" = String, Header, description = "Bearer token of the caller"),
    ),
    responses(
        (status = 201, description = "Review completed, see status", body = TokenReview),
        (status = 400, description = "Invalid review"),
        (status = 401, description = "Caller not authenticated"),
        (status = 403, description = "Caller may not create token reviews"),
        (status = 500, description = "Audience validation failed")
    )
)]
pub(crate) async fn create_token_review(
    State(state): State<AppState>,
    Json(review): Json<TokenReview>,
) -> Response {
    create(&state, None, review).await
}

/// Token reviews are cluster scoped; this route only reports the error
#[utoipa::path(
    post,
    path = "/apis/oauth.openshift.io/v1/namespaces/{namespace}/tokenreviews",
    tag = OAUTH_TAG,
    request_body = TokenReview,
    params(
        ("namespace" = String, Path, description = "Namespace, always rejected"),
    ),
    responses(
        (status = 400, description = "Namespace is not allowed")
    )
)]
pub(crate) async fn create_namespaced_token_review(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
    Json(review): Json<TokenReview>,
) -> Response {
    create(&state, Some(&namespace), review).await
}
