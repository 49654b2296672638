use crate::admission::{AdmissionAttributes, GroupResource, Operation};
use crate::audit::{self, AuditEvent};
use crate::authn::UserInfo;
use crate::errors::ApiError;
use crate::models::{OAuthAccessToken, ACCESS_TOKENS_RESOURCE, OAUTH_GROUP};
use crate::openapi::OAUTH_TAG;
use crate::state::AppState;
use axum::{
    extract::{Extension, Json, Path, State},
    response::{IntoResponse, Response},
};
use http::StatusCode;
use log::info;
use std::sync::Arc;

/// Minimum length of an access token object name
const MIN_TOKEN_NAME_LENGTH: usize = 32;

fn validate_new_token(token: &OAuthAccessToken) -> Result<(), ApiError> {
    if token.metadata.name.len() < MIN_TOKEN_NAME_LENGTH {
        return Err(ApiError::bad_request(format!(
            "metadata.name: must be at least {MIN_TOKEN_NAME_LENGTH} characters long"
        )));
    }
    if token.client_name.is_empty() {
        return Err(ApiError::bad_request("clientName: Required value"));
    }
    if token.user_name.is_empty() {
        return Err(ApiError::bad_request("userName: Required value"));
    }
    if token.user_uid.is_empty() {
        return Err(ApiError::bad_request("userUID: Required value"));
    }
    Ok(())
}

fn group_resource() -> GroupResource {
    GroupResource::new(OAUTH_GROUP, ACCESS_TOKENS_RESOURCE)
}

/// Store a new OAuth access token
#[utoipa::path(
    post,
    path = "/apis/oauth.openshift.io/v1/oauthaccesstokens",
    tag = OAUTH_TAG,
    request_body = OAuthAccessToken,
    responses(
        (status = 201, description = "Token stored", body = OAuthAccessToken),
        (status = 400, description = "Invalid token"),
        (status = 409, description = "Token already exists")
    )
)]
pub(crate) async fn create_access_token(
    State(state): State<AppState>,
    Extension(user): Extension<UserInfo>,
    Json(token): Json<OAuthAccessToken>,
) -> Result<Response, ApiError> {
    validate_new_token(&token)?;

    let mut attributes =
        AdmissionAttributes::new(group_resource(), Operation::Create, &token.metadata.name)
            .with_user(Some(user))
            .with_object(Arc::new(token.clone()));
    state.admission.validate(&mut attributes)?;

    let created = state.access_tokens.create(token).await?;
    audit::emit(&AuditEvent::from_admission("create", &attributes, 201));
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// Get an OAuth access token by name
#[utoipa::path(
    get,
    path = "/apis/oauth.openshift.io/v1/oauthaccesstokens/{name}",
    tag = OAUTH_TAG,
    params(
        ("name" = String, Path, description = "Token object name"),
    ),
    responses(
        (status = 200, description = "Token found", body = OAuthAccessToken),
        (status = 404, description = "Token not found")
    )
)]
pub(crate) async fn get_access_token(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<OAuthAccessToken>, ApiError> {
    state
        .access_tokens
        .get(&name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(ACCESS_TOKENS_RESOURCE, &name))
}

/// Delete an OAuth access token, logging the owner out
#[utoipa::path(
    delete,
    path = "/apis/oauth.openshift.io/v1/oauthaccesstokens/{name}",
    tag = OAUTH_TAG,
    params(
        ("name" = String, Path, description = "Token object name"),
    ),
    responses(
        (status = 200, description = "Token deleted", body = OAuthAccessToken),
        (status = 403, description = "Rejected by admission"),
        (status = 404, description = "Token not found")
    )
)]
pub(crate) async fn delete_access_token(
    State(state): State<AppState>,
    Extension(user): Extension<UserInfo>,
    Path(name): Path<String>,
) -> Result<Json<OAuthAccessToken>, ApiError> {
    let existing = state
        .access_tokens
        .get(&name)
        .await?
        .ok_or_else(|| ApiError::not_found(ACCESS_TOKENS_RESOURCE, &name))?;

    let mut attributes = AdmissionAttributes::new(group_resource(), Operation::Delete, &name)
        .with_user(Some(user))
        .with_object(Arc::new(existing));
    state.admission.validate(&mut attributes)?;

    let deleted = state.access_tokens.delete(&name).await?;
    info!("Deleted oauthaccesstoken {name} of user {}", deleted.user_name);
    audit::emit(&AuditEvent::from_admission("delete", &attributes, 200));
    Ok(Json(deleted))
}
