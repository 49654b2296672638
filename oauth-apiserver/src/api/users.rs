//! Routes of the `user.openshift.io/v1` API group.

use crate::admission::{AdmissionAttributes, GroupResource, Operation};
use crate::audit::{self, AuditEvent};
use crate::authn::UserInfo;
use crate::errors::ApiError;
use crate::models::{User, USERS_RESOURCE, USER_GROUP};
use crate::openapi::USER_TAG;
use crate::state::AppState;
use axum::{
    extract::{Extension, Json, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use http::StatusCode;
use std::sync::Arc;

/// Create a user
#[utoipa::path(
    post,
    path = "/apis/user.openshift.io/v1/users",
    tag = USER_TAG,
    request_body = User,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid user"),
        (status = 409, description = "User already exists")
    )
)]
pub(crate) async fn create_user(
    State(state): State<AppState>,
    Extension(caller): Extension<UserInfo>,
    Json(user): Json<User>,
) -> Result<Response, ApiError> {
    if user.metadata.name.is_empty() {
        return Err(ApiError::bad_request("metadata.name: Required value"));
    }

    let mut attributes = AdmissionAttributes::new(
        GroupResource::new(USER_GROUP, USERS_RESOURCE),
        Operation::Create,
        &user.metadata.name,
    )
    .with_user(Some(caller))
    .with_object(Arc::new(user.clone()));
    state.admission.validate(&mut attributes)?;

    let created = state.users.create(user).await?;
    audit::emit(&AuditEvent::from_admission("create", &attributes, 201));
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// Get a user by name
#[utoipa::path(
    get,
    path = "/apis/user.openshift.io/v1/users/{name}",
    tag = USER_TAG,
    params(
        ("name" = String, Path, description = "User name"),
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found")
    )
)]
pub(crate) async fn get_user(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<User>, ApiError> {
    state
        .users
        .get(&name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(USERS_RESOURCE, &name))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/apis/user.openshift.io/v1/users", post(create_user))
        .route("/apis/user.openshift.io/v1/users/{name}", get(get_user))
}
