use crate::api;
use utoipa::OpenApi;

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const OAUTH_TAG: &str = "OAuth API";
pub(crate) const USER_TAG: &str = "User API";

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::healthz,
        api::health::readyz,
        api::oauth::tokenreviews::create_token_review,
        api::oauth::tokenreviews::create_namespaced_token_review,
        api::oauth::access_tokens::create_access_token,
        api::oauth::access_tokens::get_access_token,
        api::oauth::access_tokens::delete_access_token,
        api::users::create_user,
        api::users::get_user,
    ),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = OAUTH_TAG, description = "Token reviews and OAuth access tokens"),
        (name = USER_TAG, description = "Users known to the OAuth server"),
    ),
    info(
        title = "OpenShift OAuth API Server",
        description = "Serves OAuth resources and reviews OAuth access tokens",
        version = "1.0.0"
    )
)]
pub(crate) struct ApiDoc;
