use crate::authn::UserInfo;
use crate::authz::{resolve_attributes, Attributes, Decision};
use crate::errors::ApiError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use log::{debug, error};

fn forbidden_message(attributes: &Attributes) -> String {
    let user = attributes.user_name();
    if attributes.resource_request {
        format!(
            "{user} cannot {} resource \"{}\" in API group \"{}\"",
            attributes.verb, attributes.resource, attributes.api_group
        )
    } else {
        format!("{user} cannot {} path \"{}\"", attributes.verb, attributes.path)
    }
}

/// Resolves the request's authorization attributes and asks the
/// authorizer. Anything short of an explicit allow is rejected.
pub(super) async fn authorization_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let user = request.extensions().get::<UserInfo>().cloned();
    let attributes = resolve_attributes(request.method(), request.uri().path(), user);

    match state.authorizer.authorize(&attributes).await {
        Ok(auth) if auth.decision == Decision::Allow => {
            debug!("Authorized {}: {}", attributes.user_name(), auth.reason);
            next.run(request).await
        }
        Ok(auth) => {
            debug!(
                "Forbidden {} {} for {}: {}",
                attributes.verb,
                attributes.path,
                attributes.user_name(),
                auth.reason
            );
            ApiError::forbidden(forbidden_message(&attributes)).into_response()
        }
        Err(e) => {
            error!("Authorization failed for {}: {e}", attributes.path);
            ApiError::internal(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestFixture, AUTHENTICATOR_TOKEN, DEVELOPER_TOKEN};
    use http::{Method, StatusCode};
    use serde_json::json;

    #[test]
    fn test_forbidden_messages() {
        let attrs = resolve_attributes(
            &Method::DELETE,
            "/apis/oauth.openshift.io/v1/oauthaccesstokens/tok",
            Some(UserInfo::named("developer")),
        );
        assert_eq!(
            forbidden_message(&attrs),
            "developer cannot delete resource \"oauthaccesstokens\" in API group \"oauth.openshift.io\""
        );

        let attrs = resolve_attributes(&Method::GET, "/metrics", Some(UserInfo::named("developer")));
        assert_eq!(forbidden_message(&attrs), "developer cannot get path \"/metrics\"");
    }

    #[tokio::test]
    async fn test_authenticated_but_not_authorized() {
        let fixture = TestFixture::new().await.with_token(DEVELOPER_TOKEN);
        let response = fixture
            .post(
                "/apis/oauth.openshift.io/v1/tokenreviews",
                &json!({"spec": {"token": "abc"}}),
            )
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(
            response.json["message"],
            "developer cannot create resource \"tokenreviews\" in API group \"oauth.openshift.io\""
        );
    }

    #[tokio::test]
    async fn test_authenticator_service_account_limited_to_tokenreviews() {
        let fixture = TestFixture::new().await.with_token(AUTHENTICATOR_TOKEN);

        let response = fixture.get("/apis/user.openshift.io/v1/users/alice").await;
        response.assert_status(StatusCode::FORBIDDEN);

        let response = fixture
            .post(
                "/apis/oauth.openshift.io/v1/tokenreviews",
                &json!({"spec": {"token": "abc"}}),
            )
            .await;
        response.assert_status(StatusCode::CREATED);
    }
}
