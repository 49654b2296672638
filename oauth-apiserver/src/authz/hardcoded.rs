use super::{Attributes, Authorization, AuthorizationError, Authorizer};
use crate::models::{OAUTH_GROUP, TOKEN_REVIEWS_RESOURCE};

/// Service account the kube-apiserver authenticates as when it reviews
/// OAuth tokens.
pub const TOKEN_REVIEW_SERVICE_ACCOUNT: &str =
    "system:serviceaccount:openshift-oauth-apiserver:openshift-authenticator";

/// Lets the authenticator service account create token reviews and
/// nothing else. It never denies, so other authorizers still get a say.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenReviewAuthorizer;

impl TokenReviewAuthorizer {
    fn allows(attributes: &Attributes) -> bool {
        attributes.user_name() == TOKEN_REVIEW_SERVICE_ACCOUNT
            && attributes.resource_request
            && attributes.verb == "create"
            && attributes.api_group == OAUTH_GROUP
            && attributes.resource == TOKEN_REVIEWS_RESOURCE
            && attributes.subresource.is_empty()
    }
}

#[async_trait::async_trait]
impl Authorizer for TokenReviewAuthorizer {
    async fn authorize(
        &self,
        attributes: &Attributes,
    ) -> Result<Authorization, AuthorizationError> {
        if Self::allows(attributes) {
            Ok(Authorization::allow("requesting tokenreviews is allowed"))
        } else {
            Ok(Authorization::no_opinion())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authn::UserInfo;
    use crate::authz::Decision;

    fn attributes(user: &str, verb: &str, group: &str, resource: &str, sub: &str) -> Attributes {
        Attributes {
            user: Some(UserInfo::named(user)),
            verb: verb.to_string(),
            api_group: group.to_string(),
            resource: resource.to_string(),
            subresource: sub.to_string(),
            resource_request: true,
            ..Default::default()
        }
    }

    async fn decide(attributes: Attributes) -> Decision {
        TokenReviewAuthorizer
            .authorize(&attributes)
            .await
            .unwrap()
            .decision
    }

    #[tokio::test]
    async fn test_authenticator_may_create_tokenreviews() {
        let decision = decide(attributes(
            TOKEN_REVIEW_SERVICE_ACCOUNT,
            "create",
            "oauth.openshift.io",
            "tokenreviews",
            "",
        ))
        .await;
        assert_eq!(decision, Decision::Allow);
    }

    #[tokio::test]
    async fn test_everything_else_has_no_opinion() {
        let sa = TOKEN_REVIEW_SERVICE_ACCOUNT;
        let cases = [
            ("wrong user", attributes("other", "create", "oauth.openshift.io", "tokenreviews", "")),
            ("wrong verb", attributes(sa, "update", "oauth.openshift.io", "tokenreviews", "")),
            ("wrong group", attributes(sa, "get", "k8s.io", "tokenreviews", "")),
            ("wrong resource", attributes(sa, "get", "oauth.openshift.io", "other-resource", "")),
            ("wrong subresource", attributes(sa, "get", "oauth.openshift.io", "tokenreviews", "foo")),
            (
                "subresource with create",
                attributes(sa, "create", "oauth.openshift.io", "tokenreviews", "status"),
            ),
            (
                "non-resource path",
                Attributes {
                    user: Some(UserInfo::named(sa)),
                    verb: "get".to_string(),
                    path: "/api".to_string(),
                    ..Default::default()
                },
            ),
            (
                "no user",
                Attributes {
                    user: None,
                    ..attributes(sa, "create", "oauth.openshift.io", "tokenreviews", "")
                },
            ),
            (
                "near miss user",
                attributes(
                    "system:serviceaccount:openshift-oauth-apiserver:openshift-authenticator ",
                    "create",
                    "oauth.openshift.io",
                    "tokenreviews",
                    "",
                ),
            ),
        ];

        for (name, attrs) in cases {
            assert_eq!(decide(attrs).await, Decision::NoOpinion, "{name}");
        }
    }

    #[tokio::test]
    async fn test_never_errors_or_denies() {
        let result = TokenReviewAuthorizer.authorize(&Attributes::default()).await;
        assert_eq!(result, Ok(Authorization::no_opinion()));
    }
}
