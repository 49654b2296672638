use crate::authn::access_tokens::token_object_name;
use crate::authz::hardcoded::TOKEN_REVIEW_SERVICE_ACCOUNT;
use crate::config::{PolicyRule, Settings, StaticToken};
use crate::create_app;
use crate::models::{OAuthAccessToken, ObjectMeta, User};
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tower::ServiceExt;

/// Static token of a cluster administrator allowed to do anything
pub const ADMIN_TOKEN: &str = "admin-token";
/// Static token of the service account that reviews tokens
pub const AUTHENTICATOR_TOKEN: &str = "authenticator-token";
/// Static token of an authenticated user without any grants
pub const DEVELOPER_TOKEN: &str = "developer-token";

fn static_tokens() -> Vec<StaticToken> {
    let token = |token: &str, user: &str, group: &str| StaticToken {
        token: token.to_string(),
        user: user.to_string(),
        uid: format!("{user}-uid"),
        groups: vec![group.to_string()],
    };
    vec![
        token(ADMIN_TOKEN, "admin", "system:masters"),
        token(
            AUTHENTICATOR_TOKEN,
            TOKEN_REVIEW_SERVICE_ACCOUNT,
            "system:serviceaccounts",
        ),
        token(DEVELOPER_TOKEN, "developer", "system:authenticated"),
    ]
}

fn policy_rules() -> Vec<PolicyRule> {
    let all = vec!["*".to_string()];
    vec![PolicyRule {
        groups: vec!["system:masters".to_string()],
        verbs: all.clone(),
        api_groups: all.clone(),
        resources: all.clone(),
        non_resource_urls: all,
        ..Default::default()
    }]
}

/// Test fixture wrapping the full application router.
///
/// Requests carry the fixture's bearer token, [`ADMIN_TOKEN`] by default.
/// Objects can be seeded straight into the stores held by `state`.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await.with_token(AUTHENTICATOR_TOKEN);
///     fixture.seed_user("alice", "alice-uid").await;
///     fixture
///         .seed_access_token("sha256~secret", "alice", "alice-uid", |_| {})
///         .await;
///
///     let response = fixture
///         .post("/apis/oauth.openshift.io/v1/tokenreviews", &review)
///         .await;
///     response.assert_status(StatusCode::CREATED);
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Shared application state, including the stores
    pub state: AppState,
    /// Bearer token sent with every request
    pub token: Option<String>,
}

impl TestFixture {
    /// Creates a fixture with test settings, the test static tokens and a
    /// policy granting `system:masters` everything.
    pub async fn new() -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let settings = Settings::for_test();
        let state = AppState::build(settings, &static_tokens(), policy_rules())
            .expect("Failed to build test state");
        Self::from_state(state).await
    }

    /// Creates a fixture sharing an existing state
    pub async fn from_state(state: AppState) -> Self {
        let app = create_app(state.clone()).await;
        Self {
            app,
            state,
            token: Some(ADMIN_TOKEN.to_string()),
        }
    }

    /// Sends `token` as the bearer token from now on
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Sends requests without an Authorization header
    pub fn without_token(mut self) -> Self {
        self.token = None;
        self
    }

    /// Initializes the test logger; repeated calls are no-ops.
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Creates a request builder with the bearer token and JSON content type
    pub fn request_builder(&self, method: Method, uri: impl AsRef<str>) -> http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri.as_ref());

        if let Some(token) = &self.token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder = builder.header("Content-Type", "application/json");

        builder
    }

    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    pub async fn post<T: Serialize>(&self, uri: impl AsRef<str>, body: &T) -> TestResponse {
        let json_body = serde_json::to_vec(body).expect("Failed to serialize body to JSON");
        let request = self
            .request_builder(Method::POST, uri)
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.send(request).await
    }

    pub async fn delete(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = self
            .request_builder(Method::DELETE, uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request and collects the response.
    ///
    /// The body is kept as text and, when it parses, as JSON. Non-JSON
    /// bodies leave `json` as an empty object.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body).into_owned();
        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| serde_json::json!({}))
        } else {
            serde_json::json!({})
        };

        TestResponse { status, json, text }
    }

    /// Stores a user directly, bypassing the API
    pub async fn seed_user(&self, name: &str, uid: &str) -> User {
        let user = User {
            metadata: ObjectMeta {
                name: name.to_string(),
                uid: Some(uid.to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        self.state
            .users
            .create(user)
            .await
            .expect("Failed to seed user")
    }

    /// Stores an access token for the raw bearer `token`.
    ///
    /// `customize` runs before the token is stored, so it can backdate the
    /// creation timestamp or set lifetimes.
    pub async fn seed_access_token(
        &self,
        token: &str,
        user_name: &str,
        user_uid: &str,
        customize: impl FnOnce(&mut OAuthAccessToken),
    ) -> OAuthAccessToken {
        let mut access_token = OAuthAccessToken {
            metadata: ObjectMeta::named(token_object_name(token)),
            client_name: "openshift-browser-client".to_string(),
            user_name: user_name.to_string(),
            user_uid: user_uid.to_string(),
            ..Default::default()
        };
        customize(&mut access_token);
        self.state
            .access_tokens
            .create(access_token)
            .await
            .expect("Failed to seed access token")
    }
}

/// Response from a test request with the status and decoded body
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body as JSON (if present and valid JSON)
    pub json: Value,
    /// Raw response body
    pub text: String,
}

impl TestResponse {
    /// Asserts the status code, printing the body on mismatch.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {} but got {} with body: {}",
            expected, self.status, self.text
        );
        self
    }

    /// Asserts that the response status is OK (200).
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// Deserializes the JSON body into `T`.
    ///
    /// # Panics
    ///
    /// Panics if the body does not match `T`.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).unwrap_or_else(|e| {
            panic!(
                "Failed to deserialize response body: {e}\nBody: {}",
                self.text
            )
        })
    }
}
