use crate::config::ServerConfig;
use crate::create_app;
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test fixture wiring the application to mocked Kubernetes and upstream registry servers.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///     fixture
///         .add_upstream_mock(Method::GET, "/oauthclients/web", json!({ "name": "web" }), StatusCode::OK, 1)
///         .await;
///
///     let response = fixture.get("/oauthclients/web").await;
///     let client = response.assert_ok().json_as::<OAuthClient>();
///     assert_eq!(client.name, "web");
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration pointing at the mock servers
    pub config: ServerConfig,
    /// Mock server for the Kubernetes API
    pub kube_mock: MockServer,
    /// Mock server for the upstream client registry
    pub upstream_mock: MockServer,
}

impl TestFixture {
    /// Creates a new test fixture with fresh mock servers.
    pub async fn new() -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let kube_mock = MockServer::start().await;
        let upstream_mock = MockServer::start().await;

        let config = ServerConfig::for_test_with_mocks(&kube_mock, &upstream_mock);
        let state = AppState::new(config.clone()).expect("Failed to create test state");
        let app = create_app(state).await;

        Self {
            app,
            config,
            kube_mock,
            upstream_mock,
        }
    }

    /// Initializes the test logger, ignoring repeated initialization.
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Sends a GET request to the specified URI.
    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri.as_ref())
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request and collects the status and JSON body.
    ///
    /// Bodies that are empty or not JSON are reported as an empty object.
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

        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| serde_json::json!({}))
        } else {
            serde_json::json!({})
        };

        TestResponse { status, json }
    }

    /// Mounts a Kubernetes API response expected to be hit `expected_calls` times.
    pub async fn add_kube_mock(
        &self,
        method: Method,
        path: impl Into<String>,
        response_body: impl Serialize,
        status_code: StatusCode,
        expected_calls: u64,
    ) {
        Self::mount(&self.kube_mock, method, path.into(), response_body, status_code, expected_calls)
            .await;
    }

    /// Mounts an upstream registry response expected to be hit `expected_calls` times.
    pub async fn add_upstream_mock(
        &self,
        method: Method,
        path: impl Into<String>,
        response_body: impl Serialize,
        status_code: StatusCode,
        expected_calls: u64,
    ) {
        Self::mount(
            &self.upstream_mock,
            method,
            path.into(),
            response_body,
            status_code,
            expected_calls,
        )
        .await;
    }

    async fn mount(
        server: &MockServer,
        method: Method,
        path: String,
        response_body: impl Serialize,
        status_code: StatusCode,
        expected_calls: u64,
    ) {
        Mock::given(matchers::method(method.as_str()))
            .and(matchers::path(path))
            .respond_with(ResponseTemplate::new(status_code.as_u16()).set_body_json(response_body))
            .expect(expected_calls)
            .mount(server)
            .await;
    }
}

/// Response from a test request with convenient access to status and JSON body.
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body as JSON (empty object if absent or invalid)
    pub json: Value,
}

impl TestResponse {
    /// Asserts that the response has the expected status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match the expected value.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            serde_json::to_string_pretty(&self.json).unwrap_or_default()
        );
        self
    }

    /// Asserts that the response status is OK (200).
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// Deserializes the response body into `T`.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response JSON")
    }
}
