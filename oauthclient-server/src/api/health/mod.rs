mod checkers;
pub(crate) mod models;

use self::checkers::check_endpoint;
use self::models::{ComponentHealth, HealthResponse, HealthStatusType};
use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use log::{debug, info};

/// Liveness check handler
#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub(crate) async fn health_check() -> impl IntoResponse {
    HealthResponse {
        status: HealthStatusType::Ok,
        components: None,
        status_code: StatusCode::OK,
    }
}

/// Readiness check handler, probing the Kubernetes API and the upstream registry
#[utoipa::path(
    get,
    path = "/ready",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Service is not ready", body = HealthResponse)
    )
)]
pub(crate) async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let kube_url = state.config.kube.get_url("/version");
    let upstream_url = state.config.upstream.get_url("/healthz");
    let (kube, upstream) = tokio::join!(
        check_endpoint("Kubernetes", &state.kube_client, &kube_url),
        check_endpoint("Upstream", &state.upstream_client, &upstream_url),
    );

    let ready = kube.is_ok() && upstream.is_ok();
    if ready {
        debug!("Readiness check passed");
    } else {
        let issues: Vec<String> = [("kube", &kube), ("upstream", &upstream)]
            .iter()
            .filter(|(_, status)| !status.is_ok())
            .map(|(name, status)| {
                format!("{name}: {}", status.error.as_deref().unwrap_or("unknown error"))
            })
            .collect();
        info!("Readiness check failed: {}", issues.join(", "));
    }

    HealthResponse {
        status: if ready {
            HealthStatusType::Ok
        } else {
            HealthStatusType::Error
        },
        components: Some(ComponentHealth { kube, upstream }),
        status_code: if ready {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        },
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
}

#[cfg(test)]
mod test {
    use crate::test_utils::TestFixture;
    use http::StatusCode;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn test_health_endpoint() {
        let fixture = TestFixture::new().await;
        let response = fixture.get("/health").await;
        response.assert_ok();
        assert_eq!(response.json["status"], "ok");
        assert!(response.json.get("components").is_none());
    }

    #[tokio::test]
    async fn test_ready_endpoint_healthy() {
        let fixture = TestFixture::new().await;
        Mock::given(method("GET"))
            .and(path("/version"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&fixture.kube_mock)
            .await;
        Mock::given(method("GET"))
            .and(path("/healthz"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&fixture.upstream_mock)
            .await;

        let response = fixture.get("/ready").await;
        response.assert_ok();
        assert_eq!(response.json["status"], "ok");
        assert_eq!(response.json["components"]["kube"]["status"], "ok");
        assert_eq!(response.json["components"]["upstream"]["status"], "ok");
    }

    #[tokio::test]
    async fn test_ready_endpoint_unhealthy_upstream() {
        let fixture = TestFixture::new().await;
        Mock::given(method("GET"))
            .and(path("/version"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&fixture.kube_mock)
            .await;
        Mock::given(method("GET"))
            .and(path("/healthz"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&fixture.upstream_mock)
            .await;

        let response = fixture.get("/ready").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.json["status"], "error");
        assert_eq!(response.json["components"]["kube"]["status"], "ok");
        assert_eq!(response.json["components"]["upstream"]["status"], "error");
        assert!(response.json["components"]["upstream"]["error"]
            .as_str()
            .unwrap()
            .contains("500"));
    }
}
