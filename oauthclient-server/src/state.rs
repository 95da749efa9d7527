use crate::config::ServerConfig;
use crate::kube_client::KubeClient;
use crate::upstream::UpstreamClientGetter;
use http::header::{InvalidHeaderValue, ACCEPT, AUTHORIZATION};
use http::{HeaderMap, HeaderValue};
use oauthclient_resolver::{GetterBuilder, OAuthClientGetter, UnknownGrantMethod};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while building the application state
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Invalid Kubernetes token: {0}")]
    InvalidToken(#[from] InvalidHeaderValue),
    #[error("Failed to create HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid configuration: {0}")]
    Config(#[from] UnknownGrantMethod),
    #[error("Invalid {name} URL {url:?}: {source}")]
    InvalidUrl {
        name: &'static str,
        url: String,
        source: url::ParseError,
    },
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub getter: Arc<dyn OAuthClientGetter>,
    pub kube_client: Arc<Client>,
    pub upstream_client: Arc<Client>,
}

impl AppState {
    pub(crate) fn create_kube_client(token: &str, timeout: u64) -> Result<Client, StateError> {
        let mut headers = HeaderMap::new();
        if !token.is_empty() {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(Client::builder()
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(2))
            .default_headers(headers)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()?)
    }

    fn create_upstream_client(timeout: u64) -> Result<Client, StateError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(Client::builder()
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(2))
            .default_headers(headers)
            .build()?)
    }

    fn invalid_url(name: &'static str, url: &str) -> impl FnOnce(url::ParseError) -> StateError {
        let url = url.to_string();
        move |source| StateError::InvalidUrl { name, url, source }
    }

    pub fn new(config: ServerConfig) -> Result<Self, StateError> {
        let grant_method = config.grant_method()?;
        let kube_http = Self::create_kube_client(&config.kube.token, config.kube.timeout)?;
        let upstream_http = Self::create_upstream_client(config.upstream.timeout)?;

        let kube = KubeClient::new(kube_http.clone(), &config.kube.url)
            .map_err(Self::invalid_url("Kubernetes", &config.kube.url))?;
        let upstream = UpstreamClientGetter::new(upstream_http.clone(), &config.upstream.url)
            .map_err(Self::invalid_url("upstream", &config.upstream.url))?;
        let kube = Arc::new(kube);
        let upstream = Arc::new(upstream);
        let getter = GetterBuilder::new(upstream)
            .with_cluster(kube.clone(), kube.clone(), kube)
            .with_grant_method(grant_method)
            .build();

        Ok(Self {
            config: Arc::new(config),
            getter: Arc::new(getter),
            kube_client: Arc::new(kube_http),
            upstream_client: Arc::new(upstream_http),
        })
    }
}
