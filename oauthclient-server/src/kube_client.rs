//! Kubernetes REST client backing the resolver's cluster collaborators

use crate::endpoint::{endpoint_url, EndpointError};
use async_trait::async_trait;
use log::{debug, error};
use oauthclient_resolver::{
    ClientError, Route, RouteClient, Secret, SecretClient, ServiceAccount, ServiceAccountClient,
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const CORE_API: [&str; 2] = ["api", "v1"];
const ROUTE_API: [&str; 3] = ["apis", "route.openshift.io", "v1"];

/// Errors that can occur while talking to the Kubernetes API
#[derive(Debug, Error)]
pub enum KubeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{resource} \"{name}\" not found")]
    NotFound { resource: String, name: String },
    #[error("API response error: HTTP {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("Failed to decode {resource} response: {message}")]
    Decode { resource: String, message: String },
    #[error("Invalid request URL: {0}")]
    Endpoint(#[from] EndpointError),
}

impl From<KubeError> for ClientError {
    fn from(err: KubeError) -> Self {
        match err {
            KubeError::NotFound { resource, name } => ClientError::NotFound { resource, name },
            other => ClientError::Backend(other.to_string()),
        }
    }
}

/// Kubernetes list envelope
#[derive(Debug, Deserialize)]
struct ObjectList<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// Reads ServiceAccounts, Secrets and Routes over the Kubernetes REST API
#[derive(Clone)]
pub struct KubeClient {
    client: Client,
    base_url: Url,
}

impl KubeClient {
    /// Create a new client; `client` is expected to carry auth headers and timeouts
    pub fn new(client: Client, base_url: &str) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(base_url)?;
        Ok(Self { client, base_url })
    }

    /// Fetches `<api>/namespaces/<namespace>/<resource>[/<name>]`, each part one encoded segment
    async fn get_json<T: DeserializeOwned>(
        &self,
        api: &[&str],
        namespace: &str,
        resource: &str,
        name: Option<&str>,
    ) -> Result<T, KubeError> {
        let mut segments = api.to_vec();
        segments.extend(["namespaces", namespace, resource]);
        segments.extend(name);
        let name = name.unwrap_or(namespace);
        let url = match endpoint_url(&self.base_url, &segments) {
            Ok(url) => url,
            // no object can be named "." or ".."
            Err(EndpointError::DotSegment(_)) => {
                return Err(KubeError::NotFound {
                    resource: resource.to_string(),
                    name: name.to_string(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        debug!("Fetching {resource} from Kubernetes: {url}");

        let response = self.client.get(url.clone()).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(KubeError::NotFound {
                resource: resource.to_string(),
                name: name.to_string(),
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            error!("Kubernetes API error {status} for {url}: {message}");
            return Err(KubeError::Api { status, message });
        }

        response.json::<T>().await.map_err(|e| KubeError::Decode {
            resource: resource.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ServiceAccountClient for KubeClient {
    async fn get_service_account(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ServiceAccount, ClientError> {
        Ok(self
            .get_json(&CORE_API, namespace, "serviceaccounts", Some(name))
            .await?)
    }
}

#[async_trait]
impl SecretClient for KubeClient {
    async fn list_secrets(&self, namespace: &str) -> Result<Vec<Secret>, ClientError> {
        let list: ObjectList<Secret> =
            self.get_json(&CORE_API, namespace, "secrets", None).await?;
        Ok(list.items)
    }
}

#[async_trait]
impl RouteClient for KubeClient {
    async fn get_route(&self, namespace: &str, name: &str) -> Result<Route, ClientError> {
        Ok(self
            .get_json(&ROUTE_API, namespace, "routes", Some(name))
            .await?)
    }

    async fn list_routes(&self, namespace: &str) -> Result<Vec<Route>, ClientError> {
        let list: ObjectList<Route> = self.get_json(&ROUTE_API, namespace, "routes", None).await?;
        Ok(list.items)
    }
}
