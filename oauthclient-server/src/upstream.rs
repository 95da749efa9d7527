//! Delegate getter for OAuth clients that are not backed by a ServiceAccount

use crate::endpoint::{endpoint_url, EndpointError};
use async_trait::async_trait;
use log::{debug, error};
use oauthclient_resolver::{ClientError, OAuthClient, OAuthClientGetter};
use reqwest::{Client, StatusCode};
use url::Url;

/// Looks clients up in a static client registry over HTTP
#[derive(Clone)]
pub struct UpstreamClientGetter {
    client: Client,
    base_url: Url,
}

impl UpstreamClientGetter {
    pub fn new(client: Client, base_url: &str) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(base_url)?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl OAuthClientGetter for UpstreamClientGetter {
    async fn get_client(&self, name: &str) -> Result<OAuthClient, ClientError> {
        let url = match endpoint_url(&self.base_url, &["oauthclients", name]) {
            Ok(url) => url,
            Err(EndpointError::DotSegment(_)) => {
                return Err(ClientError::not_found("oauthclients", name));
            }
            Err(err) => return Err(ClientError::Backend(err.to_string())),
        };
        debug!("Fetching OAuth client from upstream registry: {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Backend(format!("HTTP request failed: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::not_found("oauthclients", name));
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Upstream registry error {status}: {error_text}");
            return Err(ClientError::Backend(format!(
                "HTTP {status}: {error_text}"
            )));
        }

        response
            .json::<OAuthClient>()
            .await
            .map_err(|e| ClientError::Backend(format!("Failed to parse OAuth client: {e}")))
    }
}
