use crate::config::kube::KubeConfig;
use crate::config::upstream::UpstreamConfig;
use confique::Config;
use oauthclient_resolver::{GrantMethod, UnknownGrantMethod};
use std::path::PathBuf;

pub mod kube;
pub mod upstream;

/// Environment variable naming an optional TOML configuration file
pub const CONFIG_FILE_ENV: &str = "OAUTHCLIENT_CONFIG_FILE";

/// Main configuration structure for the OAuth client server
#[derive(Debug, Config, Clone)]
pub struct ServerConfig {
    /// The port the server will listen to (default: 8787)
    #[config(env = "OAUTHCLIENT_PORT", default = 8787)]
    pub port: u16,

    /// Grant method of ServiceAccount clients: auto, prompt or deny (default: prompt)
    #[config(env = "OAUTHCLIENT_GRANT_METHOD", default = "prompt")]
    pub grant_method: String,

    /// Kubernetes API configuration
    #[config(nested)]
    pub kube: KubeConfig,

    /// Upstream OAuth client registry configuration
    #[config(nested)]
    pub upstream: UpstreamConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8787,
            grant_method: "prompt".to_string(),
            kube: KubeConfig::default(),
            upstream: UpstreamConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads the configuration from the environment, layered over the TOML
    /// file named by `OAUTHCLIENT_CONFIG_FILE` when it is set
    pub fn new() -> Result<Self, confique::Error> {
        let mut builder = Self::builder().env();
        if let Some(path) = std::env::var_os(CONFIG_FILE_ENV) {
            builder = builder.file(PathBuf::from(path));
        }
        builder.load()
    }

    /// The configured grant method
    pub fn grant_method(&self) -> Result<GrantMethod, UnknownGrantMethod> {
        self.grant_method.parse()
    }

    #[cfg(test)]
    pub fn for_test_with_mocks(
        kube_mock: &wiremock::MockServer,
        upstream_mock: &wiremock::MockServer,
    ) -> Self {
        Self {
            port: 0, // Let the OS choose a port
            grant_method: "prompt".to_string(),
            kube: KubeConfig {
                url: kube_mock.uri(),
                token: "test-token".to_string(),
                timeout: 5,
            },
            upstream: UpstreamConfig {
                url: upstream_mock.uri(),
                timeout: 5,
            },
        }
    }
}
