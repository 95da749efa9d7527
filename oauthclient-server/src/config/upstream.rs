use confique::Config;

/// Registry serving OAuth clients that are not backed by a ServiceAccount
#[derive(Debug, Config, Clone)]
pub struct UpstreamConfig {
    /// Registry base URL (default: http://localhost:8080)
    #[config(env = "OAUTHCLIENT_UPSTREAM_URL", default = "http://localhost:8080")]
    pub url: String,

    /// Request timeout in seconds (default: 5)
    #[config(env = "OAUTHCLIENT_UPSTREAM_TIMEOUT", default = 5)]
    pub timeout: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            timeout: 5,
        }
    }
}

impl UpstreamConfig {
    pub fn get_url(&self, path: &str) -> String {
        let base = self.url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}
