use confique::Config;

/// Connection to the Kubernetes-style API server holding ServiceAccounts,
/// Secrets and Routes
#[derive(Debug, Config, Clone)]
pub struct KubeConfig {
    /// API server base URL (default: https://kubernetes.default.svc)
    #[config(env = "OAUTHCLIENT_KUBE_URL", default = "https://kubernetes.default.svc")]
    pub url: String,

    /// Bearer token sent with every request; empty disables the header
    #[config(env = "OAUTHCLIENT_KUBE_TOKEN", default = "")]
    pub token: String,

    /// Request timeout in seconds (default: 5)
    #[config(env = "OAUTHCLIENT_KUBE_TIMEOUT", default = 5)]
    pub timeout: u64,
}

impl Default for KubeConfig {
    fn default() -> Self {
        Self {
            url: "https://kubernetes.default.svc".to_string(),
            token: String::new(),
            timeout: 5,
        }
    }
}

impl KubeConfig {
    /// Returns the URL of an API path on the server
    pub fn get_url(&self, path: &str) -> String {
        let base = self.url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}
