use crate::client::OAuthClient;
use crate::error::ClientError;
use crate::models::{Route, Secret, ServiceAccount};
use async_trait::async_trait;
use log::warn;

/// Reads ServiceAccounts from the cluster
#[async_trait]
pub trait ServiceAccountClient: Send + Sync {
    /// Fails with [`ClientError::NotFound`] when the ServiceAccount does not exist
    async fn get_service_account(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ServiceAccount, ClientError>;
}

/// Lists Secrets of a namespace
#[async_trait]
pub trait SecretClient: Send + Sync {
    async fn list_secrets(&self, namespace: &str) -> Result<Vec<Secret>, ClientError>;
}

/// Reads Routes, either one by name or all of a namespace
#[async_trait]
pub trait RouteClient: Send + Sync {
    async fn get_route(&self, namespace: &str, name: &str) -> Result<Route, ClientError>;

    async fn list_routes(&self, namespace: &str) -> Result<Vec<Route>, ClientError>;
}

/// Looks up an OAuth client by its name.
///
/// Implemented by the ServiceAccount getter and by whatever upstream registry
/// it delegates other client names to.
#[async_trait]
pub trait OAuthClientGetter: Send + Sync {
    async fn get_client(&self, name: &str) -> Result<OAuthClient, ClientError>;
}

/// Sink for warnings about ServiceAccounts that cannot act as OAuth clients
pub trait EventRecorder: Send + Sync {
    fn warning(&self, service_account: &ServiceAccount, reason: &str, message: &str);
}

/// Records events as log lines
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventRecorder;

impl EventRecorder for LogEventRecorder {
    fn warning(&self, service_account: &ServiceAccount, reason: &str, message: &str) {
        warn!(
            "ServiceAccount {}/{}: {reason}: {message}",
            service_account.namespace(),
            service_account.name()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_recorder_writes_warning() {
        testing_logger::setup();
        let sa = ServiceAccount::new("ns-01", "default");
        LogEventRecorder.warning(&sa, "NoSAOAuthTokens", "no tokens");
        testing_logger::validate(|captured_logs| {
            assert_eq!(captured_logs.len(), 1);
            assert_eq!(captured_logs[0].level, log::Level::Warn);
            assert_eq!(
                captured_logs[0].body,
                "ServiceAccount ns-01/default: NoSAOAuthTokens: no tokens"
            );
        });
    }
}
