use crate::annotations::parse_models_map;
use crate::client::{GrantMethod, OAuthClient, assemble_client, parse_service_account_client_name};
use crate::clients::{
    EventRecorder, OAuthClientGetter, RouteClient, SecretClient, ServiceAccountClient,
};
use crate::error::{ClientError, SoftErrors};
use crate::models::ServiceAccount;
use crate::redirect::{render, route_names};
use crate::reference::ReferenceDecoder;
use crate::routes::resolve_route_uris;
use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

/// Event reason recorded when a ServiceAccount resolves to no redirect URI
pub const NO_REDIRECT_URIS_REASON: &str = "NoSAOAuthRedirectURIs";

/// Event reason recorded when a ServiceAccount has no token secret
pub const NO_TOKENS_REASON: &str = "NoSAOAuthTokens";

/// Resolves OAuth clients for ServiceAccounts from their redirect annotations.
///
/// Names that are not qualified ServiceAccount client names are passed to the
/// delegate untouched. Nothing is cached; every call reads the cluster again.
pub struct ServiceAccountOAuthClientGetter {
    pub(crate) service_accounts: Arc<dyn ServiceAccountClient>,
    pub(crate) secrets: Arc<dyn SecretClient>,
    pub(crate) routes: Arc<dyn RouteClient>,
    pub(crate) delegate: Arc<dyn OAuthClientGetter>,
    pub(crate) decoder: Arc<dyn ReferenceDecoder>,
    pub(crate) events: Arc<dyn EventRecorder>,
    pub(crate) grant_method: GrantMethod,
}

impl ServiceAccountOAuthClientGetter {
    pub fn grant_method(&self) -> GrantMethod {
        self.grant_method
    }

    async fn service_account_client(
        &self,
        service_account: &ServiceAccount,
        soft: &mut SoftErrors,
    ) -> Result<OAuthClient, ClientError> {
        let namespace = service_account.namespace();

        let (models, decode_errors) =
            parse_models_map(service_account.annotations(), self.decoder.as_ref());
        for err in decode_errors {
            soft.push(err);
        }

        let names = route_names(models.values());
        let route_uris = if names.is_empty() {
            Default::default()
        } else {
            resolve_route_uris(self.routes.as_ref(), namespace, &names).await?
        };

        let rendered = render(models.values(), &route_uris);
        debug!(
            "Rendered {} redirect URIs from {} models for {namespace}/{}",
            rendered.len(),
            models.len(),
            service_account.name()
        );

        assemble_client(
            service_account,
            &rendered,
            self.secrets.as_ref(),
            self.grant_method,
            soft,
        )
        .await
    }
}

#[async_trait]
impl OAuthClientGetter for ServiceAccountOAuthClientGetter {
    async fn get_client(&self, name: &str) -> Result<OAuthClient, ClientError> {
        let Some((namespace, sa_name)) = parse_service_account_client_name(name) else {
            debug!("Delegating lookup of OAuth client {name}");
            return self.delegate.get_client(name).await;
        };

        let service_account = self
            .service_accounts
            .get_service_account(namespace, sa_name)
            .await?;

        let mut soft = SoftErrors::new();
        let result = self.service_account_client(&service_account, &mut soft).await;

        match &result {
            Ok(client) => info!(
                "Resolved OAuth client {name} with {} redirect URIs",
                client.redirect_uris.len()
            ),
            Err(err @ ClientError::NoRedirectUris { .. }) => {
                self.events
                    .warning(&service_account, NO_REDIRECT_URIS_REASON, &soft.message_for(err));
            }
            Err(err @ ClientError::NoTokens { .. }) => {
                self.events
                    .warning(&service_account, NO_TOKENS_REASON, &soft.message_for(err));
            }
            Err(err) => debug!("Failed to resolve OAuth client {name}: {err}"),
        }
        result
    }
}
