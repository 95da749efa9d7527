use std::sync::Arc;

use crate::client::GrantMethod;
use crate::clients::{
    EventRecorder, LogEventRecorder, OAuthClientGetter, RouteClient, SecretClient,
    ServiceAccountClient,
};
use crate::getter::ServiceAccountOAuthClientGetter;
use crate::reference::{JsonReferenceDecoder, ReferenceDecoder};

/// States tracking whether the cluster collaborators have been provided.
pub struct Missing;
pub struct Present {
    service_accounts: Arc<dyn ServiceAccountClient>,
    secrets: Arc<dyn SecretClient>,
    routes: Arc<dyn RouteClient>,
}

/// A builder wiring a [`ServiceAccountOAuthClientGetter`] from its collaborators.
/// The builder is generic over one type parameter:
/// - ClusterSet: whether the ServiceAccount, Secret and Route clients were supplied.
///
/// The decoder defaults to [`JsonReferenceDecoder`], events go to the log and
/// the grant method is `prompt` unless overridden.
pub struct GetterBuilder<ClusterSet> {
    delegate: Arc<dyn OAuthClientGetter>,
    cluster: ClusterSet,
    decoder: Arc<dyn ReferenceDecoder>,
    events: Arc<dyn EventRecorder>,
    grant_method: GrantMethod,
}

impl GetterBuilder<Missing> {
    /// Creates a builder around the getter used for non-ServiceAccount clients.
    pub fn new(delegate: Arc<dyn OAuthClientGetter>) -> Self {
        Self {
            delegate,
            cluster: Missing,
            decoder: Arc::new(JsonReferenceDecoder),
            events: Arc::new(LogEventRecorder),
            grant_method: GrantMethod::default(),
        }
    }

    /// Sets the clients used to read ServiceAccounts, Secrets and Routes.
    pub fn with_cluster(
        self,
        service_accounts: Arc<dyn ServiceAccountClient>,
        secrets: Arc<dyn SecretClient>,
        routes: Arc<dyn RouteClient>,
    ) -> GetterBuilder<Present> {
        GetterBuilder {
            delegate: self.delegate,
            cluster: Present {
                service_accounts,
                secrets,
                routes,
            },
            decoder: self.decoder,
            events: self.events,
            grant_method: self.grant_method,
        }
    }
}

impl<ClusterSet> GetterBuilder<ClusterSet> {
    /// Overrides how redirect reference annotations are decoded.
    pub fn with_decoder(mut self, decoder: Arc<dyn ReferenceDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_event_recorder(mut self, events: Arc<dyn EventRecorder>) -> Self {
        self.events = events;
        self
    }

    pub fn with_grant_method(mut self, grant_method: GrantMethod) -> Self {
        self.grant_method = grant_method;
        self
    }
}

impl GetterBuilder<Present> {
    pub fn build(self) -> ServiceAccountOAuthClientGetter {
        let Present {
            service_accounts,
            secrets,
            routes,
        } = self.cluster;
        ServiceAccountOAuthClientGetter {
            service_accounts,
            secrets,
            routes,
            delegate: self.delegate,
            decoder: self.decoder,
            events: self.events,
            grant_method: self.grant_method,
        }
    }
}
