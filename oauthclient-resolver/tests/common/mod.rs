#![allow(dead_code)]

use async_trait::async_trait;
use log::LevelFilter;
use oauthclient_resolver::annotations::{
    OAUTH_REDIRECT_MODEL_ANNOTATION_REFERENCE_PREFIX, OAUTH_REDIRECT_MODEL_ANNOTATION_URI_PREFIX,
};
use oauthclient_resolver::models::{ObjectMeta, RouteIngress, RouteSpec, RouteStatus, TlsConfig};
use oauthclient_resolver::tokens::{
    SERVICE_ACCOUNT_NAME_KEY, SERVICE_ACCOUNT_TOKEN_KEY, SERVICE_ACCOUNT_TOKEN_SECRET_TYPE,
    SERVICE_ACCOUNT_UID_KEY,
};
use oauthclient_resolver::{
    ClientError, EventRecorder, GetterBuilder, GrantMethod, OAuthClient, OAuthClientGetter,
    RedirectReference, Route, RouteClient, Secret, SecretClient, ServiceAccount,
    ServiceAccountClient, ServiceAccountOAuthClientGetter,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub const NAMESPACE: &str = "ns-01";
pub const SA_NAME: &str = "default";
pub const SA_UID: &str = "any";
pub const SA_CLIENT_NAME: &str = "system:serviceaccount:ns-01:default";

pub fn setup_logger() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub fn uri_annotation(suffix: &str) -> String {
    format!("{OAUTH_REDIRECT_MODEL_ANNOTATION_URI_PREFIX}{suffix}")
}

pub fn reference_annotation(suffix: &str) -> String {
    format!("{OAUTH_REDIRECT_MODEL_ANNOTATION_REFERENCE_PREFIX}{suffix}")
}

pub fn route_reference(name: &str) -> String {
    RedirectReference::new("Route", name, "route.openshift.io").to_annotation_value()
}

pub fn service_account() -> ServiceAccount {
    ServiceAccount::new(NAMESPACE, SA_NAME).with_uid(SA_UID)
}

pub fn token_secret(name: &str, token: &str) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: name.to_string(),
            namespace: NAMESPACE.to_string(),
            annotations: BTreeMap::from([
                (SERVICE_ACCOUNT_NAME_KEY.to_string(), SA_NAME.to_string()),
                (SERVICE_ACCOUNT_UID_KEY.to_string(), SA_UID.to_string()),
            ]),
            ..Default::default()
        },
        secret_type: SERVICE_ACCOUNT_TOKEN_SECRET_TYPE.to_string(),
        data: BTreeMap::from([(SERVICE_ACCOUNT_TOKEN_KEY.to_string(), token.as_bytes().to_vec())]),
    }
}

pub fn route(name: &str, path: &str, tls: bool, ingress: Vec<RouteIngress>) -> Route {
    Route {
        metadata: ObjectMeta {
            name: name.to_string(),
            namespace: NAMESPACE.to_string(),
            ..Default::default()
        },
        spec: RouteSpec {
            path: path.to_string(),
            tls: tls.then(|| TlsConfig {
                termination: "edge".to_string(),
            }),
        },
        status: RouteStatus { ingress },
    }
}

/// In-memory cluster recording every read it serves
#[derive(Default)]
pub struct FakeCluster {
    pub service_accounts: Vec<ServiceAccount>,
    pub secrets: Vec<Secret>,
    pub routes: Vec<Route>,
    actions: Mutex<Vec<String>>,
}

impl FakeCluster {
    pub fn new(
        service_accounts: Vec<ServiceAccount>,
        secrets: Vec<Secret>,
        routes: Vec<Route>,
    ) -> Arc<Self> {
        Arc::new(Self {
            service_accounts,
            secrets,
            routes,
            actions: Mutex::new(Vec::new()),
        })
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    fn record(&self, action: String) {
        self.actions.lock().unwrap().push(action);
    }
}

#[async_trait]
impl ServiceAccountClient for FakeCluster {
    async fn get_service_account(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ServiceAccount, ClientError> {
        self.record(format!("get serviceaccounts {namespace}/{name}"));
        self.service_accounts
            .iter()
            .find(|sa| sa.namespace() == namespace && sa.name() == name)
            .cloned()
            .ok_or_else(|| ClientError::not_found("serviceaccounts", name))
    }
}

#[async_trait]
impl SecretClient for FakeCluster {
    async fn list_secrets(&self, namespace: &str) -> Result<Vec<Secret>, ClientError> {
        self.record(format!("list secrets {namespace}"));
        Ok(self
            .secrets
            .iter()
            .filter(|secret| secret.metadata.namespace == namespace)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RouteClient for FakeCluster {
    async fn get_route(&self, namespace: &str, name: &str) -> Result<Route, ClientError> {
        self.record(format!("get routes {namespace}/{name}"));
        self.routes
            .iter()
            .find(|route| route.metadata.namespace == namespace && route.name() == name)
            .cloned()
            .ok_or_else(|| ClientError::not_found("routes", name))
    }

    async fn list_routes(&self, namespace: &str) -> Result<Vec<Route>, ClientError> {
        self.record(format!("list routes {namespace}"));
        Ok(self
            .routes
            .iter()
            .filter(|route| route.metadata.namespace == namespace)
            .cloned()
            .collect())
    }
}

/// Upstream getter answering with a fixed result
pub struct FakeDelegate {
    result: Result<OAuthClient, ClientError>,
    calls: Mutex<Vec<String>>,
}

impl FakeDelegate {
    pub fn returning(result: Result<OAuthClient, ClientError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn not_found() -> Arc<Self> {
        Self::returning(Err(ClientError::not_found("oauthclients", "unknown")))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OAuthClientGetter for FakeDelegate {
    async fn get_client(&self, name: &str) -> Result<OAuthClient, ClientError> {
        self.calls.lock().unwrap().push(name.to_string());
        self.result.clone()
    }
}

/// Event sink keeping `(reason, message)` pairs
#[derive(Default)]
pub struct RecordingEvents {
    events: Mutex<Vec<(String, String)>>,
}

impl RecordingEvents {
    pub fn events(&self) -> Vec<(String, String)> {
        self.events.lock().unwrap().clone()
    }
}

impl EventRecorder for RecordingEvents {
    fn warning(&self, _service_account: &ServiceAccount, reason: &str, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push((reason.to_string(), message.to_string()));
    }
}

pub struct Harness {
    pub getter: ServiceAccountOAuthClientGetter,
    pub cluster: Arc<FakeCluster>,
    pub delegate: Arc<FakeDelegate>,
    pub events: Arc<RecordingEvents>,
}

impl Harness {
    pub fn new(cluster: Arc<FakeCluster>) -> Self {
        Self::with_delegate(cluster, FakeDelegate::not_found())
    }

    pub fn with_delegate(cluster: Arc<FakeCluster>, delegate: Arc<FakeDelegate>) -> Self {
        setup_logger();
        let events = Arc::new(RecordingEvents::default());
        let getter = GetterBuilder::new(delegate.clone())
            .with_cluster(cluster.clone(), cluster.clone(), cluster.clone())
            .with_event_recorder(events.clone())
            .with_grant_method(GrantMethod::Prompt)
            .build();
        Self {
            getter,
            cluster,
            delegate,
            events,
        }
    }
}
