//! The OAuth client descriptor and its assembly from resolved redirect URIs.

use crate::annotations::wants_challenges;
use crate::clients::SecretClient;
use crate::error::{ClientError, SoftErrors, UnknownGrantMethod};
use crate::models::ServiceAccount;
use crate::redirect::RedirectUri;
use crate::tokens::service_account_tokens;
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use url::Url;

/// Prefix of the client name of every ServiceAccount backed OAuth client
pub const SERVICE_ACCOUNT_CLIENT_PREFIX: &str = "system:serviceaccount";

const DNS1123_LABEL_MAX_LENGTH: usize = 63;
const DNS1123_SUBDOMAIN_MAX_LENGTH: usize = 253;

static DNS1123_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("DNS-1123 label pattern compiles")
});

static DNS1123_SUBDOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("DNS-1123 subdomain pattern compiles")
});

/// Scopes every ServiceAccount client may request about the user itself
pub const SELF_SCOPES: [&str; 4] = [
    "user:info",
    "user:check-access",
    "user:list-scoped-projects",
    "user:list-projects",
];

/// How the authorization server asks users to grant access to the client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum GrantMethod {
    Auto,
    #[default]
    Prompt,
    Deny,
}

impl fmt::Display for GrantMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            GrantMethod::Auto => "auto",
            GrantMethod::Prompt => "prompt",
            GrantMethod::Deny => "deny",
        };
        f.write_str(value)
    }
}

impl FromStr for GrantMethod {
    type Err = UnknownGrantMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "auto" => Ok(GrantMethod::Auto),
            "prompt" => Ok(GrantMethod::Prompt),
            "deny" => Ok(GrantMethod::Deny),
            _ => Err(UnknownGrantMethod(value.to_string())),
        }
    }
}

/// Limits on the scopes a client may request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ScopeRestriction {
    /// Only these exact scope strings are allowed
    #[serde(rename = "literals")]
    ExactValues(Vec<String>),
    #[serde(rename = "clusterRole")]
    ClusterRole(ClusterRoleScopeRestriction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ClusterRoleScopeRestriction {
    pub role_names: Vec<String>,
    pub namespaces: Vec<String>,
    pub allow_escalation: bool,
}

/// Descriptor the authorization server consults to validate a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct OAuthClient {
    pub name: String,
    #[serde(default)]
    pub scope_restrictions: Vec<ScopeRestriction>,
    #[serde(default)]
    pub additional_secrets: Vec<String>,
    #[serde(default)]
    pub respond_with_challenges: bool,
    /// Sorted and free of duplicates
    #[serde(default, rename = "redirectURIs")]
    pub redirect_uris: Vec<String>,
    #[serde(default)]
    pub grant_method: GrantMethod,
}

/// Qualified client name of a ServiceAccount
pub fn service_account_client_name(namespace: &str, name: &str) -> String {
    format!("{SERVICE_ACCOUNT_CLIENT_PREFIX}:{namespace}:{name}")
}

/// Whether `namespace` is a valid namespace name (a DNS-1123 label)
pub fn is_valid_namespace(namespace: &str) -> bool {
    namespace.len() <= DNS1123_LABEL_MAX_LENGTH && DNS1123_LABEL.is_match(namespace)
}

/// Whether `name` is a valid ServiceAccount name (a DNS-1123 subdomain)
pub fn is_valid_service_account_name(name: &str) -> bool {
    name.len() <= DNS1123_SUBDOMAIN_MAX_LENGTH && DNS1123_SUBDOMAIN.is_match(name)
}

/// Splits a qualified client name into namespace and ServiceAccount name.
///
/// Returns `None` unless both parts are valid object names, so that nothing
/// but a plain name segment ever reaches the cluster API.
pub fn parse_service_account_client_name(client_name: &str) -> Option<(&str, &str)> {
    let rest = client_name
        .strip_prefix(SERVICE_ACCOUNT_CLIENT_PREFIX)?
        .strip_prefix(':')?;
    let (namespace, name) = rest.split_once(':')?;
    if !is_valid_namespace(namespace) || !is_valid_service_account_name(name) {
        return None;
    }
    Some((namespace, name))
}

/// The fixed scope policy of a ServiceAccount client.
///
/// Grants the self-information scopes plus any role, escalation included, but
/// only inside the ServiceAccount's own namespace.
pub fn scope_restrictions_for(namespace: &str, _name: &str) -> Vec<ScopeRestriction> {
    vec![
        ScopeRestriction::ExactValues(SELF_SCOPES.iter().map(|s| s.to_string()).collect()),
        ScopeRestriction::ClusterRole(ClusterRoleScopeRestriction {
            role_names: vec!["*".to_string()],
            namespaces: vec![namespace.to_string()],
            allow_escalation: true,
        }),
    ]
}

/// Canonical texts of the rendered URIs, deduplicated and sorted.
///
/// Texts that are not absolute URIs are dropped and reported as soft errors.
pub fn redirect_uri_strings(rendered: &[RedirectUri], soft: &mut SoftErrors) -> Vec<String> {
    let mut uris = BTreeSet::new();
    for uri in rendered {
        let text = uri.to_string();
        if uris.contains(&text) {
            continue;
        }
        match Url::parse(&text) {
            Ok(_) => {
                uris.insert(text);
            }
            Err(err) => {
                debug!("Dropping invalid redirect URI {text:?}: {err}");
                soft.push(format!("parse {text}: {err}"));
            }
        }
    }
    uris.into_iter().collect()
}

/// Builds the OAuth client of a ServiceAccount from its rendered redirect URIs.
///
/// Fails without looking up secrets when no valid redirect URI is left, and
/// with [`ClientError::NoTokens`] when the ServiceAccount has no token secret.
pub async fn assemble_client(
    service_account: &ServiceAccount,
    rendered: &[RedirectUri],
    secrets: &dyn SecretClient,
    grant_method: GrantMethod,
    soft: &mut SoftErrors,
) -> Result<OAuthClient, ClientError> {
    let namespace = service_account.namespace();
    let name = service_account.name();
    let client_name = service_account_client_name(namespace, name);

    let redirect_uris = redirect_uri_strings(rendered, soft);
    if redirect_uris.is_empty() {
        return Err(ClientError::NoRedirectUris {
            client: client_name,
        });
    }

    let secret_list = secrets.list_secrets(namespace).await?;
    let tokens = service_account_tokens(service_account, &secret_list);
    if tokens.is_empty() {
        warn!("No token secrets found for {client_name} among {} secrets", secret_list.len());
        return Err(ClientError::NoTokens {
            client: client_name,
        });
    }

    Ok(OAuthClient {
        scope_restrictions: scope_restrictions_for(namespace, name),
        additional_secrets: tokens,
        respond_with_challenges: wants_challenges(service_account.annotations()),
        redirect_uris,
        grant_method,
        name: client_name,
    })
}
