//! Read-only views of the cluster objects the resolver consumes.
//!
//! The structs mirror the Kubernetes JSON wire form closely enough to be
//! deserialized straight from API responses, but only carry the fields the
//! pipeline reads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ingress condition type set by the router once it admits a host
pub const ROUTE_ADMITTED: &str = "Admitted";

/// Condition status meaning "true"
pub const CONDITION_TRUE: &str = "True";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccount {
    pub metadata: ObjectMeta,
}

impl ServiceAccount {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta {
                name: name.into(),
                namespace: namespace.into(),
                ..Default::default()
            },
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.metadata.uid = uid.into();
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.annotations.insert(key.into(), value.into());
        self
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn uid(&self) -> &str {
        &self.metadata.uid
    }

    pub fn annotations(&self) -> &BTreeMap<String, String> {
        &self.metadata.annotations
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, rename = "type")]
    pub secret_type: String,
    /// Secret payloads, base64 encoded on the wire
    #[serde(default, with = "base64_data")]
    pub data: BTreeMap<String, Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: RouteSpec,
    #[serde(default)]
    pub status: RouteStatus,
}

impl Route {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Whether the route terminates TLS, which makes its URIs https
    pub fn is_tls(&self) -> bool {
        self.spec.tls.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    #[serde(default)]
    pub termination: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStatus {
    #[serde(default)]
    pub ingress: Vec<RouteIngress>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteIngress {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub conditions: Vec<RouteIngressCondition>,
}

impl RouteIngress {
    /// An ingress admitted by the router for the given host
    pub fn admitted(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            conditions: vec![RouteIngressCondition {
                condition_type: ROUTE_ADMITTED.to_string(),
                status: CONDITION_TRUE.to_string(),
            }],
        }
    }

    pub fn is_admitted(&self) -> bool {
        self.conditions
            .iter()
            .any(|c| c.condition_type == ROUTE_ADMITTED && c.status == CONDITION_TRUE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteIngressCondition {
    #[serde(rename = "type")]
    pub condition_type: String,
    #[serde(default)]
    pub status: String,
}

mod base64_data {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        data: &BTreeMap<String, Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let encoded: BTreeMap<&String, String> = data
            .iter()
            .map(|(key, value)| (key, STANDARD.encode(value)))
            .collect();
        encoded.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, Vec<u8>>, D::Error> {
        let encoded = Option::<BTreeMap<String, String>>::deserialize(deserializer)?;
        encoded
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| {
                STANDARD
                    .decode(value.as_bytes())
                    .map(|bytes| (key, bytes))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}
