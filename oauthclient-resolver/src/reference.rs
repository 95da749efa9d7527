use crate::error::DecodeError;
use serde::{Deserialize, Serialize};

/// Kind a redirect reference must point at to be honored
pub const ROUTE_KIND: &str = "Route";

/// API group of the route kind; an empty group is accepted as well
pub const ROUTE_GROUP: &str = "route.openshift.io";

/// Kind of the envelope wrapping a redirect reference annotation value
pub const REDIRECT_REFERENCE_KIND: &str = "OAuthRedirectReference";

/// A reference from a redirect annotation to another cluster object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectReference {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

impl RedirectReference {
    pub fn new(kind: impl Into<String>, name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Whether the reference targets a route with a supported group
    pub fn is_route(&self) -> bool {
        self.kind == ROUTE_KIND && (self.group.is_empty() || self.group == ROUTE_GROUP)
    }

    /// Encodes the reference the way it is stored in a ServiceAccount annotation
    pub fn to_annotation_value(&self) -> String {
        serde_json::json!({
            "kind": REDIRECT_REFERENCE_KIND,
            "apiVersion": "oauth.openshift.io/v1",
            "reference": self,
        })
        .to_string()
    }
}

/// Decodes a redirect reference annotation payload.
///
/// The payload format is owned by the platform. Any closure with the matching
/// signature can be used as a decoder, which keeps tests free of fixtures.
pub trait ReferenceDecoder: Send + Sync {
    fn decode(&self, payload: &[u8]) -> Result<RedirectReference, DecodeError>;
}

impl<F> ReferenceDecoder for F
where
    F: Fn(&[u8]) -> Result<RedirectReference, DecodeError> + Send + Sync,
{
    fn decode(&self, payload: &[u8]) -> Result<RedirectReference, DecodeError> {
        self(payload)
    }
}

#[derive(Debug, Deserialize)]
struct ReferenceEnvelope {
    #[serde(default)]
    kind: String,
    reference: RedirectReference,
}

/// Decodes the JSON envelope used by `OAuthRedirectReference` objects.
///
/// The `apiVersion` is not checked, so payloads written by older and newer
/// API versions decode the same way.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReferenceDecoder;

impl ReferenceDecoder for JsonReferenceDecoder {
    fn decode(&self, payload: &[u8]) -> Result<RedirectReference, DecodeError> {
        let envelope: ReferenceEnvelope = serde_json::from_slice(payload)?;
        if !envelope.kind.is_empty() && envelope.kind != REDIRECT_REFERENCE_KIND {
            return Err(DecodeError::UnexpectedKind(envelope.kind));
        }
        Ok(envelope.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_route() {
        assert!(RedirectReference::new(ROUTE_KIND, "route1", "").is_route());
        assert!(RedirectReference::new(ROUTE_KIND, "route1", ROUTE_GROUP).is_route());
        assert!(!RedirectReference::new(ROUTE_KIND, "route1", "wronggroup").is_route());
        assert!(!RedirectReference::new("wrongkind", "route1", ROUTE_GROUP).is_route());
    }

    #[test]
    fn test_decode_annotation_value() {
        let reference = RedirectReference::new(ROUTE_KIND, "route1", ROUTE_GROUP);
        let value = reference.to_annotation_value();
        let decoded = JsonReferenceDecoder
            .decode(value.as_bytes())
            .expect("Failed to decode reference");
        assert_eq!(decoded, reference);
    }

    #[test]
    fn test_decode_tolerates_missing_envelope_kind() {
        let payload = br#"{"reference":{"kind":"Route","name":"route1"}}"#;
        let decoded = JsonReferenceDecoder.decode(payload).unwrap();
        assert_eq!(decoded, RedirectReference::new(ROUTE_KIND, "route1", ""));
    }

    #[test]
    fn test_decode_rejects_other_envelope_kind() {
        let payload = br#"{"kind":"Secret","reference":{"kind":"Route","name":"route1"}}"#;
        let err = JsonReferenceDecoder.decode(payload).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedKind(kind) if kind == "Secret"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = JsonReferenceDecoder.decode(b"not json").unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn test_closure_decoder() {
        let decoder = |payload: &[u8]| -> Result<RedirectReference, DecodeError> {
            Ok(RedirectReference::new(
                ROUTE_KIND,
                String::from_utf8_lossy(payload),
                "",
            ))
        };
        let decoded = decoder.decode(b"route7").unwrap();
        assert_eq!(decoded.name, "route7");
    }
}
