use crate::annotations::{
    OAUTH_REDIRECT_MODEL_ANNOTATION_REFERENCE_PREFIX, OAUTH_REDIRECT_MODEL_ANNOTATION_URI_PREFIX,
};
use crate::reference::REDIRECT_REFERENCE_KIND;
use thiserror::Error;

/// Fatal outcomes of an OAuth client lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("{resource} \"{name}\" not found")]
    NotFound { resource: String, name: String },

    #[error(
        "{client} has no redirectURIs; set {uri}<some-value>=<redirect> or create a dynamic URI using {reference}<some-value>=<reference>",
        uri = OAUTH_REDIRECT_MODEL_ANNOTATION_URI_PREFIX,
        reference = OAUTH_REDIRECT_MODEL_ANNOTATION_REFERENCE_PREFIX
    )]
    NoRedirectUris { client: String },

    #[error("{client} has no tokens")]
    NoTokens { client: String },

    #[error("Backend error: {0}")]
    Backend(String),
}

impl ClientError {
    pub fn not_found(resource: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            name: name.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors produced while decoding a redirect reference payload
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to decode redirect reference: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "unexpected redirect reference kind {0:?}, expected {expected}",
        expected = REDIRECT_REFERENCE_KIND
    )]
    UnexpectedKind(String),
}

/// A grant method name that is not `auto`, `prompt` or `deny`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown grant method {0:?}, expected one of auto, prompt, deny")]
pub struct UnknownGrantMethod(pub String);

/// Non-fatal problems collected while building a single client.
///
/// They never abort the lookup; they only enrich the warning recorded when
/// the lookup fails for another reason.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SoftErrors(Vec<String>);

impl SoftErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: impl ToString) {
        self.0.push(error.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Renders the warning message for a fatal error, prefixed by any soft errors.
    pub fn message_for(&self, fatal: &ClientError) -> String {
        if self.0.is_empty() {
            return fatal.to_string();
        }
        let mut parts = self.0.clone();
        parts.push(fatal.to_string());
        format!("[{}]", parts.join(", "))
    }
}
