//! Parsing of ServiceAccount redirect annotations into redirect models.

use crate::error::DecodeError;
use crate::redirect::Model;
use crate::reference::ReferenceDecoder;
use log::{debug, warn};
use std::collections::BTreeMap;

/// Prefix of annotations holding a partial redirect URI template
pub const OAUTH_REDIRECT_MODEL_ANNOTATION_URI_PREFIX: &str =
    "serviceaccounts.openshift.io/oauth-redirecturi.";

/// Prefix of annotations holding an encoded reference to a route
pub const OAUTH_REDIRECT_MODEL_ANNOTATION_REFERENCE_PREFIX: &str =
    "serviceaccounts.openshift.io/oauth-redirectreference.";

/// Boolean annotation asking the OAuth server to answer with challenges
pub const OAUTH_WANT_CHALLENGES_ANNOTATION: &str =
    "serviceaccounts.openshift.io/oauth-want-challenges";

const SCHEME_SEPARATOR: &str = "://";

/// Parses the redirect annotations of a ServiceAccount into models keyed by
/// annotation suffix.
///
/// A static URI and a reference sharing the same suffix end up in a single
/// model. When the reference payload for a key cannot be decoded the key
/// produces no model at all; the decode errors are returned alongside the map
/// so callers can report them.
pub fn parse_models_map(
    annotations: &BTreeMap<String, String>,
    decoder: &dyn ReferenceDecoder,
) -> (BTreeMap<String, Model>, Vec<DecodeError>) {
    let mut models: BTreeMap<String, Model> = BTreeMap::new();
    let mut rejected: Vec<String> = Vec::new();
    let mut errors = Vec::new();

    for (key, value) in annotations {
        if let Some(suffix) = key.strip_prefix(OAUTH_REDIRECT_MODEL_ANNOTATION_URI_PREFIX) {
            let parsed = parse_uri_template(value);
            let model = models.entry(suffix.to_string()).or_default();
            model.scheme = parsed.scheme;
            model.host = parsed.host;
            model.port = parsed.port;
            model.path = parsed.path;
        } else if let Some(suffix) =
            key.strip_prefix(OAUTH_REDIRECT_MODEL_ANNOTATION_REFERENCE_PREFIX)
        {
            match decoder.decode(value.as_bytes()) {
                Ok(reference) => {
                    models.entry(suffix.to_string()).or_default().reference = Some(reference);
                }
                Err(err) => {
                    warn!("Skipping redirect reference {key}: {err}");
                    rejected.push(suffix.to_string());
                    errors.push(err);
                }
            }
        }
    }

    for key in rejected {
        models.remove(&key);
    }
    debug!("Parsed {} redirect models", models.len());
    (models, errors)
}

/// Parses a partial URI template with relaxed rules.
///
/// `scheme://` is optional, `//host[:port]` is only recognised at the start of
/// what remains, and anything left over is the path. A value without any of
/// these markers is a bare path.
pub fn parse_uri_template(value: &str) -> Model {
    let mut model = Model::default();
    let mut rest = value;

    if let Some(index) = rest.find(SCHEME_SEPARATOR) {
        model.scheme = rest[..index].to_string();
        // keep the leading "//" so the authority is detected below
        rest = &rest[index + 1..];
    }

    if let Some(authority) = rest.strip_prefix("//") {
        let host_end = authority.find([':', '/']).unwrap_or(authority.len());
        model.host = authority[..host_end].to_string();
        rest = &authority[host_end..];

        if let Some(after_colon) = rest.strip_prefix(':') {
            let port_end = after_colon.find('/').unwrap_or(after_colon.len());
            model.port = after_colon[..port_end].to_string();
            rest = &after_colon[port_end..];
        }
    }

    model.path = rest.to_string();
    model
}

/// Reads the challenge annotation, treating a missing or unparseable value as false.
pub fn wants_challenges(annotations: &BTreeMap<String, String>) -> bool {
    match annotations.get(OAUTH_WANT_CHALLENGES_ANNOTATION) {
        Some(value) => match parse_bool(value) {
            Some(flag) => flag,
            None => {
                debug!("Ignoring invalid {OAUTH_WANT_CHALLENGES_ANNOTATION} value {value:?}");
                false
            }
        },
        None => false,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
