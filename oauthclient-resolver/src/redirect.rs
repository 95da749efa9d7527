use crate::reference::RedirectReference;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A partially specified redirect URI parsed from the annotations.
///
/// Static models carry every field themselves. Route-bound models only carry
/// overrides; empty fields inherit from the route's resolved bases and the
/// host always comes from the route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    pub scheme: String,
    pub host: String,
    pub port: String,
    pub path: String,
    pub reference: Option<RedirectReference>,
}

impl Model {
    pub fn is_static(&self) -> bool {
        self.reference.is_none()
    }

    /// The route this model resolves against, if it references a supported one
    pub fn route_name(&self) -> Option<&str> {
        self.reference
            .as_ref()
            .filter(|reference| reference.is_route())
            .map(|reference| reference.name.as_str())
    }
}

/// A concrete redirect URI
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RedirectUri {
    pub scheme: String,
    pub host: String,
    pub port: String,
    pub path: String,
}

impl RedirectUri {
    pub fn new(
        scheme: impl Into<String>,
        host: impl Into<String>,
        port: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port: port.into(),
            path: path.into(),
        }
    }

    /// Applies the non-empty override fields of `model` on top of this base.
    ///
    /// The host is always kept from the base.
    pub fn merge(&self, model: &Model) -> RedirectUri {
        RedirectUri {
            scheme: override_or(&model.scheme, &self.scheme),
            host: self.host.clone(),
            port: override_or(&model.port, &self.port),
            path: override_or(&model.path, &self.path),
        }
    }
}

fn override_or(value: &str, fallback: &str) -> String {
    let chosen = if value.is_empty() { fallback } else { value };
    chosen.to_string()
}

impl From<&Model> for RedirectUri {
    fn from(model: &Model) -> Self {
        RedirectUri::new(&model.scheme, &model.host, &model.port, &model.path)
    }
}

impl fmt::Display for RedirectUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if !self.port.is_empty() {
            write!(f, ":{}", self.port)?;
        }
        f.write_str(&self.path)
    }
}

/// Distinct route names referenced by route-bound models with a valid reference
pub fn route_names<'a>(models: impl IntoIterator<Item = &'a Model>) -> BTreeSet<String> {
    models
        .into_iter()
        .filter_map(Model::route_name)
        .map(str::to_string)
        .collect()
}

/// Expands models into concrete redirect URIs.
///
/// The output may hold duplicates; deduplication happens at assembly.
pub fn render<'a>(
    models: impl IntoIterator<Item = &'a Model>,
    route_uris: &BTreeMap<String, Vec<RedirectUri>>,
) -> Vec<RedirectUri> {
    let mut rendered = Vec::new();
    for model in models {
        match &model.reference {
            None => rendered.push(RedirectUri::from(model)),
            Some(reference) if !reference.is_route() => {
                debug!(
                    "Ignoring redirect reference to unsupported {}/{} {:?}",
                    reference.group, reference.kind, reference.name
                );
            }
            Some(reference) => {
                if let Some(bases) = route_uris.get(&reference.name) {
                    rendered.extend(bases.iter().map(|base| base.merge(model)));
                }
            }
        }
    }
    rendered
}
