//! Resolution of referenced Routes into redirect URI bases.

use crate::clients::RouteClient;
use crate::error::ClientError;
use crate::models::Route;
use crate::redirect::RedirectUri;
use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Fetches the named routes and extracts their redirect URI bases.
///
/// A single name is fetched directly, several names are served from one
/// namespace listing. Every requested name gets an entry; routes that do not
/// exist map to an empty sequence. Any other collaborator failure is fatal.
pub async fn resolve_route_uris(
    client: &dyn RouteClient,
    namespace: &str,
    names: &BTreeSet<String>,
) -> Result<BTreeMap<String, Vec<RedirectUri>>, ClientError> {
    let mut resolved: BTreeMap<String, Vec<RedirectUri>> =
        names.iter().map(|name| (name.clone(), Vec::new())).collect();

    let mut requested = names.iter();
    match (requested.next(), requested.next()) {
        (None, _) => {}
        (Some(name), None) => match client.get_route(namespace, name).await {
            Ok(route) => {
                resolved.insert(name.clone(), redirect_uris_from_route(&route));
            }
            Err(err) if err.is_not_found() => {
                debug!("Referenced route {namespace}/{name} does not exist");
            }
            Err(err) => return Err(err),
        },
        _ => {
            let routes = client.list_routes(namespace).await?;
            for route in routes.iter().filter(|route| names.contains(route.name())) {
                resolved.insert(route.name().to_string(), redirect_uris_from_route(route));
            }
        }
    }

    for (name, uris) in &resolved {
        debug!("Route {namespace}/{name} resolved to {} redirect bases", uris.len());
    }
    Ok(resolved)
}

/// Redirect URI bases of a route, one per distinct admitted ingress host
pub fn redirect_uris_from_route(route: &Route) -> Vec<RedirectUri> {
    let scheme = if route.is_tls() { "https" } else { "http" };
    let mut seen = HashSet::new();
    route
        .status
        .ingress
        .iter()
        .filter(|ingress| !ingress.host.is_empty() && ingress.is_admitted())
        .filter(|ingress| seen.insert(ingress.host.as_str()))
        .map(|ingress| RedirectUri::new(scheme, &ingress.host, "", &route.spec.path))
        .collect()
}
