use crate::errors::{ApiError, ErrorDetail};
use crate::openapi::CLIENTS_TAG;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use log::{debug, warn};
use oauthclient_resolver::OAuthClient;

/// Look up an OAuth client by name.
///
/// Names of the form `system:serviceaccount:<namespace>:<name>` are
/// synthesized from the ServiceAccount's redirect annotations, every other
/// name is answered by the upstream client registry.
#[utoipa::path(
    get,
    path = "/oauthclients/{name}",
    tag = CLIENTS_TAG,
    params(
        ("name" = String, Path, description = "Client name")
    ),
    responses(
        (status = 200, description = "The OAuth client descriptor", body = OAuthClient),
        (status = 404, description = "Client, ServiceAccount or referenced object not found", body = ErrorDetail),
        (status = 422, description = "ServiceAccount cannot act as an OAuth client", body = ErrorDetail),
        (status = 502, description = "A backend failed to answer", body = ErrorDetail),
    )
)]
pub(crate) async fn get_oauth_client(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<OAuthClient>, ApiError> {
    debug!("Resolving OAuth client {name}");
    match state.getter.get_client(&name).await {
        Ok(client) => Ok(Json(client)),
        Err(err) => {
            warn!("Failed to resolve OAuth client {name}: {err}");
            Err(err.into())
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/oauthclients/{name}", get(get_oauth_client))
}
