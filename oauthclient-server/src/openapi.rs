use utoipa::OpenApi;

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const CLIENTS_TAG: &str = "OAuth Clients API";

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::health::health_check,
        crate::api::health::ready_check,
        crate::api::clients::get_oauth_client,
    ),
    components(schemas(
        oauthclient_resolver::OAuthClient,
        oauthclient_resolver::ScopeRestriction,
        oauthclient_resolver::ClusterRoleScopeRestriction,
        oauthclient_resolver::GrantMethod,
        crate::errors::ErrorDetail,
        crate::api::health::models::HealthResponse,
        crate::api::health::models::ComponentHealth,
        crate::api::health::models::ComponentStatus,
        crate::api::health::models::HealthStatusType,
    )),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = CLIENTS_TAG, description = "OAuth client lookup, synthesizing ServiceAccount clients"),
    ),
    info(
        title = "OAuth Client Resolver API",
        description = "Serves OAuth client descriptors, including those derived from ServiceAccount redirect annotations",
        version = "0.1.0"
    )
)]
pub(crate) struct ApiDoc;
