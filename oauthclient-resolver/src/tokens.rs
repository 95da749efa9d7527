use crate::models::{Secret, ServiceAccount};

/// Secret type holding a ServiceAccount API token
pub const SERVICE_ACCOUNT_TOKEN_SECRET_TYPE: &str = "kubernetes.io/service-account-token";

/// Annotation naming the ServiceAccount a token secret belongs to
pub const SERVICE_ACCOUNT_NAME_KEY: &str = "kubernetes.io/service-account.name";

/// Annotation carrying the UID of the owning ServiceAccount
pub const SERVICE_ACCOUNT_UID_KEY: &str = "kubernetes.io/service-account.uid";

/// Data key of the token inside a token secret
pub const SERVICE_ACCOUNT_TOKEN_KEY: &str = "token";

/// Whether the secret is a token secret issued for this ServiceAccount
pub fn is_service_account_token(secret: &Secret, service_account: &ServiceAccount) -> bool {
    if secret.secret_type != SERVICE_ACCOUNT_TOKEN_SECRET_TYPE {
        return false;
    }
    let annotations = &secret.metadata.annotations;
    let name = annotations
        .get(SERVICE_ACCOUNT_NAME_KEY)
        .map(String::as_str)
        .unwrap_or_default();
    let uid = annotations
        .get(SERVICE_ACCOUNT_UID_KEY)
        .map(String::as_str)
        .unwrap_or_default();
    name == service_account.name() && uid == service_account.uid()
}

/// Token values of the ServiceAccount's token secrets, in listing order
pub fn service_account_tokens(service_account: &ServiceAccount, secrets: &[Secret]) -> Vec<String> {
    secrets
        .iter()
        .filter(|secret| is_service_account_token(secret, service_account))
        .filter_map(|secret| secret.data.get(SERVICE_ACCOUNT_TOKEN_KEY))
        .filter(|token| !token.is_empty())
        .map(|token| String::from_utf8_lossy(token).into_owned())
        .collect()
}
