use super::models::ComponentStatus;
use reqwest::Client;

/// Probes a backend endpoint, healthy on any 2xx answer
pub async fn check_endpoint(name: &str, client: &Client, url: &str) -> ComponentStatus {
    match client.get(url).send().await {
        Ok(response) if response.status().is_success() => ComponentStatus::ok(),
        Ok(response) => ComponentStatus::error(format!("{name} returned status {}", response.status())),
        Err(err) => ComponentStatus::error(format!("Failed to connect to {name}: {err}")),
    }
}
