use std::error::Error;

use crate::api::models::HealthResponse;
use crate::api::ApiClient;
use crate::core::config::Config;

pub async fn run_health() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let client = ApiClient::from_config(&config);

    let health: HealthResponse = client
        .get_json("/health")
        .await
        .map_err(|e| format!("Backend at {} is not reachable: {e}", client.base_url()))?;

    println!("Status:         {}", health.status);
    println!("Workspace:      {}", health.workspace);
    println!("Indexed chunks: {}", health.indexed_chunks);
    println!("Version:        {}", health.version);
    Ok(())
}
