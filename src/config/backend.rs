// src/config/backend.rs
// DOCUMENTATION: Backend client initialization
// PURPOSE: Build the shared HTTP client used for every backend call

use crate::config::Config;
use crate::services::BackendClient;
use std::time::Duration;

/// Initialize the backend client
/// DOCUMENTATION: Creates the reqwest client with timeouts from config
/// Called once during application startup in main.rs
/// The returned client is cloned into every worker
pub fn init_backend_client(config: &Config) -> Result<BackendClient, reqwest::Error> {
    log::info!("Initializing backend client: {}", config.supabase_url);

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("wedding-gallery/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let client = BackendClient::new(
        http,
        config.supabase_url.clone(),
        config.supabase_anon_key.clone(),
        config.supabase_service_role_key.clone(),
    );

    log::info!("Backend client initialized successfully");
    Ok(client)
}
