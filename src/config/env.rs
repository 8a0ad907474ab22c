// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted backend (e.g., "https://xyz.supabase.co")
    pub supabase_url: String,

    /// Public anon key, sent as `apikey` on every backend call
    pub supabase_anon_key: String,

    /// Service-role key used for public reads (optional)
    pub supabase_service_role_key: String,

    /// The single email allowed into the admin area
    pub admin_email: String,

    /// Storage bucket holding album and banner objects
    pub storage_bucket: String,

    /// Externally visible base URL, used for magic link redirects
    pub public_base_url: String,

    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 3000)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Timeout for backend HTTP calls in seconds
    pub http_timeout_secs: u64,

    /// Upper bound for a single uploaded file
    pub max_upload_bytes: usize,

    /// Login attempts allowed per minute
    pub login_rate_per_minute: u32,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        dotenv().ok();

        let server_port: u16 = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);

        Config {
            supabase_url: env::var("SUPABASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_default(),

            supabase_anon_key: env::var("SUPABASE_ANON_KEY").unwrap_or_default(),

            supabase_service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY").unwrap_or_default(),

            admin_email: env::var("ADMIN_EMAIL").unwrap_or_default(),

            storage_bucket: env::var("STORAGE_BUCKET").unwrap_or_else(|_| "wedding".to_string()),

            public_base_url: env::var("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://localhost:{}", server_port)),

            server_address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),

            server_port,

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),

            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| "20971520".to_string())
                .parse()
                .unwrap_or(20 * 1024 * 1024),

            login_rate_per_minute: env::var("LOGIN_RATE_PER_MINUTE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.supabase_url.is_empty() {
            return Err("SUPABASE_URL is required".to_string());
        }

        if self.supabase_anon_key.is_empty() {
            return Err("SUPABASE_ANON_KEY is required".to_string());
        }

        if self.supabase_service_role_key.is_empty() {
            log::warn!("SUPABASE_SERVICE_ROLE_KEY not configured - public reads use the anon key");
        }

        if self.admin_email.is_empty() {
            log::warn!("ADMIN_EMAIL not configured - admin area will refuse every request");
        }

        Ok(())
    }

    /// Lower-cased admin allow-list entry, if configured
    pub fn allowed_admin_email(&self) -> Option<String> {
        let email = self.admin_email.trim();
        if email.is_empty() {
            None
        } else {
            Some(email.to_lowercase())
        }
    }
}

#[cfg(test)]
impl Config {
    /// Configuration pointing at a backend that is never contacted
    pub fn for_tests() -> Self {
        Config {
            supabase_url: "http://backend.test".to_string(),
            supabase_anon_key: "anon".to_string(),
            supabase_service_role_key: "service".to_string(),
            admin_email: "Bride@Example.com".to_string(),
            storage_bucket: "wedding".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
            server_address: "127.0.0.1".to_string(),
            server_port: 3000,
            environment: "test".to_string(),
            log_level: "debug".to_string(),
            http_timeout_secs: 5,
            max_upload_bytes: 1024 * 1024,
            login_rate_per_minute: 10,
        }
    }
}
