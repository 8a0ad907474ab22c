// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, backend client, and start HTTP server

mod config;
mod errors;
mod handlers;
mod models;
mod services;
mod views;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::LoginLimiter;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();
    let config_error = config.validate().err();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Some(e) = config_error {
        log::error!("Configuration error: {}", e);
        eprintln!("Configuration error: {}", e);
    }

    log::info!("Starting wedding-gallery...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize backend client
    let backend = match config::init_backend_client(&config) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build backend client: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Login throttle shared by every worker
    let limiter = web::Data::new(LoginLimiter::new(config.login_rate_per_minute));
    log::info!(
        "Login attempts limited to {} per minute",
        config.login_rate_per_minute
    );

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state (backend client, config, login limiter)
            .app_data(web::Data::new(backend.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(limiter.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::api_config)
            .configure(handlers::auth_config)
            .configure(handlers::admin_config)
            .configure(handlers::site_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
