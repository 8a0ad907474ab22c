// src/config/mod.rs
// DOCUMENTATION: Configuration module organization
// PURPOSE: Re-export configuration components

pub mod backend;
pub mod env;

pub use backend::init_backend_client;
pub use env::Config;
