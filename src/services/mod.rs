// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod album_service;
pub mod auth_service;
pub mod backend_client;
pub mod banner_service;
pub mod gallery;
pub mod storage;

pub use album_service::*;
pub use auth_service::*;
pub use backend_client::*;
pub use banner_service::*;
pub use gallery::*;
