// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod album;
pub mod banner;
pub mod session;
pub mod upload;
pub mod wedding;

pub use album::*;
pub use banner::*;
pub use session::*;
pub use upload::*;
pub use wedding::*;
