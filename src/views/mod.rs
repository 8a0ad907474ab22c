// src/views/mod.rs
// DOCUMENTATION: Views module organization
// PURPOSE: Server-rendered HTML for the public site, login and admin

pub mod admin;
pub mod layout;
pub mod login;
pub mod site;
