// src/models/session.rs
// DOCUMENTATION: Authentication payloads exchanged with the backend
// PURPOSE: Sessions, users and the login form

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Authenticated user as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

impl AuthUser {
    /// Case-insensitive comparison against the admin allow-list entry
    pub fn is_admin(&self, allowed: &str) -> bool {
        self.email
            .as_deref()
            .map(|email| email.trim().to_lowercase() == allowed.trim().to_lowercase())
            .unwrap_or(false)
    }
}

/// Session returned by a successful password sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds until the access token expires
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

/// Login form, shared by password sign-in, sign-up and magic link
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    /// Password flows need a non-empty password on top of a valid email
    pub fn require_password(&self) -> Result<(), String> {
        if self.password.is_empty() {
            Err("Vui lòng nhập mật khẩu.".to_string())
        } else {
            Ok(())
        }
    }
}
