// src/services/auth_service.rs
// DOCUMENTATION: Admin gate and login throttling
// PURPOSE: Decide whether a request's session belongs to the allowed admin

use crate::errors::GalleryError;
use crate::models::AuthUser;
use crate::services::BackendClient;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

/// Cookie holding the backend access token
pub const ACCESS_COOKIE: &str = "sb-access-token";

/// Cookie holding the backend refresh token
pub const REFRESH_COOKIE: &str = "sb-refresh-token";

/// Resolves the user behind an access token
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, GalleryError>;
}

#[async_trait]
impl AuthApi for BackendClient {
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, GalleryError> {
        BackendClient::get_user(self, access_token).await
    }
}

/// Signed-in admin: the user and the token used to act on their behalf
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub user: AuthUser,
    pub access_token: String,
}

/// Outcome of the admin gate
#[derive(Debug)]
pub enum AdminAccess {
    Granted(AdminSession),
    /// Send the browser to the login page
    Login,
}

pub struct AuthService;

impl AuthService {
    /// Gate for every admin page
    /// DOCUMENTATION: No token or a rejected token sends the user to login.
    /// A missing allow-list entry is a configuration error. The email match
    /// ignores case.
    pub async fn check_admin<A: AuthApi + ?Sized>(
        auth: &A,
        allowed_email: Option<String>,
        access_token: Option<&str>,
    ) -> Result<AdminAccess, GalleryError> {
        let Some(token) = access_token.filter(|t| !t.is_empty()) else {
            return Ok(AdminAccess::Login);
        };

        let user = match auth.get_user(token).await {
            Ok(user) => user,
            Err(GalleryError::Unauthorized) => return Ok(AdminAccess::Login),
            Err(e) => return Err(e),
        };

        let allowed = allowed_email.ok_or_else(|| {
            log::error!("ADMIN_EMAIL is not configured");
            GalleryError::ConfigError("Missing ADMIN_EMAIL".to_string())
        })?;

        if !user.is_admin(&allowed) {
            log::warn!(
                "Admin access refused for {}",
                user.email.as_deref().unwrap_or("<no email>")
            );
            return Ok(AdminAccess::Login);
        }

        Ok(AdminAccess::Granted(AdminSession {
            user,
            access_token: token.to_string(),
        }))
    }
}

/// Throttle for the login form
pub struct LoginLimiter {
    limiter: DefaultDirectRateLimiter,
}

impl LoginLimiter {
    pub fn new(per_minute: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: RateLimiter::direct(quota),
        }
    }

    pub fn check(&self) -> Result<(), GalleryError> {
        self.limiter.check().map_err(|_| {
            log::warn!("Login rate limit exceeded");
            GalleryError::RateLimitExceeded
        })
    }
}
