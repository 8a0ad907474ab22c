// src/handlers/auth.rs
// DOCUMENTATION: Login, sign-up, magic link and logout
// PURPOSE: Exchange credentials with the backend and keep the session in
// HttpOnly cookies

use crate::config::Config;
use crate::errors::GalleryError;
use crate::handlers::{html, read_cookie, redirect};
use crate::models::{AuthSession, LoginForm};
use crate::services::{BackendClient, LoginLimiter, ACCESS_COOKIE, REFRESH_COOKIE};
use crate::views::login::login_page;
use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use validator::Validate;

const DEFAULT_SESSION_SECS: i64 = 60 * 60;

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub msg: Option<String>,
}

/// Tokens handed over by the magic-link landing script
#[derive(Debug, Deserialize)]
pub struct SessionForm {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<String>,
}

fn session_cookie(name: &'static str, value: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(max_age_secs))
        .finish()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build(name, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// Redirect to the admin area carrying the session cookies
fn signed_in(session: &AuthSession, config: &Config) -> HttpResponse {
    let secure = config.environment == "production";
    let max_age = session.expires_in.unwrap_or(DEFAULT_SESSION_SECS);

    let mut response = redirect("/admin");
    let mut cookies = vec![session_cookie(
        ACCESS_COOKIE,
        session.access_token.clone(),
        max_age,
        secure,
    )];
    if let Some(refresh) = &session.refresh_token {
        // the refresh token outlives the access token
        cookies.push(session_cookie(REFRESH_COOKIE, refresh.clone(), 60 * 60 * 24 * 30, secure));
    }
    for cookie in cookies {
        if let Err(e) = response.add_cookie(&cookie) {
            log::error!("Failed to set session cookie: {}", e);
        }
    }
    response
}

fn login_error(form: &LoginForm, status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(login_page(&form.email, Some(message)))
}

/// Throttle and validate; Err carries the page to answer with
fn check_form(
    form: &LoginForm,
    limiter: &LoginLimiter,
    needs_password: bool,
) -> Result<(), HttpResponse> {
    if limiter.check().is_err() {
        return Err(login_error(
            form,
            StatusCode::TOO_MANY_REQUESTS,
            "Quá nhiều lần thử. Vui lòng đợi một phút rồi thử lại.",
        ));
    }
    if form.validate().is_err() {
        return Err(login_error(form, StatusCode::OK, "Email không hợp lệ."));
    }
    if needs_password {
        if let Err(message) = form.require_password() {
            return Err(login_error(form, StatusCode::OK, &message));
        }
    }
    Ok(())
}

/// GET /login
pub async fn login_form(query: web::Query<LoginQuery>) -> impl Responder {
    html(login_page("", query.msg.as_deref()))
}

/// POST /login
/// Password sign-in; success goes to /admin
pub async fn sign_in(
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
    limiter: web::Data<LoginLimiter>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, GalleryError> {
    let form = form.into_inner();
    if let Err(page) = check_form(&form, &limiter, true) {
        return Ok(page);
    }

    match backend.sign_in_with_password(&form.email, &form.password).await {
        Ok(session) => {
            log::info!("Signed in {}", form.email);
            Ok(signed_in(&session, &config))
        }
        Err(e) => {
            log::warn!("Sign-in failed for {}: {}", form.email, e);
            Ok(login_error(&form, StatusCode::OK, &e.user_message()))
        }
    }
}

/// POST /login/signup
pub async fn sign_up(
    backend: web::Data<BackendClient>,
    limiter: web::Data<LoginLimiter>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, GalleryError> {
    let form = form.into_inner();
    if let Err(page) = check_form(&form, &limiter, true) {
        return Ok(page);
    }

    let message = match backend.sign_up(&form.email, &form.password).await {
        Ok(()) => {
            log::info!("Account created for {}", form.email);
            "Tạo tài khoản thành công. Bạn có thể đăng nhập.".to_string()
        }
        Err(e) => e.user_message(),
    };
    Ok(login_error(&form, StatusCode::OK, &message))
}

/// POST /login/magic-link
/// DOCUMENTATION: The emailed link lands on `<public_base_url>/admin`
pub async fn magic_link(
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
    limiter: web::Data<LoginLimiter>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, GalleryError> {
    let form = form.into_inner();
    if let Err(page) = check_form(&form, &limiter, false) {
        return Ok(page);
    }

    let redirect_to = format!("{}/admin", config.public_base_url);
    let message = match backend.sign_in_with_otp(&form.email, &redirect_to).await {
        Ok(()) => {
            log::info!("Magic link sent to {}", form.email);
            "Đã gửi link đăng nhập. Kiểm tra email!".to_string()
        }
        Err(e) => e.user_message(),
    };
    Ok(login_error(&form, StatusCode::OK, &message))
}

/// POST /login/session
///
/// DOCUMENTATION: Magic links return the tokens in the URL fragment, which
/// only the browser sees. The login page posts them here; the token is
/// checked with the backend before it becomes a cookie.
pub async fn accept_session(
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
    limiter: web::Data<LoginLimiter>,
    form: web::Form<SessionForm>,
) -> Result<HttpResponse, GalleryError> {
    limiter.check()?;
    let form = form.into_inner();

    let user = match backend.get_user(&form.access_token).await {
        Ok(user) => user,
        Err(GalleryError::Unauthorized) => {
            return Ok(redirect(&format!(
                "/login?msg={}",
                urlencoding::encode("Link đăng nhập đã hết hạn.")
            )))
        }
        Err(e) => return Err(e),
    };

    log::info!(
        "Magic-link session accepted for {}",
        user.email.as_deref().unwrap_or("<no email>")
    );
    let session = AuthSession {
        access_token: form.access_token,
        refresh_token: form.refresh_token.filter(|t| !t.is_empty()),
        expires_in: form.expires_in.and_then(|s| s.trim().parse().ok()),
        user,
    };
    Ok(signed_in(&session, &config))
}

/// GET|POST /logout
/// DOCUMENTATION: Backend sign-out errors are logged and ignored; the
/// cookies are always cleared.
pub async fn logout(req: HttpRequest, backend: web::Data<BackendClient>) -> impl Responder {
    if let Some(token) = read_cookie(&req, ACCESS_COOKIE) {
        if let Err(e) = backend.sign_out(&token).await {
            log::warn!("Backend sign-out failed, clearing cookies anyway: {}", e);
        }
    }

    let mut response = redirect("/login");
    for name in [ACCESS_COOKIE, REFRESH_COOKIE] {
        if let Err(e) = response.add_cookie(&removal_cookie(name)) {
            log::error!("Failed to clear {}: {}", name, e);
        }
    }
    response
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::get().to(login_form))
        .route("/login", web::post().to(sign_in))
        .route("/login/signup", web::post().to(sign_up))
        .route("/login/magic-link", web::post().to(magic_link))
        .route("/login/session", web::post().to(accept_session))
        .route("/logout", web::get().to(logout))
        .route("/logout", web::post().to(logout));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_backend;
    use actix_web::{http::header, test, App};

    #[actix_web::test]
    async fn test_login_page_renders() {
        let app = test::init_service(App::new().configure(config)).await;
        let req = test::TestRequest::get().uri("/login?msg=hello").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(std::str::from_utf8(&body).unwrap().contains("hello"));
    }

    #[actix_web::test]
    async fn test_invalid_email_is_rejected_inline_then_throttled() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_backend()))
                .app_data(web::Data::new(Config::for_tests()))
                .app_data(web::Data::new(LoginLimiter::new(1)))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/login")
            .set_form([("email", "not-an-email"), ("password", "x")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(std::str::from_utf8(&body).unwrap().contains("Email không hợp lệ."));

        let req = test::TestRequest::post()
            .uri("/login")
            .set_form([("email", "not-an-email"), ("password", "x")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[actix_web::test]
    async fn test_missing_password_is_rejected_inline() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_backend()))
                .app_data(web::Data::new(Config::for_tests()))
                .app_data(web::Data::new(LoginLimiter::new(10)))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/login")
            .set_form([("email", "bride@example.com")])
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert!(std::str::from_utf8(&body).unwrap().contains("Vui lòng nhập mật khẩu."));
    }

    #[actix_web::test]
    async fn test_logout_without_session_clears_cookies() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_backend()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post().uri("/logout").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");

        let cleared: Vec<String> = resp
            .response()
            .cookies()
            .map(|c| c.name().to_string())
            .collect();
        assert!(cleared.contains(&ACCESS_COOKIE.to_string()));
        assert!(cleared.contains(&REFRESH_COOKIE.to_string()));
    }
}
