// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for albums and banners
// PURPOSE: Upload, list, delete and resync behind the admin gate

use crate::config::Config;
use crate::errors::GalleryError;
use crate::handlers::{html, read_cookie, redirect};
use crate::models::{Device, UploadFile};
use crate::services::{
    parse_album_id, AdminAccess, AdminSession, AlbumService, AuthService, BackendClient,
    BannerService, ACCESS_COOKIE,
};
use crate::views::admin::{albums_page, banners_page, overview_page, AlbumsPage, BannersPage};
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use futures::StreamExt;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Default, Deserialize)]
pub struct AlbumsQuery {
    pub album_id: Option<String>,
    pub msg: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BannersQuery {
    pub location: Option<String>,
    pub device: Option<String>,
    pub msg: Option<String>,
}

/// Album id sent along with an image delete
#[derive(Debug, Default, Deserialize)]
pub struct DeleteImageForm {
    pub album_id: Option<String>,
}

/// Text fields and files of a multipart form
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, Vec<UploadFile>>,
}

impl UploadForm {
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn take_files(&mut self, name: &str) -> Vec<UploadFile> {
        self.files.remove(name).unwrap_or_default()
    }
}

/// Read a multipart body into memory
/// DOCUMENTATION: Parts with a filename are files, the rest text fields.
/// The whole body is capped at `max_bytes`.
pub async fn read_multipart(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<UploadForm, GalleryError> {
    let mut form = UploadForm::default();
    let mut total = 0usize;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| GalleryError::UploadError(e.to_string()))?;

        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let file_name = disposition.get_filename().map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| GalleryError::UploadError(e.to_string()))?;
            total += chunk.len();
            if total > max_bytes {
                log::warn!("Upload rejected: body exceeds {} bytes", max_bytes);
                return Err(GalleryError::UploadError(format!(
                    "Dung lượng tải lên vượt quá {} MB.",
                    max_bytes / (1024 * 1024)
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match file_name {
            Some(file_name) => form.files.entry(name).or_default().push(UploadFile::new(
                &file_name,
                content_type.as_deref(),
                bytes,
            )),
            None => {
                form.fields
                    .insert(name, String::from_utf8_lossy(&bytes).into_owned());
            }
        }
    }

    Ok(form)
}

/// Admin gate; None means "send to /login"
async fn require_admin(
    req: &HttpRequest,
    backend: &BackendClient,
    config: &Config,
) -> Result<Option<AdminSession>, GalleryError> {
    let token = read_cookie(req, ACCESS_COOKIE);
    match AuthService::check_admin(backend, config.allowed_admin_email(), token.as_deref()).await? {
        AdminAccess::Granted(session) => Ok(Some(session)),
        AdminAccess::Login => Ok(None),
    }
}

fn albums_url(album_id: Option<&str>, msg: &str) -> String {
    let mut url = format!("/admin/upload-albums?msg={}", urlencoding::encode(msg));
    if let Some(id) = album_id.map(str::trim).filter(|id| !id.is_empty()) {
        url.push_str(&format!("&album_id={}", urlencoding::encode(id)));
    }
    url
}

fn banners_url(location: &str, device: &str, msg: &str) -> String {
    let mut url = format!("/admin/upload-banner?msg={}", urlencoding::encode(msg));
    if !location.trim().is_empty() {
        url.push_str(&format!("&location={}", urlencoding::encode(location.trim())));
    }
    if !device.is_empty() {
        url.push_str(&format!("&device={}", urlencoding::encode(device)));
    }
    url
}

/// GET /admin
pub async fn overview(
    req: HttpRequest,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
) -> Result<HttpResponse, GalleryError> {
    let Some(session) = require_admin(&req, &backend, &config).await? else {
        return Ok(redirect("/login"));
    };
    Ok(html(overview_page(session.user.email.as_deref().unwrap_or(""))))
}

/// GET /admin/upload-albums
pub async fn albums(
    req: HttpRequest,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
    query: web::Query<AlbumsQuery>,
) -> Result<HttpResponse, GalleryError> {
    let Some(session) = require_admin(&req, &backend, &config).await? else {
        return Ok(redirect("/login"));
    };
    let tables = backend.as_user(&session.access_token);

    let albums = match AlbumService::list_albums(&tables).await {
        Ok(albums) => albums,
        Err(e) => {
            log::error!("Failed to load albums: {}", e);
            Vec::new()
        }
    };

    let selected_id = query.album_id.as_deref().map(str::trim).unwrap_or("");
    let selected = albums.iter().find(|a| a.id.to_string() == selected_id);

    let images = match selected {
        Some(album) => AlbumService::fetch_images_dual(&tables, &album.id.to_string())
            .await
            .map_err(|e| {
                let message = e.user_message();
                if message.is_empty() {
                    "Không tải được ảnh.".to_string()
                } else {
                    message
                }
            }),
        None => Ok(Vec::new()),
    };

    Ok(html(albums_page(&AlbumsPage {
        albums: &albums,
        selected,
        images,
        message: query.msg.as_deref(),
    })))
}

/// POST /admin/upload-albums
/// DOCUMENTATION: Multipart `albumId`, optional `cover`, `files`. Always
/// redirects back with the outcome in `msg`.
pub async fn upload_album(
    req: HttpRequest,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
    payload: Multipart,
) -> Result<HttpResponse, GalleryError> {
    let Some(session) = require_admin(&req, &backend, &config).await? else {
        return Ok(redirect("/login"));
    };

    let mut form = match read_multipart(payload, config.max_upload_bytes).await {
        Ok(form) => form,
        Err(e) => return Ok(redirect(&albums_url(None, &format!("❌ ERROR: {}", e.user_message())))),
    };

    let album_id = form.field("albumId").trim().to_string();
    if album_id.is_empty() {
        return Ok(redirect(&albums_url(None, "❌ ERROR: Bạn chưa chọn album.")));
    }

    let cover = form.take_files("cover").into_iter().next();
    let files = form.take_files("files");
    let client = backend.as_user(&session.access_token);

    let msg = match AlbumService::upload_album(
        &client,
        &client,
        &config.storage_bucket,
        &session.user,
        &album_id,
        cover,
        files,
    )
    .await
    {
        Ok(result) => format!(
            "✅ OK · albumId={} · uploaded={}",
            result.album_id,
            result.uploaded.len()
        ),
        Err(e) => {
            log::warn!("Album upload failed: {}", e);
            format!("❌ ERROR: {}", e.user_message())
        }
    };

    Ok(redirect(&albums_url(Some(&album_id), &msg)))
}

/// POST /admin/upload-albums/images/{id}/delete
/// Removes the object from storage, then the row
pub async fn delete_album_image(
    req: HttpRequest,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
    path: web::Path<i64>,
    form: web::Form<DeleteImageForm>,
) -> Result<HttpResponse, GalleryError> {
    let Some(session) = require_admin(&req, &backend, &config).await? else {
        return Ok(redirect("/login"));
    };
    let image_id = path.into_inner();
    let album_id = form.album_id.clone().unwrap_or_default();
    let client = backend.as_user(&session.access_token);

    let outcome = async {
        let album = match parse_album_id(&album_id) {
            Ok(id) => Some(AlbumService::get_album(&client, id).await?),
            Err(_) => None,
        };
        let image = AlbumService::get_image(&client, image_id).await?;
        AlbumService::delete_image(&client, &client, &config.storage_bucket, album.as_ref(), &image)
            .await
    }
    .await;

    let msg = match outcome {
        Ok(()) => "Đã xoá ảnh.".to_string(),
        Err(e) => {
            log::warn!("Deleting image {} failed: {}", image_id, e);
            format!("❌ Xoá ảnh lỗi: {}", e.user_message())
        }
    };
    Ok(redirect(&albums_url(Some(&album_id), &msg)))
}

/// POST /admin/upload-albums/{album_id}/resync
/// Reconciles the album folder in storage with its image rows
pub async fn resync_album(
    req: HttpRequest,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
    path: web::Path<i64>,
) -> Result<HttpResponse, GalleryError> {
    let Some(session) = require_admin(&req, &backend, &config).await? else {
        return Ok(redirect("/login"));
    };
    let album_id = path.into_inner();
    let client = backend.as_user(&session.access_token);

    let outcome = async {
        let album = AlbumService::get_album(&client, album_id).await?;
        AlbumService::resync_album(&client, &client, &config.storage_bucket, &session.user, &album)
            .await
    }
    .await;

    let msg = match outcome {
        Ok(report) => format!(
            "🔄 Đồng bộ xong · objects={} · thêm={} · xoá={}",
            report.objects, report.rows_inserted, report.rows_removed
        ),
        Err(e) => format!("❌ ERROR: {}", e.user_message()),
    };
    Ok(redirect(&albums_url(Some(&album_id.to_string()), &msg)))
}

/// GET /admin/upload-banner
pub async fn banners(
    req: HttpRequest,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
    query: web::Query<BannersQuery>,
) -> Result<HttpResponse, GalleryError> {
    let Some(session) = require_admin(&req, &backend, &config).await? else {
        return Ok(redirect("/login"));
    };
    let tables = backend.as_user(&session.access_token);

    let locations = match BannerService::list_locations(&tables).await {
        Ok(locations) => locations,
        Err(e) => {
            log::error!("Failed to load banner locations: {}", e);
            Vec::new()
        }
    };

    let device = query
        .device
        .as_deref()
        .and_then(|d| d.parse::<Device>().ok())
        .unwrap_or_default();
    let location = query
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());

    let images = match location {
        Some(location) => Some(
            BannerService::list_banner_images(&tables, &config.storage_bucket, location, device)
                .await
                .map_err(|e| e.user_message()),
        ),
        None => None,
    };

    Ok(html(banners_page(&BannersPage {
        locations: &locations,
        location,
        device,
        images,
        message: query.msg.as_deref(),
    })))
}

/// POST /admin/upload-banner
pub async fn upload_banner(
    req: HttpRequest,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
    payload: Multipart,
) -> Result<HttpResponse, GalleryError> {
    let Some(session) = require_admin(&req, &backend, &config).await? else {
        return Ok(redirect("/login"));
    };

    let mut form = match read_multipart(payload, config.max_upload_bytes).await {
        Ok(form) => form,
        Err(e) => return Ok(redirect(&banners_url("", "", &format!("❌ Lỗi: {}", e.user_message())))),
    };

    let location = form.field("location").trim().to_string();
    let device = form.field("device").trim().to_string();
    let files = form.take_files("files");
    let client = backend.as_user(&session.access_token);

    let msg = match BannerService::upload_banners(
        &client,
        &client,
        &config.storage_bucket,
        &session.user,
        &location,
        &device,
        files,
    )
    .await
    {
        Ok(count) => format!("✅ Đã upload {} ảnh banner.", count),
        Err(e) => {
            log::warn!("Banner upload failed: {}", e);
            format!("❌ Lỗi: {}", e.user_message())
        }
    };

    Ok(redirect(&banners_url(&location, &device, &msg)))
}

/// POST /admin/upload-banner/images/{id}/delete
pub async fn delete_banner_image(
    req: HttpRequest,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
    path: web::Path<i64>,
) -> Result<HttpResponse, GalleryError> {
    let Some(session) = require_admin(&req, &backend, &config).await? else {
        return Ok(redirect("/login"));
    };
    let id = path.into_inner();
    let client = backend.as_user(&session.access_token);

    match BannerService::delete_banner_image(&client, &client, &config.storage_bucket, id).await {
        Ok(image) => Ok(redirect(&banners_url(
            &image.location,
            &image.device,
            "Đã xoá ảnh banner.",
        ))),
        Err(e) => {
            log::warn!("Deleting banner image {} failed: {}", id, e);
            Ok(redirect(&banners_url(
                "",
                "",
                &format!("❌ Xoá ảnh lỗi: {}", e.user_message()),
            )))
        }
    }
}

/// GET /admin/upload-banner/images/{id}/signed
/// Redirects to a short-lived signed URL of the banner object
pub async fn signed_banner(
    req: HttpRequest,
    backend: web::Data<BackendClient>,
    config: web::Data<Config>,
    path: web::Path<i64>,
) -> Result<HttpResponse, GalleryError> {
    let Some(session) = require_admin(&req, &backend, &config).await? else {
        return Ok(redirect("/login"));
    };
    let client = backend.as_user(&session.access_token);

    let url =
        BannerService::signed_url_for(&client, &client, &config.storage_bucket, path.into_inner())
            .await?;
    Ok(redirect(&url))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("", web::get().to(overview))
            .route("/upload-albums", web::get().to(albums))
            .route("/upload-albums", web::post().to(upload_album))
            .route(
                "/upload-albums/images/{id}/delete",
                web::post().to(delete_album_image),
            )
            .route("/upload-albums/{album_id}/resync", web::post().to(resync_album))
            .route("/upload-banner", web::get().to(banners))
            .route("/upload-banner", web::post().to(upload_banner))
            .route(
                "/upload-banner/images/{id}/delete",
                web::post().to(delete_banner_image),
            )
            .route("/upload-banner/images/{id}/signed", web::get().to(signed_banner)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_backend;
    use actix_web::error::PayloadError;
    use actix_web::http::header::{self, HeaderMap, HeaderValue};
    use actix_web::http::StatusCode;
    use actix_web::web::Bytes;
    use actix_web::{test, App};

    const BOUNDARY: &str = "gallery-boundary";

    fn multipart(body: &str) -> Multipart {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(&format!("multipart/form-data; boundary={}", BOUNDARY)).unwrap(),
        );
        let stream = futures::stream::iter(vec![Ok::<_, PayloadError>(Bytes::from(
            body.replace('\n', "\r\n"),
        ))]);
        Multipart::new(&headers, stream)
    }

    fn upload_body() -> String {
        format!(
            "--{b}\n\
Content-Disposition: form-data; name=\"albumId\"\n\
\n\
3\n\
--{b}\n\
Content-Disposition: form-data; name=\"files\"; filename=\"a.jpg\"\n\
Content-Type: image/jpeg\n\
\n\
abcd\n\
--{b}\n\
Content-Disposition: form-data; name=\"cover\"; filename=\"\"\n\
Content-Type: application/octet-stream\n\
\n\
\n\
--{b}--\n",
            b = BOUNDARY
        )
    }

    #[actix_web::test]
    async fn test_read_multipart_splits_fields_and_files() {
        let mut form = read_multipart(multipart(&upload_body()), 1024).await.unwrap();

        assert_eq!(form.field("albumId"), "3");
        assert_eq!(form.field("missing"), "");

        let files = form.take_files("files");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "a.jpg");
        assert_eq!(files[0].content_type, "image/jpeg");
        assert_eq!(files[0].bytes, b"abcd");

        // untouched file input arrives empty
        let cover = form.take_files("cover");
        assert!(cover[0].is_empty());
    }

    #[actix_web::test]
    async fn test_read_multipart_enforces_limit() {
        let result = read_multipart(multipart(&upload_body()), 2).await;
        assert!(matches!(result, Err(GalleryError::UploadError(_))));
    }

    #[actix_web::test]
    async fn test_redirect_urls_encode_messages() {
        assert_eq!(
            albums_url(Some("3"), "✅ OK"),
            "/admin/upload-albums?msg=%E2%9C%85%20OK&album_id=3"
        );
        assert_eq!(albums_url(None, "x"), "/admin/upload-albums?msg=x");
        assert_eq!(
            banners_url("hero", "pc", "ok"),
            "/admin/upload-banner?msg=ok&location=hero&device=pc"
        );
    }

    #[actix_web::test]
    async fn test_admin_pages_without_session_redirect_to_login() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_backend()))
                .app_data(web::Data::new(Config::for_tests()))
                .configure(config),
        )
        .await;

        for uri in ["/admin", "/admin/upload-albums", "/admin/upload-banner", "/admin/upload-banner/images/1/signed"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::FOUND, "{}", uri);
            assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
        }

        let req = test::TestRequest::post()
            .uri("/admin/upload-albums/3/resync")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
    }
}
