// src/handlers/api.rs
// DOCUMENTATION: Read-only JSON API over the gallery tables

use crate::errors::GalleryError;
use crate::services::{AlbumService, BackendClient, BannerService};
use actix_web::{web, HttpResponse, Responder};

/// GET /api/albums
/// Published albums, newest first
///
/// DOCUMENTATION: Public reads go out with the service role
pub async fn list_albums(
    backend: web::Data<BackendClient>,
) -> Result<impl Responder, GalleryError> {
    let albums = AlbumService::list_published_albums(&backend.as_service()).await?;
    log::debug!("Listing {} published albums", albums.len());
    Ok(HttpResponse::Ok().json(albums))
}

/// GET /api/albums/{key}/images
///
/// DOCUMENTATION: An unknown key answers an empty list, not 404
pub async fn album_images(
    backend: web::Data<BackendClient>,
    path: web::Path<String>,
) -> Result<impl Responder, GalleryError> {
    let key = path.into_inner();
    let images = AlbumService::images_by_album_key(&backend.as_service(), &key).await?;
    Ok(HttpResponse::Ok().json(images))
}

/// GET /api/banners
pub async fn hero_banners(
    backend: web::Data<BackendClient>,
) -> Result<impl Responder, GalleryError> {
    let banners = BannerService::hero_banners(&backend.as_service()).await?;
    Ok(HttpResponse::Ok().json(banners))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/albums", web::get().to(list_albums))
            .route("/albums/{key}/images", web::get().to(album_images))
            .route("/banners", web::get().to(hero_banners)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{recording_backend, test_backend};
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_unreachable_backend_is_bad_gateway() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_backend()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/albums").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "BACKEND_ERROR");
    }

    #[actix_web::test]
    async fn test_public_reads_use_service_role() {
        let (backend, requests) = recording_backend().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(backend))
                .configure(config),
        )
        .await;

        for uri in ["/api/albums", "/api/banners", "/api/albums/le-cuoi/images"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
        }

        let requests = requests.lock().unwrap();
        assert!(requests.len() >= 3);
        for request in requests.iter() {
            assert!(request.contains("apikey: service-key"), "{}", request);
            assert!(request.contains("authorization: bearer service-key"), "{}", request);
        }
    }
}
