// src/handlers/site.rs
// DOCUMENTATION: Public site handlers
// PURPOSE: Home page, album grid and lightbox

use crate::errors::GalleryError;
use crate::handlers::html;
use crate::models::{
    default_album_cards, default_hero_slides, default_wedding_input, make_wedding_data, AlbumCard,
    HeroBanner, HeroSlide,
};
use crate::services::{BackendClient, BannerService, GalleryView, Lightbox, SliderState, TableApi};
use crate::views::site::{album_grid_page, home_page, lightbox_page};
use actix_web::{web, HttpResponse};
use serde::Deserialize;

/// Query of the home page; malformed numbers fall back to the first item
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub slide: Option<String>,
    pub album: Option<String>,
    pub photo: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LightboxQuery {
    pub zoom: Option<String>,
}

fn parse_index(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse().ok())
}

fn hero_slide(banner: HeroBanner) -> HeroSlide {
    HeroSlide {
        alt: banner.heading.clone(),
        src: banner.image_url,
        heading: banner.heading,
        subheading: banner.subheading,
    }
}

/// Active hero banners, or the static slides when none load
pub async fn load_hero_slides<T: TableApi + ?Sized>(tables: &T) -> Vec<HeroSlide> {
    match BannerService::hero_banners(tables).await {
        Ok(banners) if !banners.is_empty() => banners.into_iter().map(hero_slide).collect(),
        Ok(_) => default_hero_slides(),
        Err(e) => {
            log::error!("Failed to load hero banners, using static slides: {}", e);
            default_hero_slides()
        }
    }
}

fn find_card(slug: &str) -> Result<AlbumCard, GalleryError> {
    default_album_cards()
        .into_iter()
        .find(|card| card.slug == slug)
        .ok_or_else(|| GalleryError::NotFound(format!("Album {}", slug)))
}

/// GET /
/// Hero banners are read with the service role
pub async fn home(
    backend: web::Data<BackendClient>,
    query: web::Query<HomeQuery>,
) -> Result<HttpResponse, GalleryError> {
    let slides = load_hero_slides(&backend.as_service()).await;
    let slider = SliderState::new(
        parse_index(query.slide.as_deref()).unwrap_or(0),
        slides.len(),
    );

    let data = make_wedding_data(&default_wedding_input());
    let gallery = GalleryView::new(
        &data,
        query.album.as_deref(),
        parse_index(query.photo.as_deref()),
    );
    let tabs: Vec<(String, String)> = data
        .albums
        .iter()
        .map(|a| (a.key.clone(), a.title.clone()))
        .collect();

    Ok(html(home_page(
        &slides,
        slider,
        &gallery,
        &tabs,
        &default_album_cards(),
    )))
}

/// GET /album/{slug}
pub async fn album_grid(path: web::Path<String>) -> Result<HttpResponse, GalleryError> {
    let card = find_card(&path.into_inner())?;
    Ok(html(album_grid_page(&card)))
}

/// GET /album/{slug}/{index}
pub async fn album_lightbox(
    path: web::Path<(String, String)>,
    query: web::Query<LightboxQuery>,
) -> Result<HttpResponse, GalleryError> {
    let (slug, index) = path.into_inner();
    let card = find_card(&slug)?;
    let zoom = query.zoom.as_deref().and_then(|z| z.trim().parse::<f64>().ok());

    let lightbox = Lightbox::new(
        parse_index(Some(&index)).unwrap_or(0),
        card.images.len(),
        zoom,
    );
    Ok(html(lightbox_page(&card, lightbox)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/album/{slug}", web::get().to(album_grid))
        .route("/album/{slug}/{index}", web::get().to(album_lightbox));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{recording_backend, test_backend};
    use crate::services::backend_client::memory::MemoryTables;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;

    #[tokio::test]
    async fn test_hero_slides_from_banners() {
        let tables = MemoryTables::with_rows(
            "banners",
            vec![json!({"id": 1, "image_url": "/h.jpg", "heading": "Hi", "location": "hero", "is_active": true, "sort": 1})],
        );
        let slides = load_hero_slides(&tables).await;
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].src, "/h.jpg");
        assert_eq!(slides[0].alt.as_deref(), Some("Hi"));
    }

    #[tokio::test]
    async fn test_hero_slides_fall_back() {
        let empty = MemoryTables::default();
        assert_eq!(load_hero_slides(&empty).await, default_hero_slides());

        let mut broken = MemoryTables::default();
        broken.failing.insert("banners".to_string());
        assert_eq!(load_hero_slides(&broken).await, default_hero_slides());
    }

    #[actix_web::test]
    async fn test_home_page_without_backend_uses_static_slides() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_backend()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/?slide=x&album=ban-be&photo=2")
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains("Our Wedding"));
        assert!(body.contains("Bạn bè – khoảnh khắc 3"));
    }

    #[actix_web::test]
    async fn test_home_reads_banners_with_service_role() {
        let (backend, requests) = recording_backend().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(backend))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let requests = requests.lock().unwrap();
        assert!(requests.iter().any(|r| r.starts_with("get /rest/v1/banners")));
        assert!(requests
            .iter()
            .all(|r| r.contains("authorization: bearer service-key") && r.contains("apikey: service-key")));
    }

    #[actix_web::test]
    async fn test_album_pages() {
        let app = test::init_service(App::new().configure(config)).await;

        let req = test::TestRequest::get().uri("/album/le-cuoi").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/album/le-cuoi/99?zoom=abc").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(std::str::from_utf8(&body).unwrap().contains("1 / 32"));

        let req = test::TestRequest::get().uri("/album/unknown").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
