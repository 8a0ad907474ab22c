// src/services/banner_service.rs
// DOCUMENTATION: Business logic for banners
// PURPOSE: Hero banners for the public site, banner upload/list/delete for admins

use crate::errors::GalleryError;
use crate::models::{
    AuthUser, BannerImage, BannerLocation, Device, HeroBanner, NewBannerImage, UploadFile,
};
use crate::services::backend_client::{rows_into, TableApi, TableQuery};
use crate::services::storage::{
    banner_object_path, extract_storage_path_from_url, StorageApi, SIGNED_URL_EXPIRES_SECS,
};
use serde_json::json;

const BANNERS: &str = "banners";
const BANNER_LOCATIONS: &str = "banner_locations";
const BANNER_IMAGES: &str = "banner_images";

/// Validate the device field of the banner form
pub fn parse_device(raw: &str) -> Result<Device, GalleryError> {
    raw.parse::<Device>()
        .map_err(|_| GalleryError::InvalidInput("Thiết bị không hợp lệ.".to_string()))
}

pub struct BannerService;

impl BannerService {
    /// Active hero banners, by sort
    pub async fn hero_banners<T: TableApi + ?Sized>(
        tables: &T,
    ) -> Result<Vec<HeroBanner>, GalleryError> {
        let rows = tables
            .select_rows(
                BANNERS,
                &TableQuery::new()
                    .select("id, image_url, heading, subheading, sort")
                    .eq("location", "hero")
                    .eq("is_active", true)
                    .order("sort", true),
            )
            .await?;
        rows_into(rows)
    }

    /// Banner slots, by id
    pub async fn list_locations<T: TableApi + ?Sized>(
        tables: &T,
    ) -> Result<Vec<BannerLocation>, GalleryError> {
        let rows = tables
            .select_rows(
                BANNER_LOCATIONS,
                &TableQuery::new().select("id, key, name").order("id", true),
            )
            .await?;
        rows_into(rows)
    }

    /// Upload banner images for one location and device
    /// DOCUMENTATION: Failed object uploads are skipped. Returns how many
    /// files were stored and recorded.
    pub async fn upload_banners<T, S>(
        tables: &T,
        storage: &S,
        bucket: &str,
        user: &AuthUser,
        location: &str,
        device_raw: &str,
        files: Vec<UploadFile>,
    ) -> Result<usize, GalleryError>
    where
        T: TableApi + ?Sized,
        S: StorageApi + ?Sized,
    {
        let location = location.trim();
        if location.is_empty() {
            return Err(GalleryError::InvalidInput("Thiếu vị trí banner.".to_string()));
        }
        if location.contains('/') {
            return Err(GalleryError::InvalidInput(format!(
                "Vị trí banner không hợp lệ: {}",
                location
            )));
        }
        let device = parse_device(device_raw)?;

        log::info!(
            "Uploading {} banner(s) for {}/{}",
            files.len(),
            location,
            device
        );

        let mut uploaded = 0;
        for file in files.into_iter().filter(|f| !f.is_empty()) {
            let path = banner_object_path(
                location,
                device.as_str(),
                chrono::Utc::now().timestamp_millis(),
                &file.name,
            );

            let stored = match storage
                .upload(bucket, &path, file.bytes, &file.content_type, true)
                .await
            {
                Ok(stored) => stored,
                Err(e) => {
                    log::warn!("Banner upload of {} skipped: {}", file.name, e);
                    continue;
                }
            };

            let row = NewBannerImage {
                url: storage.public_url(bucket, &stored),
                path: stored,
                device,
                location: location.to_string(),
                owner_id: user.id,
            };
            tables.insert_row(BANNER_IMAGES, json!(row)).await?;
            uploaded += 1;
        }

        Ok(uploaded)
    }

    /// Banner images of one slot, by id
    /// DOCUMENTATION: Rows without a stored path get one derived from the URL
    pub async fn list_banner_images<T: TableApi + ?Sized>(
        tables: &T,
        bucket: &str,
        location: &str,
        device: Device,
    ) -> Result<Vec<BannerImage>, GalleryError> {
        let rows = tables
            .select_rows(
                BANNER_IMAGES,
                &TableQuery::new()
                    .select("id, path, url, device, location")
                    .eq("location", location)
                    .eq("device", device.as_str())
                    .order("id", true),
            )
            .await?;

        let images = rows_into::<BannerImage>(rows)?
            .into_iter()
            .map(|mut image| {
                if image.path.as_deref().map(str::is_empty).unwrap_or(true) {
                    image.path = extract_storage_path_from_url(&image.url, bucket);
                }
                image
            })
            .collect();
        Ok(images)
    }

    pub async fn get_banner_image<T: TableApi + ?Sized>(
        tables: &T,
        bucket: &str,
        id: i64,
    ) -> Result<BannerImage, GalleryError> {
        let rows = tables
            .select_rows(
                BANNER_IMAGES,
                &TableQuery::new()
                    .select("id, path, url, device, location")
                    .eq("id", id)
                    .limit(1),
            )
            .await?;

        let mut image = rows_into::<BannerImage>(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| GalleryError::NotFound(format!("banner image {}", id)))?;
        if image.path.as_deref().map(str::is_empty).unwrap_or(true) {
            image.path = extract_storage_path_from_url(&image.url, bucket);
        }
        Ok(image)
    }

    /// Remove a banner object and its row; storage failure aborts
    pub async fn delete_banner_image<T, S>(
        tables: &T,
        storage: &S,
        bucket: &str,
        id: i64,
    ) -> Result<BannerImage, GalleryError>
    where
        T: TableApi + ?Sized,
        S: StorageApi + ?Sized,
    {
        let image = Self::get_banner_image(tables, bucket, id).await?;

        if let Some(path) = &image.path {
            storage.remove(bucket, &[path.clone()]).await?;
        }
        tables
            .delete_rows(BANNER_IMAGES, &TableQuery::new().eq("id", id))
            .await?;

        log::info!("Deleted banner image {} ({}/{})", id, image.location, image.device);
        Ok(image)
    }

    /// Signed URL for a banner whose public URL does not load
    pub async fn signed_url_for<T, S>(
        tables: &T,
        storage: &S,
        bucket: &str,
        id: i64,
    ) -> Result<String, GalleryError>
    where
        T: TableApi + ?Sized,
        S: StorageApi + ?Sized,
    {
        let image = Self::get_banner_image(tables, bucket, id).await?;
        let path = image
            .path
            .ok_or_else(|| GalleryError::NotFound(format!("banner image {} has no path", id)))?;
        storage
            .create_signed_url(bucket, &path, SIGNED_URL_EXPIRES_SECS)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::backend_client::memory::MemoryTables;
    use crate::services::storage::memory::MemoryStorage;
    use uuid::Uuid;

    fn admin() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: Some("bride@example.com".to_string()),
        }
    }

    fn file(name: &str) -> UploadFile {
        UploadFile::new(name, Some("image/png"), vec![0; 4])
    }

    #[test]
    fn test_parse_device() {
        assert_eq!(parse_device("pc").unwrap(), Device::Pc);
        assert!(matches!(
            parse_device("tv"),
            Err(GalleryError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_upload_records_path_and_device() {
        let tables = MemoryTables::default();
        let storage = MemoryStorage::default();

        let count = BannerService::upload_banners(
            &tables,
            &storage,
            "wedding",
            &admin(),
            "hero",
            "mobile",
            vec![file("a.png"), file("b.png")],
        )
        .await
        .unwrap();

        assert_eq!(count, 2);
        let rows = tables.rows(BANNER_IMAGES);
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row["device"], "mobile");
            assert_eq!(row["location"], "hero");
            assert!(row["path"].as_str().unwrap().starts_with("banners/hero/mobile/"));
        }
    }

    #[tokio::test]
    async fn test_upload_validates_form() {
        let tables = MemoryTables::default();
        let storage = MemoryStorage::default();

        let missing_location =
            BannerService::upload_banners(&tables, &storage, "wedding", &admin(), " ", "pc", vec![])
                .await;
        assert!(missing_location.is_err());

        let bad_device = BannerService::upload_banners(
            &tables,
            &storage,
            "wedding",
            &admin(),
            "hero",
            "tablet",
            vec![file("a.png")],
        )
        .await;
        assert!(bad_device.is_err());
        assert!(storage.paths().is_empty());
    }

    #[tokio::test]
    async fn test_upload_skips_failed_objects() {
        let tables = MemoryTables::default();
        let storage = MemoryStorage {
            fail_uploads_containing: Some("bad".to_string()),
            ..Default::default()
        };

        let count = BannerService::upload_banners(
            &tables,
            &storage,
            "wedding",
            &admin(),
            "moment",
            "pc",
            vec![file("bad.png"), file("good.png")],
        )
        .await
        .unwrap();

        assert_eq!(count, 1);
        assert_eq!(tables.rows(BANNER_IMAGES).len(), 1);
    }

    #[tokio::test]
    async fn test_list_derives_missing_path() {
        let storage = MemoryStorage::default();
        let url = storage.public_url("wedding", "banners/hero/pc/1-a.png");
        let tables = MemoryTables::with_rows(
            BANNER_IMAGES,
            vec![
                json!({"id": 2, "path": null, "url": url, "device": "pc", "location": "hero"}),
                json!({"id": 1, "path": "banners/hero/pc/0-z.png", "url": "x", "device": "pc", "location": "hero"}),
                json!({"id": 3, "path": "banners/hero/mobile/0-m.png", "url": "y", "device": "mobile", "location": "hero"}),
            ],
        );

        let images = BannerService::list_banner_images(&tables, "wedding", "hero", Device::Pc)
            .await
            .unwrap();

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].id, 1);
        assert_eq!(images[1].path.as_deref(), Some("banners/hero/pc/1-a.png"));
    }

    #[tokio::test]
    async fn test_delete_and_sign() {
        let storage = MemoryStorage::with_objects(&["banners/hero/pc/1-a.png"]);
        let tables = MemoryTables::with_rows(
            BANNER_IMAGES,
            vec![json!({"id": 5, "path": "banners/hero/pc/1-a.png", "url": "u", "device": "pc", "location": "hero"})],
        );

        let signed = BannerService::signed_url_for(&tables, &storage, "wedding", 5)
            .await
            .unwrap();
        assert!(signed.contains("expires=600"));

        BannerService::delete_banner_image(&tables, &storage, "wedding", 5)
            .await
            .unwrap();
        assert!(storage.paths().is_empty());
        assert!(tables.rows(BANNER_IMAGES).is_empty());

        let missing = BannerService::delete_banner_image(&tables, &storage, "wedding", 5).await;
        assert!(matches!(missing, Err(GalleryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_hero_banners_filters_active() {
        let tables = MemoryTables::with_rows(
            BANNERS,
            vec![
                json!({"id": 1, "image_url": "b", "location": "hero", "is_active": true, "sort": 2}),
                json!({"id": 2, "image_url": "a", "location": "hero", "is_active": true, "sort": 1}),
                json!({"id": 3, "image_url": "c", "location": "hero", "is_active": false, "sort": 0}),
                json!({"id": 4, "image_url": "d", "location": "moment", "is_active": true, "sort": 0}),
            ],
        );

        let banners = BannerService::hero_banners(&tables).await.unwrap();
        assert_eq!(
            banners.iter().map(|b| b.image_url.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }
}
