// src/services/album_service.rs
// DOCUMENTATION: Business logic for albums and album images
// PURPOSE: Public album reads plus the admin upload, delete and resync flows

use crate::errors::GalleryError;
use crate::models::{
    Album, AlbumImage, AlbumSummary, AuthUser, ImageRef, NewImage, ResyncReport, UploadAlbumResult,
    UploadFile,
};
use crate::services::backend_client::{rows_into, TableApi, TableQuery};
use crate::services::storage::{
    album_object_path, cover_object_path, extract_storage_path_from_url, list_all_paths,
    StorageApi,
};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::hash::Hash;

const ALBUMS: &str = "albums";
const IMAGES: &str = "images";

/// Keep the first item for every key, preserving order
pub fn unique_by<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// Parse the album id posted by the upload form; zero and garbage are rejected
pub fn parse_album_id(raw: &str) -> Result<i64, GalleryError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(GalleryError::InvalidInput(
            "Thiếu hoặc sai album ID.".to_string(),
        )),
    }
}

fn image_query(album_id: Value) -> TableQuery {
    TableQuery::new()
        .select("id, url, caption, sort")
        .eq("album_id", album_id)
        .order_nulls_first("sort", true)
        .order("id", true)
}

pub struct AlbumService;

impl AlbumService {
    /// Published albums, newest first
    pub async fn list_published_albums<T: TableApi + ?Sized>(
        tables: &T,
    ) -> Result<Vec<Album>, GalleryError> {
        let rows = tables
            .select_rows(
                ALBUMS,
                &TableQuery::new()
                    .select("id, key, title, description, cover_url, created_at")
                    .eq("is_published", true)
                    .order("created_at", false),
            )
            .await?;
        rows_into(rows)
    }

    /// Every album for the admin select box, by id
    pub async fn list_albums<T: TableApi + ?Sized>(
        tables: &T,
    ) -> Result<Vec<AlbumSummary>, GalleryError> {
        let rows = tables
            .select_rows(
                ALBUMS,
                &TableQuery::new().select("id, key, title").order("id", true),
            )
            .await?;
        rows_into(rows)
    }

    /// Album by id; missing rows map to NotFound
    pub async fn get_album<T: TableApi + ?Sized>(
        tables: &T,
        id: i64,
    ) -> Result<AlbumSummary, GalleryError> {
        let rows = tables
            .select_rows(
                ALBUMS,
                &TableQuery::new().select("id, key, title").eq("id", id).limit(1),
            )
            .await?;

        rows_into::<AlbumSummary>(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| GalleryError::NotFound(format!("album {}", id)))
    }

    /// Images of the album with `key`, by sort then creation time.
    /// An unknown key yields an empty list.
    pub async fn images_by_album_key<T: TableApi + ?Sized>(
        tables: &T,
        key: &str,
    ) -> Result<Vec<AlbumImage>, GalleryError> {
        let rows = tables
            .select_rows(
                ALBUMS,
                &TableQuery::new().select("id").eq("key", key).limit(1),
            )
            .await?;

        let Some(album_id) = rows.first().and_then(|row| row.get("id")).cloned() else {
            log::debug!("No album with key {}", key);
            return Ok(Vec::new());
        };

        let rows = tables
            .select_rows(
                IMAGES,
                &TableQuery::new()
                    .select("id, url, caption, sort, created_at")
                    .eq("album_id", album_id)
                    .order("sort", true)
                    .order("created_at", true),
            )
            .await?;
        rows_into(rows)
    }

    /// Images of an album whose `album_id` column may hold text or numbers
    /// DOCUMENTATION: Tries the string form first; only when that is empty and
    /// the id is numeric, tries the number form. Errors propagate.
    pub async fn fetch_images_dual<T: TableApi + ?Sized>(
        tables: &T,
        album_id: &str,
    ) -> Result<Vec<AlbumImage>, GalleryError> {
        let rows = tables
            .select_rows(IMAGES, &image_query(json!(album_id)))
            .await?;
        if !rows.is_empty() {
            return rows_into(rows);
        }

        match album_id.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => {
                let rows = tables
                    .select_rows(IMAGES, &image_query(numeric_value(number)))
                    .await?;
                rows_into(rows)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Both lookups merged and deduplicated by id; per-query errors are ignored
    pub async fn fetch_rows_by_album_id_dual<T: TableApi + ?Sized>(
        tables: &T,
        album_id: &str,
    ) -> Vec<ImageRef> {
        let mut out: Vec<ImageRef> = Vec::new();
        let base = TableQuery::new().select("id, url");

        match tables
            .select_rows(IMAGES, &base.clone().eq("album_id", album_id))
            .await
            .and_then(rows_into::<ImageRef>)
        {
            Ok(rows) => out.extend(rows),
            Err(e) => log::warn!("Text album_id lookup failed for {}: {}", album_id, e),
        }

        if let Ok(number) = album_id.trim().parse::<f64>() {
            if number.is_finite() {
                match tables
                    .select_rows(IMAGES, &base.eq("album_id", numeric_value(number)))
                    .await
                    .and_then(rows_into::<ImageRef>)
                {
                    Ok(rows) => out.extend(rows),
                    Err(e) => log::warn!("Numeric album_id lookup failed for {}: {}", album_id, e),
                }
            }
        }

        unique_by(out, |row| row.id)
    }

    /// Upload a cover and album images
    /// DOCUMENTATION: The album must exist and carry a key. A failed object
    /// upload skips that file; every stored file gets one `images` row.
    pub async fn upload_album<T, S>(
        tables: &T,
        storage: &S,
        bucket: &str,
        user: &AuthUser,
        album_id_raw: &str,
        cover: Option<UploadFile>,
        files: Vec<UploadFile>,
    ) -> Result<UploadAlbumResult, GalleryError>
    where
        T: TableApi + ?Sized,
        S: StorageApi + ?Sized,
    {
        let album_id = parse_album_id(album_id_raw)?;

        let album = match Self::get_album(tables, album_id).await {
            Ok(album) if !album.key.is_empty() => album,
            Ok(_) | Err(GalleryError::NotFound(_)) => {
                return Err(GalleryError::NotFound(
                    "Không tìm thấy album hoặc không có quyền.".to_string(),
                ))
            }
            Err(e) => return Err(e),
        };

        log::info!(
            "Uploading {} file(s) to album {} ({}), cover: {}",
            files.len(),
            album.id,
            album.key,
            cover.is_some()
        );

        let mut cover_url = None;
        if let Some(cover) = cover.filter(|c| !c.is_empty()) {
            let path = cover_object_path(chrono::Utc::now().timestamp_millis(), &cover.name);
            match storage
                .upload(bucket, &path, cover.bytes, &cover.content_type, true)
                .await
            {
                Ok(stored) => {
                    let url = storage.public_url(bucket, &stored);
                    tables
                        .update_rows(
                            ALBUMS,
                            &TableQuery::new()
                                .eq("id", album_id)
                                .eq("owner_id", user.id.to_string()),
                            json!({ "cover_url": url }),
                        )
                        .await?;
                    cover_url = Some(url);
                }
                Err(e) => log::warn!("Cover upload for album {} skipped: {}", album_id, e),
            }
        }

        let mut uploaded = Vec::new();
        for file in files.into_iter().filter(|f| !f.is_empty()) {
            let path = album_object_path(
                &album.key,
                chrono::Utc::now().timestamp_millis(),
                &file.name,
            );

            let stored = match storage
                .upload(bucket, &path, file.bytes, &file.content_type, true)
                .await
            {
                Ok(stored) => stored,
                Err(e) => {
                    log::warn!("Upload of {} skipped: {}", file.name, e);
                    continue;
                }
            };

            let url = storage.public_url(bucket, &stored);
            let row = NewImage {
                album_id,
                url: url.clone(),
                owner_id: user.id,
            };
            tables.insert_row(IMAGES, json!(row)).await?;
            uploaded.push(url);
        }

        log::info!("Album {}: {} file(s) uploaded", album_id, uploaded.len());

        Ok(UploadAlbumResult {
            album_id,
            uploaded,
            cover_url,
        })
    }

    /// Remove an image object, then its row
    /// DOCUMENTATION: The image must belong to the selected album. A URL
    /// outside the bucket skips the storage step. Either failure aborts.
    pub async fn delete_image<T, S>(
        tables: &T,
        storage: &S,
        bucket: &str,
        album: Option<&AlbumSummary>,
        image: &ImageRef,
    ) -> Result<(), GalleryError>
    where
        T: TableApi + ?Sized,
        S: StorageApi + ?Sized,
    {
        let album = match album {
            Some(album) if !album.key.is_empty() => album,
            _ => return Err(GalleryError::InvalidInput("Bạn chưa chọn album.".to_string())),
        };

        let owned = Self::fetch_rows_by_album_id_dual(tables, &album.id.to_string()).await;
        if !owned.iter().any(|row| row.id == image.id) {
            log::warn!("Image {} does not belong to album {}", image.id, album.id);
            return Err(GalleryError::InvalidInput(
                "Ảnh không thuộc album đã chọn.".to_string(),
            ));
        }

        if let Some(path) = extract_storage_path_from_url(&image.url, bucket) {
            storage.remove(bucket, &[path]).await?;
        } else {
            log::warn!("Image {} is not stored in {}; removing row only", image.id, bucket);
        }

        tables
            .delete_rows(IMAGES, &TableQuery::new().eq("id", image.id))
            .await?;

        log::info!("Deleted image {}", image.id);
        Ok(())
    }

    /// Image row by id, regardless of album
    pub async fn get_image<T: TableApi + ?Sized>(
        tables: &T,
        id: i64,
    ) -> Result<ImageRef, GalleryError> {
        let rows = tables
            .select_rows(IMAGES, &TableQuery::new().select("id, url").eq("id", id).limit(1))
            .await?;
        rows_into::<ImageRef>(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| GalleryError::NotFound(format!("image {}", id)))
    }

    /// Reconcile `albums/<key>` in storage with the album's image rows
    /// DOCUMENTATION: Inserts rows for objects without one and drops rows
    /// whose object no longer exists. Rows pointing outside the bucket stay.
    pub async fn resync_album<T, S>(
        tables: &T,
        storage: &S,
        bucket: &str,
        user: &AuthUser,
        album: &AlbumSummary,
    ) -> Result<ResyncReport, GalleryError>
    where
        T: TableApi + ?Sized,
        S: StorageApi + ?Sized,
    {
        let folder = format!("albums/{}", album.key);
        let paths = list_all_paths(storage, bucket, &folder).await?;
        let rows = Self::fetch_rows_by_album_id_dual(tables, &album.id.to_string()).await;

        let stored: HashSet<&str> = paths.iter().map(String::as_str).collect();
        let referenced: HashSet<String> = rows
            .iter()
            .filter_map(|row| extract_storage_path_from_url(&row.url, bucket))
            .collect();

        let mut report = ResyncReport {
            album_id: album.id,
            objects: paths.len(),
            ..Default::default()
        };

        for path in paths.iter().filter(|p| !referenced.contains(p.as_str())) {
            let row = NewImage {
                album_id: album.id,
                url: storage.public_url(bucket, path),
                owner_id: user.id,
            };
            tables.insert_row(IMAGES, json!(row)).await?;
            report.rows_inserted += 1;
        }

        for row in &rows {
            let Some(path) = extract_storage_path_from_url(&row.url, bucket) else {
                continue;
            };
            if path.starts_with(&format!("{}/", folder)) && !stored.contains(path.as_str()) {
                tables
                    .delete_rows(IMAGES, &TableQuery::new().eq("id", row.id))
                    .await?;
                report.rows_removed += 1;
            }
        }

        log::info!(
            "Resynced album {}: {} objects, {} rows inserted, {} rows removed",
            album.key,
            report.objects,
            report.rows_inserted,
            report.rows_removed
        );
        Ok(report)
    }
}

/// Integral ids stay JSON integers so they match integer columns
fn numeric_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        json!(number as i64)
    } else {
        json!(number)
    }
}
