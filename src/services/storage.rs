// src/services/storage.rs
// DOCUMENTATION: Object storage access and storage path helpers
// PURPOSE: Upload, list, remove and sign objects; derive paths from URLs

use crate::errors::GalleryError;
use crate::services::BackendClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Page size used for every listing call
pub const LIST_PAGE_LIMIT: usize = 1000;

/// Lifetime of signed URLs handed out as a fallback for private objects
pub const SIGNED_URL_EXPIRES_SECS: u64 = 60 * 10;

/// Entry of a storage listing
/// DOCUMENTATION: Folders come back without an id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageEntry {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
}

impl StorageEntry {
    pub fn is_folder(&self) -> bool {
        self.id.is_none()
    }
}

/// Options of a listing call
#[derive(Debug, Clone, PartialEq)]
pub struct ListOptions {
    pub limit: usize,
    pub offset: usize,
    pub sort_column: String,
    pub ascending: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: LIST_PAGE_LIMIT,
            offset: 0,
            sort_column: "name".to_string(),
            ascending: true,
        }
    }
}

/// Object storage access
#[async_trait]
pub trait StorageApi: Send + Sync {
    /// Store `bytes` at `path`, returning the stored path
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> Result<String, GalleryError>;

    /// List the direct children of `prefix`
    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        options: &ListOptions,
    ) -> Result<Vec<StorageEntry>, GalleryError>;

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), GalleryError>;

    async fn create_signed_url(
        &self,
        bucket: &str,
        path: &str,
        expires_in: u64,
    ) -> Result<String, GalleryError>;

    /// Public URL of an object; no request is made
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

/// Percent-encode every segment of an object path, keeping the separators
pub fn encode_object_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

impl BackendClient {
    fn storage_url(&self, endpoint: &str) -> String {
        format!("{}/storage/v1/{}", self.base_url(), endpoint)
    }
}

#[async_trait]
impl StorageApi for BackendClient {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> Result<String, GalleryError> {
        log::debug!("Uploading {} bytes to {}/{}", bytes.len(), bucket, path);

        let url = self.storage_url(&format!("object/{}/{}", bucket, encode_object_path(path)));
        let response = self
            .authed(self.http().post(url))
            .header("Content-Type", content_type)
            .header("x-upsert", if upsert { "true" } else { "false" })
            .body(bytes)
            .send()
            .await
            .map_err(|e| Self::request_failed("upload", e))?;

        Self::check(response, "upload").await?;
        Ok(path.to_string())
    }

    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        options: &ListOptions,
    ) -> Result<Vec<StorageEntry>, GalleryError> {
        let body = json!({
            "prefix": prefix,
            "limit": options.limit,
            "offset": options.offset,
            "sortBy": {
                "column": options.sort_column,
                "order": if options.ascending { "asc" } else { "desc" },
            },
        });

        let response = self
            .authed(self.http().post(self.storage_url(&format!("object/list/{}", bucket))))
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::request_failed("list", e))?;

        let response = Self::check(response, "list").await?;
        response
            .json::<Vec<StorageEntry>>()
            .await
            .map_err(|e| GalleryError::BackendError(format!("Parse error: {}", e)))
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), GalleryError> {
        log::info!("Removing {} object(s) from {}", paths.len(), bucket);

        let response = self
            .authed(self.http().delete(self.storage_url(&format!("object/{}", bucket))))
            .json(&json!({ "prefixes": paths }))
            .send()
            .await
            .map_err(|e| Self::request_failed("remove", e))?;

        Self::check(response, "remove").await?;
        Ok(())
    }

    async fn create_signed_url(
        &self,
        bucket: &str,
        path: &str,
        expires_in: u64,
    ) -> Result<String, GalleryError> {
        #[derive(Deserialize)]
        struct SignedResponse {
            #[serde(rename = "signedURL", alias = "signedUrl")]
            signed_url: Option<String>,
        }

        let url = self.storage_url(&format!("object/sign/{}/{}", bucket, encode_object_path(path)));
        let response = self
            .authed(self.http().post(url))
            .json(&json!({ "expiresIn": expires_in }))
            .send()
            .await
            .map_err(|e| Self::request_failed("sign", e))?;

        let response = Self::check(response, "sign").await?;
        let signed: SignedResponse = response
            .json()
            .await
            .map_err(|e| GalleryError::BackendError(format!("Parse error: {}", e)))?;

        match signed.signed_url {
            Some(relative) if !relative.is_empty() => {
                Ok(format!("{}/storage/v1{}", self.base_url(), relative))
            }
            _ => Err(GalleryError::BackendError(
                "Không tạo được signed URL".to_string(),
            )),
        }
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.storage_url(&format!(
            "object/public/{}/{}",
            bucket,
            encode_object_path(path)
        ))
    }
}

/// Derive the bucket-relative object path from a public URL
/// DOCUMENTATION: Looks for `/object/public/<bucket>/`, drops the query
/// string and one leading slash, then percent-decodes the tail.
/// Returns None when the URL does not point into the bucket.
pub fn extract_storage_path_from_url(public_url: &str, bucket: &str) -> Option<String> {
    let marker = format!("/object/public/{}/", bucket);
    let idx = public_url.find(&marker)?;

    let tail = &public_url[idx + marker.len()..];
    let tail = tail.split('?').next().unwrap_or_default();
    let tail = tail.strip_prefix('/').unwrap_or(tail);

    match urlencoding::decode(tail) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(_) => Some(tail.to_string()),
    }
}

/// Recursively list every file path below `folder`
/// DOCUMENTATION: Iterative depth-first walk with an explicit stack.
/// Listing errors abort the walk.
pub async fn list_all_paths<S: StorageApi + ?Sized>(
    storage: &S,
    bucket: &str,
    folder: &str,
) -> Result<Vec<String>, GalleryError> {
    let mut paths = Vec::new();
    let mut stack = vec![folder.trim_matches('/').to_string()];
    let options = ListOptions::default();

    while let Some(current) = stack.pop() {
        let entries = storage.list(bucket, &current, &options).await?;

        for entry in entries {
            let joined = [current.as_str(), entry.name.as_str()]
                .iter()
                .filter(|part| !part.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join("/");

            if entry.is_folder() {
                let sub = joined.trim_end_matches('/').to_string();
                if !sub.is_empty() && sub != current {
                    stack.push(sub);
                }
            } else {
                paths.push(joined.trim_start_matches('/').to_string());
            }
        }
    }

    Ok(paths)
}

/// Make an uploaded file name safe to use as a single path segment
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_control() { '_' } else { c })
        .collect();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "file".to_string()
    } else {
        cleaned
    }
}

/// `cover/<millis>-<name>`
pub fn cover_object_path(millis: i64, file_name: &str) -> String {
    format!("cover/{}-{}", millis, sanitize_file_name(file_name))
}

/// `albums/<album_key>/<millis>-<name>`
pub fn album_object_path(album_key: &str, millis: i64, file_name: &str) -> String {
    format!("albums/{}/{}-{}", album_key, millis, sanitize_file_name(file_name))
}

/// `banners/<location>/<device>/<millis>-<name>`
pub fn banner_object_path(location: &str, device: &str, millis: i64, file_name: &str) -> String {
    format!(
        "banners/{}/{}/{}-{}",
        location,
        device,
        millis,
        sanitize_file_name(file_name)
    )
}


#[cfg(test)]
mod tests {
    use super::memory::MemoryStorage;
    use super::*;

    #[test]
    fn test_extract_path() {
        let url = "https://x.supabase.co/storage/v1/object/public/wedding/albums/le-cuoi/1-a.jpg";
        assert_eq!(
            extract_storage_path_from_url(url, "wedding"),
            Some("albums/le-cuoi/1-a.jpg".to_string())
        );
    }

    #[test]
    fn test_extract_path_drops_query_and_decodes() {
        let url = "https://x.supabase.co/storage/v1/object/public/wedding/albums/k/1-my%20photo.jpg?v=2";
        assert_eq!(
            extract_storage_path_from_url(url, "wedding"),
            Some("albums/k/1-my photo.jpg".to_string())
        );

        let doubled = "https://x/storage/v1/object/public/wedding//cover/a.jpg";
        assert_eq!(
            extract_storage_path_from_url(doubled, "wedding"),
            Some("cover/a.jpg".to_string())
        );
    }

    #[test]
    fn test_extract_path_other_bucket_or_url() {
        assert_eq!(
            extract_storage_path_from_url(
                "https://x/storage/v1/object/public/other/a.jpg",
                "wedding"
            ),
            None
        );
        assert_eq!(extract_storage_path_from_url("/albums/wedding/1.jpg", "wedding"), None);
    }

    #[test]
    fn test_public_url_round_trips_through_extraction() {
        let storage = MemoryStorage::default();
        let url = storage.public_url("wedding", "albums/k/1-ảnh cưới.jpg");
        assert!(!url.contains(' '));
        assert_eq!(
            extract_storage_path_from_url(&url, "wedding"),
            Some("albums/k/1-ảnh cưới.jpg".to_string())
        );
    }

    #[test]
    fn test_list_all_paths_walks_nested_folders() {
        let storage = MemoryStorage::with_objects(&[
            "albums/le-cuoi/1-a.jpg",
            "albums/le-cuoi/2-b.jpg",
            "albums/le-cuoi/extra/3-c.jpg",
            "albums/dam-hoi/1-d.jpg",
            "cover/1-e.jpg",
        ]);

        let mut paths =
            tokio_test::block_on(list_all_paths(&storage, "wedding", "/albums/le-cuoi/")).unwrap();
        paths.sort();

        assert_eq!(
            paths,
            vec![
                "albums/le-cuoi/1-a.jpg".to_string(),
                "albums/le-cuoi/2-b.jpg".to_string(),
                "albums/le-cuoi/extra/3-c.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_list_all_paths_from_root() {
        let storage = MemoryStorage::with_objects(&["a/1.jpg", "b/c/2.jpg", "3.jpg"]);
        let mut paths = tokio_test::block_on(list_all_paths(&storage, "wedding", "")).unwrap();
        paths.sort();
        assert_eq!(paths, vec!["3.jpg", "a/1.jpg", "b/c/2.jpg"]);
    }

    #[test]
    fn test_object_paths() {
        assert_eq!(cover_object_path(42, "c.jpg"), "cover/42-c.jpg");
        assert_eq!(
            album_object_path("le-cuoi", 42, "IMG_1.JPG"),
            "albums/le-cuoi/42-IMG_1.JPG"
        );
        assert_eq!(
            banner_object_path("hero", "pc", 42, "b.png"),
            "banners/hero/pc/42-b.png"
        );
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\photos\\a.jpg"), "a.jpg");
        assert_eq!(sanitize_file_name(""), "file");
        assert_eq!(sanitize_file_name(".."), "file");
        assert_eq!(sanitize_file_name("a\nb.jpg"), "a_b.jpg");
    }
}
