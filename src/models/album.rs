// src/models/album.rs
// DOCUMENTATION: Album and album image records
// PURPOSE: Typed views over the `albums` and `images` tables

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Album record as stored in the `albums` table
/// DOCUMENTATION: Public pages read published albums, ordered newest first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Album {
    /// Integer primary key
    pub id: i64,

    /// Human readable key, also the storage folder name (e.g. "le-cuoi")
    pub key: String,

    /// Display title
    pub title: String,

    /// Optional long description shown under the gallery
    #[serde(default)]
    pub description: Option<String>,

    /// Public URL of the cover image
    #[serde(default)]
    pub cover_url: Option<String>,

    /// When the album was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Album entry for the admin select box
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlbumSummary {
    pub id: i64,
    pub key: String,
    pub title: String,
}

/// Image row from the `images` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlbumImage {
    pub id: i64,
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub sort: Option<i32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Minimal image row used by delete and resync flows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRef {
    pub id: i64,
    pub url: String,
}

/// Row inserted for every uploaded album image
#[derive(Debug, Clone, Serialize)]
pub struct NewImage {
    pub album_id: i64,
    pub url: String,
    pub owner_id: Uuid,
}

/// Outcome of an album upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadAlbumResult {
    pub album_id: i64,
    /// Public URLs of every file that made it into storage
    pub uploaded: Vec<String>,
    /// Set when a cover was uploaded and the album row updated
    pub cover_url: Option<String>,
}

/// Outcome of an album resync between storage and the `images` table
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ResyncReport {
    pub album_id: i64,
    /// Objects found under the album folder
    pub objects: usize,
    /// Rows inserted for objects that had none
    pub rows_inserted: usize,
    /// Rows removed because their object is gone
    pub rows_removed: usize,
}

impl From<AlbumImage> for ImageRef {
    fn from(image: AlbumImage) -> Self {
        ImageRef {
            id: image.id,
            url: image.url,
        }
    }
}
