//! Binary attachments owned by a media item.
//!
//! Assets are outside the publication state machine: they are created on
//! upload and deleted independently (stored object and record together).

use std::io::Cursor;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::types::{define_text_enum, DbId, Timestamp};

/// Largest accepted upload (100 MiB).
pub const MAX_ASSET_BYTES: usize = 100 * 1024 * 1024;

/// Longest file name kept in a storage path.
const MAX_FILE_NAME_LEN: usize = 80;

define_text_enum! {
    /// Coarse content kind derived from the MIME type at upload time.
    AssetKind {
        Image = "image",
        Video = "video",
        Audio = "audio",
        Doc = "doc",
    }
}

impl AssetKind {
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("image/") {
            Self::Image
        } else if mime.starts_with("video/") {
            Self::Video
        } else if mime.starts_with("audio/") {
            Self::Audio
        } else {
            Self::Doc
        }
    }
}

/// A row from the `assets` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: DbId,
    pub media_id: DbId,
    pub storage_path: String,
    pub public_url: String,
    pub mime_type: String,
    pub byte_size: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub duration_secs: Option<f64>,
    pub checksum: String,
    pub kind: AssetKind,
    pub uploaded_by: DbId,
    pub created_at: Timestamp,
}

/// Record to insert once the object has been stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAsset {
    pub media_id: DbId,
    pub storage_path: String,
    pub public_url: String,
    pub mime_type: String,
    pub byte_size: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub duration_secs: Option<f64>,
    pub checksum: String,
    pub kind: AssetKind,
    pub uploaded_by: DbId,
}

/// Metadata computed from the uploaded bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadMetadata {
    pub kind: AssetKind,
    pub byte_size: i64,
    pub checksum: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

/// Validate an upload and compute its metadata.
///
/// Image dimensions come from the file header; unrecognised formats leave
/// them unset rather than failing the upload.
pub fn inspect_upload(mime: &str, data: &[u8]) -> Result<UploadMetadata, CoreError> {
    if data.is_empty() {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if data.len() > MAX_ASSET_BYTES {
        return Err(CoreError::Validation(format!(
            "Uploaded file exceeds the {MAX_ASSET_BYTES} byte limit"
        )));
    }

    let kind = AssetKind::from_mime(mime);
    let (width, height) = match kind {
        AssetKind::Image => image_dimensions(data)
            .map(|(w, h)| (Some(w), Some(h)))
            .unwrap_or((None, None)),
        _ => (None, None),
    };

    Ok(UploadMetadata {
        kind,
        byte_size: data.len() as i64,
        checksum: sha256_hex(data),
        width,
        height,
    })
}

fn image_dimensions(data: &[u8]) -> Option<(i32, i32)> {
    let reader = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?;
    let (w, h) = reader.into_dimensions().ok()?;
    Some((i32::try_from(w).ok()?, i32::try_from(h).ok()?))
}

/// SHA-256 hex digest used as the asset checksum.
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Storage path for a new object: `media/{media_id}/{unique}-{file name}`.
pub fn storage_path(media_id: DbId, file_name: &str) -> String {
    let unique = uuid::Uuid::new_v4().simple().to_string();
    format!("media/{media_id}/{unique}-{}", sanitize_file_name(file_name))
}

/// Keep ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let mut cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    while cleaned.starts_with('.') {
        cleaned.remove(0);
    }
    if cleaned.len() > MAX_FILE_NAME_LEN {
        let cut = cleaned.len() - MAX_FILE_NAME_LEN;
        cleaned.drain(..cut);
    }
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}
