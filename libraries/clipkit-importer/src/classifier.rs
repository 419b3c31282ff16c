//! Extension-based classification of media files

use crate::types::{ContentType, ForceType};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extension table: (extension, category, MIME type)
///
/// Order is the order reported back to users in skip records.
const EXTENSION_TABLE: &[(&str, ContentType, &str)] = &[
    // Video
    ("mp4", ContentType::Video, "video/mp4"),
    ("mov", ContentType::Video, "video/quicktime"),
    ("webm", ContentType::Video, "video/webm"),
    ("avi", ContentType::Video, "video/x-msvideo"),
    ("mkv", ContentType::Video, "video/x-matroska"),
    ("m4v", ContentType::Video, "video/x-m4v"),
    ("flv", ContentType::Video, "video/x-flv"),
    ("wmv", ContentType::Video, "video/x-ms-wmv"),
    // Image
    ("jpg", ContentType::Image, "image/jpeg"),
    ("jpeg", ContentType::Image, "image/jpeg"),
    ("png", ContentType::Image, "image/png"),
    ("webp", ContentType::Image, "image/webp"),
    ("gif", ContentType::Image, "image/gif"),
    ("svg", ContentType::Image, "image/svg+xml"),
    ("bmp", ContentType::Image, "image/bmp"),
    ("tiff", ContentType::Image, "image/tiff"),
    ("tif", ContentType::Image, "image/tiff"),
    ("heic", ContentType::Image, "image/heic"),
    ("heif", ContentType::Image, "image/heif"),
    ("avif", ContentType::Image, "image/avif"),
    // Audio defaults to music; sound effects need an explicit override
    ("mp3", ContentType::Music, "audio/mpeg"),
    ("wav", ContentType::Music, "audio/wav"),
    ("ogg", ContentType::Music, "audio/ogg"),
    ("m4a", ContentType::Music, "audio/mp4"),
    ("flac", ContentType::Music, "audio/flac"),
    ("aac", ContentType::Music, "audio/aac"),
    ("wma", ContentType::Music, "audio/x-ms-wma"),
    ("aiff", ContentType::Music, "audio/aiff"),
    ("opus", ContentType::Music, "audio/opus"),
];

const FALLBACK_MIME: &str = "application/octet-stream";

/// Result of classifying a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub content_type: ContentType,

    /// Target folder under `imports/`
    pub folder: String,

    /// Lower-cased extension without the dot (empty if none)
    pub ext: String,

    pub supported: bool,
}

/// Get the lower-cased extension of a path
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}

fn lookup(ext: &str) -> Option<&'static (&'static str, ContentType, &'static str)> {
    EXTENSION_TABLE.iter().find(|(e, _, _)| *e == ext)
}

/// Classify a file by extension, or by the forced type when one is given
pub fn classify(path: &Path, force: ForceType) -> Classification {
    let ext = extension_of(path);

    let content_type = match force.content_type() {
        Some(forced) => Some(forced),
        None => lookup(&ext).map(|(_, category, _)| *category),
    };

    match content_type {
        Some(content_type) => Classification {
            content_type,
            folder: content_type.folder().to_string(),
            ext,
            supported: true,
        },
        None => Classification {
            content_type: ContentType::Unknown,
            folder: ContentType::Unknown.folder().to_string(),
            ext,
            supported: false,
        },
    }
}

/// Get the MIME type for a file from its extension
pub fn mime_type(path: &Path) -> &'static str {
    lookup(&extension_of(path))
        .map(|(_, _, mime)| *mime)
        .unwrap_or(FALLBACK_MIME)
}

/// All extensions the classifier recognizes
pub fn supported_extensions() -> Vec<&'static str> {
    EXTENSION_TABLE.iter().map(|(ext, _, _)| *ext).collect()
}

/// Check if a file has a recognized media extension
pub fn is_supported(path: &Path) -> bool {
    lookup(&extension_of(path)).is_some()
}
