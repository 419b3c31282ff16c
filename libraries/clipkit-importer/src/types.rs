//! Common types for the importer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Content category of a media file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    Image,
    Music,
    Sfx,
    Unknown,
}

impl ContentType {
    /// Folder under `imports/` that holds files of this category
    pub fn folder(&self) -> &'static str {
        match self {
            ContentType::Video => "videos",
            ContentType::Image => "images",
            ContentType::Music => "music",
            ContentType::Sfx => "sfx",
            ContentType::Unknown => "misc",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Image => "image",
            ContentType::Music => "music",
            ContentType::Sfx => "sfx",
            ContentType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content type override for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ForceType {
    /// Detect from the file extension
    #[default]
    Auto,
    Video,
    Image,
    Music,
    Sfx,
}

impl ForceType {
    /// The forced category, or `None` for auto-detection
    pub fn content_type(&self) -> Option<ContentType> {
        match self {
            ForceType::Auto => None,
            ForceType::Video => Some(ContentType::Video),
            ForceType::Image => Some(ContentType::Image),
            ForceType::Music => Some(ContentType::Music),
            ForceType::Sfx => Some(ContentType::Sfx),
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, ForceType::Auto)
    }
}

impl FromStr for ForceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ForceType::Auto),
            "video" => Ok(ForceType::Video),
            "image" => Ok(ForceType::Image),
            "music" | "audio" => Ok(ForceType::Music),
            "sfx" => Ok(ForceType::Sfx),
            other => Err(format!(
                "unknown content type '{}' (expected auto, video, image, music or sfx)",
                other
            )),
        }
    }
}

/// What happened to an imported file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportAction {
    /// File already lives inside the project and is recorded in place
    #[serde(rename = "referenced")]
    Referenced,

    /// File was copied into `imports/<folder>/`
    #[serde(rename = "copied")]
    Copied,

    /// Dry run: file would have been copied
    #[serde(rename = "dry-run (would copy)")]
    DryRun,
}

/// Per-run options for an import
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    /// Content type override (`auto` detects from extension)
    pub force_type: ForceType,

    /// Scene identifier woven into generated filenames
    pub scene_id: Option<String>,

    /// Free-text label woven into generated filenames
    pub label: Option<String>,

    /// Append imported records to `resources.json`
    pub update_manifest: bool,

    /// Report what would happen without touching the filesystem
    pub dry_run: bool,
}

/// Record of a single imported (copied, referenced or dry-run) file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    /// Resolved absolute source path
    pub original_path: String,

    /// Absolute path of the file inside the project
    pub imported_path: String,

    /// Path relative to the project directory
    pub relative_path: String,

    pub content_type: ContentType,

    /// Size in bytes
    pub file_size: u64,

    pub filename: String,

    pub already_in_project: bool,

    pub action: ImportAction,

    pub scene_id: Option<String>,

    pub label: Option<String>,
}

/// A file that was not imported because its type is unsupported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipRecord {
    pub file: String,
    pub reason: String,
    pub supported_extensions: Vec<String>,
}

/// A file that failed to import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub file: String,
    pub error: String,
}

/// Running counts for an import operation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl ImportSummary {
    pub fn summary_text(&self) -> String {
        format!(
            "Import complete: {} imported, {} skipped, {} failed (of {})",
            self.imported, self.skipped, self.errors, self.total
        )
    }
}

/// Final report of an import run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// True when no file ended up under `errors`
    pub success: bool,

    pub imported: Vec<ImportRecord>,

    pub skipped: Vec<SkipRecord>,

    pub errors: Vec<ErrorRecord>,

    pub summary: ImportSummary,

    /// Set when a manifest update was attempted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources_updated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources_error: Option<String>,
}

impl ImportReport {
    /// Process exit code for this report: 0 iff no per-file errors
    pub fn exit_code(&self) -> u8 {
        if self.summary.errors == 0 {
            0
        } else {
            1
        }
    }
}

/// Progress callback for import operations
pub type ProgressCallback = Box<dyn Fn(&ImportSummary, &str) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_type_parse() {
        assert_eq!("auto".parse::<ForceType>().unwrap(), ForceType::Auto);
        assert_eq!("Image".parse::<ForceType>().unwrap(), ForceType::Image);
        assert_eq!("audio".parse::<ForceType>().unwrap(), ForceType::Music);
        assert!("document".parse::<ForceType>().is_err());
    }

    #[test]
    fn test_action_serialization() {
        assert_eq!(
            serde_json::to_string(&ImportAction::Referenced).unwrap(),
            "\"referenced\""
        );
        assert_eq!(
            serde_json::to_string(&ImportAction::DryRun).unwrap(),
            "\"dry-run (would copy)\""
        );
    }

    #[test]
    fn test_report_omits_resources_fields_when_unset() {
        let report = ImportReport {
            success: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("resourcesUpdated").is_none());
        assert!(json.get("resourcesError").is_none());
        assert_eq!(json["summary"]["total"], 0);
    }

    #[test]
    fn test_record_uses_camel_case_and_nulls() {
        let record = ImportRecord {
            original_path: "/tmp/a.png".to_string(),
            imported_path: "/proj/imports/images/a.png".to_string(),
            relative_path: "imports/images/a.png".to_string(),
            content_type: ContentType::Image,
            file_size: 3,
            filename: "a.png".to_string(),
            already_in_project: false,
            action: ImportAction::Copied,
            scene_id: None,
            label: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["contentType"], "image");
        assert_eq!(json["alreadyInProject"], false);
        assert!(json["sceneId"].is_null());
    }
}
