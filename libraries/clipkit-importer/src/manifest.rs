//! Project manifest (`resources.json`) handling
//!
//! The manifest may be shared with other tooling, so it is kept as a generic JSON
//! object: only `imports` and `summary.totalImported` are touched and every other
//! key survives a read-modify-write cycle unchanged.

use crate::types::ImportRecord;
use crate::{ImportError, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Manifest filename inside a project directory
pub const MANIFEST_FILE: &str = "resources.json";

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 6;

/// One appended manifest record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub id: String,
    pub imported_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: ImportRecord,
}

impl ManifestEntry {
    pub fn new(record: ImportRecord) -> Self {
        Self {
            id: generate_entry_id(),
            imported_at: Utc::now(),
            record,
        }
    }
}

/// Generate a fresh entry id: `imp_<unix millis>_<random base36>`
pub fn generate_entry_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("imp_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// In-memory view of a project's `resources.json`
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    root: Map<String, Value>,
}

impl Manifest {
    /// Path of the manifest for a project directory
    pub fn path_for(project_dir: &Path) -> PathBuf {
        project_dir.join(MANIFEST_FILE)
    }

    /// Read the manifest, or start an empty one if the file does not exist
    pub fn load_or_default(project_dir: &Path) -> Result<Self> {
        let path = Self::path_for(project_dir);

        if !path.exists() {
            debug!("No manifest at {}, starting empty", path.display());
            return Ok(Self {
                path,
                root: Map::new(),
            });
        }

        let contents = fs::read_to_string(&path)?;
        let root = match serde_json::from_str::<Value>(&contents)? {
            Value::Object(map) => map,
            _ => {
                return Err(ImportError::Manifest(format!(
                    "{} must contain a JSON object",
                    path.display()
                )))
            }
        };

        if let Some(imports) = root.get("imports") {
            if !imports.is_array() {
                return Err(ImportError::Manifest(
                    "\"imports\" must be an array".to_string(),
                ));
            }
        }
        if let Some(summary) = root.get("summary") {
            if !summary.is_object() {
                return Err(ImportError::Manifest(
                    "\"summary\" must be an object".to_string(),
                ));
            }
        }

        Ok(Self { path, root })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The raw manifest object
    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Number of entries in the `imports` array
    pub fn imports_len(&self) -> usize {
        self.root
            .get("imports")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Current `summary.totalImported`, if present
    pub fn total_imported(&self) -> Option<u64> {
        self.root
            .get("summary")
            .and_then(|s| s.get("totalImported"))
            .and_then(Value::as_u64)
    }

    /// Append one entry per record and refresh `summary.totalImported`
    ///
    /// Returns the new length of the `imports` array.
    pub fn append(&mut self, records: &[ImportRecord]) -> Result<usize> {
        if self.root.get("summary").is_some_and(|s| !s.is_object()) {
            return Err(ImportError::Manifest(
                "\"summary\" must be an object".to_string(),
            ));
        }

        let imports = self
            .root
            .entry("imports")
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .ok_or_else(|| ImportError::Manifest("\"imports\" must be an array".to_string()))?;

        for record in records {
            imports.push(serde_json::to_value(ManifestEntry::new(record.clone()))?);
        }
        let total = imports.len();

        if let Value::Object(summary) = self
            .root
            .entry("summary")
            .or_insert_with(|| Value::Object(Map::new()))
        {
            summary.insert("totalImported".to_string(), Value::from(total));
        }

        Ok(total)
    }

    /// Write the manifest back atomically (temp file in the same directory, then rename)
    pub fn save(&self) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| ImportError::InvalidPath(self.path.display().to_string()))?;

        let mut contents = serde_json::to_string_pretty(&self.root)?;
        contents.push('\n');

        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(contents.as_bytes())?;
        if let Some(permissions) = self.target_permissions()? {
            temp.as_file().set_permissions(permissions)?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path)?;

        debug!("Manifest written: {}", self.path.display());
        Ok(())
    }

    /// Mode the rewritten file should carry: the current file's, or 0644 for a new one
    fn target_permissions(&self) -> Result<Option<fs::Permissions>> {
        match fs::metadata(&self.path) {
            Ok(metadata) => Ok(Some(metadata.permissions())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(new_file_permissions()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(unix)]
#[allow(clippy::unnecessary_wraps)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

// Temp files are not owner-only outside unix
#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

/// Load, append and save in one step; returns the new `imports` length
pub fn append_records(project_dir: &Path, records: &[ImportRecord]) -> Result<usize> {
    let mut manifest = Manifest::load_or_default(project_dir)?;
    let total = manifest.append(records)?;
    manifest.save()?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentType, ImportAction};
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn record(name: &str) -> ImportRecord {
        ImportRecord {
            original_path: format!("/tmp/{}", name),
            imported_path: format!("/proj/imports/images/{}", name),
            relative_path: format!("imports/images/{}", name),
            content_type: ContentType::Image,
            file_size: 10,
            filename: name.to_string(),
            already_in_project: false,
            action: ImportAction::Copied,
            scene_id: Some("s1".to_string()),
            label: None,
        }
    }

    #[test]
    fn test_generate_entry_id_format() {
        let id = generate_entry_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "imp");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), ID_SUFFIX_LEN);
    }

    #[test]
    fn test_entry_ids_are_fresh() {
        let ids: HashSet<String> = (0..200).map(|_| generate_entry_id()).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_load_missing_manifest_is_empty() {
        let temp = TempDir::new().unwrap();
        let manifest = Manifest::load_or_default(temp.path()).unwrap();
        assert_eq!(manifest.imports_len(), 0);
        assert!(manifest.total_imported().is_none());
        assert!(!manifest.path().exists());
    }

    #[test]
    fn test_append_and_save() {
        let temp = TempDir::new().unwrap();
        let total = append_records(temp.path(), &[record("a.png"), record("b.png")]).unwrap();
        assert_eq!(total, 2);

        let manifest = Manifest::load_or_default(temp.path()).unwrap();
        assert_eq!(manifest.imports_len(), 2);
        assert_eq!(manifest.total_imported(), Some(2));

        let first = &manifest.root()["imports"][0];
        assert_eq!(first["filename"], "a.png");
        assert_eq!(first["sceneId"], "s1");
        assert!(first["id"].as_str().unwrap().starts_with("imp_"));
        assert!(first["importedAt"].is_string());
    }

    #[test]
    fn test_unknown_keys_are_preserved() {
        let temp = TempDir::new().unwrap();
        let path = Manifest::path_for(temp.path());
        fs::write(
            &path,
            r#"{"videos": [{"id": "v1"}], "imports": [{"id": "old"}], "summary": {"totalVideos": 1}}"#,
        )
        .unwrap();

        append_records(temp.path(), &[record("c.png")]).unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["videos"][0]["id"], "v1");
        assert_eq!(value["imports"].as_array().unwrap().len(), 2);
        assert_eq!(value["imports"][0]["id"], "old");
        assert_eq!(value["summary"]["totalVideos"], 1);
        assert_eq!(value["summary"]["totalImported"], 2);
    }

    #[test]
    fn test_invalid_manifest_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = Manifest::path_for(temp.path());

        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            Manifest::load_or_default(temp.path()),
            Err(ImportError::Serialization(_))
        ));

        fs::write(&path, r#"{"imports": {}}"#).unwrap();
        assert!(matches!(
            Manifest::load_or_default(temp.path()),
            Err(ImportError::Manifest(_))
        ));

        fs::write(&path, "[]").unwrap();
        assert!(matches!(
            Manifest::load_or_default(temp.path()),
            Err(ImportError::Manifest(_))
        ));
    }

    #[test]
    fn test_non_object_summary_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = Manifest::path_for(temp.path());
        let original = r#"{"imports": [], "summary": "3 clips"}"#;
        fs::write(&path, original).unwrap();

        assert!(matches!(
            append_records(temp.path(), &[record("d.png")]),
            Err(ImportError::Manifest(_))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_append_keeps_non_object_summary_in_memory_untouched() {
        let mut manifest = Manifest {
            path: PathBuf::from("/unused/resources.json"),
            root: serde_json::from_str(r#"{"summary": [1, 2]}"#).unwrap(),
        };

        assert!(matches!(
            manifest.append(&[record("e.png")]),
            Err(ImportError::Manifest(_))
        ));
        assert_eq!(manifest.imports_len(), 0);
        assert_eq!(manifest.root()["summary"], serde_json::json!([1, 2]));
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = Manifest::path_for(temp.path());
        fs::write(&path, r#"{"imports": []}"#).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o664)).unwrap();

        append_records(temp.path(), &[record("f.png")]).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o664);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_manifest_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        append_records(temp.path(), &[]).unwrap();

        let path = Manifest::path_for(temp.path());
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }
}
