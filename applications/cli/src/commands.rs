//! Command runners behind the `clipkit` subcommands
//!
//! Each runner returns a serializable value; `main.rs` prints it as JSON.

use crate::config::CliConfig;
use crate::error::Result;
use clipkit_importer::classifier::{classify, mime_type};
use clipkit_importer::scanner::FileScanner;
use clipkit_importer::{
    AssetImporter, ContentType, ForceType, ImportOptions, ImportReport, RenameContext,
    RenameResult,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Arguments of `clipkit import`
#[derive(Debug, Clone)]
pub struct ImportArgs {
    pub project_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub force_type: ForceType,
    pub scene_id: Option<String>,
    pub label: Option<String>,
    pub update_manifest: bool,
    pub dry_run: bool,
    pub verify: bool,
}

/// One line of `clipkit classify` output
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedFile {
    pub file: String,
    pub content_type: ContentType,
    pub folder: String,
    pub ext: String,
    pub supported: bool,
    pub mime_type: &'static str,
}

/// One line of `clipkit rename` output
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenamePreview {
    pub file: String,
    pub folder: String,
    #[serde(flatten)]
    pub result: RenameResult,
}

/// Run an import with CLI flags layered over configuration
pub fn run_import(config: &CliConfig, args: ImportArgs) -> Result<ImportReport> {
    let options = ImportOptions {
        force_type: args.force_type,
        scene_id: args.scene_id,
        label: args.label,
        update_manifest: args.update_manifest || config.import.update_manifest,
        dry_run: args.dry_run,
    };
    debug!("Import options: {:?}", options);

    let importer = AssetImporter::new(args.project_dir)
        .with_renamer(config.renamer())
        .with_verification(args.verify || config.import.verify_copy);

    Ok(importer.import(&args.files, &options)?)
}

/// Classify files without touching them
pub fn classify_files(files: &[PathBuf], force_type: ForceType) -> Vec<ClassifiedFile> {
    files
        .iter()
        .map(|file| {
            let classification = classify(file, force_type);
            ClassifiedFile {
                file: file.display().to_string(),
                content_type: classification.content_type,
                folder: classification.folder,
                ext: classification.ext,
                supported: classification.supported,
                mime_type: mime_type(file),
            }
        })
        .collect()
}

/// Preview the names an import would give `files`
///
/// Collisions are resolved within the batch, per target folder, the same way an
/// import run does.
pub fn preview_renames(
    config: &CliConfig,
    files: &[PathBuf],
    force_type: ForceType,
    context: &RenameContext,
) -> Vec<RenamePreview> {
    let renamer = config.renamer();
    let mut used: HashMap<String, HashSet<String>> = HashMap::new();

    files
        .iter()
        .map(|file| {
            let folder = classify(file, force_type).folder;
            let mut result = renamer.rename(file, context);
            let names = used.entry(folder.clone()).or_default();
            result.filename = renamer.unique_filename(&result.filename, names);
            names.insert(result.filename.clone());

            RenamePreview {
                file: file.display().to_string(),
                folder,
                result,
            }
        })
        .collect()
}

/// List importable files under a directory
pub fn scan_directory(
    dir: &Path,
    max_depth: Option<usize>,
    follow_links: bool,
) -> Result<Vec<ClassifiedFile>> {
    let mut scanner = FileScanner::new().follow_links(follow_links);
    if let Some(depth) = max_depth {
        scanner = scanner.max_depth(depth);
    }

    let files = scanner.scan_directory(dir)?;
    Ok(classify_files(&files, ForceType::Auto))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_classify_files() {
        let files = vec![PathBuf::from("a.mp4"), PathBuf::from("b.txt")];
        let classified = classify_files(&files, ForceType::Auto);

        assert_eq!(classified[0].content_type, ContentType::Video);
        assert_eq!(classified[0].mime_type, "video/mp4");
        assert!(!classified[1].supported);
        assert_eq!(classified[1].mime_type, "application/octet-stream");
    }

    #[test]
    fn test_preview_renames_resolves_batch_collisions() {
        let files = vec![
            PathBuf::from("/a/logo.png"),
            PathBuf::from("/b/logo.png"),
            PathBuf::from("/c/logo.mp4"),
        ];
        let previews = preview_renames(
            &CliConfig::default(),
            &files,
            ForceType::Auto,
            &RenameContext::default(),
        );

        assert_eq!(previews[0].result.filename, "import_logo.png");
        assert_eq!(previews[1].result.filename, "import_logo-2.png");
        assert_eq!(previews[2].result.filename, "import_logo.mp4");
        assert_eq!(previews[2].folder, "videos");
    }

    #[test]
    fn test_run_import_applies_config() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("proj");
        fs::create_dir_all(&project).unwrap();
        let file = temp.path().join("take one.mp4");
        fs::write(&file, b"frames").unwrap();

        let mut config = CliConfig::default();
        config.renamer.prefix = "broll".to_string();
        config.import.update_manifest = true;

        let report = run_import(
            &config,
            ImportArgs {
                project_dir: project.clone(),
                files: vec![file],
                force_type: ForceType::Auto,
                scene_id: None,
                label: None,
                update_manifest: false,
                dry_run: false,
                verify: false,
            },
        )
        .unwrap();

        assert!(report.success);
        assert_eq!(report.imported[0].filename, "broll_take-one.mp4");
        assert_eq!(report.resources_updated, Some(true));
        assert!(project.join("resources.json").exists());
    }

    #[test]
    fn test_scan_directory_classifies_results() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.png"), b"png").unwrap();
        fs::write(temp.path().join("b.doc"), b"doc").unwrap();

        let found = scan_directory(temp.path(), None, false).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].content_type, ContentType::Image);
    }
}
