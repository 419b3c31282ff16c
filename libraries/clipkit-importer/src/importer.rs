//! Import orchestration
//!
//! Files are processed one at a time, in input order. Per-file problems end up in
//! the report's `errors` list and never abort the run; only invalid arguments
//! (empty file list, missing project directory) fail the whole import.

use crate::classifier::{classify, supported_extensions};
use crate::copy::{copy_if_absent, CopyOutcome};
use crate::manifest;
use crate::paths;
use crate::renamer::{RenameContext, SmartRenamer};
use crate::types::{
    ErrorRecord, ImportAction, ImportOptions, ImportRecord, ImportReport, ImportSummary,
    ProgressCallback, SkipRecord,
};
use crate::{ImportError, Result};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Folder inside the project that receives copied files
pub const IMPORTS_DIR: &str = "imports";

/// Outcome of processing one input path
#[derive(Debug)]
enum FileOutcome {
    Imported(ImportRecord),
    Skipped(SkipRecord),
}

/// Filenames handed out during one run, per target folder
type UsedNames = HashMap<String, HashSet<String>>;

/// Imports local files into a project directory
pub struct AssetImporter {
    project_dir: PathBuf,
    renamer: SmartRenamer,
    verify_copy: bool,
    working_dir: Option<PathBuf>,
    progress_callback: Option<ProgressCallback>,
}

impl AssetImporter {
    /// Create an importer for the given project directory
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            renamer: SmartRenamer::default(),
            verify_copy: false,
            working_dir: None,
            progress_callback: None,
        }
    }

    /// Set the renamer used for copied files
    pub fn with_renamer(mut self, renamer: SmartRenamer) -> Self {
        self.renamer = renamer;
        self
    }

    /// Set whether to verify copied files by content hash
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify_copy = verify;
        self
    }

    /// Resolve relative paths against `dir` instead of the process working directory
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set progress callback, invoked after each input path
    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Import `files` into the project
    pub fn import(&self, files: &[PathBuf], options: &ImportOptions) -> Result<ImportReport> {
        if files.is_empty() {
            return Err(ImportError::NoFiles);
        }

        let cwd = match &self.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        let project = paths::resolve(&self.project_dir, &cwd);
        if !project.is_dir() {
            return Err(ImportError::ProjectNotFound(project));
        }

        info!(
            "Importing {} file(s) into {}{}",
            files.len(),
            project.display(),
            if options.dry_run { " (dry run)" } else { "" }
        );

        let context = RenameContext::new(options.scene_id.clone(), options.label.clone());
        let mut used_names = UsedNames::new();
        let mut report = ImportReport {
            summary: ImportSummary {
                total: files.len(),
                ..Default::default()
            },
            ..Default::default()
        };

        for file in files {
            let source = paths::resolve(file, &cwd);
            let source_display = source.to_string_lossy().into_owned();

            match self.import_file(&source, &project, options, &context, &mut used_names) {
                Ok(FileOutcome::Imported(record)) => {
                    report.summary.imported += 1;
                    report.imported.push(record);
                }
                Ok(FileOutcome::Skipped(skip)) => {
                    debug!("Skipped {}: {}", skip.file, skip.reason);
                    report.summary.skipped += 1;
                    report.skipped.push(skip);
                }
                Err(e) => {
                    warn!("Failed to import {}: {}", source_display, e);
                    report.summary.errors += 1;
                    report.errors.push(ErrorRecord {
                        file: source_display.clone(),
                        error: e.to_string(),
                    });
                }
            }

            if let Some(ref callback) = self.progress_callback {
                callback(&report.summary, &source_display);
            }
        }

        if options.update_manifest && !options.dry_run && !report.imported.is_empty() {
            match manifest::append_records(&project, &report.imported) {
                Ok(total) => {
                    info!("Manifest updated: {} import record(s) total", total);
                    report.resources_updated = Some(true);
                }
                Err(e) => {
                    warn!("Failed to update manifest: {}", e);
                    report.resources_updated = Some(false);
                    report.resources_error = Some(e.to_string());
                }
            }
        }

        report.success = report.errors.is_empty();
        info!("{}", report.summary.summary_text());

        Ok(report)
    }

    /// Process a single resolved source path
    fn import_file(
        &self,
        source: &Path,
        project: &Path,
        options: &ImportOptions,
        context: &RenameContext,
        used_names: &mut UsedNames,
    ) -> Result<FileOutcome> {
        let source_str = source.to_string_lossy().into_owned();

        let metadata = match fs::metadata(source) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ImportError::FileNotFound(source_str))
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            return Err(ImportError::NotAFile(source_str));
        }

        let classification = classify(source, options.force_type);
        if !classification.supported {
            let reason = if classification.ext.is_empty() {
                "Unsupported file type: no extension".to_string()
            } else {
                format!("Unsupported file type: .{}", classification.ext)
            };
            return Ok(FileOutcome::Skipped(SkipRecord {
                file: source_str,
                reason,
                supported_extensions: supported_extensions()
                    .into_iter()
                    .map(String::from)
                    .collect(),
            }));
        }

        if paths::is_within(source, project) {
            info!("Referencing in place: {}", source.display());
            let filename = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            return Ok(FileOutcome::Imported(ImportRecord {
                original_path: source_str.clone(),
                imported_path: source_str,
                relative_path: paths::relative_to(source, project),
                content_type: classification.content_type,
                file_size: metadata.len(),
                filename,
                already_in_project: true,
                action: ImportAction::Referenced,
                scene_id: options.scene_id.clone(),
                label: options.label.clone(),
            }));
        }

        let renamed = self.renamer.rename(source, context);
        let used = used_names.entry(classification.folder.clone()).or_default();
        let filename = self.renamer.unique_filename(&renamed.filename, used);
        used.insert(filename.clone());

        let target = project
            .join(IMPORTS_DIR)
            .join(&classification.folder)
            .join(&filename);

        let (action, file_size) = if options.dry_run {
            debug!("Would copy {} -> {}", source.display(), target.display());
            (ImportAction::DryRun, metadata.len())
        } else {
            if copy_if_absent(source, &target, self.verify_copy)? == CopyOutcome::Copied {
                info!("Copied: {} -> {}", source.display(), target.display());
            }
            let copied = fs::metadata(&target)?;
            (ImportAction::Copied, copied.len())
        };

        Ok(FileOutcome::Imported(ImportRecord {
            original_path: source_str,
            imported_path: target.to_string_lossy().into_owned(),
            relative_path: paths::relative_to(&target, project),
            content_type: classification.content_type,
            file_size,
            filename,
            already_in_project: false,
            action,
            scene_id: options.scene_id.clone(),
            label: options.label.clone(),
        }))
    }
}
