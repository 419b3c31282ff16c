//! clipkit Asset Importer
//!
//! This crate handles importing local media files into a video project.
//!
//! # Features
//!
//! - Extension-based classification (video, image, music, sfx)
//! - Descriptive, collision-free renaming of imported files
//! - Copy into `imports/<folder>/` or reference files already in the project
//! - Append-only `resources.json` manifest with atomic writes
//! - Directory scanning for importable files
//!
//! # Architecture
//!
//! - `classifier`: Extension to content category and target folder
//! - `renamer`: Filename cleanup and collision resolution
//! - `paths`: Home expansion, lexical normalization, project containment
//! - `copy`: File copying with optional hash verification
//! - `manifest`: `resources.json` read-modify-write
//! - `scanner`: Filesystem scanning for supported files
//! - `importer`: Orchestration of the import process

mod error;
mod types;

// Core modules
pub mod classifier;
pub mod copy;
pub mod importer;
pub mod manifest;
pub mod paths;
pub mod renamer;
pub mod scanner;

pub use classifier::{classify, mime_type, supported_extensions, Classification};
pub use error::ImportError;
pub use importer::AssetImporter;
pub use renamer::{resolve_collision, RenameContext, RenameResult, SmartRenamer};
pub use types::*;

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, ImportError>;
