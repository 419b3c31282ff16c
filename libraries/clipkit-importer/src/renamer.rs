//! Descriptive, collision-free filenames for imported files
//!
//! Generated names have the shape `{prefix}_{scene}_{label}_{cleaned}.{ext}`:
//!
//! | Part | Source | Notes |
//! |------|--------|-------|
//! | `prefix` | Renamer setting | Default `import` |
//! | `scene` | Import context | Sanitized, omitted when absent |
//! | `label` | Import context | Sanitized, omitted when absent |
//! | `cleaned` | Original base name | Omitted when equal to the label |
//! | `ext` | Original extension | Lower-cased |
//!
//! Camera and device naming conventions (`IMG_1234`, `Screenshot ...`,
//! `Untitled`) are normalized before assembly.

use crate::classifier::extension_of;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Default filename prefix
pub const DEFAULT_PREFIX: &str = "import";

/// Default maximum length of a generated filename, extension included
pub const DEFAULT_MAX_LENGTH: usize = 120;

const CLEANED_NAME_MAX: usize = 60;
const SANITIZED_PART_MAX: usize = 40;
const FALLBACK_NAME: &str = "file";

static SEPARATOR_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s_]+").expect("valid separator regex"));
static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").expect("valid hyphen regex"));
static NON_ALNUM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid sanitize regex"));

/// A camera/device filename convention and its normalized form
struct DeviceRule {
    pattern: Regex,
    rewrite: fn(&Captures) -> String,
}

impl DeviceRule {
    fn new(pattern: &str, rewrite: fn(&Captures) -> String) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid device rule regex"),
            rewrite,
        }
    }
}

fn cap<'a>(caps: &'a Captures, index: usize) -> &'a str {
    caps.get(index).map_or("", |m| m.as_str())
}

/// Ordered device rules; the first match wins
static DEVICE_RULES: Lazy<Vec<DeviceRule>> = Lazy::new(|| {
    vec![
        DeviceRule::new(r"^img-?(\d+)(.*)$", |c| {
            format!("img-{}{}", cap(c, 1), cap(c, 2))
        }),
        DeviceRule::new(r"^dsc[nf]?-?(\d+)(.*)$", |c| {
            format!("dsc-{}{}", cap(c, 1), cap(c, 2))
        }),
        DeviceRule::new(r"^pxl-?(\d{8})-?(\d+)(.*)$", |c| {
            format!("pxl-{}-{}{}", cap(c, 1), cap(c, 2), cap(c, 3))
        }),
        DeviceRule::new(r"^vid-?(\d{8})-?(\d+)(.*)$", |c| {
            format!("vid-{}-{}{}", cap(c, 1), cap(c, 2), cap(c, 3))
        }),
        DeviceRule::new(r"^mvi-?(\d+)(.*)$", |c| {
            format!("mvi-{}{}", cap(c, 1), cap(c, 2))
        }),
        DeviceRule::new(r"^gopr-?(\d+)(.*)$", |c| {
            format!("gopro-{}{}", cap(c, 1), cap(c, 2))
        }),
        DeviceRule::new(r"^dji-?(\d+)(.*)$", |c| {
            format!("dji-{}{}", cap(c, 1), cap(c, 2))
        }),
        DeviceRule::new(r"^screen-?shot-?(.*)$", |c| {
            format!("screenshot-{}", cap(c, 1))
        }),
        DeviceRule::new(r"^screen-?recording-?(.*)$", |c| {
            format!("screen-recording-{}", cap(c, 1))
        }),
        DeviceRule::new(r"^whatsapp-?(image|video|audio)-?(.*)$", |c| {
            format!("whatsapp-{}-{}", cap(c, 1), cap(c, 2))
        }),
        DeviceRule::new(r"^untitled(?:-(\d+))?$", |c| {
            let n = cap(c, 1);
            format!("untitled-{}", if n.is_empty() { "1" } else { n })
        }),
    ]
});

/// Context woven into generated filenames
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameContext {
    pub scene_id: Option<String>,
    pub label: Option<String>,
}

impl RenameContext {
    pub fn new(scene_id: Option<String>, label: Option<String>) -> Self {
        Self { scene_id, label }
    }
}

/// The pieces a filename was assembled from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameParts {
    pub prefix: String,
    pub scene_id: Option<String>,
    pub label: Option<String>,
    pub cleaned_name: String,
    pub ext: String,
}

/// Result of renaming a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameResult {
    pub filename: String,
    pub parts: RenameParts,
}

/// Filename generator for imported assets
#[derive(Debug, Clone)]
pub struct SmartRenamer {
    /// First part of every generated name
    prefix: String,
    /// Maximum filename length including the extension
    max_length: usize,
}

impl Default for SmartRenamer {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl SmartRenamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filename prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the maximum filename length
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Build a descriptive filename for `original_path`
    ///
    /// The result depends only on the path, the context and the renamer settings.
    pub fn rename(&self, original_path: &Path, context: &RenameContext) -> RenameResult {
        let ext = extension_of(original_path);
        let base = original_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let cleaned_name = clean_name(&base);
        let scene_id = context
            .scene_id
            .as_deref()
            .map(sanitize)
            .filter(|s| !s.is_empty());
        let label = context
            .label
            .as_deref()
            .map(sanitize)
            .filter(|s| !s.is_empty());

        let mut parts: Vec<&str> = vec![self.prefix.as_str()];
        if let Some(scene) = &scene_id {
            parts.push(scene);
        }
        if let Some(label) = &label {
            parts.push(label);
        }
        if label.as_deref() != Some(cleaned_name.as_str()) {
            parts.push(&cleaned_name);
        }

        let name = parts.join("_");
        let filename = fit_length(&name, &ext, self.max_length);

        RenameResult {
            filename,
            parts: RenameParts {
                prefix: self.prefix.clone(),
                scene_id,
                label,
                cleaned_name,
                ext,
            },
        }
    }

    /// Like [`resolve_collision`], but shortens the stem so `stem-N.ext` stays
    /// within `max_length`
    pub fn unique_filename(&self, filename: &str, existing: &HashSet<String>) -> String {
        if !existing.contains(filename) {
            return filename.to_string();
        }

        let (stem, ext) = match filename.rfind('.') {
            Some(idx) if idx > 0 => (&filename[..idx], &filename[idx + 1..]),
            _ => (filename, ""),
        };

        (2..)
            .map(|counter| {
                let suffix = format!("-{}", counter);
                let fitted = fit_length(stem, ext, self.max_length.saturating_sub(suffix.len()));
                let stem_len = if ext.is_empty() {
                    fitted.len()
                } else {
                    fitted.len() - ext.len() - 1
                };
                format!("{}{}{}", &fitted[..stem_len], suffix, &fitted[stem_len..])
            })
            .find(|candidate| !existing.contains(candidate))
            .unwrap_or_else(|| filename.to_string())
    }
}

/// Join name and extension, truncating the name so the whole fits in `max_length`
fn fit_length(name: &str, ext: &str, max_length: usize) -> String {
    let ext_len = if ext.is_empty() {
        0
    } else {
        ext.chars().count() + 1
    };

    let name = if name.chars().count() + ext_len > max_length {
        let budget = max_length.saturating_sub(ext_len).max(1);
        let truncated: String = name.chars().take(budget).collect();
        let trimmed = truncated.trim_end_matches(['-', '_']);
        if trimmed.is_empty() {
            truncated
        } else {
            trimmed.to_string()
        }
    } else {
        name.to_string()
    };

    if ext.is_empty() {
        name
    } else {
        format!("{}.{}", name, ext)
    }
}

/// Normalize a raw base name into a lower-case, hyphenated slug
pub fn clean_name(base: &str) -> String {
    // Strip diacritics: decompose and drop combining marks
    let folded: String = base.nfd().filter(|c| !is_combining_mark(*c)).collect();

    let hyphenated = SEPARATOR_RUN.replace_all(&folded, "-");
    let filtered: String = hyphenated
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | '<' | '>'))
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    let collapsed = HYPHEN_RUN.replace_all(&filtered, "-");
    let mut cleaned = collapsed.trim_matches('-').to_lowercase();

    if let Some(rule) = DEVICE_RULES.iter().find(|r| r.pattern.is_match(&cleaned)) {
        if let Some(caps) = rule.pattern.captures(&cleaned) {
            cleaned = (rule.rewrite)(&caps);
        }
    }

    let cleaned = cleaned.trim_matches('-');
    let truncated: String = cleaned.chars().take(CLEANED_NAME_MAX).collect();
    let truncated = truncated.trim_end_matches('-');

    if truncated.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        truncated.to_string()
    }
}

/// Reduce a free-text value (scene id, label) to a short filename-safe slug
pub fn sanitize(value: &str) -> String {
    let lower = value.to_lowercase();
    let slug = NON_ALNUM_RUN.replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    let truncated: String = slug.chars().take(SANITIZED_PART_MAX).collect();
    truncated.trim_end_matches('-').to_string()
}

/// Resolve a filename conflict by appending a counter
///
/// "clip.mp4" -> "clip-2.mp4" -> "clip-3.mp4" etc. The caller records the returned
/// name in `existing` before the next call.
pub fn resolve_collision(filename: &str, existing: &HashSet<String>) -> String {
    if !existing.contains(filename) {
        return filename.to_string();
    }

    let (stem, extension) = match filename.rfind('.') {
        Some(idx) if idx > 0 => (&filename[..idx], &filename[idx..]),
        _ => (filename, ""),
    };

    (2..)
        .map(|counter| format!("{}-{}{}", stem, counter, extension))
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or_else(|| filename.to_string())
}
