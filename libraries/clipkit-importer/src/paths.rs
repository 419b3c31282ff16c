//! Path resolution helpers
//!
//! Containment checks are lexical: `..` and `.` components are folded away, but
//! symbolic links are never followed.

use std::path::{Component, Path, PathBuf};

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match dirs::home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

/// Fold `.` and `..` components without touching the filesystem
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = match normalized.components().next_back() {
                    Some(Component::Normal(_)) => normalized.pop(),
                    // `..` at the root stays at the root
                    Some(Component::RootDir | Component::Prefix(_)) => true,
                    _ => false,
                };
                if !popped {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

/// Resolve a user-supplied path to an absolute, lexically normalized path
///
/// Relative paths are taken relative to `cwd`.
pub fn resolve(path: &Path, cwd: &Path) -> PathBuf {
    let expanded = expand_home(path);
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };
    normalize_lexically(&absolute)
}

/// Whether `path` is `root` itself or lies underneath it
///
/// Both paths are expected to be resolved already.
pub fn is_within(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

/// Display `path` relative to `root`, using `/` as separator
pub fn relative_to(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(
            normalize_lexically(Path::new("/proj/imports/../other/./a.png")),
            PathBuf::from("/proj/other/a.png")
        );
        assert_eq!(
            normalize_lexically(Path::new("/../../etc")),
            PathBuf::from("/etc")
        );
        assert_eq!(
            normalize_lexically(Path::new("a/../../b")),
            PathBuf::from("../b")
        );
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let cwd = Path::new("/work");
        assert_eq!(
            resolve(Path::new("clips/a.mp4"), cwd),
            PathBuf::from("/work/clips/a.mp4")
        );
        assert_eq!(
            resolve(Path::new("/tmp/./a.mp4"), cwd),
            PathBuf::from("/tmp/a.mp4")
        );
    }

    #[test]
    fn test_expand_home() {
        let expanded = expand_home(Path::new("~/Videos/a.mp4"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("Videos/a.mp4"));
        }
        assert_eq!(
            expand_home(Path::new("/abs/~/x")),
            PathBuf::from("/abs/~/x")
        );
        assert_eq!(
            expand_home(Path::new("~user/x")),
            PathBuf::from("~user/x")
        );
    }

    #[test]
    fn test_is_within_uses_component_boundaries() {
        let root = Path::new("/proj");
        assert!(is_within(Path::new("/proj"), root));
        assert!(is_within(Path::new("/proj/imports/a.png"), root));
        assert!(!is_within(Path::new("/project-b/a.png"), root));
        assert!(!is_within(Path::new("/tmp/a.png"), root));
    }

    #[test]
    fn test_escaping_path_is_not_within() {
        let root = Path::new("/proj");
        let escaped = resolve(Path::new("/proj/imports/../../tmp/a.png"), Path::new("/"));
        assert!(!is_within(&escaped, root));
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(
            relative_to(Path::new("/proj/imports/images/a.png"), Path::new("/proj")),
            "imports/images/a.png"
        );
        assert_eq!(relative_to(Path::new("/elsewhere/a"), Path::new("/proj")), "/elsewhere/a");
    }
}
