use crate::error::RecordError;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Resolves paths from command lines to canonical absolute form.
///
/// Relative paths are resolved against the base directory the normalizer was
/// built with. Symlinks are resolved for every prefix that exists; the
/// remainder of a path that does not exist (yet) is collapsed lexically.
#[derive(Debug, Clone)]
pub struct PathNormalizer {
    base_dir: PathBuf,
}

impl PathNormalizer {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let base_dir = base_dir.canonicalize().unwrap_or(base_dir);
        Self { base_dir }
    }

    pub fn from_current_dir() -> io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Normalizes one path value, keeping an enclosing quote pair.
    pub fn normalize(&self, value: &str) -> Result<String, RecordError> {
        let (inner, quoted) = unquote(value.trim());
        if inner.trim().is_empty() {
            return Err(RecordError::Normalize {
                path: value.to_string(),
                message: "empty path".to_string(),
            });
        }

        let resolved = self.resolve(Path::new(inner));
        let resolved = display_path(&resolved);

        Ok(if quoted {
            format!("\"{}\"", resolved)
        } else {
            resolved
        })
    }

    pub fn normalize_all<S: AsRef<str>>(&self, values: &[S]) -> Result<Vec<String>, RecordError> {
        values.iter().map(|v| self.normalize(v.as_ref())).collect()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        };

        let mut resolved = PathBuf::new();
        let mut exists = true;

        for component in absolute.components() {
            match component {
                Component::Prefix(_) | Component::RootDir => resolved.push(component),
                Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                    if !exists {
                        exists = resolved.exists();
                    }
                }
                Component::Normal(name) => {
                    resolved.push(name);
                    if exists {
                        match resolved.canonicalize() {
                            Ok(canonical) => resolved = canonical,
                            Err(_) => exists = false,
                        }
                    }
                }
            }
        }

        resolved
    }
}

/// Strips an enclosing quote pair. A missing closing quote is tolerated.
pub fn unquote(value: &str) -> (&str, bool) {
    match value.strip_prefix('"') {
        Some(rest) => (rest.strip_suffix('"').unwrap_or(rest), true),
        None => (value, false),
    }
}

#[cfg(windows)]
fn display_path(path: &Path) -> String {
    let text = path.to_string_lossy();
    match text.strip_prefix(r"\\?\") {
        Some(rest) if !rest.starts_with("UNC\\") => rest.to_string(),
        _ => text.into_owned(),
    }
}

#[cfg(not(windows))]
fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathNormalizer) {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("src/inc")).unwrap();
        let normalizer = PathNormalizer::new(temp.path());
        (temp, normalizer)
    }

    #[test]
    fn test_relative_path_resolved_against_base() {
        let (_temp, normalizer) = setup();
        let normalized = normalizer.normalize("src/./inc/../inc").unwrap();
        assert_eq!(
            PathBuf::from(&normalized),
            normalizer.base_dir().join("src/inc")
        );
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let (_temp, normalizer) = setup();
        let normalized = normalizer.normalize("  src \n").unwrap();
        assert_eq!(PathBuf::from(normalized), normalizer.base_dir().join("src"));
    }

    #[test]
    fn test_quotes_preserved() {
        let (_temp, normalizer) = setup();
        let normalized = normalizer.normalize("\"src/inc\"").unwrap();
        let expected = format!("\"{}\"", normalizer.base_dir().join("src/inc").display());
        assert_eq!(normalized, expected);
    }

    #[test]
    fn test_idempotent() {
        let (_temp, normalizer) = setup();
        for input in ["src/inc", "\"src/../src\"", "missing/dir/../file.cpp", "/"] {
            let once = normalizer.normalize(input).unwrap();
            let twice = normalizer.normalize(&once).unwrap();
            assert_eq!(once, twice, "input {}", input);
        }
    }

    #[test]
    fn test_missing_tail_collapsed_lexically() {
        let (_temp, normalizer) = setup();
        let normalized = normalizer.normalize("src/new/./deep/../file.cpp").unwrap();
        assert_eq!(
            PathBuf::from(normalized),
            normalizer.base_dir().join("src/new/file.cpp")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_resolved() {
        let (temp, normalizer) = setup();
        std::os::unix::fs::symlink(temp.path().join("src/inc"), temp.path().join("link"))
            .unwrap();

        let normalized = normalizer.normalize("link/header.h").unwrap();
        assert_eq!(
            PathBuf::from(normalized),
            normalizer.base_dir().join("src/inc/header.h")
        );
    }

    #[test]
    fn test_empty_path_rejected() {
        let (_temp, normalizer) = setup();
        assert!(normalizer.normalize("  ").is_err());
        assert!(normalizer.normalize("\"\"").is_err());
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"a b\""), ("a b", true));
        assert_eq!(unquote("\"open"), ("open", true));
        assert_eq!(unquote("plain"), ("plain", false));
    }
}
