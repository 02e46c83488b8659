use crate::config::{self, TS_EXTENSION};
use crate::error::{CatalogError, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Finds translation source files under a set of paths
pub struct FileSearcher {
    exclusions: Vec<String>,
}

impl Default for FileSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSearcher {
    pub fn new() -> Self {
        Self {
            exclusions: Vec::new(),
        }
    }

    /// Start with the default exclusions for the project found at `base_dir`
    pub fn for_project(base_dir: &Path) -> Self {
        let project_type = config::detect_project_type(base_dir);
        let exclusions = config::get_default_exclusions(project_type)
            .iter()
            .map(|&s| s.to_string())
            .collect();
        Self { exclusions }
    }

    pub fn add_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclusions.extend(exclusions);
        self
    }

    /// Expand `paths` into `.ts` files. Files are taken as given; directories
    /// are walked recursively. Output is sorted and deduplicated.
    pub fn collect(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for path in paths {
            if path.is_file() {
                files.push(path.clone());
                continue;
            }
            if !path.is_dir() {
                return Err(CatalogError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{} does not exist", path.display()),
                )));
            }

            let before = files.len();
            let walker = WalkDir::new(path).follow_links(false).into_iter();
            for entry in walker
                .filter_entry(|e| {
                    // The root itself is never excluded
                    if e.depth() == 0 {
                        return true;
                    }
                    let name = e.file_name().to_string_lossy();
                    !self.exclusions.iter().any(|excl| name == excl.as_str())
                })
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                // TypeScript shares the extension
                if is_translation_file(entry.path()) && looks_like_catalog(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            debug!(
                dir = %path.display(),
                found = files.len() - before,
                "walked directory for translation files"
            );
        }

        files.sort();
        files.dedup();
        Ok(files)
    }
}

pub fn is_translation_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TS_EXTENSION))
}

/// Sniff the head of the file for the `<TS` root element
fn looks_like_catalog(path: &Path) -> bool {
    let mut head = [0u8; 512];
    let read = File::open(path)
        .and_then(|mut f| f.read(&mut head))
        .unwrap_or(0);
    String::from_utf8_lossy(&head[..read]).contains("<TS")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_walks_directories() {
        let dir = TempDir::new().unwrap();
        let i18n = dir.path().join("app/resource/i18n");
        fs::create_dir_all(&i18n).unwrap();
        fs::write(i18n.join("app.zh_CN.ts"), "<TS/>").unwrap();
        fs::write(i18n.join("app.zh_CN.qm"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("index.ts"), "export const x = 1;").unwrap();

        let files = FileSearcher::new()
            .collect(&[dir.path().to_path_buf()])
            .unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("app.zh_CN.ts"));
    }

    #[test]
    fn test_collect_honors_exclusions() {
        let dir = TempDir::new().unwrap();
        let venv = dir.path().join(".venv/lib");
        fs::create_dir_all(&venv).unwrap();
        fs::write(venv.join("qt_de.ts"), "<TS/>").unwrap();
        fs::write(dir.path().join("app_de.ts"), "<TS/>").unwrap();

        let files = FileSearcher::new()
            .add_exclusions(vec![".venv".to_string()])
            .collect(&[dir.path().to_path_buf()])
            .unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("app_de.ts"));
    }

    #[test]
    fn test_missing_path_is_error() {
        let dir = TempDir::new().unwrap();
        let result = FileSearcher::new().collect(&[dir.path().join("nope")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_is_translation_file() {
        assert!(is_translation_file(Path::new("Seraphine.zh_CN.ts")));
        assert!(!is_translation_file(Path::new("main.py")));
    }
}
