use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Collects the Go files to process from the paths given on the command line.
pub struct ProjectLoader {
    exclude: HashSet<String>,
}

impl ProjectLoader {
    pub fn new(exclude: impl IntoIterator<Item = String>) -> Self {
        Self {
            exclude: exclude.into_iter().collect(),
        }
    }

    /// Files are taken as given, whatever their extension. Directories are
    /// walked for `*.go` files, skipping excluded directory names. The result
    /// is sorted with duplicates (by canonical path) removed.
    pub fn collect(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for path in paths {
            let metadata = fs::metadata(path).map_err(|e| Error::io("read", path, e))?;
            if metadata.is_dir() {
                self.collect_go_recursive(path, &mut files)?;
            } else {
                files.push(path.clone());
            }
        }

        let mut seen = HashSet::new();
        files.sort();
        files.retain(|file| {
            let key = fs::canonicalize(file).unwrap_or_else(|_| file.clone());
            seen.insert(key)
        });
        debug!(count = files.len(), "collected Go files");
        Ok(files)
    }

    fn is_excluded(&self, dir: &Path) -> bool {
        dir.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.exclude.contains(name))
    }

    fn collect_go_recursive(&self, dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        let entries = fs::read_dir(dir).map_err(|e| Error::io("list", dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::io("list", dir, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| Error::io("stat", &path, e))?;

            if file_type.is_dir() {
                if self.is_excluded(&path) {
                    debug!(path = %path.display(), "skipping excluded directory");
                    continue;
                }
                self.collect_go_recursive(&path, out)?;
            } else if file_type.is_file() {
                if path.extension().is_some_and(|ext| ext == "go") {
                    out.push(path);
                }
            } else {
                warn!(path = %path.display(), "skipping non-regular file");
            }
        }
        Ok(())
    }
}
