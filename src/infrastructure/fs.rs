//! File replacement.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Replace the contents of `path` in one step: the new text is written to a
/// temporary file next to it, synced, given the original permissions and then
/// renamed over the original. A failure at any point leaves the original
/// untouched.
pub fn replace_file(path: &Path, contents: &str) -> Result<()> {
    let target = fs::canonicalize(path).map_err(|e| Error::io("resolve", path, e))?;
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(&target)
        .map_err(|e| Error::io("stat", path, e))?
        .permissions();

    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| Error::io("create temp file for", path, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| Error::io("write", path, e))?;
    fs::set_permissions(tmp.path(), permissions)
        .map_err(|e| Error::io("set permissions on", path, e))?;
    tmp.persist(&target)
        .map_err(|e| Error::io("replace", path, e.error))?;
    Ok(())
}
