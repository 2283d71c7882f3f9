//! Ownership marker and writing of generated files.
//!
//! Files written by this tool start with a fixed header containing
//! [`MARKER`]. A file carrying the marker is system-owned and may be
//! replaced; a file without it was written by hand and its settings have to
//! be extracted before it is overwritten.
//!
//! # Limitation
//!
//! Ownership is a substring check. A hand edit that keeps the marker line is
//! still treated as system-owned and will be overwritten on the next dump.

use std::io;
use std::path::{Path, PathBuf};

/// Comment text identifying a system-owned file.
pub const MARKER: &str = "Auto generated by typo3-config-handling";

/// Returns the header every generated PHP file starts with.
#[must_use]
pub fn header() -> String {
    format!("<?php\n// {MARKER}\n// Do not edit this file\n")
}

/// Returns `true` if the file at `path` exists and contains the marker.
///
/// A missing or unreadable file is not system-owned.
#[must_use]
pub fn is_auto_generated(path: &Path) -> bool {
    std::fs::read(path).is_ok_and(|content| {
        content
            .windows(MARKER.len())
            .any(|window| window == MARKER.as_bytes())
    })
}

/// Replaces the file at `path` with `contents`.
///
/// Writes to `{path}.tmp` first and renames it into place, so readers see
/// either the old or the new file. Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the directory, the temporary file or the rename
/// fails.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // LocalConfiguration.php -> LocalConfiguration.php.tmp
    let temp_path = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&temp_path, contents)?;
    std::fs::rename(&temp_path, path)
}

#[cfg(test)]
#[path = "generated_tests.rs"]
mod tests;
