//! Size-based rotation of report files.
//!
//! A report stream `stem.ext` continues in `stem_1.ext`, `stem_2.ext`, ...
//! once the file in use reaches its size ceiling. The file in use is the
//! highest-numbered sibling, or `stem.ext` when none exists yet.

use crate::error::{HubeauError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// Suffix number of `name` if it reads `stem_<n>.ext`.
fn rotation_number(name: &str, stem: &str, ext: &str) -> Option<u32> {
    let rest = name.strip_prefix(stem)?.strip_prefix('_')?;
    let digits = rest.strip_suffix(ext)?.strip_suffix('.')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Highest rotation number among the siblings of `stem.ext` in `dir`.
fn highest_rotation(dir: &Path, stem: &str, ext: &str) -> Result<Option<u32>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(HubeauError::Io(dir.to_path_buf(), e)),
    };

    let mut highest = None;
    for entry in entries {
        let entry = entry.map_err(|e| HubeauError::Io(dir.to_path_buf(), e))?;
        let name = entry.file_name();
        if let Some(n) = name.to_str().and_then(|n| rotation_number(n, stem, ext)) {
            highest = highest.max(Some(n));
        }
    }
    Ok(highest)
}

fn numbered(dir: &Path, stem: &str, ext: &str, n: Option<u32>) -> PathBuf {
    match n {
        Some(n) => dir.join(format!("{stem}_{n}.{ext}")),
        None => dir.join(format!("{stem}.{ext}")),
    }
}

/// The file the next write of the `stem.ext` stream goes to.
///
/// A file of exactly `max_size` bytes is full.
pub fn rotation_target(dir: &Path, stem: &str, ext: &str, max_size: u64) -> Result<PathBuf> {
    let highest = highest_rotation(dir, stem, ext)?;
    let current = numbered(dir, stem, ext, highest);

    let size = match fs::metadata(&current) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(current),
        Err(e) => return Err(HubeauError::Io(current, e)),
    };

    if size < max_size {
        return Ok(current);
    }

    let next = numbered(dir, stem, ext, Some(highest.unwrap_or(0) + 1));
    info!(
        full = %current.display(),
        size,
        max_size,
        next = %next.display(),
        "Rotating report file"
    );
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str, len: usize) {
        fs::write(dir.join(name), vec![b'x'; len]).unwrap();
    }

    #[test]
    fn test_rotation_number() {
        assert_eq!(rotation_number("tsa_analysis_3.json", "tsa_analysis", "json"), Some(3));
        assert_eq!(rotation_number("tsa_analysis.json", "tsa_analysis", "json"), None);
        assert_eq!(rotation_number("tsa_analysis_3.csv", "tsa_analysis", "json"), None);
        assert_eq!(rotation_number("tsa_analysis_x.json", "tsa_analysis", "json"), None);
        assert_eq!(rotation_number("other_7.json", "tsa_analysis", "json"), None);
    }

    #[test]
    fn test_missing_dir_targets_base_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        let target = rotation_target(&missing, "tsa_analysis", "json", 10).unwrap();
        assert_eq!(target, missing.join("tsa_analysis.json"));
    }

    #[test]
    fn test_below_ceiling_keeps_current_file() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "tsa_analysis.csv", 9);

        let target = rotation_target(dir.path(), "tsa_analysis", "csv", 10).unwrap();
        assert_eq!(target, dir.path().join("tsa_analysis.csv"));
    }

    #[test]
    fn test_at_ceiling_rotates_to_first_number() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "tsa_analysis.csv", 10);

        let target = rotation_target(dir.path(), "tsa_analysis", "csv", 10).unwrap();
        assert_eq!(target, dir.path().join("tsa_analysis_1.csv"));
    }

    #[test]
    fn test_rotation_continues_from_highest_sibling() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "tsa_analysis.json", 50);
        touch(dir.path(), "tsa_analysis_1.json", 50);
        touch(dir.path(), "tsa_analysis_2.json", 3);
        touch(dir.path(), "tsa_analysis_9.csv", 50);

        let target = rotation_target(dir.path(), "tsa_analysis", "json", 10).unwrap();
        assert_eq!(target, dir.path().join("tsa_analysis_2.json"));

        touch(dir.path(), "tsa_analysis_2.json", 10);
        let target = rotation_target(dir.path(), "tsa_analysis", "json", 10).unwrap();
        assert_eq!(target, dir.path().join("tsa_analysis_3.json"));
    }
}
