//! Source root traversal

use crate::errors::ScanError;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Every `.java` file below `root`, in path order
///
/// Entries that cannot be read are reported in `warnings` and skipped; only
/// a missing or unreadable root fails.
pub(crate) fn java_files(
    root: &Path,
    warnings: &mut Vec<String>,
) -> Result<Vec<PathBuf>, ScanError> {
    if !root.exists() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(ScanError::Walk {
                    root: root.to_path_buf(),
                    source: err,
                });
            }
            Err(err) => {
                warnings.push(format!("Skipping unreadable entry: {err}"));
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().and_then(|s| s.to_str()) == Some("java")
        {
            files.push(path.to_path_buf());
        }
    }
    debug!("Found {} Java files under {}", files.len(), root.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collects_java_files_in_order() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        fs::create_dir_all(temp.path().join("b/c"))?;
        fs::write(temp.path().join("b/c/Z.java"), "class Z {}")?;
        fs::write(temp.path().join("A.java"), "class A {}")?;
        fs::write(temp.path().join("notes.txt"), "")?;

        let mut warnings = Vec::new();
        let files = java_files(temp.path(), &mut warnings)?;
        assert_eq!(
            files,
            vec![temp.path().join("A.java"), temp.path().join("b/c/Z.java")]
        );
        assert!(warnings.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_root() {
        let mut warnings = Vec::new();
        let result = java_files(Path::new("/definitely/not/here"), &mut warnings);
        assert!(matches!(result, Err(ScanError::MissingRoot(_))));
    }
}
