use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop a scan outright
///
/// Problems with a single file are not errors; they are collected as
/// warnings in the [`ScanReport`](crate::ScanReport) and the file is skipped.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Source root {0} does not exist")]
    MissingRoot(PathBuf),

    #[error("Source root {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("Failed to walk {root}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}
