//! Error types for the phantom command line

use phantom_processor::Platform;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("No source roots given, pass at least one --source <DIR>")]
    NoSources,

    #[error("Output path {0} exists and is not a directory")]
    OutputNotADirectory(PathBuf),

    #[error("{platform} generation failed")]
    PassFailed {
        platform: Platform,
        #[source]
        source: phantom_processor::ProcessorError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use phantom_processor::ProcessorError;

    #[test]
    fn test_pass_failed_display() {
        let err = CliError::PassFailed {
            platform: Platform::Forge,
            source: ProcessorError::InvalidDeclarations(2),
        };
        assert_eq!(err.to_string(), "Forge generation failed");
        assert!(std::error::Error::source(&err).is_some());
    }
}
