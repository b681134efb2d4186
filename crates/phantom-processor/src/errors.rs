use crate::binding::BindingError;
use crate::element::SourceLocation;
use phantom_config::ConfigError;
use phantom_manifest::ManifestError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors of a generation pass
#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{}{source}", location_prefix(.location))]
    Binding {
        location: Option<SourceLocation>,
        #[source]
        source: BindingError,
    },

    #[error("{0} declaration error(s) reported, nothing was generated")]
    InvalidDeclarations(usize),

    #[error("Discovery round received after the final round")]
    RoundAfterFinal,

    #[error("The final round already ran")]
    FinalTwice,

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn location_prefix(location: &Option<SourceLocation>) -> String {
    location
        .as_ref()
        .map(|l| format!("{l}: "))
        .unwrap_or_default()
}
