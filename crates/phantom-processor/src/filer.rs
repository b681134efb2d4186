//! Output of generated files
//!
//! Sources land under `java/<package path>/<Class>.java` and descriptors
//! under `resources/<relative path>`, both relative to the filer root.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Source,
    Resource,
}

/// A fully rendered output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub kind: ArtifactKind,
    /// Path below the kind's output directory
    pub relative_path: PathBuf,
    pub contents: String,
}

impl GeneratedArtifact {
    pub fn source(package: &str, class_name: &str, contents: String) -> Self {
        let mut relative_path: PathBuf = package.split('.').filter(|s| !s.is_empty()).collect();
        relative_path.push(format!("{class_name}.java"));
        GeneratedArtifact {
            kind: ArtifactKind::Source,
            relative_path,
            contents,
        }
    }

    pub fn resource(relative_path: &str, contents: String) -> Self {
        GeneratedArtifact {
            kind: ArtifactKind::Resource,
            relative_path: relative_path.split('/').collect(),
            contents,
        }
    }

    /// Path relative to the filer root
    pub fn output_path(&self) -> PathBuf {
        let dir = match self.kind {
            ArtifactKind::Source => "java",
            ArtifactKind::Resource => "resources",
        };
        Path::new(dir).join(&self.relative_path)
    }
}

/// Destination for generated files
pub trait Filer {
    /// Write one artifact, returning where it went
    fn write(&mut self, artifact: &GeneratedArtifact) -> io::Result<PathBuf>;

    /// Remove files this filer wrote, given the paths `write` returned
    fn discard(&mut self, written: &[PathBuf]) -> io::Result<()>;
}

/// Writes artifacts below a root directory
#[derive(Debug, Clone)]
pub struct FsFiler {
    root: PathBuf,
}

impl FsFiler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsFiler { root: root.into() }
    }
}

impl Filer for FsFiler {
    fn write(&mut self, artifact: &GeneratedArtifact) -> io::Result<PathBuf> {
        let path = self.root.join(artifact.output_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(artifact.contents.as_bytes())?;
        writer.flush()?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    fn discard(&mut self, written: &[PathBuf]) -> io::Result<()> {
        for path in written {
            match fs::remove_file(path) {
                Ok(()) => debug!("Removed {}", path.display()),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}

/// Keeps artifacts in memory, keyed by output path
#[derive(Debug, Clone, Default)]
pub struct MemoryFiler {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryFiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Filer for MemoryFiler {
    fn write(&mut self, artifact: &GeneratedArtifact) -> io::Result<PathBuf> {
        let path = artifact.output_path();
        if self.files.contains_key(&path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} was already written", path.display()),
            ));
        }
        self.files.insert(path.clone(), artifact.contents.clone());
        Ok(path)
    }

    fn discard(&mut self, written: &[PathBuf]) -> io::Result<()> {
        for path in written {
            self.files.remove(path);
        }
        Ok(())
    }
}
