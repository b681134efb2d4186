//! Loading options from disk and from the command line
//!
//! The options file is TOML with a single `[options]` table:
//!
//! ```toml
//! [options]
//! modId = "example"
//! modGroupId = "com.example"
//! javaVersion = 17
//! ```
//!
//! Scalar values of any type are accepted and stringified, since the
//! generator only ever sees strings. `-A key=value` overrides win over the
//! file.

use crate::keys;
use crate::store::{ConfigError, OptionStore};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// File looked up in the working directory when no path is given
pub const DEFAULT_OPTIONS_FILE: &str = "phantom.toml";

#[derive(Debug, Default, Deserialize)]
pub struct OptionsFile {
    #[serde(default)]
    pub options: BTreeMap<String, toml::Value>,
}

impl OptionsFile {
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::OptionsFile(format!("Failed to parse options file: {e}")))
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::OptionsFile(format!(
                "Failed to read options file {}: {e}",
                path.display()
            ))
        })?;
        Self::parse(&content)
    }

    /// Flatten the table into string values
    pub fn into_pairs(self) -> Result<Vec<(String, String)>, ConfigError> {
        self.options
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    toml::Value::String(s) => s,
                    toml::Value::Integer(i) => i.to_string(),
                    toml::Value::Float(f) => f.to_string(),
                    toml::Value::Boolean(b) => b.to_string(),
                    toml::Value::Array(items) => {
                        // Lists are only meaningful for comma-separated keys like modAuthors
                        let mut parts = Vec::with_capacity(items.len());
                        for item in items {
                            match item {
                                toml::Value::String(s) => parts.push(s),
                                other => parts.push(other.to_string()),
                            }
                        }
                        parts.join(", ")
                    }
                    other => {
                        return Err(ConfigError::OptionsFile(format!(
                            "Option {key} must be a scalar or a list, found {}",
                            other.type_str()
                        )))
                    }
                };
                Ok((key, text))
            })
            .collect()
    }
}

/// Parse a single `key=value` override
pub fn parse_override(raw: &str) -> Result<(String, String), ConfigError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidOverride(raw.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ConfigError::InvalidOverride(raw.to_string()));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Build the option store from an optional file and `-A` overrides
///
/// An explicit path that does not exist is an error; the default
/// `phantom.toml` is only read when present.
pub fn load_options(
    path: Option<&Path>,
    working_dir: &Path,
    overrides: &[String],
) -> Result<OptionStore, ConfigError> {
    let mut values: BTreeMap<String, String> = BTreeMap::new();

    let file = match path {
        Some(p) => Some(OptionsFile::read(p)?),
        None => {
            let default_path = working_dir.join(DEFAULT_OPTIONS_FILE);
            if default_path.is_file() {
                debug!("Using default options file: {:?}", default_path);
                Some(OptionsFile::read(&default_path)?)
            } else {
                None
            }
        }
    };

    if let Some(file) = file {
        values.extend(file.into_pairs()?);
    }

    for raw in overrides {
        let (key, value) = parse_override(raw)?;
        values.insert(key, value);
    }

    for key in values.keys() {
        if !keys::is_known(key) {
            warn!("Unknown option '{}' will be ignored", key);
        }
    }

    debug!("Loaded {} options", values.len());
    Ok(OptionStore::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("modId=example"),
            Ok(("modId".to_string(), "example".to_string()))
        );
        assert_eq!(
            parse_override("modDescription=a=b"),
            Ok(("modDescription".to_string(), "a=b".to_string()))
        );
        assert!(parse_override("modId").is_err());
        assert!(parse_override("=value").is_err());
    }

    #[test]
    fn test_options_file_stringifies_scalars() -> Result<(), ConfigError> {
        let file = OptionsFile::parse(
            r#"
[options]
modId = "example"
javaVersion = 21
modAuthors = ["Nico", "Alex"]
"#,
        )?;
        let pairs = file.into_pairs()?;
        assert!(pairs.contains(&("javaVersion".to_string(), "21".to_string())));
        assert!(pairs.contains(&("modAuthors".to_string(), "Nico, Alex".to_string())));
        Ok(())
    }

    #[test]
    fn test_options_file_rejects_tables() {
        let result = OptionsFile::parse("[options.modId]\nx = 1\n").and_then(|f| f.into_pairs());
        assert!(matches!(result, Err(ConfigError::OptionsFile(_))));
    }

    #[test]
    fn test_overrides_win_over_default_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        fs::write(
            dir.path().join(DEFAULT_OPTIONS_FILE),
            "[options]\nmodId = \"from_file\"\nmodName = \"Example\"\n",
        )?;

        let store = load_options(None, dir.path(), &["modId=from_cli".to_string()])?;
        assert_eq!(store.get("modId"), Some("from_cli"));
        assert_eq!(store.get("modName"), Some("Example"));
        Ok(())
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let result = load_options(Some(&dir.path().join("nope.toml")), dir.path(), &[]);
        assert!(matches!(result, Err(ConfigError::OptionsFile(_))));
        Ok(())
    }
}
