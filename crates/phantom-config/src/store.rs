//! Typed access to the generator's option map
//!
//! Options arrive as a loosely-typed `key -> string` map. The store keeps
//! that map immutable and layers three access modes on top of it:
//! - required keys, which fail fast with an error naming the key
//! - optional keys with a default
//! - optional keys with no default, which report absence as `None`
//!
//! A value made only of whitespace is treated as absent everywhere.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Error type for option lookups and option loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required option was not supplied
    MissingOption(String),
    /// A required option was supplied but blank
    BlankOption(String),
    /// Several required options are missing or blank
    MissingOptions(Vec<String>),
    /// A `-A` override was not of the form `key=value`
    InvalidOverride(String),
    /// The options file could not be read or parsed
    OptionsFile(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingOption(key) => write!(
                f,
                "Cannot get option {key}. Pass it with `-A {key}=<value>` or add it to the [options] table"
            ),
            ConfigError::BlankOption(key) => {
                write!(f, "Option {key} returned an empty or blank string")
            }
            ConfigError::MissingOptions(keys) => {
                write!(f, "Missing required options: {}", keys.join(", "))
            }
            ConfigError::InvalidOverride(raw) => {
                write!(f, "Invalid option override '{raw}', expected key=value")
            }
            ConfigError::OptionsFile(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Immutable option map plus the set of keys the current platform requires
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionStore {
    values: BTreeMap<String, String>,
    required: BTreeSet<String>,
}

impl OptionStore {
    pub fn new<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        OptionStore {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            required: BTreeSet::new(),
        }
    }

    /// Return a copy of this store that requires the given keys
    pub fn with_required(&self, keys: &[&str]) -> Self {
        OptionStore {
            values: self.values.clone(),
            required: keys.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    /// Check every required key at once
    ///
    /// Reports all offending keys, sorted, so a single run tells the user
    /// everything that has to be added.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|key| self.get(key).is_none())
            .cloned()
            .collect();

        match missing.len() {
            0 => Ok(()),
            1 => {
                let key = missing.into_iter().next().unwrap_or_default();
                if self.values.contains_key(&key) {
                    Err(ConfigError::BlankOption(key))
                } else {
                    Err(ConfigError::MissingOption(key))
                }
            }
            _ => Err(ConfigError::MissingOptions(missing)),
        }
    }

    /// Get a required value, failing with an error that names the key
    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        match self.values.get(key) {
            None => Err(ConfigError::MissingOption(key.to_string())),
            Some(value) if value.trim().is_empty() => {
                Err(ConfigError::BlankOption(key.to_string()))
            }
            Some(value) => Ok(value.trim()),
        }
    }

    /// Get an optional value; blank values count as absent
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Get an optional value or its default
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Get a comma-separated list; empty entries are dropped
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Iterate raw entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
