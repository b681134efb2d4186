//! Logical descriptor model shared by both serializations
//!
//! The model is filled once from the option store and the adapter list,
//! then handed to the format writers. Fields that have no value and no
//! default stay `None`; each format decides how to render absence.

use crate::version::{DependencyRole, VersionRange};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// =============================================================================
// DESCRIPTOR - identity, metadata, entry points and dependencies
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModDescriptor {
    pub mod_id: String,
    /// `None` renders the platform's version placeholder token
    pub version: Option<String>,
    pub display_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub credits: Option<String>,
    pub license: String,
    pub icon: String,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub entrypoints: EntryPoints,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub homepage: Option<String>,
    pub sources: Option<String>,
    pub issues: Option<String>,
}

impl Contact {
    pub fn is_empty(&self) -> bool {
        self.homepage.is_none() && self.sources.is_none() && self.issues.is_none()
    }

    /// Homepage, or the source repository when no homepage is set
    pub fn display_url(&self) -> Option<&str> {
        self.homepage.as_deref().or(self.sources.as_deref())
    }
}

// =============================================================================
// ENTRY POINTS - insertion-ordered name -> classes map
// =============================================================================

/// Entry point name to adapter classes, in the order adapters were generated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoints {
    entries: Vec<(String, SmallVec<[String; 1]>)>,
}

impl EntryPoints {
    /// Append a class under `name`, creating the entry on first use
    pub fn push(&mut self, name: &str, class: impl Into<String>) {
        let class = class.into();
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, classes)) => {
                if !classes.contains(&class) {
                    classes.push(class);
                }
            }
            None => {
                let mut classes = SmallVec::new();
                classes.push(class);
                self.entries.push((name.to_string(), classes));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, classes)| classes.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, classes)| (name.as_str(), classes.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// DEPENDENCIES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub mod_id: String,
    pub role: DependencyRole,
    pub range: VersionRange,
}

impl Dependency {
    pub fn new(mod_id: impl Into<String>, role: DependencyRole, range: VersionRange) -> Self {
        Dependency {
            mod_id: mod_id.into(),
            role,
            range,
        }
    }
}

impl ModDescriptor {
    pub fn dependency(&self, role: DependencyRole) -> Option<&Dependency> {
        self.dependencies.iter().find(|d| d.role == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_points_keep_insertion_order() {
        let mut entrypoints = EntryPoints::default();
        entrypoints.push("main", "a.FabricInitializer");
        entrypoints.push("client", "a.FabricClientInitializer");
        entrypoints.push("terrablender", "a.FabricTerrablenderEntryPoint");
        entrypoints.push("main", "a.FabricInitializer");
        entrypoints.push("terrablender", "a.FabricTerrablenderOtherApi");

        let names: Vec<&str> = entrypoints.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["main", "client", "terrablender"]);
        assert_eq!(entrypoints.get("main").map(<[String]>::len), Some(1));
        assert_eq!(entrypoints.get("terrablender").map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_display_url_falls_back_to_sources() {
        let contact = Contact {
            homepage: None,
            sources: Some("https://example.com/src".to_string()),
            issues: None,
        };
        assert_eq!(contact.display_url(), Some("https://example.com/src"));
        assert!(Contact::default().is_empty());
    }
}
