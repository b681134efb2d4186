//! Nested-object descriptor writer (`fabric.mod.json`)
//!
//! Built from borrowed views over the descriptor so field order is fixed
//! by struct declaration order and output is byte-stable across runs.

use crate::errors::ManifestError;
use crate::types::{EntryPoints, ModDescriptor};
use crate::version::DependencyRole;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

pub const FABRIC_MOD_JSON_PATH: &str = "fabric.mod.json";
pub const FABRIC_VERSION_PLACEHOLDER: &str = "${version}";
const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FabricModJson<'a> {
    schema_version: u32,
    id: &'a str,
    version: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    authors: &'a [String],
    #[serde(skip_serializing_if = "ContactJson::is_empty")]
    contact: ContactJson<'a>,
    license: &'a str,
    icon: &'a str,
    entrypoints: EntryPointsJson<'a>,
    depends: DependsJson<'a>,
}

#[derive(Serialize)]
struct ContactJson<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    homepage: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sources: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<&'a str>,
}

impl ContactJson<'_> {
    fn is_empty(&self) -> bool {
        self.homepage.is_none() && self.sources.is_none() && self.issues.is_none()
    }
}

struct EntryPointsJson<'a>(&'a EntryPoints);

impl Serialize for EntryPointsJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, classes) in self.0.iter() {
            map.serialize_entry(name, classes)?;
        }
        map.end()
    }
}

struct DependsJson<'a>(Vec<(&'a str, String)>);

impl Serialize for DependsJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

/// Render the descriptor in the nested-object format
///
/// Absent optional fields are omitted: JSON has no comment syntax for a
/// placeholder, and an empty string would read as a real value.
pub fn render_fabric_mod_json(descriptor: &ModDescriptor) -> Result<String, ManifestError> {
    let homepage = descriptor.contact.display_url();
    let view = FabricModJson {
        schema_version: SCHEMA_VERSION,
        id: &descriptor.mod_id,
        version: descriptor
            .version
            .as_deref()
            .unwrap_or(FABRIC_VERSION_PLACEHOLDER),
        name: &descriptor.display_name,
        description: descriptor.description.as_deref(),
        authors: &descriptor.authors,
        contact: ContactJson {
            homepage,
            sources: descriptor.contact.sources.as_deref(),
            issues: descriptor.contact.issues.as_deref(),
        },
        license: &descriptor.license,
        icon: &descriptor.icon,
        entrypoints: EntryPointsJson(&descriptor.entrypoints),
        depends: DependsJson(
            descriptor
                .dependencies
                .iter()
                .map(|d| (d.mod_id.as_str(), d.range.to_semver_predicate()))
                .collect(),
        ),
    };

    if descriptor.dependency(DependencyRole::PlatformRuntime).is_none() {
        return Err(ManifestError::InvalidDescriptor(
            "fabric.mod.json needs a platform runtime dependency".to_string(),
        ));
    }

    let mut json = serde_json::to_string_pretty(&view)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Contact, Dependency};
    use crate::version::VersionRange;

    fn descriptor() -> ModDescriptor {
        let mut entrypoints = EntryPoints::default();
        entrypoints.push("main", "com.example.test.fabric.FabricInitializer");
        entrypoints.push(
            "terrablender",
            "com.example.test.fabric.FabricTerrablenderEntryPoint",
        );
        ModDescriptor {
            mod_id: "test".to_string(),
            version: None,
            display_name: "Test \"Mod\"".to_string(),
            description: None,
            authors: vec!["Nico".to_string()],
            credits: Some("ignored by fabric".to_string()),
            license: "MIT".to_string(),
            icon: "icon.png".to_string(),
            contact: Contact::default(),
            entrypoints,
            dependencies: vec![
                Dependency::new(
                    "fabricloader",
                    DependencyRole::PlatformRuntime,
                    VersionRange::at_least("0"),
                ),
                Dependency::new(
                    "phantom",
                    DependencyRole::Library,
                    VersionRange::between("0.3", "1.0"),
                ),
                Dependency::new("java", DependencyRole::Java, VersionRange::at_least("17")),
            ],
        }
    }

    #[test]
    fn test_render_layout() -> Result<(), ManifestError> {
        let expected = r#"{
  "schemaVersion": 1,
  "id": "test",
  "version": "${version}",
  "name": "Test \"Mod\"",
  "authors": [
    "Nico"
  ],
  "license": "MIT",
  "icon": "icon.png",
  "entrypoints": {
    "main": [
      "com.example.test.fabric.FabricInitializer"
    ],
    "terrablender": [
      "com.example.test.fabric.FabricTerrablenderEntryPoint"
    ]
  },
  "depends": {
    "fabricloader": ">=0",
    "phantom": ">=0.3 <1.0",
    "java": ">=17"
  }
}
"#;
        assert_eq!(render_fabric_mod_json(&descriptor())?, expected);
        Ok(())
    }

    #[test]
    fn test_contact_uses_source_as_homepage_fallback() -> Result<(), ManifestError> {
        let mut descriptor = descriptor();
        descriptor.contact.sources = Some("https://example.com/src".to_string());

        let value: serde_json::Value = serde_json::from_str(&render_fabric_mod_json(&descriptor)?)?;
        assert_eq!(value["contact"]["homepage"], "https://example.com/src");
        assert_eq!(value["contact"]["sources"], "https://example.com/src");
        Ok(())
    }

    #[test]
    fn test_missing_platform_dependency_is_rejected() {
        let mut descriptor = descriptor();
        descriptor
            .dependencies
            .retain(|d| d.role != DependencyRole::PlatformRuntime);
        assert!(matches!(
            render_fabric_mod_json(&descriptor),
            Err(ManifestError::InvalidDescriptor(_))
        ));
    }
}
