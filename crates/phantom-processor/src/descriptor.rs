//! Descriptor assembly from options and generated adapters

use crate::adapter::{entry_points, AdapterSource};
use crate::diagnostics::Diagnostics;
use crate::platform::Platform;
use phantom_config::{keys, ConfigError, OptionStore};
use phantom_manifest::{
    derive_range, render_fabric_mod_json, render_mods_toml, Contact, Dependency, DependencyRole,
    ManifestError, ModDescriptor, FABRIC_MOD_JSON_PATH, MODS_TOML_PATH,
};

/// Dependency id of the phantom library
pub const LIBRARY_MOD_ID: &str = "phantom";
/// Dependency id of the game
pub const TARGET_MOD_ID: &str = "minecraft";
pub const JAVA_MOD_ID: &str = "java";

/// Build the logical descriptor; range fallbacks become warnings
pub fn assemble_descriptor(
    platform: Platform,
    options: &OptionStore,
    adapters: &[AdapterSource],
    diagnostics: &mut Diagnostics,
) -> Result<ModDescriptor, ConfigError> {
    let mut dependency = |mod_id: &str, role: DependencyRole, raw: &str| {
        let result = derive_range(raw, role);
        if let Some(warning) = result.warning {
            diagnostics.warning(warning, None);
        }
        Dependency::new(mod_id, role, result.range)
    };

    let dependencies = vec![
        dependency(
            platform.runtime_mod_id(),
            DependencyRole::PlatformRuntime,
            options.require(platform.runtime_option())?,
        ),
        dependency(
            LIBRARY_MOD_ID,
            DependencyRole::Library,
            options.require(keys::PHANTOM_VERSION)?,
        ),
        dependency(
            TARGET_MOD_ID,
            DependencyRole::TargetRuntime,
            options.require(keys::MINECRAFT_VERSION)?,
        ),
        dependency(
            JAVA_MOD_ID,
            DependencyRole::Java,
            options.get_or(keys::JAVA_VERSION, keys::DEFAULT_JAVA_VERSION),
        ),
    ];

    let owned = |key: &str| options.get(key).map(str::to_string);
    Ok(ModDescriptor {
        mod_id: options.require(keys::MOD_ID)?.to_string(),
        version: owned(keys::MOD_VERSION),
        display_name: options
            .get_or(keys::MOD_NAME, keys::DEFAULT_MOD_NAME)
            .to_string(),
        description: owned(keys::MOD_DESCRIPTION),
        authors: options.get_list(keys::MOD_AUTHORS),
        credits: owned(keys::MOD_CREDITS),
        license: options
            .get_or(keys::MOD_LICENSE, keys::DEFAULT_LICENSE)
            .to_string(),
        icon: options.get_or(keys::MOD_ICON, keys::DEFAULT_ICON).to_string(),
        contact: Contact {
            homepage: owned(keys::MOD_URL),
            sources: owned(keys::MOD_SOURCE),
            issues: owned(keys::MOD_ISSUES),
        },
        entrypoints: entry_points(adapters),
        dependencies,
    })
}

/// Relative resource path of the platform's descriptor
pub fn descriptor_path(platform: Platform) -> &'static str {
    match platform {
        Platform::Fabric => FABRIC_MOD_JSON_PATH,
        Platform::Forge => MODS_TOML_PATH,
    }
}

pub fn render_descriptor(
    platform: Platform,
    descriptor: &ModDescriptor,
) -> Result<String, ManifestError> {
    match platform {
        Platform::Fabric => render_fabric_mod_json(descriptor),
        Platform::Forge => Ok(render_mods_toml(descriptor)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    fn options(extra: &[(&str, &str)]) -> OptionStore {
        let mut values = vec![
            ("modId", "test"),
            ("modGroupId", "com.example"),
            ("phantomVersion", "0.3"),
            ("minecraftVersion", "1.20.1"),
            ("fabricVersion", "0.14.21"),
            ("forgeVersion", "47.1.0"),
        ];
        values.extend_from_slice(extra);
        OptionStore::new(values)
    }

    fn adapter(entry_name: &str, class_name: &str) -> AdapterSource {
        AdapterSource {
            package: "com.example.test.fabric".to_string(),
            class_name: class_name.to_string(),
            entry_name: entry_name.to_string(),
            source: String::new(),
        }
    }

    #[test]
    fn test_defaults_and_ranges() -> Result<(), ConfigError> {
        let mut diagnostics = Diagnostics::default();
        let descriptor = assemble_descriptor(
            Platform::Forge,
            &options(&[("modVersion", "1.2.3")]),
            &[],
            &mut diagnostics,
        )?;

        assert_eq!(descriptor.mod_id, "test");
        assert_eq!(descriptor.version.as_deref(), Some("1.2.3"));
        assert_eq!(descriptor.display_name, "Unnamed");
        assert_eq!(descriptor.license, "All rights reserved");
        assert_eq!(descriptor.icon, "icon.png");
        assert_eq!(descriptor.description, None);

        let ranges: Vec<String> = descriptor
            .dependencies
            .iter()
            .map(|d| format!("{}={}", d.mod_id, d.range))
            .collect();
        assert_eq!(
            ranges,
            vec![
                "forge=[47,)",
                "phantom=[0.3,1.0)",
                "minecraft=[1.20.1,1.21)",
                "java=[17,)"
            ]
        );
        assert!(diagnostics.is_empty());
        Ok(())
    }

    #[test]
    fn test_range_fallback_becomes_warning() -> Result<(), ConfigError> {
        let mut diagnostics = Diagnostics::default();
        let descriptor = assemble_descriptor(
            Platform::Fabric,
            &options(&[("phantomVersion", "7")]),
            &[],
            &mut diagnostics,
        )?;
        assert_eq!(
            descriptor
                .dependency(DependencyRole::Library)
                .map(|d| d.range.to_maven()),
            Some("[7,)".to_string())
        );
        assert_eq!(diagnostics.count(Severity::Warning), 1);
        Ok(())
    }

    #[test]
    fn test_entry_points_and_contact() -> Result<(), ConfigError> {
        let mut diagnostics = Diagnostics::default();
        let adapters = [
            adapter("main", "FabricInitializer"),
            adapter("client", "FabricClientInitializer"),
        ];
        let descriptor = assemble_descriptor(
            Platform::Fabric,
            &options(&[("modSource", "https://example.com/src"), ("modAuthors", "Nico, Alex")]),
            &adapters,
            &mut diagnostics,
        )?;
        assert_eq!(
            descriptor.entrypoints.get("client"),
            Some(&["com.example.test.fabric.FabricClientInitializer".to_string()][..])
        );
        assert_eq!(descriptor.contact.display_url(), Some("https://example.com/src"));
        assert_eq!(descriptor.authors, vec!["Nico", "Alex"]);
        Ok(())
    }

    #[test]
    fn test_missing_required_key_is_named() {
        let mut diagnostics = Diagnostics::default();
        let store = OptionStore::new([("modId", "test")]);
        let err = assemble_descriptor(Platform::Forge, &store, &[], &mut diagnostics);
        assert_eq!(err, Err(ConfigError::MissingOption("forgeVersion".to_string())));
    }
}
