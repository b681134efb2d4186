//! Per-platform templates, required options and naming

use crate::spec::Side;
use phantom_config::keys;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Fabric,
    Forge,
}

/// Fixed adapter shape for one side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideTemplate {
    pub class_name: &'static str,
    /// Interface reference, type arguments included
    pub interface: &'static str,
    /// Descriptor entry-point name
    pub entry_name: &'static str,
}

const FABRIC_TEMPLATES: [SideTemplate; 4] = [
    SideTemplate {
        class_name: "FabricPreLaunchInitializer",
        interface: "net.fabricmc.loader.api.entrypoint.PreLaunchEntrypoint",
        entry_name: "preLaunch",
    },
    SideTemplate {
        class_name: "FabricInitializer",
        interface: "net.fabricmc.api.ModInitializer",
        entry_name: "main",
    },
    SideTemplate {
        class_name: "FabricClientInitializer",
        interface: "net.fabricmc.api.ClientModInitializer",
        entry_name: "client",
    },
    SideTemplate {
        class_name: "FabricServerInitializer",
        interface: "net.fabricmc.api.DedicatedServerModInitializer",
        entry_name: "server",
    },
];

const FORGE_TEMPLATES: [SideTemplate; 4] = [
    SideTemplate {
        class_name: "ForgeEarlyInitializer",
        interface: "java.lang.Runnable",
        entry_name: "init",
    },
    SideTemplate {
        class_name: "ForgeCommonInitializer",
        interface: "java.lang.Runnable",
        entry_name: "common",
    },
    SideTemplate {
        class_name: "ForgeClientInitializer",
        interface: "java.util.function.Consumer<net.minecraftforge.fml.event.lifecycle.FMLClientSetupEvent>",
        entry_name: "client",
    },
    SideTemplate {
        class_name: "ForgeServerInitializer",
        interface: "java.util.function.Consumer<net.minecraftforge.fml.event.lifecycle.FMLDedicatedServerSetupEvent>",
        entry_name: "server",
    },
];

const FABRIC_REQUIRED: &[&str] = &[
    keys::MOD_ID,
    keys::MOD_GROUP_ID,
    keys::FABRIC_VERSION,
    keys::PHANTOM_VERSION,
    keys::MINECRAFT_VERSION,
];

const FORGE_REQUIRED: &[&str] = &[
    keys::MOD_ID,
    keys::MOD_GROUP_ID,
    keys::FORGE_VERSION,
    keys::PHANTOM_VERSION,
    keys::MINECRAFT_VERSION,
];

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Fabric, Platform::Forge];

    /// Lower-case name, also the last package segment
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Fabric => "fabric",
            Platform::Forge => "forge",
        }
    }

    pub fn required_options(&self) -> &'static [&'static str] {
        match self {
            Platform::Fabric => FABRIC_REQUIRED,
            Platform::Forge => FORGE_REQUIRED,
        }
    }

    /// Option holding the loader version
    pub fn runtime_option(&self) -> &'static str {
        match self {
            Platform::Fabric => keys::FABRIC_VERSION,
            Platform::Forge => keys::FORGE_VERSION,
        }
    }

    /// Dependency id of the loader in the descriptor
    pub fn runtime_mod_id(&self) -> &'static str {
        match self {
            Platform::Fabric => "fabricloader",
            Platform::Forge => "forge",
        }
    }

    pub fn supports_custom_entry_points(&self) -> bool {
        matches!(self, Platform::Fabric)
    }

    pub fn template(&self, side: Side) -> SideTemplate {
        let templates = match self {
            Platform::Fabric => &FABRIC_TEMPLATES,
            Platform::Forge => &FORGE_TEMPLATES,
        };
        match side {
            Side::Init => templates[0],
            Side::Common => templates[1],
            Side::Client => templates[2],
            Side::Server => templates[3],
        }
    }

    /// `<group>.<mod id lower-cased, '_' removed>.<platform>`
    pub fn package(&self, group_id: &str, mod_id: &str) -> String {
        let artifact: String = mod_id
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        format!("{}.{}.{}", group_id.trim(), artifact, self.name())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Fabric => "Fabric",
            Platform::Forge => "Forge",
        })
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fabric" => Ok(Platform::Fabric),
            "forge" => Ok(Platform::Forge),
            other => Err(format!("Unknown platform '{other}', expected fabric or forge")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_naming() {
        assert_eq!(
            Platform::Fabric.package("com.example", "Test_Mod"),
            "com.example.testmod.fabric"
        );
        assert_eq!(
            Platform::Forge.package("com.example", "test"),
            "com.example.test.forge"
        );
    }

    #[test]
    fn test_templates() {
        let template = Platform::Fabric.template(Side::Init);
        assert_eq!(template.class_name, "FabricPreLaunchInitializer");
        assert_eq!(template.entry_name, "preLaunch");

        let template = Platform::Forge.template(Side::Client);
        assert_eq!(template.class_name, "ForgeClientInitializer");
        assert!(template.interface.starts_with("java.util.function.Consumer<"));
    }

    #[test]
    fn test_required_options_differ_by_runtime() {
        assert!(Platform::Fabric.required_options().contains(&"fabricVersion"));
        assert!(!Platform::Fabric.required_options().contains(&"forgeVersion"));
        assert!(Platform::Forge.required_options().contains(&"forgeVersion"));
    }

    #[test]
    fn test_parse() {
        assert_eq!("Forge".parse::<Platform>(), Ok(Platform::Forge));
        assert!("quilt".parse::<Platform>().is_err());
    }
}
