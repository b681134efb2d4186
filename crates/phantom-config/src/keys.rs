//! Well-known option keys
//!
//! Option names are the ones build scripts pass as `-AmodId=...` style
//! compiler options, so they keep their camelCase spelling.

pub const MOD_ID: &str = "modId";
pub const MOD_GROUP_ID: &str = "modGroupId";
pub const MOD_VERSION: &str = "modVersion";
pub const MOD_NAME: &str = "modName";
pub const MOD_DESCRIPTION: &str = "modDescription";
/// Comma-separated list
pub const MOD_AUTHORS: &str = "modAuthors";
pub const MOD_CREDITS: &str = "modCredits";
pub const MOD_LICENSE: &str = "modLicense";
pub const MOD_ICON: &str = "modIcon";
pub const MOD_URL: &str = "modUrl";
pub const MOD_SOURCE: &str = "modSource";
pub const MOD_ISSUES: &str = "modIssues";

pub const PHANTOM_VERSION: &str = "phantomVersion";
pub const MINECRAFT_VERSION: &str = "minecraftVersion";
pub const FABRIC_VERSION: &str = "fabricVersion";
pub const FORGE_VERSION: &str = "forgeVersion";
pub const JAVA_VERSION: &str = "javaVersion";

/// Fully-qualified static method the Forge bootstrap hands the mod event bus to
pub const REGISTRY_CALL: &str = "registryCall";

pub const DEFAULT_MOD_NAME: &str = "Unnamed";
pub const DEFAULT_LICENSE: &str = "All rights reserved";
pub const DEFAULT_ICON: &str = "icon.png";
pub const DEFAULT_JAVA_VERSION: &str = "17";
pub const DEFAULT_REGISTRY_CALL: &str =
    "io.github.phantomloader.library.forge.registry.ForgeRegistry.registerAll";

/// Every key the generator understands, in display order
pub const ALL_KEYS: &[&str] = &[
    MOD_ID,
    MOD_GROUP_ID,
    MOD_VERSION,
    MOD_NAME,
    MOD_DESCRIPTION,
    MOD_AUTHORS,
    MOD_CREDITS,
    MOD_LICENSE,
    MOD_ICON,
    MOD_URL,
    MOD_SOURCE,
    MOD_ISSUES,
    PHANTOM_VERSION,
    MINECRAFT_VERSION,
    FABRIC_VERSION,
    FORGE_VERSION,
    JAVA_VERSION,
    REGISTRY_CALL,
];

/// Check whether a key is one the generator reads
pub fn is_known(key: &str) -> bool {
    ALL_KEYS.contains(&key)
}
