//! Phantom descriptor management
//!
//! This module holds the logical descriptor model and its two serializations:
//! - the line-oriented `META-INF/mods.toml` read by Forge
//! - the nested-object `fabric.mod.json` read by Fabric Loader
//!
//! It also derives dependency version ranges from raw version strings, since
//! both formats list the same dependencies in different range dialects.

pub mod errors;
pub mod fabric_json;
pub mod mods_toml;
pub mod types;
pub mod version;

pub use errors::ManifestError;
pub use fabric_json::{render_fabric_mod_json, FABRIC_MOD_JSON_PATH, FABRIC_VERSION_PLACEHOLDER};
pub use mods_toml::{render_mods_toml, FORGE_VERSION_PLACEHOLDER, MODS_TOML_PATH};
pub use types::{Contact, Dependency, EntryPoints, ModDescriptor};
pub use version::{derive_range, DependencyRole, RangeResult, VersionRange};
