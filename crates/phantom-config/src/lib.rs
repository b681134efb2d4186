//! Configuration for the phantom entry-point generator
//!
//! This crate provides:
//! - the option store (typed, defaulted access to the `-A key=value` map)
//! - the well-known option keys and their defaults
//! - loading options from a TOML file merged with command-line overrides
//!
//! These utilities are shared by the processor and the CLI so that both
//! agree on option names and validation rules.

pub mod keys;
pub mod loader;
pub mod store;

pub use loader::{load_options, parse_override, OptionsFile, DEFAULT_OPTIONS_FILE};
pub use store::{ConfigError, OptionStore};
