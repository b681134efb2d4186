//! Entry-point metadata parsed from an element's annotation payload

use crate::element::{EntryPointAnnotation, SourceLocation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Execution context an entry point runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Init,
    Common,
    Client,
    Server,
}

impl Side {
    /// Declaration order, which is also adapter and descriptor order
    pub const ALL: [Side; 4] = [Side::Init, Side::Common, Side::Client, Side::Server];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Init => "INIT",
            Side::Common => "COMMON",
            Side::Client => "CLIENT",
            Side::Server => "SERVER",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    /// Accepts `CLIENT`, `Side.CLIENT` or `ModEntryPoint.Side.CLIENT`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match last_segment(s) {
            "INIT" => Ok(Side::Init),
            "COMMON" => Ok(Side::Common),
            "CLIENT" => Ok(Side::Client),
            "SERVER" => Ok(Side::Server),
            other => Err(format!("Unknown side '{other}'")),
        }
    }
}

/// Platform restriction; `Common` means every platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Loader {
    Common,
    Fabric,
    Forge,
}

impl fmt::Display for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Loader::Common => "COMMON",
            Loader::Fabric => "FABRIC",
            Loader::Forge => "FORGE",
        })
    }
}

impl FromStr for Loader {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match last_segment(s) {
            "COMMON" => Ok(Loader::Common),
            "FABRIC" => Ok(Loader::Fabric),
            "FORGE" => Ok(Loader::Forge),
            other => Err(format!("Unknown mod loader '{other}'")),
        }
    }
}

fn last_segment(s: &str) -> &str {
    let s = s.trim();
    s.rsplit('.').next().unwrap_or(s)
}

/// A named entry point bound to a single-method interface
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomEntryPoint {
    pub name: String,
    pub interface_name: String,
}

impl CustomEntryPoint {
    pub fn new(name: impl Into<String>, interface_name: impl Into<String>) -> Self {
        CustomEntryPoint {
            name: name.into(),
            interface_name: interface_name.into(),
        }
    }
}

impl fmt::Display for CustomEntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.interface_name)
    }
}

/// Where a declaration is catalogued
///
/// A custom descriptor always wins over the declared side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryPointSpec {
    Ordinary(Side),
    Custom(CustomEntryPoint),
}

/// The full annotation payload after parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAnnotation {
    pub side: Side,
    pub loader: Loader,
    /// Custom payload with possibly-missing fields; checked by the validator
    pub custom: Option<(String, String)>,
}

impl ParsedAnnotation {
    pub fn parse(annotation: &EntryPointAnnotation) -> Result<Self, String> {
        let side = match &annotation.side {
            Some(raw) => raw.parse()?,
            None => Side::Common,
        };
        let loader = match &annotation.mod_loader {
            Some(raw) => raw.parse()?,
            None => Loader::Common,
        };
        let custom = annotation.custom.as_ref().map(|custom| {
            (
                custom.name.clone().unwrap_or_default(),
                custom.interface_name.clone().unwrap_or_default(),
            )
        });
        Ok(ParsedAnnotation {
            side,
            loader,
            custom,
        })
    }

    /// Resolve the catalog key, custom descriptor first
    pub fn spec(&self) -> EntryPointSpec {
        match &self.custom {
            Some((name, interface_name)) => {
                EntryPointSpec::Custom(CustomEntryPoint::new(name.trim(), interface_name.trim()))
            }
            None => EntryPointSpec::Ordinary(self.side),
        }
    }
}

/// A validated entry-point method, immutable once recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub owner: String,
    pub member: String,
    pub side: Side,
    pub spec: EntryPointSpec,
    pub location: Option<SourceLocation>,
}

impl Declaration {
    /// Fully-qualified call expression, e.g. `pkg.Foo.bar()`
    pub fn call(&self) -> String {
        format!("{}.{}()", self.owner, self.member)
    }

    pub fn key(&self) -> (&str, &str) {
        (&self.owner, &self.member)
    }

    pub fn custom(&self) -> Option<&CustomEntryPoint> {
        match &self.spec {
            EntryPointSpec::Custom(custom) => Some(custom),
            EntryPointSpec::Ordinary(_) => None,
        }
    }
}
