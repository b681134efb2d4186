//! Host introspection records
//!
//! An [`Element`] is what a discovery round hands the processor: one
//! annotated member as the host sees it. The annotation payload is kept as
//! the raw strings written in source; it is parsed into an
//! [`EntryPointSpec`](crate::spec::EntryPointSpec) once, by the driver.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Method,
    Constructor,
    Field,
    Type,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Method => "method",
            ElementKind::Constructor => "constructor",
            ElementKind::Field => "field",
            ElementKind::Type => "type",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Abstract,
    Final,
    Default,
    Synchronized,
    Native,
    Strictfp,
    Transient,
    Volatile,
}

impl Modifier {
    /// Map a Java modifier keyword; annotations and unknown words yield `None`
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let modifier = match keyword {
            "public" => Modifier::Public,
            "protected" => Modifier::Protected,
            "private" => Modifier::Private,
            "static" => Modifier::Static,
            "abstract" => Modifier::Abstract,
            "final" => Modifier::Final,
            "default" => Modifier::Default,
            "synchronized" => Modifier::Synchronized,
            "native" => Modifier::Native,
            "strictfp" => Modifier::Strictfp,
            "transient" => Modifier::Transient,
            "volatile" => Modifier::Volatile,
            _ => return None,
        };
        Some(modifier)
    }
}

/// File and 1-based line of a declaration
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        SourceLocation {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// `@ModEntryPoint(side = ..., modLoader = ...)` as written in source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPointAnnotation {
    /// Enum reference such as `ModEntryPoint.Side.CLIENT`; `None` means default
    pub side: Option<String>,
    pub mod_loader: Option<String>,
    pub custom: Option<CustomAnnotation>,
}

/// `@FabricCustomEntryPoint(name = ..., interfaceName = ...)` as written in source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAnnotation {
    pub name: Option<String>,
    pub interface_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    pub name: String,
    /// Fully-qualified enclosing type, nested types joined with `.`
    pub enclosing_type: String,
    pub package: String,
    pub modifiers: BTreeSet<Modifier>,
    pub parameter_count: usize,
    /// Every type from the package down to the member is public
    pub enclosing_public: bool,
    pub annotation: EntryPointAnnotation,
    pub location: Option<SourceLocation>,
}

impl Element {
    /// A `public static` zero-argument method with a default annotation
    pub fn method(enclosing_type: &str, name: &str) -> Self {
        let package = enclosing_type
            .rsplit_once('.')
            .map(|(package, _)| package.to_string())
            .unwrap_or_default();
        Element {
            kind: ElementKind::Method,
            name: name.to_string(),
            enclosing_type: enclosing_type.to_string(),
            package,
            modifiers: [Modifier::Public, Modifier::Static].into_iter().collect(),
            parameter_count: 0,
            enclosing_public: true,
            annotation: EntryPointAnnotation::default(),
            location: None,
        }
    }

    pub fn with_side(mut self, side: &str) -> Self {
        self.annotation.side = Some(side.to_string());
        self
    }

    pub fn with_loader(mut self, loader: &str) -> Self {
        self.annotation.mod_loader = Some(loader.to_string());
        self
    }

    pub fn with_custom(mut self, name: &str, interface_name: &str) -> Self {
        self.annotation.custom = Some(CustomAnnotation {
            name: Some(name.to_string()),
            interface_name: Some(interface_name.to_string()),
        });
        self
    }

    pub fn with_modifiers(mut self, modifiers: &[Modifier]) -> Self {
        self.modifiers = modifiers.iter().copied().collect();
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn has(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// `owner.member`, the fully-qualified call target
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.enclosing_type, self.name)
    }
}
