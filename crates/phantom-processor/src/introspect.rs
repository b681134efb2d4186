//! Type introspection for binding adapters to interfaces
//!
//! The processor never loads classes. It asks a [`TypeIntrospector`] for
//! the declared shape of an interface: its type parameters, its methods
//! and its super-interfaces. Platform interfaces the generated code always
//! implements are built in ([`KnownInterfaces`]); hosts layer their own
//! source-derived index behind them with [`TypeIntrospector::chain`].

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    Abstract,
    Default,
    Static,
    Private,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub ty: String,
    pub name: String,
}

impl Parameter {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Parameter {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceMethod {
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<Parameter>,
    pub kind: MethodKind,
}

impl InterfaceMethod {
    pub fn abstract_method(name: &str, return_type: &str, parameters: Vec<Parameter>) -> Self {
        InterfaceMethod {
            name: name.to_string(),
            return_type: return_type.to_string(),
            parameters,
            kind: MethodKind::Abstract,
        }
    }

    /// Public `Object` methods an interface may redeclare without making them abstract
    pub fn is_object_method(&self) -> bool {
        match (self.name.as_str(), self.parameters.as_slice()) {
            ("equals", [param]) => matches!(param.ty.as_str(), "Object" | "java.lang.Object"),
            ("hashCode" | "toString", []) => true,
            _ => false,
        }
    }
}

/// A super-interface reference with its type arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<String>,
}

impl TypeRef {
    /// Split `a.b.C<X, java.util.List<Y>>` into name and top-level arguments
    pub fn parse(reference: &str) -> Self {
        let reference = reference.trim();
        let Some(open) = reference.find('<') else {
            return TypeRef {
                name: reference.to_string(),
                arguments: Vec::new(),
            };
        };
        let close = reference.rfind('>').unwrap_or(reference.len());
        let inner = reference.get(open + 1..close).unwrap_or_default();
        TypeRef {
            name: reference[..open].trim().to_string(),
            arguments: split_top_level(inner),
        }
    }
}

/// Split on commas that are not nested inside `<...>`
pub fn split_top_level(list: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for ch in list.chars() {
        match ch {
            '<' => {
                depth += 1;
                current.push(ch);
            }
            '>' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                if !current.trim().is_empty() {
                    parts.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceShape {
    /// Fully-qualified name without type arguments
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub methods: Vec<InterfaceMethod>,
    /// Fully-qualified super-interfaces
    #[serde(default)]
    pub super_interfaces: Vec<TypeRef>,
}

impl InterfaceShape {
    pub fn new(name: &str) -> Self {
        InterfaceShape {
            name: name.to_string(),
            type_parameters: Vec::new(),
            methods: Vec::new(),
            super_interfaces: Vec::new(),
        }
    }

    pub fn with_type_parameters(mut self, parameters: &[&str]) -> Self {
        self.type_parameters = parameters.iter().map(|p| (*p).to_string()).collect();
        self
    }

    pub fn with_method(mut self, method: InterfaceMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_super(mut self, reference: &str) -> Self {
        self.super_interfaces.push(TypeRef::parse(reference));
        self
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// Source of interface shapes, looked up by fully-qualified name
pub trait TypeIntrospector {
    fn interface(&self, name: &str) -> Option<&InterfaceShape>;

    /// Consult `self` first, then `next`
    fn chain<B: TypeIntrospector>(self, next: B) -> Chained<Self, B>
    where
        Self: Sized,
    {
        Chained { first: self, next }
    }
}

impl<T: TypeIntrospector + ?Sized> TypeIntrospector for &T {
    fn interface(&self, name: &str) -> Option<&InterfaceShape> {
        (**self).interface(name)
    }
}

#[derive(Debug)]
pub struct Chained<A, B> {
    first: A,
    next: B,
}

impl<A: TypeIntrospector, B: TypeIntrospector> TypeIntrospector for Chained<A, B> {
    fn interface(&self, name: &str) -> Option<&InterfaceShape> {
        self.first
            .interface(name)
            .or_else(|| self.next.interface(name))
    }
}

/// A fixed set of shapes keyed by fully-qualified name
#[derive(Debug, Clone, Default)]
pub struct KnownInterfaces {
    shapes: AHashMap<String, InterfaceShape>,
}

impl KnownInterfaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interfaces every generated adapter may implement
    pub fn builtin() -> Self {
        let mut known = KnownInterfaces::new();
        for (name, method) in [
            ("net.fabricmc.loader.api.entrypoint.PreLaunchEntrypoint", "onPreLaunch"),
            ("net.fabricmc.api.ModInitializer", "onInitialize"),
            ("net.fabricmc.api.ClientModInitializer", "onInitializeClient"),
            ("net.fabricmc.api.DedicatedServerModInitializer", "onInitializeServer"),
            ("java.lang.Runnable", "run"),
        ] {
            known.insert(
                InterfaceShape::new(name)
                    .with_method(InterfaceMethod::abstract_method(method, "void", Vec::new())),
            );
        }
        known.insert(
            InterfaceShape::new("java.util.function.Consumer")
                .with_type_parameters(&["T"])
                .with_method(InterfaceMethod::abstract_method(
                    "accept",
                    "void",
                    vec![Parameter::new("T", "t")],
                ))
                .with_method(InterfaceMethod {
                    name: "andThen".to_string(),
                    return_type: "java.util.function.Consumer<T>".to_string(),
                    parameters: vec![Parameter::new(
                        "java.util.function.Consumer<? super T>",
                        "after",
                    )],
                    kind: MethodKind::Default,
                }),
        );
        known
    }

    pub fn insert(&mut self, shape: InterfaceShape) {
        self.shapes.insert(shape.name.clone(), shape);
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl TypeIntrospector for KnownInterfaces {
    fn interface(&self, name: &str) -> Option<&InterfaceShape> {
        self.shapes.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_parse() {
        let reference = TypeRef::parse("java.util.Map<K, java.util.List<V>>");
        assert_eq!(reference.name, "java.util.Map");
        assert_eq!(reference.arguments, vec!["K", "java.util.List<V>"]);

        let plain = TypeRef::parse("java.lang.Runnable");
        assert!(plain.arguments.is_empty());
    }

    #[test]
    fn test_chain_prefers_first() {
        let mut custom = KnownInterfaces::new();
        custom.insert(InterfaceShape::new("java.lang.Runnable"));
        let chained = custom.chain(KnownInterfaces::builtin());

        let runnable = chained.interface("java.lang.Runnable");
        assert!(runnable.is_some_and(|shape| shape.methods.is_empty()));
        assert!(chained.interface("net.fabricmc.api.ModInitializer").is_some());
        assert!(chained.interface("terrablender.api.TerraBlenderApi").is_none());
    }

    #[test]
    fn test_object_methods() {
        let equals = InterfaceMethod::abstract_method(
            "equals",
            "boolean",
            vec![Parameter::new("Object", "other")],
        );
        let hash = InterfaceMethod::abstract_method("hashCode", "int", Vec::new());
        let run = InterfaceMethod::abstract_method("run", "void", Vec::new());
        assert!(equals.is_object_method());
        assert!(hash.is_object_method());
        assert!(!run.is_object_method());
    }
}
