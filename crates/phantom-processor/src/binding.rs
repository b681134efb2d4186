//! Single-method interface binding
//!
//! An adapter implements exactly one abstract method of its interface. The
//! method is found with Java's functional-interface rules:
//! - `default`, `static` and `private` methods are not abstract
//! - `equals`, `hashCode` and `toString` redeclarations are not counted
//! - abstract methods of known super-interfaces count, with type
//!   arguments substituted down the hierarchy
//! - a `default` method in a sub-interface hides the abstract one it overrides
//!
//! Resolutions are cached per interface reference for the whole pass.

use crate::introspect::{InterfaceMethod, InterfaceShape, MethodKind, Parameter, TypeIntrospector, TypeRef};
use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const ERASED: &str = "java.lang.Object";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("Cannot resolve interface {0}")]
    Unresolved(String),

    #[error("Interface {0} has no abstract method to implement")]
    NoAbstractMethod(String),

    #[error(
        "Interface {interface} has {} abstract methods ({}), expected exactly one",
        .methods.len(),
        .methods.join(", ")
    )]
    AmbiguousMethods {
        interface: String,
        methods: Vec<String>,
    },

    #[error("Method {method} of interface {interface} returns {return_type}, adapters can only implement void methods")]
    NonVoid {
        interface: String,
        method: String,
        return_type: String,
    },
}

/// The resolved method an adapter overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodBinding {
    /// Fully-qualified interface name without type arguments
    pub interface_name: String,
    /// Text for the `implements` clause, type arguments included
    pub implements: String,
    pub method_name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: String,
}

/// Per-pass cache of interface resolutions
pub struct BindingCache<'a> {
    introspector: &'a dyn TypeIntrospector,
    resolved: AHashMap<String, Result<MethodBinding, BindingError>>,
}

impl<'a> BindingCache<'a> {
    pub fn new(introspector: &'a dyn TypeIntrospector) -> Self {
        BindingCache {
            introspector,
            resolved: AHashMap::new(),
        }
    }

    /// Resolve `reference`, e.g. `java.util.function.Consumer<a.Event>`
    pub fn resolve(&mut self, reference: &str) -> Result<MethodBinding, BindingError> {
        let reference = reference.trim();
        if let Some(cached) = self.resolved.get(reference) {
            return cached.clone();
        }
        let result = resolve_uncached(self.introspector, reference);
        match &result {
            Ok(binding) => debug!(
                "Bound {} to {}({})",
                reference,
                binding.method_name,
                binding.parameters.len()
            ),
            Err(e) => debug!("Binding {} failed: {}", reference, e),
        }
        self.resolved.insert(reference.to_string(), result.clone());
        result
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

fn resolve_uncached(
    introspector: &dyn TypeIntrospector,
    reference: &str,
) -> Result<MethodBinding, BindingError> {
    let type_ref = TypeRef::parse(reference);
    let shape = introspector
        .interface(&type_ref.name)
        .ok_or_else(|| BindingError::Unresolved(type_ref.name.clone()))?;

    let mut walk = AbstractMethods::default();
    walk.collect(introspector, shape, &type_ref.arguments);

    match walk.methods.as_slice() {
        [] => Err(BindingError::NoAbstractMethod(type_ref.name)),
        [method] if method.return_type != "void" => Err(BindingError::NonVoid {
            interface: type_ref.name,
            method: method.name.clone(),
            return_type: method.return_type.clone(),
        }),
        [method] => Ok(MethodBinding {
            implements: reference.to_string(),
            interface_name: type_ref.name,
            method_name: method.name.clone(),
            parameters: method.parameters.clone(),
            return_type: method.return_type.clone(),
        }),
        many => Err(BindingError::AmbiguousMethods {
            interface: type_ref.name,
            methods: many.iter().map(|m| m.name.clone()).collect(),
        }),
    }
}

#[derive(Default)]
struct AbstractMethods {
    methods: Vec<InterfaceMethod>,
    hidden: Vec<(String, Vec<String>)>,
    visited: AHashSet<String>,
}

impl AbstractMethods {
    fn collect(
        &mut self,
        introspector: &dyn TypeIntrospector,
        shape: &InterfaceShape,
        arguments: &[String],
    ) {
        if !self.visited.insert(shape.name.clone()) {
            return;
        }
        let substitutions: Vec<(&str, &str)> = shape
            .type_parameters
            .iter()
            .enumerate()
            .map(|(i, param)| {
                (
                    param.as_str(),
                    arguments.get(i).map_or(ERASED, String::as_str),
                )
            })
            .collect();

        for method in &shape.methods {
            let method = substitute_method(method, &substitutions);
            let sig = signature(&method);
            match method.kind {
                MethodKind::Default => self.hidden.push(sig),
                MethodKind::Abstract if method.is_object_method() => {}
                MethodKind::Abstract => {
                    let known = self.methods.iter().any(|m| signature(m) == sig);
                    if !known && !self.hidden.contains(&sig) {
                        self.methods.push(method);
                    }
                }
                MethodKind::Static | MethodKind::Private => {}
            }
        }

        for parent in &shape.super_interfaces {
            let Some(parent_shape) = introspector.interface(&parent.name) else {
                debug!(
                    "Super-interface {} of {} is unknown, skipping",
                    parent.name, shape.name
                );
                continue;
            };
            let parent_arguments: Vec<String> = parent
                .arguments
                .iter()
                .map(|arg| substitute_type(arg, &substitutions))
                .collect();
            self.collect(introspector, parent_shape, &parent_arguments);
        }
    }
}

fn signature(method: &InterfaceMethod) -> (String, Vec<String>) {
    (
        method.name.clone(),
        method.parameters.iter().map(|p| p.ty.clone()).collect(),
    )
}

fn substitute_method(method: &InterfaceMethod, substitutions: &[(&str, &str)]) -> InterfaceMethod {
    InterfaceMethod {
        name: method.name.clone(),
        return_type: substitute_type(&method.return_type, substitutions),
        parameters: method
            .parameters
            .iter()
            .map(|p| Parameter::new(substitute_type(&p.ty, substitutions), p.name.clone()))
            .collect(),
        kind: method.kind,
    }
}

/// Replace whole-word type variables in a type expression
pub fn substitute_type(ty: &str, substitutions: &[(&str, &str)]) -> String {
    if substitutions.is_empty() {
        return ty.to_string();
    }
    let mut out = String::with_capacity(ty.len());
    let mut word = String::new();
    let mut qualified = false;

    let flush = |word: &mut String, out: &mut String, qualified: bool| {
        if word.is_empty() {
            return;
        }
        let replacement = substitutions
            .iter()
            .find(|(param, _)| !qualified && *param == word.as_str())
            .map(|(_, arg)| *arg);
        out.push_str(replacement.unwrap_or(word.as_str()));
        word.clear();
    };

    for ch in ty.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == '$' {
            if word.is_empty() {
                qualified = out.ends_with('.');
            }
            word.push(ch);
        } else {
            flush(&mut word, &mut out, qualified);
            out.push(ch);
        }
    }
    flush(&mut word, &mut out, qualified);
    out
}
