//! Declaration validation
//!
//! Rule violations are declaration errors: they are reported and the round
//! goes on. A custom descriptor whose interface cannot be bound is a
//! binding error and stops the pass, on every platform. Forge has no custom
//! entry points, so there a bound custom declaration is skipped.

use crate::binding::{BindingCache, BindingError};
use crate::element::{Element, ElementKind, Modifier};
use crate::platform::Platform;
use crate::spec::{Declaration, EntryPointSpec, Loader, ParsedAnnotation};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted(Declaration),
    /// One message per violated rule
    Rejected(Vec<String>),
    /// Valid, but has no counterpart on this platform
    Skipped(String),
}

#[derive(Debug, Clone, Copy)]
pub struct Validator {
    platform: Platform,
}

impl Validator {
    pub fn new(platform: Platform) -> Self {
        Validator { platform }
    }

    pub fn validate(
        &self,
        element: &Element,
        parsed: &ParsedAnnotation,
        bindings: &mut BindingCache<'_>,
    ) -> Result<Verdict, BindingError> {
        if element.kind != ElementKind::Method {
            return Ok(Verdict::Rejected(vec![format!(
                "@ModEntryPoint can only be applied to methods, found {} {}",
                element.kind, element.name
            )]));
        }

        let mut violations = Vec::new();
        if let Some((name, interface_name)) = &parsed.custom {
            check_custom(name, interface_name, parsed.loader, &mut violations);
        }
        check_method(element, &mut violations);
        if !violations.is_empty() {
            return Ok(Verdict::Rejected(violations));
        }

        let spec = parsed.spec();
        if let EntryPointSpec::Custom(custom) = &spec {
            bindings.resolve(&custom.interface_name)?;
            if !self.platform.supports_custom_entry_points() {
                debug!(
                    "{} has no custom entry points, skipping {}",
                    self.platform,
                    element.qualified_name()
                );
                return Ok(Verdict::Skipped(format!(
                    "{} is the {} entry point, which only exists on Fabric",
                    element.qualified_name(),
                    custom.name
                )));
            }
        }

        Ok(Verdict::Accepted(Declaration {
            owner: element.enclosing_type.clone(),
            member: element.name.clone(),
            side: parsed.side,
            spec,
            location: element.location.clone(),
        }))
    }
}

fn check_custom(name: &str, interface_name: &str, loader: Loader, violations: &mut Vec<String>) {
    let name = name.trim();
    if name.is_empty() {
        violations.push("Custom entry point name must not be blank".to_string());
    } else if !is_entry_point_name(name) {
        violations.push(format!(
            "Custom entry point name '{name}' may only contain letters, digits, '_', '-' and ':'"
        ));
    }
    if !is_qualified_java_name(interface_name.trim()) {
        violations.push(format!(
            "Custom entry point interface '{}' is not a fully-qualified Java name",
            interface_name.trim()
        ));
    }
    if loader == Loader::Forge {
        violations.push(
            "Custom entry points only exist on Fabric and cannot be restricted to Loader.FORGE"
                .to_string(),
        );
    }
}

fn check_method(element: &Element, violations: &mut Vec<String>) {
    let method = element.qualified_name();
    if !element.has(Modifier::Public) {
        violations.push(format!("Entry point method {method} must be public"));
    }
    if !element.has(Modifier::Static) {
        violations.push(format!("Entry point method {method} must be static"));
    }
    if !element.enclosing_public {
        violations.push(format!(
            "Entry point method {method} is declared in a type that is not public"
        ));
    }
    if element.parameter_count > 0 {
        violations.push(format!(
            "Entry point method {method} must not take parameters, found {}",
            element.parameter_count
        ));
    }
}

fn is_entry_point_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ':'))
}

fn is_qualified_java_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
                && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::SourceLocation;
    use crate::introspect::{InterfaceMethod, InterfaceShape, KnownInterfaces};
    use crate::spec::{CustomEntryPoint, Side};

    fn known() -> KnownInterfaces {
        let mut known = KnownInterfaces::builtin();
        known.insert(
            InterfaceShape::new("terrablender.api.TerraBlenderApi").with_method(
                InterfaceMethod::abstract_method("onTerraBlenderInitialized", "void", Vec::new()),
            ),
        );
        known.insert(
            InterfaceShape::new("a.TwoMethods")
                .with_method(InterfaceMethod::abstract_method("first", "void", Vec::new()))
                .with_method(InterfaceMethod::abstract_method("second", "void", Vec::new())),
        );
        known
    }

    fn run(platform: Platform, element: &Element) -> Result<Verdict, BindingError> {
        let known = known();
        let mut bindings = BindingCache::new(&known);
        let parsed = ParsedAnnotation::parse(&element.annotation)
            .map_err(BindingError::Unresolved)?;
        Validator::new(platform).validate(element, &parsed, &mut bindings)
    }

    #[test]
    fn test_accepts_public_static_method() -> Result<(), BindingError> {
        let element = Element::method("pkg.Foo", "bar")
            .with_side("Side.CLIENT")
            .with_location(SourceLocation::new("Foo.java", 3));
        let Verdict::Accepted(declaration) = run(Platform::Fabric, &element)? else {
            panic!("expected the declaration to be accepted");
        };
        assert_eq!(declaration.spec, EntryPointSpec::Ordinary(Side::Client));
        assert_eq!(declaration.location, Some(SourceLocation::new("Foo.java", 3)));
        Ok(())
    }

    #[test]
    fn test_reports_every_violated_rule() -> Result<(), BindingError> {
        let mut element = Element::method("pkg.Foo", "bar").with_modifiers(&[Modifier::Private]);
        element.parameter_count = 2;
        element.enclosing_public = false;

        let Verdict::Rejected(violations) = run(Platform::Fabric, &element)? else {
            panic!("expected the declaration to be rejected");
        };
        assert_eq!(violations.len(), 4);
        assert!(violations[0].contains("must be public"));
        assert!(violations[1].contains("must be static"));
        assert!(violations[2].contains("not public"));
        assert!(violations[3].contains("found 2"));
        Ok(())
    }

    #[test]
    fn test_rejects_non_methods() -> Result<(), BindingError> {
        let mut element = Element::method("pkg.Foo", "FIELD");
        element.kind = ElementKind::Field;
        assert!(matches!(run(Platform::Forge, &element)?, Verdict::Rejected(_)));
        Ok(())
    }

    #[test]
    fn test_custom_annotation_consistency() -> Result<(), BindingError> {
        let element = Element::method("pkg.Foo", "bar")
            .with_custom("bad name!", "not a name")
            .with_loader("Loader.FORGE");
        let Verdict::Rejected(violations) = run(Platform::Forge, &element)? else {
            panic!("expected the declaration to be rejected");
        };
        assert_eq!(violations.len(), 3);
        Ok(())
    }

    #[test]
    fn test_custom_descriptor_binds_on_fabric() -> Result<(), BindingError> {
        let element = Element::method("pkg.Foo", "regions")
            .with_side("Side.CLIENT")
            .with_custom("terrablender", "terrablender.api.TerraBlenderApi");
        let Verdict::Accepted(declaration) = run(Platform::Fabric, &element)? else {
            panic!("expected the declaration to be accepted");
        };
        assert_eq!(
            declaration.spec,
            EntryPointSpec::Custom(CustomEntryPoint::new(
                "terrablender",
                "terrablender.api.TerraBlenderApi"
            ))
        );
        Ok(())
    }

    #[test]
    fn test_custom_descriptor_is_skipped_on_forge() -> Result<(), BindingError> {
        let element = Element::method("pkg.Foo", "regions")
            .with_side("Side.CLIENT")
            .with_custom("terrablender", "terrablender.api.TerraBlenderApi");
        let Verdict::Skipped(reason) = run(Platform::Forge, &element)? else {
            panic!("expected the declaration to be skipped");
        };
        assert!(reason.contains("terrablender"));
        Ok(())
    }

    #[test]
    fn test_unresolved_custom_interface_is_fatal_on_forge() {
        let element = Element::method("pkg.Foo", "regions")
            .with_side("Side.CLIENT")
            .with_custom("terrablender", "does.not.Exist");
        assert_eq!(
            run(Platform::Forge, &element),
            Err(BindingError::Unresolved("does.not.Exist".to_string()))
        );
    }

    #[test]
    fn test_ambiguous_custom_interface_is_fatal() {
        let element = Element::method("pkg.Foo", "bar").with_custom("two", "a.TwoMethods");
        assert!(matches!(
            run(Platform::Fabric, &element),
            Err(BindingError::AmbiguousMethods { .. })
        ));
    }

    #[test]
    fn test_name_checks() {
        assert!(is_entry_point_name("modmenu:api"));
        assert!(!is_entry_point_name("with space"));
        assert!(is_qualified_java_name("terrablender.api.TerraBlenderApi"));
        assert!(!is_qualified_java_name("terrablender..Api"));
        assert!(!is_qualified_java_name("1bad.Name"));
    }
}
