//! Interface shapes read from Java sources
//!
//! Custom entry points name an interface by its qualified name. The index
//! records every interface declared in the scanned roots with its methods
//! and super-interfaces. Type names in signatures are qualified through
//! the declaring file's imports so the generated adapter can spell them
//! from any package.

use crate::errors::ScanError;
use crate::sources::java_files;
use crate::syntax::{
    child_of_kind, compact_type, has_syntax_errors, members, modifiers, visit_types,
    CompilationUnit, JavaNode,
};
use anyhow::{bail, Context, Result};
use ast_grep_core::AstGrep;
use ast_grep_language::Java;
use phantom_processor::{
    InterfaceMethod, InterfaceShape, MethodKind, Modifier, Parameter, TypeIntrospector, TypeRef,
};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const PRIMITIVES: &[&str] = &[
    "void", "boolean", "byte", "char", "short", "int", "long", "float", "double",
];

/// Interfaces declared in source, keyed by qualified name
#[derive(Debug, Clone, Default)]
pub struct SourceTypeIndex {
    shapes: BTreeMap<String, InterfaceShape>,
}

impl SourceTypeIndex {
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shapes.keys().map(String::as_str)
    }
}

impl TypeIntrospector for SourceTypeIndex {
    fn interface(&self, name: &str) -> Option<&InterfaceShape> {
        self.shapes.get(name)
    }
}

/// An interface as written, before names are resolved
#[derive(Debug, Clone)]
struct DeclaredInterface {
    unit: CompilationUnit,
    qualified_name: String,
    type_parameters: Vec<String>,
    methods: Vec<InterfaceMethod>,
    super_interfaces: Vec<String>,
}

#[derive(Debug, Default)]
struct FileTypes {
    interfaces: Vec<DeclaredInterface>,
    declared: Vec<String>,
}

/// Collects declarations from any number of roots, then resolves them together
#[derive(Debug, Default)]
pub struct TypeIndexBuilder {
    interfaces: Vec<DeclaredInterface>,
    declared: BTreeSet<String>,
    warnings: Vec<String>,
}

impl TypeIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every Java file below `root`; returns the number of files read
    pub fn add_root(&mut self, root: &Path) -> Result<usize, ScanError> {
        let files = java_files(root, &mut self.warnings)?;
        let results: Vec<(&PathBuf, Result<FileTypes>)> = files
            .par_iter()
            .map(|path| (path, read_file(path)))
            .collect();
        for (path, result) in results {
            match result {
                Ok(types) => self.absorb(types),
                Err(err) => {
                    debug!("Error indexing {}: {:#}", path.display(), err);
                    self.warnings.push(format!("{:#}", err));
                }
            }
        }
        Ok(files.len())
    }

    pub fn add_source(&mut self, path: &Path, content: &str) -> Result<()> {
        let types = read_source(path, content)?;
        self.absorb(types);
        Ok(())
    }

    fn absorb(&mut self, types: FileTypes) {
        self.declared.extend(types.declared);
        self.interfaces.extend(types.interfaces);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn build(self) -> SourceTypeIndex {
        let mut shapes = BTreeMap::new();
        for declared in &self.interfaces {
            let resolver = Resolver {
                unit: &declared.unit,
                scope: &declared.qualified_name,
                declared: &self.declared,
                type_parameters: &declared.type_parameters,
            };
            let shape = InterfaceShape {
                name: declared.qualified_name.clone(),
                type_parameters: declared.type_parameters.clone(),
                methods: declared
                    .methods
                    .iter()
                    .map(|method| InterfaceMethod {
                        name: method.name.clone(),
                        return_type: resolver.qualify_type(&method.return_type),
                        parameters: method
                            .parameters
                            .iter()
                            .map(|p| Parameter::new(resolver.qualify_type(&p.ty), p.name.clone()))
                            .collect(),
                        kind: method.kind,
                    })
                    .collect(),
                super_interfaces: declared
                    .super_interfaces
                    .iter()
                    .map(|reference| TypeRef::parse(&resolver.qualify_type(reference)))
                    .collect(),
            };
            if shapes.insert(shape.name.clone(), shape).is_some() {
                debug!("Interface {} is declared more than once", declared.qualified_name);
            }
        }
        info!("Indexed {} source interfaces", shapes.len());
        SourceTypeIndex { shapes }
    }
}

fn read_file(path: &Path) -> Result<FileTypes> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    read_source(path, &content)
}

fn read_source(path: &Path, content: &str) -> Result<FileTypes> {
    let sg = AstGrep::new(content, Java);
    let root = sg.root();
    if has_syntax_errors(&root) {
        bail!("Skipping {}: it does not parse as Java", path.display());
    }

    let unit = CompilationUnit::read(&root);
    let mut types = FileTypes::default();
    visit_types(&root, &unit, None, &mut |declaration, scope| {
        types.declared.push(scope.qualified_name.clone());
        if declaration.kind() != "interface_declaration" {
            return;
        }
        types.interfaces.push(DeclaredInterface {
            unit: unit.clone(),
            qualified_name: scope.qualified_name.clone(),
            type_parameters: type_parameters(declaration),
            methods: declaration
                .field("body")
                .map(|body| {
                    members(&body)
                        .iter()
                        .filter(|member| member.kind() == "method_declaration")
                        .filter_map(interface_method)
                        .collect()
                })
                .unwrap_or_default(),
            super_interfaces: super_interfaces(declaration),
        });
    });
    Ok(types)
}

fn type_parameters(declaration: &JavaNode<'_>) -> Vec<String> {
    child_of_kind(declaration, "type_parameters")
        .map(|list| {
            list.children()
                .filter(|p| p.kind() == "type_parameter")
                .filter_map(|p| child_of_kind(&p, "type_identifier").map(|id| id.text().to_string()))
                .collect()
        })
        .unwrap_or_default()
}

fn super_interfaces(declaration: &JavaNode<'_>) -> Vec<String> {
    child_of_kind(declaration, "extends_interfaces")
        .and_then(|extends| child_of_kind(&extends, "type_list"))
        .map(|list| {
            list.children()
                .filter(|t| t.kind() != ",")
                .map(|t| compact_type(&t.text()))
                .collect()
        })
        .unwrap_or_default()
}

fn interface_method(member: &JavaNode<'_>) -> Option<InterfaceMethod> {
    let written = modifiers(member);
    let kind = if written.contains(&Modifier::Private) {
        MethodKind::Private
    } else if written.contains(&Modifier::Static) {
        MethodKind::Static
    } else if written.contains(&Modifier::Default) {
        MethodKind::Default
    } else {
        MethodKind::Abstract
    };
    let parameters = member
        .field("parameters")?
        .children()
        .filter_map(|p| match &*p.kind() {
            "formal_parameter" => Some(Parameter::new(
                compact_type(&p.field("type")?.text()),
                p.field("name")?.text().to_string(),
            )),
            "spread_parameter" => {
                let text = compact_type(&p.text());
                let (ty, name) = text.rsplit_once(' ')?;
                Some(Parameter::new(ty.trim(), name.trim()))
            }
            _ => None,
        })
        .collect();
    Some(InterfaceMethod {
        name: member.field("name")?.text().to_string(),
        return_type: compact_type(&member.field("type")?.text()),
        parameters,
        kind,
    })
}

/// Qualifies simple type names as seen from one interface declaration
struct Resolver<'a> {
    unit: &'a CompilationUnit,
    scope: &'a str,
    declared: &'a BTreeSet<String>,
    type_parameters: &'a [String],
}

impl Resolver<'_> {
    /// Qualify every type name inside a type expression
    fn qualify_type(&self, ty: &str) -> String {
        let mut out = String::with_capacity(ty.len());
        let mut token = String::new();
        for ch in ty.chars() {
            if ch.is_alphanumeric() || matches!(ch, '_' | '$' | '.') {
                token.push(ch);
                continue;
            }
            self.flush(&mut token, &mut out);
            out.push(ch);
        }
        self.flush(&mut token, &mut out);
        out
    }

    fn flush(&self, token: &mut String, out: &mut String) {
        if token.is_empty() {
            return;
        }
        // `...` of a varargs type ends up in the token
        let (name, dots) = match token.find("...") {
            Some(at) => token.split_at(at),
            None => (token.as_str(), ""),
        };
        out.push_str(&self.qualify_name(name));
        out.push_str(dots);
        token.clear();
    }

    fn qualify_name(&self, name: &str) -> String {
        if name.is_empty()
            || PRIMITIVES.contains(&name)
            || matches!(name, "extends" | "super")
            || self.type_parameters.iter().any(|p| p == name)
        {
            return name.to_string();
        }
        let (head, rest) = match name.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (name, None),
        };
        let Some(resolved) = self.resolve_simple(head) else {
            return name.to_string();
        };
        match rest {
            Some(rest) => format!("{resolved}.{rest}"),
            None => resolved,
        }
    }

    /// Nested scopes, then explicit imports, then the package, then on-demand imports
    fn resolve_simple(&self, simple: &str) -> Option<String> {
        let mut scope = Some(self.scope);
        while let Some(current) = scope {
            let candidate = format!("{current}.{simple}");
            if self.declared.contains(&candidate) {
                return Some(candidate);
            }
            if current.rsplit('.').next() == Some(simple) && self.declared.contains(current) {
                return Some(current.to_string());
            }
            scope = current
                .rsplit_once('.')
                .map(|(parent, _)| parent)
                .filter(|parent| *parent != self.unit.package && !parent.is_empty());
        }
        if let Some(imported) = self.unit.imported(simple) {
            return Some(imported.to_string());
        }
        let same_package = self.unit.qualify(simple);
        if self.declared.contains(&same_package) {
            return Some(same_package);
        }
        self.unit
            .wildcard_imports
            .iter()
            .map(|package| format!("{package}.{simple}"))
            .find(|candidate| self.declared.contains(candidate))
    }
}
