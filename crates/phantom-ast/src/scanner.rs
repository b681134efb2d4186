//! Discovery of `@ModEntryPoint` declarations in Java sources

use crate::errors::ScanError;
use crate::sources::java_files;
use crate::syntax::{
    annotations, has_syntax_errors, line_of, members, modifiers, parameter_count, string_value,
    visit_types, Annotation, CompilationUnit, JavaNode, TypeScope,
};
use anyhow::{bail, Context, Result};
use ast_grep_core::AstGrep;
use ast_grep_language::Java;
use phantom_processor::{
    CustomAnnotation, Element, ElementKind, EntryPointAnnotation, Modifier, SourceLocation,
};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const ENTRY_POINT_ANNOTATION: &str = "ModEntryPoint";
pub const CUSTOM_ENTRY_POINT_ANNOTATION: &str = "FabricCustomEntryPoint";

/// Result of scanning one source root
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Annotated members, ordered by file path then line
    pub elements: Vec<Element>,
    /// Files or entries that were skipped
    pub warnings: Vec<String>,
    pub files_scanned: usize,
}

/// Scanner for annotated members below one source root
pub struct EntryPointScanner {
    root: PathBuf,
}

impl EntryPointScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        debug!("Initializing entry point scanner for: {}", root.display());
        EntryPointScanner { root }
    }

    /// Parse every Java file in parallel and collect annotated members
    pub fn scan(&self) -> Result<ScanReport, ScanError> {
        let mut warnings = Vec::new();
        let files = java_files(&self.root, &mut warnings)?;

        let results: Vec<(&PathBuf, Result<Vec<Element>>)> = files
            .par_iter()
            .map(|path| (path, scan_file(path)))
            .collect();

        let mut elements = Vec::new();
        for (path, result) in results {
            match result {
                Ok(mut found) => elements.append(&mut found),
                Err(err) => {
                    debug!("Error scanning file {}: {:#}", path.display(), err);
                    warnings.push(format!("{:#}", err));
                }
            }
        }
        elements.sort_by(|a, b| a.location.cmp(&b.location));

        info!(
            "Scanned {} Java files under {}, found {} annotated members",
            files.len(),
            self.root.display(),
            elements.len()
        );
        Ok(ScanReport {
            elements,
            warnings,
            files_scanned: files.len(),
        })
    }
}

fn scan_file(path: &Path) -> Result<Vec<Element>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    scan_source(path, &content)
}

/// Annotated members of one compilation unit, in document order
pub fn scan_source(path: &Path, content: &str) -> Result<Vec<Element>> {
    let sg = AstGrep::new(content, Java);
    let root = sg.root();
    if has_syntax_errors(&root) {
        bail!("Skipping {}: it does not parse as Java", path.display());
    }

    let unit = CompilationUnit::read(&root);
    let mut elements = Vec::new();
    visit_types(&root, &unit, None, &mut |declaration, scope| {
        let located =
            |node: &JavaNode<'_>| SourceLocation::new(path, line_of(content, node.range().start));

        if let Some(annotation) = entry_point_annotation(declaration) {
            let name = scope
                .qualified_name
                .rsplit('.')
                .next()
                .unwrap_or_default()
                .to_string();
            elements.push(Element {
                kind: ElementKind::Type,
                name,
                enclosing_type: scope.qualified_name.clone(),
                package: unit.package.clone(),
                modifiers: modifiers(declaration),
                parameter_count: 0,
                enclosing_public: scope.all_public,
                annotation,
                location: Some(located(declaration)),
            });
        }

        let Some(body) = declaration.field("body") else {
            return;
        };
        for member in members(&body) {
            let Some(annotation) = entry_point_annotation(&member) else {
                continue;
            };
            let Some((kind, name)) = member_identity(&member) else {
                continue;
            };
            debug!("Found @{} on {}.{}", ENTRY_POINT_ANNOTATION, scope.qualified_name, name);
            elements.push(Element {
                kind,
                name,
                enclosing_type: scope.qualified_name.clone(),
                package: unit.package.clone(),
                modifiers: member_modifiers(&member, kind, scope),
                parameter_count: parameter_count(&member),
                enclosing_public: scope.all_public,
                annotation,
                location: Some(located(&member)),
            });
        }
    });
    Ok(elements)
}

fn member_identity(member: &JavaNode<'_>) -> Option<(ElementKind, String)> {
    let (kind, name) = match &*member.kind() {
        "method_declaration" => (ElementKind::Method, member.field("name")?),
        "constructor_declaration" | "compact_constructor_declaration" => {
            (ElementKind::Constructor, member.field("name")?)
        }
        "field_declaration" | "constant_declaration" => (
            ElementKind::Field,
            member.field("declarator")?.field("name")?,
        ),
        _ => return None,
    };
    Some((kind, name.text().to_string()))
}

/// Written modifiers plus the ones interface members carry implicitly
fn member_modifiers(
    member: &JavaNode<'_>,
    kind: ElementKind,
    scope: &TypeScope,
) -> BTreeSet<Modifier> {
    let mut written = modifiers(member);
    if !scope.is_interface {
        return written;
    }
    match kind {
        ElementKind::Field => {
            written.extend([Modifier::Public, Modifier::Static, Modifier::Final]);
        }
        _ if !written.contains(&Modifier::Private) => {
            written.insert(Modifier::Public);
            if kind == ElementKind::Method
                && !written.contains(&Modifier::Static)
                && !written.contains(&Modifier::Default)
                && member.field("body").is_none()
            {
                written.insert(Modifier::Abstract);
            }
        }
        _ => {}
    }
    written
}

/// The `@ModEntryPoint` payload of a declaration, merged with a sibling
/// `@FabricCustomEntryPoint` if present
fn entry_point_annotation(declaration: &JavaNode<'_>) -> Option<EntryPointAnnotation> {
    let found = annotations(declaration);
    let entry = found.iter().find(|a| a.is(ENTRY_POINT_ANNOTATION))?;
    let custom = found
        .iter()
        .find(|a| a.is(CUSTOM_ENTRY_POINT_ANNOTATION))
        .map(custom_annotation);
    Some(EntryPointAnnotation {
        side: entry
            .argument("side")
            .or_else(|| entry.argument("value"))
            .map(str::to_string),
        mod_loader: entry.argument("modLoader").map(str::to_string),
        custom,
    })
}

fn custom_annotation(annotation: &Annotation) -> CustomAnnotation {
    CustomAnnotation {
        name: annotation
            .argument("name")
            .or_else(|| annotation.argument("value"))
            .map(string_value),
        interface_name: annotation.argument("interfaceName").map(string_value),
    }
}
