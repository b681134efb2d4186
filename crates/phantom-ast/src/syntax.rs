//! Java syntax helpers over ast-grep nodes
//!
//! Node kinds and field names follow the tree-sitter Java grammar.

use ast_grep_core::source::StrDoc;
use ast_grep_core::Node;
use ast_grep_language::Java;
use phantom_processor::Modifier;
use std::collections::BTreeSet;

pub(crate) type JavaNode<'r> = Node<'r, StrDoc<Java>>;

const TYPE_DECLARATIONS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

/// Package and imports of one source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CompilationUnit {
    pub package: String,
    /// Single-type imports as (simple name, qualified name)
    pub imports: Vec<(String, String)>,
    /// Packages imported on demand (`import a.b.*;` is stored as `a.b`)
    pub wildcard_imports: Vec<String>,
}

impl CompilationUnit {
    pub fn read(root: &JavaNode<'_>) -> Self {
        let mut unit = CompilationUnit::default();
        for child in root.children() {
            match &*child.kind() {
                "package_declaration" => {
                    unit.package = statement_body(&child.text(), "package");
                }
                "import_declaration" => unit.add_import(&child.text()),
                _ => {}
            }
        }
        unit
    }

    fn add_import(&mut self, text: &str) {
        let body = statement_body(text, "import");
        // static imports bring in members, not types
        if body.starts_with("static ") {
            return;
        }
        if let Some(package) = body.strip_suffix(".*") {
            self.wildcard_imports.push(package.to_string());
        } else if let Some((_, simple)) = body.rsplit_once('.') {
            self.imports.push((simple.to_string(), body.clone()));
        }
    }

    pub fn imported(&self, simple: &str) -> Option<&str> {
        self.imports
            .iter()
            .find(|(name, _)| name == simple)
            .map(|(_, qualified)| qualified.as_str())
    }

    /// Top-level type name qualified with this file's package
    pub fn qualify(&self, simple: &str) -> String {
        if self.package.is_empty() {
            simple.to_string()
        } else {
            format!("{}.{}", self.package, simple)
        }
    }
}

/// `package a . b;` -> `a.b`, whitespace and the trailing `;` removed
fn statement_body(text: &str, keyword: &str) -> String {
    let body = text.trim().trim_end_matches(';');
    let body = body.strip_prefix(keyword).unwrap_or(body);
    let trimmed = body.trim_start();
    match trimmed.strip_prefix("static") {
        Some(rest) if rest.starts_with(char::is_whitespace) => {
            format!("static {}", strip_whitespace(rest))
        }
        _ => strip_whitespace(trimmed),
    }
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// A type declaration and what its members inherit from it
#[derive(Debug, Clone)]
pub(crate) struct TypeScope {
    pub qualified_name: String,
    pub is_interface: bool,
    /// This type and every enclosing type are accessible from other packages
    pub all_public: bool,
}

/// Visit every named type declaration in document order, outer before inner
pub(crate) fn visit_types<'r>(
    container: &JavaNode<'r>,
    unit: &CompilationUnit,
    outer: Option<&TypeScope>,
    visit: &mut dyn FnMut(&JavaNode<'r>, &TypeScope),
) {
    for child in container.children() {
        let kind = child.kind();
        if kind == "enum_body_declarations" {
            visit_types(&child, unit, outer, visit);
            continue;
        }
        if !TYPE_DECLARATIONS.contains(&&*kind) {
            continue;
        }
        let Some(name) = child.field("name") else {
            continue;
        };
        let qualified_name = match outer {
            Some(scope) => format!("{}.{}", scope.qualified_name, name.text()),
            None => unit.qualify(&name.text()),
        };
        let modifiers = modifiers(&child);
        // member types of interfaces are implicitly public
        let public = modifiers.contains(&Modifier::Public) || outer.is_some_and(|s| s.is_interface);
        let scope = TypeScope {
            qualified_name,
            is_interface: matches!(
                &*kind,
                "interface_declaration" | "annotation_type_declaration"
            ),
            all_public: public && outer.map_or(true, |s| s.all_public),
        };
        visit(&child, &scope);
        if let Some(body) = child.field("body") {
            visit_types(&body, unit, Some(&scope), visit);
        }
    }
}

/// Member declarations of a type body, including those after enum constants
pub(crate) fn members<'r>(body: &JavaNode<'r>) -> Vec<JavaNode<'r>> {
    let mut members = Vec::new();
    for child in body.children() {
        if child.kind() == "enum_body_declarations" {
            members.extend(child.children());
        } else {
            members.push(child);
        }
    }
    members
}

pub(crate) fn child_of_kind<'r>(node: &JavaNode<'r>, kind: &str) -> Option<JavaNode<'r>> {
    node.children().find(|child| child.kind() == kind)
}

/// Modifier keywords written on a declaration
pub(crate) fn modifiers(declaration: &JavaNode<'_>) -> BTreeSet<Modifier> {
    child_of_kind(declaration, "modifiers")
        .map(|node| {
            node.children()
                .filter_map(|child| Modifier::from_keyword(&child.kind()))
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Annotation {
    pub name: String,
    /// Raw source text per element; a lone value is keyed `value`
    pub arguments: Vec<(String, String)>,
}

impl Annotation {
    /// Matches `@Name` and `@any.qualifier.Name`
    pub fn is(&self, simple: &str) -> bool {
        self.name == simple
            || self
                .name
                .rsplit_once('.')
                .is_some_and(|(_, last)| last == simple)
    }

    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

pub(crate) fn annotations(declaration: &JavaNode<'_>) -> Vec<Annotation> {
    let Some(modifiers) = child_of_kind(declaration, "modifiers") else {
        return Vec::new();
    };
    modifiers
        .children()
        .filter(|child| matches!(&*child.kind(), "annotation" | "marker_annotation"))
        .filter_map(|node| {
            let name = strip_whitespace(&node.field("name")?.text());
            let arguments = node
                .field("arguments")
                .map(|list| annotation_arguments(&list))
                .unwrap_or_default();
            Some(Annotation { name, arguments })
        })
        .collect()
}

fn annotation_arguments(list: &JavaNode<'_>) -> Vec<(String, String)> {
    let mut arguments = Vec::new();
    for child in list.children() {
        match &*child.kind() {
            "(" | ")" | "," | "line_comment" | "block_comment" => {}
            "element_value_pair" => {
                if let (Some(key), Some(value)) = (child.field("key"), child.field("value")) {
                    arguments.push((key.text().to_string(), value.text().trim().to_string()));
                }
            }
            _ => arguments.push(("value".to_string(), child.text().trim().to_string())),
        }
    }
    arguments
}

/// Contents of a string literal with the common escapes resolved
///
/// Anything that is not a plain literal (constants, concatenation) is
/// returned as written.
pub(crate) fn string_value(raw: &str) -> String {
    let raw = raw.trim();
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return raw.to_string();
    };
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }
    value
}

/// Count of declared parameters, not counting a receiver parameter
pub(crate) fn parameter_count(declaration: &JavaNode<'_>) -> usize {
    declaration
        .field("parameters")
        .map(|list| {
            list.children()
                .filter(|p| matches!(&*p.kind(), "formal_parameter" | "spread_parameter"))
                .count()
        })
        .unwrap_or(0)
}

/// Collapse whitespace in a type as written, keeping `? super T` readable
pub(crate) fn compact_type(text: &str) -> String {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(joined.len());
    let mut chars = joined.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == ' ' {
            let next = chars.peek().copied();
            let prev = out.chars().last();
            if matches!(next, Some('<' | '>' | ',' | '[' | ']' | '.'))
                || matches!(prev, Some('<' | '.'))
            {
                continue;
            }
        }
        out.push(ch);
    }
    out
}

/// 1-based line of a byte offset
pub(crate) fn line_of(source: &str, offset: usize) -> usize {
    source
        .get(..offset)
        .map_or(0, |prefix| prefix.matches('\n').count())
        + 1
}

pub(crate) fn has_syntax_errors(node: &JavaNode<'_>) -> bool {
    node.kind() == "ERROR" || node.children().any(|child| has_syntax_errors(&child))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast_grep_core::AstGrep;

    #[test]
    fn test_compilation_unit() {
        let source = "package a.b;\nimport c.d.Api;\nimport e.f.*;\nimport static g.H.run;\nclass X {}\n";
        let sg = AstGrep::new(source, Java);
        let unit = CompilationUnit::read(&sg.root());
        assert_eq!(unit.package, "a.b");
        assert_eq!(unit.imported("Api"), Some("c.d.Api"));
        assert_eq!(unit.wildcard_imports, vec!["e.f"]);
        assert_eq!(unit.imports.len(), 1);
        assert_eq!(unit.qualify("X"), "a.b.X");
    }

    #[test]
    fn test_string_value() {
        assert_eq!(string_value("\"modmenu\""), "modmenu");
        assert_eq!(string_value("\"a\\\"b\""), "a\"b");
        assert_eq!(string_value("Names.MENU"), "Names.MENU");
    }

    #[test]
    fn test_compact_type() {
        assert_eq!(compact_type("java.util.Map< String ,\n  Integer >"), "java.util.Map<String, Integer>");
        assert_eq!(compact_type("Consumer<? super T>"), "Consumer<? super T>");
        assert_eq!(compact_type("int [ ]"), "int[]");
    }

    #[test]
    fn test_line_of() {
        let source = "a\nb\nc";
        assert_eq!(line_of(source, 0), 1);
        assert_eq!(line_of(source, 2), 2);
        assert_eq!(line_of(source, 4), 3);
    }

    fn first_of_kind<'r>(node: &JavaNode<'r>, kind: &str) -> Option<JavaNode<'r>> {
        if node.kind() == kind {
            return Some(node.clone());
        }
        node.children().find_map(|child| first_of_kind(&child, kind))
    }

    #[test]
    fn test_annotations_and_modifiers() {
        let source = "class X {\n    @pkg.ModEntryPoint(side = Side.CLIENT)\n    @Marker(\"v\")\n    @Plain\n    public static void m(int a, String... rest) {}\n}\n";
        let sg = AstGrep::new(source, Java);
        let Some(method) = first_of_kind(&sg.root(), "method_declaration") else {
            panic!("method should be parsed");
        };

        let found = annotations(&method);
        assert_eq!(found.len(), 3);
        assert!(found[0].is("ModEntryPoint"));
        assert_eq!(found[0].argument("side"), Some("Side.CLIENT"));
        assert_eq!(found[1].argument("value"), Some("\"v\""));
        assert!(found[2].arguments.is_empty());

        let keywords = modifiers(&method);
        assert!(keywords.contains(&Modifier::Public));
        assert!(keywords.contains(&Modifier::Static));
        assert_eq!(parameter_count(&method), 2);
        assert_eq!(line_of(source, method.range().start), 2);
    }

    #[test]
    fn test_nested_scopes() {
        let source = "package p;\npublic interface Api {\n    class Inner { enum E { A; interface Deep {} } }\n}\nclass Hidden {}\n";
        let sg = AstGrep::new(source, Java);
        let root = sg.root();
        let unit = CompilationUnit::read(&root);
        let mut seen = Vec::new();
        visit_types(&root, &unit, None, &mut |_, scope| {
            seen.push((scope.qualified_name.clone(), scope.is_interface, scope.all_public));
        });
        assert_eq!(
            seen,
            vec![
                ("p.Api".to_string(), true, true),
                ("p.Api.Inner".to_string(), false, true),
                ("p.Api.Inner.E".to_string(), false, false),
                ("p.Api.Inner.E.Deep".to_string(), true, false),
                ("p.Hidden".to_string(), false, false),
            ]
        );
        assert!(!has_syntax_errors(&root));
    }
}
