//! Line-oriented descriptor writer (`META-INF/mods.toml`)
//!
//! Lines are emitted by hand rather than through a serializer so the file
//! keeps Forge's conventional layout: top-level loader keys, one
//! `[[mods]]` section, the entry points under `[modproperties.<id>]` and
//! one `[[dependencies.<id>]]` block per dependency. An absent optional
//! field becomes a commented placeholder (`#key=""`). Keys and values are
//! encoded by `toml`.

use crate::types::ModDescriptor;
use crate::version::DependencyRole;
use std::fmt::Write;
use toml::Value;

pub const MODS_TOML_PATH: &str = "META-INF/mods.toml";
pub const FORGE_VERSION_PLACEHOLDER: &str = "${file.jarVersion}";
const MOD_LOADER: &str = "javafml";
const INDENT: &str = "    ";

/// Render the descriptor in the line-oriented format
pub fn render_mods_toml(descriptor: &ModDescriptor) -> String {
    let mut out = LineWriter::default();
    let mod_key = toml_key(&descriptor.mod_id);

    out.field("", "modLoader", Some(MOD_LOADER));
    let loader_version = descriptor
        .dependency(DependencyRole::PlatformRuntime)
        .map(|d| d.range.to_maven());
    out.field("", "loaderVersion", loader_version.as_deref());
    out.field("", "license", Some(&descriptor.license));
    out.field("", "issueTrackerURL", descriptor.contact.issues.as_deref());
    out.blank();

    out.line("[[mods]]");
    out.field(INDENT, "modId", Some(&descriptor.mod_id));
    out.field(
        INDENT,
        "version",
        Some(
            descriptor
                .version
                .as_deref()
                .unwrap_or(FORGE_VERSION_PLACEHOLDER),
        ),
    );
    out.field(INDENT, "displayName", Some(&descriptor.display_name));
    out.field(INDENT, "displayURL", descriptor.contact.display_url());
    out.field(INDENT, "logoFile", Some(&descriptor.icon));
    out.field(INDENT, "credits", descriptor.credits.as_deref());
    let authors = (!descriptor.authors.is_empty()).then(|| descriptor.authors.join(", "));
    out.field(INDENT, "authors", authors.as_deref());
    out.field(INDENT, "description", descriptor.description.as_deref());

    if !descriptor.entrypoints.is_empty() {
        out.blank();
        out.line(&format!("[modproperties.{}]", mod_key));
        for (name, classes) in descriptor.entrypoints.iter() {
            let value = match classes {
                [single] => toml_string(single),
                many => Value::Array(many.iter().map(|c| Value::String(c.clone())).collect())
                    .to_string(),
            };
            out.line(&format!("{INDENT}entrypoints.{}={}", toml_key(name), value));
        }
    }

    if !descriptor.dependencies.is_empty() {
        out.blank();
    }
    for dependency in descriptor
        .dependencies
        .iter()
        .filter(|d| d.role != DependencyRole::Java)
    {
        out.line(&format!("[[dependencies.{}]]", mod_key));
        out.field(INDENT, "modId", Some(&dependency.mod_id));
        out.line(&format!("{INDENT}mandatory=true"));
        out.field(INDENT, "versionRange", Some(&dependency.range.to_maven()));
        out.field(INDENT, "ordering", Some("NONE"));
        out.field(INDENT, "side", Some("BOTH"));
    }

    out.finish()
}

#[derive(Default)]
struct LineWriter {
    buf: String,
}

impl LineWriter {
    fn line(&mut self, text: &str) {
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    fn field(&mut self, indent: &str, key: &str, value: Option<&str>) {
        // Writing into a String cannot fail
        let _ = match value {
            Some(v) => writeln!(self.buf, "{indent}{key}={}", toml_string(v)),
            None => writeln!(self.buf, "{indent}#{key}=\"\""),
        };
    }

    fn finish(self) -> String {
        self.buf
    }
}

fn toml_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

/// Bare keys stay bare, anything else becomes a quoted key
fn toml_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        toml_string(key)
    }
}
