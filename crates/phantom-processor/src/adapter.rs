//! Adapter source generation
//!
//! One Java class per non-empty side group and per custom descriptor. Each
//! class implements the bound interface method and calls its declarations
//! in discovery order, always through fully-qualified names so generated
//! sources never import user types. Forge additionally gets the
//! `ForgeInitializer` bootstrap that wires the side adapters together.

use crate::binding::{BindingCache, BindingError, MethodBinding};
use crate::catalog::EntryPointCatalog;
use crate::platform::Platform;
use crate::spec::{CustomEntryPoint, Declaration, Side};
use ahash::AHashSet;
use phantom_manifest::EntryPoints;
use tracing::debug;

pub const FORGE_BOOTSTRAP_CLASS: &str = "ForgeInitializer";
pub const FORGE_BOOTSTRAP_ENTRY: &str = "main";

const INDENT: &str = "    ";

/// A generated adapter class and where it is registered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterSource {
    pub package: String,
    pub class_name: String,
    /// Descriptor entry-point name
    pub entry_name: String,
    pub source: String,
}

impl AdapterSource {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.package, self.class_name)
    }
}

/// Inputs shared by every adapter of one pass
#[derive(Debug, Clone)]
pub struct AdapterContext {
    pub platform: Platform,
    pub package: String,
    pub mod_id: String,
    /// Static method the Forge bootstrap hands the mod event bus to
    pub registry_call: String,
}

/// Render every adapter for the catalog, side groups first
pub fn generate_adapters(
    context: &AdapterContext,
    catalog: &EntryPointCatalog,
    bindings: &mut BindingCache<'_>,
) -> Result<Vec<AdapterSource>, BindingError> {
    let mut adapters = Vec::new();
    let mut side_bindings = Vec::new();
    let mut used_names = AHashSet::new();

    for (side, declarations) in catalog.sides() {
        let template = context.platform.template(side);
        let binding = bindings.resolve(template.interface)?;
        let wrap_in_work_queue =
            context.platform == Platform::Forge && matches!(side, Side::Client | Side::Server);
        let source = render_adapter(
            &context.package,
            template.class_name,
            &binding,
            declarations,
            wrap_in_work_queue,
        );
        used_names.insert(template.class_name.to_string());
        adapters.push(AdapterSource {
            package: context.package.clone(),
            class_name: template.class_name.to_string(),
            entry_name: template.entry_name.to_string(),
            source,
        });
        side_bindings.push((side, binding));
    }

    for (custom, declarations) in catalog.custom() {
        let binding = bindings.resolve(&custom.interface_name)?;
        let class_name = custom_class_name(custom, &binding, &mut used_names);
        debug!("Custom entry point {} -> {}", custom, class_name);
        let source = render_adapter(&context.package, &class_name, &binding, declarations, false);
        adapters.push(AdapterSource {
            package: context.package.clone(),
            entry_name: custom.name.clone(),
            class_name,
            source,
        });
    }

    if context.platform == Platform::Forge {
        let bootstrap = AdapterSource {
            package: context.package.clone(),
            class_name: FORGE_BOOTSTRAP_CLASS.to_string(),
            entry_name: FORGE_BOOTSTRAP_ENTRY.to_string(),
            source: render_forge_bootstrap(context, &side_bindings),
        };
        adapters.insert(0, bootstrap);
    }

    Ok(adapters)
}

/// Entry-point block for the descriptor, in adapter order
pub fn entry_points(adapters: &[AdapterSource]) -> EntryPoints {
    let mut entry_points = EntryPoints::default();
    for adapter in adapters {
        entry_points.push(&adapter.entry_name, adapter.qualified_name());
    }
    entry_points
}

/// `Fabric<CamelCase(name)>EntryPoint`, disambiguated by interface then counter
fn custom_class_name(
    custom: &CustomEntryPoint,
    binding: &MethodBinding,
    used: &mut AHashSet<String>,
) -> String {
    let camel = camel_case(&custom.name);
    let simple = binding
        .interface_name
        .rsplit('.')
        .next()
        .unwrap_or(&binding.interface_name);

    let mut candidate = format!("Fabric{camel}EntryPoint");
    if used.contains(&candidate) {
        candidate = format!("Fabric{camel}{simple}EntryPoint");
    }
    let base = candidate.clone();
    let mut counter = 2;
    while used.contains(&candidate) {
        candidate = format!("{base}{counter}");
        counter += 1;
    }
    used.insert(candidate.clone());
    candidate
}

fn camel_case(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect()
}

fn render_adapter(
    package: &str,
    class_name: &str,
    binding: &MethodBinding,
    declarations: &[Declaration],
    wrap_in_work_queue: bool,
) -> String {
    let parameters: Vec<(String, String)> = binding
        .parameters
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let name = if p.name.is_empty() {
                format!("arg{i}")
            } else {
                p.name.clone()
            };
            (p.ty.clone(), name)
        })
        .collect();
    let signature = parameters
        .iter()
        .map(|(ty, name)| format!("{ty} {name}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = JavaWriter::default();
    out.line(&format!("package {package};"));
    out.blank();
    out.open(&format!(
        "public class {class_name} implements {} {{",
        binding.implements
    ));
    out.blank();
    out.line("@Override");
    out.open(&format!(
        "public {} {}({signature}) {{",
        binding.return_type, binding.method_name
    ));
    let queue = parameters.first().filter(|_| wrap_in_work_queue);
    if let Some((_, event)) = queue {
        out.open(&format!("{event}.enqueueWork(() -> {{"));
    }
    for declaration in declarations {
        out.line(&format!("{};", declaration.call()));
    }
    if queue.is_some() {
        out.close("});");
    }
    out.close("}");
    out.close("}");
    out.finish()
}

fn render_forge_bootstrap(context: &AdapterContext, side_bindings: &[(Side, MethodBinding)]) -> String {
    let package = &context.package;
    let adapter = |side: Side| {
        side_bindings
            .iter()
            .find(|(s, _)| *s == side)
            .map(|(_, binding)| (context.platform.template(side).class_name, binding))
    };

    let mut out = JavaWriter::default();
    out.line(&format!("package {package};"));
    out.blank();
    out.line(&format!(
        "@net.minecraftforge.fml.common.Mod({})",
        java_string(&context.mod_id)
    ));
    out.open(&format!("public class {FORGE_BOOTSTRAP_CLASS} {{"));
    out.blank();
    out.open(&format!("public {FORGE_BOOTSTRAP_CLASS}() {{"));
    out.line("net.minecraftforge.eventbus.api.IEventBus eventBus = net.minecraftforge.fml.javafmlmod.FMLJavaModLoadingContext.get().getModEventBus();");
    if let Some((class_name, binding)) = adapter(Side::Init) {
        out.line(&format!("new {package}.{class_name}().{}();", binding.method_name));
    }
    out.line(&format!("{}(eventBus);", context.registry_call.trim()));
    if let Some((class_name, binding)) = adapter(Side::Common) {
        out.line(&format!("new {package}.{class_name}().{}();", binding.method_name));
    }
    for side in [Side::Client, Side::Server] {
        if let Some((class_name, _)) = adapter(side) {
            out.line(&format!("eventBus.addListener(new {package}.{class_name}());"));
        }
    }
    out.line("net.minecraftforge.common.MinecraftForge.EVENT_BUS.register(this);");
    out.close("}");
    out.close("}");
    out.finish()
}

fn java_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[derive(Default)]
struct JavaWriter {
    buf: String,
    depth: usize,
}

impl JavaWriter {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.buf.push_str(INDENT);
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    fn open(&mut self, text: &str) {
        self.line(text);
        self.depth += 1;
    }

    fn close(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::{InterfaceMethod, InterfaceShape, KnownInterfaces};
    use crate::spec::EntryPointSpec;

    fn declaration(owner: &str, member: &str, spec: EntryPointSpec) -> Declaration {
        Declaration {
            owner: owner.to_string(),
            member: member.to_string(),
            side: Side::Common,
            spec,
            location: None,
        }
    }

    fn context(platform: Platform) -> AdapterContext {
        AdapterContext {
            platform,
            package: platform.package("com.example", "test"),
            mod_id: "test".to_string(),
            registry_call: "io.github.phantomloader.library.forge.registry.ForgeRegistry.registerAll"
                .to_string(),
        }
    }

    fn known() -> KnownInterfaces {
        let mut known = KnownInterfaces::builtin();
        for name in ["terrablender.api.TerraBlenderApi", "other.api.TerraBlenderApi"] {
            known.insert(InterfaceShape::new(name).with_method(InterfaceMethod::abstract_method(
                "onTerraBlenderInitialized",
                "void",
                Vec::new(),
            )));
        }
        known
    }

    #[test]
    fn test_fabric_common_adapter() -> Result<(), BindingError> {
        let known = known();
        let mut bindings = BindingCache::new(&known);
        let mut catalog = EntryPointCatalog::new();
        catalog.record(declaration("pkg.Foo", "bar", EntryPointSpec::Ordinary(Side::Common)));

        let adapters = generate_adapters(&context(Platform::Fabric), &catalog, &mut bindings)?;
        assert_eq!(adapters.len(), 1);
        let expected = "package com.example.test.fabric;

public class FabricInitializer implements net.fabricmc.api.ModInitializer {

    @Override
    public void onInitialize() {
        pkg.Foo.bar();
    }
}
";
        assert_eq!(adapters[0].source, expected);
        assert_eq!(
            adapters[0].qualified_name(),
            "com.example.test.fabric.FabricInitializer"
        );
        assert_eq!(adapters[0].entry_name, "main");
        Ok(())
    }

    #[test]
    fn test_forge_client_adapter_enqueues_work() -> Result<(), BindingError> {
        let known = known();
        let mut bindings = BindingCache::new(&known);
        let mut catalog = EntryPointCatalog::new();
        catalog.record(declaration("pkg.Foo", "first", EntryPointSpec::Ordinary(Side::Client)));
        catalog.record(declaration("pkg.Bar", "second", EntryPointSpec::Ordinary(Side::Client)));

        let adapters = generate_adapters(&context(Platform::Forge), &catalog, &mut bindings)?;
        let client = adapters
            .iter()
            .find(|a| a.class_name == "ForgeClientInitializer")
            .map(|a| a.source.as_str())
            .unwrap_or_default();
        let expected = "package com.example.test.forge;

public class ForgeClientInitializer implements java.util.function.Consumer<net.minecraftforge.fml.event.lifecycle.FMLClientSetupEvent> {

    @Override
    public void accept(net.minecraftforge.fml.event.lifecycle.FMLClientSetupEvent t) {
        t.enqueueWork(() -> {
            pkg.Foo.first();
            pkg.Bar.second();
        });
    }
}
";
        assert_eq!(client, expected);
        Ok(())
    }

    #[test]
    fn test_forge_bootstrap_wires_side_adapters() -> Result<(), BindingError> {
        let known = known();
        let mut bindings = BindingCache::new(&known);
        let mut catalog = EntryPointCatalog::new();
        catalog.record(declaration("pkg.Foo", "early", EntryPointSpec::Ordinary(Side::Init)));
        catalog.record(declaration("pkg.Foo", "common", EntryPointSpec::Ordinary(Side::Common)));
        catalog.record(declaration("pkg.Foo", "server", EntryPointSpec::Ordinary(Side::Server)));

        let adapters = generate_adapters(&context(Platform::Forge), &catalog, &mut bindings)?;
        assert_eq!(adapters[0].class_name, FORGE_BOOTSTRAP_CLASS);
        let expected = "package com.example.test.forge;

@net.minecraftforge.fml.common.Mod(\"test\")
public class ForgeInitializer {

    public ForgeInitializer() {
        net.minecraftforge.eventbus.api.IEventBus eventBus = net.minecraftforge.fml.javafmlmod.FMLJavaModLoadingContext.get().getModEventBus();
        new com.example.test.forge.ForgeEarlyInitializer().run();
        io.github.phantomloader.library.forge.registry.ForgeRegistry.registerAll(eventBus);
        new com.example.test.forge.ForgeCommonInitializer().run();
        eventBus.addListener(new com.example.test.forge.ForgeServerInitializer());
        net.minecraftforge.common.MinecraftForge.EVENT_BUS.register(this);
    }
}
";
        assert_eq!(adapters[0].source, expected);

        let names: Vec<&str> = adapters.iter().map(|a| a.entry_name.as_str()).collect();
        assert_eq!(names, vec!["main", "init", "common", "server"]);
        Ok(())
    }

    #[test]
    fn test_forge_bootstrap_is_emitted_for_empty_catalog() -> Result<(), BindingError> {
        let known = known();
        let mut bindings = BindingCache::new(&known);
        let adapters = generate_adapters(
            &context(Platform::Forge),
            &EntryPointCatalog::new(),
            &mut bindings,
        )?;
        assert_eq!(adapters.len(), 1);
        assert!(!adapters[0].source.contains(".run();"));

        let fabric = generate_adapters(
            &context(Platform::Fabric),
            &EntryPointCatalog::new(),
            &mut bindings,
        )?;
        assert!(fabric.is_empty());
        Ok(())
    }

    #[test]
    fn test_custom_adapters_merge_and_disambiguate() -> Result<(), BindingError> {
        let known = known();
        let mut bindings = BindingCache::new(&known);
        let mut catalog = EntryPointCatalog::new();
        let first = CustomEntryPoint::new("terrablender", "terrablender.api.TerraBlenderApi");
        let second = CustomEntryPoint::new("terrablender", "other.api.TerraBlenderApi");
        catalog.record(declaration("pkg.A", "one", EntryPointSpec::Custom(first.clone())));
        catalog.record(declaration("pkg.B", "two", EntryPointSpec::Custom(second)));
        catalog.record(declaration("pkg.C", "three", EntryPointSpec::Custom(first)));

        let adapters = generate_adapters(&context(Platform::Fabric), &catalog, &mut bindings)?;
        let classes: Vec<&str> = adapters.iter().map(|a| a.class_name.as_str()).collect();
        assert_eq!(
            classes,
            vec![
                "FabricTerrablenderEntryPoint",
                "FabricTerrablenderTerraBlenderApiEntryPoint"
            ]
        );
        assert!(adapters[0].source.contains("pkg.A.one();\n        pkg.C.three();"));

        let entry_points = entry_points(&adapters);
        assert_eq!(entry_points.len(), 1);
        assert_eq!(entry_points.get("terrablender").map(<[String]>::len), Some(2));
        Ok(())
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("terrablender"), "Terrablender");
        assert_eq!(camel_case("mod-menu:api_v2"), "ModMenuApiV2");
    }
}
