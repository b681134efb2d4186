//! Entry-point processing for Phantom mods
//!
//! A [`Processor`] runs one pass for one [`Platform`]. Discovery rounds hand
//! it annotated [`Element`]s; it validates them, catalogs the accepted
//! declarations by side or custom descriptor, and on the final round renders
//! the platform adapters plus the loader descriptor through a [`Filer`].
//!
//! Interface shapes for custom entry points come from a
//! [`TypeIntrospector`], so the same pipeline works against parsed sources
//! or a fixed table.

pub mod adapter;
pub mod binding;
pub mod catalog;
pub mod descriptor;
pub mod diagnostics;
pub mod element;
pub mod errors;
pub mod filer;
pub mod introspect;
pub mod platform;
pub mod processor;
pub mod spec;
pub mod validator;

pub use binding::{BindingCache, BindingError, MethodBinding};
pub use catalog::EntryPointCatalog;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use element::{CustomAnnotation, Element, ElementKind, EntryPointAnnotation, Modifier, SourceLocation};
pub use errors::ProcessorError;
pub use filer::{ArtifactKind, Filer, FsFiler, GeneratedArtifact, MemoryFiler};
pub use introspect::{
    InterfaceMethod, InterfaceShape, KnownInterfaces, MethodKind, Parameter, TypeIntrospector,
    TypeRef,
};
pub use platform::Platform;
pub use processor::{write_artifacts, PassOutput, Processor, RoundSummary};
pub use spec::{CustomEntryPoint, Declaration, EntryPointSpec, Loader, Side};
