//! Java source discovery using ast-grep
//!
//! This crate feeds the processor from plain source trees:
//! 1. [`EntryPointScanner`] walks a source root, parses each `.java` file
//!    with ast-grep and reports every member annotated `@ModEntryPoint` as
//!    an [`Element`](phantom_processor::Element), ordered by path and line
//! 2. [`TypeIndexBuilder`] reads interface declarations from any number of
//!    roots into a [`SourceTypeIndex`], the introspector custom entry
//!    points are bound against
//!
//! Files are parsed in parallel; results are always delivered in path order.

pub mod errors;
pub mod scanner;
mod sources;
mod syntax;
pub mod type_index;

pub use errors::ScanError;
pub use scanner::{scan_source, EntryPointScanner, ScanReport};
pub use type_index::{SourceTypeIndex, TypeIndexBuilder};
