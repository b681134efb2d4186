//! The per-platform driver
//!
//! A pass is `round` zero or more times, then `finish` exactly once:
//!
//! 1. each round parses, filters and validates the elements it is handed,
//!    recording accepted declarations in the pass catalog
//! 2. `finish` checks required options and earlier declaration errors,
//!    renders every adapter and the descriptor in memory, then writes them
//!
//! Nothing is written unless every artifact rendered, so a failed pass
//! leaves no output behind. Hosts running several passes call
//! [`Processor::render_final`] on each and [`write_artifacts`] once all of
//! them succeeded. A binding error fails the pass for good: every later
//! `round` or final call returns it again.

use crate::adapter::{generate_adapters, AdapterContext};
use crate::binding::{BindingCache, BindingError};
use crate::catalog::EntryPointCatalog;
use crate::descriptor::{assemble_descriptor, descriptor_path, render_descriptor};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::element::{Element, SourceLocation};
use crate::errors::ProcessorError;
use crate::filer::{Filer, GeneratedArtifact};
use crate::introspect::TypeIntrospector;
use crate::platform::Platform;
use crate::spec::{Loader, ParsedAnnotation};
use crate::validator::{Validator, Verdict};
use phantom_config::{keys, OptionStore};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Per-round counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundSummary {
    pub accepted: usize,
    pub rejected: usize,
    /// Restricted to another platform
    pub skipped: usize,
    pub repeated: usize,
}

/// Everything `finish` produced
#[derive(Debug, Clone, Default)]
pub struct PassOutput {
    pub artifacts: Vec<GeneratedArtifact>,
    pub written: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Rounds,
    Finished,
    Failed {
        location: Option<SourceLocation>,
        error: BindingError,
    },
}

/// State accumulated over one pass; dropped with the processor
struct PassContext<'a> {
    catalog: EntryPointCatalog,
    diagnostics: Diagnostics,
    bindings: BindingCache<'a>,
    rounds: usize,
}

pub struct Processor<'a> {
    platform: Platform,
    options: OptionStore,
    validator: Validator,
    context: PassContext<'a>,
    phase: Phase,
}

impl<'a> Processor<'a> {
    /// Start a pass; `options` gains the platform's required keys
    pub fn new(
        platform: Platform,
        options: &OptionStore,
        introspector: &'a dyn TypeIntrospector,
    ) -> Self {
        debug!("Starting {} pass", platform);
        Processor {
            platform,
            options: options.with_required(platform.required_options()),
            validator: Validator::new(platform),
            context: PassContext {
                catalog: EntryPointCatalog::new(),
                diagnostics: Diagnostics::default(),
                bindings: BindingCache::new(introspector),
                rounds: 0,
            },
            phase: Phase::Rounds,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn catalog(&self) -> &EntryPointCatalog {
        &self.context.catalog
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.context.diagnostics.as_slice()
    }

    /// Feed one discovery round
    ///
    /// Declaration errors are recorded and the round continues; a binding
    /// error aborts with `Err` and fails the pass.
    pub fn round(&mut self, elements: &[Element]) -> Result<RoundSummary, ProcessorError> {
        match &self.phase {
            Phase::Rounds => {}
            Phase::Finished => return Err(ProcessorError::RoundAfterFinal),
            Phase::Failed { location, error } => return Err(binding_failure(location, error)),
        }
        self.context.rounds += 1;
        let mut summary = RoundSummary::default();

        for element in elements {
            let parsed = match ParsedAnnotation::parse(&element.annotation) {
                Ok(parsed) => parsed,
                Err(message) => {
                    self.context
                        .diagnostics
                        .error(message, element.location.clone());
                    summary.rejected += 1;
                    continue;
                }
            };

            if !self.applies_to(parsed.loader) {
                debug!(
                    "Skipping {} restricted to {}",
                    element.qualified_name(),
                    parsed.loader
                );
                summary.skipped += 1;
                continue;
            }

            let verdict = match self
                .validator
                .validate(element, &parsed, &mut self.context.bindings)
            {
                Ok(verdict) => verdict,
                Err(error) => {
                    let failure = binding_failure(&element.location, &error);
                    self.phase = Phase::Failed {
                        location: element.location.clone(),
                        error,
                    };
                    return Err(failure);
                }
            };

            match verdict {
                Verdict::Accepted(declaration) => {
                    if self.context.catalog.record(declaration) {
                        summary.accepted += 1;
                    } else {
                        self.context.diagnostics.note(
                            format!("{} was already recorded", element.qualified_name()),
                            element.location.clone(),
                        );
                        summary.repeated += 1;
                    }
                }
                Verdict::Rejected(violations) => {
                    for violation in violations {
                        self.context
                            .diagnostics
                            .error(violation, element.location.clone());
                    }
                    summary.rejected += 1;
                }
                Verdict::Skipped(reason) => {
                    self.context
                        .diagnostics
                        .note(reason, element.location.clone());
                    summary.skipped += 1;
                }
            }
        }

        info!(
            "{} round {}: {} accepted, {} rejected, {} skipped",
            self.platform, self.context.rounds, summary.accepted, summary.rejected, summary.skipped
        );
        Ok(summary)
    }

    /// Run the final round: render everything, then write it through `filer`
    pub fn finish(&mut self, filer: &mut dyn Filer) -> Result<PassOutput, ProcessorError> {
        let artifacts = self.render_final()?;
        let written = write_artifacts(filer, &artifacts)?;
        info!(
            "{} pass generated {} file(s) from {} declaration(s)",
            self.platform,
            written.len(),
            self.context.catalog.len()
        );
        Ok(PassOutput { artifacts, written })
    }

    /// Run the final round without writing anything
    pub fn render_final(&mut self) -> Result<Vec<GeneratedArtifact>, ProcessorError> {
        match &self.phase {
            Phase::Rounds => {}
            Phase::Finished => return Err(ProcessorError::FinalTwice),
            Phase::Failed { location, error } => return Err(binding_failure(location, error)),
        }
        self.phase = Phase::Finished;
        self.render()
    }

    fn applies_to(&self, loader: Loader) -> bool {
        match loader {
            Loader::Common => true,
            Loader::Fabric => self.platform == Platform::Fabric,
            Loader::Forge => self.platform == Platform::Forge,
        }
    }

    fn render(&mut self) -> Result<Vec<GeneratedArtifact>, ProcessorError> {
        self.options.validate()?;
        let errors = self.context.diagnostics.error_count();
        if errors > 0 {
            return Err(ProcessorError::InvalidDeclarations(errors));
        }

        let adapter_context = AdapterContext {
            platform: self.platform,
            package: self.platform.package(
                self.options.require(keys::MOD_GROUP_ID)?,
                self.options.require(keys::MOD_ID)?,
            ),
            mod_id: self.options.require(keys::MOD_ID)?.to_string(),
            registry_call: self
                .options
                .get_or(keys::REGISTRY_CALL, keys::DEFAULT_REGISTRY_CALL)
                .to_string(),
        };
        let adapters = generate_adapters(
            &adapter_context,
            &self.context.catalog,
            &mut self.context.bindings,
        )
        .map_err(|source| ProcessorError::Binding {
            location: None,
            source,
        })?;

        let descriptor = assemble_descriptor(
            self.platform,
            &self.options,
            &adapters,
            &mut self.context.diagnostics,
        )?;
        let rendered = render_descriptor(self.platform, &descriptor)?;

        let mut artifacts: Vec<GeneratedArtifact> = adapters
            .into_iter()
            .map(|adapter| GeneratedArtifact::source(&adapter.package, &adapter.class_name, adapter.source))
            .collect();
        artifacts.push(GeneratedArtifact::resource(
            descriptor_path(self.platform),
            rendered,
        ));
        Ok(artifacts)
    }
}

fn binding_failure(location: &Option<SourceLocation>, error: &BindingError) -> ProcessorError {
    ProcessorError::Binding {
        location: location.clone(),
        source: error.clone(),
    }
}

/// Write rendered artifacts in order
///
/// On a failed write the files already written by this call are discarded.
pub fn write_artifacts(
    filer: &mut dyn Filer,
    artifacts: &[GeneratedArtifact],
) -> Result<Vec<PathBuf>, ProcessorError> {
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        match filer.write(artifact) {
            Ok(path) => written.push(path),
            Err(source) => {
                if let Err(err) = filer.discard(&written) {
                    warn!("Could not remove partial output: {}", err);
                }
                return Err(ProcessorError::Write {
                    path: artifact.output_path(),
                    source,
                });
            }
        }
    }
    Ok(written)
}
