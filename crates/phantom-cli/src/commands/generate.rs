use crate::common::{OptionArgs, PlatformChoice};
use crate::errors::CliError;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use phantom_ast::{EntryPointScanner, ScanReport, SourceTypeIndex, TypeIndexBuilder};
use phantom_config::{load_options, OptionStore};
use phantom_logger as logger;
use phantom_processor::{
    write_artifacts, Diagnostic, Filer, FsFiler, GeneratedArtifact, KnownInterfaces, Platform,
    Processor, ProcessorError, Severity, TypeIntrospector,
};
use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;
use tracing::debug;

#[derive(Args, Debug, Clone)]
pub struct GenerateCommand {
    /// Loader(s) to generate for
    #[arg(short, long, value_enum, default_value_t = PlatformChoice::All)]
    pub platform: PlatformChoice,

    /// Source root to scan for @ModEntryPoint; each root is one discovery round
    #[arg(short, long = "source", value_name = "DIR", required = true)]
    pub sources: Vec<PathBuf>,

    /// Extra source roots that only contribute interface declarations
    #[arg(long = "interfaces", value_name = "DIR")]
    pub interfaces: Vec<PathBuf>,

    #[command(flatten)]
    pub options: OptionArgs,

    /// Output directory; with several platforms each gets a subdirectory
    #[arg(short, long, value_name = "DIR")]
    pub out: PathBuf,
}

/// Files written per platform
#[derive(Debug, Clone, Default)]
pub struct GenerateSummary {
    pub written: Vec<(Platform, Vec<PathBuf>)>,
}

pub fn handle_generate(cmd: &GenerateCommand) -> Result<GenerateSummary> {
    if cmd.sources.is_empty() {
        return Err(CliError::NoSources.into());
    }
    if cmd.out.exists() && !cmd.out.is_dir() {
        return Err(CliError::OutputNotADirectory(cmd.out.clone()).into());
    }

    let working_dir = env::current_dir().context("Cannot determine the working directory")?;
    let store = load_options(
        cmd.options.options_file.as_deref(),
        &working_dir,
        &cmd.options.overrides,
    )?;

    logger::spinner_start("Scanning Java sources");
    let scanned = scan_rounds(&cmd.sources)
        .and_then(|rounds| index_interfaces(cmd).map(|index| (rounds, index)));
    let (rounds, index) = match scanned {
        Ok(found) => {
            logger::spinner_success("Scanned Java sources");
            found
        }
        Err(err) => {
            logger::spinner_error("Scanning failed");
            return Err(err);
        }
    };

    let introspector = KnownInterfaces::builtin().chain(&index);
    let platforms = cmd.platform.platforms();
    let mut rendered = Vec::with_capacity(platforms.len());
    for &platform in platforms {
        logger::set_current_platform(Some(platform.to_string()));
        let result = run_pass(platform, &store, &introspector, &rounds);
        logger::set_current_platform(None);
        rendered.push((platform, result?));
    }

    // nothing is written until every pass rendered
    let mut summary = GenerateSummary::default();
    let mut filers: Vec<FsFiler> = Vec::with_capacity(rendered.len());
    for (platform, artifacts) in rendered {
        let out = if platforms.len() > 1 {
            cmd.out.join(platform.name())
        } else {
            cmd.out.clone()
        };
        let mut filer = FsFiler::new(&out);
        let written = match write_artifacts(&mut filer, &artifacts) {
            Ok(written) => written,
            Err(source) => {
                for (earlier, (_, paths)) in filers.iter_mut().zip(&summary.written) {
                    if let Err(err) = earlier.discard(paths) {
                        logger::warn(&format!("Could not remove partial output: {err}"));
                    }
                }
                return Err(CliError::PassFailed { platform, source }.into());
            }
        };
        logger::success(&format!(
            "{}: wrote {} file(s) to {}",
            platform,
            written.len(),
            out.display()
        ));
        summary.written.push((platform, written));
        filers.push(filer);
    }
    Ok(summary)
}

fn scan_rounds(sources: &[PathBuf]) -> Result<Vec<ScanReport>> {
    let mut rounds = Vec::with_capacity(sources.len());
    for root in sources {
        let report = EntryPointScanner::new(root)
            .scan()
            .with_context(|| format!("Failed to scan {}", root.display()))?;
        for warning in &report.warnings {
            logger::warn(warning);
        }
        logger::debug(&format!(
            "{}: {} annotated member(s) in {} file(s)",
            root.display(),
            report.elements.len(),
            report.files_scanned
        ));
        rounds.push(report);
    }
    Ok(rounds)
}

/// Interfaces from the source roots plus any `--interfaces` roots
fn index_interfaces(cmd: &GenerateCommand) -> Result<SourceTypeIndex> {
    let mut builder = TypeIndexBuilder::new();
    for root in &cmd.sources {
        builder
            .add_root(root)
            .with_context(|| format!("Failed to index {}", root.display()))?;
    }
    // source-root warnings were already reported by the scan
    let already_reported: BTreeSet<String> = builder.warnings().iter().cloned().collect();
    for root in &cmd.interfaces {
        builder
            .add_root(root)
            .with_context(|| format!("Failed to index {}", root.display()))?;
    }
    for warning in builder.warnings() {
        if !already_reported.contains(warning) {
            logger::warn(warning);
        }
    }
    let index = builder.build();
    debug!("Source type index holds {} interfaces", index.len());
    Ok(index)
}

/// One platform's rounds and final render, nothing written
fn run_pass(
    platform: Platform,
    store: &OptionStore,
    introspector: &dyn TypeIntrospector,
    rounds: &[ScanReport],
) -> Result<Vec<GeneratedArtifact>> {
    let mut processor = Processor::new(platform, store, introspector);
    let result = drive(&mut processor, rounds);
    report_diagnostics(processor.diagnostics());
    result.map_err(|source| CliError::PassFailed { platform, source }.into())
}

fn drive(
    processor: &mut Processor<'_>,
    rounds: &[ScanReport],
) -> Result<Vec<GeneratedArtifact>, ProcessorError> {
    for report in rounds {
        processor.round(&report.elements)?;
    }
    processor.render_final()
}

fn report_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        let line = diagnostic.to_string();
        match diagnostic.severity {
            Severity::Error => logger::error(&line),
            Severity::Warning => logger::warn(&line),
            Severity::Note => logger::debug(&line),
        }
    }
    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    if errors > 0 {
        logger::note(&format!("{} {}", errors, "declaration error(s)".red()));
    }
}
