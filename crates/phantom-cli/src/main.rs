use clap::{Parser, Subcommand};
use phantom_cli::commands::{generate, options};
use phantom_cli::{init_logging, GlobalOpts};
use phantom_logger as logger;

#[derive(Parser)]
#[command(name = "phantom")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Mod entry-point generator",
    long_about = "Phantom scans Java sources for @ModEntryPoint methods and generates Fabric and Forge entry-point adapters plus fabric.mod.json / META-INF/mods.toml."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate adapters and descriptors
    Generate(generate::GenerateCommand),
    /// Show the resolved options and each platform's required keys
    Options(options::OptionsCommand),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_verbosity(
        cli.global.verbosity_level(),
        cli.global.log_file.as_deref(),
        false,
    ) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    init_logging(cli.global.verbosity_level());

    match cli.command {
        Commands::Generate(cmd) => {
            if let Err(e) = generate::handle_generate(&cmd) {
                logger::error(&format!("Generation failed: {:#}", e));
                std::process::exit(1);
            }
        }
        Commands::Options(cmd) => match options::handle_options(&cmd) {
            Ok(report) if !report.is_complete() => std::process::exit(2),
            Ok(_) => {}
            Err(e) => {
                logger::error(&format!("Options command failed: {:#}", e));
                std::process::exit(1);
            }
        },
    }
}
