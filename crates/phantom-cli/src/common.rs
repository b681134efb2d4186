//! Common types and utilities shared across commands

use clap::{Parser, ValueEnum};
use phantom_processor::Platform;
use std::path::PathBuf;

/// Global CLI options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    #[arg(short, long, global = true, help = "Decrease verbosity")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v for debug, -vv for trace)")]
    pub verbose: u8,

    #[arg(long, global = true, value_name = "PATH", help = "Also write log messages to this file")]
    pub log_file: Option<PathBuf>,
}

impl GlobalOpts {
    /// Get the effective verbosity level
    /// - 0: quiet/warn only
    /// - 1: debug (-v)
    /// - 2: trace (-vv)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

/// `--platform` values
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformChoice {
    Fabric,
    Forge,
    #[default]
    All,
}

impl PlatformChoice {
    pub fn platforms(self) -> &'static [Platform] {
        match self {
            PlatformChoice::Fabric => &[Platform::Fabric],
            PlatformChoice::Forge => &[Platform::Forge],
            PlatformChoice::All => &Platform::ALL,
        }
    }
}

/// Where options come from, shared by every command that needs them
#[derive(clap::Args, Debug, Clone, Default)]
pub struct OptionArgs {
    /// Options file (defaults to ./phantom.toml when present)
    #[arg(long = "options", value_name = "FILE")]
    pub options_file: Option<PathBuf>,

    /// Option override, e.g. -A modId=example
    #[arg(short = 'A', value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_wins_over_verbose() {
        let opts = GlobalOpts {
            quiet: true,
            verbose: 2,
            log_file: None,
        };
        assert_eq!(opts.verbosity_level(), 0);
    }

    #[test]
    fn test_platform_choice() {
        assert_eq!(PlatformChoice::All.platforms(), &Platform::ALL);
        assert_eq!(PlatformChoice::Forge.platforms(), &[Platform::Forge]);
    }
}
