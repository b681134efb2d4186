use crate::common::{OptionArgs, PlatformChoice};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use phantom_config::{keys, load_options, OptionStore};
use serde::Serialize;
use std::collections::BTreeMap;
use std::env;

#[derive(Args, Debug, Clone)]
pub struct OptionsCommand {
    /// Platform(s) whose required keys are checked
    #[arg(short, long, value_enum, default_value_t = PlatformChoice::All)]
    pub platform: PlatformChoice,

    #[command(flatten)]
    pub options: OptionArgs,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OptionsReport {
    pub options: BTreeMap<String, String>,
    /// Required keys per platform with whether each is present
    pub required: BTreeMap<String, BTreeMap<String, bool>>,
    pub unknown: Vec<String>,
}

impl OptionsReport {
    pub fn new(store: &OptionStore, platform: PlatformChoice) -> Self {
        let options: BTreeMap<String, String> = store
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let required = platform
            .platforms()
            .iter()
            .map(|platform| {
                let keys = platform
                    .required_options()
                    .iter()
                    .map(|key| ((*key).to_string(), store.get(key).is_some()))
                    .collect();
                (platform.name().to_string(), keys)
            })
            .collect();
        let unknown = options
            .keys()
            .filter(|key| !keys::is_known(key))
            .cloned()
            .collect();
        OptionsReport {
            options,
            required,
            unknown,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.required
            .values()
            .all(|keys| keys.values().all(|present| *present))
    }
}

pub fn handle_options(cmd: &OptionsCommand) -> Result<OptionsReport> {
    let working_dir = env::current_dir().context("Cannot determine the working directory")?;
    let store = load_options(
        cmd.options.options_file.as_deref(),
        &working_dir,
        &cmd.options.overrides,
    )?;
    let report = OptionsReport::new(&store, cmd.platform);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report);
    }

    println!("{}", "Options:".bold().green());
    if report.options.is_empty() {
        println!("  {}", "(none)".yellow());
    }
    for (key, value) in &report.options {
        let marker = if report.unknown.contains(key) {
            " (unknown)".yellow().to_string()
        } else {
            String::new()
        };
        println!("  {}: {}{}", key.cyan(), value, marker);
    }
    for (platform, keys) in &report.required {
        println!("{}", format!("Required for {platform}:").bold().green());
        for (key, present) in keys {
            let status = if *present { "ok".green() } else { "missing".red() };
            println!("  {}: {}", key.cyan(), status);
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_marks_missing_and_unknown() {
        let store = OptionStore::new([("modId", "example"), ("colour", "blue")]);
        let report = OptionsReport::new(&store, PlatformChoice::Forge);
        assert_eq!(report.unknown, vec!["colour"]);
        let forge = &report.required["forge"];
        assert_eq!(forge.get("modId"), Some(&true));
        assert_eq!(forge.get("forgeVersion"), Some(&false));
        assert!(!report.is_complete());
    }
}
