use colored::Colorize;
use indicatif::ProgressBar;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

static LOG_FILE: Mutex<Option<PathBuf>> = Mutex::new(None);
static VERBOSITY: Mutex<u8> = Mutex::new(0);
static NO_STDOUT: Mutex<bool> = Mutex::new(false);
static CURRENT_PLATFORM: Mutex<Option<String>> = Mutex::new(None);
static SPINNER: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Get the current verbosity level
pub fn get_verbosity() -> u8 {
    VERBOSITY.lock().ok().map(|v| *v).unwrap_or(0)
}

/// Get whether console logging is disabled
pub fn get_no_stdout() -> bool {
    NO_STDOUT.lock().ok().map(|v| *v).unwrap_or(false)
}

/// Set whether console logging is disabled
pub fn set_no_stdout(disabled: bool) {
    if let Ok(mut v) = NO_STDOUT.lock() {
        *v = disabled;
    }
}

/// Get the platform whose generation pass is currently running
pub fn get_current_platform() -> Option<String> {
    CURRENT_PLATFORM.lock().ok().and_then(|guard| guard.clone())
}

/// Set the platform whose generation pass is currently running.
/// Messages are prefixed with it so interleaved passes stay readable.
pub fn set_current_platform(platform: Option<String>) {
    if let Ok(mut v) = CURRENT_PLATFORM.lock() {
        *v = platform;
    }
}

/// Initialize the logger with a verbosity level and an optional log file
///
/// 0 = warnings and errors only, 1 = debug (-v), 2 = trace (-vv).
/// The log file is truncated on each run.
pub fn init_with_verbosity(
    verbosity: u8,
    log_file: Option<&Path>,
    no_stdout: bool,
) -> Result<(), String> {
    if let Ok(mut v) = VERBOSITY.lock() {
        *v = verbosity;
    }

    set_no_stdout(no_stdout);

    match log_file {
        Some(path) => init_log_file(path),
        None => Ok(()),
    }
}

fn init_log_file(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create log directory: {}", e))?;
    }

    if path.exists() {
        let _ = fs::remove_file(path);
    }

    let mut log_file_guard = LOG_FILE
        .lock()
        .map_err(|_| "Log file lock poisoned".to_string())?;
    *log_file_guard = Some(path.to_path_buf());

    Ok(())
}

fn write_to_log(message: &str) {
    if let Ok(log_file_guard) = LOG_FILE.lock() {
        if let Some(ref log_path) = *log_file_guard {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(log_path) {
                let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
                let scope = get_current_platform().unwrap_or_else(|| "phantom".to_string());
                let _ = writeln!(file, "[{}] [{}] {}", timestamp, scope, message);
            }
        }
    }
}

fn with_platform(message: &str) -> String {
    match get_current_platform() {
        Some(platform) => format!("[{}] {}", platform, message),
        None => message.to_string(),
    }
}

/// Log an informational message (to console if verbose >= 1, always to file)
pub fn info(message: &str) {
    write_to_log(&format!("INFO {}", message));
    if get_verbosity() >= 1 && !get_no_stdout() {
        eprintln!("{}", with_platform(message));
    }
}

/// Log a debug message (to console if verbose >= 1, always to file)
pub fn debug(message: &str) {
    write_to_log(&format!("DEBUG {}", message));
    if get_verbosity() >= 1 && !get_no_stdout() {
        eprintln!("{} {}", "DEBUG:".blue().bold(), with_platform(message));
    }
}

/// Log a warning message (to both file and console)
pub fn warn(message: &str) {
    write_to_log(&format!("WARN {}", message));
    if !get_no_stdout() {
        eprintln!("{} {}", "warning:".yellow().bold(), with_platform(message));
    }
}

/// Log an error message (to both file and console)
pub fn error(message: &str) {
    write_to_log(&format!("ERROR {}", message));
    eprintln!("{} {}", "error:".red().bold(), with_platform(message));
}

/// Log a note attached to a previous diagnostic
pub fn note(message: &str) {
    write_to_log(&format!("NOTE {}", message));
    if !get_no_stdout() {
        eprintln!("{} {}", "note:".cyan().bold(), with_platform(message));
    }
}

/// Log a success message (to console only for user feedback)
pub fn success(message: &str) {
    write_to_log(&format!("SUCCESS {}", message));
    if !get_no_stdout() {
        let check = "\u{2714}".green().bold();
        eprintln!("{} {}", check, with_platform(message));
    }
}

/// Log a step message (important user-facing step)
pub fn step(message: &str) {
    if get_verbosity() >= 2 && !get_no_stdout() {
        eprintln!("TRACE: {}", with_platform(message));
    }
    write_to_log(&format!("STEP: {}", message));
}

/// Get the log file path for display
pub fn get_log_path() -> Option<PathBuf> {
    LOG_FILE.lock().ok().and_then(|guard| guard.clone())
}

/// Print the log file path to the user
pub fn show_log_path() {
    if let Some(path) = get_log_path() {
        eprintln!("Log file: {}", path.display());
    }
}

/// Start a spinner with the given message (only if not verbose)
pub fn spinner_start(message: &str) {
    if get_verbosity() > 0 || get_no_stdout() {
        return;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = indicatif::ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.cyan} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner.set_message(message.to_string());

    if let Ok(mut spinner_guard) = SPINNER.lock() {
        *spinner_guard = Some(spinner);
    }
}

/// Complete the spinner with a success message
pub fn spinner_success(message: &str) {
    spinner_stop();
    success(message);
}

/// Stop the spinner with an error message
pub fn spinner_error(message: &str) {
    spinner_stop();
    write_to_log(&format!("ERROR {}", message));
    eprintln!("  {} {}", "✗".red().bold(), with_platform(message));
}

/// Stop the spinner without any message
pub fn spinner_stop() {
    if let Ok(mut spinner_guard) = SPINNER.lock() {
        if let Some(spinner) = spinner_guard.take() {
            spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_prefix() {
        set_current_platform(Some("fabric".to_string()));
        assert_eq!(with_platform("generated 2 adapters"), "[fabric] generated 2 adapters");
        set_current_platform(None);
        assert_eq!(with_platform("generated 2 adapters"), "generated 2 adapters");
    }

    #[test]
    fn test_log_file_is_truncated_and_written() -> Result<(), String> {
        let dir = tempfile::TempDir::new().map_err(|e| e.to_string())?;
        let path = dir.path().join("logs").join("phantom.log");
        fs::write(dir.path().join("stale"), "x").map_err(|e| e.to_string())?;

        init_with_verbosity(0, Some(&path), true)?;
        warn("option modIcon is blank");

        let content = fs::read_to_string(&path).map_err(|e| e.to_string())?;
        assert!(content.contains("WARN option modIcon is blank"));
        Ok(())
    }
}
