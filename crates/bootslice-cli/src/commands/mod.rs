pub mod build;
pub mod dependencies;
pub mod detect;
pub mod inspect;
pub mod slice;

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_FILESYSTEM_ERROR: u8 = 3;
pub const EXIT_DETECT_FAIL: u8 = 100;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Exit code for an error message produced by a command handler.
pub fn exit_code_for(msg: &str) -> u8 {
    if msg.starts_with("manifest error:") || msg.starts_with("failed to read manifest") {
        EXIT_MANIFEST_ERROR
    } else if msg.starts_with("slice error:")
        || msg.starts_with("failed to walk")
        || msg.starts_with("failed to hash")
        || msg.starts_with("I/O error:")
    {
        EXIT_FILESYSTEM_ERROR
    } else {
        EXIT_FAILURE
    }
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .map(|s| s.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]))
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn finish(pb: &ProgressBar, msg: String) {
    if let Ok(style) = ProgressStyle::with_template("{msg}") {
        pb.set_style(style);
    }
    pb.finish_with_message(msg);
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    finish(pb, format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    finish(pb, format!("✗ {msg}"));
}

/// Spinner that only exists for human-readable output.
pub fn maybe_spinner(json: bool, msg: &str) -> Option<ProgressBar> {
    if json {
        None
    } else {
        Some(spinner(msg))
    }
}

pub fn colorize_slice(name: &str) -> String {
    use console::Style;
    match name {
        "launch" => Style::new().cyan().apply_to(name).to_string(),
        "dependency" | "dependencies" => Style::new().green().apply_to(name).to_string(),
        "snapshot-dependency" | "snapshot-dependencies" => {
            Style::new().yellow().apply_to(name).to_string()
        }
        "application" => Style::new().blue().bold().apply_to(name).to_string(),
        "remainder" => Style::new().dim().apply_to(name).to_string(),
        other => Style::new().bold().apply_to(other).to_string(),
    }
}
