//! Duration formatting and run summary.

use std::time::Duration;

/// Totals shown after a successful bootstrap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps that ran and passed.
    pub steps_run: usize,
    /// Steps skipped because the tool was already installed.
    pub steps_skipped: usize,
    /// Whether the plugin verification ran.
    pub plugins_checked: bool,
    /// Wall-clock time for the whole run.
    pub total_duration: Duration,
}

/// Format a duration for display (e.g. `850ms`, `12.3s`, `4m 05s`).
pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        let secs = d.as_secs();
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}
