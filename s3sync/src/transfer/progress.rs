//! Coarse progress reporting for uploads and downloads.

use tracing::info;

/// Logs the transfer percentage whenever it crosses a 10% step. Purely
/// observational; transfer correctness never depends on it.
#[derive(Debug, Default)]
pub struct ProgressLogger {
    last_step: Option<u64>,
}

impl ProgressLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, done: u64, total: u64) {
        let percent = if total > 0 { done * 100 / total } else { 100 };
        let step = percent / 10;
        if self.last_step != Some(step) {
            self.last_step = Some(step);
            info!("  {percent}% completed");
        }
    }
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}
