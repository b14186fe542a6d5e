//! Transfer progress tracking

use std::time::{Duration, Instant};

/// Byte counter and clock for one transfer
pub struct TransferProgress {
    transferred_bytes: u64,
    start_time: Instant,
}

impl TransferProgress {
    pub fn start() -> Self {
        Self {
            transferred_bytes: 0,
            start_time: Instant::now(),
        }
    }

    /// Add bytes to current progress
    pub fn add_bytes(&mut self, bytes: usize) {
        self.transferred_bytes += bytes as u64;
    }

    pub fn transferred_bytes(&self) -> u64 {
        self.transferred_bytes
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Format bytes as human readable
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Format a transfer rate as human readable
pub fn format_speed(bytes: u64, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return "- B/s".to_string();
    }
    format!("{}/s", format_bytes((bytes as f64 / secs) as u64))
}
