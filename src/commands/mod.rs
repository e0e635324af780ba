//! Command handlers. Each builds its filter from already parsed arguments,
//! drives the fetchers and prints the result.

pub mod chart;
pub mod configure;
pub mod hours;
pub mod task;

use crate::ui::{self, Table};
use chrono::{DateTime, Local, Utc};
use std::path::{Path, PathBuf};

/// Cap on fetched records: `None` fetches everything.
///
pub fn fetch_limit(all: bool, limit: usize) -> Option<usize> {
    if all {
        None
    } else {
        Some(limit)
    }
}

/// Summary line printed after a listing.
///
pub fn fetched_summary(count: usize, noun: &str, has_more: bool) -> String {
    let mut summary = format!("Fetched {} {}", count, noun);
    if has_more {
        summary.push_str(", has more");
    }
    summary
}

pub fn format_local(time: &DateTime<Utc>, format: &str) -> String {
    time.with_timezone(&Local).format(format).to_string()
}

pub fn format_hours(hours: f64) -> String {
    format!("{:.1} h", hours)
}

/// Write the table as CSV. A failed export only warns, the listing was
/// already printed.
///
pub fn export(table: &Table, outfile: &Path) {
    let path = std::env::current_dir()
        .map(|dir| dir.join(outfile))
        .unwrap_or_else(|_| PathBuf::from(outfile));
    match table.export_csv(&path) {
        Ok(()) => ui::info(format!("Data exported to CSV file {}", path.display())),
        Err(e) => ui::warn(format!("Could not export to CSV: {}", e)),
    }
}
