use std::fmt::{Display, Formatter};
use std::ops::AddAssign;

use chrono::{DateTime, Utc};

/// counters for a walk, or any part of one
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncStats {
    pub folders_scanned: u64,
    pub files_processed: u64,
    pub files_created: u64,
    pub files_updated: u64,
    pub tags_created: u64,
    pub tags_corrected: u64,
    /// folders and files that were skipped because of an error
    pub errors: u64,
}

/// a finished sync run
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub stats: SyncStats,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// a sync run read back from the run history
#[derive(Debug, Clone, PartialEq)]
pub struct SyncRun {
    pub id: u32,
    pub report: SyncReport,
}

impl AddAssign for SyncStats {
    fn add_assign(&mut self, rhs: Self) {
        self.folders_scanned += rhs.folders_scanned;
        self.files_processed += rhs.files_processed;
        self.files_created += rhs.files_created;
        self.files_updated += rhs.files_updated;
        self.tags_created += rhs.tags_created;
        self.tags_corrected += rhs.tags_corrected;
        self.errors += rhs.errors;
    }
}

impl SyncReport {
    pub fn duration(&self) -> std::time::Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }
}

impl Display for SyncReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let stats = &self.stats;
        // trimmed to whole milliseconds
        let duration = std::time::Duration::from_millis(self.duration().as_millis() as u64);
        writeln!(
            f,
            "Sync started {} and took {}",
            self.started_at.to_rfc3339(),
            humantime::format_duration(duration)
        )?;
        writeln!(f, "  folders scanned: {}", stats.folders_scanned)?;
        writeln!(
            f,
            "  files processed: {} ({} created, {} updated)",
            stats.files_processed, stats.files_created, stats.files_updated
        )?;
        writeln!(
            f,
            "  tags created:    {} ({} corrected)",
            stats.tags_created, stats.tags_corrected
        )?;
        write!(f, "  errors:          {}", stats.errors)
    }
}
