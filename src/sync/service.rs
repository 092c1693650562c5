use std::backtrace::Backtrace;

use chrono::Utc;
use rusqlite::Connection;

use crate::config::{IngestMode, SyncConfig};
use crate::model::error::sync_errors::SyncError;
use crate::remote::{Pacing, RemoteStore};
use crate::sync::repository as run_repository;
use crate::sync::walker::TreeWalker;
use crate::sync::{SyncReport, SyncRun};

/// Runs one full sync of the configured root folder against `store`.
///
/// The run is refused up front if the configuration is unusable, and aborted if the root can't be listed.
/// Otherwise it always completes, and its counters are appended to the run history
pub fn run_sync<S: RemoteStore + ?Sized>(
    config: &SyncConfig,
    store: &S,
    con: &Connection,
) -> Result<SyncReport, SyncError> {
    config.validate()?;
    let root = config.remote.root_folder_id.trim();
    log::info!(
        "Starting sync of folder {root} in {:?} mode",
        config.remote.ingest_mode
    );
    let started_at = Utc::now();
    let mut walker = TreeWalker::new(
        store,
        con,
        Pacing::from(&config.pacing),
        config.walker.max_depth,
    );
    if config.remote.ingest_mode == IngestMode::Copy {
        // validate() already guarantees a destination in copy mode
        if let Some(destination) = &config.remote.destination_folder_id {
            walker = walker.with_copy_ingest(destination.trim());
        }
    }
    let stats = walker.walk(root)?;
    let report = SyncReport {
        stats,
        started_at,
        finished_at: Utc::now(),
    };
    if let Err(e) = run_repository::create_run(&report, con) {
        log::error!(
            "Failed to record the sync run. Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        return Err(SyncError::DbError);
    }
    if report.stats.errors > 0 {
        log::warn!("{report}");
    } else {
        log::info!("{report}");
    }
    Ok(report)
}

/// the most recent sync run, for reporting
pub fn latest_run(con: &Connection) -> Result<Option<SyncRun>, SyncError> {
    run_repository::get_latest_run(con).map_err(|e| {
        log::error!(
            "Failed to retrieve the latest sync run. Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        SyncError::DbError
    })
}
