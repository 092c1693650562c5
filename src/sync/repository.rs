use rusqlite::Connection;

use crate::sync::stats::{SyncReport, SyncRun, SyncStats};

/// appends a finished run to the run history, returning its id
pub fn create_run(report: &SyncReport, con: &Connection) -> Result<u32, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/sync_runs/create_run.sql"))?;
    let stats = &report.stats;
    let id = pst.insert(rusqlite::params![
        report.started_at,
        report.finished_at,
        stats.folders_scanned,
        stats.files_processed,
        stats.files_created,
        stats.files_updated,
        stats.tags_created,
        stats.tags_corrected,
        stats.errors
    ])?;
    Ok(id as u32)
}

/// the most recent run, if there ever was one
pub fn get_latest_run(con: &Connection) -> Result<Option<SyncRun>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/sync_runs/get_latest_run.sql"
    ))?;
    match pst.query_row([], run_mapper) {
        Ok(run) => Ok(Some(run)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

fn run_mapper(row: &rusqlite::Row) -> Result<SyncRun, rusqlite::Error> {
    Ok(SyncRun {
        id: row.get(0)?,
        report: SyncReport {
            started_at: row.get(1)?,
            finished_at: row.get(2)?,
            stats: SyncStats {
                folders_scanned: row.get(3)?,
                files_processed: row.get(4)?,
                files_created: row.get(5)?,
                files_updated: row.get(6)?,
                tags_created: row.get(7)?,
                tags_corrected: row.get(8)?,
                errors: row.get(9)?,
            },
        },
    })
}
