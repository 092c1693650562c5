use std::fmt::{Display, Formatter};

use super::remote_errors::RemoteError;

/// configuration problems that make a sync run impossible before it starts
#[derive(PartialEq, Debug)]
pub enum ConfigValidationError {
    /// `remote.rootfolderid` is blank
    MissingRootFolderId,
    /// `remote.ingestmode` is `copy` but `remote.destinationfolderid` is blank
    MissingDestinationFolderId,
}

/// errors that abort an entire sync run. Everything below the root folder is
/// recorded in the run's statistics instead
#[derive(PartialEq, Debug)]
pub enum SyncError {
    /// the configuration is unusable
    Config(ConfigValidationError),
    /// the database could not be opened or written to
    DbError,
    /// the root folder could not be listed at all
    RootUnavailable(RemoteError),
}

impl Display for ConfigValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRootFolderId => {
                write!(f, "no root folder id configured (remote.rootfolderid)")
            }
            Self::MissingDestinationFolderId => write!(
                f,
                "ingest mode is copy but no destination folder id is configured (remote.destinationfolderid)"
            ),
        }
    }
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::DbError => write!(f, "the database is unreachable"),
            Self::RootUnavailable(e) => write!(f, "failed to list the root folder: {e}"),
        }
    }
}

impl From<ConfigValidationError> for SyncError {
    fn from(value: ConfigValidationError) -> Self {
        Self::Config(value)
    }
}
