use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::model::error::sync_errors::ConfigValidationError;

static CONFIG_FILE: &str = "./CatalogSync.toml";

#[derive(Deserialize, Clone, Debug)]
pub struct DbConfig {
    pub location: String,
}

/// how files found during a sync end up in the catalog
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IngestMode {
    /// the resource points at the file where it already lives
    Reference,
    /// the file is copied into the destination folder first, and the resource points at the copy
    Copy,
}

/// config properties for the remote folder tree being synced
#[derive(Deserialize, Clone, Debug)]
pub struct RemoteConfig {
    #[serde(rename = "rootfolderid")]
    pub root_folder_id: String,
    #[serde(rename = "destinationfolderid")]
    pub destination_folder_id: Option<String>,
    #[serde(rename = "ingestmode")]
    pub ingest_mode: IngestMode,
    /// directory on disk backing the folder tree
    #[serde(rename = "localroot")]
    pub local_root: String,
    #[serde(rename = "pagesize")]
    pub page_size: usize,
}

/// delays applied around every remote call
#[derive(Deserialize, Clone, Debug)]
pub struct PacingConfig {
    #[serde(rename = "calldelaymillis")]
    pub call_delay_millis: u64,
    #[serde(rename = "backoffmillis")]
    pub backoff_millis: u64,
    #[serde(rename = "maxretries")]
    pub max_retries: u32,
}

#[derive(Deserialize, Clone, Debug)]
pub struct WalkerConfig {
    #[serde(rename = "maxdepth")]
    pub max_depth: usize,
}

/// config properties for the whole of this application
#[derive(Deserialize, Clone, Debug)]
pub struct SyncConfig {
    pub database: DbConfig,
    pub remote: RemoteConfig,
    pub pacing: PacingConfig,
    pub walker: WalkerConfig,
}

impl PacingConfig {
    pub fn call_delay(&self) -> Duration {
        Duration::from_millis(self.call_delay_millis)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_millis)
    }
}

impl SyncConfig {
    /// checks for the configuration problems that must stop a run before anything is written
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.remote.root_folder_id.trim().is_empty() {
            return Err(ConfigValidationError::MissingRootFolderId);
        }
        let has_destination = self
            .remote
            .destination_folder_id
            .as_ref()
            .is_some_and(|id| !id.trim().is_empty());
        if self.remote.ingest_mode == IngestMode::Copy && !has_destination {
            return Err(ConfigValidationError::MissingDestinationFolderId);
        }
        Ok(())
    }
}

/// Parses the config file located at ./CatalogSync.toml, if it exists, layering `CATALOG_SYNC_*`
/// environment variables on top (e.g. `CATALOG_SYNC_REMOTE__ROOTFOLDERID`).
///
/// A missing file is fine and leaves every value at its default; a malformed one is returned as an error
pub fn load_config() -> Result<SyncConfig, ConfigError> {
    if !std::path::Path::new(CONFIG_FILE).exists() {
        log::warn!("No config file found at {CONFIG_FILE}. Continuing with defaults...");
    }
    let settings = Config::builder()
        .set_default("database.location", "./catalog.sqlite")?
        .set_default("remote.rootfolderid", "")?
        .set_default("remote.ingestmode", "reference")?
        .set_default("remote.localroot", "./files")?
        .set_default("remote.pagesize", 100)?
        .set_default("pacing.calldelaymillis", 100)?
        .set_default("pacing.backoffmillis", 5_000)?
        .set_default("pacing.maxretries", 5)?
        .set_default("walker.maxdepth", 20)?
        .add_source(File::with_name(CONFIG_FILE).required(false))
        .add_source(Environment::with_prefix("CATALOG_SYNC").separator("__"))
        .build()?;
    settings.try_deserialize()
}

#[cfg(test)]
pub fn test_config() -> SyncConfig {
    SyncConfig {
        database: DbConfig {
            location: format!("{}.sqlite", crate::test::current_thread_name()),
        },
        remote: RemoteConfig {
            root_folder_id: "root".to_string(),
            destination_folder_id: None,
            ingest_mode: IngestMode::Reference,
            local_root: "./files".to_string(),
            page_size: 100,
        },
        pacing: PacingConfig {
            call_delay_millis: 0,
            backoff_millis: 0,
            max_retries: 3,
        },
        walker: WalkerConfig { max_depth: 20 },
    }
}

#[cfg(test)]
mod tests {
    use super::{test_config, IngestMode};
    use crate::model::error::sync_errors::ConfigValidationError;

    #[test]
    fn validate_accepts_reference_mode_without_destination() {
        assert_eq!(Ok(()), test_config().validate());
    }

    #[test]
    fn validate_rejects_blank_root() {
        let mut config = test_config();
        config.remote.root_folder_id = "  ".to_string();
        assert_eq!(
            Err(ConfigValidationError::MissingRootFolderId),
            config.validate()
        );
    }

    #[test]
    fn validate_requires_destination_in_copy_mode() {
        let mut config = test_config();
        config.remote.ingest_mode = IngestMode::Copy;
        assert_eq!(
            Err(ConfigValidationError::MissingDestinationFolderId),
            config.validate()
        );
        config.remote.destination_folder_id = Some("dest".to_string());
        assert_eq!(Ok(()), config.validate());
    }
}
