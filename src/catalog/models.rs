use serde::Serialize;

use crate::model::{RecordSource, ResourceStatus};
use crate::tags::Tag;

/// a catalog entry for one file in the remote store
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: u32,
    pub title: String,
    pub description: Option<String>,
    /// the id of the file the resource points at. Unique across the catalog
    pub external_file_id: String,
    /// when the file was copied before cataloging, the id of the file it was copied from
    pub original_external_file_id: Option<String>,
    pub mime_type: Option<String>,
    pub file_size: Option<u64>,
    pub status: ResourceStatus,
    pub source: RecordSource,
    pub uploader_id: Option<u32>,
    pub views: u32,
    pub downloads: u32,
    /// only populated by the calls that say they populate it
    pub tags: Vec<Tag>,
}

/// the values needed to insert a new row into the Resources table
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NewResource {
    pub title: String,
    pub description: Option<String>,
    pub external_file_id: String,
    pub original_external_file_id: Option<String>,
    pub mime_type: Option<String>,
    pub file_size: Option<u64>,
    pub status: ResourceStatus,
    pub source: RecordSource,
    pub uploader_id: Option<u32>,
}

/// what the sync saw of a file on this pass
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FileObservation {
    /// the id the resource should point at
    pub external_id: String,
    /// set when `external_id` is a copy, to the id of the file it was copied from
    pub original_external_id: Option<String>,
    pub title: String,
    pub mime_type: Option<String>,
    pub size: Option<u64>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UpsertOutcome {
    Created(u32),
    Updated(u32),
}

impl UpsertOutcome {
    pub fn resource_id(&self) -> u32 {
        match self {
            Self::Created(id) | Self::Updated(id) => *id,
        }
    }
}
