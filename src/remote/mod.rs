//! The folder tree being synced lives in a store we do not own. Everything the sync needs from it
//! goes through [`RemoteStore`], so the walker never knows (or cares) whether the tree is a
//! cloud drive or a directory on disk.

use crate::model::error::remote_errors::RemoteError;

pub mod local;
mod pacing;


pub use pacing::Pacing;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EntryKind {
    Folder,
    File,
}

/// a single child of a remote folder
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RemoteEntry {
    /// the opaque id assigned by the remote store
    pub id: String,
    /// the name as the remote store reports it, untrimmed
    pub name: String,
    pub kind: EntryKind,
    pub mime_type: Option<String>,
    /// in bytes; only present for files
    pub size: Option<u64>,
}

/// one page of a folder listing. `next_page_token` is `None` on the last page
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Page {
    pub entries: Vec<RemoteEntry>,
    pub next_page_token: Option<String>,
}

pub trait RemoteStore {
    /// lists one page of the direct children of `folder_id`. Pass the previous page's
    /// `next_page_token` to continue the listing
    fn list_children(&self, folder_id: &str, page_token: Option<&str>)
        -> Result<Page, RemoteError>;

    /// fetches a single file's current details
    fn get_file(&self, file_id: &str) -> Result<RemoteEntry, RemoteError>;

    /// copies `file_id` into `destination_folder_id`, returning the new copy
    fn copy_file(
        &self,
        file_id: &str,
        destination_folder_id: &str,
    ) -> Result<RemoteEntry, RemoteError>;
}

impl RemoteEntry {
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}
