use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use itertools::Itertools;

use super::{EntryKind, Page, RemoteEntry, RemoteStore};
use crate::model::error::remote_errors::RemoteError;

/// the id of the directory the store was opened on
pub const LOCAL_ROOT_ID: &str = ".";

/// A [`RemoteStore`] backed by a directory on disk.
///
/// Ids are paths relative to the base directory, using `/` as the separator, with [`LOCAL_ROOT_ID`]
/// standing for the base itself. Listings are sorted by name and split into pages of `page_size`
/// entries; the page token is the offset of the next entry
pub struct LocalFolderStore {
    base: PathBuf,
    page_size: usize,
}

impl LocalFolderStore {
    pub fn new(base: impl Into<PathBuf>, page_size: usize) -> Self {
        Self {
            base: base.into(),
            page_size: page_size.max(1),
        }
    }

    /// turns an id into a path under the base directory, refusing anything that tries to escape it
    fn resolve(&self, id: &str) -> Result<PathBuf, RemoteError> {
        let relative = Path::new(id);
        let escapes = relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
        if escapes {
            return Err(RemoteError::PermissionDenied(id.to_string()));
        }
        Ok(self.base.join(relative))
    }

    fn to_entry(&self, parent_id: &str, name: &str, path: &Path) -> Result<RemoteEntry, RemoteError> {
        let metadata = fs::metadata(path).map_err(|e| map_io_error(e.kind(), path))?;
        let id = if parent_id == LOCAL_ROOT_ID {
            name.to_string()
        } else {
            format!("{parent_id}/{name}")
        };
        if metadata.is_dir() {
            Ok(RemoteEntry {
                id,
                name: name.to_string(),
                kind: EntryKind::Folder,
                mime_type: None,
                size: None,
            })
        } else {
            Ok(RemoteEntry {
                id,
                name: name.to_string(),
                kind: EntryKind::File,
                mime_type: guess_mime_type(name).map(str::to_string),
                size: Some(metadata.len()),
            })
        }
    }
}

impl RemoteStore for LocalFolderStore {
    fn list_children(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page, RemoteError> {
        let path = self.resolve(folder_id)?;
        let offset: usize = match page_token {
            Some(token) => token
                .parse()
                .map_err(|_| RemoteError::Other(format!("invalid page token {token}")))?,
            None => 0,
        };
        let names: Vec<String> = fs::read_dir(&path)
            .map_err(|e| map_io_error(e.kind(), &path))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .sorted()
            .collect();
        let entries = names
            .iter()
            .skip(offset)
            .take(self.page_size)
            .map(|name| self.to_entry(folder_id, name, &path.join(name)))
            .collect::<Result<Vec<RemoteEntry>, RemoteError>>()?;
        let next = offset + entries.len();
        let next_page_token = if next < names.len() {
            Some(next.to_string())
        } else {
            None
        };
        Ok(Page {
            entries,
            next_page_token,
        })
    }

    fn get_file(&self, file_id: &str) -> Result<RemoteEntry, RemoteError> {
        let path = self.resolve(file_id)?;
        let (parent_id, name) = match file_id.rsplit_once('/') {
            Some((parent, name)) => (parent, name),
            None => (LOCAL_ROOT_ID, file_id),
        };
        self.to_entry(parent_id, name, &path)
    }

    fn copy_file(
        &self,
        file_id: &str,
        destination_folder_id: &str,
    ) -> Result<RemoteEntry, RemoteError> {
        let source = self.resolve(file_id)?;
        let destination_dir = self.resolve(destination_folder_id)?;
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| RemoteError::NotFound(file_id.to_string()))?;
        fs::create_dir_all(&destination_dir).map_err(|e| map_io_error(e.kind(), &destination_dir))?;
        let destination = destination_dir.join(&name);
        fs::copy(&source, &destination).map_err(|e| map_io_error(e.kind(), &source))?;
        self.to_entry(destination_folder_id, &name, &destination)
    }
}

fn map_io_error(kind: ErrorKind, path: &Path) -> RemoteError {
    let display = path.display().to_string();
    match kind {
        ErrorKind::NotFound => RemoteError::NotFound(display),
        ErrorKind::PermissionDenied => RemoteError::PermissionDenied(display),
        ErrorKind::TimedOut => RemoteError::Timeout,
        ErrorKind::Interrupted | ErrorKind::WouldBlock => {
            RemoteError::Transient(format!("{kind:?} on {display}"))
        }
        other => RemoteError::Other(format!("{other:?} on {display}")),
    }
}

/// best guess at a mime type from a file's extension
fn guess_mime_type(name: &str) -> Option<&'static str> {
    let (_, extension) = name.rsplit_once('.')?;
    let mime = match extension.to_ascii_lowercase().as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "txt" => "text/plain",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "zip" => "application/zip",
        "mp4" => "video/mp4",
        _ => return None,
    };
    Some(mime)
}
