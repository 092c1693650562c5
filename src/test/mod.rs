use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fs::{remove_dir_all, remove_file};
use std::path::Path;

use rusqlite::Connection;

use crate::model::error::remote_errors::RemoteError;
use crate::model::{RecordSource, TagGroup};
use crate::remote::{EntryKind, Page, RemoteEntry, RemoteStore};
use crate::repository::{initialize_db, open_connection};
use crate::tags::repository as tag_repository;
use crate::tags::{NewTag, Tag};

#[cfg(test)]
pub fn current_thread_name() -> String {
    let current_thread = std::thread::current();
    current_thread.name().unwrap().to_string()
}

/// each test thread gets its own database file so tests can run in parallel
#[cfg(test)]
pub fn db_location() -> String {
    format!("{}.sqlite", current_thread_name())
}

/// directory a test can build a folder tree in
#[cfg(test)]
pub fn tree_dir() -> String {
    format!("./{}_tree", current_thread_name())
}

#[cfg(test)]
pub fn open_test_connection() -> Connection {
    open_connection(&db_location()).unwrap()
}

/// wipes any leftovers from a previous run of the same test and creates a fresh schema
#[cfg(test)]
pub fn init_db_folder() {
    cleanup();
    let con = open_test_connection();
    initialize_db(&con).unwrap();
    con.close().unwrap();
}

#[cfg(test)]
pub fn cleanup() {
    remove_file(Path::new(&db_location())).unwrap_or(());
    let tree = tree_dir();
    if Path::new(&tree).exists() {
        remove_dir_all(&tree).unwrap_or(());
    }
}

/// inserts a tag directly, skipping all the find-or-create logic
#[cfg(test)]
pub fn create_tag_db_entry(
    name: &str,
    slug: &str,
    group: Option<TagGroup>,
    parent_id: Option<u32>,
    source: RecordSource,
    con: &Connection,
) -> Tag {
    tag_repository::create_tag(
        &NewTag {
            name: name.to_string(),
            slug: slug.to_string(),
            group,
            parent_id,
            source,
        },
        con,
    )
    .unwrap()
}

/// An in-memory [`RemoteStore`] for tests.
///
/// Folders are registered with [`FakeRemoteStore::folder`] / [`FakeRemoteStore::file`], listings are served
/// `page_size` entries at a time, and errors can be queued up per folder with [`FakeRemoteStore::fail_next`]
#[cfg(test)]
pub struct FakeRemoteStore {
    children: HashMap<String, Vec<RemoteEntry>>,
    page_size: usize,
    failures: RefCell<HashMap<String, VecDeque<RemoteError>>>,
    list_calls: RefCell<Vec<(String, Option<String>)>>,
    copies: RefCell<Vec<String>>,
}

#[cfg(test)]
impl FakeRemoteStore {
    pub fn new() -> Self {
        let mut children = HashMap::new();
        children.insert("root".to_string(), Vec::new());
        Self {
            children,
            page_size: 100,
            failures: RefCell::new(HashMap::new()),
            list_calls: RefCell::new(Vec::new()),
            copies: RefCell::new(Vec::new()),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// adds a folder named `name` with id `id` under `parent_id`
    pub fn folder(&mut self, parent_id: &str, id: &str, name: &str) -> &mut Self {
        self.children.entry(id.to_string()).or_default();
        self.children
            .entry(parent_id.to_string())
            .or_default()
            .push(RemoteEntry {
                id: id.to_string(),
                name: name.to_string(),
                kind: EntryKind::Folder,
                mime_type: None,
                size: None,
            });
        self
    }

    /// adds a pdf named `name` with id `id` under `parent_id`
    pub fn file(&mut self, parent_id: &str, id: &str, name: &str) -> &mut Self {
        self.children
            .entry(parent_id.to_string())
            .or_default()
            .push(RemoteEntry {
                id: id.to_string(),
                name: name.to_string(),
                kind: EntryKind::File,
                mime_type: Some("application/pdf".to_string()),
                size: Some(1024),
            });
        self
    }

    /// detaches the entry with `id` from wherever it is and puts it under `new_parent_id`
    pub fn move_entry(&mut self, id: &str, new_parent_id: &str) -> &mut Self {
        let mut moved: Option<RemoteEntry> = None;
        for entries in self.children.values_mut() {
            if let Some(index) = entries.iter().position(|e| e.id == id) {
                moved = Some(entries.remove(index));
            }
        }
        let entry = moved.expect("entry to move must exist");
        self.children
            .entry(new_parent_id.to_string())
            .or_default()
            .push(entry);
        self
    }

    /// the next listing of `folder_id` will fail with `error`. Queue several to fail several times
    pub fn fail_next(&self, folder_id: &str, error: RemoteError) {
        self.failures
            .borrow_mut()
            .entry(folder_id.to_string())
            .or_default()
            .push_back(error);
    }

    pub fn list_calls(&self) -> Vec<(String, Option<String>)> {
        self.list_calls.borrow().clone()
    }

    pub fn copies(&self) -> Vec<String> {
        self.copies.borrow().clone()
    }
}

#[cfg(test)]
impl RemoteStore for FakeRemoteStore {
    fn list_children(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page, RemoteError> {
        self.list_calls
            .borrow_mut()
            .push((folder_id.to_string(), page_token.map(str::to_string)));
        if let Some(error) = self
            .failures
            .borrow_mut()
            .get_mut(folder_id)
            .and_then(VecDeque::pop_front)
        {
            return Err(error);
        }
        let entries = self
            .children
            .get(folder_id)
            .ok_or_else(|| RemoteError::NotFound(folder_id.to_string()))?;
        let offset: usize = page_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let page: Vec<RemoteEntry> = entries
            .iter()
            .skip(offset)
            .take(self.page_size)
            .cloned()
            .collect();
        let next = offset + page.len();
        Ok(Page {
            entries: page,
            next_page_token: (next < entries.len()).then(|| next.to_string()),
        })
    }

    fn get_file(&self, file_id: &str) -> Result<RemoteEntry, RemoteError> {
        self.children
            .values()
            .flatten()
            .find(|e| e.id == file_id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(file_id.to_string()))
    }

    fn copy_file(
        &self,
        file_id: &str,
        destination_folder_id: &str,
    ) -> Result<RemoteEntry, RemoteError> {
        let mut copy = self.get_file(file_id)?;
        copy.id = format!("{destination_folder_id}/copy-of-{file_id}");
        self.copies.borrow_mut().push(file_id.to_string());
        Ok(copy)
    }
}
