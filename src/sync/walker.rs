use std::backtrace::Backtrace;

use rusqlite::Connection;

use crate::catalog::service as catalog_service;
use crate::catalog::{FileObservation, UpsertOutcome};
use crate::classifier::{classify, normalize_name};
use crate::model::error::remote_errors::RemoteError;
use crate::model::error::sync_errors::SyncError;
use crate::model::TagGroup;
use crate::remote::{Pacing, Page, RemoteEntry, RemoteStore};
use crate::sync::context::HierarchyContext;
use crate::sync::stats::SyncStats;
use crate::tags::service::ensure_tag;
use crate::tags::EnsureOutcome;

/// Walks a remote folder tree depth-first, turning folders into tags and files into resources.
///
/// Only a failure to list the root aborts the walk. Anything that goes wrong further down is logged,
/// counted in [`SyncStats::errors`], and the folder or file it happened on is skipped
pub struct TreeWalker<'a, S: RemoteStore + ?Sized> {
    store: &'a S,
    con: &'a Connection,
    pacing: Pacing,
    max_depth: usize,
    /// `Some` when files are copied into this folder before being cataloged
    destination_folder_id: Option<String>,
}

impl<'a, S: RemoteStore + ?Sized> TreeWalker<'a, S> {
    pub fn new(store: &'a S, con: &'a Connection, pacing: Pacing, max_depth: usize) -> Self {
        Self {
            store,
            con,
            pacing,
            max_depth,
            destination_folder_id: None,
        }
    }

    /// catalog copies made in `destination_folder_id` instead of the files themselves
    pub fn with_copy_ingest(mut self, destination_folder_id: &str) -> Self {
        self.destination_folder_id = Some(destination_folder_id.to_string());
        self
    }

    pub fn walk(&self, root_folder_id: &str) -> Result<SyncStats, SyncError> {
        let first_page = self.list_page(root_folder_id, None).map_err(|e| {
            log::error!("Failed to list root folder {root_folder_id}: {e}");
            SyncError::RootUnavailable(e)
        })?;
        let ctx = HierarchyContext::root(root_folder_id);
        Ok(self.scan_folder(root_folder_id, &ctx, first_page))
    }

    fn list_page(&self, folder_id: &str, page_token: Option<&str>) -> Result<Page, RemoteError> {
        self.pacing.call(&format!("listing folder {folder_id}"), || {
            self.store.list_children(folder_id, page_token)
        })
    }

    /// processes every entry of `folder_id`, fetching pages until the listing runs out
    fn scan_folder(&self, folder_id: &str, ctx: &HierarchyContext, first_page: Page) -> SyncStats {
        let mut stats = SyncStats {
            folders_scanned: 1,
            ..Default::default()
        };
        let mut page = first_page;
        loop {
            for entry in &page.entries {
                stats += if entry.is_folder() {
                    self.visit_folder(entry, ctx)
                } else {
                    self.visit_file(entry, ctx)
                };
            }
            let Some(token) = page.next_page_token.take() else {
                break;
            };
            page = match self.list_page(folder_id, Some(&token)) {
                Ok(next) => next,
                Err(e) => {
                    log::error!(
                        "Failed to list the rest of {} (page {token}), skipping it: {e}",
                        ctx.display_path()
                    );
                    stats.errors += 1;
                    break;
                }
            };
        }
        stats
    }

    fn visit_folder(&self, entry: &RemoteEntry, ctx: &HierarchyContext) -> SyncStats {
        let mut stats = SyncStats::default();
        let name = normalize_name(&entry.name);
        if ctx.contains_folder(&entry.id) {
            log::error!(
                "Folder {} ({}) is its own ancestor under {}, skipping it",
                name,
                entry.id,
                ctx.display_path()
            );
            stats.errors += 1;
            return stats;
        }
        if ctx.depth() >= self.max_depth {
            log::error!(
                "Folder {name} under {} is deeper than {} levels, skipping it",
                ctx.display_path(),
                self.max_depth
            );
            stats.errors += 1;
            return stats;
        }
        let (group, is_hierarchy) = match classify(&name) {
            Some(classification) => (classification.group, classification.is_hierarchy),
            None => (self.fallback_group(&name, ctx), true),
        };
        let parent_id = if is_hierarchy {
            ctx.current_parent_tag_id()
        } else {
            None
        };
        let ensured = match ensure_tag(&name, group, parent_id, self.con) {
            Ok(ensured) => ensured,
            Err(e) => {
                log::error!(
                    "Failed to ensure {group} tag for folder {name} under {}, skipping it. Error is {e:?}\n{}",
                    ctx.display_path(),
                    Backtrace::force_capture()
                );
                stats.errors += 1;
                return stats;
            }
        };
        match ensured.outcome {
            EnsureOutcome::Created => stats.tags_created += 1,
            EnsureOutcome::Corrected => stats.tags_corrected += 1,
            EnsureOutcome::Found => {}
        }
        let child_ctx = if is_hierarchy {
            ctx.descend_hierarchy(&entry.id, &name, ensured.tag.id, group)
        } else {
            ctx.descend_attribute(&entry.id, &name, ensured.tag.id)
        };
        match self.list_page(&entry.id, None) {
            Ok(first_page) => stats += self.scan_folder(&entry.id, &child_ctx, first_page),
            Err(e) => {
                log::error!(
                    "Failed to list folder {}, skipping it: {e}",
                    child_ctx.display_path()
                );
                stats.errors += 1;
            }
        }
        stats
    }

    fn fallback_group(&self, name: &str, ctx: &HierarchyContext) -> TagGroup {
        let fallback = ctx.fallback_group();
        let expected = ctx.expected_group();
        if fallback == expected {
            log::debug!("Treating {name} under {} as {fallback}", ctx.display_path());
        } else {
            log::warn!(
                "Expected a {expected} folder under {}, but {name} isn't recognizable. Treating it as {fallback}",
                ctx.display_path()
            );
        }
        fallback
    }

    fn visit_file(&self, entry: &RemoteEntry, ctx: &HierarchyContext) -> SyncStats {
        let mut stats = SyncStats {
            files_processed: 1,
            ..Default::default()
        };
        let Some(observation) = self.observe_file(entry, ctx) else {
            stats.errors += 1;
            return stats;
        };
        match catalog_service::upsert_file_resource(&observation, &ctx.tag_ids(), self.con) {
            Ok(outcome) => {
                log::debug!(
                    "{} under {} is resource {}",
                    observation.title,
                    ctx.display_path(),
                    outcome.resource_id()
                );
                match outcome {
                    UpsertOutcome::Created(_) => stats.files_created += 1,
                    UpsertOutcome::Updated(_) => stats.files_updated += 1,
                }
            }
            Err(e) => {
                log::error!(
                    "Failed to catalog {} under {}, skipping it. Error is {e:?}",
                    observation.title,
                    ctx.display_path()
                );
                stats.errors += 1;
            }
        }
        stats
    }

    /// builds what will be cataloged for `entry`, copying it first in copy mode.
    /// `None` means the file has to be skipped, and the reason has already been logged
    fn observe_file(&self, entry: &RemoteEntry, ctx: &HierarchyContext) -> Option<FileObservation> {
        let entry = self.with_details(entry);
        let title = normalize_name(&entry.name);
        let Some(destination) = &self.destination_folder_id else {
            return Some(FileObservation {
                external_id: entry.id,
                original_external_id: None,
                title,
                mime_type: entry.mime_type,
                size: entry.size,
            });
        };
        let existing = match catalog_service::get_resource_by_external_id(&entry.id, self.con) {
            Ok(existing) => existing,
            Err(e) => {
                log::error!("Failed to look up {} in the catalog: {e:?}", entry.id);
                return None;
            }
        };
        // files that were copied on an earlier run are never copied again
        let external_id = match existing {
            Some(resource) => resource.external_file_id,
            None => {
                let copied = self.pacing.call(&format!("copying file {}", entry.id), || {
                    self.store.copy_file(&entry.id, destination)
                });
                match copied {
                    Ok(copy) => copy.id,
                    Err(e) => {
                        log::error!(
                            "Failed to copy {title} under {} into {destination}, skipping it: {e}",
                            ctx.display_path()
                        );
                        return None;
                    }
                }
            }
        };
        Some(FileObservation {
            external_id,
            original_external_id: Some(entry.id),
            title,
            mime_type: entry.mime_type,
            size: entry.size,
        })
    }

    /// some stores leave the mime type or size out of listings; those are fetched individually.
    /// A failed fetch just leaves them empty
    fn with_details(&self, entry: &RemoteEntry) -> RemoteEntry {
        if entry.mime_type.is_some() && entry.size.is_some() {
            return entry.clone();
        }
        match self.pacing.call(&format!("fetching file {}", entry.id), || {
            self.store.get_file(&entry.id)
        }) {
            Ok(details) => RemoteEntry {
                mime_type: entry.mime_type.clone().or(details.mime_type),
                size: entry.size.or(details.size),
                ..entry.clone()
            },
            Err(e) => {
                log::warn!("Failed to fetch details for {}: {e}", entry.id);
                entry.clone()
            }
        }
    }
}
