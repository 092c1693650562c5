use std::backtrace::Backtrace;

use itertools::Itertools;
use rusqlite::Connection;

use crate::catalog::repository as catalog_repository;
use crate::catalog::{FileObservation, NewResource, Resource, UpsertOutcome};
use crate::model::error::catalog_errors::{
    GetResourceError, ResourceTagError, UpsertResourceError,
};
use crate::model::error::tag_errors::GetTagError;
use crate::model::{RecordSource, ResourceStatus};
use crate::tags::service as tag_service;
use crate::tags::Tag;

/// The tag set a resource should end up with after a resync.
///
/// `fresh` (everything derived from the file's current folder path) replaces whatever hierarchy tags the
/// resource had before, roots included. Attached attribute tags (parentless and not in a hierarchy group,
/// such as a medium or a hand-made "Difficult") are kept, as the folder path cannot rediscover them.
/// Duplicates are dropped and `fresh` comes first
pub fn merge_tag_sets(fresh: &[u32], existing: &[Tag]) -> Vec<u32> {
    let preserved = existing
        .iter()
        .filter(|tag| tag.is_attribute())
        .map(|tag| tag.id);
    fresh.iter().copied().chain(preserved).unique().collect()
}

/// creates or refreshes the catalog entry for an observed file.
///
/// A file that has never been seen becomes an approved, system-sourced resource tagged with exactly `tag_ids`.
/// A file that already has a resource gets its title, mime type, and size refreshed, and its tags replaced by
/// [`merge_tag_sets`]
pub fn upsert_file_resource(
    observation: &FileObservation,
    tag_ids: &[u32],
    con: &Connection,
) -> Result<UpsertOutcome, UpsertResourceError> {
    if observation.external_id.trim().is_empty() {
        return Err(UpsertResourceError::MissingExternalId);
    }
    let lookup_id = observation
        .original_external_id
        .as_deref()
        .unwrap_or(&observation.external_id);
    let existing = catalog_repository::get_resource_by_external_id(lookup_id, con)
        .or(Err(UpsertResourceError::DbError))?;
    match existing {
        Some(resource) => update_resource(resource.id, observation, tag_ids, con),
        None => create_resource(observation, tag_ids, con),
    }
}

/// will return the resource that points at (or was copied from) `external_id`, with its tags
pub fn get_resource_by_external_id(
    external_id: &str,
    con: &Connection,
) -> Result<Option<Resource>, GetResourceError> {
    let resource = catalog_repository::get_resource_by_external_id(external_id, con)
        .or(Err(GetResourceError::DbError))?;
    match resource {
        Some(resource) => Ok(Some(with_tags(resource, con)?)),
        None => Ok(None),
    }
}

/// will return the resource with the passed id, with its tags
pub fn get_resource(id: u32, con: &Connection) -> Result<Resource, GetResourceError> {
    match catalog_repository::get_resource(id, con) {
        Ok(resource) => with_tags(resource, con),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(GetResourceError::ResourceNotFound),
        Err(e) => {
            log::error!(
                "Failed to retrieve resource {id}. Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            Err(GetResourceError::DbError)
        }
    }
}

/// adds a tag to a resource by hand, for admins curating the catalog
pub fn attach_tag(resource_id: u32, tag_id: u32, con: &Connection) -> Result<(), ResourceTagError> {
    check_resource_and_tag(resource_id, tag_id, con)?;
    catalog_repository::add_tag_to_resource(resource_id, tag_id, con).map_err(|e| {
        log::error!(
            "Failed to add tag {tag_id} to resource {resource_id}. Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        ResourceTagError::DbError
    })
}

pub fn detach_tag(resource_id: u32, tag_id: u32, con: &Connection) -> Result<(), ResourceTagError> {
    check_resource_and_tag(resource_id, tag_id, con)?;
    catalog_repository::remove_tag_from_resource(resource_id, tag_id, con).map_err(|e| {
        log::error!(
            "Failed to remove tag {tag_id} from resource {resource_id}. Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        ResourceTagError::DbError
    })
}

fn create_resource(
    observation: &FileObservation,
    tag_ids: &[u32],
    con: &Connection,
) -> Result<UpsertOutcome, UpsertResourceError> {
    let new_resource = NewResource {
        title: observation.title.clone(),
        description: None,
        external_file_id: observation.external_id.clone(),
        original_external_file_id: observation.original_external_id.clone(),
        mime_type: observation.mime_type.clone(),
        file_size: observation.size,
        status: ResourceStatus::Approved,
        source: RecordSource::System,
        uploader_id: None,
    };
    let id = match catalog_repository::create_resource(&new_resource, con) {
        Ok(id) => id,
        Err(e) => {
            log::error!(
                "Failed to create resource for {}. Error is {e:?}\n{}",
                observation.external_id,
                Backtrace::force_capture()
            );
            return Err(UpsertResourceError::DbError);
        }
    };
    let tag_ids: Vec<u32> = tag_ids.iter().copied().unique().collect();
    if let Err(e) = catalog_repository::replace_resource_tags(id, &tag_ids, con) {
        log::error!(
            "Failed to tag new resource {id}. Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        return Err(UpsertResourceError::DbError);
    }
    log::debug!("Cataloged {} as resource {id}", observation.title);
    Ok(UpsertOutcome::Created(id))
}

fn update_resource(
    id: u32,
    observation: &FileObservation,
    tag_ids: &[u32],
    con: &Connection,
) -> Result<UpsertOutcome, UpsertResourceError> {
    let existing_tags =
        catalog_repository::get_tags_on_resource(id, con).or(Err(UpsertResourceError::DbError))?;
    let merged = merge_tag_sets(tag_ids, &existing_tags);
    let res = catalog_repository::update_observed_fields(
        id,
        &observation.title,
        observation.mime_type.as_deref(),
        observation.size,
        con,
    )
    .and_then(|_| catalog_repository::replace_resource_tags(id, &merged, con));
    if let Err(e) = res {
        log::error!(
            "Failed to refresh resource {id} ({}). Error is {e:?}\n{}",
            observation.external_id,
            Backtrace::force_capture()
        );
        return Err(UpsertResourceError::DbError);
    }
    Ok(UpsertOutcome::Updated(id))
}

fn with_tags(mut resource: Resource, con: &Connection) -> Result<Resource, GetResourceError> {
    resource.tags = catalog_repository::get_tags_on_resource(resource.id, con).map_err(|e| {
        log::error!(
            "Failed to retrieve tags for resource {}. Error is {e:?}\n{}",
            resource.id,
            Backtrace::force_capture()
        );
        GetResourceError::DbError
    })?;
    Ok(resource)
}

fn check_resource_and_tag(
    resource_id: u32,
    tag_id: u32,
    con: &Connection,
) -> Result<(), ResourceTagError> {
    match catalog_repository::get_resource(resource_id, con) {
        Ok(_) => {}
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            return Err(ResourceTagError::ResourceNotFound)
        }
        Err(_) => return Err(ResourceTagError::DbError),
    }
    match tag_service::get_tag(tag_id, con) {
        Ok(_) => Ok(()),
        Err(GetTagError::TagNotFound) => Err(ResourceTagError::TagNotFound),
        Err(GetTagError::DbError) => Err(ResourceTagError::DbError),
    }
}
