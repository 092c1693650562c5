use std::backtrace::Backtrace;

use rusqlite::Connection;

use crate::classifier::normalize_name;
use crate::model::error::tag_errors::{CreateTagError, EnsureTagError, GetTagError};
use crate::model::{RecordSource, TagGroup};
use crate::tags::repository as tag_repository;
use crate::tags::{EnsureOutcome, EnsuredTag, NewTag, Tag};

/// makes a url-safe slug out of a tag name: lowercase, with every run of characters that aren't
/// letters or digits turned into a single `-`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "tag".to_string()
    } else {
        slug.to_string()
    }
}

/// the slug a tag named `name` gets under `parent`.
///
/// Under a parent, the parent's slug is prefixed on unless the name's slug already starts with it as whole
/// words, so two "Grade 12" folders under different levels still get different slugs
pub fn contextual_slug(name: &str, parent: Option<&Tag>) -> String {
    let base = slugify(name);
    match parent {
        Some(parent) if !has_word_prefix(&base, &parent.slug) => format!("{}-{base}", parent.slug),
        _ => base,
    }
}

fn has_word_prefix(slug: &str, prefix: &str) -> bool {
    slug.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('-'))
}

/// finds the tag for `name` under `parent_id`, creating it if it doesn't exist yet.
///
/// Lookup goes by the contextual slug first, then by the exact (name, parent) pair. If the tag is found but
/// its group, parent, or slug no longer match what the caller asked for, it is corrected in place.
/// Attribute groups never get a parent, whatever `parent_id` says.
///
/// Safe to call repeatedly, and a create that races with another writer resolves to the row the other writer made
pub fn ensure_tag(
    name: &str,
    group: TagGroup,
    parent_id: Option<u32>,
    con: &Connection,
) -> Result<EnsuredTag, EnsureTagError> {
    let name = normalize_name(name);
    if name.is_empty() {
        return Err(EnsureTagError::EmptyName);
    }
    let parent_id = if group.is_hierarchy() { parent_id } else { None };
    let parent = match parent_id {
        Some(id) => Some(get_parent(id, con)?),
        None => None,
    };
    let slug = contextual_slug(&name, parent.as_ref());
    match find_existing(&name, &slug, parent_id, con)? {
        Some(existing) => correct_drift(existing, group, parent_id, slug, con),
        None => create_system_tag(name, slug, group, parent_id, con),
    }
}

/// lists the direct children of `parent_id`; `None` lists every parentless tag
pub fn find_children(parent_id: Option<u32>, con: &Connection) -> Result<Vec<Tag>, GetTagError> {
    tag_repository::get_children(parent_id, con).map_err(|e| {
        log::error!(
            "Failed to retrieve children of tag {parent_id:?}. Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        GetTagError::DbError
    })
}

pub fn find_by_slug(slug: &str, con: &Connection) -> Result<Option<Tag>, GetTagError> {
    tag_repository::get_tag_by_slug(slug, con).map_err(|e| {
        log::error!(
            "Failed to retrieve tag with slug {slug}. Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        GetTagError::DbError
    })
}

/// will return the tag with the passed id
pub fn get_tag(id: u32, con: &Connection) -> Result<Tag, GetTagError> {
    match tag_repository::get_tag(id, con) {
        Ok(tag) => Ok(tag),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(GetTagError::TagNotFound),
        Err(e) => {
            log::error!(
                "Failed to retrieve tag with id {id}. Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            Err(GetTagError::DbError)
        }
    }
}

/// creates a parentless tag on behalf of a person (an admin marking a file "Difficult", for example),
/// or returns the already-existing parentless tag with the same name
pub fn create_user_tag(
    name: &str,
    group: Option<TagGroup>,
    con: &Connection,
) -> Result<Tag, CreateTagError> {
    let name = normalize_name(name);
    if name.is_empty() {
        return Err(CreateTagError::EmptyName);
    }
    let slug = slugify(&name);
    let existing = find_existing(&name, &slug, None, con).or(Err(CreateTagError::DbError))?;
    if let Some(tag) = existing {
        return Ok(tag);
    }
    insert_tag(
        NewTag {
            name,
            slug,
            group,
            parent_id: None,
            source: RecordSource::User,
        },
        con,
    )
    .map(|ensured| ensured.tag)
    .or(Err(CreateTagError::DbError))
}

fn get_parent(id: u32, con: &Connection) -> Result<Tag, EnsureTagError> {
    match get_tag(id, con) {
        Ok(tag) => Ok(tag),
        Err(GetTagError::TagNotFound) => Err(EnsureTagError::ParentNotFound),
        Err(GetTagError::DbError) => Err(EnsureTagError::DbError),
    }
}

/// slug first, then (name, parent). A slug hit on a differently-named tag is a collision, not a match
fn find_existing(
    name: &str,
    slug: &str,
    parent_id: Option<u32>,
    con: &Connection,
) -> Result<Option<Tag>, EnsureTagError> {
    let by_slug = tag_repository::get_tag_by_slug(slug, con).or(Err(EnsureTagError::DbError))?;
    if let Some(tag) = by_slug {
        if same_name(&tag.name, name) && Some(tag.id) != parent_id {
            return Ok(Some(tag));
        }
        log::debug!(
            "slug {slug} belongs to tag {} ({}), not {name}",
            tag.id,
            tag.name
        );
    }
    let by_name = tag_repository::get_tag_by_name_and_parent(name, parent_id, con)
        .or(Err(EnsureTagError::DbError))?;
    Ok(by_name)
}

fn correct_drift(
    existing: Tag,
    group: TagGroup,
    parent_id: Option<u32>,
    slug: String,
    con: &Connection,
) -> Result<EnsuredTag, EnsureTagError> {
    let slug = if existing.slug == slug
        || tag_repository::slug_taken(&slug, Some(existing.id), con)
            .or(Err(EnsureTagError::DbError))?
    {
        existing.slug.clone()
    } else {
        slug
    };
    if existing.group == Some(group) && existing.parent_id == parent_id && existing.slug == slug {
        return Ok(EnsuredTag {
            tag: existing,
            outcome: EnsureOutcome::Found,
        });
    }
    log::info!(
        "Correcting tag {} ({}): group {:?} -> {group}, parent {:?} -> {parent_id:?}, slug {} -> {slug}",
        existing.id,
        existing.name,
        existing.group,
        existing.parent_id,
        existing.slug
    );
    if let Err(e) =
        tag_repository::update_classification(existing.id, Some(group), parent_id, &slug, con)
    {
        log::error!(
            "Failed to correct tag {}. Error is {e:?}\n{}",
            existing.id,
            Backtrace::force_capture()
        );
        return Err(EnsureTagError::DbError);
    }
    Ok(EnsuredTag {
        tag: Tag {
            group: Some(group),
            parent_id,
            slug,
            ..existing
        },
        outcome: EnsureOutcome::Corrected,
    })
}

fn create_system_tag(
    name: String,
    slug: String,
    group: TagGroup,
    parent_id: Option<u32>,
    con: &Connection,
) -> Result<EnsuredTag, EnsureTagError> {
    insert_tag(
        NewTag {
            name,
            slug,
            group: Some(group),
            parent_id,
            source: RecordSource::System,
        },
        con,
    )
}

/// inserts `new_tag` under its own slug. When the insert hits the slug's unique constraint, the tag that holds
/// it is re-read: if it is the same (name, parent) that one is returned, otherwise the next `slug-2`, `slug-3`...
/// is tried
fn insert_tag(new_tag: NewTag, con: &Connection) -> Result<EnsuredTag, EnsureTagError> {
    let base = new_tag.slug.clone();
    let mut attempt = new_tag;
    let mut suffix: u32 = 1;
    loop {
        match tag_repository::create_tag(&attempt, con) {
            Ok(tag) => {
                return Ok(EnsuredTag {
                    tag,
                    outcome: EnsureOutcome::Created,
                })
            }
            Err(e) if is_unique_violation(&e) => {
                if let Some(tag) = find_existing(&attempt.name, &base, attempt.parent_id, con)? {
                    log::debug!(
                        "Tag {} was created by someone else first, using {}",
                        attempt.name,
                        tag.id
                    );
                    return Ok(EnsuredTag {
                        tag,
                        outcome: EnsureOutcome::Found,
                    });
                }
                suffix += 1;
                attempt.slug = format!("{base}-{suffix}");
            }
            Err(e) => {
                log::error!(
                    "Failed to create a new tag with the name {}! Error is {e:?}\n{}",
                    attempt.name,
                    Backtrace::force_capture()
                );
                return Err(EnsureTagError::DbError);
            }
        }
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
