use std::backtrace::Backtrace;

use rusqlite::Connection;

use crate::model::TagGroup;
use crate::tags::{NewTag, Tag};

/// creates a new tag in the database. This does not check if the tag already exists,
/// so the caller must check that themselves. A slug that is already taken fails with a constraint violation
pub fn create_tag(tag: &NewTag, con: &Connection) -> Result<Tag, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/create_tag.sql"))?;
    let id = pst.insert(rusqlite::params![
        tag.name,
        tag.slug,
        tag.group,
        tag.parent_id,
        tag.source
    ])? as u32;
    Ok(Tag {
        id,
        name: tag.name.clone(),
        slug: tag.slug.clone(),
        group: tag.group,
        parent_id: tag.parent_id,
        source: tag.source,
    })
}

/// retrieves a tag from the database with the passed `id`
///
/// # Returns
/// - `Ok(Tag)`: the tag with the specified ID if the tag exists
/// - `Err(rusqlite::Error)`: if there was an error during the database operation, including if no tag with the specified ID exists
pub fn get_tag(id: u32, con: &Connection) -> Result<Tag, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/get_by_id.sql"))?;
    pst.query_row(rusqlite::params![id], tag_mapper)
}

/// searches for the tag with exactly the passed slug.
///
/// if `None` is returned, that means there was no match
pub fn get_tag_by_slug(slug: &str, con: &Connection) -> Result<Option<Tag>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/get_by_slug.sql"))?;
    optional(pst.query_row(rusqlite::params![slug], tag_mapper), "slug")
}

/// searches for a tag whose name case-insensitively matches `name` and whose parent is exactly `parent_id`
/// (`None` only matches parentless tags)
pub fn get_tag_by_name_and_parent(
    name: &str,
    parent_id: Option<u32>,
    con: &Connection,
) -> Result<Option<Tag>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/tags/get_by_name_and_parent.sql"
    ))?;
    optional(
        pst.query_row(rusqlite::params![name, parent_id], tag_mapper),
        "name and parent",
    )
}

/// lists the direct children of `parent_id`, or every parentless tag if `parent_id` is `None`
pub fn get_children(parent_id: Option<u32>, con: &Connection) -> Result<Vec<Tag>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/get_children.sql"))?;
    let rows = pst.query_map(rusqlite::params![parent_id], tag_mapper)?;
    rows.collect::<Result<Vec<Tag>, rusqlite::Error>>()
}

pub fn get_all_tags(con: &Connection) -> Result<Vec<Tag>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/get_all_tags.sql"))?;
    let rows = pst.query_map([], tag_mapper)?;
    rows.collect::<Result<Vec<Tag>, rusqlite::Error>>()
}

/// overwrites the classification of a tag in place. Checking to make sure the tag exists needs to be done on the caller's end
pub fn update_classification(
    id: u32,
    group: Option<TagGroup>,
    parent_id: Option<u32>,
    slug: &str,
    con: &Connection,
) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/tags/update_classification.sql"
    ))?;
    pst.execute(rusqlite::params![group, parent_id, slug, id])?;
    Ok(())
}

/// checks if any tag other than `except_id` already uses `slug`
pub fn slug_taken(
    slug: &str,
    except_id: Option<u32>,
    con: &Connection,
) -> Result<bool, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/slug_exists.sql"))?;
    pst.query_row(rusqlite::params![slug, except_id], |row| row.get(0))
}

/// turns "no rows" into `None`, logging and passing through every other error
fn optional(
    res: Result<Tag, rusqlite::Error>,
    looked_up_by: &str,
) -> Result<Option<Tag>, rusqlite::Error> {
    match res {
        Ok(tag) => Ok(Some(tag)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => {
            log::error!(
                "Failed to get tag by {looked_up_by}, error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            Err(e)
        }
    }
}

/// maps a [`Tag`] from a database row
///
/// 1. id
/// 2. name
/// 3. slug
/// 4. tagGroup
/// 5. parentId
/// 6. source
pub fn tag_mapper(row: &rusqlite::Row) -> Result<Tag, rusqlite::Error> {
    Ok(Tag {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        group: row.get(3)?,
        parent_id: row.get(4)?,
        source: row.get(5)?,
    })
}
