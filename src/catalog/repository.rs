use std::backtrace::Backtrace;
use std::collections::HashMap;

use rusqlite::Connection;

use crate::catalog::{NewResource, Resource};
use crate::tags::repository::tag_mapper;
use crate::tags::Tag;

/// inserts a new resource without any tags, returning its id.
/// Callers need to make sure no resource with the same external file id already exists
pub fn create_resource(resource: &NewResource, con: &Connection) -> Result<u32, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/catalog/create_resource.sql"))?;
    let id = pst.insert(rusqlite::params![
        resource.title,
        resource.description,
        resource.external_file_id,
        resource.original_external_file_id,
        resource.mime_type,
        resource.file_size,
        resource.status,
        resource.source,
        resource.uploader_id
    ])?;
    Ok(id as u32)
}

/// retrieves the resource with the passed id. The returned resource's `tags` are always empty
pub fn get_resource(id: u32, con: &Connection) -> Result<Resource, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/catalog/get_by_id.sql"))?;
    pst.query_row(rusqlite::params![id], resource_mapper)
}

/// finds the resource that points at `external_id`, or that was copied from it.
/// The returned resource's `tags` are always empty
pub fn get_resource_by_external_id(
    external_id: &str,
    con: &Connection,
) -> Result<Option<Resource>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/catalog/get_by_external_id.sql"
    ))?;
    match pst.query_row(rusqlite::params![external_id], resource_mapper) {
        Ok(resource) => Ok(Some(resource)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => {
            log::error!(
                "Failed to get resource by external id {external_id}, error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            Err(e)
        }
    }
}

/// refreshes the fields the sync can observe on a file. A `None` mime type or size keeps the stored value
pub fn update_observed_fields(
    id: u32,
    title: &str,
    mime_type: Option<&str>,
    file_size: Option<u64>,
    con: &Connection,
) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/catalog/update_observed_fields.sql"
    ))?;
    pst.execute(rusqlite::params![title, mime_type, file_size, id])?;
    Ok(())
}

pub fn get_tags_on_resource(resource_id: u32, con: &Connection) -> Result<Vec<Tag>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/catalog/get_tags_for_resource.sql"
    ))?;
    let rows = pst.query_map(rusqlite::params![resource_id], tag_mapper)?;
    rows.collect::<Result<Vec<Tag>, rusqlite::Error>>()
}

/// retrieves the tags on every resource in `resource_ids`, keyed by resource id.
/// Resources without any tags are left out of the map
pub fn get_tags_on_resources(
    resource_ids: &[u32],
    con: &Connection,
) -> Result<HashMap<u32, Vec<Tag>>, rusqlite::Error> {
    if resource_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let in_clause: Vec<String> = resource_ids.iter().map(|it| format!("'{it}'")).collect();
    let in_clause = in_clause.join(",");
    let formatted_query = format!(
        include_str!("../assets/queries/catalog/get_tags_for_resources.sql"),
        in_clause
    );
    let mut pst = con.prepare(formatted_query.as_str())?;
    let rows = pst.query_map([], |row| {
        let resource_id: u32 = row.get(0)?;
        let tag = Tag {
            id: row.get(1)?,
            name: row.get(2)?,
            slug: row.get(3)?,
            group: row.get(4)?,
            parent_id: row.get(5)?,
            source: row.get(6)?,
        };
        Ok((resource_id, tag))
    })?;
    let mut mapped: HashMap<u32, Vec<Tag>> = HashMap::new();
    for row in rows {
        let (resource_id, tag) = row?;
        mapped.entry(resource_id).or_default().push(tag);
    }
    Ok(mapped)
}

/// makes `tag_ids` the exact set of tags on the resource, in a single transaction
pub fn replace_resource_tags(
    resource_id: u32,
    tag_ids: &[u32],
    con: &Connection,
) -> Result<(), rusqlite::Error> {
    let tx = con.unchecked_transaction()?;
    tx.execute(
        include_str!("../assets/queries/catalog/clear_tags_from_resource.sql"),
        rusqlite::params![resource_id],
    )?;
    {
        let mut pst = tx.prepare(include_str!(
            "../assets/queries/catalog/add_tag_to_resource.sql"
        ))?;
        for tag_id in tag_ids {
            pst.execute(rusqlite::params![resource_id, tag_id])?;
        }
    }
    tx.commit()
}

/// adds a tag to the resource. Adding a tag that's already there is a no-op
pub fn add_tag_to_resource(
    resource_id: u32,
    tag_id: u32,
    con: &Connection,
) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/catalog/add_tag_to_resource.sql"
    ))?;
    pst.execute(rusqlite::params![resource_id, tag_id])?;
    Ok(())
}

pub fn remove_tag_from_resource(
    resource_id: u32,
    tag_id: u32,
    con: &Connection,
) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/catalog/remove_tag_from_resource.sql"
    ))?;
    pst.execute(rusqlite::params![resource_id, tag_id])?;
    Ok(())
}

/// every resource directly tagged with `tag_id`. The returned resources' `tags` are always empty
pub fn get_resources_with_tag(tag_id: u32, con: &Connection) -> Result<Vec<Resource>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/catalog/get_resources_with_tag.sql"
    ))?;
    let rows = pst.query_map(rusqlite::params![tag_id], resource_mapper)?;
    rows.collect::<Result<Vec<Resource>, rusqlite::Error>>()
}

pub fn count_resources(con: &Connection) -> Result<u64, rusqlite::Error> {
    con.query_row(
        include_str!("../assets/queries/catalog/count_resources.sql"),
        [],
        |row| row.get(0),
    )
}

/// 1. id
/// 2. title
/// 3. description
/// 4. externalFileId
/// 5. originalExternalFileId
/// 6. mimeType
/// 7. fileSize
/// 8. status
/// 9. source
/// 10. uploaderId
/// 11. views
/// 12. downloads
fn resource_mapper(row: &rusqlite::Row) -> Result<Resource, rusqlite::Error> {
    Ok(Resource {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        external_file_id: row.get(3)?,
        original_external_file_id: row.get(4)?,
        mime_type: row.get(5)?,
        file_size: row.get(6)?,
        status: row.get(7)?,
        source: row.get(8)?,
        uploader_id: row.get(9)?,
        views: row.get(10)?,
        downloads: row.get(11)?,
        tags: Vec::new(),
    })
}
