use serde::Serialize;

use crate::model::{RecordSource, TagGroup};

/// represents a tag in the Tags table of the database
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// the id of the tag
    pub id: u32,
    /// the display name of the tag, as it was seen in the source tree (trimmed)
    pub name: String,
    /// url-safe and unique across all tags
    pub slug: String,
    /// `None` for manually created tags that were never classified
    pub group: Option<TagGroup>,
    /// `None` for hierarchy roots and for every attribute tag
    pub parent_id: Option<u32>,
    pub source: RecordSource,
}

/// the values needed to insert a new row into the Tags table
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NewTag {
    pub name: String,
    pub slug: String,
    pub group: Option<TagGroup>,
    pub parent_id: Option<u32>,
    pub source: RecordSource,
}

/// how [`crate::tags::service::ensure_tag`] arrived at the tag it returned
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EnsureOutcome {
    /// the tag already existed exactly as requested
    Found,
    /// no matching tag existed, so one was created
    Created,
    /// the tag existed, but its group, parent, or slug had drifted and was corrected
    Corrected,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct EnsuredTag {
    pub tag: Tag,
    pub outcome: EnsureOutcome,
}

impl Tag {
    /// `true` for tags that are facets rather than navigation nodes
    pub fn is_attribute(&self) -> bool {
        self.parent_id.is_none() && !self.group.is_some_and(|g| g.is_hierarchy())
    }
}
