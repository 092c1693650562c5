use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::Resource;
use crate::tags::Tag;

/// One stop in the hierarchy, as seen by someone navigating it
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResult {
    /// the resolved node and all of its ancestors, root first. Empty at the top of the forest
    pub trail: Vec<Tag>,
    /// path segments no tag could be found for
    pub unmatched: Vec<String>,
    /// the node's direct children, keyed by group
    pub children: BTreeMap<String, Vec<Tag>>,
    /// resources on the node that aren't also on one of its children
    pub resources: Vec<Resource>,
    /// attribute tags found on `resources`, keyed by group
    pub facets: BTreeMap<String, Vec<Tag>>,
}

/// a tag along with its whole subtree
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagNode {
    #[serde(flatten)]
    pub tag: Tag,
    pub children: Vec<TagNode>,
}

impl BrowseResult {
    pub fn node(&self) -> Option<&Tag> {
        self.trail.last()
    }
}
