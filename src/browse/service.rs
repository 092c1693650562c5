use std::backtrace::Backtrace;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use itertools::Itertools;
use rusqlite::Connection;

use crate::browse::{BrowseResult, TagNode};
use crate::catalog::repository as catalog_repository;
use crate::catalog::Resource;
use crate::classifier::normalize_name;
use crate::model::error::browse_errors::BrowseError;
use crate::model::TagGroup;
use crate::tags::repository as tag_repository;
use crate::tags::service::slugify;
use crate::tags::Tag;

/// key used for tags that were never classified
const UNCLASSIFIED: &str = "UNCLASSIFIED";

/// Resolves `segments` (tag names or slugs, root first) to the deepest matching node of the hierarchy,
/// and returns what someone browsing that node would see.
///
/// Each segment is looked for among the children of the node matched so far, then anywhere below it, so
/// levels can be skipped ("Grade 12/Biology" finds Biology under its stream). Segments that match nothing
/// are reported in [`BrowseResult::unmatched`] and browsing continues from the last node that did match.
/// An empty path browses the roots of the forest
pub fn browse(segments: &[String], con: &Connection) -> Result<BrowseResult, BrowseError> {
    let forest = TagForest::load(con)?;
    let mut node: Option<u32> = None;
    let mut unmatched: Vec<String> = Vec::new();
    for segment in segments {
        let segment = normalize_name(segment);
        if segment.is_empty() {
            continue;
        }
        match forest.find_below(node, &segment) {
            Some(tag) => node = Some(tag.id),
            None => unmatched.push(segment),
        }
    }
    let children: Vec<&Tag> = forest.children_of(node).collect();
    let resources = match node {
        Some(id) => {
            let child_ids: HashSet<u32> = children.iter().map(|t| t.id).collect();
            loose_resources(id, &child_ids, con)?
        }
        None => Vec::new(),
    };
    let facets = group_tags(
        resources
            .iter()
            .flat_map(|r| r.tags.iter())
            .filter(|t| t.is_attribute())
            .unique_by(|t| t.id),
    );
    Ok(BrowseResult {
        trail: forest.ancestry(node),
        unmatched,
        children: group_tags(children.into_iter()),
        resources,
        facets,
    })
}

/// every hierarchy tree, each node carrying its children. LEVEL roots come first, followed by any other
/// parentless hierarchy tag (a grade folder sitting right under the sync root, for example)
pub fn full_hierarchy(con: &Connection) -> Result<Vec<TagNode>, BrowseError> {
    let forest = TagForest::load(con)?;
    let roots = forest
        .children_of(None)
        .sorted_by_key(|t| t.group != Some(TagGroup::Level));
    Ok(roots.map(|root| forest.subtree(root)).collect())
}

/// all tags, indexed by id and by parent, so a browse touches the Tags table once
struct TagForest {
    tags: HashMap<u32, Tag>,
    children: HashMap<Option<u32>, Vec<u32>>,
}

impl TagForest {
    fn load(con: &Connection) -> Result<Self, BrowseError> {
        let all = tag_repository::get_all_tags(con).map_err(|e| {
            log::error!(
                "Failed to load the tag forest. Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            BrowseError::DbError
        })?;
        let mut children: HashMap<Option<u32>, Vec<u32>> = HashMap::new();
        for tag in &all {
            // parentless facets aren't part of any tree
            if !tag.is_attribute() {
                children.entry(tag.parent_id).or_default().push(tag.id);
            }
        }
        Ok(Self {
            tags: all.into_iter().map(|t| (t.id, t)).collect(),
            children,
        })
    }

    /// in name order, since that's the order the tags were loaded in
    fn children_of(&self, parent: Option<u32>) -> impl Iterator<Item = &Tag> {
        self.children
            .get(&parent)
            .into_iter()
            .flatten()
            .filter_map(|id| self.tags.get(id))
    }

    /// a direct child matching `segment`, or failing that the closest matching descendant
    fn find_below(&self, parent: Option<u32>, segment: &str) -> Option<&Tag> {
        let wanted = slugify(segment);
        let matches = |tag: &&Tag| tag.slug == segment || slugify(&tag.name) == wanted;
        let mut queue: VecDeque<&Tag> = self.children_of(parent).collect();
        while let Some(tag) = queue.pop_front() {
            if matches(&tag) {
                return Some(tag);
            }
            queue.extend(self.children_of(Some(tag.id)));
        }
        None
    }

    /// `id` and its ancestors, root first
    fn ancestry(&self, id: Option<u32>) -> Vec<Tag> {
        let mut trail = Vec::new();
        let mut current = id;
        while let Some(tag) = current.and_then(|id| self.tags.get(&id)) {
            if trail.iter().any(|t: &Tag| t.id == tag.id) {
                log::error!("Tag {} is its own ancestor", tag.id);
                break;
            }
            trail.push(tag.clone());
            current = tag.parent_id;
        }
        trail.reverse();
        trail
    }

    fn subtree(&self, tag: &Tag) -> TagNode {
        TagNode {
            tag: tag.clone(),
            children: self
                .children_of(Some(tag.id))
                .map(|child| self.subtree(child))
                .collect(),
        }
    }
}

/// resources tagged with `node_id` that carry none of `child_ids`, with their tags
fn loose_resources(
    node_id: u32,
    child_ids: &HashSet<u32>,
    con: &Connection,
) -> Result<Vec<Resource>, BrowseError> {
    let resources = catalog_repository::get_resources_with_tag(node_id, con).map_err(|e| {
        log::error!(
            "Failed to retrieve resources for tag {node_id}. Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        BrowseError::DbError
    })?;
    let ids: Vec<u32> = resources.iter().map(|r| r.id).collect();
    let mut tags = catalog_repository::get_tags_on_resources(&ids, con).map_err(|e| {
        log::error!(
            "Failed to retrieve tags for resources under tag {node_id}. Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        BrowseError::DbError
    })?;
    Ok(resources
        .into_iter()
        .map(|mut resource| {
            resource.tags = tags.remove(&resource.id).unwrap_or_default();
            resource
        })
        .filter(|resource| !resource.tags.iter().any(|t| child_ids.contains(&t.id)))
        .collect())
}

fn group_tags<'a>(tags: impl Iterator<Item = &'a Tag>) -> BTreeMap<String, Vec<Tag>> {
    let mut grouped: BTreeMap<String, Vec<Tag>> = BTreeMap::new();
    for tag in tags {
        let key = tag.group.map_or(UNCLASSIFIED, |g| g.as_str());
        grouped.entry(key.to_string()).or_default().push(tag.clone());
    }
    grouped
}
