use itertools::Itertools;

use crate::model::TagGroup;

/// Everything the walker knows about the path from the root down to the folder it is in.
///
/// Each folder gets its own copy, so siblings never see each other's tags
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HierarchyContext {
    /// hierarchy tags on the path, root first
    ancestor_tag_ids: Vec<u32>,
    /// flattened facets picked up on the path
    attribute_tag_ids: Vec<u32>,
    /// the tag new hierarchy tags are created under
    current_parent_tag_id: Option<u32>,
    last_hierarchy_group: Option<TagGroup>,
    has_subject: bool,
    /// remote ids of every folder on the path, including the root
    folder_ids: Vec<String>,
    folder_names: Vec<String>,
}

impl HierarchyContext {
    pub fn root(root_folder_id: &str) -> Self {
        Self {
            folder_ids: vec![root_folder_id.to_string()],
            ..Default::default()
        }
    }

    pub fn current_parent_tag_id(&self) -> Option<u32> {
        self.current_parent_tag_id
    }

    pub fn ancestor_tag_ids(&self) -> &[u32] {
        &self.ancestor_tag_ids
    }

    pub fn attribute_tag_ids(&self) -> &[u32] {
        &self.attribute_tag_ids
    }

    pub fn has_subject(&self) -> bool {
        self.has_subject
    }

    /// how many folders below the root this context is
    pub fn depth(&self) -> usize {
        self.folder_ids.len().saturating_sub(1)
    }

    /// `true` if `folder_id` is already on the path, meaning the store handed us a cycle
    pub fn contains_folder(&self, folder_id: &str) -> bool {
        self.folder_ids.iter().any(|id| id == folder_id)
    }

    /// the tags a file directly inside this folder gets: every hierarchy ancestor plus every facet
    pub fn tag_ids(&self) -> Vec<u32> {
        self.ancestor_tag_ids
            .iter()
            .chain(self.attribute_tag_ids.iter())
            .copied()
            .unique()
            .collect()
    }

    /// the group an unrecognized folder becomes: the first unknown folder on a path is the subject,
    /// anything unknown below it is a lesson
    pub fn fallback_group(&self) -> TagGroup {
        if self.has_subject {
            TagGroup::Lesson
        } else {
            TagGroup::Subject
        }
    }

    /// the hierarchy group a well-formed tree would have next on this path
    pub fn expected_group(&self) -> TagGroup {
        match self.last_hierarchy_group {
            None => TagGroup::Level,
            Some(TagGroup::Level) => TagGroup::Grade,
            Some(TagGroup::Grade) | Some(TagGroup::Stream) => TagGroup::Subject,
            Some(_) => TagGroup::Lesson,
        }
    }

    /// the context for a child folder that became a node in the navigation tree
    pub fn descend_hierarchy(
        &self,
        folder_id: &str,
        folder_name: &str,
        tag_id: u32,
        group: TagGroup,
    ) -> Self {
        let mut child = self.enter(folder_id, folder_name);
        child.ancestor_tag_ids.push(tag_id);
        child.current_parent_tag_id = Some(tag_id);
        child.last_hierarchy_group = Some(group);
        child.has_subject = self.has_subject || group == TagGroup::Subject;
        child
    }

    /// the context for a child folder that became a facet. The hierarchy parent stays where it was
    pub fn descend_attribute(&self, folder_id: &str, folder_name: &str, tag_id: u32) -> Self {
        let mut child = self.enter(folder_id, folder_name);
        if !child.attribute_tag_ids.contains(&tag_id) {
            child.attribute_tag_ids.push(tag_id);
        }
        child
    }

    /// the folder names on the path joined with `/`, for log messages
    pub fn display_path(&self) -> String {
        if self.folder_names.is_empty() {
            "/".to_string()
        } else {
            self.folder_names.join("/")
        }
    }

    fn enter(&self, folder_id: &str, folder_name: &str) -> Self {
        let mut child = self.clone();
        child.folder_ids.push(folder_id.to_string());
        child.folder_names.push(folder_name.to_string());
        child
    }
}
