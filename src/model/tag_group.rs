use std::fmt::{Display, Formatter};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

/// the fixed vocabulary a tag can be classified into.
///
/// [`TagGroup::is_hierarchy`] splits these into the navigational tree (levels, grades, streams, subjects, lessons)
/// and the parentless facets (medium, resource type, exam, year)
#[derive(Deserialize, Serialize, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Copy, Clone)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagGroup {
    Level,
    Stream,
    Grade,
    Subject,
    Medium,
    ResourceType,
    Lesson,
    Exam,
    Year,
}

impl TagGroup {
    pub const ALL: [TagGroup; 9] = [
        Self::Level,
        Self::Stream,
        Self::Grade,
        Self::Subject,
        Self::Medium,
        Self::ResourceType,
        Self::Lesson,
        Self::Exam,
        Self::Year,
    ];

    /// `true` if tags of this group take part in the parent/child navigation tree
    pub fn is_hierarchy(&self) -> bool {
        matches!(
            self,
            Self::Level | Self::Grade | Self::Stream | Self::Subject | Self::Lesson
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Level => "LEVEL",
            Self::Stream => "STREAM",
            Self::Grade => "GRADE",
            Self::Subject => "SUBJECT",
            Self::Medium => "MEDIUM",
            Self::ResourceType => "RESOURCE_TYPE",
            Self::Lesson => "LESSON",
            Self::Exam => "EXAM",
            Self::Year => "YEAR",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl Display for TagGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TagGroup {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TagGroup {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Self::parse(text).ok_or_else(|| {
            log::warn!("tag group from database {text} does not match any branches in TagGroup");
            FromSqlError::InvalidType
        })
    }
}

#[cfg(test)]
mod tests {
    use super::TagGroup;

    #[test]
    fn hierarchy_groups() {
        let hierarchy: Vec<TagGroup> = TagGroup::ALL
            .into_iter()
            .filter(TagGroup::is_hierarchy)
            .collect();
        assert_eq!(
            vec![
                TagGroup::Level,
                TagGroup::Stream,
                TagGroup::Grade,
                TagGroup::Subject,
                TagGroup::Lesson
            ],
            hierarchy
        );
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Some(TagGroup::ResourceType), TagGroup::parse("resource_type"));
        assert_eq!(Some(TagGroup::Level), TagGroup::parse(" LEVEL "));
        assert_eq!(None, TagGroup::parse("difficulty"));
    }
}
