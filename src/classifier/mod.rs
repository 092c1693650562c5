//! Decides what a folder name means.
//!
//! Classification is an ordered list of [`Rule`]s, the first one whose predicate accepts the
//! normalized name wins. Order matters: several predicates are loose enough to overlap, e.g.
//! "A/L Subjects" must hit the level rule before anything else gets a look at it, and streams
//! need their explicit "Stream" qualifier so a subject called "Science" is never mistaken for one.
//!
//! A name no rule accepts is reported as `None`; the walker then picks SUBJECT or LESSON based on
//! where in the tree the folder sits.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::TagGroup;

#[cfg(test)]
mod tests;

/// what a folder name was recognized as
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Classification {
    pub group: TagGroup,
    /// `true` if the folder becomes a node in the navigation tree, `false` if it is a flattened facet
    pub is_hierarchy: bool,
}

/// a single entry of the rule table
pub struct Rule {
    pub group: TagGroup,
    pub is_hierarchy: bool,
    pub matches: fn(&str) -> bool,
}

/// the rule table, highest priority first
pub static RULES: &[Rule] = &[
    Rule {
        group: TagGroup::Level,
        is_hierarchy: true,
        matches: is_level,
    },
    Rule {
        group: TagGroup::Grade,
        is_hierarchy: true,
        matches: is_grade,
    },
    Rule {
        group: TagGroup::Stream,
        is_hierarchy: true,
        matches: is_stream,
    },
    Rule {
        group: TagGroup::Medium,
        is_hierarchy: false,
        matches: is_medium,
    },
    Rule {
        group: TagGroup::ResourceType,
        is_hierarchy: false,
        matches: is_resource_type,
    },
    Rule {
        group: TagGroup::Exam,
        is_hierarchy: false,
        matches: is_exam,
    },
    Rule {
        group: TagGroup::Year,
        is_hierarchy: false,
        matches: is_year,
    },
    Rule {
        group: TagGroup::Lesson,
        is_hierarchy: true,
        matches: is_lesson,
    },
];

/// the lowest and highest 4-digit numbers treated as a year
pub const YEAR_RANGE: std::ops::RangeInclusive<u32> = 1950..=2100;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static LEVEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)^(?:
            .+\s+subjects?
            | primary(?:\s+(?:school|section|classes))?
            | secondary(?:\s+(?:school|section|classes))?
            | scholarship(?:\s+exam(?:ination)?)?
            | (?:grades?|class(?:es)?|years?)\s*\d{1,2}\s*(?:-|–|to)\s*\d{1,2}
        )$",
    )
    .unwrap()
});

static GRADE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)^(?:
            (?:grade|gr\.?|class|year|standard|std\.?)\s*[-_]?\s*\d{1,2}(?:\s*\(.*\))?
            | \d{1,2}(?:st|nd|rd|th)\s+(?:grade|class|year|standard)
            | (?:g\.?c\.?e\.?\s*)?[oa]\s*/\s*l
            | (?:g\.?c\.?e\.?\s+)?(?:ordinary|advanced)\s+level
        )$",
    )
    .unwrap()
});

static STREAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)^(?:
            (?:science|maths?|mathematics|bio(?:logy)?|commerce|arts?|technology|tech|engineering\s+technology|bio\s*systems\s+technology|physical\s+science|biological\s+science|combined\s+maths?)
                \s*-?\s*streams?
            | bio\s+science
            | biological\s+science
            | physical\s+science
        )$",
    )
    .unwrap()
});

static MEDIUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:sinhala|tamil|english)(?:\s*-?\s*medium)?$").unwrap());

static RESOURCE_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)^(?:
            past\s*-?\s*papers?
            | model\s*-?\s*papers?
            | mark(?:ing)?\s*-?\s*sc?hemes?
            | answer\s*sc?hemes?
            | teacher'?s?'?\s*-?\s*guides?
            | (?:short\s+)?notes?
            | lesson\s+notes?
            | syllab(?:us|uses|i)
        )$",
    )
    .unwrap()
});

static EXAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)^(?:
            (?:first|second|third|1st|2nd|3rd)\s+term(?:\s+(?:test|exam(?:ination)?)s?)?(?:\s+papers?)?
            | term\s*-?\s*[1-3](?:\s+(?:test|exam(?:ination)?)s?)?(?:\s+papers?)?
            | term\s+(?:test|exam(?:ination)?)s?(?:\s+papers?)?
            | mid\s*-?\s*year(?:\s+(?:test|exam(?:ination)?)s?)?
            | final\s+(?:term\s+)?exam(?:ination)?s?
        )$",
    )
    .unwrap()
});

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").unwrap());

static LESSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)^(?:
            (?:unit|lesson|chapter|module|topic|part)\s*[-_.:]?\s*\d+\b.*
            | \d{1,3}\s*(?:\.|-|\)|–)\s*\S.*
        )$",
    )
    .unwrap()
});

/// trims the name and collapses runs of whitespace, which is how names are compared and stored
pub fn normalize_name(name: &str) -> String {
    WHITESPACE.replace_all(name.trim(), " ").to_string()
}

/// runs the rule table against `folder_name`, returning the first match, or `None` if no rule applies
pub fn classify(folder_name: &str) -> Option<Classification> {
    let normalized = normalize_name(folder_name);
    if normalized.is_empty() {
        return None;
    }
    RULES
        .iter()
        .find(|rule| (rule.matches)(&normalized))
        .map(|rule| Classification {
            group: rule.group,
            is_hierarchy: rule.is_hierarchy,
        })
}

fn is_level(name: &str) -> bool {
    LEVEL.is_match(name)
}

fn is_grade(name: &str) -> bool {
    GRADE.is_match(name)
}

fn is_stream(name: &str) -> bool {
    STREAM.is_match(name)
}

fn is_medium(name: &str) -> bool {
    MEDIUM.is_match(name)
}

fn is_resource_type(name: &str) -> bool {
    RESOURCE_TYPE.is_match(name)
}

fn is_exam(name: &str) -> bool {
    EXAM.is_match(name)
}

fn is_year(name: &str) -> bool {
    YEAR.is_match(name)
        && name
            .parse::<u32>()
            .is_ok_and(|year| YEAR_RANGE.contains(&year))
}

fn is_lesson(name: &str) -> bool {
    LESSON.is_match(name)
}
