mod classify_tests {
    use crate::classifier::{classify, Classification};
    use crate::model::TagGroup;

    fn group_of(name: &str) -> Option<TagGroup> {
        classify(name).map(|c| c.group)
    }

    #[test]
    fn levels() {
        assert_eq!(Some(TagGroup::Level), group_of("A/L Subjects"));
        assert_eq!(Some(TagGroup::Level), group_of("O/L Subjects"));
        assert_eq!(Some(TagGroup::Level), group_of("Primary"));
        assert_eq!(Some(TagGroup::Level), group_of("Secondary School"));
        assert_eq!(Some(TagGroup::Level), group_of("Scholarship"));
        assert_eq!(Some(TagGroup::Level), group_of("Grade 6 - 11"));
        assert_eq!(Some(TagGroup::Level), group_of("Grades 1 to 5"));
    }

    #[test]
    fn grades() {
        assert_eq!(Some(TagGroup::Grade), group_of("Grade 12"));
        assert_eq!(Some(TagGroup::Grade), group_of("grade-5"));
        assert_eq!(Some(TagGroup::Grade), group_of("Gr. 9"));
        assert_eq!(Some(TagGroup::Grade), group_of("10th Grade"));
        assert_eq!(Some(TagGroup::Grade), group_of("A/L"));
        assert_eq!(Some(TagGroup::Grade), group_of("G.C.E. O/L"));
    }

    #[test]
    fn streams_need_a_qualifier() {
        assert_eq!(Some(TagGroup::Stream), group_of("Science Stream"));
        assert_eq!(Some(TagGroup::Stream), group_of("Commerce Stream"));
        assert_eq!(Some(TagGroup::Stream), group_of("Arts Stream"));
        assert_eq!(Some(TagGroup::Stream), group_of("Bio Science"));
        assert_eq!(None, group_of("Science"));
        assert_eq!(None, group_of("Commerce"));
    }

    #[test]
    fn mediums_are_attributes() {
        let expected = Some(Classification {
            group: TagGroup::Medium,
            is_hierarchy: false,
        });
        assert_eq!(expected, classify("English Medium"));
        assert_eq!(expected, classify("Sinhala medium"));
        assert_eq!(expected, classify("Tamil"));
        // the language has to be the whole leading token
        assert_eq!(None, classify("English Literature"));
    }

    #[test]
    fn resource_types_tolerate_spelling() {
        for name in [
            "Past Papers",
            "past paper",
            "Marking Scheme",
            "Marking Sheme",
            "Teacher's Guide",
            "Teachers Guides",
            "Teacher Guide",
            "Notes",
            "Short Notes",
            "Syllabus",
            "Model Papers",
        ] {
            assert_eq!(Some(TagGroup::ResourceType), group_of(name), "{name}");
        }
    }

    #[test]
    fn exams() {
        assert_eq!(Some(TagGroup::Exam), group_of("First Term Test"));
        assert_eq!(Some(TagGroup::Exam), group_of("3rd Term Papers"));
        assert_eq!(Some(TagGroup::Exam), group_of("Term 2"));
        assert_eq!(Some(TagGroup::Exam), group_of("Mid-Year Exam"));
        assert_eq!(Some(TagGroup::Exam), group_of("Final Examination"));
    }

    #[test]
    fn years_must_be_plausible() {
        assert_eq!(Some(TagGroup::Year), group_of("2019"));
        assert_eq!(Some(TagGroup::Year), group_of("1998"));
        assert_eq!(None, group_of("1066"));
        assert_eq!(None, group_of("12345"));
    }

    #[test]
    fn lessons() {
        assert_eq!(Some(TagGroup::Lesson), group_of("Unit 1 - Cells"));
        assert_eq!(Some(TagGroup::Lesson), group_of("Lesson 12"));
        assert_eq!(Some(TagGroup::Lesson), group_of("Chapter3"));
        assert_eq!(Some(TagGroup::Lesson), group_of("01. Introduction"));
        assert_eq!(Some(TagGroup::Lesson), group_of("7 - Motion"));
        assert!(classify("Unit 1 - Cells").unwrap().is_hierarchy);
    }

    #[test]
    fn unknown_names_return_none() {
        assert_eq!(None, classify("Biology"));
        assert_eq!(None, classify("Misc"));
        assert_eq!(None, classify("   "));
    }

    #[test]
    fn trailing_whitespace_is_ignored() {
        assert_eq!(Some(TagGroup::Grade), group_of("Grade 12 \u{a0}"));
        assert_eq!(Some(TagGroup::Stream), group_of("  Science   Stream\t"));
    }

    #[test]
    fn level_rule_beats_everything_else() {
        // "English Subjects" would be a medium if the level rule did not run first
        assert_eq!(Some(TagGroup::Level), group_of("English Subjects"));
    }
}

mod normalize_name_tests {
    use crate::classifier::normalize_name;

    #[test]
    fn trims_and_collapses() {
        assert_eq!("Grade 12", normalize_name("  Grade \t 12\u{a0}"));
        assert_eq!("", normalize_name(" \n "));
    }
}

mod rule_table_tests {
    use crate::classifier::RULES;
    use crate::model::TagGroup;

    #[test]
    fn rule_order() {
        let order: Vec<TagGroup> = RULES.iter().map(|r| r.group).collect();
        assert_eq!(
            vec![
                TagGroup::Level,
                TagGroup::Grade,
                TagGroup::Stream,
                TagGroup::Medium,
                TagGroup::ResourceType,
                TagGroup::Exam,
                TagGroup::Year,
                TagGroup::Lesson,
            ],
            order
        );
    }

    #[test]
    fn hierarchy_flags_match_groups() {
        for rule in RULES {
            assert_eq!(rule.group.is_hierarchy(), rule.is_hierarchy);
        }
    }
}
