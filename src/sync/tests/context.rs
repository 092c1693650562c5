mod hierarchy_context_tests {
    use crate::model::TagGroup;
    use crate::sync::context::HierarchyContext;

    #[test]
    fn hierarchy_descent_advances_parent() {
        let root = HierarchyContext::root("root");
        let level = root.descend_hierarchy("l", "A/L Subjects", 1, TagGroup::Level);
        let grade = level.descend_hierarchy("g", "Grade 12", 2, TagGroup::Grade);
        assert_eq!(None, root.current_parent_tag_id());
        assert_eq!(Some(2), grade.current_parent_tag_id());
        assert_eq!(&[1, 2], grade.ancestor_tag_ids());
        assert_eq!(2, grade.depth());
        assert_eq!("A/L Subjects/Grade 12", grade.display_path());
    }

    #[test]
    fn attribute_descent_keeps_parent() {
        let grade = HierarchyContext::root("root").descend_hierarchy("g", "Grade 12", 2, TagGroup::Grade);
        let medium = grade.descend_attribute("m", "English Medium", 7);
        assert_eq!(Some(2), medium.current_parent_tag_id());
        assert_eq!(&[2], medium.ancestor_tag_ids());
        assert_eq!(&[7], medium.attribute_tag_ids());
        assert_eq!(vec![2, 7], medium.tag_ids());
    }

    #[test]
    fn siblings_do_not_share_state() {
        let grade = HierarchyContext::root("root").descend_hierarchy("g", "Grade 12", 2, TagGroup::Grade);
        let _medium = grade.descend_attribute("m", "English Medium", 7);
        let subject = grade.descend_hierarchy("s", "Biology", 3, TagGroup::Subject);
        assert!(grade.attribute_tag_ids().is_empty());
        assert!(subject.attribute_tag_ids().is_empty());
        assert!(!grade.has_subject());
        assert!(subject.has_subject());
    }

    #[test]
    fn fallback_depends_on_subject() {
        let grade = HierarchyContext::root("root").descend_hierarchy("g", "Grade 12", 2, TagGroup::Grade);
        assert_eq!(TagGroup::Subject, grade.fallback_group());
        assert_eq!(TagGroup::Subject, grade.expected_group());
        let subject = grade.descend_hierarchy("s", "Biology", 3, TagGroup::Subject);
        assert_eq!(TagGroup::Lesson, subject.fallback_group());
        assert_eq!(TagGroup::Lesson, subject.expected_group());
        assert_eq!(TagGroup::Level, HierarchyContext::root("root").expected_group());
    }

    #[test]
    fn folders_on_path_are_remembered() {
        let ctx = HierarchyContext::root("root").descend_attribute("m", "Tamil", 4);
        assert!(ctx.contains_folder("root"));
        assert!(ctx.contains_folder("m"));
        assert!(!ctx.contains_folder("x"));
    }
}
