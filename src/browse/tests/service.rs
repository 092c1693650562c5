use std::time::Duration;

use rusqlite::Connection;

use crate::remote::Pacing;
use crate::sync::walker::TreeWalker;
use crate::test::FakeRemoteStore;

/// root > A/L Subjects > Grade 12 > Science Stream > Biology > Unit 1 - Cells,
/// with a loose file at Grade 12 (inside a medium folder), one at Biology, and one in the lesson
fn sync_sample_tree(con: &Connection) {
    let mut store = FakeRemoteStore::new();
    store
        .folder("root", "al", "A/L Subjects")
        .folder("al", "g12", "Grade 12")
        .folder("g12", "em", "English Medium")
        .file("em", "guide", "guide.pdf")
        .folder("g12", "sci", "Science Stream")
        .folder("sci", "bio", "Biology")
        .file("bio", "bio-notes", "bio-notes.pdf")
        .folder("bio", "u1", "Unit 1 - Cells")
        .file("u1", "cells", "cells.pdf");
    TreeWalker::new(
        &store,
        con,
        Pacing::new(Duration::ZERO, Duration::ZERO, 0),
        20,
    )
    .walk("root")
    .unwrap();
}

fn names(tags: &[crate::tags::Tag]) -> Vec<&str> {
    tags.iter().map(|t| t.name.as_str()).collect()
}

mod browse_tests {
    use super::{names, sync_sample_tree};
    use crate::browse::service::browse;
    use crate::test::{cleanup, init_db_folder, open_test_connection};

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_path_lists_roots() {
        init_db_folder();
        let con = open_test_connection();
        sync_sample_tree(&con);
        let res = browse(&[], &con).unwrap();
        con.close().unwrap();
        assert_eq!(None, res.node());
        assert_eq!(vec!["LEVEL".to_string()], res.children.keys().cloned().collect::<Vec<_>>());
        assert_eq!(vec!["A/L Subjects"], names(&res.children["LEVEL"]));
        assert!(res.resources.is_empty());
        assert!(res.facets.is_empty());
        cleanup();
    }

    #[test]
    fn grade_shows_streams_loose_files_and_facets() {
        init_db_folder();
        let con = open_test_connection();
        sync_sample_tree(&con);
        let res = browse(&path(&["A/L Subjects", "grade 12"]), &con).unwrap();
        con.close().unwrap();
        assert_eq!(vec!["A/L Subjects", "Grade 12"], names(&res.trail));
        assert_eq!(vec!["STREAM".to_string()], res.children.keys().cloned().collect::<Vec<_>>());
        assert_eq!(vec!["Science Stream"], names(&res.children["STREAM"]));
        let titles: Vec<&str> = res.resources.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(vec!["guide.pdf"], titles);
        assert_eq!(vec!["English Medium"], names(&res.facets["MEDIUM"]));
        assert!(res.unmatched.is_empty());
        cleanup();
    }

    #[test]
    fn resolves_by_slug() {
        init_db_folder();
        let con = open_test_connection();
        sync_sample_tree(&con);
        let res = browse(&path(&["a-l-subjects-grade-12"]), &con).unwrap();
        con.close().unwrap();
        assert_eq!(Some("Grade 12"), res.node().map(|t| t.name.as_str()));
        cleanup();
    }

    #[test]
    fn skipped_levels_are_found_below() {
        init_db_folder();
        let con = open_test_connection();
        sync_sample_tree(&con);
        let res = browse(&path(&["Grade 12", "Biology"]), &con).unwrap();
        con.close().unwrap();
        assert_eq!(
            vec!["A/L Subjects", "Grade 12", "Science Stream", "Biology"],
            names(&res.trail)
        );
        assert_eq!(vec!["Unit 1 - Cells"], names(&res.children["LESSON"]));
        let titles: Vec<&str> = res.resources.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(vec!["bio-notes.pdf"], titles);
        assert!(res.facets.is_empty());
        cleanup();
    }

    #[test]
    fn unmatched_segments_are_reported() {
        init_db_folder();
        let con = open_test_connection();
        sync_sample_tree(&con);
        let res = browse(&path(&["A/L Subjects", "Chemistry"]), &con).unwrap();
        con.close().unwrap();
        assert_eq!(Some("A/L Subjects"), res.node().map(|t| t.name.as_str()));
        assert_eq!(vec!["Chemistry".to_string()], res.unmatched);
        cleanup();
    }
}

mod full_hierarchy_tests {
    use super::{names, sync_sample_tree};
    use crate::browse::service::full_hierarchy;
    use crate::model::TagGroup;
    use crate::tags::service::{create_user_tag, ensure_tag};
    use crate::test::{cleanup, init_db_folder, open_test_connection};

    #[test]
    fn nests_every_hierarchy_tag() {
        init_db_folder();
        let con = open_test_connection();
        sync_sample_tree(&con);
        create_user_tag("Difficult", None, &con).unwrap();
        let forest = full_hierarchy(&con).unwrap();
        con.close().unwrap();
        assert_eq!(1, forest.len());
        let level = &forest[0];
        assert_eq!("A/L Subjects", level.tag.name);
        let grade = &level.children[0];
        assert_eq!("Grade 12", grade.tag.name);
        let stream_names: Vec<&str> = grade.children.iter().map(|n| n.tag.name.as_str()).collect();
        assert_eq!(vec!["Science Stream"], stream_names);
        let biology = &grade.children[0].children[0];
        assert_eq!("Biology", biology.tag.name);
        let lessons: Vec<_> = biology.children.iter().map(|n| n.tag.clone()).collect();
        assert_eq!(vec!["Unit 1 - Cells"], names(&lessons));
        assert!(biology.children[0].children.is_empty());
        cleanup();
    }

    #[test]
    fn level_roots_come_first() {
        init_db_folder();
        let con = open_test_connection();
        ensure_tag("Grade 5", TagGroup::Grade, None, &con).unwrap();
        ensure_tag("Primary", TagGroup::Level, None, &con).unwrap();
        let forest = full_hierarchy(&con).unwrap();
        con.close().unwrap();
        let roots: Vec<&str> = forest.iter().map(|n| n.tag.name.as_str()).collect();
        assert_eq!(vec!["Primary", "Grade 5"], roots);
        cleanup();
    }
}
