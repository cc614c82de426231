//! A media library evolving across several sync runs
//!
//! Each test drives one archive directory through additions, removals and
//! edits, checking that the target converges after every run.

use std::fs;

use mirror_core::{ArchiveReason, SyncEngine, SyncOptions};
use mirror_fs::{CompressOptions, CompressionLevel, find_matching, get_entry_info};
use mirror_test_utils::MediaTree;
use pretty_assertions::assert_eq;

const HOUR: u64 = 3600;

fn engine(tree: &MediaTree) -> SyncEngine {
    SyncEngine::new(tree.source(), tree.target(), SyncOptions::default()).unwrap()
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_library_grows_shrinks_and_changes() {
    let tree = MediaTree::new();
    for movie in ["movies/Alpha", "movies/Beta"] {
        let dir = tree.add_movie(movie);
        tree.age(&dir, 3 * HOUR);
    }
    let engine = engine(&tree);

    // Run 1: everything is new
    let first = engine.run(&["movies/Alpha", "movies/Beta"]).unwrap();
    assert_eq!(first.archived.len(), 2);
    assert_eq!(tree.archive_names(), names(&["Alpha", "Beta"]));

    // Run 2: Gamma added, Beta dropped from the list
    let gamma = tree.add_movie("movies/Gamma");
    tree.age(&gamma, 3 * HOUR);
    let second = engine.run(&["movies/Alpha", "movies/Gamma"]).unwrap();
    assert_eq!(second.removed, vec![tree.archive_path("Beta")]);
    assert_eq!(second.up_to_date, names(&["movies/Alpha"]));
    assert_eq!(tree.archive_names(), names(&["Alpha", "Gamma"]));

    // Run 3: Alpha gains a file after its archive was written
    tree.age(&tree.archive_path("Alpha"), 2 * HOUR);
    fs::write(tree.source().join("movies/Alpha/extras.mkv"), "extras").unwrap();
    let third = engine.run(&["movies/Alpha", "movies/Gamma"]).unwrap();
    let archived: Vec<(&str, ArchiveReason)> = third
        .archived
        .iter()
        .map(|a| (a.path.as_str(), a.reason))
        .collect();
    assert_eq!(archived, vec![("movies/Alpha", ArchiveReason::Stale)]);
    assert!(
        tree.archive_entries("Alpha")
            .contains(&"Alpha/extras.mkv".to_string())
    );

    // Run 4: nothing left to do
    let fourth = engine.run(&["movies/Alpha", "movies/Gamma"]).unwrap();
    assert!(!fourth.changed());
}

#[test]
fn test_every_archive_is_at_least_as_new_as_its_source() {
    let tree = MediaTree::new();
    let list = ["movies/Alpha", "movies/Beta", "shows/Gamma"];
    for entry in list {
        tree.add_movie(entry);
    }
    let stale = tree.add_archive("Beta");
    tree.age(&stale, HOUR);

    engine(&tree).run(&list).unwrap();

    for entry in list {
        let source = get_entry_info(&tree.source(), entry, "").unwrap().unwrap();
        let base = entry.rsplit('/').next().unwrap();
        let archive = get_entry_info(&tree.target(), base, "tar.gz")
            .unwrap()
            .unwrap();
        assert!(archive.modified >= source.modified, "{entry} archive is older than its source");
    }
}

#[test]
fn test_emptying_the_list_changes_nothing() {
    let tree = MediaTree::new();
    tree.add_movie("movies/Alpha");
    engine(&tree).run(&["movies/Alpha"]).unwrap();
    let snapshot = tree.target_snapshot();
    let empty: [&str; 0] = [];

    let report = engine(&tree).run(&empty).unwrap();

    assert!(!report.changed());
    assert_eq!(tree.target_snapshot(), snapshot);
}

#[test]
fn test_compression_level_changes_size_not_contents() {
    let fast = MediaTree::new();
    let small = MediaTree::new();
    let content = "frame ".repeat(20_000);
    fast.add_file("movies/Alpha/movie.mkv", content.as_bytes());
    small.add_file("movies/Alpha/movie.mkv", content.as_bytes());

    let options = |level| SyncOptions {
        compress: CompressOptions::with_level(CompressionLevel::new(level).unwrap()),
        dry_run: false,
    };
    SyncEngine::new(fast.source(), fast.target(), options(1))
        .unwrap()
        .run(&["movies/Alpha"])
        .unwrap();
    SyncEngine::new(small.source(), small.target(), options(9))
        .unwrap()
        .run(&["movies/Alpha"])
        .unwrap();

    assert_eq!(fast.archive_entries("Alpha"), small.archive_entries("Alpha"));
    let size = |tree: &MediaTree| fs::metadata(tree.archive_path("Alpha")).unwrap().len();
    assert!(size(&small) <= size(&fast));
}

#[test]
fn test_unrelated_target_files_survive() {
    let tree = MediaTree::new();
    tree.add_movie("movies/Alpha");
    fs::create_dir(tree.target().join("nested")).unwrap();
    fs::write(tree.target().join("nested/Old.tar.gz"), "nested archive").unwrap();
    fs::write(tree.target().join("README"), "archives").unwrap();

    engine(&tree).run(&["movies/Alpha"]).unwrap();

    // Cleanup matches archives anywhere under the target root
    let remaining = find_matching(&tree.target(), "*.tar.gz").unwrap();
    assert_eq!(remaining, vec![tree.archive_path("Alpha")]);
    assert!(tree.target().join("README").exists());
}
