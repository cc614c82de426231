//! End-to-end integration test for a configured sync run
//!
//! This test exercises the complete flow: config loading -> list file -> sync -> archive contents.

use std::fs;

use mirror_core::{ArchiveReason, Error, ListFile, Phase, SyncConfig};
use mirror_test_utils::{MediaTree, archive};
use pretty_assertions::assert_eq;

/// Write a TOML config and list file for `tree`
fn write_config(tree: &MediaTree, list: &str, extra: &str) -> std::path::PathBuf {
    let list_path = tree.root().join("wanted.txt");
    fs::write(&list_path, list).unwrap();

    let config_path = tree.root().join("mirror.toml");
    fs::write(
        &config_path,
        format!(
            "source_root = {:?}\ntarget_root = {:?}\nlist_file = {:?}\n{extra}",
            tree.source().display().to_string(),
            tree.target().display().to_string(),
            list_path.display().to_string(),
        ),
    )
    .unwrap();
    config_path
}

fn run_configured(config_path: &std::path::Path) -> mirror_core::Result<mirror_core::SyncReport> {
    let config = SyncConfig::load(config_path)?;
    let engine = config.engine()?;
    let list = config
        .list_file
        .clone()
        .expect("test config always names a list file");
    engine.run_from(&ListFile::new(list))
}

#[test]
fn test_configured_run_produces_readable_archives() {
    let tree = MediaTree::new();
    tree.add_movie("movies/Alpha");
    tree.add_file("movies/Beta/Beta.mkv", b"beta frames");
    tree.add_file("movies/Beta/subs/en.srt", b"1\n00:00:01 --> 00:00:02\nhello\n");
    tree.add_file("clips/Trailer.mp4", b"trailer");
    let config = write_config(
        &tree,
        "# library\nmovies/Alpha\nmovies/Beta\nclips/Trailer.mp4\n",
        "compression_level = 9\n",
    );

    let report = run_configured(&config).unwrap();

    assert_eq!(report.archived.len(), 3);
    assert!(report.archived.iter().all(|a| a.reason == ArchiveReason::Missing));
    assert_eq!(
        tree.archive_names(),
        vec!["Alpha".to_string(), "Beta".to_string(), "Trailer.mp4".to_string()]
    );
    assert_eq!(
        tree.archive_entries("Beta"),
        vec![
            "Beta".to_string(),
            "Beta/Beta.mkv".to_string(),
            "Beta/subs".to_string(),
            "Beta/subs/en.srt".to_string(),
        ]
    );
    assert_eq!(
        archive::entry_content(&tree.archive_path("Beta"), "Beta/subs/en.srt"),
        Some(b"1\n00:00:01 --> 00:00:02\nhello\n".to_vec())
    );
    assert_eq!(tree.archive_entries("Trailer.mp4"), vec!["Trailer.mp4".to_string()]);
}

#[test]
fn test_configured_dry_run_report_serializes() {
    let tree = MediaTree::new();
    tree.add_movie("movies/Alpha");
    tree.add_archive("Orphan");
    let config = write_config(&tree, "movies/Alpha\n", "dry_run = true\n");

    let report = run_configured(&config).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["dry_run"], true);
    assert_eq!(json["archived"][0]["reason"], "missing");
    assert_eq!(json["removed"].as_array().map(Vec::len), Some(1));
    tree.assert_no_archive("Alpha");
    tree.assert_archive_exists("Orphan");
}

#[test]
fn test_invalid_config_level_is_rejected_before_running() {
    let tree = MediaTree::new();
    tree.add_archive("Orphan");
    let config = write_config(&tree, "movies/Alpha\n", "compression_level = 10\n");

    let err = run_configured(&config).unwrap_err();

    assert!(matches!(err, Error::InvalidInput { .. }));
    tree.assert_archive_exists("Orphan");
}

#[test]
fn test_phase_error_keeps_source_chain() {
    let tree = MediaTree::new();
    tree.add_movie("movies/Alpha");
    let target = tree.root().join("occupied");
    fs::write(&target, "plain file").unwrap();
    let config = SyncConfig::new(tree.source(), &target);

    let err = config.engine().unwrap().run(&["movies/Alpha"]).unwrap_err();

    assert_eq!(err.failed_phase(), Some(Phase::Compress));
    let source = std::error::Error::source(&err).expect("phase errors carry a source");
    assert!(source.to_string().contains("Not a directory"));
}
