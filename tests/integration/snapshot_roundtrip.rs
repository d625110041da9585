#![allow(missing_docs)]

use std::fs;

use amicus::data_generator::EventGenerator;
use amicus::{Config, GraphError, SocialGraph};
use tempfile::TempDir;

#[test]
fn snapshot_survives_a_save_load_cycle() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("graph.json");

    let graph = SocialGraph::new();
    let mut generator = EventGenerator::new(1234);
    for _ in 0..5 {
        graph
            .apply_batch(&generator.generate_batch(200))
            .expect("generated batch");
    }
    graph.save_snapshot(&path).expect("save snapshot");

    let reloaded = SocialGraph::load_snapshot(&path, Config::default()).expect("load snapshot");
    assert_eq!(
        graph.snapshot_json().expect("snapshot"),
        reloaded.snapshot_json().expect("snapshot")
    );
    assert_eq!(graph.user_count(), reloaded.user_count());
    assert_eq!(
        graph.find_influential_users(10, None),
        reloaded.find_influential_users(10, None)
    );
}

#[test]
fn pretty_snapshots_load_identically() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("graph-pretty.json");

    let graph = SocialGraph::with_config(Config::archival());
    let mut generator = EventGenerator::new(99);
    graph
        .apply_batch(&generator.generate_batch(100))
        .expect("generated batch");
    graph.save_snapshot(&path).expect("save snapshot");

    let reloaded = SocialGraph::load_snapshot(&path, Config::default()).expect("load snapshot");
    assert_eq!(
        graph.snapshot_json().expect("snapshot"),
        reloaded.snapshot_json().expect("snapshot")
    );
}

#[test]
fn corrupt_snapshot_fails_with_serialization_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("corrupt.json");
    fs::write(&path, b"{ not json ").expect("write corrupt file");

    assert!(matches!(
        SocialGraph::load_snapshot(&path, Config::default()),
        Err(GraphError::Serialization(_))
    ));
}

#[test]
fn missing_snapshot_fails_with_io_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("does-not-exist.json");
    assert!(matches!(
        SocialGraph::load_snapshot(&path, Config::default()),
        Err(GraphError::Io(_))
    ));
}
