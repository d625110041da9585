#![allow(missing_docs)]

use amicus::{ConnectionEvent, EventBatch, GraphError, SocialGraph};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[test]
fn missing_endpoint_rolls_back_the_whole_batch() {
    init_tracing();
    let graph = SocialGraph::new();
    let batch = EventBatch::new()
        .register("alice", 1_000)
        .register("bob", 2_000)
        .refer("alice", "ghost", 3_000)
        .add_friend("alice", "bob", 4_000);

    let err = graph.apply_batch(&batch).unwrap_err();
    assert!(matches!(err, GraphError::MissingEndpoint(name) if name == "ghost"));

    // Registrations from the failed batch must not leak out either.
    assert_eq!(graph.user_count(), 0);
    assert_eq!(graph.friend_edge_count(), 0);
    assert_eq!(graph.metrics().batches_rolled_back, 1);
}

#[test]
fn same_batch_registrations_satisfy_relationship_endpoints() {
    let graph = SocialGraph::new();
    // Relationship events listed "before" the registrations they depend on:
    // sub-batch ordering, not list order, is what matters.
    let batch = EventBatch::new()
        .add_friend("carol", "dave", 5_000)
        .refer("carol", "dave", 4_000)
        .register("carol", 1_000)
        .register("dave", 2_000);

    let summary = graph.apply_batch(&batch).expect("batch applies");
    assert_eq!(summary.users_created, 2);
    assert_eq!(summary.friend_edges_created, 2);
    assert_eq!(summary.referral_edges_created, 1);
}

#[test]
fn unfriends_apply_after_friend_adds() {
    let graph = SocialGraph::new();
    let batch = EventBatch::new()
        .register("a", 1)
        .register("b", 2)
        .add_friend("a", "b", 10)
        .unfriend("a", "b");
    graph.apply_batch(&batch).expect("batch applies");
    assert_eq!(graph.count_total_friends("a"), 0);
    assert_eq!(graph.friend_edge_count(), 0);
}

#[test]
fn unfriending_unknown_users_is_a_no_op() {
    let graph = SocialGraph::new();
    let batch = EventBatch::new().unfriend("nobody", "noone");
    let summary = graph.apply_batch(&batch).expect("batch applies");
    assert_eq!(summary.friend_edges_removed, 0);
}

#[test]
fn reapplying_a_batch_changes_nothing() {
    let graph_once = SocialGraph::new();
    let graph_twice = SocialGraph::new();
    let batch = EventBatch::new()
        .register("alice", 1_000)
        .register("bob", 2_000)
        .register("charlie", 3_000)
        .refer("alice", "bob", 4_000)
        .add_friend("bob", "charlie", 5_000)
        .unfriend("alice", "charlie");

    graph_once.apply_batch(&batch).expect("single apply");
    graph_twice.apply_batch(&batch).expect("first apply");
    graph_twice.apply_batch(&batch).expect("second apply");

    assert_eq!(
        graph_once.snapshot_json().expect("snapshot"),
        graph_twice.snapshot_json().expect("snapshot")
    );
}

#[test]
fn re_registration_never_rewrites_created_at() {
    let graph = SocialGraph::new();
    graph
        .apply_batch(&EventBatch::new().register("alice", 1_000))
        .expect("first registration");
    let summary = graph
        .apply_batch(&EventBatch::new().register("alice", 9_999))
        .expect("second registration");

    assert_eq!(summary.users_created, 0);
    assert_eq!(graph.user("alice").expect("alice").created_at, 1_000);
}

#[test]
fn unfriend_then_refriend_keeps_one_edge_per_direction() {
    let graph = SocialGraph::new();
    graph
        .apply_batch(
            &EventBatch::new()
                .register("a", 1)
                .register("b", 2)
                .add_friend("a", "b", 100),
        )
        .expect("initial friendship");
    graph
        .apply_batch(&EventBatch::new().unfriend("a", "b"))
        .expect("unfriend");
    graph
        .apply_batch(&EventBatch::new().add_friend("a", "b", 900))
        .expect("refriend");

    assert_eq!(graph.friend_edge_count(), 2);
    let page = graph
        .fetch_friends_paginated("a", 1, 10)
        .expect("page fetch");
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].name, "b");
    assert_eq!(page.data[0].created_at, 900);
}

#[test]
fn empty_batch_commits_trivially() {
    let graph = SocialGraph::new();
    let summary = graph.apply_batch(&EventBatch::new()).expect("empty batch");
    assert_eq!(summary.events, 0);
    assert_eq!(graph.user_count(), 0);
}

#[test]
fn wire_events_flow_end_to_end() {
    let graph = SocialGraph::new();
    let events = vec![
        ConnectionEvent::Register {
            name: "alice".into(),
            created_at: "20250801T090000000Z".into(),
        },
        ConnectionEvent::Register {
            name: "bob".into(),
            created_at: "20250801T090100000Z".into(),
        },
        ConnectionEvent::AddFriend {
            user1_name: "alice".into(),
            user2_name: "bob".into(),
            created_at: "20250801T091500500Z".into(),
        },
    ];
    let batch = EventBatch::from_events(&events).expect("normalization");
    graph.apply_batch(&batch).expect("batch applies");

    let network = graph.find_user_network("alice").expect("alice");
    assert_eq!(network.friends, vec!["bob"]);
}

// Property: applying a batch twice is indistinguishable from applying it
// once, whether the batch commits or rolls back.
fn op_strategy() -> impl Strategy<Value = Vec<(u8, usize, usize, i64)>> {
    // (kind, user index, user index, timestamp) over a pool of 6 names.
    prop::collection::vec((0u8..4, 0usize..6, 0usize..6, 0i64..100_000), 0..40)
}

fn build_batch(ops: &[(u8, usize, usize, i64)]) -> EventBatch {
    let names = ["ada", "bea", "cal", "dot", "eli", "fay"];
    let mut batch = EventBatch::new();
    for &(kind, left, right, ts) in ops {
        match kind {
            0 => batch = batch.register(names[left], ts),
            1 => batch = batch.refer(names[left], names[right], ts),
            2 => batch = batch.add_friend(names[left], names[right], ts),
            _ => batch = batch.unfriend(names[left], names[right]),
        }
    }
    batch
}

proptest! {
    #[test]
    fn apply_batch_is_idempotent(ops in op_strategy()) {
        let batch = build_batch(&ops);

        let graph_once = SocialGraph::new();
        let graph_twice = SocialGraph::new();
        let first = graph_once.apply_batch(&batch);
        let second = graph_twice.apply_batch(&batch);
        prop_assert_eq!(first.is_ok(), second.is_ok());
        let _ = graph_twice.apply_batch(&batch);

        prop_assert_eq!(
            graph_once.snapshot_json().expect("snapshot"),
            graph_twice.snapshot_json().expect("snapshot")
        );
    }

    #[test]
    fn committed_friendships_are_symmetric(ops in op_strategy()) {
        let batch = build_batch(&ops);
        let graph = SocialGraph::new();
        if graph.apply_batch(&batch).is_ok() {
            for name in ["ada", "bea", "cal", "dot", "eli", "fay"] {
                let Ok(network) = graph.find_user_network(name) else {
                    continue;
                };
                for friend in &network.friends {
                    let reverse = graph.find_user_network(friend).expect("friend exists");
                    prop_assert!(reverse.friends.contains(&name.to_string()));
                }
            }
        }
    }
}
