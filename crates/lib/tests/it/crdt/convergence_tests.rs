//! Convergence tests
//!
//! Replicas exchanging state in arbitrary order, with duplicates and
//! omissions, must end up with identical state.

use pixelsync::crdt::{CRDT, MAX_COUNTER, Map, MapState, Register};

use crate::helpers::*;

type Color = [u8; 3];

const RED: Color = [255, 0, 0];
const GREEN: Color = [0, 255, 0];
const BLUE: Color = [0, 0, 255];

/// Three replicas making concurrent, overlapping edits.
fn divergent_replicas() -> Vec<Map<Color>> {
    let mut a = Map::new("A");
    a.set("0,0", RED);
    a.set("1,1", RED);
    a.set("2,2", RED);
    a.delete("2,2");

    let mut b = Map::new("B");
    b.set("0,0", BLUE);
    b.set("3,3", BLUE);

    let mut c = Map::new("C");
    c.set("1,1", GREEN);
    c.set("1,1", GREEN);
    c.set("2,2", GREEN);
    c.delete("3,3");

    vec![a, b, c]
}

#[test]
fn test_concurrent_writes_blue_wins_on_both_sides() {
    let mut a = Map::new("A");
    let mut b = Map::new("B");

    a.set("0,0", RED);
    assert_eq!(a.state().get("0,0"), Some(&live("A", 1, RED)));
    b.set("0,0", BLUE);
    assert_eq!(b.state().get("0,0"), Some(&live("B", 1, BLUE)));

    let from_a = a.state();
    let from_b = b.state();
    a.merge(&from_b);
    b.merge(&from_a);

    assert_eq!(a.state().get("0,0"), Some(&live("B", 1, BLUE)));
    assert_eq!(b.state().get("0,0"), Some(&live("B", 1, BLUE)));
    assert_eq!(a.get("0,0"), Some(&BLUE));
    assert_eq!(b.get("0,0"), Some(&BLUE));
}

#[test]
fn test_delete_propagates_to_replica_that_never_saw_key() {
    let mut a = Map::new("A");
    a.set("1,1", GREEN);
    assert_eq!(a.state().get("1,1"), Some(&live("A", 1, GREEN)));
    a.delete("1,1");
    assert_eq!(a.state().get("1,1"), Some(&tombstone("A", 2)));

    let mut b: Map<Color> = Map::new("B");
    b.merge(&a.state());
    assert!(!b.has("1,1"));
    assert_eq!(b.get("1,1"), None);
}

#[test]
fn test_map_merge_order_independence() {
    let states: Vec<MapState<Color>> = divergent_replicas().iter().map(Map::state).collect();

    let mut results = Vec::new();
    for order in permutations(&states) {
        let mut observer = Map::new("Observer");
        for state in &order {
            observer.merge(state);
        }
        results.push(observer.state());
    }

    let first = &results[0];
    assert!(results.iter().all(|r| r == first));

    assert_eq!(first.get("0,0"), Some(&live("B", 1, BLUE)));
    assert_eq!(first.get("1,1"), Some(&live("C", 2, GREEN)));
    assert_eq!(first.get("2,2"), Some(&tombstone("A", 2)));
    assert_eq!(first.get("3,3"), Some(&live("B", 1, BLUE)));
}

#[test]
fn test_map_merge_idempotent_and_duplicate_tolerant() {
    let replicas = divergent_replicas();
    let mut once = Map::new("X");
    let mut many = Map::new("X");

    for replica in &replicas {
        once.merge(&replica.state());
    }
    for _ in 0..3 {
        for replica in replicas.iter().rev() {
            many.merge(&replica.state());
        }
    }

    assert_eq!(once.state(), many.state());
    assert_eq!(many.merge(&once.state()), 0);
}

#[test]
fn test_full_mesh_exchange_converges() {
    let mut replicas = divergent_replicas();

    // Every replica receives every other replica's state
    let snapshots: Vec<_> = replicas.iter().map(Map::state).collect();
    for replica in replicas.iter_mut() {
        for snapshot in &snapshots {
            replica.merge(snapshot);
        }
    }

    let reference = replicas[0].state();
    for replica in &replicas {
        assert_eq!(replica.state(), reference);
        assert_eq!(replica.value(), replicas[0].value());
    }
}

#[test]
fn test_gossip_through_intermediary_converges() {
    // A and C never talk directly; B relays
    let mut replicas = divergent_replicas();
    let (a, rest) = replicas.split_at_mut(1);
    let (b, c) = rest.split_at_mut(1);
    let (a, b, c) = (&mut a[0], &mut b[0], &mut c[0]);

    b.merge(&a.state());
    b.merge(&c.state());
    a.merge(&b.state());
    c.merge(&b.state());

    assert_eq!(a.state(), b.state());
    assert_eq!(b.state(), c.state());
}

#[test]
fn test_partial_messages_converge_once_all_keys_delivered() {
    let replicas = divergent_replicas();
    let mut full = Map::new("X");
    let mut piecemeal = Map::new("X");

    for replica in &replicas {
        full.merge(&replica.state());

        // Deliver each key in its own single-key message, in reverse key order
        let mut singles: Vec<MapState<Color>> = replica
            .state()
            .into_iter()
            .map(|(key, register)| [(key, register)].into_iter().collect())
            .collect();
        singles.reverse();
        for single in &singles {
            piecemeal.merge(single);
        }
    }

    assert_eq!(full.state(), piecemeal.state());
}

#[test]
fn test_local_write_dominates_after_merge() {
    let mut replicas = divergent_replicas();
    let everything: Vec<_> = replicas.iter().map(Map::state).collect();
    let b = &mut replicas[1];
    for state in &everything {
        b.merge(state);
    }

    b.set("1,1", RED);
    assert_eq!(b.get("1,1"), Some(&RED));

    for state in &everything {
        b.merge(state);
    }
    assert_eq!(b.get("1,1"), Some(&RED));
}

#[test]
fn test_crdt_trait_reports_change() {
    let mut a: Map<Color> = Map::new("A");
    let mut b = Map::new("B");
    b.set("k", GREEN);

    let remote = CRDT::state(&b);
    assert!(CRDT::merge(&mut a, &remote));
    assert!(!CRDT::merge(&mut a, &remote));
}

/// Exchange full states between two replicas through the generic trait.
fn exchange<C: CRDT>(a: &mut C, b: &mut C) {
    let from_a = a.state();
    let from_b = b.state();
    a.merge(&from_b);
    b.merge(&from_a);
}

#[test]
fn test_crdt_trait_value_matches_inherent_views() {
    let mut a = Map::new("A");
    let mut b = Map::new("B");
    a.set("0,0", RED);
    a.set("1,1", RED);
    a.delete("1,1");
    b.set("0,0", BLUE);
    b.set("2,2", GREEN);

    exchange(&mut a, &mut b);
    assert_eq!(CRDT::value(&a), a.value());
    assert_eq!(CRDT::value(&a), CRDT::value(&b));
    assert_eq!(CRDT::value(&a).get("0,0"), Some(&BLUE));
    assert!(!CRDT::value(&a).contains_key("1,1"));

    let mut left = Register::new("A", RED);
    let mut right = Register::new("B", BLUE);
    exchange(&mut left, &mut right);
    assert_eq!(CRDT::value(&left), BLUE);
    assert_eq!(CRDT::value(&right), BLUE);
}

// ===== VALUES THAT ENCODE AS NULL =====

#[test]
fn test_null_encoding_values_converge_over_the_wire() {
    let mut a: Map<Option<i32>> = Map::new("A");
    let mut b: Map<Option<i32>> = Map::new("B");
    a.set("k", None);
    a.set("gone", Some(1));
    a.delete("gone");

    let wire = a.state().to_json().unwrap();
    assert_eq!(wire, r#"{"gone":["A",2,null],"k":["A",1,[null]]}"#);
    b.merge(&MapState::from_json(&wire).unwrap());

    let from_a = MapState::from_json(&a.state().to_json().unwrap()).unwrap();
    let from_b = MapState::from_json(&b.state().to_json().unwrap()).unwrap();
    a.merge(&from_b);
    b.merge(&from_a);

    assert_eq!(a.state(), b.state());
    assert!(a.has("k"));
    assert!(b.has("k"));
    assert_eq!(b.get("k"), Some(&None));
    assert!(!b.has("gone"));
}

#[test]
fn test_unit_values_survive_transmission() {
    let mut a: Map<()> = Map::new("A");
    a.set("flag", ());

    let mut b: Map<()> = Map::new("B");
    b.merge(&MapState::from_json(&a.state().to_json().unwrap()).unwrap());
    assert!(b.has("flag"));
    assert_eq!(b.value(), a.value());
}

// ===== COUNTER EXHAUSTION =====

#[test]
fn test_unincrementable_counter_is_rejected_on_receipt() {
    let wire = format!(r#"{{"k": ["Z", {}, [[0, 0, 255]]]}}"#, u64::MAX);
    let err = MapState::<Color>::from_json(&wire).unwrap_err();
    assert!(err.is_malformed_state(), "{err}");
}

#[test]
fn test_exhausted_counter_keeps_replicas_converged() {
    let wire = format!(r#"{{"k": ["Z", {MAX_COUNTER}, [[0, 0, 255]]]}}"#);
    let remote = MapState::<Color>::from_json(&wire).unwrap();

    let mut a = Map::new("A");
    let mut b = Map::new("B");
    a.merge(&remote);
    b.merge(&remote);

    a.set("k", RED);
    a.set("k", GREEN);
    assert_eq!(a.state().get("k"), Some(&live("Z", MAX_COUNTER, BLUE)));

    b.merge(&a.state());
    a.merge(&b.state());
    assert_eq!(a.state(), b.state());
    assert_eq!(b.get("k"), Some(&BLUE));
}

#[test]
fn test_writes_near_the_counter_limit_propagate() {
    let mut a = Map::new("A");
    let mut b = Map::new("B");
    let remote = state_of(vec![("k", live("Z", MAX_COUNTER - 2, BLUE))]);
    a.merge(&remote);
    b.merge(&remote);

    a.set("k", RED);
    a.set("k", GREEN);
    assert_eq!(a.state().get("k"), Some(&live("A", MAX_COUNTER, GREEN)));

    let wire = a.state().to_json().unwrap();
    b.merge(&MapState::from_json(&wire).unwrap());
    assert_eq!(b.get("k"), Some(&GREEN));
    assert_eq!(a.state(), b.state());
    assert_eq!(
        b.register("k").map(|register| register.state()),
        Some(&live("A", MAX_COUNTER, GREEN))
    );
}
