//! Snapshot integration tests
//!
//! Replicas restarted from a persisted snapshot continue their counter
//! lineage and keep converging with peers.

use pixelsync::{
    Snapshot,
    crdt::Map,
    pixel::{PixelData, Rgb},
};

#[test]
fn test_restart_continues_counter_lineage() {
    let mut map = Map::new("A");
    map.set("k", 1u32);
    map.set("k", 2u32);

    let json = map.snapshot().to_json().unwrap();
    let mut restarted = Snapshot::<u32>::from_json(&json).unwrap().into_map();
    restarted.set("k", 3);

    let register = restarted.state().get("k").cloned().unwrap();
    assert_eq!(register.origin.as_str(), "A");
    assert_eq!(register.counter, 3);
}

#[test]
fn test_restarted_replica_still_converges() {
    let mut a = PixelData::new("A");
    let mut b = PixelData::new("B");
    a.set(0, 0, Rgb::new(255, 0, 0));
    b.set(0, 0, Rgb::new(0, 0, 255));

    let stored = a.snapshot().to_json().unwrap();
    let mut a = Snapshot::<Rgb>::from_json(&stored).unwrap().into_pixels();

    a.merge(&b.state());
    b.merge(&a.state());
    assert_eq!(a.state(), b.state());
    assert_eq!(a.replica().as_str(), "A");
}

#[test]
fn test_snapshot_json_shape() {
    let mut map = Map::new("A");
    map.set("x", "v".to_string());

    let json = map.snapshot().to_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["replica"], "A");
    assert_eq!(parsed["state"]["x"], serde_json::json!(["A", 1, ["v"]]));
    assert!(parsed.get("_v").is_none());
}

#[test]
fn test_snapshot_with_malformed_state_is_rejected() {
    let json = r#"{"replica": "A", "state": {"x": ["A", -1, [0, 0, 0]]}}"#;
    let err = Snapshot::<Rgb>::from_json(json).unwrap_err();
    assert!(err.is_malformed_state());
}
