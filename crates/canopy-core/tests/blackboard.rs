use canopy_core::{BbKey, Blackboard};

#[test]
fn blackboard_set_get_remove_roundtrip() {
    let k_u32 = BbKey::<u32>::new("ammo");
    let k_str = BbKey::<String>::new("greeting");

    let mut bb = Blackboard::new();
    assert!(!bb.contains(k_u32.name()));

    bb.set(k_u32, 123);
    bb.set(k_str, "hello".to_string());

    assert_eq!(bb.get(k_u32).copied(), Some(123));
    assert_eq!(bb.get(k_str).map(|s| s.as_str()), Some("hello"));

    assert_eq!(bb.remove(k_u32), Some(123));
    assert_eq!(bb.get(k_u32), None);
}

#[test]
fn absent_key_returns_default_without_inserting() {
    let bb = Blackboard::new();
    assert_eq!(bb.value("health", 100i32), 100);
    assert!(bb.is_empty());
}

#[test]
fn set_value_overwrites() {
    let mut bb = Blackboard::new();
    bb.set_value("alert", false);
    bb.set_value("alert", true);
    assert!(bb.value("alert", false));
    assert_eq!(bb.len(), 1);
}

#[test]
fn typed_and_named_access_share_storage() {
    const SPEED: BbKey<f32> = BbKey::new("speed");
    let mut bb = Blackboard::new();
    bb.set_value("speed", 2.5f32);
    assert_eq!(bb.get(SPEED).copied(), Some(2.5));
}

#[test]
fn type_mismatch_reads_as_absent() {
    let mut bb = Blackboard::new();
    bb.set_value("count", 1u32);
    assert_eq!(bb.value("count", -1i32), -1);
    assert!(bb.value_mut::<i32>("count").is_none());
    assert_eq!(bb.take_value::<i32>("count"), None);
    // The mistyped entry is left in place.
    assert_eq!(bb.value("count", 0u32), 1);
}
