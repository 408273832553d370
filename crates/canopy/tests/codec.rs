mod common;

use canopy::{
    register_messaging, Behavior, BehaviorTree, CodecError, CompareValue, Comparator, LeafRegistry,
    NodeKind, ParamValue, Params, SendMessage, SetValue, Status, Wait,
};
use canopy_core::{BehaviorContext, TickContext};
use common::{Scripted, TestWorld};

fn registry() -> LeafRegistry<TestWorld> {
    let mut registry = LeafRegistry::with_builtins();
    register_messaging(&mut registry);
    registry
}

fn sample_tree() -> BehaviorTree<TestWorld> {
    BehaviorTree::new(
        "t",
        Behavior::sequence(vec![
            Behavior::action("pause", Wait::new(1.5)),
            Behavior::condition(
                "low_health",
                CompareValue::new("health", Comparator::Less, 25.0),
            ),
        ]),
    )
}

#[test]
fn tree_round_trips_through_json() {
    let tree = sample_tree();
    let json = tree.to_json().unwrap();
    let decoded = BehaviorTree::from_json(&json, &registry()).unwrap();

    assert_eq!(decoded.name(), "t");
    let root = decoded.root().unwrap();
    assert_eq!(root.kind(), NodeKind::Sequence);

    let children = root.children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].kind(), NodeKind::Action);
    assert_eq!(children[1].kind(), NodeKind::Condition);

    let pause = children[0].as_leaf().unwrap();
    assert_eq!((pause.name(), pause.type_tag()), ("pause", Wait::TAG));
    assert_eq!(
        pause.encode_params(),
        Params::new().with("duration", 1.5f32)
    );

    let check = children[1].as_leaf().unwrap();
    assert_eq!(check.type_tag(), CompareValue::TAG);
    assert_eq!(
        check.encode_params().get("comparator"),
        Some(&ParamValue::Text("<".into()))
    );

    assert_eq!(decoded.encode(), tree.encode());
}

#[test]
fn decorators_and_throttle_keep_parameters_and_wiring() {
    let tree = BehaviorTree::<TestWorld>::new(
        "guard",
        Behavior::parallel(vec![
            Behavior::throttle(0.25, Behavior::inverter(Behavior::action("idle", Wait::new(2.0)))),
            Behavior::repeat_until_success(Behavior::succeeder(Behavior::action(
                "alarm",
                SendMessage::new("game_over").with_payload("caught"),
            ))),
            Behavior::repeat_until_fail(Behavior::action("flag", SetValue::new("alert", true))),
        ]),
    );

    let record = tree.encode();
    let decoded = BehaviorTree::decode(&record, &registry()).unwrap();
    assert_eq!(decoded.encode(), record);

    let root = decoded.root().unwrap();
    let kinds: Vec<_> = root.children().iter().map(|c| c.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Throttle,
            NodeKind::RepeatUntilSuccess,
            NodeKind::RepeatUntilFail
        ]
    );
    match root.children()[0] {
        Behavior::Throttle(t) => {
            assert!((t.timeout() - 0.25).abs() < 1e-6);
            assert_eq!(t.child().map(|c| c.kind()), Some(NodeKind::Inverter));
        }
        other => panic!("unexpected node {other:?}"),
    }
}

#[test]
fn hand_written_document_decodes_and_runs() {
    let json = r#"{
        "name": "alarm",
        "root": {
            "kind": "sequence",
            "children": [
                { "kind": "action", "leaf": "set_value", "name": "arm",
                  "params": { "key": "threat", "value": 3 } },
                { "kind": "condition", "leaf": "compare_value", "name": "threatened",
                  "params": { "key": "threat", "comparator": ">=", "threshold": 2 } },
                { "kind": "action", "leaf": "send_message", "name": "notify",
                  "params": { "topic": "game_over" } }
            ]
        }
    }"#;

    let mut tree = BehaviorTree::from_json(json, &registry()).unwrap();
    let mut world = TestWorld::default();
    let mut ctx = BehaviorContext::new(9u64);

    tree.init(&mut ctx);
    let mut results = Vec::new();
    for tick in 0..3 {
        ctx.begin_tick(&TickContext::new(tick, 0.1));
        results.push(tree.step(&mut ctx, &mut world));
    }

    assert_eq!(results, vec![Status::Running, Status::Running, Status::Success]);
    assert_eq!(ctx.value("threat", 0i64), 3);
    assert_eq!(world.messages.len(), 1);
    assert_eq!(world.messages[0].topic, "game_over");
    assert_eq!(world.messages[0].sender, 9);
}

#[test]
fn compare_value_fails_on_non_numeric_entry() {
    let mut root: Behavior<TestWorld> =
        Behavior::condition("check", CompareValue::new("mood", Comparator::Equal, 0.0));
    let mut world = TestWorld::default();
    let mut ctx = BehaviorContext::new(1u64);
    ctx.set_value("mood", String::from("grumpy"));

    root.init(&mut ctx);
    assert_eq!(root.step(&mut ctx, &mut world), Status::Failure);

    // Absent entries read as zero.
    let mut root: Behavior<TestWorld> =
        Behavior::condition("check", CompareValue::new("absent", Comparator::Equal, 0.0));
    root.init(&mut ctx);
    assert_eq!(root.step(&mut ctx, &mut world), Status::Success);
}

#[test]
fn unknown_leaf_is_rejected() {
    let tree = BehaviorTree::new(
        "custom",
        Behavior::action("x", Scripted::new("x", &[Status::Success])),
    );
    let err = BehaviorTree::decode(&tree.encode(), &registry()).unwrap_err();
    assert!(matches!(err, CodecError::UnknownLeaf(tag) if tag == "scripted"));
}

#[test]
fn custom_leaves_decode_once_registered() {
    let tree = BehaviorTree::new(
        "custom",
        Behavior::inverter(Behavior::action("x", Scripted::new("x", &[Status::Success]))),
    );

    let mut registry = registry();
    registry.register("scripted", |_: &Params| {
        Ok(Scripted::new("x", &[Status::Success]))
    });

    let mut decoded = BehaviorTree::decode(&tree.encode(), &registry).unwrap();
    let mut world = TestWorld::default();
    let mut ctx = BehaviorContext::new(1u64);
    decoded.init(&mut ctx);
    assert_eq!(decoded.step(&mut ctx, &mut world), Status::Failure);
}

#[test]
fn decorator_with_two_children_is_rejected() {
    let json = r#"{
        "name": "bad",
        "root": { "kind": "inverter", "children": [
            { "kind": "action", "leaf": "wait", "params": { "duration": 1.0 } },
            { "kind": "action", "leaf": "wait", "params": { "duration": 1.0 } }
        ] }
    }"#;
    let err = BehaviorTree::<TestWorld>::from_json(json, &registry()).unwrap_err();
    assert!(matches!(
        err,
        CodecError::TooManyChildren {
            kind: NodeKind::Inverter,
            max: 1,
            got: 2
        }
    ));
}

#[test]
fn missing_and_mistyped_parameters_are_rejected() {
    let missing = r#"{ "name": "bad", "root": { "kind": "throttle" } }"#;
    let err = BehaviorTree::<TestWorld>::from_json(missing, &registry()).unwrap_err();
    assert!(matches!(err, CodecError::MissingParam { key } if key == "timeout"));

    let mistyped = r#"{ "name": "bad", "root": {
        "kind": "action", "leaf": "wait", "params": { "duration": "soon" } } }"#;
    let err = BehaviorTree::<TestWorld>::from_json(mistyped, &registry()).unwrap_err();
    assert!(matches!(err, CodecError::InvalidParam { key, .. } if key == "duration"));
}

#[test]
fn leaf_without_tag_and_unknown_kind_are_rejected() {
    let untagged = r#"{ "name": "bad", "root": { "kind": "condition" } }"#;
    let err = BehaviorTree::<TestWorld>::from_json(untagged, &registry()).unwrap_err();
    assert!(matches!(
        err,
        CodecError::MissingLeafTag {
            kind: NodeKind::Condition
        }
    ));

    let unknown = r#"{ "name": "bad", "root": { "kind": "selector" } }"#;
    let err = BehaviorTree::<TestWorld>::from_json(unknown, &registry()).unwrap_err();
    assert!(matches!(err, CodecError::Json(_)));
}

#[test]
fn rootless_tree_round_trips_and_fails_when_stepped() {
    let tree = BehaviorTree::<TestWorld>::empty("placeholder");
    let mut decoded = BehaviorTree::from_json(&tree.to_json().unwrap(), &registry()).unwrap();
    assert!(decoded.root().is_none());

    let mut world = TestWorld::default();
    let mut ctx = BehaviorContext::new(1u64);
    decoded.init(&mut ctx);
    assert_eq!(decoded.step(&mut ctx, &mut world), Status::Failure);
}

#[test]
fn non_finite_parameters_cannot_be_written_as_json() {
    let never: BehaviorTree<TestWorld> = BehaviorTree::new(
        "never",
        Behavior::sequence(vec![Behavior::throttle(
            f32::INFINITY,
            Behavior::action("pause", Wait::new(1.0)),
        )]),
    );
    let err = never.to_json().unwrap_err();
    assert!(matches!(err, CodecError::NonFiniteParam { key } if key == "timeout"));

    let stalled: BehaviorTree<TestWorld> =
        BehaviorTree::new("stalled", Behavior::action("pause", Wait::new(f32::NAN)));
    let err = stalled.to_json().unwrap_err();
    assert!(matches!(err, CodecError::NonFiniteParam { key } if key == "duration"));
}
