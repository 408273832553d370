mod common;

use canopy::{Behavior, Status};
use canopy_core::{BehaviorContext, TickContext};
use common::{inits, scripted, TestWorld};

use Status::{Failure, Running, Success};

#[test]
fn sequence_of_one_tick_children_succeeds_on_last_tick() {
    let mut world = TestWorld::default();
    let mut ctx = BehaviorContext::new(1u64);
    let mut root = Behavior::sequence(vec![
        scripted("a", &[Success]),
        scripted("b", &[Success]),
        scripted("c", &[Success]),
        scripted("d", &[Success]),
    ]);

    root.init(&mut ctx);
    let results: Vec<_> = (0..4).map(|_| root.step(&mut ctx, &mut world)).collect();

    assert_eq!(results, vec![Running, Running, Running, Success]);
    assert_eq!(world.steps, vec!["a", "b", "c", "d"]);
}

#[test]
fn sequence_initializes_each_child_once_before_its_first_step() {
    let mut world = TestWorld::default();
    let mut ctx = BehaviorContext::new(1u64);
    let mut root = Behavior::sequence(vec![scripted("a", &[Success]), scripted("b", &[Success])]);

    root.init(&mut ctx);
    assert_eq!((inits(&ctx, "a"), inits(&ctx, "b")), (1, 0));

    root.step(&mut ctx, &mut world);
    assert_eq!((inits(&ctx, "a"), inits(&ctx, "b")), (1, 1));
}

#[test]
fn empty_sequence_succeeds_on_first_step() {
    let mut world = TestWorld::default();
    let mut ctx = BehaviorContext::new(1u64);
    let mut root = Behavior::<TestWorld>::sequence(Vec::new());

    root.init(&mut ctx);
    assert_eq!(root.step(&mut ctx, &mut world), Success);
}

#[test]
fn sequence_stops_at_first_failure() {
    let mut world = TestWorld::default();
    let mut ctx = BehaviorContext::new(1u64);
    let mut root = Behavior::sequence(vec![
        scripted("a", &[Success]),
        scripted("b", &[Failure]),
        scripted("c", &[Success]),
    ]);

    root.init(&mut ctx);
    assert_eq!(root.step(&mut ctx, &mut world), Running);
    assert_eq!(root.step(&mut ctx, &mut world), Failure);
    assert_eq!(world.steps_of("c"), 0);
}

#[test]
fn sequence_resumes_running_child_without_reinit() {
    let mut world = TestWorld::default();
    let mut ctx = BehaviorContext::new(1u64);
    let mut root = Behavior::sequence(vec![
        scripted("walk", &[Running, Running, Success]),
        scripted("wave", &[Success]),
    ]);

    root.init(&mut ctx);
    assert_eq!(root.step(&mut ctx, &mut world), Running);
    assert_eq!(root.step(&mut ctx, &mut world), Running);
    assert_eq!(root.step(&mut ctx, &mut world), Running);
    assert_eq!(root.step(&mut ctx, &mut world), Success);

    assert_eq!(inits(&ctx, "walk"), 1);
    assert_eq!(world.steps, vec!["walk", "walk", "walk", "wave"]);
    match &root {
        Behavior::Sequence(seq) => assert_eq!(seq.current_index(), 2),
        other => panic!("unexpected root {other:?}"),
    }
}

#[test]
fn reinit_restarts_sequence_from_first_child() {
    let mut world = TestWorld::default();
    let mut ctx = BehaviorContext::new(1u64);
    let mut root = Behavior::sequence(vec![
        scripted("a", &[Success]),
        scripted("b", &[Running]),
    ]);

    root.init(&mut ctx);
    root.step(&mut ctx, &mut world);
    root.step(&mut ctx, &mut world);
    root.init(&mut ctx);
    root.init(&mut ctx);
    root.step(&mut ctx, &mut world);

    assert_eq!(world.steps, vec!["a", "b", "a"]);
}

#[test]
fn parallel_short_circuits_on_first_failure() {
    let mut world = TestWorld::default();
    let mut ctx = BehaviorContext::new(1u64);
    let mut root = Behavior::parallel(vec![
        scripted("one", &[Running]),
        scripted("two", &[Failure]),
        scripted("three", &[Running]),
    ]);

    root.init(&mut ctx);
    assert_eq!(root.step(&mut ctx, &mut world), Failure);
    assert_eq!(world.steps, vec!["one", "two"]);
    assert_eq!(world.steps_of("three"), 0);
}

#[test]
fn parallel_succeeds_once_every_child_has_succeeded() {
    let mut world = TestWorld::default();
    let mut ctx = BehaviorContext::new(1u64);
    let mut root = Behavior::parallel(vec![
        scripted("a", &[Success]),
        scripted("b", &[Running, Running, Success]),
    ]);

    root.init(&mut ctx);
    let results: Vec<_> = (0..3).map(|_| root.step(&mut ctx, &mut world)).collect();

    assert_eq!(results, vec![Running, Running, Success]);
    // A finished on tick 1 and is not polled again.
    assert_eq!(world.steps_of("a"), 1);
    assert_eq!(world.steps_of("b"), 3);
}

#[test]
fn parallel_init_resets_child_states_and_inits_every_child() {
    let mut world = TestWorld::default();
    let mut ctx = BehaviorContext::new(1u64);
    let mut root = Behavior::parallel(vec![scripted("a", &[Success]), scripted("b", &[Running])]);

    root.init(&mut ctx);
    assert_eq!((inits(&ctx, "a"), inits(&ctx, "b")), (1, 1));
    root.step(&mut ctx, &mut world);

    match &root {
        Behavior::Parallel(par) => assert_eq!(par.child_states(), &[Success, Running]),
        other => panic!("unexpected root {other:?}"),
    }

    root.init(&mut ctx);
    match &root {
        Behavior::Parallel(par) => assert_eq!(par.child_states(), &[Running, Running]),
        other => panic!("unexpected root {other:?}"),
    }
    root.step(&mut ctx, &mut world);
    assert_eq!(world.steps_of("a"), 2);
}

#[test]
fn empty_parallel_succeeds() {
    let mut world = TestWorld::default();
    let mut ctx = BehaviorContext::new(1u64);
    let mut root = Behavior::<TestWorld>::parallel(Vec::new());
    root.init(&mut ctx);
    ctx.begin_tick(&TickContext::new(0, 0.1));
    assert_eq!(root.step(&mut ctx, &mut world), Success);
}
