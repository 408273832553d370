use canopy::{Behavior, BehaviorTree, Brain, CompareValue, Comparator, HasTargets, Wait};
use canopy_core::{TickContext, WorldMut, WorldView};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

#[derive(Default)]
struct World;

impl WorldView for World {
    type Agent = u64;
}

impl WorldMut for World {}

fn bench_tree_tick(c: &mut Criterion) {
    let guards = (0..32)
        .map(|i| {
            Behavior::condition(
                format!("guard_{i}"),
                CompareValue::new("alertness", Comparator::GreaterOrEqual, 0.0),
            )
        })
        .collect::<Vec<_>>();

    let root = Behavior::repeat_until_fail(Behavior::parallel(vec![
        Behavior::parallel(guards),
        Behavior::throttle(0.5, Behavior::condition("targets", HasTargets)),
        Behavior::action("idle", Wait::new(1.0)),
    ]));
    let mut brain = Brain::new(1u64, BehaviorTree::new("bench", root));
    brain.context_mut().set_value("alertness", 1.0f64);
    brain.context_mut().add_target(2);
    let mut world = World;

    let mut tick: u64 = 0;
    c.bench_function("canopy/tick(conditions=32)", |b| {
        b.iter(|| {
            let frame = TickContext::new(tick, 0.1);
            black_box(brain.tick(&frame, &mut world));
            tick = tick.wrapping_add(1);
        })
    });
}

criterion_group!(benches, bench_tree_tick);
criterion_main!(benches);
