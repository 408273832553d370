use crate::{emit, AgentId, Blackboard, Clock, TickContext, TraceEvent};

/// Run-time environment of one agent, passed to every `init`/`step` call of its tree.
///
/// The context outlives individual ticks and is reused for the same agent; it must not be shared
/// between agents.
#[derive(Debug)]
pub struct BehaviorContext<A: AgentId> {
    agent: A,
    targets: Vec<A>,
    blackboard: Blackboard,
    clock: Clock,
}

impl<A: AgentId> BehaviorContext<A> {
    pub fn new(agent: A) -> Self {
        Self {
            agent,
            targets: Vec::new(),
            blackboard: Blackboard::new(),
            clock: Clock::new(),
        }
    }

    pub fn agent(&self) -> A {
        self.agent
    }

    /// Advance the clock for a new frame. Call once per host tick, before stepping the tree.
    pub fn begin_tick(&mut self, frame: &TickContext) {
        self.clock.tick(frame);
    }

    pub fn add_target(&mut self, target: A) {
        self.targets.push(target);
    }

    /// Remove the first occurrence of `target`, keeping the order of the others.
    pub fn remove_target(&mut self, target: A) -> bool {
        match self.targets.iter().position(|t| *t == target) {
            Some(index) => {
                self.targets.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn remove_all_targets(&mut self) {
        self.targets.clear();
    }

    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }

    pub fn target_at(&self, index: usize) -> Option<A> {
        self.targets.get(index).copied()
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    pub fn targets(&self) -> &[A] {
        &self.targets
    }

    pub fn value<T: Clone + 'static>(&self, key: &str, default: T) -> T {
        self.blackboard.value(key, default)
    }

    pub fn set_value<T: 'static>(&mut self, key: impl Into<String>, value: T) {
        self.blackboard.set_value(key, value);
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// Record a trace event stamped with the clock's tick count.
    pub fn trace(&mut self, tag: &'static str, a: u64, b: u64) {
        let event = TraceEvent::new(self.clock.ticks(), tag).with_a(a).with_b(b);
        emit(&mut self.blackboard, event);
    }
}
