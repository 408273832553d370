use canopy_core::{AgentId, BehaviorContext, TickContext, WorldMut};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{BehaviorTree, Context, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainConfig {
    /// Step the tree on every n-th host tick (`0` is treated as `1`).
    pub think_every_ticks: u32,
    pub think_offset_ticks: u32,
    /// Re-`init` the tree after it finishes instead of holding the terminal result.
    pub restart_on_completion: bool,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            think_every_ticks: 1,
            think_offset_ticks: 0,
            restart_on_completion: true,
        }
    }
}

impl BrainConfig {
    /// Spread agents sharing a think interval across ticks by their stable id.
    pub fn deterministic(agent: impl AgentId, think_every_ticks: u32) -> Self {
        let every = think_every_ticks.max(1);
        let offset = (agent.stable_id() % u64::from(every)) as u32;
        Self {
            think_every_ticks: every,
            think_offset_ticks: offset,
            ..Self::default()
        }
    }

    pub fn should_think(&self, tick: u64) -> bool {
        let every = u64::from(self.think_every_ticks.max(1));
        ((tick + u64::from(self.think_offset_ticks)) % every) == 0
    }
}

/// One agent's tree instance together with the context it runs against.
///
/// The brain is the reference host loop: advance the clock every frame, `init` the tree when
/// (re)starting, and step the root once per think tick.
pub struct Brain<W>
where
    W: WorldMut + 'static,
{
    pub config: BrainConfig,
    context: Context<W>,
    tree: BehaviorTree<W>,
    needs_init: bool,
    last: Option<Status>,
    skipped_seconds: f32,
}

impl<W> Brain<W>
where
    W: WorldMut + 'static,
{
    pub fn new(agent: W::Agent, tree: BehaviorTree<W>) -> Self {
        Self {
            config: BrainConfig::default(),
            context: BehaviorContext::new(agent),
            tree,
            needs_init: true,
            last: None,
            skipped_seconds: 0.0,
        }
    }

    pub fn with_config(mut self, config: BrainConfig) -> Self {
        self.config = config;
        self
    }

    pub fn agent(&self) -> W::Agent {
        self.context.agent()
    }

    pub fn context(&self) -> &Context<W> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context<W> {
        &mut self.context
    }

    pub fn tree(&self) -> &BehaviorTree<W> {
        &self.tree
    }

    /// Result of the most recent step, `None` before the first one.
    pub fn last_status(&self) -> Option<Status> {
        self.last
    }

    /// Discard any running state and start the tree over on the next think tick.
    pub fn restart(&mut self) {
        self.needs_init = true;
        self.last = None;
        self.skipped_seconds = 0.0;
    }

    /// Install a different tree, cancelling whatever the current one was doing.
    pub fn swap_tree(&mut self, tree: BehaviorTree<W>) -> BehaviorTree<W> {
        debug!(
            agent = ?self.context.agent(),
            from = self.tree.name(),
            to = tree.name(),
            "swapping behavior tree"
        );
        self.restart();
        std::mem::replace(&mut self.tree, tree)
    }

    /// Advance one host frame. Returns the tree's status when it was stepped this frame.
    pub fn tick(&mut self, frame: &TickContext, world: &mut W) -> Option<Status> {
        self.context.begin_tick(frame);
        if !self.config.should_think(frame.tick) {
            self.skipped_seconds += self.context.clock().delta_seconds();
            return None;
        }

        if let Some(last) = self.last.filter(|s| s.is_terminal()) {
            if !self.config.restart_on_completion {
                return Some(last);
            }
            self.needs_init = true;
        }

        // Skipped time predates a fresh `init`; only a tree already running is credited with it.
        let skipped = std::mem::take(&mut self.skipped_seconds);
        if !self.needs_init && skipped > 0.0 {
            self.context.clock_mut().fold_skipped(skipped);
        }

        if self.needs_init {
            debug!(
                agent = ?self.context.agent(),
                tree = self.tree.name(),
                "initializing behavior tree"
            );
            self.tree.init(&mut self.context);
            self.needs_init = false;
        }

        let status = self.tree.step(&mut self.context, world);
        if status.is_terminal() {
            debug!(
                agent = ?self.context.agent(),
                tree = self.tree.name(),
                ?status,
                "behavior tree finished"
            );
        }
        self.last = Some(status);
        Some(status)
    }
}

/// Tick every brain once, in ascending `stable_id` order. The slice itself is left as given.
pub fn tick_brains<W>(frame: &TickContext, world: &mut W, brains: &mut [Brain<W>])
where
    W: WorldMut + 'static,
{
    let mut order: Vec<usize> = (0..brains.len()).collect();
    order.sort_by_key(|&i| brains[i].agent().stable_id());
    for i in order {
        brains[i].tick(frame, world);
    }
}
