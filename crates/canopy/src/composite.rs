//! Composite nodes: ordered children aggregated into one result.

use std::fmt;

use canopy_core::WorldMut;
use tracing::trace;

use crate::{Behavior, Context, Status};

/// Runs children strictly in attachment order, stopping at the first non-`Success` result.
///
/// A child that succeeds hands over to the next child, which is initialized immediately and
/// stepped on the following tick; the sequence reports `Running` in between. With N children
/// that each finish in one tick, the sequence succeeds on tick N. An empty sequence succeeds on
/// its first step.
pub struct Sequence<W>
where
    W: WorldMut + 'static,
{
    children: Vec<Behavior<W>>,
    current: usize,
}

impl<W> Sequence<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Behavior<W>>) -> Self {
        Self {
            children,
            current: 0,
        }
    }

    pub fn push(&mut self, child: Behavior<W>) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[Behavior<W>] {
        &self.children
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn init(&mut self, ctx: &mut Context<W>) {
        self.current = 0;
        if let Some(first) = self.children.first_mut() {
            first.init(ctx);
        }
    }

    pub fn step(&mut self, ctx: &mut Context<W>, world: &mut W) -> Status {
        let Some(child) = self.children.get_mut(self.current) else {
            return Status::Success;
        };

        match child.step(ctx, world) {
            Status::Running => Status::Running,
            Status::Failure => {
                ctx.trace("bt.sequence.failure", self.current as u64, 0);
                Status::Failure
            }
            Status::Success => {
                self.current += 1;
                match self.children.get_mut(self.current) {
                    Some(next) => {
                        trace!(index = self.current, "sequence advancing");
                        ctx.trace("bt.sequence.advance", self.current as u64, 0);
                        next.init(ctx);
                        Status::Running
                    }
                    None => Status::Success,
                }
            }
        }
    }
}

impl<W> Clone for Sequence<W>
where
    W: WorldMut + 'static,
{
    fn clone(&self) -> Self {
        Self {
            children: self.children.clone(),
            current: self.current,
        }
    }
}

impl<W> fmt::Debug for Sequence<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("children", &self.children)
            .field("current", &self.current)
            .finish()
    }
}

/// Polls every still-running child each tick, in attachment order.
///
/// Children are stepped one after another inside a single `step` call. The first `Failure` in
/// iteration order fails the whole node immediately (later children are not polled that tick);
/// once every child has reached `Success`, possibly on different ticks, the node succeeds. A
/// child that already succeeded is not stepped again until the next `init`.
pub struct Parallel<W>
where
    W: WorldMut + 'static,
{
    children: Vec<Behavior<W>>,
    states: Vec<Status>,
}

impl<W> Parallel<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Behavior<W>>) -> Self {
        let states = vec![Status::Running; children.len()];
        Self { children, states }
    }

    pub fn push(&mut self, child: Behavior<W>) {
        self.children.push(child);
        self.states.push(Status::Running);
    }

    pub fn children(&self) -> &[Behavior<W>] {
        &self.children
    }

    /// Last result of each child since `init`, `Running` for children not yet finished.
    pub fn child_states(&self) -> &[Status] {
        &self.states
    }

    pub fn init(&mut self, ctx: &mut Context<W>) {
        for child in self.children.iter_mut() {
            child.init(ctx);
        }
        self.states.clear();
        self.states.resize(self.children.len(), Status::Running);
    }

    pub fn step(&mut self, ctx: &mut Context<W>, world: &mut W) -> Status {
        let mut any_running = false;
        for (index, (child, state)) in self
            .children
            .iter_mut()
            .zip(self.states.iter_mut())
            .enumerate()
        {
            if !state.is_running() {
                continue;
            }

            let status = child.step(ctx, world);
            *state = status;
            match status {
                Status::Failure => {
                    trace!(index, "parallel child failed");
                    ctx.trace("bt.parallel.failure", index as u64, 0);
                    return Status::Failure;
                }
                Status::Running => any_running = true,
                Status::Success => {}
            }
        }

        if any_running {
            Status::Running
        } else {
            Status::Success
        }
    }
}

impl<W> Clone for Parallel<W>
where
    W: WorldMut + 'static,
{
    fn clone(&self) -> Self {
        Self {
            children: self.children.clone(),
            states: self.states.clone(),
        }
    }
}

impl<W> fmt::Debug for Parallel<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parallel")
            .field("children", &self.children)
            .field("states", &self.states)
            .finish()
    }
}
