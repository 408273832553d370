//! Decorator nodes: a single child whose result is filtered, repeated or gated.

use std::fmt;

use canopy_core::WorldMut;
use tracing::{trace, warn};

use crate::{Behavior, Context, Status};

/// Shared single-child slot used by Inverter, Succeeder and the repeat decorators.
///
/// Stepping a decorator without a child is a construction error that the runtime reports as
/// `Failure` (with a warning) rather than a panic.
pub struct Decorator<W>
where
    W: WorldMut + 'static,
{
    child: Option<Box<Behavior<W>>>,
}

impl<W> Decorator<W>
where
    W: WorldMut + 'static,
{
    pub fn new(child: Behavior<W>) -> Self {
        Self {
            child: Some(Box::new(child)),
        }
    }

    pub fn empty() -> Self {
        Self { child: None }
    }

    pub fn child(&self) -> Option<&Behavior<W>> {
        self.child.as_deref()
    }

    pub fn set_child(&mut self, child: Behavior<W>) -> Option<Behavior<W>> {
        self.child.replace(Box::new(child)).map(|b| *b)
    }

    pub fn take_child(&mut self) -> Option<Behavior<W>> {
        self.child.take().map(|b| *b)
    }

    pub fn init(&mut self, ctx: &mut Context<W>) {
        if let Some(child) = self.child.as_mut() {
            child.init(ctx);
        }
    }

    /// Delegate one step to the child and return its result unchanged.
    pub fn step(&mut self, ctx: &mut Context<W>, world: &mut W) -> Status {
        self.step_child(ctx, world).unwrap_or(Status::Failure)
    }

    fn step_child(&mut self, ctx: &mut Context<W>, world: &mut W) -> Option<Status> {
        let Some(child) = self.child.as_mut() else {
            warn!("decorator stepped without a child");
            ctx.trace("bt.decorator.unset", 0, 0);
            return None;
        };
        Some(child.step(ctx, world))
    }

    pub(crate) fn step_inverted(&mut self, ctx: &mut Context<W>, world: &mut W) -> Status {
        match self.step_child(ctx, world) {
            Some(status) => status.invert(),
            None => Status::Failure,
        }
    }

    pub(crate) fn step_succeeder(&mut self, ctx: &mut Context<W>, world: &mut W) -> Status {
        match self.step_child(ctx, world) {
            Some(Status::Running) => Status::Running,
            Some(_) => Status::Success,
            None => Status::Failure,
        }
    }

    /// Keep restarting the child until it reports `until`, then succeed.
    ///
    /// There is no iteration cap: a child that never reports `until` holds this node at
    /// `Running` indefinitely.
    pub(crate) fn step_repeat_until(
        &mut self,
        until: Status,
        ctx: &mut Context<W>,
        world: &mut W,
    ) -> Status {
        match self.step_child(ctx, world) {
            None => Status::Failure,
            Some(Status::Running) => Status::Running,
            Some(status) if status == until => Status::Success,
            Some(status) => {
                trace!(?status, "repeat decorator restarting child");
                ctx.trace("bt.repeat.restart", status.code(), 0);
                self.init(ctx);
                Status::Running
            }
        }
    }
}

impl<W> Default for Decorator<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<W> Clone for Decorator<W>
where
    W: WorldMut + 'static,
{
    fn clone(&self) -> Self {
        Self {
            child: self.child.clone(),
        }
    }
}

impl<W> fmt::Debug for Decorator<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decorator")
            .field("child", &self.child)
            .finish()
    }
}

/// Steps its child at most once per `timeout` seconds of agent clock time.
///
/// Every step adds the clock's delta to a local accumulator. Below `timeout` the node reports
/// `Running` without touching the child; at or above it the accumulator restarts from zero and the
/// child is stepped once, its result returned verbatim.
pub struct Throttle<W>
where
    W: WorldMut + 'static,
{
    inner: Decorator<W>,
    timeout: f32,
    elapsed: f32,
}

impl<W> Throttle<W>
where
    W: WorldMut + 'static,
{
    pub fn new(timeout_seconds: f32, child: Behavior<W>) -> Self {
        Self::with_decorator(timeout_seconds, Decorator::new(child))
    }

    pub fn with_decorator(timeout_seconds: f32, inner: Decorator<W>) -> Self {
        Self {
            inner,
            timeout: timeout_seconds,
            elapsed: 0.0,
        }
    }

    pub fn timeout(&self) -> f32 {
        self.timeout
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn child(&self) -> Option<&Behavior<W>> {
        self.inner.child()
    }

    pub fn set_child(&mut self, child: Behavior<W>) -> Option<Behavior<W>> {
        self.inner.set_child(child)
    }

    pub fn init(&mut self, ctx: &mut Context<W>) {
        self.elapsed = 0.0;
        self.inner.init(ctx);
    }

    pub fn step(&mut self, ctx: &mut Context<W>, world: &mut W) -> Status {
        if self.inner.child.is_none() {
            return self.inner.step(ctx, world);
        }

        self.elapsed += ctx.clock().delta_seconds();
        if self.elapsed < self.timeout {
            return Status::Running;
        }

        self.elapsed = 0.0;
        let status = self.inner.step(ctx, world);
        ctx.trace("bt.throttle.fire", status.code(), 0);
        status
    }
}

impl<W> Clone for Throttle<W>
where
    W: WorldMut + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            timeout: self.timeout,
            elapsed: self.elapsed,
        }
    }
}

impl<W> fmt::Debug for Throttle<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttle")
            .field("timeout", &self.timeout)
            .field("elapsed", &self.elapsed)
            .field("child", &self.inner.child)
            .finish()
    }
}
