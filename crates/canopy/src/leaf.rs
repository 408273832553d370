//! Terminal nodes.
//!
//! Leaves carry the domain logic of a tree: they read and write the agent's context and act on
//! the world through whatever extension traits `W` implements. A leaf that cannot run (no
//! targets, missing component, ...) returns [`Status::Failure`]; it never panics.

use std::fmt;

use canopy_core::WorldMut;

use crate::{Context, Params, Status};

/// A domain-specific terminal behavior.
pub trait Leaf<W>: 'static
where
    W: WorldMut + 'static,
{
    /// Type tag the codec uses to find this leaf's factory in a [`crate::LeafRegistry`].
    fn type_tag(&self) -> &'static str;

    /// Reset run-local state. Must be idempotent.
    fn init(&mut self, _ctx: &mut Context<W>) {}

    fn step(&mut self, ctx: &mut Context<W>, world: &mut W) -> Status;

    /// Write this leaf's construction parameters (not its run state).
    fn encode(&self, _params: &mut Params) {}

    fn clone_leaf(&self) -> Box<dyn Leaf<W>>;
}

/// A named leaf instance, the payload of `Action` and `Condition` nodes.
pub struct LeafNode<W>
where
    W: WorldMut + 'static,
{
    name: String,
    leaf: Box<dyn Leaf<W>>,
}

impl<W> LeafNode<W>
where
    W: WorldMut + 'static,
{
    pub fn new(name: impl Into<String>, leaf: impl Leaf<W>) -> Self {
        Self::from_boxed(name, Box::new(leaf))
    }

    pub fn from_boxed(name: impl Into<String>, leaf: Box<dyn Leaf<W>>) -> Self {
        Self {
            name: name.into(),
            leaf,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_tag(&self) -> &'static str {
        self.leaf.type_tag()
    }

    pub fn leaf(&self) -> &dyn Leaf<W> {
        self.leaf.as_ref()
    }

    pub fn init(&mut self, ctx: &mut Context<W>) {
        self.leaf.init(ctx);
    }

    pub fn step(&mut self, ctx: &mut Context<W>, world: &mut W) -> Status {
        self.leaf.step(ctx, world)
    }

    pub fn encode_params(&self) -> Params {
        let mut params = Params::new();
        self.leaf.encode(&mut params);
        params
    }
}

impl<W> Clone for LeafNode<W>
where
    W: WorldMut + 'static,
{
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            leaf: self.leaf.clone_leaf(),
        }
    }
}

impl<W> fmt::Debug for LeafNode<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafNode")
            .field("name", &self.name)
            .field("type_tag", &self.leaf.type_tag())
            .finish()
    }
}

/// A single-tick predicate backed by a closure.
///
/// Closure leaves have no parameters to encode; to decode them, register a factory under the
/// same tag that rebuilds the closure.
#[derive(Clone)]
pub struct ConditionFn<F> {
    tag: &'static str,
    cond: F,
}

impl<F> ConditionFn<F> {
    pub fn new(tag: &'static str, cond: F) -> Self {
        Self { tag, cond }
    }
}

impl<F, W> Leaf<W> for ConditionFn<F>
where
    F: FnMut(&Context<W>, &W) -> bool + Clone + 'static,
    W: WorldMut + 'static,
{
    fn type_tag(&self) -> &'static str {
        self.tag
    }

    fn step(&mut self, ctx: &mut Context<W>, world: &mut W) -> Status {
        if (self.cond)(&*ctx, &*world) {
            Status::Success
        } else {
            Status::Failure
        }
    }

    fn clone_leaf(&self) -> Box<dyn Leaf<W>> {
        Box::new(self.clone())
    }
}

/// An action backed by a closure; the closure decides how many ticks it runs.
#[derive(Clone)]
pub struct ActionFn<F> {
    tag: &'static str,
    act: F,
}

impl<F> ActionFn<F> {
    pub fn new(tag: &'static str, act: F) -> Self {
        Self { tag, act }
    }
}

impl<F, W> Leaf<W> for ActionFn<F>
where
    F: FnMut(&mut Context<W>, &mut W) -> Status + Clone + 'static,
    W: WorldMut + 'static,
{
    fn type_tag(&self) -> &'static str {
        self.tag
    }

    fn step(&mut self, ctx: &mut Context<W>, world: &mut W) -> Status {
        (self.act)(ctx, world)
    }

    fn clone_leaf(&self) -> Box<dyn Leaf<W>> {
        Box::new(self.clone())
    }
}
