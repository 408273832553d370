use std::fmt;

use canopy_core::WorldMut;
use serde::{Deserialize, Serialize};

use crate::{Context, Decorator, Leaf, LeafNode, Parallel, Sequence, Status, Throttle};

/// Type tag of a [`Behavior`] variant, as written by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Action,
    Condition,
    Sequence,
    Parallel,
    Inverter,
    Succeeder,
    RepeatUntilFail,
    RepeatUntilSuccess,
    Throttle,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Action => "action",
            NodeKind::Condition => "condition",
            NodeKind::Sequence => "sequence",
            NodeKind::Parallel => "parallel",
            NodeKind::Inverter => "inverter",
            NodeKind::Succeeder => "succeeder",
            NodeKind::RepeatUntilFail => "repeat_until_fail",
            NodeKind::RepeatUntilSuccess => "repeat_until_success",
            NodeKind::Throttle => "throttle",
        }
    }

    pub fn is_leaf(self) -> bool {
        matches!(self, NodeKind::Action | NodeKind::Condition)
    }

    pub fn is_decorator(self) -> bool {
        matches!(
            self,
            NodeKind::Inverter
                | NodeKind::Succeeder
                | NodeKind::RepeatUntilFail
                | NodeKind::RepeatUntilSuccess
                | NodeKind::Throttle
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of a behavior tree.
///
/// Parents own their children exclusively; there are no back-references, so `init` propagation
/// always reaches exactly the subtree below a node.
pub enum Behavior<W>
where
    W: WorldMut + 'static,
{
    Action(LeafNode<W>),
    Condition(LeafNode<W>),
    Sequence(Sequence<W>),
    Parallel(Parallel<W>),
    /// `Success` <-> `Failure`.
    Inverter(Decorator<W>),
    /// Any terminal result becomes `Success`.
    Succeeder(Decorator<W>),
    /// Re-runs the child while it succeeds; `Success` once it fails.
    RepeatUntilFail(Decorator<W>),
    /// Re-runs the child while it fails; `Success` once it succeeds.
    RepeatUntilSuccess(Decorator<W>),
    Throttle(Throttle<W>),
}

impl<W> Behavior<W>
where
    W: WorldMut + 'static,
{
    pub fn action(name: impl Into<String>, leaf: impl Leaf<W>) -> Self {
        Behavior::Action(LeafNode::new(name, leaf))
    }

    pub fn condition(name: impl Into<String>, leaf: impl Leaf<W>) -> Self {
        Behavior::Condition(LeafNode::new(name, leaf))
    }

    pub fn sequence(children: Vec<Behavior<W>>) -> Self {
        Behavior::Sequence(Sequence::new(children))
    }

    pub fn parallel(children: Vec<Behavior<W>>) -> Self {
        Behavior::Parallel(Parallel::new(children))
    }

    pub fn inverter(child: Behavior<W>) -> Self {
        Behavior::Inverter(Decorator::new(child))
    }

    pub fn succeeder(child: Behavior<W>) -> Self {
        Behavior::Succeeder(Decorator::new(child))
    }

    pub fn repeat_until_fail(child: Behavior<W>) -> Self {
        Behavior::RepeatUntilFail(Decorator::new(child))
    }

    pub fn repeat_until_success(child: Behavior<W>) -> Self {
        Behavior::RepeatUntilSuccess(Decorator::new(child))
    }

    pub fn throttle(timeout_seconds: f32, child: Behavior<W>) -> Self {
        Behavior::Throttle(Throttle::new(timeout_seconds, child))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Behavior::Action(_) => NodeKind::Action,
            Behavior::Condition(_) => NodeKind::Condition,
            Behavior::Sequence(_) => NodeKind::Sequence,
            Behavior::Parallel(_) => NodeKind::Parallel,
            Behavior::Inverter(_) => NodeKind::Inverter,
            Behavior::Succeeder(_) => NodeKind::Succeeder,
            Behavior::RepeatUntilFail(_) => NodeKind::RepeatUntilFail,
            Behavior::RepeatUntilSuccess(_) => NodeKind::RepeatUntilSuccess,
            Behavior::Throttle(_) => NodeKind::Throttle,
        }
    }

    /// The leaf payload of `Action` / `Condition` nodes.
    pub fn as_leaf(&self) -> Option<&LeafNode<W>> {
        match self {
            Behavior::Action(leaf) | Behavior::Condition(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Direct children in attachment order.
    pub fn children(&self) -> Vec<&Behavior<W>> {
        match self {
            Behavior::Action(_) | Behavior::Condition(_) => Vec::new(),
            Behavior::Sequence(seq) => seq.children().iter().collect(),
            Behavior::Parallel(par) => par.children().iter().collect(),
            Behavior::Inverter(d)
            | Behavior::Succeeder(d)
            | Behavior::RepeatUntilFail(d)
            | Behavior::RepeatUntilSuccess(d) => d.child().into_iter().collect(),
            Behavior::Throttle(t) => t.child().into_iter().collect(),
        }
    }

    /// Reset this node's run state and that of the children that will be active next.
    pub fn init(&mut self, ctx: &mut Context<W>) {
        match self {
            Behavior::Action(leaf) | Behavior::Condition(leaf) => leaf.init(ctx),
            Behavior::Sequence(seq) => seq.init(ctx),
            Behavior::Parallel(par) => par.init(ctx),
            Behavior::Inverter(d)
            | Behavior::Succeeder(d)
            | Behavior::RepeatUntilFail(d)
            | Behavior::RepeatUntilSuccess(d) => d.init(ctx),
            Behavior::Throttle(t) => t.init(ctx),
        }
    }

    /// Advance by exactly one tick.
    pub fn step(&mut self, ctx: &mut Context<W>, world: &mut W) -> Status {
        match self {
            Behavior::Action(leaf) | Behavior::Condition(leaf) => leaf.step(ctx, world),
            Behavior::Sequence(seq) => seq.step(ctx, world),
            Behavior::Parallel(par) => par.step(ctx, world),
            Behavior::Inverter(d) => d.step_inverted(ctx, world),
            Behavior::Succeeder(d) => d.step_succeeder(ctx, world),
            Behavior::RepeatUntilFail(d) => d.step_repeat_until(Status::Failure, ctx, world),
            Behavior::RepeatUntilSuccess(d) => d.step_repeat_until(Status::Success, ctx, world),
            Behavior::Throttle(t) => t.step(ctx, world),
        }
    }
}

impl<W> Clone for Behavior<W>
where
    W: WorldMut + 'static,
{
    fn clone(&self) -> Self {
        match self {
            Behavior::Action(leaf) => Behavior::Action(leaf.clone()),
            Behavior::Condition(leaf) => Behavior::Condition(leaf.clone()),
            Behavior::Sequence(seq) => Behavior::Sequence(seq.clone()),
            Behavior::Parallel(par) => Behavior::Parallel(par.clone()),
            Behavior::Inverter(d) => Behavior::Inverter(d.clone()),
            Behavior::Succeeder(d) => Behavior::Succeeder(d.clone()),
            Behavior::RepeatUntilFail(d) => Behavior::RepeatUntilFail(d.clone()),
            Behavior::RepeatUntilSuccess(d) => Behavior::RepeatUntilSuccess(d.clone()),
            Behavior::Throttle(t) => Behavior::Throttle(t.clone()),
        }
    }
}

impl<W> fmt::Debug for Behavior<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_leaf() {
            Some(leaf) => f
                .debug_struct(self.kind().as_str())
                .field("name", &leaf.name())
                .field("type_tag", &leaf.type_tag())
                .finish(),
            None => f
                .debug_struct(self.kind().as_str())
                .field("children", &self.children())
                .finish(),
        }
    }
}
