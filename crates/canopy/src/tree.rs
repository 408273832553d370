use std::fmt;

use canopy_core::WorldMut;
use tracing::warn;

use crate::{Behavior, Context, Status};

/// A named tree definition owning one root node.
///
/// The tree does not tick itself: the host (or a [`crate::Brain`]) calls [`BehaviorTree::init`]
/// once and then [`BehaviorTree::step`] every tick. Node run state lives inside the nodes, so each
/// agent must step its own instance; use [`BehaviorTree::instantiate`] to stamp one out of a
/// shared definition.
pub struct BehaviorTree<W>
where
    W: WorldMut + 'static,
{
    name: String,
    root: Option<Behavior<W>>,
}

impl<W> BehaviorTree<W>
where
    W: WorldMut + 'static,
{
    pub fn new(name: impl Into<String>, root: Behavior<W>) -> Self {
        Self::from_parts(name, Some(root))
    }

    /// A tree with no root yet; stepping it fails until [`BehaviorTree::set_root`] is called.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::from_parts(name, None)
    }

    pub fn from_parts(name: impl Into<String>, root: Option<Behavior<W>>) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> Option<&Behavior<W>> {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> Option<&mut Behavior<W>> {
        self.root.as_mut()
    }

    /// Replace the root, returning the previous one. The new root must be `init`ed before stepping.
    pub fn set_root(&mut self, root: Behavior<W>) -> Option<Behavior<W>> {
        self.root.replace(root)
    }

    pub fn take_root(&mut self) -> Option<Behavior<W>> {
        self.root.take()
    }

    /// An independent copy of this tree for another agent.
    pub fn instantiate(&self) -> Self {
        self.clone()
    }

    pub fn init(&mut self, ctx: &mut Context<W>) {
        match self.root.as_mut() {
            Some(root) => root.init(ctx),
            None => warn!(tree = %self.name, "init on a behavior tree without a root"),
        }
    }

    pub fn step(&mut self, ctx: &mut Context<W>, world: &mut W) -> Status {
        match self.root.as_mut() {
            Some(root) => root.step(ctx, world),
            None => {
                warn!(tree = %self.name, "step on a behavior tree without a root");
                Status::Failure
            }
        }
    }
}

impl<W> Clone for BehaviorTree<W>
where
    W: WorldMut + 'static,
{
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            root: self.root.clone(),
        }
    }
}

impl<W> fmt::Debug for BehaviorTree<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorTree")
            .field("name", &self.name)
            .field("root", &self.root)
            .finish()
    }
}
