//! Tick-resumable behavior tree engine built on `canopy-core`.
//!
//! A tree is a strict ownership hierarchy of [`Behavior`] nodes. The host calls
//! [`Behavior::init`] once, then [`Behavior::step`] once per tick; `Running` is the only
//! suspension signal and node-local state (sequence index, parallel child states, throttle clock)
//! lives in the node instance, so every agent needs its own tree instance
//! ([`BehaviorTree::instantiate`]).

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod brain;
pub mod builtin;
pub mod codec;
pub mod composite;
pub mod decorator;
pub mod error;
pub mod leaf;
pub mod node;
pub mod status;
pub mod tree;

pub use brain::{tick_brains, Brain, BrainConfig};
pub use builtin::{
    register_builtins, register_messaging, CompareValue, Comparator, HasTargets, SendMessage,
    SetValue, Wait,
};
pub use codec::{FromParam, LeafRegistry, NodeRecord, ParamValue, Params, TreeRecord};
pub use composite::{Parallel, Sequence};
pub use decorator::{Decorator, Throttle};
pub use error::{CodecError, Result};
pub use leaf::{ActionFn, ConditionFn, Leaf, LeafNode};
pub use node::{Behavior, NodeKind};
pub use status::Status;
pub use tree::BehaviorTree;

/// The context type handed to every node of a tree stepping against world `W`.
pub type Context<W> = canopy_core::BehaviorContext<<W as canopy_core::WorldView>::Agent>;
