//! Per-agent run state for tick-driven behavior trees.
//!
//! Every node of a tree receives the same [`BehaviorContext`] on each call: the controlled agent,
//! its ordered targets, a generic [`Blackboard`] and a [`Clock`] already scaled for the agent.
//! World access (transforms, navigation, messaging) is expressed through the [`WorldView`] /
//! [`WorldMut`] extension traits so leaves never reach for global state.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod blackboard;
pub mod clock;
pub mod context;
pub mod message;
pub mod tick;
pub mod trace;
pub mod world;

pub use blackboard::{BbKey, Blackboard};
pub use clock::Clock;
pub use context::BehaviorContext;
pub use message::{Message, MessageBus};
pub use tick::TickContext;
pub use trace::{emit, TraceEvent, TraceLog, TraceSink, TRACE_LOG, TRACE_SINK};
pub use world::{AgentId, WorldMut, WorldView};
