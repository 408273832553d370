#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::{BbKey, Blackboard};

/// One node transition, stamped with the agent clock's tick count.
///
/// The engine emits `bt.sequence.advance` / `bt.sequence.failure` (`a` = child index),
/// `bt.parallel.failure` (`a` = child index), `bt.repeat.restart` and `bt.throttle.fire`
/// (`a` = child status code: 0 running, 1 success, 2 failure) and `bt.decorator.unset`.
/// Leaves may add their own tags.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub tag: Cow<'static, str>,
    pub a: u64,
    pub b: u64,
}

impl TraceEvent {
    pub fn new(tick: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tick,
            tag: tag.into(),
            a: 0,
            b: 0,
        }
    }

    pub fn with_a(mut self, a: u64) -> Self {
        self.a = a;
        self
    }

    pub fn with_b(mut self, b: u64) -> Self {
        self.b = b;
        self
    }
}

/// Receives every emitted event, e.g. to stream a replay to disk.
pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TraceEvent> + 'a {
        self.events.iter().filter(move |e| e.tag == tag)
    }
}

/// Blackboard key for collecting events in-memory.
pub const TRACE_LOG: BbKey<TraceLog> = BbKey::new("canopy.trace.log");
/// Blackboard key for streaming events into a user-provided sink.
pub const TRACE_SINK: BbKey<Box<dyn TraceSink>> = BbKey::new("canopy.trace.sink");

/// Record `event` into whichever of `TRACE_LOG` / `TRACE_SINK` the blackboard holds.
pub fn emit(blackboard: &mut Blackboard, event: TraceEvent) {
    if !blackboard.contains(TRACE_LOG.name()) && !blackboard.contains(TRACE_SINK.name()) {
        return;
    }
    if let Some(log) = blackboard.get_mut(TRACE_LOG) {
        log.push(event.clone());
    }
    if let Some(sink) = blackboard.get_mut(TRACE_SINK) {
        sink.emit(event);
    }
}
