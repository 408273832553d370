use std::borrow::Cow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::WorldMut;

/// Fire-and-forget notification from a leaf behavior to other systems.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Message {
    pub topic: Cow<'static, str>,
    /// `stable_id` of the posting agent.
    pub sender: u64,
    pub payload: Option<String>,
}

impl Message {
    pub fn new(topic: impl Into<Cow<'static, str>>, sender: u64) -> Self {
        Self {
            topic: topic.into(),
            sender,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

/// Outbound message bus implemented by the host world.
///
/// `post` must not block; the engine never waits for or inspects a reply.
pub trait MessageBus: WorldMut {
    fn post(&mut self, message: Message);
}
