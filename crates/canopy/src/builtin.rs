//! Leaves that only need the context (and, for messaging, a [`MessageBus`] world).
//!
//! `SetValue` stores numbers as `f64` / `i64`; `CompareValue` reads any of `f64`, `f32`, `i64` or
//! `i32`.

use canopy_core::{AgentId, Message, MessageBus, WorldMut};
use tracing::warn;

use crate::{Context, FromParam, Leaf, LeafRegistry, ParamValue, Params, Status};

/// Numeric comparison used by threshold conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,
}

impl Comparator {
    pub fn compare(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparator::Less => lhs < rhs,
            Comparator::LessOrEqual => lhs <= rhs,
            Comparator::Greater => lhs > rhs,
            Comparator::GreaterOrEqual => lhs >= rhs,
            Comparator::Equal => lhs == rhs,
            Comparator::NotEqual => lhs != rhs,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::Less => "<",
            Comparator::LessOrEqual => "<=",
            Comparator::Greater => ">",
            Comparator::GreaterOrEqual => ">=",
            Comparator::Equal => "==",
            Comparator::NotEqual => "!=",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "<" => Some(Comparator::Less),
            "<=" => Some(Comparator::LessOrEqual),
            ">" => Some(Comparator::Greater),
            ">=" => Some(Comparator::GreaterOrEqual),
            "==" => Some(Comparator::Equal),
            "!=" => Some(Comparator::NotEqual),
            _ => None,
        }
    }
}

impl From<Comparator> for ParamValue {
    fn from(value: Comparator) -> Self {
        ParamValue::Text(value.as_str().to_owned())
    }
}

impl FromParam for Comparator {
    const EXPECTED: &'static str = "comparator (<, <=, >, >=, ==, !=)";

    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Text(s) => Comparator::parse(s),
            _ => None,
        }
    }
}

/// Runs for `duration` seconds of agent clock time, then succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct Wait {
    duration: f32,
    elapsed: f32,
}

impl Wait {
    pub const TAG: &'static str = "wait";

    pub fn new(duration_seconds: f32) -> Self {
        Self {
            duration: duration_seconds,
            elapsed: 0.0,
        }
    }
}

impl<W> Leaf<W> for Wait
where
    W: WorldMut + 'static,
{
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn init(&mut self, _ctx: &mut Context<W>) {
        self.elapsed = 0.0;
    }

    fn step(&mut self, ctx: &mut Context<W>, _world: &mut W) -> Status {
        self.elapsed += ctx.clock().delta_seconds();
        if self.elapsed >= self.duration {
            Status::Success
        } else {
            Status::Running
        }
    }

    fn encode(&self, params: &mut Params) {
        params.encode("duration", self.duration);
    }

    fn clone_leaf(&self) -> Box<dyn Leaf<W>> {
        Box::new(self.clone())
    }
}

/// Succeeds when the context holds at least one target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HasTargets;

impl HasTargets {
    pub const TAG: &'static str = "has_targets";
}

impl<W> Leaf<W> for HasTargets
where
    W: WorldMut + 'static,
{
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn step(&mut self, ctx: &mut Context<W>, _world: &mut W) -> Status {
        if ctx.has_targets() {
            Status::Success
        } else {
            Status::Failure
        }
    }

    fn clone_leaf(&self) -> Box<dyn Leaf<W>> {
        Box::new(*self)
    }
}

/// Compares a numeric blackboard entry against a threshold. An absent entry reads as `0.0`; a
/// non-numeric one fails.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareValue {
    key: String,
    comparator: Comparator,
    threshold: f64,
}

impl CompareValue {
    pub const TAG: &'static str = "compare_value";

    pub fn new(key: impl Into<String>, comparator: Comparator, threshold: f64) -> Self {
        Self {
            key: key.into(),
            comparator,
            threshold,
        }
    }
}

impl<W> Leaf<W> for CompareValue
where
    W: WorldMut + 'static,
{
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn step(&mut self, ctx: &mut Context<W>, _world: &mut W) -> Status {
        let bb = ctx.blackboard();
        let value = if !bb.contains(&self.key) {
            0.0
        } else if bb.holds::<f64>(&self.key) {
            bb.value(&self.key, 0.0f64)
        } else if bb.holds::<f32>(&self.key) {
            f64::from(bb.value(&self.key, 0.0f32))
        } else if bb.holds::<i64>(&self.key) {
            bb.value(&self.key, 0i64) as f64
        } else if bb.holds::<i32>(&self.key) {
            f64::from(bb.value(&self.key, 0i32))
        } else {
            warn!(key = %self.key, "compare_value entry is not numeric");
            return Status::Failure;
        };
        if self.comparator.compare(value, self.threshold) {
            Status::Success
        } else {
            Status::Failure
        }
    }

    fn encode(&self, params: &mut Params) {
        params.encode("key", self.key.as_str());
        params.encode("comparator", self.comparator);
        params.encode("threshold", self.threshold);
    }

    fn clone_leaf(&self) -> Box<dyn Leaf<W>> {
        Box::new(self.clone())
    }
}

/// Writes a literal into the blackboard and succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct SetValue {
    key: String,
    value: ParamValue,
}

impl SetValue {
    pub const TAG: &'static str = "set_value";

    pub fn new(key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<W> Leaf<W> for SetValue
where
    W: WorldMut + 'static,
{
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn step(&mut self, ctx: &mut Context<W>, _world: &mut W) -> Status {
        let key = self.key.clone();
        match &self.value {
            ParamValue::Bool(b) => ctx.set_value(key, *b),
            ParamValue::Int(i) => ctx.set_value(key, *i),
            ParamValue::Float(f) => ctx.set_value(key, *f),
            ParamValue::Text(s) => ctx.set_value(key, s.clone()),
        }
        Status::Success
    }

    fn encode(&self, params: &mut Params) {
        params.encode("key", self.key.as_str());
        params.encode("value", self.value.clone());
    }

    fn clone_leaf(&self) -> Box<dyn Leaf<W>> {
        Box::new(self.clone())
    }
}

/// Posts a fire-and-forget [`Message`] on the world's bus and succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessage {
    topic: String,
    payload: Option<String>,
}

impl SendMessage {
    pub const TAG: &'static str = "send_message";

    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

impl<W> Leaf<W> for SendMessage
where
    W: MessageBus + 'static,
{
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn step(&mut self, ctx: &mut Context<W>, world: &mut W) -> Status {
        if self.topic.is_empty() {
            warn!("send_message leaf has an empty topic");
            return Status::Failure;
        }
        let mut message = Message::new(self.topic.clone(), ctx.agent().stable_id());
        message.payload = self.payload.clone();
        world.post(message);
        Status::Success
    }

    fn encode(&self, params: &mut Params) {
        params.encode("topic", self.topic.as_str());
        if let Some(payload) = &self.payload {
            params.encode("payload", payload.as_str());
        }
    }

    fn clone_leaf(&self) -> Box<dyn Leaf<W>> {
        Box::new(self.clone())
    }
}

/// Register the leaves every world supports.
pub fn register_builtins<W>(registry: &mut LeafRegistry<W>)
where
    W: WorldMut + 'static,
{
    registry
        .register(Wait::TAG, |p: &Params| Ok(Wait::new(p.decode("duration")?)))
        .register(HasTargets::TAG, |_: &Params| Ok(HasTargets))
        .register(CompareValue::TAG, |p: &Params| {
            Ok(CompareValue::new(
                p.decode::<String>("key")?,
                p.decode("comparator")?,
                p.decode("threshold")?,
            ))
        })
        .register(SetValue::TAG, |p: &Params| {
            Ok(SetValue::new(
                p.decode::<String>("key")?,
                p.decode::<ParamValue>("value")?,
            ))
        });
}

/// Register [`SendMessage`] for worlds with a message bus.
pub fn register_messaging<W>(registry: &mut LeafRegistry<W>)
where
    W: MessageBus + 'static,
{
    registry.register(SendMessage::TAG, |p: &Params| {
        let leaf = SendMessage::new(p.decode::<String>("topic")?);
        match p.get("payload") {
            Some(_) => Ok(leaf.with_payload(p.decode::<String>("payload")?)),
            None => Ok(leaf),
        }
    });
}
